//! GF(256) arithmetic for QR Reed-Solomon codewords
//!
//! Elements are bytes. The field is generated by the primitive polynomial
//! x^8 + x^4 + x^3 + x^2 + 1 (0x11D) with α = 2.

use crate::common::error::{QRError, QRResult};

const GF_GENERATOR: u16 = 0x11D;

/// Antilog table, doubled so that the sum of two logs never needs a modulo
pub(crate) static EXP_TABLE: [u8; 512] = build_exp_table();

/// Log table, `LOG_TABLE[0]` is undefined and left as 0
pub(crate) static LOG_TABLE: [u8; 256] = build_log_table();

const fn build_exp_table() -> [u8; 512] {
    let mut table = [0u8; 512];
    let mut value: u16 = 1;
    let mut i = 0;
    while i < 255 {
        table[i] = value as u8;
        table[i + 255] = value as u8;
        value <<= 1;
        if value & 0x100 != 0 {
            value ^= GF_GENERATOR;
        }
        i += 1;
    }
    table
}

const fn build_log_table() -> [u8; 256] {
    let exp = build_exp_table();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// α raised to the given power
#[inline]
pub fn exp(power: usize) -> u8 {
    EXP_TABLE[power % 255]
}

#[inline]
pub fn multiply(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    EXP_TABLE[LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize]
}

// Reed-Solomon encoding only multiplies
#[allow(dead_code)]
#[inline]
pub fn divide(a: u8, b: u8) -> QRResult<u8> {
    if b == 0 {
        return Err(QRError::DivisionByZero);
    }
    if a == 0 {
        return Ok(0);
    }
    let log_diff = LOG_TABLE[a as usize] as usize + 255 - LOG_TABLE[b as usize] as usize;
    Ok(EXP_TABLE[log_diff])
}
