use std::fmt::{Display, Formatter};
use std::ops::{Deref, Not};

use super::codec::Mode;
use super::error::{QRError, QRResult};
use super::mask::MaskPattern;
use super::version_db::{ALIGNMENT_PATTERN_POSITIONS, BLOCK_COUNT, ECC_PER_BLOCK, VERSION_INFOS};

// Metadata
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Metadata {
    ver: Option<Version>,
    ecl: Option<ECLevel>,
    mask: Option<MaskPattern>,
}

impl Metadata {
    pub fn new(ver: Option<Version>, ecl: Option<ECLevel>, mask: Option<MaskPattern>) -> Self {
        Self { ver, ecl, mask }
    }

    pub fn version(&self) -> Option<Version> {
        self.ver
    }

    pub fn ec_level(&self) -> Option<ECLevel> {
        self.ecl
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }
}

impl Display for Metadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let ver = self.ver.map_or("None".to_string(), |v| v.to_string());
        let ecl = self.ecl.map_or("None".to_string(), |e| format!("{e:?}"));
        let mask = self.mask.map_or("None".to_string(), |m| m.to_string());
        write!(f, "{{ Version: {ver}, Ec level: {ecl}, Mask: {mask} }}")
    }
}

// Version
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct Version(usize);

impl Version {
    pub const MIN: Version = Version(1);
    pub const MAX: Version = Version(40);

    pub fn new(ver: usize) -> QRResult<Self> {
        match ver {
            1..=40 => Ok(Self(ver)),
            _ => Err(QRError::InvalidVersion),
        }
    }

    pub fn all() -> impl Iterator<Item = Version> {
        (1..=40).map(Version)
    }

    pub const fn width(self) -> usize {
        self.0 * 4 + 17
    }

    pub fn alignment_pattern(self) -> &'static [i16] {
        ALIGNMENT_PATTERN_POSITIONS[self.0]
    }

    // Modules left for codewords after all function patterns & info areas are excluded
    pub fn data_module_count(self) -> usize {
        let v = self.0;
        let mut res = (16 * v + 128) * v + 64;
        if v >= 2 {
            let align_cnt = v / 7 + 2;
            res -= (25 * align_cnt - 10) * align_cnt - 55;
            if v >= 7 {
                res -= 36;
            }
        }
        res
    }

    pub fn total_codewords(self) -> usize {
        self.data_module_count() >> 3
    }

    pub fn remainder_bits(self) -> usize {
        self.data_module_count() & 7
    }

    pub fn ecc_per_block(self, ecl: ECLevel) -> usize {
        ECC_PER_BLOCK[ecl as usize][self.0] as usize
    }

    pub fn block_count(self, ecl: ECLevel) -> usize {
        BLOCK_COUNT[ecl as usize][self.0] as usize
    }

    pub fn data_codewords(self, ecl: ECLevel) -> usize {
        self.total_codewords() - self.ecc_per_block(ecl) * self.block_count(ecl)
    }

    pub fn data_bit_capacity(self, ecl: ECLevel) -> usize {
        self.data_codewords(ecl) << 3
    }

    // Returns (block1 size, block1 count, block2 size, block2 count) for data codewords.
    // Group 2 blocks are one codeword longer than group 1 blocks.
    pub fn data_codewords_per_block(self, ecl: ECLevel) -> (usize, usize, usize, usize) {
        let total = self.total_codewords();
        let blocks = self.block_count(ecl);
        let ecc = self.ecc_per_block(ecl);

        let block2_count = total % blocks;
        let block1_count = blocks - block2_count;
        let block1_size = total / blocks - ecc;
        let block2_size = if block2_count > 0 { block1_size + 1 } else { 0 };

        (block1_size, block1_count, block2_size, block2_count)
    }

    pub const fn mode_bits(self) -> usize {
        4
    }

    pub fn char_cnt_bits(self, mode: Mode) -> usize {
        let col = match self.0 {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        match mode {
            Mode::Numeric => [10, 12, 14][col],
            Mode::Alphanumeric => [9, 11, 13][col],
            Mode::Byte => [8, 16, 16][col],
            Mode::Kanji => [8, 10, 12][col],
        }
    }

    pub fn info(self) -> u32 {
        debug_assert!(self.0 >= 7, "Version info is only defined from version 7");
        VERSION_INFOS[self.0 - 7]
    }
}

impl Deref for Version {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}


// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    // 2 bit indicator stored in format info: L = 01, M = 00, Q = 11, H = 10
    pub fn format_bits(self) -> usize {
        (self as usize) ^ 1
    }
}

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Color {
    Dark,
    Light,
}

impl From<bool> for Color {
    fn from(bit: bool) -> Self {
        if bit {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}
