use std::fmt::{Display, Formatter};
use std::ops::Deref;

use log::trace;

use super::error::{QRError, QRResult};
use super::metadata::Color;
use crate::builder::{Module, QR};

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> QRResult<Self> {
        match pattern {
            0..=7 => Ok(Self(pattern)),
            _ => Err(QRError::InvalidMaskingPattern),
        }
    }

    pub fn all() -> impl Iterator<Item = MaskPattern> {
        (0..8).map(MaskPattern)
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for MaskPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

mod mask_functions {
    pub fn checkerboard(r: i16, c: i16) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i16, _: i16) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i16, c: i16) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i16, c: i16) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i16, c: i16) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn fields(r: i16, c: i16) -> bool {
        let rc = r as i32 * c as i32;
        (rc & 1) + (rc % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        let rc = r as i32 * c as i32;
        ((rc & 1) + (rc % 3)) & 1 == 0
    }

    pub fn meadow(r: i16, c: i16) -> bool {
        let rc = r as i32 * c as i32;
        ((((r + c) & 1) as i32) + (rc % 3)) & 1 == 0
    }
}

impl MaskPattern {
    // Returns the predicate deciding which modules get inverted, called with (row, col)
    pub fn mask_function(self) -> fn(i16, i16) -> bool {
        match *self {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!("Invalid pattern"),
        }
    }
}


// Mask selection
//------------------------------------------------------------------------------

// Applies the mask with the lowest penalty, lowest index wins ties
pub fn apply_best_mask(qr: &mut QR) -> MaskPattern {
    let penalties = evaluate_masks(qr);
    let mut best_mask = MaskPattern(0);
    for m in MaskPattern::all() {
        if penalties[*m as usize] < penalties[*best_mask as usize] {
            best_mask = m;
        }
    }
    qr.apply_mask(best_mask);
    best_mask
}

// Penalty of each mask applied to an unmasked QR, indexed by pattern
pub fn evaluate_masks(qr: &QR) -> [u32; 8] {
    let mut penalties = [0; 8];
    for m in MaskPattern::all() {
        let mut qr = qr.clone();
        qr.apply_mask(m);
        penalties[*m as usize] = compute_total_penalty(&qr);
    }
    trace!("Mask penalties: {penalties:?}");
    penalties
}

/// Sum of the N1 to N4 penalties. Format info modules are scored as light, so a
/// finished symbol scores the same as the candidate it was selected from.
pub fn compute_total_penalty(qr: &QR) -> u32 {
    let adj_pen = compute_adjacent_penalty(qr);
    let blk_pen = compute_block_penalty(qr);
    let fp_pen_h = compute_finder_pattern_penalty(qr, true);
    let fp_pen_v = compute_finder_pattern_penalty(qr, false);
    let bal_pen = compute_balance_penalty(qr);
    adj_pen + blk_pen + fp_pen_h + fp_pen_v + bal_pen
}

// Candidates are scored before format info is written
fn scored_color(qr: &QR, r: i16, c: i16) -> Color {
    match qr.get(r, c) {
        Module::Format(_) => Color::Light,
        m => *m,
    }
}

// N1: 3 points for each run of 5 same colored modules, plus 1 per extra module
fn compute_adjacent_penalty(qr: &QR) -> u32 {
    let w = qr.width() as i16;
    let run_penalty = |len: u32| if len >= 5 { len - 2 } else { 0 };
    let mut pen = 0;
    for i in 0..w {
        let mut row_run = (Color::Light, 0);
        let mut col_run = (Color::Light, 0);
        for j in 0..w {
            for (run, clr) in
                [(&mut row_run, scored_color(qr, i, j)), (&mut col_run, scored_color(qr, j, i))]
            {
                if run.0 == clr {
                    run.1 += 1;
                } else {
                    pen += run_penalty(run.1);
                    *run = (clr, 1);
                }
            }
        }
        pen += run_penalty(row_run.1) + run_penalty(col_run.1);
    }
    pen
}

// N2: 3 points for each 2x2 block of the same color
fn compute_block_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = scored_color(qr, r, c);
            if clr == scored_color(qr, r + 1, c)
                && clr == scored_color(qr, r, c + 1)
                && clr == scored_color(qr, r + 1, c + 1)
            {
                pen += 3;
            }
        }
    }
    pen
}

// N3: per line, 40 points if 0000 1011101 occurs and 40 if 1011101 0000 occurs,
// minus 40 if both occur around the same pattern. Nothing is assumed past the edge.
fn compute_finder_pattern_penalty(qr: &QR, is_hor: bool) -> u32 {
    const L: bool = false;
    const D: bool = true;
    static LEADING: [bool; 11] = [L, L, L, L, D, L, D, D, D, L, D];
    static TRAILING: [bool; 11] = [D, L, D, D, D, L, D, L, L, L, L];
    static BOTH: [bool; 15] = [L, L, L, L, D, L, D, D, D, L, D, L, L, L, L];

    let contains = |line: &[bool], pat: &[bool]| line.windows(pat.len()).any(|w| w == pat);

    let mut pen = 0;
    let w = qr.width() as i16;
    for i in 0..w {
        let line = (0..w)
            .map(|j| if is_hor { scored_color(qr, i, j) } else { scored_color(qr, j, i) })
            .map(|clr| clr == Color::Dark)
            .collect::<Vec<_>>();
        if contains(&line, &LEADING) {
            pen += 40;
        }
        if contains(&line, &TRAILING) {
            pen += 40;
        }
        if contains(&line, &BOTH) {
            pen -= 40;
        }
    }
    pen
}

// N4: 10 points for every full 5% the dark ratio deviates from 50%
fn compute_balance_penalty(qr: &QR) -> u32 {
    let w = qr.width() as i16;
    let dark_cnt = (0..w)
        .flat_map(|r| (0..w).map(move |c| (r, c)))
        .filter(|&(r, c)| scored_color(qr, r, c) == Color::Dark)
        .count();
    let tot = qr.width() * qr.width();
    let deviation = (dark_cnt * 2).abs_diff(tot) * 10 / tot;
    (deviation * 10) as u32
}
