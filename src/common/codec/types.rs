use crate::common::metadata::Version;

// Mode
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Mode {
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    Byte = 0b0100,
    Kanji = 0b1000,
}

impl Mode {
    #[inline]
    fn numeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Numeric.contains(char), "Invalid numeric data: {char}");
        (char - b'0') as u16
    }

    #[inline]
    fn alphanumeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Alphanumeric.contains(char), "Invalid alphanumeric data: {char}");
        match char {
            b'0'..=b'9' => (char - b'0') as u16,
            b'A'..=b'Z' => (char - b'A' + 10) as u16,
            b' ' => 36,
            b'$' => 37,
            b'%' => 38,
            b'*' => 39,
            b'+' => 40,
            b'-' => 41,
            b'.' => 42,
            b'/' => 43,
            b':' => 44,
            _ => unreachable!("Invalid alphanumeric {char}"),
        }
    }

    // Shift JIS double byte character compacted to 13 bits
    #[inline]
    fn kanji_digit(hi: u8, lo: u8) -> u16 {
        debug_assert!(Mode::is_kanji_pair(hi, lo), "Invalid kanji data: {hi:#x} {lo:#x}");
        let sjis = ((hi as u16) << 8) | lo as u16;
        let off = if sjis <= 0x9FFC { sjis - 0x8140 } else { sjis - 0xC140 };
        (off >> 8) * 0xC0 + (off & 0xFF)
    }

    pub fn encode_chunk(&self, data: &[u8]) -> u16 {
        let len = data.len();
        match self {
            Self::Numeric => {
                debug_assert!(len <= 3, "Data is too long for numeric conversion: {len}");
                data.iter().fold(0_u16, |n, b| n * 10 + Self::numeric_digit(*b))
            }
            Self::Alphanumeric => {
                debug_assert!(len <= 2, "Data is too long for alphanumeric conversion: {len}");
                data.iter().fold(0_u16, |n, b| n * 45 + Self::alphanumeric_digit(*b))
            }
            Self::Byte => {
                debug_assert!(len == 1, "Data is too long for byte conversion: {len}");
                data[0] as u16
            }
            Self::Kanji => {
                debug_assert!(len == 2, "Kanji chunk must be a byte pair: {len}");
                Self::kanji_digit(data[0], data[1])
            }
        }
    }

    pub fn contains(&self, byte: u8) -> bool {
        match self {
            Self::Numeric => byte.is_ascii_digit(),
            Self::Alphanumeric => {
                matches!(byte, b'0'..=b'9' | b'A'..=b'Z' | b' ' | b'$' | b'%' | b'*' | b'+' | b'-' | b'.' | b'/' | b':')
            }
            Self::Byte => true,
            // Kanji characters span two bytes, see `is_kanji_pair`
            Self::Kanji => false,
        }
    }

    pub fn is_kanji_pair(hi: u8, lo: u8) -> bool {
        let lo_ok = matches!(lo, 0x40..=0xFC) && lo != 0x7F;
        match hi {
            0x81..=0x9F | 0xE0..=0xEA => lo_ok,
            0xEB => lo_ok && lo <= 0xBF,
            _ => false,
        }
    }

    // Checks whether the entire payload can be represented in this mode
    pub fn validate(&self, data: &[u8]) -> bool {
        match self {
            Self::Kanji => {
                data.len() % 2 == 0 && data.chunks_exact(2).all(|c| Self::is_kanji_pair(c[0], c[1]))
            }
            _ => data.iter().all(|b| self.contains(*b)),
        }
    }

    // Number of characters in payload as recorded in the char count field
    pub fn char_count(&self, len: usize) -> usize {
        match self {
            Self::Kanji => len / 2,
            _ => len,
        }
    }

    pub fn encoded_len(&self, len: usize) -> usize {
        match *self {
            Self::Numeric => (len * 10).div_ceil(3),
            Self::Alphanumeric => (len * 11).div_ceil(2),
            Self::Byte => len * 8,
            Self::Kanji => (len / 2) * 13,
        }
    }
}


// Segment
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub mode: Mode,
    pub mode_bits: usize, // Bit len of mode
    pub len_bits: usize,  // Bit len of char count
    pub data: &'a [u8],   // Reference to raw data
}

impl<'a> Segment<'a> {
    pub fn new(mode: Mode, mode_bits: usize, len_bits: usize, data: &'a [u8]) -> Self {
        Self { mode, mode_bits, len_bits, data }
    }

    pub fn with_version(mode: Mode, ver: Version, data: &'a [u8]) -> Self {
        Self::new(mode, ver.mode_bits(), ver.char_cnt_bits(mode), data)
    }

    pub fn char_count(&self) -> usize {
        self.mode.char_count(self.data.len())
    }

    pub fn bit_len(&self) -> usize {
        let encoded_bits = self.mode.encoded_len(self.data.len());
        self.mode_bits + self.len_bits + encoded_bits
    }
}


// Global constants
//------------------------------------------------------------------------------

pub static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];

// Modes considered by segmentation. Kanji is only used when forced.
pub static MODES: [Mode; 3] = [Mode::Numeric, Mode::Alphanumeric, Mode::Byte];

pub static ECI_MODE_INDICATOR: u8 = 0b0111;

pub static TERMINATOR_BITS: usize = 4;

// Largest assignment number representable by a 3 byte ECI designator
pub static MAX_ECI_ASSIGNMENT: u32 = 999_999;
