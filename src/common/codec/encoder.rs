pub use encode::*;

// Encoder
//------------------------------------------------------------------------------

pub mod encode {
    use std::mem::swap;

    use encoding_rs::SHIFT_JIS;
    use log::{debug, trace};

    use crate::common::bitstream::BitStream;
    use crate::common::codec::{Mode, Segment, MAX_ECI_ASSIGNMENT, MODES};
    use crate::common::error::{QRError, QRResult};
    use crate::common::metadata::{ECLevel, Version};

    use super::writer::{
        eci_header_len, pad_remaining_capacity, push_eci, push_segment, push_terminator,
    };

    // Encodes data into the smallest version that fits, along with the version picked
    pub fn encode(
        data: &[u8],
        ecl: ECLevel,
        mode: Option<Mode>,
        eci: Option<u32>,
    ) -> QRResult<(BitStream, Version)> {
        validate(data, mode, eci)?;

        let (ver, segs) = find_optimal_version_and_segments(data, ecl, mode, eci)?;
        let bs = write_segments(&segs, ver, ecl, eci);
        Ok((bs, ver))
    }

    // Encodes data into the given version
    pub fn encode_with_version(
        data: &[u8],
        ver: Version,
        ecl: ECLevel,
        mode: Option<Mode>,
        eci: Option<u32>,
    ) -> QRResult<BitStream> {
        validate(data, mode, eci)?;

        let bcap = ver.data_bit_capacity(ecl);
        let segs = compute_segments(data, ver, mode);
        let sz = encoded_bit_len(&segs, eci);
        if sz > bcap {
            debug!("Data needs {sz} bits, version {ver} {ecl:?} holds {bcap} bits");
            return Err(QRError::InvalidForcedVersion);
        }
        Ok(write_segments(&segs, ver, ecl, eci))
    }

    // Converts text to Shift JIS bytes for kanji mode
    pub fn to_shift_jis(text: &str) -> QRResult<Vec<u8>> {
        let (bytes, _, had_errors) = SHIFT_JIS.encode(text);
        if had_errors {
            return Err(QRError::UnsupportedCharacter);
        }
        Ok(bytes.into_owned())
    }

    fn validate(data: &[u8], mode: Option<Mode>, eci: Option<u32>) -> QRResult<()> {
        if let Some(m) = mode {
            if !m.validate(data) {
                return Err(QRError::UnsupportedCharacter);
            }
        }
        if eci.is_some_and(|n| n > MAX_ECI_ASSIGNMENT) {
            return Err(QRError::InvalidEci);
        }
        Ok(())
    }

    fn write_segments(segs: &[Segment], ver: Version, ecl: ECLevel, eci: Option<u32>) -> BitStream {
        let bcap = ver.data_bit_capacity(ecl);
        let mut bs = BitStream::new(bcap);
        if let Some(n) = eci {
            push_eci(n, &mut bs);
        }
        for seg in segs {
            push_segment(seg, &mut bs);
        }
        push_terminator(&mut bs);
        pad_remaining_capacity(&mut bs);
        debug_assert_eq!(bs.len(), bcap, "Encoded data must fill the data capacity");
        bs
    }

    fn encoded_bit_len(segs: &[Segment], eci: Option<u32>) -> usize {
        let eci_len = eci.map_or(0, eci_header_len);
        eci_len + segs.iter().map(|s| s.bit_len()).sum::<usize>()
    }

    fn compute_segments(data: &[u8], ver: Version, mode: Option<Mode>) -> Vec<Segment> {
        match mode {
            _ if data.is_empty() => vec![],
            Some(m) => vec![Segment::with_version(m, ver, data)],
            None => compute_optimal_segments(data, ver),
        }
    }

    fn find_optimal_version_and_segments(
        data: &[u8],
        ecl: ECLevel,
        mode: Option<Mode>,
        eci: Option<u32>,
    ) -> QRResult<(Version, Vec<Segment>)> {
        let mut segs = vec![];
        let mut sz = 0;
        for ver in Version::all() {
            let bcap = ver.data_bit_capacity(ecl);
            // Char count bit lengths only change at these versions
            if matches!(*ver, 1 | 10 | 27) {
                segs = compute_segments(data, ver, mode);
                sz = encoded_bit_len(&segs, eci);
            }
            trace!("Version {ver}: {sz} bits needed, {bcap} bits available");
            if sz <= bcap {
                debug!("Selected version {ver} with {} segment(s), {sz}/{bcap} bits", segs.len());
                return Ok((ver, segs));
            }
        }
        Err(QRError::DataTooLong)
    }

    // Dynamic programming to compute optimum mode segments
    fn compute_optimal_segments(data: &[u8], ver: Version) -> Vec<Segment> {
        if data.is_empty() {
            return vec![];
        }

        let len = data.len();
        let mut prev_cost = [0usize; 3];
        MODES.iter().enumerate().for_each(|(i, &m)| prev_cost[i] = header_cost(ver, m));
        let mut cur_cost = [usize::MAX; 3];
        let mut min_path = vec![[usize::MAX; 3]; len];
        for (i, b) in data.iter().enumerate() {
            for (j, to_mode) in MODES.iter().enumerate() {
                if !to_mode.contains(*b) {
                    continue;
                }
                for (k, from_mode) in MODES.iter().enumerate() {
                    if prev_cost[k] == usize::MAX {
                        continue;
                    }
                    let mut cost = if to_mode != from_mode {
                        prev_cost[k].div_ceil(6) * 6 + header_cost(ver, *to_mode)
                    } else {
                        prev_cost[k]
                    };
                    cost += char_cost(*to_mode);
                    if cost < cur_cost[j] {
                        cur_cost[j] = cost;
                        min_path[i][j] = k;
                    }
                }
            }
            swap(&mut prev_cost, &mut cur_cost);
            cur_cost.fill(usize::MAX);
        }

        let char_modes = trace_optimal_modes(min_path, prev_cost);
        build_segments(ver, char_modes, data)
    }

    // Costs are measured in sixths of a bit so that fractional char sizes stay integral
    fn header_cost(ver: Version, mode: Mode) -> usize {
        (ver.mode_bits() + ver.char_cnt_bits(mode)) * 6
    }

    fn char_cost(mode: Mode) -> usize {
        match mode {
            Mode::Numeric => 20,
            Mode::Alphanumeric => 33,
            Mode::Byte => 48,
            Mode::Kanji => unreachable!("Kanji is never picked by segmentation"),
        }
    }

    // Backtrack min_path and identify optimal char mode
    fn trace_optimal_modes(min_path: Vec<[usize; 3]>, prev_cost: [usize; 3]) -> Vec<Mode> {
        let len = min_path.len();
        let mut mode_index = 0;
        for i in 1..3 {
            if prev_cost[i] < prev_cost[mode_index] {
                mode_index = i;
            }
        }
        let mut modes = (0..len)
            .rev()
            .scan(mode_index, |mi, i| {
                let old_mi = *mi;
                *mi = min_path[i][*mi];
                Some(MODES[old_mi])
            })
            .collect::<Vec<_>>();
        modes.reverse();
        modes
    }

    // Groups consecutive chars of the same mode into segments
    fn build_segments(ver: Version, char_modes: Vec<Mode>, data: &[u8]) -> Vec<Segment> {
        let len = data.len();
        let mut segs: Vec<Segment> = vec![];
        let mut seg_start = 0;
        let mut seg_mode = char_modes[0];
        for (i, &m) in char_modes.iter().enumerate().skip(1) {
            if seg_mode != m {
                segs.push(Segment::with_version(seg_mode, ver, &data[seg_start..i]));
                seg_mode = m;
                seg_start = i;
            }
        }
        segs.push(Segment::with_version(seg_mode, ver, &data[seg_start..len]));

        segs
    }

}

// Writer for encoded data
//------------------------------------------------------------------------------

pub(super) mod writer {
    use crate::common::bitstream::BitStream;
    use crate::common::codec::{
        Mode, Segment, ECI_MODE_INDICATOR, PADDING_CODEWORDS, TERMINATOR_BITS,
    };

    pub fn push_segment(seg: &Segment, out: &mut BitStream) {
        push_header(seg, out);
        match seg.mode {
            Mode::Numeric => push_numeric_data(seg.data, out),
            Mode::Alphanumeric => push_alphanumeric_data(seg.data, out),
            Mode::Byte => push_byte_data(seg.data, out),
            Mode::Kanji => push_kanji_data(seg.data, out),
        }
    }

    fn push_header(seg: &Segment, out: &mut BitStream) {
        out.push_bits(seg.mode as u8, seg.mode_bits);
        let char_cnt = seg.char_count();
        debug_assert!(
            char_cnt < (1 << seg.len_bits),
            "Char count exceeds bit length: Char count {char_cnt}, Char count bits {}",
            seg.len_bits
        );
        out.push_bits(char_cnt as u16, seg.len_bits);
    }

    // Bit len of the ECI mode indicator plus the assignment designator
    pub fn eci_header_len(assignment: u32) -> usize {
        let designator_len = match assignment {
            0..=127 => 8,
            128..=16383 => 16,
            _ => 24,
        };
        4 + designator_len
    }

    pub fn push_eci(assignment: u32, out: &mut BitStream) {
        out.push_bits(ECI_MODE_INDICATOR, 4);
        match assignment {
            0..=127 => out.push_bits(assignment as u8, 8),
            128..=16383 => out.push_bits((0b10 << 14) | assignment as u16, 16),
            _ => {
                out.push_bits((0b110 << 5) | (assignment >> 16) as u8, 8);
                out.push_bits((assignment & 0xFFFF) as u16, 16);
            }
        }
    }

    fn push_numeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(3) {
            let len = Mode::Numeric.encoded_len(chunk.len());
            let data = Mode::Numeric.encode_chunk(chunk);
            out.push_bits(data, len);
        }
    }

    fn push_alphanumeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(2) {
            let len = Mode::Alphanumeric.encoded_len(chunk.len());
            let data = Mode::Alphanumeric.encode_chunk(chunk);
            out.push_bits(data, len);
        }
    }

    fn push_byte_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(1) {
            let data = Mode::Byte.encode_chunk(chunk);
            out.push_bits(data, 8);
        }
    }

    fn push_kanji_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks_exact(2) {
            let data = Mode::Kanji.encode_chunk(chunk);
            out.push_bits(data, 13);
        }
    }

    pub fn push_terminator(out: &mut BitStream) {
        let bit_len = out.len();
        let bit_capacity = out.capacity();
        if bit_len < bit_capacity {
            let term_len = std::cmp::min(TERMINATOR_BITS, bit_capacity - bit_len);
            out.push_bits(0, term_len);
        }
    }

    pub fn pad_remaining_capacity(out: &mut BitStream) {
        push_padding_bits(out);
        push_padding_codewords(out);
    }

    fn push_padding_bits(out: &mut BitStream) {
        let offset = out.len() & 7;
        if offset > 0 {
            let padding_bits_len = 8 - offset;
            out.push_bits(0, padding_bits_len);
        }
    }

    fn push_padding_codewords(out: &mut BitStream) {
        let offset = out.len() & 7;
        debug_assert!(offset == 0, "Bit offset should be zero before padding codewords: {offset}");

        let remain_byte_capacity = (out.capacity() - out.len()) >> 3;
        PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
            out.push_bits(pc, 8);
        });
    }

    #[cfg(test)]
    mod writer_tests {
        use test_case::test_case;

        use super::{
            eci_header_len, push_alphanumeric_data, push_byte_data, push_eci, push_header,
            push_kanji_data, push_numeric_data, push_padding_bits, push_padding_codewords,
            push_terminator, Mode, Segment, PADDING_CODEWORDS,
        };
        use crate::common::bitstream::BitStream;
        use crate::common::metadata::{ECLevel, Version};

        fn v1_stream() -> BitStream {
            BitStream::new(Version::new(1).unwrap().data_bit_capacity(ECLevel::L))
        }

        #[test_case(1, [1023, 511, 255], vec![vec![0b00011111, 0b11111100], vec![0b00101111, 0b11111000], vec![0b01001111, 0b11110000]])]
        #[test_case(10, [4095, 2047, 65535], vec![vec![0b00011111, 0b11111111], vec![0b00101111, 0b11111110], vec![0b01001111, 0b11111111, 0b11110000]])]
        #[test_case(27, [16383, 8191, 65535], vec![vec![0b00011111, 0b11111111, 0b11000000], vec![0b00101111, 0b11111111, 0b10000000], vec![0b01001111, 0b11111111, 0b11110000]])]
        fn test_push_header(ver: usize, char_cnts: [usize; 3], exp_vecs: Vec<Vec<u8>>) {
            let ver = Version::new(ver).unwrap();
            let dummy_vec = vec![0; 65535];
            let modes = [Mode::Numeric, Mode::Alphanumeric, Mode::Byte];
            for ((mode, cc), exp_vec) in modes.iter().zip(char_cnts.iter()).zip(exp_vecs.iter()) {
                let mut bs = BitStream::new(ver.data_bit_capacity(ECLevel::L));
                let seg = Segment::with_version(*mode, ver, &dummy_vec[..*cc]);
                push_header(&seg, &mut bs);
                assert_eq!(bs.data(), exp_vec);
            }
        }

        #[test]
        fn test_push_numeric_data() {
            let mut bs = v1_stream();
            push_numeric_data("01234567".as_bytes(), &mut bs);
            assert_eq!(bs.data(), vec![0b00000011, 0b00010101, 0b10011000, 0b01100000]);
            let mut bs = v1_stream();
            push_numeric_data("8".as_bytes(), &mut bs);
            assert_eq!(bs.data(), vec![0b10000000]);
        }

        #[test]
        fn test_push_alphanumeric_data() {
            let mut bs = v1_stream();
            push_alphanumeric_data("AC-42".as_bytes(), &mut bs);
            assert_eq!(bs.data(), vec![0b00111001, 0b11011100, 0b11100100, 0b00100000])
        }

        #[test]
        fn test_push_byte_data() {
            let mut bs = v1_stream();
            bs.push_bits(0b0100, 4);
            push_byte_data("a".as_bytes(), &mut bs);
            assert_eq!(bs.data(), vec![0b01000110, 0b00010000]);
            assert_eq!(bs.len(), 12);
        }

        #[test]
        fn test_push_kanji_data() {
            let mut bs = v1_stream();
            push_kanji_data(&[0x93, 0x5F], &mut bs);
            assert_eq!(bs.data(), vec![0b01101100, 0b11111000]);
            assert_eq!(bs.len(), 13);
        }

        #[test_case(9, 12, vec![0b01110000, 0b10010000])]
        #[test_case(1000, 20, vec![0b01111000, 0b00111110, 0b10000000])]
        #[test_case(999_999, 28, vec![0b01111100, 0b11110100, 0b00100011, 0b11110000])]
        fn test_push_eci(assignment: u32, exp_len: usize, exp: Vec<u8>) {
            let mut bs = v1_stream();
            push_eci(assignment, &mut bs);
            assert_eq!(eci_header_len(assignment), exp_len);
            assert_eq!(bs.len(), exp_len);
            assert_eq!(bs.data(), exp);
        }

        #[test]
        fn test_push_terminator() {
            let mut bs = v1_stream();
            let capacity = bs.capacity() >> 3;
            bs.push_bits(0b1, 1);
            push_terminator(&mut bs);
            assert_eq!(bs.data(), vec![0b10000000]);
            assert_eq!(bs.len() & 7, 5);
            for _ in 0..capacity - 1 {
                bs.push_bits(0b11111111, 8);
            }
            push_terminator(&mut bs);
            assert_eq!(bs.len(), bs.capacity());
        }

        #[test]
        fn test_push_padding_bits() {
            let mut bs = v1_stream();
            bs.push_bits(1, 0b1);
            push_padding_bits(&mut bs);
            assert_eq!(bs.data(), vec![0b10000000]);
            assert_eq!(bs.len() & 7, 0);
        }

        #[test]
        fn test_push_padding_codewords() {
            let mut bs = v1_stream();
            bs.push_bits(1, 0b1);
            push_padding_bits(&mut bs);
            push_padding_codewords(&mut bs);
            let mut output = vec![0b10000000];
            output.extend(PADDING_CODEWORDS.iter().cycle().take(18));
            assert_eq!(bs.data(), output);
        }
    }
}
