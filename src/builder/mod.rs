mod ec;
mod qr;

pub use qr::QR;
pub(crate) use qr::Module;

use log::{debug, info};

use crate::common::{
    codec::{encode, encode_with_version, Mode},
    error::QRResult,
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Metadata, Version},
};

/// Generates a QR symbol for `data` at the given error correction level.
///
/// The smallest version that fits is picked unless `version` is given, the mode
/// segmentation and the mask are chosen automatically. Use [`QRBuilder`] for finer
/// control.
///
/// # Errors
///
/// * [`QRError::DataTooLong`](crate::QRError::DataTooLong) if data exceeds the
///   capacity of version 40 at `ec_level`.
/// * [`QRError::InvalidForcedVersion`](crate::QRError::InvalidForcedVersion) if data
///   doesn't fit in the forced version.
pub fn generate(data: &[u8], ec_level: ECLevel, version: Option<Version>) -> QRResult<QR> {
    let mut builder = QRBuilder::new(data);
    builder.ec_level(ec_level);
    if let Some(v) = version {
        builder.version(v);
    }
    builder.build()
}

pub struct QRBuilder<'a> {
    data: &'a [u8],
    version: Option<Version>,
    ec_level: ECLevel,
    mode: Option<Mode>,
    eci: Option<u32>,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, version: None, ec_level: ECLevel::M, mode: None, eci: None, mask: None }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = data;
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    /// Encodes the whole payload in one mode instead of the optimal segmentation
    pub fn mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = Some(mode);
        self
    }

    pub fn unset_mode(&mut self) -> &mut Self {
        self.mode = None;
        self
    }

    /// Prefixes the payload with an ECI header for the given assignment number
    pub fn eci(&mut self, assignment: u32) -> &mut Self {
        self.eci = Some(assignment);
        self
    }

    pub fn unset_eci(&mut self) -> &mut Self {
        self.eci = None;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn unset_mask(&mut self) -> &mut Self {
        self.mask = None;
        self
    }

    pub fn metadata(&self) -> String {
        Metadata::new(self.version, Some(self.ec_level), self.mask).to_string()
    }
}


impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        debug!("Generating QR {}...", self.metadata());

        // Encode data optimally
        debug!("Encoding data...");
        let (encoded_data, version) = match self.version {
            Some(v) => {
                (encode_with_version(self.data, v, self.ec_level, self.mode, self.eci)?, v)
            }
            None => {
                debug!("Finding best version...");
                encode(self.data, self.ec_level, self.mode, self.eci)?
            }
        };

        debug!("Constructing payload with ecc & interleaving...");
        let payload = ec::build_payload(encoded_data.data(), version, self.ec_level);

        debug!("Constructing QR...");
        let mut qr = QR::new(version, self.ec_level);

        debug!("Drawing functional patterns...");
        qr.draw_all_function_patterns();

        debug!("Drawing encoding region...");
        qr.draw_encoding_region(&payload);

        match self.mask {
            Some(m) => {
                debug!("Applying mask {m}...");
                qr.apply_mask(m);
            }
            None => {
                debug!("Finding & applying best mask...");
                apply_best_mask(&mut qr);
            }
        };

        self.report(&qr);

        Ok(qr)
    }

    fn report(&self, qr: &QR) {
        let version = qr.version();
        let total_modules = qr.width() * qr.width();
        let dark_modules = qr.count_dark_modules();
        let light_modules = total_modules - dark_modules;
        let data_capacity = version.data_codewords(self.ec_level);

        info!("QR generated: {}", qr.metadata());
        debug!(
            "Data size: {}, Data capacity: {data_capacity}, Error capacity: {}",
            self.data.len(),
            Self::ec_capacity(version, self.ec_level)
        );
        debug!(
            "Dark cells: {dark_modules}, Light cells: {light_modules}, Balance: {}%",
            dark_modules * 100 / total_modules
        );
    }

    /// Number of erroneous codewords a symbol of this version and level can recover
    pub fn ec_capacity(version: Version, ec_level: ECLevel) -> usize {
        ec::ec_capacity(version, ec_level)
    }
}

#[cfg(test)]
mod builder_tests {
    use test_case::test_case;

    use super::{ec, generate, QRBuilder, QR};
    use crate::common::{
        codec::{encode, Mode},
        error::QRError,
        mask::{compute_total_penalty, evaluate_masks, MaskPattern},
        metadata::{Color, ECLevel, Version},
    };

    #[test_case("Hello, world!".to_string(), 1, ECLevel::L)]
    #[test_case("TEST".to_string(), 1, ECLevel::M)]
    #[test_case("12345".to_string(), 1, ECLevel::Q)]
    #[test_case("OK".to_string(), 1, ECLevel::H)]
    #[test_case("A11111111111111".repeat(11), 7, ECLevel::M)]
    #[test_case("1234567890".repeat(15), 7, ECLevel::H)]
    #[test_case("A11111111111111".repeat(20), 10, ECLevel::M)]
    #[test_case("1234567890".repeat(28), 10, ECLevel::H)]
    #[test_case("A111111111111111".repeat(100), 27, ECLevel::M)]
    #[test_case("1234567890".repeat(305), 40, ECLevel::H)]
    fn test_builder(data: String, ver: usize, ec_level: ECLevel) {
        let version = Version::new(ver).unwrap();
        let qr = QRBuilder::new(data.as_bytes()).version(version).ec_level(ec_level).build().unwrap();
        assert_eq!(qr.version(), version);
        assert_eq!(qr.ec_level(), ec_level);
        assert_eq!(qr.width(), version.width());
        assert!(qr.mask().is_some());
        assert!(!qr.to_debug_str().contains('.'));
    }

    #[test]
    fn test_builder_data_overflow() {
        let data = "1234567890".repeat(306);
        let res = QRBuilder::new(data.as_bytes())
            .version(Version::new(40).unwrap())
            .ec_level(ECLevel::H)
            .build();
        assert_eq!(res.unwrap_err(), QRError::InvalidForcedVersion);
    }

    #[test]
    fn test_generate_hello_world() {
        let qr = generate(b"HELLO WORLD", ECLevel::Q, Some(Version::new(1).unwrap())).unwrap();
        assert_eq!(*qr.version(), 1);
        assert_eq!(qr.width(), 21);
        assert_eq!(qr.ec_level(), ECLevel::Q);
    }

    #[test]
    fn test_generate_too_long() {
        let data = vec![0xA5; 3000];
        assert_eq!(generate(&data, ECLevel::H, None).unwrap_err(), QRError::DataTooLong);
    }

    #[test]
    fn test_generate_empty() {
        let qr = generate(b"", ECLevel::L, None).unwrap();
        assert_eq!(*qr.version(), 1);
    }

    #[test]
    fn test_auto_mask_is_minimum() {
        let mut builder = QRBuilder::new(b"https://example.com/qr?id=12345");
        builder.ec_level(ECLevel::M);
        let auto = builder.build().unwrap();
        let mask = auto.mask().unwrap();
        for m in MaskPattern::all() {
            let forced = builder.mask(m).build().unwrap();
            if m == mask {
                assert_eq!(forced, auto);
            }
            assert!(compute_total_penalty(&forced) >= compute_total_penalty(&auto));
        }
    }

    #[test]
    fn test_forced_mask() {
        let mask = MaskPattern::new(6).unwrap();
        let qr = QRBuilder::new(b"01234567").mask(mask).build().unwrap();
        assert_eq!(qr.mask(), Some(mask));
    }

    #[test]
    fn test_evaluate_masks_matches_selection() {
        let qr = generate(b"HELLO WORLD", ECLevel::Q, None).unwrap();
        let mask = qr.mask().unwrap();
        let mut unmasked = qr.clone();
        // Masking is an involution on data modules
        unmasked.apply_mask(mask);
        let penalties = evaluate_masks(&unmasked);
        let min = *penalties.iter().min().unwrap();
        assert_eq!(penalties[*mask as usize], min);
        assert_eq!(penalties.iter().position(|p| *p == min), Some(*mask as usize));
    }

    #[test_case(b"01234567", ECLevel::M)]
    #[test_case(b"HELLO WORLD", ECLevel::Q)]
    #[test_case(b"https://example.com/qr?id=12345", ECLevel::L)]
    fn test_evaluate_masks_matches_forced_penalty(data: &[u8], ecl: ECLevel) {
        let (encoded, version) = encode(data, ecl, None, None).unwrap();
        let payload = ec::build_payload(encoded.data(), version, ecl);
        let mut unmasked = QR::new(version, ecl);
        unmasked.draw_all_function_patterns();
        unmasked.draw_encoding_region(&payload);

        let penalties = evaluate_masks(&unmasked);
        for m in MaskPattern::all() {
            let forced = QRBuilder::new(data).ec_level(ecl).mask(m).build().unwrap();
            assert_eq!(penalties[*m as usize], compute_total_penalty(&forced), "mask {m}");
        }
    }

    #[test]
    fn test_forced_mode_errors() {
        let res = QRBuilder::new(b"hello").mode(Mode::Alphanumeric).build();
        assert_eq!(res.unwrap_err(), QRError::UnsupportedCharacter);
        let res = QRBuilder::new(b"hello").eci(1_000_000).build();
        assert_eq!(res.unwrap_err(), QRError::InvalidEci);
    }

    #[test]
    fn test_finder_corners_are_dark() {
        let qr = generate(b"corner", ECLevel::L, None).unwrap();
        let w = qr.width();
        for (r, c) in [(0, 0), (0, w - 1), (w - 1, 0), (3, 3), (w - 4, 3), (3, w - 4)] {
            assert_eq!(qr.module_at(r, c), Color::Dark, "({r}, {c})");
        }
        assert_eq!(qr.module_at(w - 8, 8), Color::Dark);
    }

    #[test]
    fn test_ec_capacity() {
        assert_eq!(QRBuilder::ec_capacity(Version::new(1).unwrap(), ECLevel::L), 2);
    }
}
