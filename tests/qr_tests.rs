#[cfg(test)]
mod qr_golden_tests {
    use test_case::test_case;

    use qrforge::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    // Renders function modules as '*' or '-' and data modules as '+' or ','
    fn to_golden_str(qr: &QR) -> Vec<String> {
        qr.to_debug_str()
            .lines()
            .filter(|l| !l.is_empty())
            .map(|l| {
                l.chars()
                    .map(|c| match c {
                        'f' | 'm' | 'v' => '*',
                        'F' | 'M' | 'V' => '-',
                        'd' => '+',
                        'D' => ',',
                        _ => panic!("Unexpected module {c}"),
                    })
                    .collect()
            })
            .collect()
    }

    static NUMERIC_M_0: [&str; 21] = [
        "*******--,+++-*******",
        "*-----*-*++,,-*-----*",
        "*-***-*--++,,-*-***-*",
        "*-***-*--+,++-*-***-*",
        "*-***-*-*+,++-*-***-*",
        "*-----*--,,+,-*-----*",
        "*******-*-*-*-*******",
        "---------,,,,--------",
        "*-*-*-*--,+,+---*--*-",
        "++,+,,-,+,++,+,+,,,+,",
        ",,,++,*++,++,+++,+++,",
        "++,,++-+,+,+++,++,,+,",
        ",,+,,+*+,+++,+++,,,,+",
        "--------*,+,,,+,,,,+,",
        "*******--,,,+,,,+,,,+",
        "*-----*--,+,,,+,,+,++",
        "*-***-*-*++,+,+,+++,+",
        "*-***-*--+,+,+,+,+++,",
        "*-***-*-*+,+,+++,,+,+",
        "*-----*--,,+++,+++,,,",
        "*******-*,,+,+++,,+,+",
    ];

    static ALPHANUMERIC_M_7: [&str; 21] = [
        "*******--,,,,-*******",
        "*-----*--+,++-*-----*",
        "*-***-*--+++,-*-***-*",
        "*-***-*--,,++-*-***-*",
        "*-***-*--+,++-*-***-*",
        "*-----*-*,+,,-*-----*",
        "*******-*-*-*-*******",
        "---------+,,,--------",
        "*--*-**-*,+++*-*-----",
        "++,,+,-++,,+,++++++,,",
        ",,++++*,,+++,++,,++,,",
        ",,,,,+-+,,,,+++++,+++",
        ",,++,,*,++++,,+,,+++,",
        "--------*+,,,+++++,+,",
        "*******--++++,+,++,,+",
        "*-----*-*+,,,,+++++,,",
        "*-***-*--++,+++,+,+,+",
        "*-***-*-*,,,,++,,,+++",
        "*-***-*--,++,++,,++,+",
        "*-----*--,,++,,+,++,+",
        "*******-*+,,,+,,+,+,,",
    ];

    static ECI_L_5: [&str; 21] = [
        "*******--,,,+-*******",
        "*-----*--,+,+-*-----*",
        "*-***-*--,+++-*-***-*",
        "*-***-*-*,+,+-*-***-*",
        "*-***-*-*+,,+-*-***-*",
        "*-----*--+,+,-*-----*",
        "*******-*-*-*-*******",
        "---------,,,,--------",
        "**---***-,,+,---**---",
        ",,,+,,-+,,,+++,,++,++",
        ",,+++,*,,,,,+,++,,++,",
        "+,,,,+-,+,,++++,,,+,,",
        "++,+,+*,+,,++++++,+++",
        "--------*,,,+,,+,+,,,",
        "*******-*,++,+,,,,++,",
        "*-----*-*++,,,+,+,+++",
        "*-***-*--,,+,+,,+,,,+",
        "*-***-*--+,++++,,+,,,",
        "*-***-*--,++++,,+++++",
        "*-----*-*+,++++,,,+++",
        "*******-*++,+,,,++,+,",
    ];

    #[test_case(b"01234567", ECLevel::M, None, 0, &NUMERIC_M_0)]
    #[test_case(b"ABRACADABRA", ECLevel::M, None, 7, &ALPHANUMERIC_M_7)]
    #[test_case(b"\xC1\xC2\xC3\xC4\xC5", ECLevel::L, Some(9), 5, &ECI_L_5)]
    fn test_golden(data: &[u8], ecl: ECLevel, eci: Option<u32>, mask: u8, exp: &[&str; 21]) {
        init();
        let mut builder = QRBuilder::new(data);
        builder.ec_level(ecl);
        if let Some(eci) = eci {
            builder.eci(eci);
        }
        let qr = builder.build().unwrap();
        assert_eq!(*qr.version(), 1);
        assert_eq!(qr.mask(), Some(MaskPattern::new(mask).unwrap()));
        assert_eq!(to_golden_str(&qr), exp.to_vec());
    }
}

#[cfg(test)]
mod qr_generation_tests {
    use rayon::prelude::*;

    use qrforge::*;

    #[test]
    fn test_hello_world() {
        let qr = generate(b"HELLO WORLD", ECLevel::Q, None).unwrap();
        assert_eq!(*qr.version(), 1);
        assert_eq!(qr.width(), 21);
        assert_eq!(qr.ec_level(), ECLevel::Q);
        assert_eq!(qr.module_at(13, 8), Color::Dark);
    }

    #[test]
    fn test_empty_payload() {
        let qr = generate(b"", ECLevel::L, None).unwrap();
        assert_eq!(*qr.version(), 1);
        assert!(qr.mask().is_some());
    }

    #[test]
    fn test_data_too_long() {
        let data = vec![b'a'; 3000];
        assert_eq!(generate(&data, ECLevel::H, None), Err(QRError::DataTooLong));
        let data = vec![b'a'; 2954];
        assert_eq!(generate(&data, ECLevel::L, None), Err(QRError::DataTooLong));
        let data = vec![b'a'; 2953];
        assert_eq!(*generate(&data, ECLevel::L, None).unwrap().version(), 40);
    }

    #[test]
    fn test_forced_version_too_small() {
        let data = b"This is way too long. Sorry! This does not work!!!";
        let res = generate(data, ECLevel::L, Some(Version::new(1).unwrap()));
        assert_eq!(res, Err(QRError::InvalidForcedVersion));
        let qr = generate(data, ECLevel::L, Some(Version::new(3).unwrap())).unwrap();
        assert_eq!(qr.width(), 29);
    }

    #[test]
    fn test_forced_version_larger_than_needed() {
        let qr = generate(b"1", ECLevel::H, Some(Version::new(7).unwrap())).unwrap();
        assert_eq!(*qr.version(), 7);
        assert_eq!(qr.width(), 45);
    }

    #[test]
    fn test_version_grows_with_payload() {
        let mut prev = 1;
        for len in (0..=2000).step_by(100) {
            let data = "7".repeat(len);
            let ver = *generate(data.as_bytes(), ECLevel::M, None).unwrap().version();
            assert!(ver >= prev, "Version shrank from {prev} to {ver} at len {len}");
            prev = ver;
        }
    }

    #[test]
    fn test_deterministic() {
        let data = b"https://example.com/path?query=QR%20CODE&id=0123456789";
        let a = generate(data, ECLevel::M, None).unwrap();
        let b = generate(data, ECLevel::M, None).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_debug_str(), b.to_debug_str());
    }

    #[test]
    fn test_concurrent_generation() {
        let payloads =
            (0..32).map(|i| format!("PAYLOAD {i} ").repeat(i + 1)).collect::<Vec<String>>();
        let par = payloads
            .par_iter()
            .map(|p| generate(p.as_bytes(), ECLevel::Q, None).unwrap())
            .collect::<Vec<_>>();
        for (p, qr) in payloads.iter().zip(par) {
            assert_eq!(generate(p.as_bytes(), ECLevel::Q, None).unwrap(), qr);
        }
    }

    #[test]
    fn test_kanji_mode() {
        let data = to_shift_jis("点茗漢字").unwrap();
        let qr = QRBuilder::new(&data).mode(Mode::Kanji).ec_level(ECLevel::H).build().unwrap();
        assert_eq!(*qr.version(), 1);
        let res = QRBuilder::new(b"abc").mode(Mode::Kanji).build();
        assert_eq!(res.unwrap_err(), QRError::UnsupportedCharacter);
    }

    #[test]
    fn test_metadata() {
        let qr = QRBuilder::new(b"12345")
            .ec_level(ECLevel::H)
            .mask(MaskPattern::new(2).unwrap())
            .build()
            .unwrap();
        assert_eq!(qr.metadata().to_string(), "{ Version: 1, Ec level: H, Mask: 2 }");
    }

    #[test]
    fn test_selected_mask_has_lowest_penalty() {
        let data = b"The quick brown fox jumps over the lazy dog";
        let qr = generate(data, ECLevel::L, None).unwrap();
        let best = compute_total_penalty(&qr);
        for m in MaskPattern::all() {
            let forced = QRBuilder::new(data).ec_level(ECLevel::L).mask(m).build().unwrap();
            let pen = compute_total_penalty(&forced);
            assert!(pen >= best);
            if pen == best {
                assert!(*m >= *qr.mask().unwrap());
            }
        }
    }
}

#[cfg(test)]
mod qr_proptests {
    use proptest::prelude::*;

    use qrforge::*;

    pub fn ec_level_strategy() -> BoxedStrategy<ECLevel> {
        prop_oneof![Just(ECLevel::L), Just(ECLevel::M), Just(ECLevel::Q), Just(ECLevel::H)].boxed()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn proptest_generated_symbol_is_complete(
            data in prop::collection::vec(any::<u8>(), 0..400),
            ecl in ec_level_strategy(),
        ) {
            let qr = generate(&data, ecl, None).unwrap();
            prop_assert_eq!(qr.width(), qr.version().width());
            prop_assert!(qr.mask().is_some());
            prop_assert!(!qr.to_debug_str().contains('.'));
            // Dark module next to the bottom left finder
            prop_assert_eq!(qr.module_at(qr.width() - 8, 8), Color::Dark);
        }

        #[test]
        fn proptest_smaller_version_rejects(
            data in "[0-9A-Z]{1,600}",
            ecl in ec_level_strategy(),
        ) {
            let qr = generate(data.as_bytes(), ecl, None).unwrap();
            let ver = *qr.version();
            if ver > 1 {
                let smaller = Version::new(ver - 1).unwrap();
                prop_assert_eq!(
                    generate(data.as_bytes(), ecl, Some(smaller)),
                    Err(QRError::InvalidForcedVersion)
                );
            }
        }
    }
}
