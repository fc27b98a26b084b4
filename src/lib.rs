//! # qrforge
//!
//! A Rust library for generating Model 2 QR code symbols with Reed-Solomon error correction.
//!
//! ## Features
//!
//! - **Optimal Encoding**: Payloads are split into numeric, alphanumeric and byte segments
//!   so that the encoded bit stream is as short as possible
//! - **Version Selection**: Picks the smallest of the 40 versions that fits, or validates a
//!   forced version
//! - **Reed-Solomon Error Correction**: Error correction levels L, M, Q and H, with block
//!   splitting and interleaving
//! - **Mask Evaluation**: Scores all 8 masks with the standard penalty rules and keeps the best
//! - **Extended Modes**: Forced Kanji mode and ECI designators through [`QRBuilder`]
//!
//! ## Quick Start
//!
//! ```rust
//! use qrforge::{generate, Color, ECLevel};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = generate(b"Hello, World!", ECLevel::M, None)?;
//!
//! for r in 0..qr.width() {
//!     let row: String = (0..qr.width())
//!         .map(|c| if qr.module_at(r, c) == Color::Dark { '#' } else { ' ' })
//!         .collect();
//!     println!("{row}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrforge::{ECLevel, MaskPattern, Mode, QRBuilder, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new(b"HELLO WORLD")
//!     .version(Version::new(2)?)       // if not provided, finds smallest version to fit data
//!     .ec_level(ECLevel::Q)            // if not provided, defaults to ECLevel::M
//!     .mode(Mode::Alphanumeric)        // if not provided, segments data optimally
//!     .mask(MaskPattern::new(3)?)      // if not provided, finds best mask based on penalty score
//!     .build()?;
//!
//! assert_eq!(qr.width(), 25);
//! # Ok(())
//! # }
//! ```
//!
//! ## Versions and Error Correction Levels
//!
//! Versions 1 to 40 range from 21x21 to 177x177 modules. Error correction levels recover
//! roughly 7% (L), 15% (M), 25% (Q) and 30% (H) of the codewords.

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub(crate) mod common;

pub use builder::{generate, QRBuilder, QR};
pub use common::codec::{to_shift_jis, Mode};
pub use common::error::{QRError, QRResult};
pub use common::mask::{compute_total_penalty, evaluate_masks, MaskPattern};
pub use common::metadata::{Color, ECLevel, Metadata, Version};
