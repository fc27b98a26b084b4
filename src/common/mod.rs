pub mod bitstream;
pub mod codec;
pub mod ec;
pub mod error;
pub mod iter;
pub mod mask;
pub mod metadata;
pub(crate) mod version_db;

pub use codec::*;
pub use mask::*;
pub use metadata::*;
