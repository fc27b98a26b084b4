mod block;
mod encoder;
pub mod galois;

pub(crate) use block::*;
pub use encoder::*;

// Longest block across all versions is 153 codewords
pub const MAX_BLOCK_SIZE: usize = 256;
