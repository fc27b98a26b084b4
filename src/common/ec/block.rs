use super::{ecc_per_block, MAX_BLOCK_SIZE};

// Data codewords of one error correction block followed by their ecc
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) struct Block {
    pub data: [u8; MAX_BLOCK_SIZE],
    // Block length
    pub len: usize,
    // Data length
    pub dlen: usize,
}

impl Block {
    pub fn new(raw: &[u8], len: usize) -> Self {
        let dlen = raw.len();
        debug_assert!(
            dlen < len && len <= MAX_BLOCK_SIZE,
            "Invalid block size: Data len {dlen}, Block len {len}"
        );
        let mut data = [0u8; MAX_BLOCK_SIZE];
        data[..dlen].copy_from_slice(raw);
        let mut block = Self { data, len, dlen };
        block.compute_ecc();
        block
    }

    fn compute_ecc(&mut self) {
        let ecc = ecc_per_block(self.data(), self.ec_len());
        self.data[self.dlen..self.len].copy_from_slice(&ecc);
    }

    pub fn ec_len(&self) -> usize {
        self.len - self.dlen
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..self.dlen]
    }

    pub fn ecc(&self) -> &[u8] {
        &self.data[self.dlen..self.len]
    }
}
