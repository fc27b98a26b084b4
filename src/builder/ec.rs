use std::ops::Deref;

use crate::common::{
    ec::Block,
    metadata::{ECLevel, Version},
};

// Codeword interleaver
//------------------------------------------------------------------------------

// Splits data codewords into ec blocks, computes ecc per block and interleaves both.
// Output holds all data codewords column-wise across blocks followed by all ecc.
pub(crate) fn build_payload(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<u8> {
    let blocks = compute_blocks(data, version, ec_level);

    let data_blocks = blocks.iter().map(|b| b.data()).collect::<Vec<_>>();
    let ecc_blocks = blocks.iter().map(|b| b.ecc()).collect::<Vec<_>>();

    let mut payload = interleave(&data_blocks);
    payload.extend(interleave(&ecc_blocks));

    debug_assert_eq!(
        payload.len(),
        version.total_codewords(),
        "Payload len doesn't match total codewords"
    );
    payload
}

pub(crate) fn compute_blocks(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<Block> {
    let ecc_size_per_block = version.ecc_per_block(ec_level);
    blockify(data, version, ec_level)
        .into_iter()
        .map(|b| Block::new(b, b.len() + ecc_size_per_block))
        .collect()
}

pub(crate) fn blockify(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<&[u8]> {
    let (block1_size, block1_count, block2_size, block2_count) =
        version.data_codewords_per_block(ec_level);

    let total_blocks = block1_count + block2_count;
    let total_block1_size = block1_size * block1_count;
    let total_size = total_block1_size + block2_size * block2_count;

    debug_assert!(
        total_size == data.len(),
        "Data len doesn't match total size of blocks: Data len {}, Total block size {}",
        data.len(),
        total_size
    );

    let mut data_blocks = Vec::with_capacity(total_blocks);
    data_blocks.extend(data[..total_block1_size].chunks(block1_size));
    if block2_size > 0 {
        data_blocks.extend(data[total_block1_size..].chunks(block2_size));
    }
    data_blocks
}

// Takes the i-th element of every block in turn, skipping blocks that are too short
pub(crate) fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
    let max_block_size = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
    let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
    let mut res = Vec::with_capacity(total_size);
    for i in 0..max_block_size {
        for b in blocks {
            if i < b.len() {
                res.push(b[i]);
            }
        }
    }
    res
}

// Number of erroneous codewords the symbol can correct. Small symbols reserve a few
// ecc codewords for misdecode protection.
pub(crate) fn ec_capacity(version: Version, ec_level: ECLevel) -> usize {
    let p = match (*version, ec_level) {
        (1, ECLevel::L) => 3,
        (2, ECLevel::L) | (1, ECLevel::M) => 2,
        (1, _) | (3, ECLevel::L) => 1,
        _ => 0,
    };

    let ec_bytes = version.block_count(ec_level) * version.ecc_per_block(ec_level);

    (ec_bytes - p) / 2
}
