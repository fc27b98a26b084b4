use super::galois::{exp, multiply};

// Reed-Solomon encoder
//------------------------------------------------------------------------------

// Monic generator polynomial (x - α^0)(x - α^1)...(x - α^(degree-1)), highest power first
pub fn generator_polynomial(degree: usize) -> Vec<u8> {
    let mut poly = Vec::with_capacity(degree + 1);
    poly.push(1);
    for i in 0..degree {
        let root = exp(i);
        poly.push(0);
        for j in (1..poly.len()).rev() {
            poly[j] ^= multiply(poly[j - 1], root);
        }
    }
    poly
}

// Performs polynomial long division with data polynomial(num)
// and generator polynomial(den) to compute remainder polynomial,
// the coefficients of which are the ecc
pub fn ecc_per_block(block: &[u8], ecc_count: usize) -> Vec<u8> {
    assert!(ecc_count > 0, "Ecc count must be positive: {ecc_count}");

    let len = block.len();
    let gen_poly = generator_polynomial(ecc_count);

    let mut res = block.to_vec();
    res.resize(len + ecc_count, 0);

    for i in 0..len {
        let lead_coeff = res[i];
        if lead_coeff == 0 {
            continue;
        }
        for (u, v) in res[i + 1..].iter_mut().zip(gen_poly[1..].iter()) {
            *u ^= multiply(*v, lead_coeff);
        }
    }

    res.split_off(len)
}
