//! Synthetic sequence fixtures shared by the test suites.

/// 490 doubles climbing linearly from -1.5 through 47.4, crossing zero.
pub(crate) fn double_v() -> Vec<f64> {
    (10..500).map(|x| (x - 25) as f64 * 0.1).collect()
}

/// 490 doubles growing exponentially, 2^1 .. 2^49.9.
pub(crate) fn double_expo_v() -> Vec<f64> {
    (10..500).map(|x| 2f64.powf(x as f64 * 0.1)).collect()
}

/// 490 shorts climbing from -24000 through 24900, crossing zero.
pub(crate) fn short_v() -> Vec<i16> {
    (10..500).map(|x| ((x - 250) * 100) as i16).collect()
}

/// 490 ints climbing from 10000 through 499000.
pub(crate) fn int_v() -> Vec<i32> {
    (10..500).map(|x| x * 1000).collect()
}

pub(crate) fn pack_f64_le(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub(crate) fn pack_i16_le(values: &[i16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub(crate) fn pack_i32_le(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Insert one separator byte between consecutive `width`-byte words,
/// cycling through `cycle` for the separator values.
pub(crate) fn with_separator(bytes: &[u8], width: usize, cycle: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + bytes.len() / width);
    for (index, word) in bytes.chunks(width).enumerate() {
        if index > 0 {
            out.push(cycle[(index - 1) % cycle.len()]);
        }
        out.extend_from_slice(word);
    }
    out
}

/// Three interleaved streams: (double_v[i], double_expo_v[i], int_v[i])
/// triples, 20 bytes each, little-endian.
pub(crate) fn ddi_bytes() -> Vec<u8> {
    let linear = double_v();
    let expo = double_expo_v();
    let ints = int_v();

    let mut out = Vec::with_capacity(linear.len() * 20);
    for i in 0..linear.len() {
        out.extend_from_slice(&linear[i].to_le_bytes());
        out.extend_from_slice(&expo[i].to_le_bytes());
        out.extend_from_slice(&ints[i].to_le_bytes());
    }
    out
}
