//! Bit-string helpers. Encoded fields travel as `String`s of '0'/'1'
//! so that words can be concatenated field by field and rendered
//! directly.

/// Pad a bit string with zeros up to `target` bits. Fields normally
/// pad on the left; call/ret/halt pad on the right to fill the rest of
/// their word.
pub fn zero_extend(bits: &str, target: usize, pad_right: bool) -> String {
    if bits.len() >= target {
        return bits.to_string();
    }
    let zeros = "0".repeat(target - bits.len());
    if pad_right {
        format!("{bits}{zeros}")
    } else {
        format!("{zeros}{bits}")
    }
}

/// Two's-complement rendering of `value` in exactly `bits` bits.
pub fn dec_to_bin(value: i64, bits: usize) -> String {
    let mask = if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    };
    format!("{:0width$b}", (value as u64) & mask, width = bits)
}

/// Render a bit string as uppercase hex, one digit per four bits
/// (rounded up).
pub fn bin_to_hex(bits: &str) -> String {
    let digits = (bits.len() + 3) / 4;
    let value = u64::from_str_radix(bits, 2).unwrap_or(0);
    format!("{value:0digits$X}")
}
