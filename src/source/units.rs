//! Size strings with LVM unit suffixes (`4.00m`, `20.00G`, `8192B`).
//!
//! Lower-case suffixes are powers of 1024, upper-case powers of 1000,
//! except `b`/`B` (bytes) and `S` (512-byte sectors). A missing or unknown
//! suffix means bytes.

/// Multiplier for a unit suffix character.
pub fn unit_multiplier(suffix: char) -> u64 {
    const KI: u64 = 1024;
    const K: u64 = 1000;
    match suffix {
        'b' | 'B' => 1,
        'S' => 512,
        'k' => KI,
        'K' => K,
        'm' => KI.pow(2),
        'M' => K.pow(2),
        'g' => KI.pow(3),
        'G' => K.pow(3),
        't' => KI.pow(4),
        'T' => K.pow(4),
        'p' => KI.pow(5),
        'P' => K.pow(5),
        'e' => KI.pow(6),
        'E' => K.pow(6),
        _ => 1,
    }
}

/// Parse a size string into bytes.
///
/// The magnitude is the leading decimal number and may be fractional;
/// the product is truncated. A missing, unparseable or zero magnitude is
/// an error, and so is a product of 2^64 bytes or more.
pub fn parse_size(text: &str) -> Result<u64, String> {
    let split = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(text.len());
    let (number, suffix) = text.split_at(split);

    let magnitude: f64 = number
        .parse()
        .map_err(|_| format!("invalid size magnitude in {:?}", text))?;
    if magnitude == 0.0 {
        return Err(format!("zero size {:?}", text));
    }

    let multiplier = suffix.chars().next().map(unit_multiplier).unwrap_or(1);
    let bytes = magnitude * multiplier as f64;
    if !bytes.is_finite() || bytes >= u64::MAX as f64 {
        return Err(format!("size {:?} does not fit in 64 bits", text));
    }
    Ok(bytes as u64)
}
