//! Number formatting for narrative output

/// Format an integer with `,` thousands separators
pub fn with_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// Round a non-negative float to the nearest integer and format it with
/// thousands separators
pub fn rounded_with_thousands(value: f64) -> String {
    if !value.is_finite() || value <= 0.0 {
        return "0".to_string();
    }
    with_thousands(value.round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_thousands() {
        assert_eq!(with_thousands(0), "0");
        assert_eq!(with_thousands(999), "999");
        assert_eq!(with_thousands(1000), "1,000");
        assert_eq!(with_thousands(50_000), "50,000");
        assert_eq!(with_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_rounded_with_thousands() {
        assert_eq!(rounded_with_thousands(666.666), "667");
        assert_eq!(rounded_with_thousands(1000.0), "1,000");
        assert_eq!(rounded_with_thousands(12_345.4), "12,345");
        assert_eq!(rounded_with_thousands(f64::NAN), "0");
    }
}
