//! Y-axis tick label formatting.

const MAGNITUDE_SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];

/// Integer part of `value` with a `,` every three digits (`12345.6` ->
/// `12,345`).
pub fn thousands(value: f64) -> String {
    let int = value.trunc() as i64;
    let digits = int.unsigned_abs().to_string();

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if int < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

/// Round to three significant digits and abbreviate with a magnitude suffix
/// (`1_500_000` -> `1.5M`).
pub fn human(value: f64) -> String {
    let mut num = round_sig(value, 3);
    let mut magnitude = 0;
    while num.abs() >= 1000.0 && magnitude < MAGNITUDE_SUFFIXES.len() - 1 {
        magnitude += 1;
        num /= 1000.0;
    }

    let text = format!("{num:.6}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    let text = if text == "-0" { "0" } else { text };

    format!("{text}{}", MAGNITUDE_SUFFIXES[magnitude])
}

fn round_sig(value: f64, digits: i32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let exponent = value.abs().log10().floor() as i32;
    let shift = digits - 1 - exponent;
    // Scale by exact powers of ten so that e.g. 1000 stays 1000
    if shift >= 0 {
        let factor = 10f64.powi(shift);
        (value * factor).round() / factor
    } else {
        let factor = 10f64.powi(-shift);
        (value / factor).round() * factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0.0), "0");
        assert_eq!(thousands(999.0), "999");
        assert_eq!(thousands(1000.0), "1,000");
        assert_eq!(thousands(12345.6), "12,345");
        assert_eq!(thousands(1_234_567.0), "1,234,567");
        assert_eq!(thousands(-4200.0), "-4,200");
    }

    #[test]
    fn test_human() {
        assert_eq!(human(1_500_000.0), "1.5M");
        assert_eq!(human(0.0), "0");
        assert_eq!(human(0.5), "0.5");
        assert_eq!(human(10.0), "10");
        assert_eq!(human(1000.0), "1K");
        assert_eq!(human(999.9), "1K");
        assert_eq!(human(123_456.0), "123K");
        assert_eq!(human(2_000_000_000.0), "2B");
        assert_eq!(human(3e12), "3T");
    }

    #[test]
    fn test_human_small_values() {
        assert_eq!(human(0.001), "0.001");
        assert_eq!(human(0.01), "0.01");
    }
}
