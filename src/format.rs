//! Human-scale formatting of bit counts and bit rates.
//!
//! A value is rendered in the largest unit whose integer part fits within a
//! digit budget. With a budget of three digits, `999_000` bits stays in
//! kilobits (`"999 Kb"`) while `1_000_000` bits rolls over to `"1 Mb"`.

use crate::units::*;

const SI_UNITS: [(&str, f64); 6] = [
    ("Pb", PETABIT),
    ("Tb", TERABIT),
    ("Gb", GIGABIT),
    ("Mb", MEGABIT),
    ("Kb", KILOBIT),
    ("b", BIT),
];

const BINARY_UNITS: [(&str, f64); 7] = [
    ("PiB", PEBIBYTE),
    ("TiB", TEBIBYTE),
    ("GiB", GIBIBYTE),
    ("MiB", MEBIBYTE),
    ("KiB", KIBIBYTE),
    ("B", BYTE),
    ("b", BIT),
];

/// Format with a three digit budget and two decimals in SI bit units.
pub fn format_b(value: f64) -> String {
    format_bits(value, 3, 2)
}

/// Format with a two digit budget and two decimals in binary byte units.
pub fn format_bibi(value: f64) -> String {
    format_bits_ibi(value, 2, 2)
}

/// Format `value` bits using SI units from petabit down to bit.
///
/// The first unit (largest first) where `value >= unit` and the scaled value
/// has at most `max_int_digits` integer digits is chosen. The scaled value is
/// rounded to `dec_digits` places, then trailing zeros and a trailing decimal
/// point are stripped. If no unit qualifies the raw bit count is used.
///
/// ```rust
/// use netdelay::format_bits;
///
/// assert_eq!(format_bits(1_500_000.0, 3, 2), "1.5 Mb");
/// assert_eq!(format_bits(999_000.0, 3, 2), "999 Kb");
/// assert_eq!(format_bits(1_000_000.0, 3, 2), "1 Mb");
/// ```
pub fn format_bits(value: f64, max_int_digits: usize, dec_digits: usize) -> String {
    format_with_units(&SI_UNITS, value, max_int_digits, dec_digits)
}

/// Format `value` bits using binary units from pebibyte down to bit.
pub fn format_bits_ibi(value: f64, max_int_digits: usize, dec_digits: usize) -> String {
    format_with_units(&BINARY_UNITS, value, max_int_digits, dec_digits)
}

fn format_with_units(
    units: &[(&str, f64)],
    value: f64,
    max_int_digits: usize,
    dec_digits: usize,
) -> String {
    for &(name, size) in units {
        if value >= size {
            let scaled = value / size;
            if integer_digits(scaled) <= max_int_digits {
                return format!("{} {}", format_float(scaled, dec_digits), name);
            }
        }
    }

    format!("{} b", format_float(value / BIT, dec_digits))
}

/// Count of digits left of the decimal point in `|v|`.
///
/// Values below one count as a single digit, so `0.5` is one digit,
/// `12.3` is two and `1234.0` is four. Non-finite values saturate.
pub fn integer_digits(v: f64) -> usize {
    let v = v.abs();
    if v < 1.0 {
        return 1;
    }
    (v.log10().floor() + 1.0) as usize
}

/// Render `v` with exactly `dec_digits` places, then trim trailing zeros and
/// a trailing decimal point.
pub fn format_float(v: f64, dec_digits: usize) -> String {
    let s = format!("{:.*}", dec_digits, v);
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn si_boundaries() {
        assert_eq!(format_bits(1_500_000.0, 3, 2), "1.5 Mb");
        assert_eq!(format_bits(999_000.0, 3, 2), "999 Kb");
        assert_eq!(format_bits(1_000_000.0, 3, 2), "1 Mb");
        assert_eq!(format_bits(999.0, 3, 2), "999 b");
        assert_eq!(format_bits(2.5e15, 3, 2), "2.5 Pb");
    }

    #[test]
    fn digit_budget_forces_smaller_unit() {
        // 1.5e18 bits is 1500 Pb, which does not fit three digits anywhere
        assert_eq!(format_bits(1.5e18, 3, 2), "1500000000000000000 b");
        // with a two digit budget 150 Kb falls through to bits
        assert_eq!(format_bits(150_000.0, 2, 2), "150000 b");
    }

    #[test]
    fn rounding_and_trimming() {
        assert_eq!(format_bits(1_234_567.0, 3, 2), "1.23 Mb");
        assert_eq!(format_bits(2_000_000.0, 3, 3), "2 Mb");
        assert_eq!(format_bits(1_500_000.0, 3, 0), "2 Mb");
    }

    #[test]
    fn binary_units() {
        assert_eq!(format_bits_ibi(8.0 * 1024.0, 2, 2), "1 KiB");
        assert_eq!(format_bits_ibi(8.0 * 1024.0 * 1024.0 * 1.5, 2, 2), "1.5 MiB");
        assert_eq!(format_bits_ibi(16.0, 2, 2), "2 B");
        assert_eq!(format_bits_ibi(4.0, 2, 2), "4 b");
        // 100 KiB exceeds a two digit budget, so it drops to bytes and then bits
        assert_eq!(format_bits_ibi(100.0 * 8192.0, 2, 2), "819200 b");
    }

    #[test]
    fn shorthands_use_default_budgets() {
        assert_eq!(format_b(12_500.0), "12.5 Kb");
        assert_eq!(format_bibi(8.0 * 1024.0 * 10.0), "10 KiB");
    }

    #[test]
    fn zero_negative_and_non_finite_fall_back_to_bits() {
        assert_eq!(format_bits(0.0, 3, 2), "0 b");
        assert_eq!(format_bits(0.5, 3, 2), "0.5 b");
        assert_eq!(format_bits(-42.0, 3, 2), "-42 b");
        assert_eq!(format_bits(f64::INFINITY, 3, 2), "inf b");
        assert_eq!(format_bits(f64::NAN, 3, 2), "NaN b");
    }

    #[test]
    fn integer_digit_counts() {
        assert_eq!(integer_digits(0.5), 1);
        assert_eq!(integer_digits(12.3), 2);
        assert_eq!(integer_digits(999.9), 3);
        assert_eq!(integer_digits(1000.0), 4);
        assert_eq!(integer_digits(-1234.0), 4);
    }

    proptest! {
        #[test]
        fn chosen_unit_respects_digit_budget(value in 1.0f64..1e17) {
            let rendered = format_bits(value, 3, 2);
            let (number, unit) = rendered.split_once(' ').expect("value and unit");
            prop_assert!(SI_UNITS.iter().any(|(name, _)| *name == unit));
            let parsed: f64 = number.parse().expect("numeric part");
            if unit != "b" {
                prop_assert!(parsed >= 1.0);
                prop_assert!(integer_digits(parsed.floor()) <= 4);
            }
        }
    }
}
