/// Marker written in table cells whose value could not be computed.
pub const MISSING: &str = "NA";

/// Shortest round-trip decimal form of `value`, as downstream viewer scripts expect it.
///
/// Integral values keep a trailing `.0`, magnitudes below `1e-4` or from `1e16` up switch
/// to scientific notation with a signed two-digit exponent (`1e-05`, `2.5e+16`), and
/// non-finite values render as `nan`, `inf` or `-inf`.
pub fn repr_f64(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let magnitude = value.abs();
    if !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let exponent: i32 = exponent.parse().unwrap_or(0);
                let sign = if exponent < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exponent.abs())
            }
            None => formatted,
        };
    }

    let formatted = format!("{}", value);
    if formatted.contains('.') {
        formatted
    } else {
        formatted + ".0"
    }
}

/// Table cell for a computed value: [`MISSING`] for NaN, [`repr_f64`] otherwise.
pub fn cell(value: f64) -> String {
    if value.is_nan() {
        MISSING.to_string()
    } else {
        repr_f64(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_values_keep_a_trailing_fraction() {
        assert_eq!(repr_f64(0.0), "0.0");
        assert_eq!(repr_f64(3.0), "3.0");
        assert_eq!(repr_f64(-12.0), "-12.0");
        assert_eq!(repr_f64(1e15), "1000000000000000.0");
    }

    #[test]
    fn fractions_use_shortest_round_trip_digits() {
        assert_eq!(repr_f64(-0.25), "-0.25");
        assert_eq!(repr_f64(0.1), "0.1");
        assert_eq!(repr_f64(0.0001), "0.0001");
        assert_eq!(repr_f64(1.0 / 3.0), "0.3333333333333333");
    }

    #[test]
    fn tiny_and_huge_values_use_two_digit_exponents() {
        assert_eq!(repr_f64(1e-5), "1e-05");
        assert_eq!(repr_f64(-1.5e-7), "-1.5e-07");
        assert_eq!(repr_f64(2.5e16), "2.5e+16");
        assert_eq!(repr_f64(1e100), "1e+100");
    }

    #[test]
    fn non_finite_values_have_fixed_spellings() {
        assert_eq!(repr_f64(f64::INFINITY), "inf");
        assert_eq!(repr_f64(f64::NEG_INFINITY), "-inf");
        assert_eq!(repr_f64(f64::NAN), "nan");
        assert_eq!(cell(f64::NAN), "NA");
        assert_eq!(cell(0.5), "0.5");
    }
}
