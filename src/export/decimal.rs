use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::pow;

/// Largest power of ten a literal may scale by.
const MAX_SCALE: i64 = 4096;

/// Parses a decimal literal into an exact rational.
///
/// Accepts an optional sign, an integer and/or fractional part and an optional
/// exponent introduced by `E`, `e`, `D` or `d` (Fortran style). Returns `None`
/// for anything else, and for literals scaled by more than `10^4096`.
pub(super) fn parse_decimal(text: &str) -> Option<BigRational> {
    let (mantissa, exponent) = match text.split_once(['E', 'e', 'D', 'd']) {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i64>().ok()?),
        None => (text, 0),
    };

    let (negative, digits) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa.strip_prefix('+').unwrap_or(mantissa)),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part
        .chars()
        .chain(frac_part.chars())
        .all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let numer: BigInt = format!("{int_part}{frac_part}").parse().ok()?;
    let scale = exponent.checked_sub(i64::try_from(frac_part.len()).ok()?)?;
    if scale.abs() > MAX_SCALE {
        return None;
    }
    let ten = BigInt::from(10);
    let value = if scale >= 0 {
        BigRational::from_integer(numer * pow(ten, usize::try_from(scale).ok()?))
    } else {
        BigRational::new(numer, pow(ten, usize::try_from(-scale).ok()?))
    };

    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio(numer: i64, denom: i64) -> BigRational {
        BigRational::new(BigInt::from(numer), BigInt::from(denom))
    }

    #[test]
    fn plain_decimals() {
        assert_eq!(parse_decimal("1.0"), Some(ratio(1, 1)));
        assert_eq!(parse_decimal("-1.0"), Some(ratio(-1, 1)));
        assert_eq!(parse_decimal("0.25000000000000000"), Some(ratio(1, 4)));
        assert_eq!(parse_decimal("+.5"), Some(ratio(1, 2)));
        assert_eq!(parse_decimal("3"), Some(ratio(3, 1)));
        assert_eq!(parse_decimal("2."), Some(ratio(2, 1)));
    }

    #[test]
    fn exponents() {
        assert_eq!(parse_decimal("0.5E+00"), Some(ratio(1, 2)));
        assert_eq!(parse_decimal("0.125D+01"), Some(ratio(5, 4)));
        assert_eq!(parse_decimal("-2.5e-1"), Some(ratio(-1, 4)));
        assert_eq!(parse_decimal("1E2"), Some(ratio(100, 1)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("."), None);
        assert_eq!(parse_decimal("-"), None);
        assert_eq!(parse_decimal("1.0.0"), None);
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("1.0E"), None);
        assert_eq!(parse_decimal("T"), None);
    }

    #[test]
    fn huge_exponents_are_rejected() {
        assert_eq!(parse_decimal("1E999999999"), None);
        assert_eq!(parse_decimal("1D-999999999"), None);
        assert_eq!(parse_decimal("1E4097"), None);
        assert!(parse_decimal("1E4096").is_some());
        assert!(parse_decimal("1.5E-4095").is_some());
    }
}
