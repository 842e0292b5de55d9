//! Rendering of canonical contractions into target notations.
//!
//! Two text forms are supported: an indexed superscript/subscript form usable in
//! TeX documents and a grouped form with explicit antisymmetrizers that SeQuant
//! can read. Contractions together with their symmetrizations can also be
//! written as JSON.

mod sequant;
mod tex;

use num_rational::BigRational;
use num_traits::{One, Signed};
use serde::Serialize;

use crate::contraction::Contraction;
use crate::symmetry::Symmetrization;

pub use sequant::to_sequant;
pub use tex::to_tex;

/// A contraction together with the antisymmetrizers of its result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Term {
    pub contraction: Contraction,
    pub symmetrization: Symmetrization,
}

impl Term {
    #[must_use]
    pub fn new(contraction: Contraction, symmetrization: Symmetrization) -> Self {
        Self {
            contraction,
            symmetrization,
        }
    }
}

/// Writes the terms as a pretty-printed JSON array.
///
/// Factors and symmetrization counts are written as strings such as `"-1/2"`.
pub fn to_json(terms: &[Term]) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(terms)?;
    json.push('\n');
    Ok(json)
}

/// Splits a factor into its sign and a magnitude that is `None` if it is one.
fn sign_and_magnitude(factor: &BigRational) -> (bool, Option<BigRational>) {
    let magnitude = factor.abs();
    (
        factor.is_negative(),
        (!magnitude.is_one()).then_some(magnitude),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use num_bigint::BigInt;

    #[test]
    fn unit_factors_have_no_magnitude() {
        let one = BigRational::one();
        assert_eq!(sign_and_magnitude(&one), (false, None));
        assert_eq!(sign_and_magnitude(&-one), (true, None));
    }

    #[test]
    fn fractional_magnitude() {
        let half = BigRational::new(BigInt::from(-1), BigInt::from(2));
        let (negative, magnitude) = sign_and_magnitude(&half);
        assert!(negative);
        assert_eq!(magnitude.unwrap().to_string(), "1/2");
    }
}
