//! Raw contraction records as typed by the export reader.
//!
//! All integers are kept exactly as written (1-based, unvalidated) so that the
//! canonicalizer can report violations against the original values.

use num_rational::BigRational;

use crate::contraction::IndexSpaces;

/// An operator descriptor: `<name> <T|F> <space groups>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOperator {
    pub name: String,
    pub transposed: bool,
    /// The declared signature of each slot, before transposition.
    pub slots: Vec<IndexSpaces>,
}

/// An arc descriptor: `<first vertex> <second vertex> <space groups>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArc {
    pub first_vertex: i64,
    pub second_vertex: i64,
    pub spaces: Vec<IndexSpaces>,
}

/// The three factor components of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFactor {
    pub external: BigRational,
    pub sign: BigRational,
    pub magnitude: BigRational,
}

impl RawFactor {
    /// The overall factor of the contraction.
    #[must_use]
    pub fn value(&self) -> BigRational {
        &self.external * &self.sign * &self.magnitude
    }
}

/// One row of the contraction string, describing an index on an operator vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInternalIndex {
    pub vertex: i64,
    pub index_type: i64,
    pub space: i64,
    pub external: bool,
    /// The arc the index runs along; the result vertex if `external` is set.
    pub arc: i64,
    pub id: i64,
}

/// One row of the result string, describing an index of the result tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawExternalIndex {
    pub vertex: i64,
    pub index_type: i64,
    pub space: i64,
    pub vertex_duplicate: i64,
    pub id: i64,
}

/// A complete, unvalidated contraction record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContraction {
    pub id: i64,
    pub result: RawOperator,
    pub factor: RawFactor,
    pub num_vertices: i64,
    pub num_operators: i64,
    pub super_vertex_association: Vec<i64>,
    pub num_arcs: i64,
    pub num_external_arcs: i64,
    pub vertices: Vec<RawOperator>,
    pub arcs: Vec<RawArc>,
    pub external_arcs: Vec<RawArc>,
    pub contraction_string: Vec<RawInternalIndex>,
    pub result_string: Vec<RawExternalIndex>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use num_bigint::BigInt;

    #[test]
    fn factor_multiplies_components() {
        let factor = RawFactor {
            external: BigRational::from_integer(BigInt::from(1)),
            sign: BigRational::from_integer(BigInt::from(-1)),
            magnitude: BigRational::new(BigInt::from(1), BigInt::from(4)),
        };
        assert_eq!(
            factor.value(),
            BigRational::new(BigInt::from(-1), BigInt::from(4))
        );
    }
}
