//! Error types for reading and translating contraction exports.

use num_bigint::BigUint;
use thiserror::Error;

use crate::types::{IndexType, Space};

/// Result type for translation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while tokenizing and reading an export file.
///
/// Line numbers are 1-based.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: expected {expected}, found end of input")]
    UnexpectedEnd { line: usize, expected: &'static str },

    #[error("line {line}: expected {expected}, found '{found}'")]
    UnexpectedToken {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("line {line}: '{found}' is not a valid integer")]
    InvalidInteger { line: usize, found: String },

    #[error("line {line}: '{found}' is not a valid decimal number")]
    InvalidNumber { line: usize, found: String },

    #[error("line {line}: expected flag T or F, found '{found}'")]
    InvalidFlag { line: usize, found: String },

    #[error("line {line}: unknown index space '{letter}'")]
    UnknownSpace { line: usize, letter: char },

    #[error("line {line}: malformed space groups '{found}'")]
    MalformedSpaceGroups { line: usize, found: String },

    #[error("line {line}: {section} holds {len} fields, which is not a multiple of {columns}")]
    ColumnCount {
        line: usize,
        section: &'static str,
        columns: usize,
        len: usize,
    },
}

/// An invariant violated by a single contraction record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("{field} must be strictly positive, got {value}")]
    NonPositive { field: &'static str, value: i64 },

    #[error("{value} is not a valid index space id")]
    UnknownSpaceId { value: i64 },

    #[error("{value} is not a valid index type id")]
    UnknownTypeId { value: i64 },

    #[error("declared {what} count {declared} does not match actual count {actual}")]
    CountMismatch {
        what: &'static str,
        declared: i64,
        actual: usize,
    },

    #[error("result index {position} names vertex {vertex} but duplicates vertex {duplicate}")]
    ResultVertexMismatch {
        position: usize,
        vertex: i64,
        duplicate: i64,
    },

    #[error("vertex {vertex} declares {slots} space groups, expected exactly one")]
    MultiSlotVertex { vertex: usize, slots: usize },

    #[error("super-vertex mixes operators {expected} and {found}")]
    MixedOperatorNames { expected: String, found: String },

    #[error("vertex {vertex} carries {actual} {index_type}s but its signature declares {expected}")]
    SignatureMismatch {
        vertex: usize,
        index_type: IndexType,
        expected: usize,
        actual: usize,
    },

    #[error("vertex {vertex} has no available {space}-space {index_type} for signature slot {position}")]
    NoIndexOfSpace {
        vertex: usize,
        index_type: IndexType,
        space: Space,
        position: usize,
    },

    #[error("external {index_type} {id} ({space}) does not originate from any tensor")]
    OriginNotFound {
        id: usize,
        space: Space,
        index_type: IndexType,
    },

    #[error("result slot {slot} mixes {count} {index_type}s over several spaces, which is unsupported")]
    UnsupportedMixedSpaces {
        slot: usize,
        index_type: IndexType,
        count: usize,
    },

    #[error("implied symmetrizations {implied} are not an integer multiple of required symmetrizations {required}")]
    SymmetrizationRatio { implied: BigUint, required: BigUint },
}

/// A violation tied to the contraction it occurred in.
///
/// `contraction` is the contraction number as written in the export, i.e. 1-based.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("contraction {contraction}: {violation}")]
pub struct ContractionError {
    pub contraction: i64,
    #[source]
    pub violation: Violation,
}

impl ContractionError {
    #[must_use]
    pub fn new(contraction: i64, violation: Violation) -> Self {
        Self {
            contraction,
            violation,
        }
    }
}

/// Top-level error of the translation pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Contraction(#[from] ContractionError),

    #[error("failed to serialize contractions")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contraction_error_names_record_and_invariant() {
        let err = ContractionError::new(
            7,
            Violation::NoIndexOfSpace {
                vertex: 2,
                index_type: IndexType::Creator,
                space: Space::Active,
                position: 1,
            },
        );
        assert_eq!(
            err.to_string(),
            "contraction 7: vertex 2 has no available Active-space creator for signature slot 1"
        );
    }

    #[test]
    fn parse_error_carries_line() {
        let err = ParseError::UnknownSpace {
            line: 12,
            letter: 'X',
        };
        assert_eq!(err.to_string(), "line 12: unknown index space 'X'");
    }
}
