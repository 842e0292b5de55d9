//! Reading of GeCCo contraction exports into raw records.
//!
//! The reader only tokenizes and types the fields of each record. All semantic
//! checks (positive ids, declared counts, signature consistency) happen in
//! [`crate::canonicalize`].

mod decimal;
mod lexer;
mod reader;
pub mod record;

pub use reader::read_export;
