//! Translation of GeCCo tensor-contraction exports into algebraic notations.
//!
//! The pipeline reads an export into raw records ([`export`]), turns each
//! record into a canonical [`contraction::Contraction`] ([`canonicalize`]),
//! infers the antisymmetrizers of its result ([`symmetry`]) and renders the
//! contractions ([`notation`]). [`translate::translate`] runs all stages on the
//! text of an export.

pub mod canonicalize;
pub mod contraction;
pub mod error;
pub mod export;
pub mod notation;
pub mod symmetry;
pub mod translate;
pub mod types;
