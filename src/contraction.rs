//! The canonical, immutable representation of a single tensor contraction.
//!
//! A [`Contraction`] states that a result tensor is incremented by a rational
//! factor times the product of a set of operator tensors:
//!
//! ```text
//! R^{ab}_{ij} += 1/2 H^{ab}_{cd} T^{cd}_{ij}
//! ```
//!
//! Values of this module are produced by [`crate::canonicalize`] and are only
//! read afterwards.

use std::fmt;

use num_rational::BigRational;
use serde::{Deserialize, Serialize, Serializer};

use crate::types::{IndexType, Space};

/// A single tensor index.
///
/// `vertex` is the 0-based id of the raw vertex the index was declared on (for
/// external indices: the result slot). Equality compares all fields; origin
/// lookups that must ignore the vertex go through
/// [`crate::symmetry::IndexKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Index {
    pub id: usize,
    pub space: Space,
    pub vertex: usize,
    pub index_type: IndexType,
}

impl Index {
    #[must_use]
    pub fn new(id: usize, space: Space, vertex: usize, index_type: IndexType) -> Self {
        Self {
            id,
            space,
            vertex,
            index_type,
        }
    }
}

/// The ordered index-space signature of one operator vertex.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexSpaces {
    pub creators: Vec<Space>,
    pub annihilators: Vec<Space>,
}

impl IndexSpaces {
    #[must_use]
    pub fn new(creators: Vec<Space>, annihilators: Vec<Space>) -> Self {
        Self {
            creators,
            annihilators,
        }
    }

    /// Returns the signature with creator and annihilator roles exchanged, as
    /// seen by a transposed operator.
    #[must_use]
    pub fn transposed(&self) -> Self {
        Self {
            creators: self.annihilators.clone(),
            annihilators: self.creators.clone(),
        }
    }

    /// Returns the spaces declared for indices of the given type.
    #[must_use]
    pub fn spaces(&self, index_type: IndexType) -> &[Space] {
        match index_type {
            IndexType::Creator => &self.creators,
            IndexType::Annihilator => &self.annihilators,
        }
    }
}

/// The realized indices of one vertex, ordered to match its signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct IndexGroup {
    creators: Vec<Index>,
    annihilators: Vec<Index>,
}

impl IndexGroup {
    #[must_use]
    pub fn new(creators: Vec<Index>, annihilators: Vec<Index>) -> Self {
        Self {
            creators,
            annihilators,
        }
    }

    #[must_use]
    pub fn creators(&self) -> &[Index] {
        &self.creators
    }

    #[must_use]
    pub fn annihilators(&self) -> &[Index] {
        &self.annihilators
    }

    /// Returns the indices of the given type.
    #[must_use]
    pub fn indices(&self, index_type: IndexType) -> &[Index] {
        match index_type {
            IndexType::Creator => &self.creators,
            IndexType::Annihilator => &self.annihilators,
        }
    }

    /// Returns the same indices with the creator and annihilator lists swapped.
    #[must_use]
    pub fn swapped(&self) -> Self {
        Self {
            creators: self.annihilators.clone(),
            annihilators: self.creators.clone(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.creators.is_empty() && self.annihilators.is_empty()
    }
}

/// One logical operator, possibly spanning several vertices (a super-vertex).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TensorElement {
    name: String,
    vertex_indices: Vec<IndexGroup>,
    transposed: bool,
}

impl TensorElement {
    #[must_use]
    pub fn new(name: impl Into<String>, vertex_indices: Vec<IndexGroup>, transposed: bool) -> Self {
        Self {
            name: name.into(),
            vertex_indices,
            transposed,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns one index group per vertex, in super-vertex order.
    #[must_use]
    pub fn vertex_indices(&self) -> &[IndexGroup] {
        &self.vertex_indices
    }

    #[must_use]
    pub fn is_transposed(&self) -> bool {
        self.transposed
    }

    /// Iterates over all creators, slot by slot.
    pub fn creators(&self) -> impl Iterator<Item = &Index> + '_ {
        self.vertex_indices.iter().flat_map(IndexGroup::creators)
    }

    /// Iterates over all annihilators, slot by slot.
    pub fn annihilators(&self) -> impl Iterator<Item = &Index> + '_ {
        self.vertex_indices.iter().flat_map(IndexGroup::annihilators)
    }

    /// Returns `true` if the tensor carries no index at all.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.vertex_indices.iter().all(IndexGroup::is_empty)
    }
}

/// An edge between two vertices listing the spaces summed over along it.
///
/// For external arcs, `second_vertex` is the result slot the arc connects to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Arc {
    pub first_vertex: usize,
    pub second_vertex: usize,
    pub spaces: Vec<IndexSpaces>,
}

/// A fully canonicalized contraction.
///
/// All ids are 0-based. Fields are only reachable through accessors, so a
/// `Contraction` cannot change after [`crate::canonicalize`] built it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contraction {
    pub(crate) id: usize,
    #[serde(serialize_with = "serialize_display")]
    pub(crate) factor: BigRational,
    pub(crate) result: TensorElement,
    pub(crate) tensors: Vec<TensorElement>,
    pub(crate) super_vertex_association: Vec<usize>,
    pub(crate) arcs: Vec<Arc>,
    pub(crate) external_arcs: Vec<Arc>,
    pub(crate) contraction_indices: Vec<Index>,
    pub(crate) external_indices: Vec<Index>,
}

impl Contraction {
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// The contraction number as written in the export (1-based).
    #[must_use]
    pub fn export_number(&self) -> i64 {
        self.id as i64 + 1
    }

    #[must_use]
    pub fn factor(&self) -> &BigRational {
        &self.factor
    }

    #[must_use]
    pub fn result(&self) -> &TensorElement {
        &self.result
    }

    /// The contracted operator tensors, ordered by super-vertex id.
    #[must_use]
    pub fn tensors(&self) -> &[TensorElement] {
        &self.tensors
    }

    /// The super-vertex id of every raw vertex.
    #[must_use]
    pub fn super_vertex_association(&self) -> &[usize] {
        &self.super_vertex_association
    }

    #[must_use]
    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    #[must_use]
    pub fn external_arcs(&self) -> &[Arc] {
        &self.external_arcs
    }

    /// The indices declared on the operator vertices, in export order.
    #[must_use]
    pub fn contraction_indices(&self) -> &[Index] {
        &self.contraction_indices
    }

    /// The indices surviving into the result, in export order.
    #[must_use]
    pub fn external_indices(&self) -> &[Index] {
        &self.external_indices
    }
}

/// Serializes exact numbers such as `-1/2` as strings.
pub(crate) fn serialize_display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: fmt::Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
