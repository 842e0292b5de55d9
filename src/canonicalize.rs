//! Turns raw export records into canonical [`Contraction`] values.
//!
//! Canonicalization validates and normalizes all 1-based ids, groups raw
//! vertices into logical tensors (super-vertices) and orders the indices of
//! every vertex to match its declared index-space signature. Annihilators are
//! stored reversed so that creators and annihilators of the same particle line
//! up positionally.

mod ordering;

use itertools::Itertools;
use log::debug;

use crate::contraction::{Arc, Contraction, Index, IndexGroup, IndexSpaces, TensorElement};
use crate::error::{ContractionError, Violation};
use crate::export::record::{RawArc, RawContraction, RawExternalIndex, RawInternalIndex};
use crate::types::{IndexType, Space};

pub use ordering::{order_indices_by_space, OrderingError};

/// Builds the canonical [`Contraction`] of a raw record.
///
/// Fails on the first violated invariant; the error names the contraction as
/// written in the export.
pub fn canonicalize(raw: &RawContraction) -> Result<Contraction, ContractionError> {
    build(raw).map_err(|violation| ContractionError::new(raw.id, violation))
}

fn build(raw: &RawContraction) -> Result<Contraction, Violation> {
    let id = zero_based("contraction id", raw.id)?;

    check_count("vertex", raw.num_vertices, raw.vertices.len())?;
    check_count(
        "super-vertex association",
        raw.num_vertices,
        raw.super_vertex_association.len(),
    )?;
    check_count("arc", raw.num_arcs, raw.arcs.len())?;
    check_count("external arc", raw.num_external_arcs, raw.external_arcs.len())?;

    let super_vertex_association = raw
        .super_vertex_association
        .iter()
        .map(|&value| zero_based("super-vertex id", value))
        .collect::<Result<Vec<_>, _>>()?;
    let arcs = raw.arcs.iter().map(arc).collect::<Result<Vec<_>, _>>()?;
    let external_arcs = raw
        .external_arcs
        .iter()
        .map(arc)
        .collect::<Result<Vec<_>, _>>()?;

    let contraction_indices = raw
        .contraction_string
        .iter()
        .map(internal_index)
        .collect::<Result<Vec<_>, _>>()?;
    let external_indices = raw
        .result_string
        .iter()
        .enumerate()
        .map(|(position, index)| external_index(position, index))
        .collect::<Result<Vec<_>, _>>()?;

    let signatures = raw
        .vertices
        .iter()
        .enumerate()
        .map(|(vertex, operator)| match operator.slots.as_slice() {
            [slot] if operator.transposed => Ok(slot.transposed()),
            [slot] => Ok(slot.clone()),
            slots => Err(Violation::MultiSlotVertex {
                vertex: vertex + 1,
                slots: slots.len(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;
    check_coverage("contraction index", &signatures, contraction_indices.len())?;

    let tensors = group_super_vertices(raw, &super_vertex_association)?
        .into_iter()
        .map(|run| {
            let first = &raw.vertices[run[0]];
            if let Some(other) = run
                .iter()
                .map(|&vertex| &raw.vertices[vertex])
                .find(|operator| operator.name != first.name)
            {
                return Err(Violation::MixedOperatorNames {
                    expected: first.name.clone(),
                    found: other.name.clone(),
                });
            }
            let groups = run
                .iter()
                .map(|&vertex| add_indices(vertex, &signatures[vertex], &contraction_indices))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TensorElement::new(first.name.clone(), groups, first.transposed))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let result_signatures = raw
        .result
        .slots
        .iter()
        .map(|slot| {
            if raw.result.transposed {
                slot.transposed()
            } else {
                slot.clone()
            }
        })
        .collect::<Vec<_>>();
    check_coverage("result index", &result_signatures, external_indices.len())?;
    let result_groups = result_signatures
        .iter()
        .enumerate()
        .map(|(slot, signature)| add_indices(slot, signature, &external_indices))
        .collect::<Result<Vec<_>, _>>()?;
    let result = TensorElement::new(
        raw.result.name.clone(),
        result_groups,
        raw.result.transposed,
    );

    debug!(
        contraction = raw.id,
        tensors = tensors.len(),
        external = external_indices.len();
        "Canonicalized contraction"
    );

    Ok(Contraction {
        id,
        factor: raw.factor.value(),
        result,
        tensors,
        super_vertex_association,
        arcs,
        external_arcs,
        contraction_indices,
        external_indices,
    })
}

/// Validates a 1-based raw id and converts it to 0-based.
fn zero_based(field: &'static str, value: i64) -> Result<usize, Violation> {
    match usize::try_from(value) {
        Ok(id) if id > 0 => Ok(id - 1),
        _ => Err(Violation::NonPositive { field, value }),
    }
}

fn check_count(what: &'static str, declared: i64, actual: usize) -> Result<(), Violation> {
    if usize::try_from(declared).is_ok_and(|declared| declared == actual) {
        Ok(())
    } else {
        Err(Violation::CountMismatch {
            what,
            declared,
            actual,
        })
    }
}

/// Checks that the signatures account for exactly `actual` indices, so no
/// index is attached to an undeclared vertex or slot.
fn check_coverage(
    what: &'static str,
    signatures: &[IndexSpaces],
    actual: usize,
) -> Result<(), Violation> {
    let declared: usize = signatures
        .iter()
        .map(|signature| signature.creators.len() + signature.annihilators.len())
        .sum();
    if declared == actual {
        Ok(())
    } else {
        Err(Violation::CountMismatch {
            what,
            declared: i64::try_from(declared).unwrap_or(i64::MAX),
            actual,
        })
    }
}

fn index_type(value: i64) -> Result<IndexType, Violation> {
    IndexType::from_id(zero_based("index type", value)?)
        .ok_or(Violation::UnknownTypeId { value })
}

fn space(value: i64) -> Result<Space, Violation> {
    Space::from_id(zero_based("index space", value)?).ok_or(Violation::UnknownSpaceId { value })
}

fn internal_index(raw: &RawInternalIndex) -> Result<Index, Violation> {
    zero_based("arc index", raw.arc)?;
    Ok(Index::new(
        zero_based("index id", raw.id)?,
        space(raw.space)?,
        zero_based("vertex id", raw.vertex)?,
        index_type(raw.index_type)?,
    ))
}

fn external_index(position: usize, raw: &RawExternalIndex) -> Result<Index, Violation> {
    if raw.vertex != raw.vertex_duplicate {
        return Err(Violation::ResultVertexMismatch {
            position: position + 1,
            vertex: raw.vertex,
            duplicate: raw.vertex_duplicate,
        });
    }
    Ok(Index::new(
        zero_based("index id", raw.id)?,
        space(raw.space)?,
        zero_based("vertex id", raw.vertex)?,
        index_type(raw.index_type)?,
    ))
}

fn arc(raw: &RawArc) -> Result<Arc, Violation> {
    Ok(Arc {
        first_vertex: zero_based("arc vertex", raw.first_vertex)?,
        second_vertex: zero_based("arc vertex", raw.second_vertex)?,
        spaces: raw.spaces.clone(),
    })
}

/// Partitions the raw vertex positions into super-vertices.
///
/// Positions are stably sorted by association value and split into runs of
/// equal value, so vertices of one super-vertex keep their relative order.
fn group_super_vertices(
    raw: &RawContraction,
    association: &[usize],
) -> Result<Vec<Vec<usize>>, Violation> {
    let runs = (0..association.len())
        .sorted_by_key(|&vertex| association[vertex])
        .chunk_by(|&vertex| association[vertex])
        .into_iter()
        .map(|(_, run)| run.collect::<Vec<_>>())
        .collect::<Vec<_>>();
    check_count("operator", raw.num_operators, runs.len())?;
    Ok(runs)
}

/// Collects the indices of `vertex` from `pool` and orders them by `signature`.
///
/// The annihilators are reversed after ordering.
fn add_indices(
    vertex: usize,
    signature: &IndexSpaces,
    pool: &[Index],
) -> Result<IndexGroup, Violation> {
    let (creators, annihilators): (Vec<Index>, Vec<Index>) = pool
        .iter()
        .copied()
        .filter(|index| index.vertex == vertex)
        .partition(|index| index.index_type == IndexType::Creator);

    let order = |indices: &[Index], index_type: IndexType| {
        order_indices_by_space(indices, signature.spaces(index_type)).map_err(|err| match err {
            OrderingError::LengthMismatch { indices, spaces } => Violation::SignatureMismatch {
                vertex: vertex + 1,
                index_type,
                expected: spaces,
                actual: indices,
            },
            OrderingError::MissingSpace { position, space } => Violation::NoIndexOfSpace {
                vertex: vertex + 1,
                index_type,
                space,
                position: position + 1,
            },
        })
    };

    let creators = order(&creators, IndexType::Creator)?;
    let mut annihilators = order(&annihilators, IndexType::Annihilator)?;
    annihilators.reverse();

    Ok(IndexGroup::new(creators, annihilators))
}
