use thiserror::Error;

use crate::contraction::Index;
use crate::types::Space;

/// Why indices could not be ordered by a signature.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum OrderingError {
    #[error("{indices} indices cannot fill a signature of {spaces} spaces")]
    LengthMismatch { indices: usize, spaces: usize },

    /// No index of `space` was left to fill signature position `position` (0-based).
    #[error("no {space}-space index left for signature position {position}")]
    MissingSpace { position: usize, space: Space },
}

/// Reorders `indices` so that their spaces match `spaces` element for element.
///
/// Each position takes the first not yet placed index (in input order) of the
/// requested space, so indices sharing a space keep their relative order. The
/// input is left untouched and a new sequence is returned.
///
/// # Arguments
/// * `indices` - the indices of one type on one vertex
/// * `spaces` - the declared signature, of the same length as `indices`
///
/// # Errors
/// Fails if the lengths differ or if no index of a requested space is left.
///
/// # Examples
/// ```
/// # use gecco_notation::canonicalize::order_indices_by_space;
/// # use gecco_notation::contraction::Index;
/// # use gecco_notation::types::{IndexType, Space};
/// let i = Index::new(0, Space::Virtual, 0, IndexType::Creator);
/// let j = Index::new(0, Space::Occupied, 0, IndexType::Creator);
/// let ordered = order_indices_by_space(&[i, j], &[Space::Occupied, Space::Virtual]).unwrap();
/// assert_eq!(ordered, vec![j, i]);
/// ```
pub fn order_indices_by_space(
    indices: &[Index],
    spaces: &[Space],
) -> Result<Vec<Index>, OrderingError> {
    if indices.len() != spaces.len() {
        return Err(OrderingError::LengthMismatch {
            indices: indices.len(),
            spaces: spaces.len(),
        });
    }
    let mut placed = vec![false; indices.len()];
    let mut ordered = Vec::with_capacity(spaces.len());

    for (position, &space) in spaces.iter().enumerate() {
        let next = indices
            .iter()
            .zip(&placed)
            .position(|(index, &used)| !used && index.space == space)
            .ok_or(OrderingError::MissingSpace { position, space })?;
        placed[next] = true;
        ordered.push(indices[next]);
    }

    Ok(ordered)
}
