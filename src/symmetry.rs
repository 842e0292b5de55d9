//! Inference of the antisymmetrizers a result tensor needs.
//!
//! External indices of one result slot that share a space but come from
//! different operator slots can be exchanged. Such indices are collected into
//! maximal groups, separately for creators and annihilators. The enumeration of
//! external indices in the export already implies a symmetrization over the
//! creators and over the annihilators of each result slot; the ratio of this
//! implied count to the required one is the prefactor a notation has to divide
//! by.

mod condensation;
mod origin;

use log::debug;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::Serialize;

use crate::contraction::{serialize_display, Contraction, Index};
use crate::error::{ContractionError, Violation};
use crate::types::IndexType;

pub use condensation::condense;
pub use origin::{IndexKey, Origin};
use origin::OriginMap;

/// The antisymmetrization groups and prefactor of one contraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symmetrization {
    creator_groups: Vec<Vec<Index>>,
    annihilator_groups: Vec<Vec<Index>>,
    #[serde(serialize_with = "serialize_display")]
    implied: BigUint,
    #[serde(serialize_with = "serialize_display")]
    required: BigUint,
}

impl Symmetrization {
    /// Creator groups, each sorted by space and id.
    #[must_use]
    pub fn creator_groups(&self) -> &[Vec<Index>] {
        &self.creator_groups
    }

    /// Annihilator groups, each sorted by space and id.
    #[must_use]
    pub fn annihilator_groups(&self) -> &[Vec<Index>] {
        &self.annihilator_groups
    }

    #[must_use]
    pub fn groups(&self, index_type: IndexType) -> &[Vec<Index>] {
        match index_type {
            IndexType::Creator => &self.creator_groups,
            IndexType::Annihilator => &self.annihilator_groups,
        }
    }

    /// Symmetrizations implied by the enumeration of the external indices.
    #[must_use]
    pub fn implied(&self) -> &BigUint {
        &self.implied
    }

    /// Symmetrizations required by the antisymmetrization groups.
    #[must_use]
    pub fn required(&self) -> &BigUint {
        &self.required
    }

    /// The factor the implied symmetrizations exceed the required ones by.
    ///
    /// Always a positive integer.
    #[must_use]
    pub fn prefactor(&self) -> BigUint {
        &self.implied / &self.required
    }
}

/// Derives the antisymmetrization groups of the result of `contraction`.
///
/// # Errors
/// Fails if an external index has no origin among the operator tensors, if a
/// result slot mixes more than two indices of one type over several spaces,
/// or if the implied symmetrizations are not a multiple of the required ones.
pub fn find_symmetrizations(contraction: &Contraction) -> Result<Symmetrization, ContractionError> {
    analyze(contraction)
        .map_err(|violation| ContractionError::new(contraction.export_number(), violation))
}

fn analyze(contraction: &Contraction) -> Result<Symmetrization, Violation> {
    let origins = OriginMap::new(contraction.tensors());
    let mut creator_pairs = Vec::new();
    let mut annihilator_pairs = Vec::new();
    let mut implied = BigUint::one();

    for (slot, group) in contraction.result().vertex_indices().iter().enumerate() {
        for index_type in [IndexType::Creator, IndexType::Annihilator] {
            let indices = group.indices(index_type);
            let located = indices
                .iter()
                .map(|index| {
                    origins
                        .find_index(index)
                        .map(|origin| (*index, origin))
                        .ok_or(Violation::OriginNotFound {
                            id: index.id,
                            space: index.space,
                            index_type,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            check_mixed_spaces(slot, index_type, indices)?;
            implied *= factorial(indices.len());

            let pairs = match index_type {
                IndexType::Creator => &mut creator_pairs,
                IndexType::Annihilator => &mut annihilator_pairs,
            };
            for (position, &(a, a_origin)) in located.iter().enumerate() {
                for &(b, b_origin) in &located[position + 1..] {
                    if a.space == b.space && a_origin != b_origin {
                        pairs.push((a, b));
                    }
                }
            }
        }
    }

    let creator_groups = sorted_groups(&creator_pairs);
    let annihilator_groups = sorted_groups(&annihilator_pairs);

    let required = creator_groups
        .iter()
        .chain(&annihilator_groups)
        .fold(BigUint::one(), |product, group| product * factorial(group.len()));

    if implied < required || !(&implied % &required).is_zero() {
        return Err(Violation::SymmetrizationRatio { implied, required });
    }

    debug!(
        contraction = contraction.export_number(),
        creator_groups = creator_groups.len(),
        annihilator_groups = annihilator_groups.len(),
        implied:% = implied,
        required:% = required;
        "Found symmetrizations"
    );

    Ok(Symmetrization {
        creator_groups,
        annihilator_groups,
        implied,
        required,
    })
}

/// Rejects slots whose indices of one type span several spaces and number
/// more than two.
fn check_mixed_spaces(
    slot: usize,
    index_type: IndexType,
    indices: &[Index],
) -> Result<(), Violation> {
    let mixed = indices
        .iter()
        .any(|index| index.space != indices[0].space);
    if mixed && indices.len() > 2 {
        Err(Violation::UnsupportedMixedSpaces {
            slot: slot + 1,
            index_type,
            count: indices.len(),
        })
    } else {
        Ok(())
    }
}

/// Condenses `pairs` and sorts members and groups by space and id.
fn sorted_groups(pairs: &[(Index, Index)]) -> Vec<Vec<Index>> {
    let mut groups = condense(pairs)
        .into_iter()
        .map(|group| {
            let mut members = group.into_iter().collect::<Vec<_>>();
            members.sort_by_key(|index| IndexKey::from(index));
            members
        })
        .collect::<Vec<_>>();
    groups.sort_by_key(|group| group.first().map(IndexKey::from));
    groups
}

fn factorial(n: usize) -> BigUint {
    (2..=n).fold(BigUint::one(), |product, k| product * BigUint::from(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::canonicalize::canonicalize;
    use crate::export::read_export;
    use crate::types::Space;

    fn contraction(text: &str) -> Contraction {
        canonicalize(&read_export(text).unwrap()[0]).unwrap()
    }

    fn labels(groups: &[Vec<Index>]) -> Vec<Vec<(Space, usize)>> {
        groups
            .iter()
            .map(|group| group.iter().map(|index| (index.space, index.id)).collect())
            .collect()
    }

    const LADDER: &str = "
[CONTR] # 1
[RESULT] R F (HH,PP)
[FACTOR] 1.0 1.0 1.0
[#VERTICES] 2 2
[SVERTEX] 1 2
[#ARCS] 1 2
[VERTICES]
 H F (HH,HH)
 T F (HH,PP)
[ARCS]
 1 2 (,HH)
[XARCS]
 1 1 (HH,)
 2 1 (,PP)
[CONTR_STRING]
 1 1 1 1 2 2 2 2
 1 1 2 2 1 1 2 2
 1 1 1 1 1 1 2 2
 T T F F F F T T
 1 1 1 1 1 1 2 2
 1 2 3 4 3 4 1 2
[RESULT_STRING]
 1 1 1 1
 1 1 2 2
 1 1 2 2
 1 1 1 1
 1 2 1 2
[END]
";

    /// `R^{ab}_{ij} += t^a_i t^b_j` with both amplitudes on separate vertices.
    const T1_SQUARED: &str = "
[CONTR] # 2
[RESULT] R F (HH,PP)
[FACTOR] 1.0 1.0 0.5
[#VERTICES] 2 2
[SVERTEX] 1 2
[#ARCS] 0 4
[VERTICES]
 T F (H,P)
 T F (H,P)
[ARCS]
[XARCS]
 1 1 (H,)
 1 1 (,P)
 2 1 (H,)
 2 1 (,P)
[CONTR_STRING]
 1 1 2 2
 1 2 1 2
 1 2 1 2
 T T T T
 1 1 1 1
 1 1 2 2
[RESULT_STRING]
 1 1 1 1
 1 1 2 2
 1 1 2 2
 1 1 1 1
 1 2 1 2
[END]
";

    #[test]
    fn ladder_needs_no_antisymmetrizer() {
        let symmetrization = find_symmetrizations(&contraction(LADDER)).unwrap();
        assert!(symmetrization.creator_groups().is_empty());
        assert!(symmetrization.annihilator_groups().is_empty());
        assert_eq!(symmetrization.implied(), &BigUint::from(4u32));
        assert_eq!(symmetrization.required(), &BigUint::one());
        assert_eq!(symmetrization.prefactor(), BigUint::from(4u32));
    }

    #[test]
    fn indices_from_distinct_vertices_pair() {
        let symmetrization = find_symmetrizations(&contraction(T1_SQUARED)).unwrap();
        assert_eq!(
            labels(symmetrization.creator_groups()),
            [[(Space::Occupied, 0), (Space::Occupied, 1)]]
        );
        assert_eq!(
            labels(symmetrization.groups(IndexType::Annihilator)),
            [[(Space::Virtual, 0), (Space::Virtual, 1)]]
        );
        assert_eq!(symmetrization.required(), &BigUint::from(4u32));
        assert_eq!(symmetrization.prefactor(), BigUint::one());
    }

    #[test]
    fn slots_of_one_super_vertex_are_distinct_origins() {
        let text = T1_SQUARED
            .replace("[SVERTEX] 1 2", "[SVERTEX] 1 1")
            .replace("[#VERTICES] 2 2", "[#VERTICES] 2 1");
        let contraction = contraction(&text);
        assert_eq!(contraction.tensors().len(), 1);

        let symmetrization = find_symmetrizations(&contraction).unwrap();
        assert_eq!(symmetrization.creator_groups().len(), 1);
        assert_eq!(symmetrization.annihilator_groups().len(), 1);
        assert_eq!(symmetrization.prefactor(), BigUint::one());
    }

    #[test]
    fn missing_origin_is_fatal() {
        // The second external creator carries an id no operator declares.
        let text = T1_SQUARED.replace(
            "[RESULT_STRING]\n 1 1 1 1\n 1 1 2 2\n 1 1 2 2\n 1 1 1 1\n 1 2 1 2",
            "[RESULT_STRING]\n 1 1 1 1\n 1 1 2 2\n 1 1 2 2\n 1 1 1 1\n 1 3 1 2",
        );
        let err = find_symmetrizations(&contraction(&text)).unwrap_err();
        assert_eq!(err.contraction, 2);
        assert_eq!(
            err.violation,
            Violation::OriginNotFound {
                id: 2,
                space: Space::Occupied,
                index_type: IndexType::Creator
            }
        );
    }

    /// Both creators of `R^{iu}` come from the same amplitude slot.
    const ACTIVE_PAIR: &str = "
[CONTR] # 3
[RESULT] R F (HV,)
[FACTOR] 1.0 1.0 1.0
[#VERTICES] 1 1
[SVERTEX] 1
[#ARCS] 0 1
[VERTICES]
 T F (HV,)
[ARCS]
[XARCS]
 1 1 (HV,)
[CONTR_STRING]
 1 1
 1 1
 1 3
 T T
 1 1
 1 1
[RESULT_STRING]
 1 1
 1 1
 1 3
 1 1
 1 1
[END]
";

    #[test]
    fn implied_count_spans_spaces_of_a_slot() {
        let symmetrization = find_symmetrizations(&contraction(ACTIVE_PAIR)).unwrap();
        assert!(symmetrization.creator_groups().is_empty());
        assert_eq!(symmetrization.implied(), &BigUint::from(2u32));
        assert_eq!(symmetrization.required(), &BigUint::one());
        assert_eq!(symmetrization.prefactor(), BigUint::from(2u32));
    }

    /// Pairs {1,3} and {2,3} without {1,2} cannot be condensed.
    const UNEVEN_TRIPLE: &str = "
[CONTR] # 5
[RESULT] R F (HHH,)
[FACTOR] 1.0 1.0 1.0
[#VERTICES] 2 2
[SVERTEX] 1 2
[#ARCS] 0 2
[VERTICES]
 T F (HH,)
 T F (H,)
[ARCS]
[XARCS]
 1 1 (HH,)
 2 1 (H,)
[CONTR_STRING]
 1 1 2
 1 1 1
 1 1 1
 T T T
 1 1 2
 1 2 3
[RESULT_STRING]
 1 1 1
 1 1 1
 1 1 1
 1 1 1
 1 2 3
[END]
";

    #[test]
    fn uneven_groups_break_the_ratio() {
        let err = find_symmetrizations(&contraction(UNEVEN_TRIPLE)).unwrap_err();
        assert_eq!(err.contraction, 5);
        assert_eq!(
            err.violation,
            Violation::SymmetrizationRatio {
                implied: BigUint::from(6u32),
                required: BigUint::from(4u32)
            }
        );
        assert_eq!(
            err.to_string(),
            "contraction 5: implied symmetrizations 6 are not an integer multiple of required symmetrizations 4"
        );
    }

    #[test]
    fn mixed_space_guard() {
        let indices = [
            Index::new(0, Space::Occupied, 0, IndexType::Creator),
            Index::new(0, Space::Active, 0, IndexType::Creator),
            Index::new(1, Space::Occupied, 0, IndexType::Creator),
        ];
        assert_eq!(check_mixed_spaces(0, IndexType::Creator, &indices[..2]), Ok(()));
        assert_eq!(
            check_mixed_spaces(0, IndexType::Creator, &indices),
            Err(Violation::UnsupportedMixedSpaces {
                slot: 1,
                index_type: IndexType::Creator,
                count: 3
            })
        );
        let same = [indices[0], indices[2], indices[0]];
        assert_eq!(check_mixed_spaces(0, IndexType::Creator, &same), Ok(()));
    }

    #[test]
    fn groups_sort_by_space_then_id() {
        let a = Index::new(4, Space::Virtual, 0, IndexType::Creator);
        let b = Index::new(1, Space::Virtual, 0, IndexType::Creator);
        let c = Index::new(3, Space::Occupied, 0, IndexType::Creator);
        let d = Index::new(2, Space::Occupied, 0, IndexType::Creator);
        let groups = sorted_groups(&[(a, b), (c, d)]);
        assert_eq!(groups, vec![vec![d, c], vec![b, a]]);
    }

    #[test]
    fn factorials() {
        assert_eq!(factorial(0), BigUint::one());
        assert_eq!(factorial(1), BigUint::one());
        assert_eq!(factorial(4), BigUint::from(24u32));
        assert_eq!(
            factorial(25),
            "15511210043330985984000000".parse::<BigUint>().unwrap()
        );
    }
}
