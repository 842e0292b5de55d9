use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::contraction::{Index, TensorElement};
use crate::types::{IndexType, SlotPosition, Space, TensorPosition};

/// The identity of an index independent of the vertex it is attached to.
///
/// External indices live on result slots while their internal counterparts
/// live on operator vertices, so origin lookups compare these keys instead of
/// whole [`Index`] values. Keys order by space first, then id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct IndexKey {
    pub space: Space,
    pub id: usize,
    pub index_type: IndexType,
}

impl From<&Index> for IndexKey {
    fn from(index: &Index) -> Self {
        Self {
            space: index.space,
            id: index.id,
            index_type: index.index_type,
        }
    }
}

/// The tensor and slot an index is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Origin {
    pub tensor: TensorPosition,
    pub slot: SlotPosition,
}

/// Lookup table from index keys to the first tensor slot carrying them.
#[derive(Debug, Default)]
pub(super) struct OriginMap {
    origins: FxHashMap<IndexKey, Origin>,
}

impl OriginMap {
    pub fn new(tensors: &[TensorElement]) -> Self {
        let mut origins = FxHashMap::default();
        for (tensor, element) in tensors.iter().enumerate() {
            for (slot, group) in element.vertex_indices().iter().enumerate() {
                for index in group
                    .creators()
                    .iter()
                    .chain(group.annihilators().iter())
                {
                    origins
                        .entry(IndexKey::from(index))
                        .or_insert(Origin { tensor, slot });
                }
            }
        }
        Self { origins }
    }

    /// Finds the slot of the tensor carrying an index equal to `index`,
    /// ignoring the vertex the index is attached to.
    pub fn find_index(&self, index: &Index) -> Option<Origin> {
        self.origins.get(&IndexKey::from(index)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::contraction::IndexGroup;

    #[test]
    fn lookup_ignores_vertex() {
        let h = Index::new(0, Space::Occupied, 0, IndexType::Creator);
        let t = Index::new(1, Space::Occupied, 3, IndexType::Creator);
        let tensors = [
            TensorElement::new("H", vec![IndexGroup::new(vec![h], vec![])], false),
            TensorElement::new(
                "T",
                vec![
                    IndexGroup::default(),
                    IndexGroup::new(vec![t], vec![]),
                ],
                false,
            ),
        ];
        let origins = OriginMap::new(&tensors);

        let external = Index::new(1, Space::Occupied, 0, IndexType::Creator);
        assert_eq!(
            origins.find_index(&external),
            Some(Origin { tensor: 1, slot: 1 })
        );
        let external = Index::new(0, Space::Occupied, 5, IndexType::Creator);
        assert_eq!(
            origins.find_index(&external),
            Some(Origin { tensor: 0, slot: 0 })
        );
    }

    #[test]
    fn lookup_respects_type_and_space() {
        let h = Index::new(0, Space::Occupied, 0, IndexType::Creator);
        let tensors = [TensorElement::new(
            "H",
            vec![IndexGroup::new(vec![h], vec![])],
            false,
        )];
        let origins = OriginMap::new(&tensors);

        assert_eq!(
            origins.find_index(&Index::new(0, Space::Occupied, 0, IndexType::Annihilator)),
            None
        );
        assert_eq!(
            origins.find_index(&Index::new(0, Space::Virtual, 0, IndexType::Creator)),
            None
        );
    }

    #[test]
    fn keys_order_by_space_then_id() {
        let a = IndexKey::from(&Index::new(5, Space::Occupied, 0, IndexType::Creator));
        let b = IndexKey::from(&Index::new(0, Space::Virtual, 0, IndexType::Creator));
        let c = IndexKey::from(&Index::new(1, Space::Virtual, 0, IndexType::Creator));
        assert!(a < b);
        assert!(b < c);
    }
}
