use std::fmt;

use serde::{Deserialize, Serialize};

/// The orbital space an index runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Space {
    /// Hole space, written `H` in the export.
    Occupied,
    /// Particle space, written `P` in the export.
    Virtual,
    /// Partially occupied space, written `V` in the export.
    Active,
}

impl Space {
    /// Maps an export space letter to its space.
    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'H' => Some(Self::Occupied),
            'P' => Some(Self::Virtual),
            'V' => Some(Self::Active),
            _ => None,
        }
    }

    /// Maps a 0-based numeric space id to its space.
    #[must_use]
    pub fn from_id(id: usize) -> Option<Self> {
        match id {
            0 => Some(Self::Occupied),
            1 => Some(Self::Virtual),
            2 => Some(Self::Active),
            _ => None,
        }
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Space::Occupied => write!(f, "Occupied"),
            Space::Virtual => write!(f, "Virtual"),
            Space::Active => write!(f, "Active"),
        }
    }
}

/// Whether an index belongs to the upper (creator) or lower (annihilator) string
/// of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IndexType {
    Creator,
    Annihilator,
}

impl IndexType {
    /// Maps a 0-based numeric type id to its index type.
    #[must_use]
    pub fn from_id(id: usize) -> Option<Self> {
        match id {
            0 => Some(Self::Creator),
            1 => Some(Self::Annihilator),
            _ => None,
        }
    }
}

impl fmt::Display for IndexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexType::Creator => write!(f, "creator"),
            IndexType::Annihilator => write!(f, "annihilator"),
        }
    }
}

/// Position of a logical tensor among the contracted tensors of a contraction.
pub type TensorPosition = usize;
/// Position of an index group (vertex slot) within a tensor.
pub type SlotPosition = usize;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_letters() {
        assert_eq!(Space::from_letter('H'), Some(Space::Occupied));
        assert_eq!(Space::from_letter('P'), Some(Space::Virtual));
        assert_eq!(Space::from_letter('V'), Some(Space::Active));
        assert_eq!(Space::from_letter('X'), None);
        assert_eq!(Space::from_letter('h'), None);
    }

    #[test]
    fn numeric_ids() {
        assert_eq!(Space::from_id(2), Some(Space::Active));
        assert_eq!(Space::from_id(3), None);
        assert_eq!(IndexType::from_id(0), Some(IndexType::Creator));
        assert_eq!(IndexType::from_id(1), Some(IndexType::Annihilator));
        assert_eq!(IndexType::from_id(2), None);
    }

    #[test]
    fn spaces_order_like_export_ids() {
        assert!(Space::Occupied < Space::Virtual);
        assert!(Space::Virtual < Space::Active);
    }
}
