use std::{
    fmt::{self, Display, Formatter},
    ops::RangeInclusive,
};

use crate::LipidCategory;

impl LipidCategory {
    pub const ALL: [Self; 4] = [
        Self::Mediator,
        Self::Glycerolipid,
        Self::Glycerophospholipid,
        Self::Sphingolipid,
    ];

    /// The name used for this category in catalogue files and error messages
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mediator => "mediator",
            Self::Glycerolipid => "glycerolipid",
            Self::Glycerophospholipid => "glycerophospholipid",
            Self::Sphingolipid => "sphingolipid",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.name() == name)
    }

    /// How many fatty-acyl chains (not counting any long-chain base) a headgroup of this category may carry
    #[must_use]
    pub const fn fatty_acid_slots(self) -> RangeInclusive<usize> {
        match self {
            Self::Mediator => 0..=0,
            Self::Glycerolipid => 1..=3,
            Self::Glycerophospholipid => 1..=4,
            Self::Sphingolipid => 0..=2,
        }
    }

    #[must_use]
    pub const fn has_long_chain_base(self) -> bool {
        matches!(self, Self::Sphingolipid)
    }
}

impl Display for LipidCategory {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for category in LipidCategory::ALL {
            assert_eq!(LipidCategory::from_name(category.name()), Some(category));
            assert_eq!(category.to_string(), category.name());
        }
        assert_eq!(LipidCategory::from_name("sterol"), None);
        assert_eq!(LipidCategory::from_name("Mediator"), None);
    }

    #[test]
    fn chain_slots() {
        assert!(!LipidCategory::Mediator.fatty_acid_slots().contains(&1));
        assert!(LipidCategory::Glycerolipid.fatty_acid_slots().contains(&3));
        assert!(LipidCategory::Glycerophospholipid.fatty_acid_slots().contains(&4));
        assert!(LipidCategory::Sphingolipid.fatty_acid_slots().contains(&0));
        assert!(LipidCategory::Sphingolipid.has_long_chain_base());
        assert!(!LipidCategory::Glycerolipid.has_long_chain_base());
    }
}
