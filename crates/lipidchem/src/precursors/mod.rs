pub mod enumerator;
mod record;

// External Crate Imports
use ahash::HashSet;
use serde::Serialize;

// Local Crate Imports
use crate::{Charge, ElementVector, FattyAcid, LipidCategory, Mz};

/// Which isotope variants of each precursor should be generated
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum HeavyLabelFilter {
    #[default]
    Any,
    LightOnly,
    HeavyOnly,
}

/// Whether generated records should be used as precursors, as sources of fragments, or both
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum PrecursorMode {
    #[default]
    Both,
    PrecursorsOnly,
    FragmentsOnly,
}

/// Identifies a precursor that has already been generated, so it's never generated twice
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct PrecursorKey {
    pub name: String,
    pub adduct: String,
}

/// Every precursor generated so far, shared between runs of the
/// [`PrecursorEnumerator`](enumerator::PrecursorEnumerator)
pub type UsedKeys = HashSet<PrecursorKey>;

/// A request for every precursor of some headgroups in a single category
///
/// Chain-bearing categories need one list of candidate chains for every fatty-acyl position of the requested
/// headgroups, and sphingolipids also need a list of candidate long-chain bases.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Lipid {
    pub category: LipidCategory,
    pub headgroups: Vec<String>,
    pub fatty_acids: Vec<Vec<FattyAcid>>,
    pub long_chain_bases: Vec<FattyAcid>,
    /// When `false`, chain assignments that only differ by the order of their chains are the same lipid
    pub positional: bool,
}

/// One ion of a lipid, ready for export
#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct PrecursorRecord {
    category: LipidCategory,
    name: String,
    short_name: String,
    fatty_acids: [Option<FattyAcid>; 4],
    long_chain_base: Option<FattyAcid>,
    formula: ElementVector,
    adduct: String,
    adduct_formula: ElementVector,
    charge: Charge,
    mz: Mz,
    add_precursor: bool,
    fragments: Vec<String>,
}

impl HeavyLabelFilter {
    #[must_use]
    pub const fn accepts(self, heavy: bool) -> bool {
        match self {
            Self::Any => true,
            Self::LightOnly => !heavy,
            Self::HeavyOnly => heavy,
        }
    }
}

impl Lipid {
    pub fn new(
        category: LipidCategory,
        headgroups: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            category,
            headgroups: headgroups.into_iter().map(Into::into).collect(),
            fatty_acids: Vec::new(),
            long_chain_bases: Vec::new(),
            positional: false,
        }
    }

    #[must_use]
    pub fn with_fatty_acids(mut self, fatty_acids: Vec<Vec<FattyAcid>>) -> Self {
        self.fatty_acids = fatty_acids;
        self
    }

    #[must_use]
    pub fn with_long_chain_bases(mut self, long_chain_bases: Vec<FattyAcid>) -> Self {
        self.long_chain_bases = long_chain_bases;
        self
    }

    #[must_use]
    pub fn positional(mut self, positional: bool) -> Self {
        self.positional = positional;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heavy_label_filter() {
        assert!(HeavyLabelFilter::Any.accepts(true));
        assert!(HeavyLabelFilter::Any.accepts(false));
        assert!(HeavyLabelFilter::LightOnly.accepts(false));
        assert!(!HeavyLabelFilter::LightOnly.accepts(true));
        assert!(HeavyLabelFilter::HeavyOnly.accepts(true));
        assert!(!HeavyLabelFilter::HeavyOnly.accepts(false));
    }

    #[test]
    fn build_requests() {
        let lipid = Lipid::new(LipidCategory::Mediator, ["12-HETE", "LTB4"]);
        assert_eq!(lipid.headgroups, ["12-HETE", "LTB4"]);
        assert!(lipid.fatty_acids.is_empty());
        assert!(!lipid.positional);

        let chains: Vec<FattyAcid> = vec!["16:0".parse().unwrap(), "18:1".parse().unwrap()];
        let lipid = Lipid::new(LipidCategory::Glycerophospholipid, vec!["PC".to_owned()])
            .with_fatty_acids(vec![chains.clone(), chains])
            .positional(true);
        assert_eq!(lipid.fatty_acids.len(), 2);
        assert!(lipid.positional);
    }
}
