//! Lipid precursor chemistry: fatty-acid algebra, headgroup catalogues, and precursor enumeration

pub mod atoms;
pub mod catalog;
pub mod errors;
pub mod lipids;
pub mod parsers;
pub mod precursors;

#[cfg(test)]
mod testing_tools;

// External Crate Imports
use derive_more::{Add, AddAssign, Display, From, Into, Neg, Sub, Sum};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// FIXME: Work on what's publicly exported / part of the API! Maybe create a prelude?
pub use catalog::lipid_database::{AdductDescription, HeadgroupDescription, LipidDatabase};
pub use errors::{LipidError, Result};
pub use lipids::chain_spec::{ChainSpec, Parity};
pub use precursors::{
    enumerator::{EnabledAdducts, PrecursorEnumerator},
    HeavyLabelFilter, Lipid, PrecursorKey, PrecursorMode, PrecursorRecord, UsedKeys,
};

// NOTE: Every type in this crate owns its data: catalogues are borrowed immutably by the enumerator, and nothing
// here hands out mutable access to shared state. The only thing a caller ever lends mutably is the `UsedKeys` set
// that deduplicates precursors across enumerator runs.

// ---------------------------------------------------------------------------------------------------------------------

/// The closed set of elements (and heavy isotopes) that lipid compositions are built from
///
/// The declaration order here is the order elements are written in when rendering a formula.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
pub enum Element {
    C,
    H,
    N,
    O,
    P,
    S,
    Na,
    C13,
    H2,
    N15,
    O18,
}

/// A signed atom count for every [`Element`], where absent elements are simply zero
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct ElementVector([i32; Element::COUNT]);

#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Default,
    Display,
    From,
    Into,
    Neg,
    Serialize,
)]
pub struct Charge(i64);

#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Default,
    Display,
    From,
    Into,
    Add,
    AddAssign,
    Sub,
    Neg,
    Sum,
    Serialize,
)]
pub struct Mass(Decimal);

#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Display, From, Into, Serialize,
)]
pub struct Mz(Decimal);

// ---------------------------------------------------------------------------------------------------------------------

/// The chemical class of a single chain, written as a one-character marker after the chain's numbers
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Serialize, Deserialize)]
pub enum ChainClass {
    /// An ester-linked acyl chain, the only class without a marker
    #[default]
    Plain,
    /// An ether-linked (plasmanyl) chain, marked `p`
    Ether,
    /// An alpha-hydroxylated chain, marked `a`
    AlphaHydroxy,
    /// A chain position that is structurally absent, marked `x`, that never contributes atoms
    Excluded,
}

/// A fatty-acyl chain, a long-chain (sphingoid) base, or the merged sum of several of them
///
/// The `composition` is always derived from the structural fields and is only ever changed alongside them, either at
/// construction or through [`FattyAcid::merge()`].
#[derive(Clone, Debug, Default)]
#[derive(Serialize, Deserialize)]
#[serde(
    into = "lipids::fatty_acid::FattyAcidFields",
    try_from = "lipids::fatty_acid::FattyAcidFields"
)]
pub struct FattyAcid {
    length: u32,
    double_bonds: u32,
    hydroxyl_count: u32,
    // NOTE: `ChainClass::Plain` is never stored here, so a plain chain has an empty suffix and merged chains collect
    // one marker per non-plain chain, in merge order
    suffix: Vec<ChainClass>,
    long_chain_base: bool,
    composition: ElementVector,
}

// ---------------------------------------------------------------------------------------------------------------------

/// The lipid categories that the precursor enumerator knows how to assemble
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LipidCategory {
    /// Lipid mediators: intact small molecules with no variable chains
    Mediator,
    Glycerolipid,
    Glycerophospholipid,
    /// Sphingolipids, built on a long-chain base
    Sphingolipid,
}

// =====================================================================================================================

pub trait Massive {
    fn monoisotopic_mass(&self) -> Mass;
}

pub trait Charged {
    fn charge(&self) -> Charge;
}

macro_rules! massive_ref_impls {
    ($($ref_type:ty),+ $(,)?) => {
        $(
            impl<T: Massive> Massive for $ref_type {
                fn monoisotopic_mass(&self) -> Mass {
                    (**self).monoisotopic_mass()
                }
            }
        )+
    };
}

massive_ref_impls!(&T, &mut T, Box<T>);

macro_rules! charged_ref_impls {
    ($($ref_type:ty),+ $(,)?) => {
        $(
            impl<T: Charged> Charged for $ref_type {
                fn charge(&self) -> Charge {
                    (**self).charge()
                }
            }
        )+
    };
}

charged_ref_impls!(&T, &mut T, Box<T>);
