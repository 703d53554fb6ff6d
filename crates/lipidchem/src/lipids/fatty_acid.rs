use std::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
    hash::{Hash, Hasher},
    str::FromStr,
};

// External Crate Imports
use serde::{Deserialize, Serialize};
use static_assertions::const_assert;

// Local Crate Imports
use crate::{
    errors::LipidError,
    parsers::{
        errors::final_parser,
        fatty_acid::{fatty_acid, long_chain_base},
    },
    ChainClass, Element, ElementVector, FattyAcid, Result,
};

/// The longest single chain (in carbons) that can be constructed
pub const MAX_CHAIN_LENGTH: u32 = 40;
/// The most double bonds a single chain can carry
pub const MAX_DOUBLE_BONDS: u32 = 20;
/// The most hydroxyl groups a single chain can carry
pub const MAX_HYDROXYL_COUNT: u32 = 10;

const_assert!(2 * MAX_DOUBLE_BONDS <= MAX_CHAIN_LENGTH);

const DOUBLE_BOND_MODULUS: u64 = MAX_DOUBLE_BONDS as u64 + 1;
const HYDROXYL_MODULUS: u64 = MAX_HYDROXYL_COUNT as u64 + 1;

// NOTE: Every single chain packs into a distinct value below this bound
const_assert!(
    (MAX_CHAIN_LENGTH as u64 + 1) * DOUBLE_BOND_MODULUS * HYDROXYL_MODULUS < u32::MAX as u64
);

// Public API ==========================================================================================================

impl FattyAcid {
    /// Builds an acyl chain of the given `class`
    ///
    /// A chain with neither carbons nor double bonds is the additive identity: its composition is empty and it merges
    /// away without a trace. Ether and alpha-hydroxy markers are dropped from such a chain, but an excluded (`x`)
    /// marker is kept, since `0:0x` is how an absent chain position is written.
    ///
    /// # Errors
    ///
    /// Fails if any field is beyond its `MAX_*` constant, or if the chain is too short to hold its double bonds.
    pub fn new(
        length: u32,
        double_bonds: u32,
        hydroxyl_count: u32,
        class: ChainClass,
    ) -> Result<Self> {
        Self::validate(length, double_bonds, hydroxyl_count)?;
        Ok(Self::build(length, double_bonds, hydroxyl_count, class, false))
    }

    /// Builds the sphingoid long-chain base of a sphingolipid, which never has a chain class
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`FattyAcid::new()`].
    pub fn long_chain_base(length: u32, double_bonds: u32, hydroxyl_count: u32) -> Result<Self> {
        Self::validate(length, double_bonds, hydroxyl_count)?;
        Ok(Self::build(
            length,
            double_bonds,
            hydroxyl_count,
            ChainClass::Plain,
            true,
        ))
    }

    /// Builds a chain from a raw class token, like `FA`, `FAp`, `FAa`, or `FAx`
    ///
    /// The class is read from whatever follows the two-character prefix of `token`, and is ignored entirely for
    /// long-chain bases.
    ///
    /// # Errors
    ///
    /// Fails if the class marker isn't recognised, or under the same conditions as [`FattyAcid::new()`].
    pub fn from_token(
        length: u32,
        double_bonds: u32,
        hydroxyl_count: u32,
        token: &str,
        long_chain_base: bool,
    ) -> Result<Self> {
        if long_chain_base {
            Self::long_chain_base(length, double_bonds, hydroxyl_count)
        } else {
            let class = token.get(2..).unwrap_or_default().parse()?;
            Self::new(length, double_bonds, hydroxyl_count, class)
        }
    }

    /// Parses a chain written with [`FattyAcid::parse_long_chain_base()`]'s notation, like `18:1;2`
    ///
    /// # Errors
    ///
    /// Fails if `notation` isn't a valid long-chain base.
    pub fn parse_long_chain_base(notation: impl AsRef<str>) -> Result<Self> {
        final_parser(long_chain_base)(notation.as_ref()).map_err(|e| Box::new(e.into()))
    }

    /// Folds `other` into this chain, summing their fields and compositions
    ///
    /// Merging with a chain whose suffix is exactly `x` does nothing at all.
    pub fn merge(&mut self, other: &Self) {
        if other.suffix == [ChainClass::Excluded] {
            return;
        }

        self.length += other.length;
        self.double_bonds += other.double_bonds;
        self.hydroxyl_count += other.hydroxyl_count;
        self.long_chain_base |= other.long_chain_base;
        self.suffix.extend_from_slice(&other.suffix);
        self.composition += other.composition;
    }

    /// Swaps light atoms in this chain's composition for the heavy isotopes in `heavy`
    ///
    /// # Errors
    ///
    /// Fails if `heavy` isn't a valid isotope label for this chain (see [`ElementVector::label()`]).
    pub fn label(&self, heavy: &ElementVector) -> Result<Self> {
        Ok(Self {
            composition: self.composition.label(heavy)?,
            ..self.clone()
        })
    }

    /// The legacy sort order used when placing chains into lipid positions
    ///
    /// This only compares lengths, double bonds, and the suffix, and any comparison involving an excluded (`x`) chain
    /// says that `self` comes last. That means the order isn't antisymmetric when `x` chains are involved, so use
    /// [`Ord`] for sorting and deduplication.
    #[must_use]
    pub fn placement_cmp(&self, other: &Self) -> Ordering {
        if self.is_excluded() || other.is_excluded() {
            return Ordering::Greater;
        }
        self.placement_key().cmp(&other.placement_key())
    }

    #[must_use]
    pub const fn length(&self) -> u32 {
        self.length
    }

    #[must_use]
    pub const fn double_bonds(&self) -> u32 {
        self.double_bonds
    }

    #[must_use]
    pub const fn hydroxyl_count(&self) -> u32 {
        self.hydroxyl_count
    }

    #[must_use]
    pub fn suffix(&self) -> &[ChainClass] {
        &self.suffix
    }

    #[must_use]
    pub const fn is_long_chain_base(&self) -> bool {
        self.long_chain_base
    }

    #[must_use]
    pub const fn composition(&self) -> &ElementVector {
        &self.composition
    }

    /// Whether this chain marks an absent chain position
    #[must_use]
    pub fn is_excluded(&self) -> bool {
        self.suffix.first() == Some(&ChainClass::Excluded)
    }

    /// The suffix as it's written in chain notation, like `p` or, for merged chains, `pa`
    #[must_use]
    pub fn suffix_markers(&self) -> String {
        self.markers().collect()
    }
}

// Private Helper Methods ==============================================================================================

impl FattyAcid {
    fn validate(length: u32, double_bonds: u32, hydroxyl_count: u32) -> Result<()> {
        if length > MAX_CHAIN_LENGTH
            || double_bonds > MAX_DOUBLE_BONDS
            || hydroxyl_count > MAX_HYDROXYL_COUNT
        {
            return Err(Box::new(LipidError::ChainOutOfRange {
                length,
                double_bonds,
                hydroxyl_count,
                max_length: MAX_CHAIN_LENGTH,
                max_hydroxyls: MAX_HYDROXYL_COUNT,
            }));
        }

        if 2 * double_bonds > length {
            return Err(Box::new(LipidError::InfeasibleChain {
                length,
                double_bonds,
            }));
        }

        Ok(())
    }

    /// Whether a chain with these fields could be built at all
    pub(crate) fn is_feasible(length: u32, double_bonds: u32, hydroxyl_count: u32) -> bool {
        Self::validate(length, double_bonds, hydroxyl_count).is_ok()
    }

    // NOTE: Callers must have already checked that the fields pass `validate()`
    pub(crate) fn build(
        length: u32,
        double_bonds: u32,
        hydroxyl_count: u32,
        class: ChainClass,
        long_chain_base: bool,
    ) -> Self {
        let identity = length == 0 && double_bonds == 0;
        let class = match class {
            _ if long_chain_base => ChainClass::Plain,
            ChainClass::Excluded => ChainClass::Excluded,
            _ if identity => ChainClass::Plain,
            class => class,
        };

        // NOTE: Validated fields are all far below `i32::MAX`, so these casts are lossless
        #[allow(clippy::cast_possible_wrap)]
        let (c, db, oh) = (length as i32, double_bonds as i32, hydroxyl_count as i32);
        let composition = if long_chain_base {
            ElementVector::from_iter([
                (Element::C, c),
                (Element::H, 2 * (c - db) + 2),
                (Element::O, oh),
                (Element::N, 1),
            ])
        } else if identity {
            ElementVector::new()
        } else {
            // NOTE: Unlike plain acyl chains, the ether and alpha-hydroxy formulae have no baseline oxygen
            match class {
                ChainClass::Plain => ElementVector::from_iter([
                    (Element::C, c),
                    (Element::H, 2 * c - 1 - 2 * db),
                    (Element::O, 1 + oh),
                ]),
                ChainClass::Ether => ElementVector::from_iter([
                    (Element::C, c),
                    (Element::H, 2 * c - 1 - 2 * db + 2),
                    (Element::O, oh),
                ]),
                ChainClass::AlphaHydroxy => ElementVector::from_iter([
                    (Element::C, c),
                    (Element::H, (c + 1) * 2 - 1 - 2 * db),
                    (Element::O, oh),
                ]),
                ChainClass::Excluded => ElementVector::new(),
            }
        };

        Self {
            length,
            double_bonds,
            hydroxyl_count,
            suffix: class.marker().map(|_| class).into_iter().collect(),
            long_chain_base,
            composition,
        }
    }

    fn markers(&self) -> impl Iterator<Item = char> + '_ {
        self.suffix.iter().filter_map(|class| class.marker())
    }

    fn placement_key(&self) -> (u32, u32, usize, Option<char>) {
        (
            self.length,
            self.double_bonds,
            self.suffix.len(),
            self.markers().next(),
        )
    }

    fn packed_fields(&self) -> u64 {
        (u64::from(self.length) * DOUBLE_BOND_MODULUS + u64::from(self.double_bonds))
            * HYDROXYL_MODULUS
            + u64::from(self.hydroxyl_count)
    }
}

// Comparison and Hashing ==============================================================================================

// NOTE: The composition is derived from the other fields, so it's ignored here. Two chains that differ only by an
// isotope label are the same chain.
impl PartialEq for FattyAcid {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length
            && self.double_bonds == other.double_bonds
            && self.hydroxyl_count == other.hydroxyl_count
            && self.suffix == other.suffix
            && self.long_chain_base == other.long_chain_base
    }
}

impl Eq for FattyAcid {}

impl Hash for FattyAcid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.packed_fields().hash(state);
        self.suffix.hash(state);
        self.long_chain_base.hash(state);
    }
}

impl PartialOrd for FattyAcid {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// NOTE: Excluded chains always sort last, then chains are ordered by their placement key, and the remaining fields
// only break ties so that this stays a total order consistent with `Eq`
impl Ord for FattyAcid {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.is_excluded(), self.placement_key())
            .cmp(&(other.is_excluded(), other.placement_key()))
            .then_with(|| self.hydroxyl_count.cmp(&other.hydroxyl_count))
            .then_with(|| self.markers().cmp(other.markers()))
            .then_with(|| self.long_chain_base.cmp(&other.long_chain_base))
    }
}

// Parsing and Display =================================================================================================

impl FromStr for FattyAcid {
    type Err = Box<LipidError>;

    fn from_str(s: &str) -> Result<Self> {
        final_parser(fatty_acid)(s).map_err(|e| Box::new(e.into()))
    }
}

/// Writes `16:0` for acyl chains and `18:1;2` for long-chain bases, followed by a heavy-isotope tag like `{[2H]31}`
/// when the chain is labelled
///
/// The alternate format (`{:#}`) also writes any hydroxyl groups and the suffix of acyl chains, like `18:1;1p`.
impl Display for FattyAcid {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let full = f.alternate();
        write!(f, "{}:{}", self.length, self.double_bonds)?;

        if self.long_chain_base || (full && self.hydroxyl_count > 0) {
            write!(f, ";{}", self.hydroxyl_count)?;
        }

        if full && !self.long_chain_base {
            write!(f, "{}", self.suffix_markers())?;
        }

        let heavy = self.composition.heavy_isotopes();
        if !heavy.is_empty() {
            write!(f, "{{{heavy}}}")?;
        }

        Ok(())
    }
}

// Serialization =======================================================================================================

/// The named fields that a [`FattyAcid`] is serialized as, and rebuilt from
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FattyAcidFields {
    length: i64,
    double_bonds: i64,
    #[serde(default)]
    hydroxyl_count: i64,
    #[serde(default)]
    suffix: String,
    #[serde(default)]
    long_chain_base: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl From<FattyAcid> for FattyAcidFields {
    fn from(value: FattyAcid) -> Self {
        let heavy = value.composition.heavy_isotopes();
        Self {
            length: value.length.into(),
            double_bonds: value.double_bonds.into(),
            hydroxyl_count: value.hydroxyl_count.into(),
            suffix: value.suffix_markers(),
            long_chain_base: value.long_chain_base,
            label: (!heavy.is_empty()).then(|| heavy.to_string()),
        }
    }
}

impl TryFrom<FattyAcidFields> for FattyAcid {
    type Error = Box<LipidError>;

    fn try_from(fields: FattyAcidFields) -> Result<Self> {
        let length = non_negative("length", fields.length)?;
        let double_bonds = non_negative("double_bonds", fields.double_bonds)?;
        let hydroxyl_count = non_negative("hydroxyl_count", fields.hydroxyl_count)?;

        if fields.suffix.chars().count() > 1 {
            return Err(Box::new(LipidError::CompositeSuffix(fields.suffix)));
        }

        let chain = if fields.long_chain_base {
            Self::long_chain_base(length, double_bonds, hydroxyl_count)?
        } else {
            Self::new(length, double_bonds, hydroxyl_count, fields.suffix.parse()?)?
        };

        match fields.label {
            Some(label) => chain.label(&label.parse()?),
            None => Ok(chain),
        }
    }
}

fn non_negative(field: &'static str, value: i64) -> Result<u32> {
    if value < 0 {
        return Err(Box::new(LipidError::NegativeField { field, value }));
    }
    // NOTE: Anything too large for a `u32` is well past `MAX_CHAIN_LENGTH` and will be rejected by `validate()`
    Ok(u32::try_from(value).unwrap_or(u32::MAX))
}

// Module Tests ========================================================================================================
