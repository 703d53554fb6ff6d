use std::{
    fmt::{self, Display, Formatter},
    ops::RangeInclusive,
    str::FromStr,
};

// External Crate Imports
use ahash::HashSet;
use itertools::Itertools;

// Local Crate Imports
use super::fatty_acid::{MAX_CHAIN_LENGTH, MAX_DOUBLE_BONDS, MAX_HYDROXYL_COUNT};
use crate::{
    errors::LipidError,
    parsers::{chain_spec::chain_spec, errors::final_parser},
    ChainClass, FattyAcid, Result,
};

/// Restricts the chain lengths that a [`ChainSpec`] expands to
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Parity {
    #[default]
    Any,
    Even,
    Odd,
}

/// A compact description of many candidate chains, like `14-18,20:0-2;0-1.p`
///
/// Every numeric field is a list of inclusive ranges, and the optional trailing class set lists the chain classes to
/// generate, with `.` standing in for plain chains.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ChainSpec {
    lengths: Vec<RangeInclusive<u32>>,
    double_bonds: Vec<RangeInclusive<u32>>,
    hydroxyls: Vec<RangeInclusive<u32>>,
    classes: Vec<ChainClass>,
    parity: Parity,
}

impl Parity {
    #[must_use]
    pub const fn accepts(self, length: u32) -> bool {
        match self {
            Self::Any => true,
            Self::Even => length % 2 == 0,
            Self::Odd => length % 2 == 1,
        }
    }
}

impl ChainSpec {
    /// # Errors
    ///
    /// Fails if any range reaches past the largest chain that can be constructed.
    pub fn new(
        lengths: Vec<RangeInclusive<u32>>,
        double_bonds: Vec<RangeInclusive<u32>>,
        hydroxyls: Vec<RangeInclusive<u32>>,
        classes: Vec<ChainClass>,
    ) -> Result<Self> {
        let upper_bound = |ranges: &[RangeInclusive<u32>]| {
            ranges.iter().map(|range| *range.end()).max().unwrap_or_default()
        };
        let (length, double_bonds_max, hydroxyl_count) = (
            upper_bound(&lengths),
            upper_bound(&double_bonds),
            upper_bound(&hydroxyls),
        );
        if length > MAX_CHAIN_LENGTH
            || double_bonds_max > MAX_DOUBLE_BONDS
            || hydroxyl_count > MAX_HYDROXYL_COUNT
        {
            return Err(Box::new(LipidError::ChainOutOfRange {
                length,
                double_bonds: double_bonds_max,
                hydroxyl_count,
                max_length: MAX_CHAIN_LENGTH,
                max_hydroxyls: MAX_HYDROXYL_COUNT,
            }));
        }

        Ok(Self {
            lengths,
            double_bonds,
            hydroxyls,
            classes,
            parity: Parity::Any,
        })
    }

    #[must_use]
    pub fn with_parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    /// Every distinct, feasible acyl chain described by this spec
    ///
    /// Chains come out ordered by length, then double bonds, then hydroxyls, then class. An excluded class always
    /// produces a single `0:0x` placeholder, whatever numbers it was paired with.
    #[must_use]
    pub fn fatty_acids(&self) -> Vec<FattyAcid> {
        let candidates = self.numbers().flat_map(|(length, double_bonds, hydroxyl_count)| {
            self.classes.iter().map(move |&class| match class {
                ChainClass::Excluded => FattyAcid::build(0, 0, 0, class, false),
                _ => FattyAcid::build(length, double_bonds, hydroxyl_count, class, false),
            })
        });
        deduplicate(candidates)
    }

    /// Every distinct, feasible long-chain base described by this spec, ignoring any chain classes
    #[must_use]
    pub fn long_chain_bases(&self) -> Vec<FattyAcid> {
        let candidates = self.numbers().map(|(length, double_bonds, hydroxyl_count)| {
            FattyAcid::build(length, double_bonds, hydroxyl_count, ChainClass::Plain, true)
        });
        deduplicate(candidates)
    }

    fn numbers(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        let values = |ranges: &[RangeInclusive<u32>]| ranges.iter().cloned().flatten().collect_vec();
        let lengths = values(&self.lengths);
        let double_bonds = values(&self.double_bonds);
        let hydroxyls = values(&self.hydroxyls);

        lengths
            .into_iter()
            .filter(|&length| self.parity.accepts(length))
            .cartesian_product(double_bonds)
            .cartesian_product(hydroxyls)
            .map(|((length, double_bonds), hydroxyl_count)| (length, double_bonds, hydroxyl_count))
            .filter(|&(length, double_bonds, hydroxyl_count)| {
                FattyAcid::is_feasible(length, double_bonds, hydroxyl_count)
            })
    }
}

fn deduplicate(chains: impl Iterator<Item = FattyAcid>) -> Vec<FattyAcid> {
    let mut seen = HashSet::default();
    chains.filter(|chain| seen.insert(chain.clone())).collect()
}

impl FromStr for ChainSpec {
    type Err = Box<LipidError>;

    fn from_str(s: &str) -> Result<Self> {
        final_parser(chain_spec)(s).map_err(|e| Box::new(e.into()))
    }
}

// NOTE: The parity isn't part of the notation, so it's left out here
impl Display for ChainSpec {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        fn ranges(ranges: &[RangeInclusive<u32>]) -> String {
            ranges
                .iter()
                .map(|range| {
                    if range.start() == range.end() {
                        range.start().to_string()
                    } else {
                        format!("{}-{}", range.start(), range.end())
                    }
                })
                .join(",")
        }

        write!(f, "{}:{}", ranges(&self.lengths), ranges(&self.double_bonds))?;

        if self.hydroxyls != [0..=0] {
            write!(f, ";{}", ranges(&self.hydroxyls))?;
        }

        if self.classes != [ChainClass::Plain] {
            for class in &self.classes {
                match class.marker() {
                    Some(marker) => write!(f, "{marker}")?,
                    None => write!(f, ".")?,
                }
            }
        }

        Ok(())
    }
}
