use miette::Diagnostic;
use thiserror::Error;

use crate::{parsers::errors::ParseError, LipidCategory};

pub type Result<T, E = Box<LipidError>> = std::result::Result<T, E>;

// FIXME: Check all of the errors returned from public API are wrapped in this!
#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum LipidError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse {
        #[from]
        error: ParseError,
    },

    #[diagnostic(help("chain fields count atoms or bonds, so they can never be negative"))]
    #[error("the chain field {field} was given the negative value {value}")]
    NegativeField { field: &'static str, value: i64 },

    #[diagnostic(help("a chain of length n can hold at most n / 2 double bonds"))]
    #[error("a chain of length {length} cannot hold {double_bonds} double bonds")]
    InfeasibleChain { length: u32, double_bonds: u32 },

    #[diagnostic(help("single chains are limited in length and hydroxylation so that they hash uniquely"))]
    #[error(
        "the chain {length}:{double_bonds};{hydroxyl_count} is outside of the supported range (at most \
        {max_length} carbons and {max_hydroxyls} hydroxyl groups)"
    )]
    ChainOutOfRange {
        length: u32,
        double_bonds: u32,
        hydroxyl_count: u32,
        max_length: u32,
        max_hydroxyls: u32,
    },

    #[diagnostic(help("chain classes are written as an empty suffix, or one of 'p', 'a', or 'x'"))]
    #[error("the chain class marker {0:?} is not recognised")]
    UnknownChainClass(String),

    #[diagnostic(help("only single chains can be rebuilt from their fields; merge them back together instead"))]
    #[error("the suffix {0:?} belongs to a merged chain and cannot be used to construct a new one")]
    CompositeSuffix(String),

    #[diagnostic(help("double-check for typos, or add a new entry to the headgroup catalogue"))]
    #[error("the headgroup {0:?} could not be found in the supplied lipid database")]
    UnknownHeadgroup(String),

    #[diagnostic(help("double-check for typos, or add a new entry to the adduct table"))]
    #[error("the adduct {0:?} could not be found in the supplied lipid database")]
    UnknownAdduct(String),

    #[diagnostic(help("only charged ions have an m/z, so apply an adduct before calculating one"))]
    #[error("the composition {0:?} carries no charge, so it is non-ionizable")]
    NonIonizable(String),

    #[diagnostic(help("isotope labels can only exchange atoms that the unlabelled composition contains"))]
    #[error("labelling requires {needed} {element} atom(s), but the composition only has {available}")]
    InsufficientAtoms {
        element: String,
        needed: i32,
        available: i32,
    },

    #[diagnostic(help("isotope labels may only contain heavy isotopes, like [13C] or [2H]"))]
    #[error("the label contains {0}, which is not a heavy isotope")]
    NotAnIsotopeLabel(String),

    #[diagnostic(help("request each lipid category separately"))]
    #[error("the headgroup {headgroup:?} is a {found}, but a {expected} was requested")]
    CategoryMismatch {
        headgroup: String,
        expected: LipidCategory,
        found: LipidCategory,
    },

    #[diagnostic(help("supply one list of candidate chains for every chain position of the headgroup"))]
    #[error(
        "the headgroup {headgroup:?} carries {expected} fatty acid(s){}, but {found} chain position(s) were supplied",
        .long_chain_base.then_some(" and a long-chain base").unwrap_or_default()
    )]
    ChainSlotMismatch {
        headgroup: String,
        expected: usize,
        long_chain_base: bool,
        found: usize,
    },
}

impl LipidError {
    pub(crate) fn unknown_headgroup(name: &str) -> Self {
        Self::UnknownHeadgroup(name.to_owned())
    }

    pub(crate) fn unknown_adduct(name: &str) -> Self {
        Self::UnknownAdduct(name.to_owned())
    }
}
