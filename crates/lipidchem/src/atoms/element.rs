use std::fmt::{self, Display, Formatter};

// External Crate Imports
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// Local Crate Imports
use crate::{Element, Mass, Massive};

/// The rest mass of an electron, removed once per unit of positive charge when calculating an m/z
pub const ELECTRON_MASS: Decimal = dec!(0.00054857990946);

// Public API ==========================================================================================================

impl Element {
    pub const COUNT: usize = 11;

    /// Every element in formula-rendering order
    pub const ALL: [Self; Self::COUNT] = [
        Self::C,
        Self::H,
        Self::N,
        Self::O,
        Self::P,
        Self::S,
        Self::Na,
        Self::C13,
        Self::H2,
        Self::N15,
        Self::O18,
    ];

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::C => "C",
            Self::H => "H",
            Self::N => "N",
            Self::O => "O",
            Self::P => "P",
            Self::S => "S",
            Self::Na => "Na",
            Self::C13 => "[13C]",
            Self::H2 => "[2H]",
            Self::N15 => "[15N]",
            Self::O18 => "[18O]",
        }
    }

    /// Looks up a light element from its bare symbol, like `C` or `Na`
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "C" => Self::C,
            "H" => Self::H,
            "N" => Self::N,
            "O" => Self::O,
            "P" => Self::P,
            "S" => Self::S,
            "Na" => Self::Na,
            _ => return None,
        })
    }

    /// Looks up an explicit isotope, like `[13C]`
    ///
    /// The most abundant isotope of an element is the element itself, so `[12C]` is just `C`.
    #[must_use]
    pub fn from_isotope(mass_number: u32, symbol: &str) -> Option<Self> {
        Some(match (mass_number, symbol) {
            (12, "C") => Self::C,
            (1, "H") => Self::H,
            (14, "N") => Self::N,
            (16, "O") => Self::O,
            (31, "P") => Self::P,
            (32, "S") => Self::S,
            (23, "Na") => Self::Na,
            (13, "C") => Self::C13,
            (2, "H") => Self::H2,
            (15, "N") => Self::N15,
            (18, "O") => Self::O18,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn is_heavy(self) -> bool {
        matches!(self, Self::C13 | Self::H2 | Self::N15 | Self::O18)
    }

    /// The element that a heavy isotope replaces when labelling (light elements map to themselves)
    #[must_use]
    pub const fn light_isotope(self) -> Self {
        match self {
            Self::C13 => Self::C,
            Self::H2 => Self::H,
            Self::N15 => Self::N,
            Self::O18 => Self::O,
            light => light,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl Massive for Element {
    fn monoisotopic_mass(&self) -> Mass {
        let mass = match self {
            Self::C => dec!(12),
            Self::H => dec!(1.00782503207),
            Self::N => dec!(14.0030740048),
            Self::O => dec!(15.99491461956),
            Self::P => dec!(30.97376163),
            Self::S => dec!(31.97207100),
            Self::Na => dec!(22.9897692809),
            Self::C13 => dec!(13.0033548378),
            Self::H2 => dec!(2.0141017778),
            Self::N15 => dec!(15.0001088982),
            Self::O18 => dec!(17.9991610),
        };
        Mass(mass)
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// Module Tests ========================================================================================================
