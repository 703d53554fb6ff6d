use std::{
    fmt::{self, Display, Formatter},
    iter::{zip, Sum},
    ops::{Add, AddAssign, Index, Neg, Sub, SubAssign},
    str::FromStr,
};

// External Crate Imports
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

// Local Crate Imports
use crate::{
    errors::LipidError,
    parsers::{element_vector::element_vector, errors::final_parser},
    Charge, Element, ElementVector, Mass, Massive, Mz, Result,
};

// Public API ==========================================================================================================

impl ElementVector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn get(&self, element: Element) -> i32 {
        self.0[element.index()]
    }

    /// Adds `count` atoms of `element`, or returns `None` if the new total doesn't fit in an `i32`
    #[must_use]
    pub(crate) fn checked_add_count(mut self, element: Element, count: i32) -> Option<Self> {
        let total = &mut self.0[element.index()];
        *total = total.checked_add(count)?;
        Some(self)
    }

    /// Iterates over the non-zero counts, in formula-rendering order
    pub fn iter(&self) -> impl Iterator<Item = (Element, i32)> + '_ {
        zip(Element::ALL, self.0).filter(|&(_, count)| count != 0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&count| count == 0)
    }

    /// Just the heavy-isotope part of this composition, used to tag labelled chains and headgroups
    #[must_use]
    pub fn heavy_isotopes(&self) -> Self {
        self.iter().filter(|(element, _)| element.is_heavy()).collect()
    }

    /// Swaps light atoms for the heavy isotopes listed in `heavy`, leaving every other atom untouched
    ///
    /// # Errors
    ///
    /// Fails if `heavy` contains anything other than positive counts of heavy isotopes, or if this composition
    /// doesn't contain enough light atoms to exchange.
    pub fn label(&self, heavy: &Self) -> Result<Self> {
        let mut labelled = *self;
        for (isotope, count) in heavy.iter() {
            if !isotope.is_heavy() || count < 0 {
                return Err(Box::new(LipidError::NotAnIsotopeLabel(format!(
                    "{isotope}{count}"
                ))));
            }

            let light = isotope.light_isotope();
            let available = labelled.get(light);
            if available < count {
                return Err(Box::new(LipidError::InsufficientAtoms {
                    element: light.to_string(),
                    needed: count,
                    available,
                }));
            }

            labelled.0[light.index()] -= count;
            labelled.0[isotope.index()] += count;
        }
        Ok(labelled)
    }

    /// The mass-to-charge ratio of this composition carrying `charge`, corrected for the mass of the electrons that
    /// were lost or gained while ionising
    ///
    /// This deliberately differs from the bare monoisotopic mass divided by `|charge|`: one electron mass is taken
    /// off per unit of positive charge (or added per unit of negative charge) before dividing.
    ///
    /// # Errors
    ///
    /// Fails with [`LipidError::NonIonizable`] when `charge` is zero.
    pub fn mz(&self, charge: Charge) -> Result<Mz> {
        self.monoisotopic_mass()
            .checked_mz(charge)
            .ok_or_else(|| Box::new(LipidError::NonIonizable(self.to_string())))
    }
}

impl FromStr for ElementVector {
    type Err = Box<LipidError>;

    fn from_str(s: &str) -> Result<Self> {
        final_parser(element_vector)(s).map_err(|e| Box::new(e.into()))
    }
}

impl Massive for ElementVector {
    fn monoisotopic_mass(&self) -> Mass {
        self.iter()
            .map(|(element, count)| Mass(Decimal::from(count) * element.monoisotopic_mass().0))
            .sum()
    }
}

impl Display for ElementVector {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for (element, count) in self.iter() {
            write!(f, "{element}{count}")?;
        }
        Ok(())
    }
}

// NOTE: Compositions are serialized as the same formula strings that they're displayed as
impl Serialize for ElementVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Index<Element> for ElementVector {
    type Output = i32;

    fn index(&self, element: Element) -> &Self::Output {
        &self.0[element.index()]
    }
}

impl FromIterator<(Element, i32)> for ElementVector {
    fn from_iter<T: IntoIterator<Item = (Element, i32)>>(iter: T) -> Self {
        let mut vector = Self::default();
        for (element, count) in iter {
            vector.0[element.index()] += count;
        }
        vector
    }
}

// Key-Wise Arithmetic =================================================================================================

impl AddAssign for ElementVector {
    fn add_assign(&mut self, rhs: Self) {
        for (lhs, rhs) in zip(&mut self.0, rhs.0) {
            *lhs += rhs;
        }
    }
}

impl SubAssign for ElementVector {
    fn sub_assign(&mut self, rhs: Self) {
        for (lhs, rhs) in zip(&mut self.0, rhs.0) {
            *lhs -= rhs;
        }
    }
}

impl Add for ElementVector {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl Sub for ElementVector {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self::Output {
        self -= rhs;
        self
    }
}

impl Neg for ElementVector {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(self.0.map(Neg::neg))
    }
}

impl Sum for ElementVector {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn formula(s: &str) -> ElementVector {
        s.parse().unwrap()
    }

    #[test]
    fn absent_elements_are_zero() {
        let vector = ElementVector::new();
        assert!(vector.is_empty());
        for element in Element::ALL {
            assert_eq!(vector.get(element), 0);
            assert_eq!(vector[element], 0);
        }
        assert_eq!(vector.to_string(), "");
    }

    #[test]
    fn render_in_fixed_order() {
        let vector: ElementVector = [
            (Element::O, 2),
            (Element::N, 1),
            (Element::H, 36),
            (Element::C, 18),
        ]
        .into_iter()
        .collect();
        assert_eq!(vector.to_string(), "C18H36N1O2");

        let vector: ElementVector = [
            (Element::H2, 8),
            (Element::Na, 1),
            (Element::C, 20),
            (Element::H, 24),
        ]
        .into_iter()
        .collect();
        assert_eq!(vector.to_string(), "C20H24Na1[2H]8");
    }

    #[test]
    fn parse_formulae() {
        assert_eq!(formula("C18H36NO2").to_string(), "C18H36N1O2");
        assert_eq!(formula("H2O").to_string(), "H2O1");
        assert_eq!(formula("OH2").to_string(), "H2O1");
        assert_eq!(formula("CH3COO").to_string(), "C2H3O2");
        assert_eq!(formula("C20H24[2H]8O3").to_string(), "C20H24O3[2H]8");
        assert_eq!(formula("[12C]6"), formula("C6"));
        assert!(formula("").is_empty());
        // Invalid formulae
        assert!("C0".parse::<ElementVector>().is_err());
        assert!("H02".parse::<ElementVector>().is_err());
        assert!("Au".parse::<ElementVector>().is_err());
        assert!("[14C]".parse::<ElementVector>().is_err());
        assert!("[13C".parse::<ElementVector>().is_err());
        assert!("c6".parse::<ElementVector>().is_err());
        assert!("C6 H6".parse::<ElementVector>().is_err());
    }

    #[test]
    fn counts_that_overflow_when_summed() {
        assert_eq!(formula("C2000000000C147483647").get(Element::C), i32::MAX);
        assert!("C2000000000C2000000000".parse::<ElementVector>().is_err());
        assert!("C2147483647C".parse::<ElementVector>().is_err());
    }

    #[test]
    fn key_wise_arithmetic() {
        let water = formula("H2O");
        let acid = formula("C16H32O2");
        assert_eq!((acid - water).to_string(), "C16H30O1");
        assert_eq!((acid + water).to_string(), "C16H34O3");
        assert_eq!((-water).to_string(), "H-2O-1");
        assert_eq!(acid - acid, ElementVector::new());
        assert!((water + -water).is_empty());

        let mut running = ElementVector::new();
        running += acid;
        running += water;
        running -= water;
        assert_eq!(running, acid);

        let total: ElementVector = [water, water, acid].into_iter().sum();
        assert_eq!(total.to_string(), "C16H36O4");
    }

    #[test]
    fn monoisotopic_mass() {
        assert_eq!(
            formula("H2O").monoisotopic_mass(),
            Mass(dec!(18.01056468370))
        );
        assert_eq!(
            formula("C20H32O3").monoisotopic_mass(),
            Mass(dec!(320.23514488492))
        );
        assert_eq!(ElementVector::new().monoisotopic_mass(), Mass::default());
    }

    #[test]
    fn mass_to_charge() {
        // 12-HETE, deprotonated
        let ion = formula("C20H31O3");
        assert_eq!(
            ion.mz(Charge(-1)).unwrap(),
            Mz(dec!(319.22786843275946))
        );
        // PC 16:0_18:1, protonated
        let ion = formula("C42H83NO8P");
        assert_eq!(
            ion.mz(Charge(1)).unwrap(),
            Mz(dec!(760.58508167318054))
        );
        // Not the bare mass over the charge, the electrons are accounted for
        assert_ne!(
            ion.mz(Charge(1)).unwrap(),
            Mz(dec!(760.58563025309)),
        );
        assert_eq!(ion.monoisotopic_mass(), Mass(dec!(760.58563025309)));
        // Zero charges can't be divided by
        let error = formula("C20H32O3").mz(Charge(0)).unwrap_err();
        assert_eq!(*error, LipidError::NonIonizable("C20H32O3".to_owned()));
    }

    #[test]
    fn heavy_labelling() {
        let hete = formula("C20H32O3");
        let d8 = formula("[2H]8");
        let labelled = hete.label(&d8).unwrap();
        assert_eq!(labelled.to_string(), "C20H24O3[2H]8");
        assert_eq!(labelled.heavy_isotopes(), d8);
        assert!(hete.heavy_isotopes().is_empty());
        // Labelling conserves the total number of atoms
        assert_eq!(
            labelled.iter().map(|(_, c)| c).sum::<i32>(),
            hete.iter().map(|(_, c)| c).sum::<i32>()
        );

        let carbon_13 = formula("[13C]20[18O]1");
        assert_eq!(
            hete.label(&carbon_13).unwrap().to_string(),
            "H32O2[13C]20[18O]1"
        );

        // Empty labels do nothing
        assert_eq!(hete.label(&ElementVector::new()).unwrap(), hete);
    }

    #[test]
    fn invalid_labels() {
        let hete = formula("C20H32O3");
        let error = hete.label(&formula("[15N]1")).unwrap_err();
        assert_eq!(
            *error,
            LipidError::InsufficientAtoms {
                element: "N".to_owned(),
                needed: 1,
                available: 0,
            }
        );
        let error = hete.label(&formula("Na1")).unwrap_err();
        assert_eq!(*error, LipidError::NotAnIsotopeLabel("Na1".to_owned()));
    }

    #[test]
    fn serialize_as_formula() {
        let json = serde_json::to_string(&formula("C20H24[2H]8O3")).unwrap();
        assert_eq!(json, r#""C20H24O3[2H]8""#);
        assert_eq!(serde_json::to_string(&ElementVector::new()).unwrap(), r#""""#);
    }
}
