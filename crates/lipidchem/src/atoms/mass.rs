use rust_decimal::Decimal;

use crate::{atoms::ELECTRON_MASS, Charge, Mass, Mz};

impl Mass {
    /// Converts the mass of an ion into its m/z, returning `None` for uncharged compositions
    ///
    /// Positive ions have lost electrons and negative ions have gained them, so their mass is adjusted by one
    /// [`ELECTRON_MASS`] per unit of charge before dividing.
    pub(crate) fn checked_mz(self, charge: Charge) -> Option<Mz> {
        let charge = Decimal::from(charge.0);
        (!charge.is_zero()).then(|| Mz((self.0 - charge * ELECTRON_MASS) / charge.abs()))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn electron_correction() {
        let mass = Mass(dec!(320.23514488492));
        assert_eq!(mass.checked_mz(Charge(0)), None);
        assert_eq!(
            mass.checked_mz(Charge(1)),
            Some(Mz(dec!(320.23459630501054)))
        );
        assert_eq!(
            mass.checked_mz(Charge(-1)),
            Some(Mz(dec!(320.23569346482946)))
        );
        assert_eq!(
            mass.checked_mz(Charge(-2)),
            Some(Mz(dec!(160.11812102236946)))
        );
    }
}
