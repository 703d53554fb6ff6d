use crate::{
    Charge, Charged, ElementVector, FattyAcid, LipidCategory, Mass, Massive, Mz, PrecursorRecord,
};

impl PrecursorRecord {
    #[must_use]
    pub const fn category(&self) -> LipidCategory {
        self.category
    }

    /// The headgroup (or heavy variant) name, followed by any chains
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// The fatty-acyl chain in each position, where absent and excluded positions are `None`
    #[must_use]
    pub const fn fatty_acids(&self) -> &[Option<FattyAcid>; 4] {
        &self.fatty_acids
    }

    #[must_use]
    pub const fn long_chain_base(&self) -> Option<&FattyAcid> {
        self.long_chain_base.as_ref()
    }

    /// The composition of the neutral molecule
    #[must_use]
    pub const fn formula(&self) -> &ElementVector {
        &self.formula
    }

    #[must_use]
    pub fn adduct(&self) -> &str {
        &self.adduct
    }

    /// The composition of the ion, after the adduct has been applied
    #[must_use]
    pub const fn adduct_formula(&self) -> &ElementVector {
        &self.adduct_formula
    }

    #[must_use]
    pub const fn mz(&self) -> Mz {
        self.mz
    }

    #[must_use]
    pub const fn add_precursor(&self) -> bool {
        self.add_precursor
    }

    #[must_use]
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }
}

impl Charged for PrecursorRecord {
    fn charge(&self) -> Charge {
        self.charge
    }
}

impl Massive for PrecursorRecord {
    fn monoisotopic_mass(&self) -> Mass {
        self.adduct_formula.monoisotopic_mass()
    }
}
