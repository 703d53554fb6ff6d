use std::{collections::BTreeMap, iter};

// External Crate Imports
use itertools::Itertools;
use tracing::{debug, instrument, trace};

// Local Crate Imports
use super::{HeavyLabelFilter, Lipid, PrecursorKey, PrecursorMode, PrecursorRecord, UsedKeys};
use crate::{
    catalog::lipid_database::{HeadgroupDescription, HEAVY_MARKER},
    errors::LipidError,
    FattyAcid, LipidCategory, LipidDatabase, Result,
};

/// Adduct names mapped to whether precursors should be generated with them; missing adducts are disabled
pub type EnabledAdducts = BTreeMap<String, bool>;

/// Expands lipid requests into every precursor ion that the catalogue allows
#[derive(Copy, Clone, Debug)]
pub struct PrecursorEnumerator<'a> {
    db: &'a LipidDatabase,
    enabled_adducts: &'a EnabledAdducts,
    heavy_labels: HeavyLabelFilter,
    mode: PrecursorMode,
}

impl<'a> PrecursorEnumerator<'a> {
    #[must_use]
    pub fn new(db: &'a LipidDatabase, enabled_adducts: &'a EnabledAdducts) -> Self {
        Self {
            db,
            enabled_adducts,
            heavy_labels: HeavyLabelFilter::default(),
            mode: PrecursorMode::default(),
        }
    }

    #[must_use]
    pub fn heavy_labels(self, heavy_labels: HeavyLabelFilter) -> Self {
        Self {
            heavy_labels,
            ..self
        }
    }

    #[must_use]
    pub fn mode(self, mode: PrecursorMode) -> Self {
        Self { mode, ..self }
    }

    /// Generates a record for every enabled adduct of every chain assignment of every requested headgroup and its
    /// heavy-labelled variants, skipping any precursor whose key is already in `used_keys`
    ///
    /// Records come out in request order, with each headgroup followed by its variants, then in the order of the
    /// chain candidates, and finally in the catalogue's adduct order. Every new key is added to `used_keys`, so
    /// enumerating the same request twice produces nothing the second time. When enumeration fails, `used_keys` is
    /// left exactly as it was.
    ///
    /// # Errors
    ///
    /// Fails if a headgroup isn't in the catalogue, belongs to a different category than `lipid`, or doesn't have
    /// the chain positions that `lipid` fills. Also fails if an allowed adduct is missing from the adduct table.
    #[instrument(skip_all, fields(category = %lipid.category))]
    pub fn enumerate(&self, lipid: &Lipid, used_keys: &mut UsedKeys) -> Result<Vec<PrecursorRecord>> {
        let headgroups: Vec<_> = lipid
            .headgroups
            .iter()
            .map(|base_name| {
                let headgroup = self.db.headgroup(base_name)?;
                check_request(base_name, headgroup, lipid)?;
                Ok((base_name, headgroup))
            })
            .collect::<Result<_>>()?;

        let mut records = Vec::new();
        let mut new_keys = UsedKeys::default();

        for (base_name, headgroup) in headgroups {
            let assignments = ChainAssignment::all(headgroup, lipid);
            let variants = iter::once((base_name, &headgroup.composition))
                .chain(&headgroup.heavy_variants);

            for (headgroup_name, composition) in variants {
                for assignment in &assignments {
                    let name = assignment.name(headgroup_name);
                    if !self.heavy_labels.accepts(name.contains(HEAVY_MARKER)) {
                        trace!(%name, "skipping filtered isotope variant");
                        continue;
                    }

                    let formula = *composition + *assignment.total.composition();
                    for adduct in &headgroup.adducts {
                        if !self.enabled_adducts.get(adduct).copied().unwrap_or_default() {
                            continue;
                        }

                        let key = PrecursorKey {
                            name: name.clone(),
                            adduct: adduct.clone(),
                        };
                        if used_keys.contains(&key) || new_keys.contains(&key) {
                            trace!(%name, %adduct, "skipping duplicate precursor");
                            continue;
                        }

                        let charge = self.db.adduct_charge(adduct)?;
                        let adduct_formula = self.db.apply_adduct(&formula, adduct)?;
                        let mz = adduct_formula.mz(charge)?;
                        new_keys.insert(key);

                        let fragments = match self.mode {
                            PrecursorMode::PrecursorsOnly => Vec::new(),
                            _ => headgroup.fragments(charge).to_vec(),
                        };

                        debug!(%name, %adduct, %mz, "generated precursor");
                        records.push(PrecursorRecord {
                            category: headgroup.category,
                            name: name.clone(),
                            short_name: short_name(headgroup.category, headgroup_name),
                            fatty_acids: assignment.slots(),
                            long_chain_base: assignment.long_chain_base.clone(),
                            formula,
                            adduct: adduct.clone(),
                            adduct_formula,
                            charge,
                            mz,
                            add_precursor: self.mode != PrecursorMode::FragmentsOnly,
                            fragments,
                        });
                    }
                }
            }
        }

        // NOTE: A failed call must leave `used_keys` untouched, so new keys are only merged once nothing can fail
        used_keys.extend(new_keys);
        Ok(records)
    }
}

fn check_request(name: &str, headgroup: &HeadgroupDescription, lipid: &Lipid) -> Result<()> {
    if headgroup.category != lipid.category {
        return Err(Box::new(LipidError::CategoryMismatch {
            headgroup: name.to_owned(),
            expected: lipid.category,
            found: headgroup.category,
        }));
    }

    let missing_bases = headgroup.long_chain_base == lipid.long_chain_bases.is_empty();
    if lipid.fatty_acids.len() != headgroup.fatty_acids || missing_bases {
        return Err(Box::new(LipidError::ChainSlotMismatch {
            headgroup: name.to_owned(),
            expected: headgroup.fatty_acids,
            long_chain_base: headgroup.long_chain_base,
            found: lipid.fatty_acids.len(),
        }));
    }

    Ok(())
}

// NOTE: Mediator names can list several isobaric species, like `PGE2/PGD2`, and are shortened to the first
fn short_name(category: LipidCategory, headgroup_name: &str) -> String {
    match category {
        LipidCategory::Mediator => headgroup_name
            .split('/')
            .next()
            .unwrap_or(headgroup_name)
            .to_owned(),
        _ => headgroup_name.to_owned(),
    }
}

// ---------------------------------------------------------------------------------------------------------------------

/// One way of filling every chain position of a headgroup
#[derive(Clone, Debug)]
struct ChainAssignment {
    fatty_acids: Vec<FattyAcid>,
    long_chain_base: Option<FattyAcid>,
    /// Every chain merged into one
    total: FattyAcid,
    chains: String,
}

impl ChainAssignment {
    fn new(mut fatty_acids: Vec<FattyAcid>, long_chain_base: Option<FattyAcid>, positional: bool) -> Self {
        if !positional {
            fatty_acids.sort();
        }

        let mut total = long_chain_base.clone().unwrap_or_default();
        for fatty_acid in &fatty_acids {
            total.merge(fatty_acid);
        }

        let separator = if positional { "/" } else { "_" };
        let acyl_chains = fatty_acids
            .iter()
            .filter(|fatty_acid| !fatty_acid.is_excluded())
            .map(|fatty_acid| format!("{fatty_acid:#}"))
            .join(separator);
        let chains = match &long_chain_base {
            Some(base) if acyl_chains.is_empty() => format!("{base:#}"),
            Some(base) => format!("{base:#}/{acyl_chains}"),
            None => acyl_chains,
        };

        Self {
            fatty_acids,
            long_chain_base,
            total,
            chains,
        }
    }

    fn all(headgroup: &HeadgroupDescription, lipid: &Lipid) -> Vec<Self> {
        let bases: Vec<_> = if headgroup.long_chain_base {
            lipid.long_chain_bases.iter().cloned().map(Some).collect()
        } else {
            vec![None]
        };

        let acyl_assignments: Vec<Vec<_>> = if lipid.fatty_acids.is_empty() {
            vec![Vec::new()]
        } else {
            lipid
                .fatty_acids
                .iter()
                .map(|candidates| candidates.iter().cloned())
                .multi_cartesian_product()
                .collect()
        };

        bases
            .into_iter()
            .cartesian_product(acyl_assignments)
            .map(|(base, fatty_acids)| Self::new(fatty_acids, base, lipid.positional))
            .collect()
    }

    fn name(&self, headgroup_name: &str) -> String {
        if self.chains.is_empty() {
            headgroup_name.to_owned()
        } else {
            format!("{headgroup_name} {}", self.chains)
        }
    }

    fn slots(&self) -> [Option<FattyAcid>; 4] {
        let mut slots: [Option<FattyAcid>; 4] = Default::default();
        for (slot, fatty_acid) in slots.iter_mut().zip(&self.fatty_acids) {
            if !fatty_acid.is_excluded() {
                *slot = Some(fatty_acid.clone());
            }
        }
        slots
    }
}
