// Standard Library Imports
use std::collections::{btree_map::Entry, BTreeMap};

// External Crate Imports
use knus::{
    span::{Span, Spanned},
    Decode,
};
use miette::{Diagnostic, LabeledSpan, NamedSource};
use thiserror::Error;
use tracing::{debug, instrument};

// Local Crate Imports
use crate::{errors::LipidError, Charge, ElementVector, LipidCategory, Result};

/// Separates a headgroup's name from the tag of one of its heavy-labelled variants, like `12-HETE{d8}`
pub const HEAVY_MARKER: char = '{';

// Public API ==========================================================================================================

/// An immutable catalogue of every adduct and headgroup that precursors can be built from
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct LipidDatabase {
    pub adducts: Adducts,
    pub headgroups: Headgroups,
}

impl LipidDatabase {
    /// Loads and validates a catalogue from the text of a KDL file
    ///
    /// # Errors
    ///
    /// Fails if `kdl_text` isn't valid KDL, doesn't match the catalogue schema, or contains entries that are
    /// chemically invalid or that reference undefined adducts. Errors point at the offending part of `kdl_text`.
    #[instrument(skip_all, fields(file_name = file_name.as_ref()))]
    pub fn new(file_name: impl AsRef<str>, kdl_text: impl AsRef<str>) -> miette::Result<Self> {
        let parsed_db: LipidDatabaseKdl = knus::parse(file_name.as_ref(), kdl_text.as_ref())?;
        let db = parsed_db
            .validate(())
            .map_err(|e| e.finalize(file_name, kdl_text))?;
        debug!(
            adducts = db.adducts.len(),
            headgroups = db.headgroups.len(),
            "loaded lipid database"
        );
        Ok(db)
    }

    /// # Errors
    ///
    /// Fails with [`LipidError::UnknownHeadgroup`] if `name` isn't in the catalogue.
    pub fn headgroup(&self, name: &str) -> Result<&HeadgroupDescription> {
        self.headgroups
            .get(name)
            .ok_or_else(|| Box::new(LipidError::unknown_headgroup(name)))
    }

    /// # Errors
    ///
    /// Fails with [`LipidError::UnknownAdduct`] if `name` isn't in the adduct table.
    pub fn adduct(&self, name: &str) -> Result<&AdductDescription> {
        self.adducts
            .get(name)
            .ok_or_else(|| Box::new(LipidError::unknown_adduct(name)))
    }

    /// Adds and removes the atoms of `adduct`, turning a neutral composition into the composition of its ion
    ///
    /// # Errors
    ///
    /// Fails with [`LipidError::UnknownAdduct`] if `adduct` isn't in the adduct table.
    pub fn apply_adduct(&self, composition: &ElementVector, adduct: &str) -> Result<ElementVector> {
        Ok(*composition + self.adduct(adduct)?.composition)
    }

    /// The charge of any ion formed with `adduct`; this leaves compositions untouched, see
    /// [`LipidDatabase::apply_adduct()`]
    ///
    /// # Errors
    ///
    /// Fails with [`LipidError::UnknownAdduct`] if `adduct` isn't in the adduct table.
    pub fn adduct_charge(&self, adduct: &str) -> Result<Charge> {
        Ok(self.adduct(adduct)?.charge)
    }
}

impl Default for LipidDatabase {
    fn default() -> Self {
        const DEFAULT_KDL: &str = include_str!("../../data/lipid_database.kdl");
        // NOTE: This is only reachable if the built-in catalogue is broken, which the tests below rule out
        Self::new("lipid_database.kdl", DEFAULT_KDL)
            .expect("the built-in lipid database failed to validate")
    }
}

impl HeadgroupDescription {
    /// The fragments expected from an ion of this headgroup, chosen by the polarity of `charge`
    #[must_use]
    pub fn fragments(&self, charge: Charge) -> &[String] {
        if charge.is_positive() {
            &self.positive_fragments
        } else {
            &self.negative_fragments
        }
    }
}

// ---------------------------------------------------------------------------------------------------------------------

pub type Adducts = BTreeMap<String, AdductDescription>;
pub type Headgroups = BTreeMap<String, HeadgroupDescription>;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct AdductDescription {
    /// The atoms gained, minus the atoms lost
    pub composition: ElementVector,
    pub charge: Charge,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct HeadgroupDescription {
    pub category: LipidCategory,
    /// The composition of the headgroup and backbone only, without any chains
    pub composition: ElementVector,
    pub fatty_acids: usize,
    pub long_chain_base: bool,
    /// Allowed adducts, in the order their precursors should be generated
    pub adducts: Vec<String>,
    /// Full variant names (like `PC{d9}`), mapped to their labelled compositions
    pub heavy_variants: BTreeMap<String, ElementVector>,
    pub positive_fragments: Vec<String>,
    pub negative_fragments: Vec<String>,
}

// KDL File Schema =====================================================================================================

#[derive(Debug, Decode)]
#[knus(span_type=Span)]
struct LipidDatabaseKdl {
    #[knus(child)]
    adducts: AdductsKdl,
    #[knus(child)]
    headgroups: HeadgroupsKdl,
}

#[derive(Debug, Decode)]
#[knus(span_type=Span)]
struct AdductsKdl {
    #[knus(children)]
    adducts: Vec<AdductKdl>,
}

#[derive(Debug, Decode)]
#[knus(span_type=Span)]
struct HeadgroupsKdl {
    #[knus(children)]
    headgroups: Vec<HeadgroupKdl>,
}

// ---------------------------------------------------------------------------------------------------------------------

#[derive(Debug, Decode)]
#[knus(span_type=Span)]
struct AdductKdl {
    #[knus(span)]
    span: Span,
    #[knus(node_name)]
    name: String,
    #[knus(property(name = "charge"))]
    charge: i64,
    #[knus(child, unwrap(argument))]
    lost: Option<ElementVectorKdl>,
    #[knus(child, unwrap(argument))]
    gained: Option<ElementVectorKdl>,
}

#[derive(Debug, Decode)]
#[knus(span_type=Span)]
struct HeadgroupKdl {
    #[knus(span)]
    span: Span,
    #[knus(node_name)]
    category: String,
    #[knus(argument)]
    name: String,
    #[knus(child, unwrap(argument))]
    composition: Option<ElementVectorKdl>,
    #[knus(child, unwrap(argument))]
    fatty_acids: Option<u32>,
    #[knus(children(name = "adduct"))]
    adducts: Vec<NameKdl>,
    #[knus(children(name = "positive-fragment"))]
    positive_fragments: Vec<NameKdl>,
    #[knus(children(name = "negative-fragment"))]
    negative_fragments: Vec<NameKdl>,
    #[knus(children(name = "heavy"))]
    heavy_variants: Vec<HeavyVariantKdl>,
}

#[derive(Debug, Decode)]
#[knus(span_type=Span)]
struct HeavyVariantKdl {
    #[knus(span)]
    span: Span,
    #[knus(argument)]
    tag: String,
    #[knus(property(name = "label"))]
    label: String,
}

#[derive(Debug, Decode)]
#[knus(span_type=Span)]
struct NameKdl {
    #[knus(span)]
    span: Span,
    #[knus(argument)]
    name: String,
}

type ElementVectorKdl = Spanned<String, Span>;

// Contextual Validation Trait  ========================================================================================

type CatalogResult<T> = std::result::Result<T, CatalogErrorKind>;

trait ValidateInto<'c, T> {
    type Context: 'c;

    fn validate(self, ctx: Self::Context) -> CatalogResult<T>;
}

// Lipid Database Validation ===========================================================================================

impl ValidateInto<'_, LipidDatabase> for LipidDatabaseKdl {
    type Context = ();

    fn validate(self, _ctx: Self::Context) -> CatalogResult<LipidDatabase> {
        let adducts = self.adducts.validate(())?;
        let headgroups = self.headgroups.validate(&adducts)?;
        Ok(LipidDatabase {
            adducts,
            headgroups,
        })
    }
}

// Validate Adducts ====================================================================================================

impl ValidateInto<'_, Adducts> for AdductsKdl {
    type Context = ();

    fn validate(self, _ctx: Self::Context) -> CatalogResult<Adducts> {
        let mut seen_adducts = BTreeMap::new();

        for adduct in self.adducts {
            let span = adduct.span;
            let (name, description) = adduct.validate(())?;
            match seen_adducts.entry(name) {
                Entry::Occupied(e) => {
                    let (name, (first_defined_at, _)) = e.remove_entry();
                    return Err(CatalogErrorKind::DuplicateAdduct(first_defined_at, span, name));
                }
                Entry::Vacant(e) => e.insert((span, description)),
            };
        }

        Ok(strip_spans(seen_adducts))
    }
}

// ---------------------------------------------------------------------------------------------------------------------

type AdductEntry = (String, AdductDescription);

impl ValidateInto<'_, AdductEntry> for AdductKdl {
    type Context = ();

    fn validate(self, _ctx: Self::Context) -> CatalogResult<AdductEntry> {
        if self.charge == 0 {
            return Err(CatalogErrorKind::NeutralAdduct(self.span, self.name));
        }

        let gained: ElementVector = self.gained.validate(())?;
        let lost: ElementVector = self.lost.validate(())?;
        Ok((
            self.name,
            AdductDescription {
                composition: gained - lost,
                charge: Charge::from(self.charge),
            },
        ))
    }
}

// Validate Headgroups =================================================================================================

impl<'a> ValidateInto<'a, Headgroups> for HeadgroupsKdl {
    type Context = &'a Adducts;

    fn validate(self, ctx: Self::Context) -> CatalogResult<Headgroups> {
        let mut seen_headgroups = BTreeMap::new();

        for headgroup in self.headgroups {
            let span = headgroup.span;
            let (name, description) = headgroup.validate(ctx)?;
            match seen_headgroups.entry(name) {
                Entry::Occupied(e) => {
                    let (name, (first_defined_at, _)) = e.remove_entry();
                    return Err(CatalogErrorKind::DuplicateHeadgroup(
                        first_defined_at,
                        span,
                        name,
                    ));
                }
                Entry::Vacant(e) => e.insert((span, description)),
            };
        }

        Ok(strip_spans(seen_headgroups))
    }
}

// ---------------------------------------------------------------------------------------------------------------------

type HeadgroupEntry = (String, HeadgroupDescription);

impl<'a> ValidateInto<'a, HeadgroupEntry> for HeadgroupKdl {
    type Context = &'a Adducts;

    fn validate(self, ctx: Self::Context) -> CatalogResult<HeadgroupEntry> {
        let Self { span, name, .. } = self;

        let category = LipidCategory::from_name(&self.category)
            .ok_or_else(|| CatalogErrorKind::UnknownCategory(span, self.category.clone()))?;

        if name.contains(['{', '}']) {
            return Err(CatalogErrorKind::HeavyMarkerInName(span, name));
        }

        // NOTE: Anything that doesn't fit in a `usize` is well outside of every category's range anyway
        let fatty_acids = usize::try_from(self.fatty_acids.unwrap_or_default()).unwrap_or(usize::MAX);
        if !category.fatty_acid_slots().contains(&fatty_acids) {
            return Err(CatalogErrorKind::FattyAcidSlots(
                span,
                name,
                category,
                fatty_acids,
            ));
        }

        let mut adducts = Vec::with_capacity(self.adducts.len());
        let mut seen_adducts = BTreeMap::new();
        for adduct in self.adducts {
            if !ctx.contains_key(&adduct.name) {
                return Err(CatalogErrorKind::UndefinedAdduct(adduct.span, adduct.name, name));
            }
            if let Some(first_defined_at) = seen_adducts.insert(adduct.name.clone(), adduct.span) {
                return Err(CatalogErrorKind::DuplicateAdduct(
                    first_defined_at,
                    adduct.span,
                    adduct.name,
                ));
            }
            adducts.push(adduct.name);
        }

        let composition: ElementVector = self.composition.validate(())?;
        let heavy_variants = self
            .heavy_variants
            .validate((name.as_str(), &composition))?;

        let names = |nodes: Vec<NameKdl>| nodes.into_iter().map(|node| node.name).collect();
        Ok((
            name,
            HeadgroupDescription {
                category,
                composition,
                fatty_acids,
                long_chain_base: category.has_long_chain_base(),
                adducts,
                heavy_variants,
                positive_fragments: names(self.positive_fragments),
                negative_fragments: names(self.negative_fragments),
            },
        ))
    }
}

// ---------------------------------------------------------------------------------------------------------------------

type HeavyVariants = BTreeMap<String, ElementVector>;

impl<'a> ValidateInto<'a, HeavyVariants> for Vec<HeavyVariantKdl> {
    type Context = (&'a str, &'a ElementVector);

    fn validate(self, (base_name, composition): Self::Context) -> CatalogResult<HeavyVariants> {
        let mut seen_variants = BTreeMap::new();

        for variant in self {
            if variant.tag.contains(['{', '}']) {
                return Err(CatalogErrorKind::HeavyMarkerInName(variant.span, variant.tag));
            }

            let labelled = variant
                .label
                .parse()
                .and_then(|label| composition.label(&label))
                .map_err(|e| CatalogErrorKind::Label(variant.span, *e))?;

            let name = format!("{base_name}{HEAVY_MARKER}{}}}", variant.tag);
            match seen_variants.entry(name) {
                Entry::Occupied(e) => {
                    let (name, (first_defined_at, _)) = e.remove_entry();
                    return Err(CatalogErrorKind::DuplicateHeavyVariant(
                        first_defined_at,
                        variant.span,
                        name,
                    ));
                }
                Entry::Vacant(e) => e.insert((variant.span, labelled)),
            };
        }

        Ok(strip_spans(seen_variants))
    }
}

// ---------------------------------------------------------------------------------------------------------------------

impl ValidateInto<'_, ElementVector> for Option<ElementVectorKdl> {
    type Context = ();

    fn validate(self, ctx: Self::Context) -> CatalogResult<ElementVector> {
        self.map_or_else(|| Ok(ElementVector::default()), |c| c.validate(ctx))
    }
}

impl ValidateInto<'_, ElementVector> for ElementVectorKdl {
    type Context = ();

    fn validate(self, _ctx: Self::Context) -> CatalogResult<ElementVector> {
        self.parse()
            .map_err(|e: Box<LipidError>| CatalogErrorKind::Composition(*self.span(), *e))
    }
}

fn strip_spans<T>(map: BTreeMap<String, (Span, T)>) -> BTreeMap<String, T> {
    map.into_iter().map(|(k, (_, v))| (k, v)).collect()
}

// Validation Error Types and Trait Implementations  ===================================================================

#[derive(Debug, Error)]
#[error("failed to validate lipid database file")]
struct CatalogError {
    kdl: NamedSource<String>,
    #[source]
    kind: CatalogErrorKind,
}

// NOTE: This is manually implemented because the list of labels is dynamic and needs to be extracted from `self.kind`
impl Diagnostic for CatalogError {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.kdl)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(self.kind.labels().into_iter().map(|(s, l)| {
            LabeledSpan::new_with_span(Some(l.to_owned()), *s)
        })))
    }

    fn diagnostic_source(&self) -> Option<&dyn Diagnostic> {
        Some(&self.kind)
    }
}

#[derive(Clone, Debug, Diagnostic, Error)]
enum CatalogErrorKind {
    #[error("the adduct {2:?} has already been defined")]
    #[diagnostic(help("adduct names must be unique, so remove or rename the duplicate"))]
    DuplicateAdduct(Span, Span, String),

    #[error("the adduct {1:?} has a charge of zero")]
    #[diagnostic(help("adducts must ionise the molecule, so give {1:?} a non-zero charge"))]
    NeutralAdduct(Span, String),

    #[error("the headgroup {2:?} has already been defined")]
    #[diagnostic(help("headgroup names must be unique, so remove or rename the duplicate"))]
    DuplicateHeadgroup(Span, Span, String),

    #[error("the lipid category {1:?} is not supported")]
    #[diagnostic(help(
        "headgroups must be one of a mediator, glycerolipid, glycerophospholipid, or sphingolipid"
    ))]
    UnknownCategory(Span, String),

    #[error("the adduct {1:?} allowed for {2:?} is undefined")]
    #[diagnostic(help("double-check for typos, or add {1:?} to the adducts section"))]
    UndefinedAdduct(Span, String, String),

    #[error("the heavy-labelled variant {2:?} has already been defined")]
    #[diagnostic(help("double-check for typos, or remove the duplicate heavy variant"))]
    DuplicateHeavyVariant(Span, Span, String),

    #[error("the name {1:?} contains a curly brace")]
    #[diagnostic(help("curly braces are reserved for marking heavy-labelled variants, so pick another name"))]
    HeavyMarkerInName(Span, String),

    #[error("the {2} {1:?} cannot carry {3} fatty acid(s)")]
    #[diagnostic(help(
        "glycerolipids carry 1 to 3 fatty acids, glycerophospholipids 1 to 4, sphingolipids up to 2, and mediators none"
    ))]
    FattyAcidSlots(Span, String, LipidCategory, usize),

    #[error("lipid database file contained an invalid chemical composition")]
    Composition(
        Span,
        #[source]
        #[diagnostic_source]
        LipidError,
    ),

    #[error("lipid database file contained an invalid heavy-isotope label")]
    Label(
        Span,
        #[source]
        #[diagnostic_source]
        LipidError,
    ),
}

impl CatalogErrorKind {
    fn labels(&self) -> Vec<(&Span, &'static str)> {
        match self {
            Self::DuplicateAdduct(s1, s2, _)
            | Self::DuplicateHeadgroup(s1, s2, _)
            | Self::DuplicateHeavyVariant(s1, s2, _) => {
                vec![(s1, "first defined here"), (s2, "then again here")]
            }
            Self::NeutralAdduct(s, _) => vec![(s, "uncharged adduct")],
            Self::UnknownCategory(s, _) => vec![(s, "unknown category")],
            Self::UndefinedAdduct(s, _, _) => vec![(s, "undefined adduct")],
            Self::HeavyMarkerInName(s, _) => vec![(s, "reserved character in name")],
            Self::FattyAcidSlots(s, _, _, _) => vec![(s, "wrong number of fatty acids")],
            Self::Composition(s, _) => vec![(s, "invalid chemical composition")],
            Self::Label(s, _) => vec![(s, "invalid isotope label")],
        }
    }

    fn finalize(self, file_name: impl AsRef<str>, kdl: impl AsRef<str>) -> CatalogError {
        let kdl = NamedSource::new(file_name, kdl.as_ref().to_owned());
        CatalogError { kdl, kind: self }
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use indoc::indoc;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{testing_tools::render_diagnostic, Mz};

    static DB: LazyLock<LipidDatabase> = LazyLock::new(LipidDatabase::default);

    fn parse_db(kdl: &str) -> std::result::Result<LipidDatabase, CatalogError> {
        let db: LipidDatabaseKdl = knus::parse("test", kdl).unwrap();
        db.validate(()).map_err(|e| e.finalize("test", kdl))
    }

    fn parse_headgroups(kdl: &str) -> CatalogResult<Headgroups> {
        let adducts: AdductsKdl = knus::parse(
            "test",
            indoc! {r#"
                "+H" charge=1 {
                    gained "H"
                }
                "-H" charge=-1 {
                    lost "H"
                }
            "#},
        )
        .unwrap();
        let adducts = adducts.validate(()).unwrap();
        let headgroups: HeadgroupsKdl = knus::parse("test", kdl).unwrap();
        headgroups.validate(&adducts)
    }

    #[test]
    fn built_in_database() {
        assert_eq!(DB.adducts.len(), 8);
        assert_eq!(DB.headgroups.len(), 11);

        let hete = DB.headgroup("12-HETE").unwrap();
        assert_eq!(hete.category, LipidCategory::Mediator);
        assert_eq!(hete.composition.to_string(), "C20H32O3");
        assert_eq!(hete.fatty_acids, 0);
        assert_eq!(hete.adducts, ["-H"]);
        assert_eq!(hete.heavy_variants["12-HETE{d8}"].to_string(), "C20H24O3[2H]8");

        let pc = DB.headgroup("PC").unwrap();
        assert_eq!(pc.category, LipidCategory::Glycerophospholipid);
        assert_eq!(pc.fatty_acids, 2);
        assert!(!pc.long_chain_base);
        assert_eq!(pc.adducts, ["+H", "+Na", "+HCOO", "+CH3COO"]);

        let ceramide = DB.headgroup("Cer").unwrap();
        assert!(ceramide.long_chain_base);
        assert!(ceramide.composition.is_empty());
        assert!(ceramide.heavy_variants.is_empty());
    }

    #[test]
    fn apply_adducts() {
        let hete = DB.headgroup("12-HETE").unwrap().composition;

        let deprotonated = DB.apply_adduct(&hete, "-H").unwrap();
        assert_eq!(deprotonated.to_string(), "C20H31O3");
        let charge = DB.adduct_charge("-H").unwrap();
        assert_eq!(charge, Charge::from(-1));
        assert_eq!(
            deprotonated.mz(charge).unwrap(),
            Mz::from(dec!(319.22786843275946))
        );

        // Adduct application and charge resolution are independent of one another
        assert_eq!(DB.adduct_charge("-H").unwrap(), charge);
        assert_eq!(hete.to_string(), "C20H32O3");

        let formate = DB.apply_adduct(&hete, "+HCOO").unwrap();
        assert_eq!(formate.to_string(), "C21H33O5");
        assert_eq!(DB.adduct_charge("+2H").unwrap(), Charge::from(2));
        assert_eq!(DB.adduct("+NH4").unwrap().composition.to_string(), "H4N1");
    }

    #[test]
    fn unknown_names() {
        let hete = DB.headgroup("12-HETE").unwrap().composition;
        let error = DB.apply_adduct(&hete, "+K").unwrap_err();
        assert_eq!(*error, LipidError::UnknownAdduct("+K".to_owned()));
        assert!(DB.adduct_charge("+K").is_err());

        let error = DB.headgroup("12-HEPE").unwrap_err();
        assert_eq!(*error, LipidError::UnknownHeadgroup("12-HEPE".to_owned()));
        // Heavy variants aren't headgroups in their own right
        assert!(DB.headgroup("12-HETE{d8}").is_err());
    }

    #[test]
    fn fragments_follow_polarity() {
        let pc = DB.headgroup("PC").unwrap();
        assert_eq!(pc.fragments(Charge::from(1)), ["HG(PC,184)"]);
        assert_eq!(pc.fragments(Charge::from(-1)), ["-CH3", "FA"]);
    }

    #[test]
    fn load_with_errors() {
        // Missing the headgroups section entirely
        assert!(LipidDatabase::new("broken.kdl", "adducts {}").is_err());

        let kdl = indoc! {r#"
            adducts {
                "+H" charge=1 {
                    gained "H"
                }
            }
            headgroups {
                mediator "12-HETE" {
                    composition "C20H32O3"
                    adduct "-H"
                }
            }
        "#};
        let error = LipidDatabase::new("broken.kdl", kdl).unwrap_err();
        assert_eq!(error.to_string(), "failed to validate lipid database file");
    }

    #[test]
    fn duplicate_adducts() {
        let kdl = indoc! {r#"
            adducts {
                "+H" charge=1 {
                    gained "H"
                }
                "+H" charge=1 {
                    gained "H2"
                }
            }
            headgroups {}
        "#};
        let error = parse_db(kdl).unwrap_err();
        assert!(matches!(error.kind, CatalogErrorKind::DuplicateAdduct(_, _, ref name) if name == "+H"));
        let report = render_diagnostic(&error);
        assert!(report.contains("first defined here"));
        assert!(report.contains("then again here"));
    }

    #[test]
    fn neutral_adducts() {
        let kdl = indoc! {r#"
            adducts {
                "+H-H" charge=0 {
                    gained "H"
                    lost "H"
                }
            }
            headgroups {}
        "#};
        let error = parse_db(kdl).unwrap_err();
        assert!(matches!(error.kind, CatalogErrorKind::NeutralAdduct(_, ref name) if name == "+H-H"));
        assert!(render_diagnostic(&error).contains("uncharged adduct"));
    }

    #[test]
    fn invalid_adduct_compositions() {
        let kdl = indoc! {r#"
            adducts {
                "+K" charge=1 {
                    gained "K"
                }
            }
            headgroups {}
        "#};
        let error = parse_db(kdl).unwrap_err();
        assert!(matches!(error.kind, CatalogErrorKind::Composition(_, LipidError::Parse { .. })));
        assert!(render_diagnostic(&error).contains("invalid chemical composition"));
    }

    #[test]
    fn headgroups_with_undefined_adducts() {
        let error = parse_headgroups(indoc! {r#"
            mediator "12-HETE" {
                composition "C20H32O3"
                adduct "-H"
                adduct "+K"
            }
        "#})
        .unwrap_err();
        assert!(matches!(
            error,
            CatalogErrorKind::UndefinedAdduct(_, ref adduct, ref headgroup)
                if adduct == "+K" && headgroup == "12-HETE"
        ));
    }

    #[test]
    fn headgroups_keep_adduct_order() {
        let headgroups = parse_headgroups(indoc! {r#"
            glycerophospholipid "PE" {
                composition "C5H12NO6P"
                fatty-acids 2
                adduct "-H"
                adduct "+H"
            }
        "#})
        .unwrap();
        assert_eq!(headgroups["PE"].adducts, ["-H", "+H"]);

        let error = parse_headgroups(indoc! {r#"
            glycerophospholipid "PE" {
                composition "C5H12NO6P"
                fatty-acids 2
                adduct "-H"
                adduct "-H"
            }
        "#})
        .unwrap_err();
        assert!(matches!(error, CatalogErrorKind::DuplicateAdduct(..)));
    }

    #[test]
    fn duplicate_headgroups() {
        let error = parse_headgroups(indoc! {r#"
            mediator "LTB4" {
                composition "C20H32O4"
            }
            mediator "LTB4" {
                composition "C20H32O4"
            }
        "#})
        .unwrap_err();
        assert!(matches!(error, CatalogErrorKind::DuplicateHeadgroup(_, _, ref name) if name == "LTB4"));
    }

    #[test]
    fn unknown_categories() {
        let error = parse_headgroups(indoc! {r#"
            sterol "CE" {
                composition "C27H45O2"
            }
        "#})
        .unwrap_err();
        assert!(matches!(error, CatalogErrorKind::UnknownCategory(_, ref name) if name == "sterol"));
    }

    #[test]
    fn fatty_acid_slots() {
        let error = parse_headgroups(indoc! {r#"
            mediator "12-HETE" {
                composition "C20H32O3"
                fatty-acids 1
            }
        "#})
        .unwrap_err();
        assert!(matches!(
            error,
            CatalogErrorKind::FattyAcidSlots(_, _, LipidCategory::Mediator, 1)
        ));
        assert_eq!(error.to_string(), r#"the mediator "12-HETE" cannot carry 1 fatty acid(s)"#);

        // Glycerolipids need at least one chain
        let error = parse_headgroups(indoc! {r#"
            glycerolipid "MG" {
                composition "C3H7O3"
            }
        "#})
        .unwrap_err();
        assert!(matches!(error, CatalogErrorKind::FattyAcidSlots(..)));
    }

    #[test]
    fn heavy_variants() {
        let headgroups = parse_headgroups(indoc! {r#"
            glycerophospholipid "PC" {
                composition "C8H18NO6P"
                fatty-acids 2
                heavy "d9" label="[2H]9"
                heavy "13C5" label="[13C]5"
            }
        "#})
        .unwrap();
        let variants: Vec<_> = headgroups["PC"]
            .heavy_variants
            .iter()
            .map(|(name, composition)| format!("{name}: {composition}"))
            .collect();
        assert_eq!(
            variants,
            ["PC{13C5}: C3H18N1O6P1[13C]5", "PC{d9}: C8H9N1O6P1[2H]9"]
        );
    }

    #[test]
    fn invalid_heavy_variants() {
        let error = parse_headgroups(indoc! {r#"
            mediator "12-HETE" {
                composition "C20H32O3"
                heavy "d8" label="[2H]8"
                heavy "d8" label="[2H]8"
            }
        "#})
        .unwrap_err();
        assert!(matches!(
            error,
            CatalogErrorKind::DuplicateHeavyVariant(_, _, ref name) if name == "12-HETE{d8}"
        ));

        let error = parse_headgroups(indoc! {r#"
            mediator "12-HETE" {
                composition "C20H32O3"
                heavy "d40" label="[2H]40"
            }
        "#})
        .unwrap_err();
        assert!(matches!(
            error,
            CatalogErrorKind::Label(_, LipidError::InsufficientAtoms { needed: 40, available: 32, .. })
        ));

        let error = parse_headgroups(indoc! {r#"
            mediator "12-HETE" {
                composition "C20H32O3"
                heavy "d8" label="H8"
            }
        "#})
        .unwrap_err();
        assert!(matches!(error, CatalogErrorKind::Label(_, LipidError::NotAnIsotopeLabel(_))));

        let error = parse_headgroups(indoc! {r#"
            mediator "12-HETE" {
                composition "C20H32O3"
                heavy "{d8}" label="[2H]8"
            }
        "#})
        .unwrap_err();
        assert!(matches!(error, CatalogErrorKind::HeavyMarkerInName(_, ref tag) if tag == "{d8}"));

        let error = parse_headgroups(indoc! {r#"
            mediator "12-HETE{d8}" {
                composition "C20H24O3[2H]8"
            }
        "#})
        .unwrap_err();
        assert!(matches!(error, CatalogErrorKind::HeavyMarkerInName(..)));
    }
}
