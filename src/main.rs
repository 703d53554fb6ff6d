mod cli;

use std::{
    fs,
    io::{self, BufWriter, Write},
};

use clap::Parser;
use itertools::Itertools;
use lipidchem::{
    Charged, ChainSpec, EnabledAdducts, FattyAcid, Lipid, LipidCategory, LipidDatabase,
    PrecursorEnumerator, PrecursorRecord, UsedKeys,
};
use miette::{IntoDiagnostic, Result, WrapErr};
use rust_decimal::Decimal;
use tracing::{info, subscriber::set_global_default};
use tracing_subscriber::{EnvFilter, prelude::*, registry::Registry};

use crate::cli::{Args, OutputFormat};

const TSV_HEADER: [&str; 15] = [
    "category",
    "name",
    "short_name",
    "fatty_acid_1",
    "fatty_acid_2",
    "fatty_acid_3",
    "fatty_acid_4",
    "long_chain_base",
    "formula",
    "adduct",
    "adduct_formula",
    "charge",
    "mz",
    "add_precursor",
    "fragments",
];

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = Registry::default()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr));
    set_global_default(subscriber).into_diagnostic()?;

    let args = Args::parse();
    let db = load_database(&args)?;
    let category = LipidCategory::from(args.category);

    let chain_specs: Vec<_> = args
        .fatty_acids
        .iter()
        .map(|spec| chain_spec(spec, &args))
        .collect::<Result<_>>()?;
    let fatty_acids = chain_specs.iter().map(ChainSpec::fatty_acids).collect_vec();
    let long_chain_bases = match &args.long_chain_base {
        Some(spec) => chain_spec(spec, &args)?.long_chain_bases(),
        None => Vec::new(),
    };

    let headgroups = if args.headgroups.is_empty() {
        db.headgroups
            .iter()
            .filter(|(_, headgroup)| headgroup.category == category)
            .map(|(name, _)| name.clone())
            .collect()
    } else {
        args.headgroups.clone()
    };
    let lipids = lipid_requests(
        &db,
        category,
        headgroups,
        &fatty_acids,
        &long_chain_bases,
        args.positional,
    )?;

    let enabled_adducts: EnabledAdducts = if args.adducts.is_empty() {
        db.adducts.keys().map(|adduct| (adduct.clone(), true)).collect()
    } else {
        args.adducts.iter().map(|adduct| (adduct.clone(), true)).collect()
    };
    let enumerator = PrecursorEnumerator::new(&db, &enabled_adducts)
        .heavy_labels(args.labels.into())
        .mode(args.mode.into());

    // NOTE: Nothing is written until every precursor has been generated, so a failure never leaves partial output
    let records = generate_precursors(&enumerator, &lipids)?;

    let mut out = BufWriter::new(io::stdout().lock());
    if args.format == OutputFormat::Tsv {
        writeln!(out, "{}", TSV_HEADER.join("\t")).into_diagnostic()?;
    }
    for record in &records {
        write_record(&mut out, record, args.format)?;
    }
    out.flush().into_diagnostic()?;

    info!(precursors = records.len(), "finished generating precursors");
    Ok(())
}

fn load_database(args: &Args) -> Result<LipidDatabase> {
    let Some(path) = &args.database else {
        return Ok(LipidDatabase::default());
    };

    let kdl = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    LipidDatabase::new(path.display().to_string(), kdl)
}

fn chain_spec(spec: &str, args: &Args) -> Result<ChainSpec> {
    let spec = spec.parse::<ChainSpec>().map_err(|e| *e)?;
    Ok(spec.with_parity(args.parity.into()))
}

/// One request per headgroup, since every headgroup of a category can carry a different number of chains
fn lipid_requests(
    db: &LipidDatabase,
    category: LipidCategory,
    headgroups: Vec<String>,
    fatty_acids: &[Vec<FattyAcid>],
    long_chain_bases: &[FattyAcid],
    positional: bool,
) -> Result<Vec<Lipid>> {
    headgroups
        .into_iter()
        .map(|name| {
            let slots = db.headgroup(&name).map_err(|e| *e)?.fatty_acids;
            Ok(Lipid::new(category, [name])
                .with_fatty_acids(chain_slots(fatty_acids, slots))
                .with_long_chain_bases(long_chain_bases.to_vec())
                .positional(positional))
        })
        .collect()
}

fn generate_precursors(enumerator: &PrecursorEnumerator<'_>, lipids: &[Lipid]) -> Result<Vec<PrecursorRecord>> {
    let mut used_keys = UsedKeys::default();
    let mut records = Vec::new();
    for lipid in lipids {
        records.extend(enumerator.enumerate(lipid, &mut used_keys).map_err(|e| *e)?);
    }
    Ok(records)
}

fn chain_slots(fatty_acids: &[Vec<FattyAcid>], slots: usize) -> Vec<Vec<FattyAcid>> {
    (0..slots)
        .filter_map(|slot| fatty_acids.get(slot).or_else(|| fatty_acids.last()))
        .cloned()
        .collect()
}

fn write_record(out: &mut impl Write, record: &PrecursorRecord, format: OutputFormat) -> Result<()> {
    let written = match format {
        OutputFormat::Tsv => {
            let optional =
                |chain: Option<&FattyAcid>| chain.map(|c| format!("{c:#}")).unwrap_or_default();
            let fatty_acids = record
                .fatty_acids()
                .iter()
                .map(|chain| optional(chain.as_ref()))
                .join("\t");
            writeln!(
                out,
                "{}\t{}\t{}\t{fatty_acids}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                record.category(),
                record.name(),
                record.short_name(),
                optional(record.long_chain_base()),
                record.formula(),
                record.adduct(),
                record.adduct_formula(),
                record.charge(),
                Decimal::from(record.mz()).round_dp(6),
                record.add_precursor(),
                record.fragments().join(";"),
            )
        }
        OutputFormat::Ndjson => {
            let json = serde_json::to_string(record).into_diagnostic()?;
            writeln!(out, "{json}")
        }
    };
    written.into_diagnostic()
}
