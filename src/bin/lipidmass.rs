use lipidchem::{ElementVector, FattyAcid, LipidDatabase, Massive, Result};
use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};
use rust_decimal::Decimal;
use rustyline::DefaultEditor;
use std::{fmt::Write, sync::LazyLock};

static DB: LazyLock<LipidDatabase> = LazyLock::new(LipidDatabase::default);

fn main() {
    let mut rl = DefaultEditor::new().unwrap();
    while let Ok(line) = rl.readline("Formula or chain (with an optional adduct): ") {
        rl.add_history_entry(&line).unwrap();
        match molecule_info(&line) {
            Ok(info) => print!("{info}"),
            Err(diagnostic) => render_error(*diagnostic),
        }
    }
}

fn molecule_info(line: &str) -> Result<String> {
    let mut buf = String::new();
    let (molecule, adduct) = match line.trim().split_once(' ') {
        Some((molecule, adduct)) => (molecule, Some(adduct.trim())),
        None => (line.trim(), None),
    };

    // NOTE: Chains always contain a `:`, which never appears in a formula
    let composition: ElementVector = if molecule.contains(':') {
        let chain: FattyAcid = molecule.parse()?;
        writeln!(buf, "Chain: {chain:#}").unwrap();
        *chain.composition()
    } else {
        molecule.parse()?
    };

    writeln!(buf, "Formula: {composition}").unwrap();
    writeln!(
        buf,
        "Monoisotopic Mass: {}",
        decimal_round_workaround(composition.monoisotopic_mass(), 6)
    )
    .unwrap();

    if let Some(adduct) = adduct {
        let ion = DB.apply_adduct(&composition, adduct)?;
        let charge = DB.adduct_charge(adduct)?;
        let mz = ion.mz(charge)?;
        writeln!(buf, "Ion Formula: {ion}").unwrap();
        writeln!(buf, "Charge: {charge}").unwrap();
        writeln!(buf, "Monoisotopic m/z: {}", decimal_round_workaround(mz, 6)).unwrap();
    }

    writeln!(buf).unwrap();

    Ok(buf)
}

fn render_error(diagnostic: impl Into<Box<dyn Diagnostic + 'static>>) {
    let mut buf = String::new();
    GraphicalReportHandler::new_themed(GraphicalTheme::unicode())
        .render_report(&mut buf, diagnostic.into().as_ref())
        .unwrap();
    println!("{buf}");
}

// FIXME: Really this should be fixed in `rust_decimal`...
fn decimal_round_workaround(value: impl Into<Decimal>, decimal_points: u32) -> String {
    let value = value.into().round_dp(decimal_points);
    format!("{value}")
}
