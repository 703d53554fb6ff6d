use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use lipidchem::{HeavyLabelFilter, LipidCategory, Parity, PrecursorMode};

/// Generates the precursor ions of lipids from a headgroup catalogue and compact chain specifications
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The lipid category to generate precursors for
    #[arg(short, long, value_enum)]
    pub category: Category,

    /// Headgroups to generate precursors for. Defaults to every headgroup of the category
    #[arg(short = 'g', long, value_delimiter = ',')]
    pub headgroups: Vec<String>,

    /// Adducts to generate precursors with. Defaults to every adduct allowed by each headgroup
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
    pub adducts: Vec<String>,

    /// Candidate fatty-acyl chains for each chain position, like `14-18,20:0-2;0-1.p`. Repeat once per position;
    /// positions without their own spec reuse the last one
    #[arg(short, long = "fatty-acid")]
    pub fatty_acids: Vec<String>,

    /// Candidate long-chain bases for sphingolipids, like `18:1;2`
    #[arg(short, long)]
    pub long_chain_base: Option<String>,

    /// Only generate chains with lengths of this parity
    #[arg(long, default_value_t, value_enum)]
    pub parity: ChainParity,

    /// Treat chains in different positions as different lipids
    #[arg(long, default_value_t = false)]
    pub positional: bool,

    /// Which isotope variants to generate
    #[arg(long, default_value_t, value_enum)]
    pub labels: Labels,

    /// How the generated precursors should be used downstream
    #[arg(short, long, default_value_t, value_enum)]
    pub mode: Mode,

    /// A KDL lipid database to use in place of the built-in one
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// The format to print precursors in
    #[arg(long, default_value_t, value_enum)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Category {
    Mediator,
    Glycerolipid,
    Glycerophospholipid,
    Sphingolipid,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChainParity {
    #[default]
    Any,
    Even,
    Odd,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Labels {
    #[default]
    Any,
    Light,
    Heavy,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    #[default]
    Both,
    Precursors,
    Fragments,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Tsv,
    Ndjson,
}

impl From<Category> for LipidCategory {
    fn from(category: Category) -> Self {
        match category {
            Category::Mediator => Self::Mediator,
            Category::Glycerolipid => Self::Glycerolipid,
            Category::Glycerophospholipid => Self::Glycerophospholipid,
            Category::Sphingolipid => Self::Sphingolipid,
        }
    }
}

impl From<ChainParity> for Parity {
    fn from(parity: ChainParity) -> Self {
        match parity {
            ChainParity::Any => Self::Any,
            ChainParity::Even => Self::Even,
            ChainParity::Odd => Self::Odd,
        }
    }
}

impl From<Labels> for HeavyLabelFilter {
    fn from(labels: Labels) -> Self {
        match labels {
            Labels::Any => Self::Any,
            Labels::Light => Self::LightOnly,
            Labels::Heavy => Self::HeavyOnly,
        }
    }
}

impl From<Mode> for PrecursorMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Both => Self::Both,
            Mode::Precursors => Self::PrecursorsOnly,
            Mode::Fragments => Self::FragmentsOnly,
        }
    }
}
