mod chain_class;
pub mod chain_spec;
pub mod fatty_acid;
