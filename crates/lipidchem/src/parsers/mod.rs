pub mod chain_spec;
pub mod element_vector;
pub mod errors;
pub mod fatty_acid;
pub mod primitives;
