mod charge;
pub mod element;
pub mod element_vector;
mod mass;

pub use element::ELECTRON_MASS;
