//! Utility modules

pub mod csv_source;
pub mod memory_source;
pub mod validation;

pub use csv_source::*;
pub use memory_source::*;
pub use validation::*;
