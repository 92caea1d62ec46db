//! Schema module - Gene and run configuration types.

mod parameters;
mod run;

pub use parameters::*;
pub use run::*;
