//! Module providing the in-memory SBML model and the reader which builds it.

pub mod model;
pub mod reader;
