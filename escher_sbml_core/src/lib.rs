//! Core rust implementation of escher_sbml, a crate for enriching Escher metabolic maps with
//! reactions imported from SBML models.

pub mod configuration;
pub mod escher_map;
pub mod import;
pub mod io;
pub mod sbml;
pub mod utils;
