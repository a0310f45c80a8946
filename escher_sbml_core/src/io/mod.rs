//! Module for reading and writing Escher maps and base genomes
pub mod json;
