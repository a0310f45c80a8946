//! Module providing the Escher map being extended, its reactions, and the base genome used to
//! connect reactions to genome features.

pub mod genome;
pub mod map;
pub mod reaction;
mod rule;
