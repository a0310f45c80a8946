use std::sync::{LazyLock, RwLock};

use crate::utils::ids::IdPrefixes;

pub static CONFIGURATION: LazyLock<RwLock<Configuration>> =
    LazyLock::new(|| RwLock::new(Configuration::default()));

/// Settings shared by the readers and the importer
#[derive(Clone, Debug)]
pub struct Configuration {
    /// Type prefixes used by the SBML model's identifiers
    pub prefixes: IdPrefixes,
    /// Reversibility assumed for an SBML reaction that does not declare it
    pub default_reversible: bool,
    /// Stoichiometry assumed for an SBML species reference that does not declare it
    pub default_stoichiometry: f64,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            prefixes: IdPrefixes::default(),
            default_reversible: true,
            default_stoichiometry: 1.,
        }
    }
}

impl Configuration {
    /// Snapshot of the current global configuration
    ///
    /// Falls back to the defaults if the lock was poisoned.
    pub fn current() -> Configuration {
        match CONFIGURATION.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
