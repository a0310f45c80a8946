//! This module provides the base genome used to resolve gene names into genome features
use std::fmt::{Display, Formatter};

use indexmap::{IndexMap, IndexSet};

/// Map of gene aliases to the ids of the features carrying them
pub type AliasMap = IndexMap<String, IndexSet<String>>;

/// A feature (usually a protein-encoding gene) of the base genome
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    /// Feature id, e.g. `fig|511145.183.peg.2958`
    pub id: String,
    /// Functional assignment of the feature
    pub function: Option<String>,
    /// Alternate names of the feature (locus tags, gene names, ...)
    pub aliases: Vec<String>,
}

/// Represents the genome of the organism a map was drawn for
#[derive(Clone, Debug)]
pub struct BaseGenome {
    /// Id of the genome
    pub id: String,
    /// Scientific name of the organism
    pub name: Option<String>,
    /// Features of the genome
    pub features: Vec<Feature>,
    alias_map: AliasMap,
}

impl BaseGenome {
    pub fn new(id: String, name: Option<String>, features: Vec<Feature>) -> BaseGenome {
        let mut alias_map = AliasMap::new();
        for feature in &features {
            for alias in &feature.aliases {
                alias_map
                    .entry(alias.clone())
                    .or_default()
                    .insert(feature.id.clone());
            }
        }
        BaseGenome {
            id,
            name,
            features,
            alias_map,
        }
    }

    /// A genome with no features, so that no reaction can be connected to one
    pub fn new_empty(id: &str) -> BaseGenome {
        BaseGenome::new(id.to_string(), None, Vec::new())
    }

    /// Map of every alias in the genome to the features it names
    pub fn alias_map(&self) -> &AliasMap {
        &self.alias_map
    }
}

impl Display for BaseGenome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", self.id, name),
            None => write!(f, "{}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_map_collects_features() {
        let genome = BaseGenome::new(
            "511145.183".to_string(),
            Some("Escherichia coli K-12 MG1655".to_string()),
            vec![
                Feature {
                    id: "fig|511145.183.peg.1".to_string(),
                    function: None,
                    aliases: vec!["b0001".to_string(), "thrL".to_string()],
                },
                Feature {
                    id: "fig|511145.183.peg.2".to_string(),
                    function: None,
                    aliases: vec!["b0002".to_string(), "thrL".to_string()],
                },
            ],
        );
        let aliases = genome.alias_map();
        assert_eq!(aliases.len(), 3);
        assert_eq!(
            aliases.get("thrL").unwrap().iter().collect::<Vec<_>>(),
            vec!["fig|511145.183.peg.1", "fig|511145.183.peg.2"]
        );
        assert_eq!(format!("{}", genome), "511145.183 (Escherichia coli K-12 MG1655)");
    }
}
