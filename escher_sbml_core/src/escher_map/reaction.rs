//! This module provides a struct for representing reactions drawn on (or known to) a map
use derive_builder::Builder;
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use super::rule::rule_genes;

/// Represents a reaction in an Escher map
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Reaction {
    /// Map id of the reaction, shared with the nodes and segments id space
    pub id: u64,
    /// BiGG id of the reaction (must be unique within the map's registry)
    pub bigg_id: String,
    /// Human-readable reaction name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Whether the reaction can run in reverse
    #[builder(default = "false")]
    pub reversible: bool,
    /// Gene reaction rule, e.g. `"(b2097 or b1773)"`
    #[builder(default = "None")]
    pub rule: Option<String>,
    /// Map of gene labels used in the rule to gene names
    #[builder(default = "IndexMap::new()")]
    pub aliases: IndexMap<String, String>,
    /// Metabolite stoichiometry of the reaction, negative for inputs
    #[builder(default = "IndexMap::new()")]
    pub metabolites: IndexMap<String, i32>,
    /// Layout data (label position, segments, ...) carried through unchanged
    #[builder(default = "IndexMap::new()")]
    pub layout: IndexMap<String, Value>,
}

impl Reaction {
    /// Record a gene alias for this reaction
    pub fn add_alias(&mut self, label: &str, name: &str) {
        self.aliases.insert(label.to_string(), name.to_string());
    }

    /// Add `coeff` to the stoichiometric coefficient of a metabolite
    ///
    /// A metabolite that appears on both sides ends up with the net coefficient. Sums saturate
    /// at the bounds of `i32`.
    pub fn add_stoich(&mut self, coeff: i32, metabolite: &str) {
        let total = self.metabolites.entry(metabolite.to_string()).or_insert(0);
        *total = total.saturating_add(coeff);
    }

    /// Every gene identifier this reaction mentions, either in its rule or in its aliases
    pub fn genes(&self) -> IndexSet<String> {
        let mut genes: IndexSet<String> = match &self.rule {
            Some(rule) => rule_genes(rule).into_iter().collect(),
            None => IndexSet::new(),
        };
        for (label, name) in &self.aliases {
            genes.insert(label.clone());
            genes.insert(name.clone());
        }
        genes
    }

    /// Metabolites this reaction consumes when running forward
    pub fn inputs(&self) -> impl Iterator<Item = &str> {
        self.metabolites
            .iter()
            .filter(|(_, coeff)| **coeff < 0)
            .map(|(met, _)| met.as_str())
    }

    /// Metabolites this reaction produces when running forward
    pub fn outputs(&self) -> impl Iterator<Item = &str> {
        self.metabolites
            .iter()
            .filter(|(_, coeff)| **coeff > 0)
            .map(|(met, _)| met.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stoichiometry_accumulates() {
        let mut reaction = ReactionBuilder::default()
            .id(7)
            .bigg_id("TEST".to_string())
            .build()
            .unwrap();
        reaction.add_stoich(-2, "atp_c");
        reaction.add_stoich(1, "adp_c");
        reaction.add_stoich(1, "atp_c");
        assert_eq!(reaction.metabolites.get("atp_c"), Some(&-1));
        assert_eq!(reaction.metabolites.get("adp_c"), Some(&1));
        assert_eq!(reaction.inputs().collect::<Vec<_>>(), vec!["atp_c"]);
        assert_eq!(reaction.outputs().collect::<Vec<_>>(), vec!["adp_c"]);
    }

    #[test]
    fn stoichiometry_saturates() {
        let mut reaction = ReactionBuilder::default()
            .id(7)
            .bigg_id("TEST".to_string())
            .build()
            .unwrap();
        reaction.add_stoich(i32::MAX, "h_c");
        reaction.add_stoich(i32::MAX, "h_c");
        reaction.add_stoich(i32::MIN, "h2o_c");
        reaction.add_stoich(-1, "h2o_c");
        assert_eq!(reaction.metabolites.get("h_c"), Some(&i32::MAX));
        assert_eq!(reaction.metabolites.get("h2o_c"), Some(&i32::MIN));
    }

    #[test]
    fn genes_from_rule_and_aliases() {
        let mut reaction = ReactionBuilder::default()
            .id(1)
            .bigg_id("PFK".to_string())
            .rule(Some("(b3916 or b1723)".to_string()))
            .build()
            .unwrap();
        reaction.add_alias("b3916", "pfkA");
        let genes = reaction.genes();
        assert_eq!(
            genes.into_iter().collect::<Vec<_>>(),
            vec!["b3916", "b1723", "pfkA"]
        );
    }
}
