//! This module provides the EscherMap struct, the map that imported reactions are added to
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::escher_map::genome::{AliasMap, BaseGenome};
use crate::escher_map::reaction::Reaction;

/// Represents an Escher map together with the reaction network derived from it
#[derive(Clone, Debug)]
pub struct EscherMap {
    /// Map metadata (name, id, description, schema, ...)
    pub(crate) header: IndexMap<String, Value>,
    /// Map of map ids to the reactions drawn on the map
    pub(crate) reactions: IndexMap<u64, Reaction>,
    /// Map of BiGG ids to map ids, the first drawing of a reaction wins
    registry: IndexMap<String, u64>,
    /// Map nodes, kept as raw layout data
    pub(crate) nodes: IndexMap<String, Value>,
    /// Remaining top-level sections of the map (text labels, canvas, ...)
    pub(crate) extra: IndexMap<String, Value>,
    /// Next unused id in the map's id space
    next_id: u64,
    /// Genome used to connect reactions to features
    base_genome: Rc<BaseGenome>,
    /// Map of feature ids to the BiGG ids of the reactions they take part in
    feature_reactions: IndexMap<String, IndexSet<String>>,
    /// Map of metabolites to the BiGG ids of reactions that can produce them
    producers: IndexMap<String, IndexSet<String>>,
    /// Map of metabolites to the BiGG ids of reactions that can consume them
    consumers: IndexMap<String, IndexSet<String>>,
}

impl EscherMap {
    /// Create a map with no reactions or layout
    pub fn new_empty(base_genome: BaseGenome) -> Self {
        EscherMap {
            header: IndexMap::new(),
            reactions: IndexMap::new(),
            registry: IndexMap::new(),
            nodes: IndexMap::new(),
            extra: IndexMap::new(),
            next_id: 1,
            base_genome: Rc::new(base_genome),
            feature_reactions: IndexMap::new(),
            producers: IndexMap::new(),
            consumers: IndexMap::new(),
        }
    }

    /// Assemble a map from its loaded sections
    ///
    /// Every reaction is connected to the genome and the next id is placed after every numeric
    /// id already used by reactions, segments, nodes, and text labels.
    pub(crate) fn from_parts(
        header: IndexMap<String, Value>,
        reactions: Vec<Reaction>,
        nodes: IndexMap<String, Value>,
        extra: IndexMap<String, Value>,
        base_genome: BaseGenome,
    ) -> Self {
        let mut map = EscherMap::new_empty(base_genome);
        map.header = header;
        map.reserve_ids(max_numeric_key(&nodes));
        if let Some(Value::Object(labels)) = extra.get("text_labels") {
            map.reserve_ids(max_numeric_key(labels.iter()));
        }
        map.nodes = nodes;
        map.extra = extra;
        for reaction in reactions {
            map.add_reaction(reaction);
        }
        map
    }

    /// Add a reaction drawn on the map
    ///
    /// Unlike [`EscherMap::put_reaction`] the same BiGG reaction may be drawn more than once,
    /// only the first drawing is registered under the BiGG id.
    pub fn add_reaction(&mut self, reaction: Reaction) {
        self.reserve_ids(Some(reaction.id));
        if let Some(Value::Object(segments)) = reaction.layout.get("segments") {
            self.reserve_ids(max_numeric_key(segments.iter()));
        }
        let genome = Rc::clone(&self.base_genome);
        self.connect_reaction(genome.alias_map(), &reaction);
        self.registry
            .entry(reaction.bigg_id.clone())
            .or_insert(reaction.id);
        self.reactions.insert(reaction.id, reaction);
    }

    /// Register a new reaction under its BiGG id
    ///
    /// Existing entries are never replaced.
    pub fn put_reaction(&mut self, reaction: Reaction) -> Result<(), MapError> {
        if self.registry.contains_key(&reaction.bigg_id) {
            return Err(MapError::DuplicateReaction(reaction.bigg_id));
        }
        if self.reactions.contains_key(&reaction.id) {
            return Err(MapError::DuplicateId(reaction.id));
        }
        self.reserve_ids(Some(reaction.id));
        self.registry.insert(reaction.bigg_id.clone(), reaction.id);
        self.reactions.insert(reaction.id, reaction);
        Ok(())
    }

    /// Whether a reaction with the given BiGG id is registered
    pub fn has_reaction(&self, bigg_id: &str) -> bool {
        self.registry.contains_key(bigg_id)
    }

    /// Registered reaction with the given BiGG id
    pub fn reaction(&self, bigg_id: &str) -> Option<&Reaction> {
        self.registry
            .get(bigg_id)
            .and_then(|id| self.reactions.get(id))
    }

    /// Number of distinct registered reactions
    pub fn reaction_count(&self) -> usize {
        self.registry.len()
    }

    /// All reactions of the map, including repeated drawings, in map order
    pub fn drawn_reactions(&self) -> impl Iterator<Item = &Reaction> {
        self.reactions.values()
    }

    /// Allocate a new id from the map's id space
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn reserve_ids(&mut self, used: Option<u64>) {
        if let Some(used) = used {
            if used >= self.next_id {
                self.next_id = used + 1;
            }
        }
    }

    /// Genome the map's reactions are connected to
    pub fn base_genome(&self) -> &Rc<BaseGenome> {
        &self.base_genome
    }

    /// Connect a reaction to the genome features named by its genes, and to its metabolites
    ///
    /// Genes are resolved through `alias_map`; genes the genome does not know are skipped.
    pub fn connect_reaction(&mut self, alias_map: &AliasMap, reaction: &Reaction) {
        for gene in reaction.genes() {
            if let Some(fids) = alias_map.get(&gene) {
                for fid in fids {
                    self.feature_reactions
                        .entry(fid.clone())
                        .or_default()
                        .insert(reaction.bigg_id.clone());
                }
            } else {
                debug!("Gene {} of reaction {} not found in base genome.", gene, reaction.bigg_id);
            }
        }
        self.create_reaction_network(reaction);
    }

    /// Update the metabolite indices for a reaction
    fn create_reaction_network(&mut self, reaction: &Reaction) {
        for (metabolite, coeff) in &reaction.metabolites {
            if *coeff > 0 || reaction.reversible {
                self.producers
                    .entry(metabolite.clone())
                    .or_default()
                    .insert(reaction.bigg_id.clone());
            }
            if *coeff < 0 || reaction.reversible {
                self.consumers
                    .entry(metabolite.clone())
                    .or_default()
                    .insert(reaction.bigg_id.clone());
            }
        }
    }

    /// BiGG ids of the reactions connected to a genome feature
    pub fn reactions_for_feature(&self, fid: &str) -> Option<&IndexSet<String>> {
        self.feature_reactions.get(fid)
    }

    /// BiGG ids of the reactions that can produce a metabolite
    pub fn producers_of(&self, metabolite: &str) -> Option<&IndexSet<String>> {
        self.producers.get(metabolite)
    }

    /// BiGG ids of the reactions that can consume a metabolite
    pub fn consumers_of(&self, metabolite: &str) -> Option<&IndexSet<String>> {
        self.consumers.get(metabolite)
    }
}

/// Largest key of a layout section that is a map id
fn max_numeric_key<'a, I>(section: I) -> Option<u64>
where
    I: IntoIterator<Item = (&'a String, &'a Value)>,
{
    section
        .into_iter()
        .filter_map(|(key, _)| key.parse::<u64>().ok())
        .max()
}

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Reaction {0} is already present in the map")]
    DuplicateReaction(String),
    #[error("Map id {0} is already in use")]
    DuplicateId(u64),
}
