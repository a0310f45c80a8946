//! Module providing JSON IO for Escher maps and base genomes
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use thiserror::Error;
use tracing::info;

use crate::escher_map::genome::{BaseGenome, Feature};
use crate::escher_map::map::EscherMap;
use crate::escher_map::reaction::{Reaction, ReactionBuilder, ReactionBuilderError};

// region JSON Map
/// Represents a JSON serialized Escher map, `[header, body]`
#[derive(Serialize, Deserialize)]
struct JsonEscherMap(IndexMap<String, Value>, JsonMapBody);

#[derive(Serialize, Deserialize)]
struct JsonMapBody {
    #[serde(default)]
    reactions: IndexMap<String, JsonReaction>,
    #[serde(default)]
    nodes: IndexMap<String, Value>,
    /// Text labels, canvas, and anything else
    #[serde(flatten)]
    extra: IndexMap<String, Value>,
}

#[derive(Serialize, Deserialize)]
struct JsonReaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    bigg_id: String,
    #[serde(default)]
    reversibility: bool,
    #[serde(default)]
    gene_reaction_rule: String,
    #[serde(default)]
    genes: Vec<JsonGene>,
    #[serde(default)]
    metabolites: Vec<JsonStoich>,
    /// Label position, segments, and anything else
    #[serde(flatten)]
    layout: IndexMap<String, Value>,
}

#[derive(Serialize, Deserialize)]
struct JsonGene {
    bigg_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct JsonStoich {
    bigg_id: String,
    coefficient: Number,
}
// endregion JSON Map

// region JSON Genome
/// Represents a genome typed object, only the parts needed to resolve gene aliases
#[derive(Deserialize)]
struct JsonGenome {
    id: String,
    #[serde(default)]
    scientific_name: Option<String>,
    #[serde(default)]
    features: Vec<JsonFeature>,
}

#[derive(Deserialize)]
struct JsonFeature {
    id: String,
    #[serde(default)]
    function: Option<String>,
    #[serde(default)]
    aliases: Vec<String>,
    /// `[source, alias]` pairs used by newer genome files
    #[serde(default)]
    alias_pairs: Vec<(String, String)>,
}
// endregion JSON Genome

// region Conversions
impl From<JsonFeature> for Feature {
    fn from(f: JsonFeature) -> Self {
        let mut aliases = f.aliases;
        for (_, alias) in f.alias_pairs {
            if !aliases.contains(&alias) {
                aliases.push(alias);
            }
        }
        Self {
            id: f.id,
            function: f.function,
            aliases,
        }
    }
}

impl From<JsonGenome> for BaseGenome {
    fn from(g: JsonGenome) -> Self {
        let features = g.features.into_iter().map(Feature::from).collect();
        BaseGenome::new(g.id, g.scientific_name, features)
    }
}

impl JsonReaction {
    fn into_reaction(self, key: &str) -> Result<Reaction, JsonError> {
        let id = match key.parse::<u64>() {
            Ok(id) => id,
            Err(_) => return Err(JsonError::InvalidReactionId(key.to_string())),
        };
        let rule = if !self.gene_reaction_rule.is_empty() {
            Some(self.gene_reaction_rule)
        } else {
            None
        };
        let aliases: IndexMap<String, String> = self
            .genes
            .into_iter()
            .map(|g| {
                let name = g.name.unwrap_or_else(|| g.bigg_id.clone());
                (g.bigg_id, name)
            })
            .collect();
        let mut reaction = ReactionBuilder::default()
            .id(id)
            .bigg_id(self.bigg_id)
            .name(self.name)
            .reversible(self.reversibility)
            .rule(rule)
            .aliases(aliases)
            .layout(self.layout)
            .build()?;
        for stoich in self.metabolites {
            // Coefficients are whole numbers in practice, anything else is truncated
            let coeff = stoich.coefficient.as_f64().unwrap_or_default() as i32;
            reaction.add_stoich(coeff, &stoich.bigg_id);
        }
        Ok(reaction)
    }
}

impl From<&Reaction> for JsonReaction {
    fn from(r: &Reaction) -> Self {
        Self {
            name: r.name.clone(),
            bigg_id: r.bigg_id.clone(),
            reversibility: r.reversible,
            gene_reaction_rule: r.rule.clone().unwrap_or_default(),
            genes: r
                .aliases
                .iter()
                .map(|(label, name)| JsonGene {
                    bigg_id: label.clone(),
                    name: Some(name.clone()),
                })
                .collect(),
            metabolites: r
                .metabolites
                .iter()
                .map(|(met, coeff)| JsonStoich {
                    bigg_id: met.clone(),
                    coefficient: Number::from(*coeff),
                })
                .collect(),
            layout: r.layout.clone(),
        }
    }
}

impl BaseGenome {
    /// Read a genome typed object (GTO) JSON file
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<BaseGenome, JsonError> {
        let genome_str = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) => return Err(JsonError::UnableToRead(format!("{:?}", err))),
        };
        let json_genome = match serde_json::from_str::<JsonGenome>(&genome_str) {
            Ok(genome) => genome,
            Err(err) => return Err(JsonError::UnableToParse(format!("{:?}", err))),
        };
        let genome = BaseGenome::from(json_genome);
        info!(
            "Base genome {} loaded from {}.",
            genome,
            path.as_ref().display()
        );
        Ok(genome)
    }
}

impl EscherMap {
    /// Read an Escher map JSON file, connecting its reactions to `base_genome`
    pub fn read_json<P: AsRef<Path>>(path: P, base_genome: BaseGenome) -> Result<EscherMap, JsonError> {
        let map_str = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) => return Err(JsonError::UnableToRead(format!("{:?}", err))),
        };
        let json_map = match serde_json::from_str::<JsonEscherMap>(&map_str) {
            Ok(map) => map,
            Err(err) => return Err(JsonError::UnableToParse(format!("{:?}", err))),
        };
        let map = EscherMap::from_json(json_map, base_genome)?;
        info!(
            "{} reactions read from map {}.",
            map.reaction_count(),
            path.as_ref().display()
        );
        Ok(map)
    }

    /// Write the map as Escher map JSON
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), JsonError> {
        let json_map = self.to_json();
        let map_string = serde_json::to_string(&json_map)?;
        fs::write(path, map_string)?;
        Ok(())
    }

    fn from_json(json_map: JsonEscherMap, base_genome: BaseGenome) -> Result<Self, JsonError> {
        let JsonEscherMap(header, body) = json_map;
        let mut reactions = Vec::with_capacity(body.reactions.len());
        for (key, rxn) in body.reactions {
            reactions.push(rxn.into_reaction(&key)?);
        }
        Ok(EscherMap::from_parts(
            header,
            reactions,
            body.nodes,
            body.extra,
            base_genome,
        ))
    }

    fn to_json(&self) -> JsonEscherMap {
        let reactions = self
            .reactions
            .iter()
            .map(|(id, r)| (id.to_string(), JsonReaction::from(r)))
            .collect();
        JsonEscherMap(
            self.header.clone(),
            JsonMapBody {
                reactions,
                nodes: self.nodes.clone(),
                extra: self.extra.clone(),
            },
        )
    }
}

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Unable to read file due to {0}")]
    UnableToRead(String),
    #[error("Unable to parse json due to {0}")]
    UnableToParse(String),
    #[error("Reaction key {0} is not a map id")]
    InvalidReactionId(String),
    #[error("Unable to build reaction")]
    UnableToBuildReaction(#[from] ReactionBuilderError),
    #[error("Serde json parse error")]
    SerdeJsonParseError(#[from] serde_json::Error),
    #[error("Unable to write to file")]
    UnableToWrite(#[from] std::io::Error),
}
// endregion Conversions
