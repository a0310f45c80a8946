//! Module for importing the reactions of an SBML model into an Escher map
//!
//! The import only adds reactions: anything already registered in the map (by BiGG id) is
//! skipped, and no layout is created for the new reactions. The result is good enough for the
//! analysis of pathways, not for drawing.
//!
//! The whole pass runs against a copy of the map, which replaces the original only once every
//! reaction has been imported, so a failed import leaves the map untouched.
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, info};

use crate::configuration::Configuration;
use crate::escher_map::map::{EscherMap, MapError};
use crate::escher_map::reaction::ReactionBuilderError;
use crate::sbml::model::ForeignModel;
use crate::utils::ids::{IdKind, IdPrefixes};

pub mod reaction;
pub mod rule;

use reaction::{add_stoich, build_reaction};

impl EscherMap {
    /// Import the reactions of an SBML model, using the globally configured id prefixes
    ///
    /// # Returns
    /// The number of reactions added to the map
    pub fn import_sbml<M: ForeignModel + ?Sized>(&mut self, model: &M) -> Result<usize, ImportError> {
        let prefixes = Configuration::current().prefixes;
        self.import_sbml_with(model, &prefixes)
    }

    /// Import the reactions of an SBML model whose identifiers use the given prefixes
    ///
    /// # Returns
    /// The number of reactions added to the map
    pub fn import_sbml_with<M: ForeignModel + ?Sized>(
        &mut self,
        model: &M,
        prefixes: &IdPrefixes,
    ) -> Result<usize, ImportError> {
        let mut scratch = self.clone();
        let genome = Rc::clone(scratch.base_genome());
        let alias_map = genome.alias_map();
        let mut new_reaction_count = 0;
        let reaction_count = model.reaction_count();
        for index in 0..reaction_count {
            let Some(foreign) = model.reaction(index) else {
                return Err(ImportError::MissingForeignReaction {
                    index,
                    count: reaction_count,
                });
            };
            let bigg_id = prefixes.normalize_for_display(IdKind::Reaction, &foreign.id);
            if scratch.has_reaction(bigg_id) {
                debug!("Reaction {} is already in the map.", bigg_id);
                continue;
            }
            let reaction_id = scratch.next_id();
            let mut reaction = build_reaction(foreign, reaction_id, model, prefixes)?;
            foreign
                .reactants
                .iter()
                .for_each(|x| add_stoich(&mut reaction, x, -1, prefixes));
            foreign
                .products
                .iter()
                .for_each(|x| add_stoich(&mut reaction, x, 1, prefixes));
            scratch.connect_reaction(alias_map, &reaction);
            scratch.put_reaction(reaction)?;
            new_reaction_count += 1;
        }
        *self = scratch;
        info!("{} new reactions found.", new_reaction_count);
        Ok(new_reaction_count)
    }
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Reaction {reaction} uses gene product {gene}, which is not in the model's gene products")]
    MalformedForeignModel { reaction: String, gene: String },
    #[error("Model reports {count} reactions but has none at position {index}")]
    MissingForeignReaction { index: usize, count: usize },
    #[error("Unable to add reaction to the map")]
    Map(#[from] MapError),
    #[error("Unable to build reaction")]
    UnableToBuildReaction(#[from] ReactionBuilderError),
}
