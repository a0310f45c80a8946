//! Building map reactions from SBML reactions
use tracing::debug;

use crate::escher_map::reaction::{Reaction, ReactionBuilder};
use crate::import::rule::translate_rule;
use crate::import::ImportError;
use crate::sbml::model::{ForeignModel, SbmlReaction, SpeciesReference};
use crate::utils::ids::{lookup_key, IdKind, IdPrefixes};

/// Build a map reaction, with its rule and gene aliases, from an SBML reaction
///
/// The stoichiometry is left empty, see [`add_stoich`].
///
/// # Errors
/// `MalformedForeignModel` if the association names a gene product missing from the model's
/// gene product table.
pub fn build_reaction<M: ForeignModel + ?Sized>(
    foreign: &SbmlReaction,
    id: u64,
    model: &M,
    prefixes: &IdPrefixes,
) -> Result<Reaction, ImportError> {
    let bigg_id = prefixes.normalize_for_display(IdKind::Reaction, &foreign.id);
    let translated = foreign
        .association
        .as_ref()
        .map(|association| translate_rule(association, prefixes));
    let mut reaction = ReactionBuilder::default()
        .id(id)
        .bigg_id(bigg_id.to_string())
        .name(foreign.name.clone())
        .reversible(foreign.reversible)
        .rule(translated.as_ref().map(|t| t.rule.clone()))
        .build()?;
    if let Some(translated) = translated {
        for gene in &translated.genes {
            let product = match model.gene_product(lookup_key(gene)) {
                Some(product) => product,
                None => {
                    return Err(ImportError::MalformedForeignModel {
                        reaction: foreign.id.clone(),
                        gene: gene.clone(),
                    })
                }
            };
            reaction.add_alias(&product.label, product.display_name());
        }
    }
    debug!(
        "Built reaction {} ({}) with rule {:?}.",
        reaction.bigg_id, reaction.id, reaction.rule
    );
    Ok(reaction)
}

/// Add the stoichiometry from an SBML species reference to a reaction
///
/// `factor` is 1 for a product and -1 for a reactant. Fractional stoichiometries are
/// truncated, and magnitudes beyond `i32` are clamped.
pub fn add_stoich(
    reaction: &mut Reaction,
    species_ref: &SpeciesReference,
    factor: i32,
    prefixes: &IdPrefixes,
) {
    let metabolite = prefixes.normalize_for_display(IdKind::Metabolite, &species_ref.species);
    let coeff = (species_ref.stoichiometry as i32).saturating_mul(factor);
    reaction.add_stoich(coeff, metabolite);
}
