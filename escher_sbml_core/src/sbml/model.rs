//! This module provides the structures representing an SBML model with FBC gene associations
use std::fmt::{Display, Formatter};

use derive_builder::Builder;
use indexmap::IndexMap;

/// Read access to a foreign reaction model, as needed by the importer
pub trait ForeignModel {
    /// Number of reactions in the model
    fn reaction_count(&self) -> usize;
    /// Reaction at position `index`, if there is one
    fn reaction(&self, index: usize) -> Option<&SbmlReaction>;
    /// Gene product with the given (unstripped) identifier
    fn gene_product(&self, id: &str) -> Option<&GeneProduct>;
}

/// An SBML model, reduced to what is needed for importing reactions
#[derive(Clone, Debug, Default)]
pub struct SbmlModel {
    /// Id of the model
    pub id: Option<String>,
    /// Human-readable model name
    pub name: Option<String>,
    /// Reactions, in document order
    pub reactions: Vec<SbmlReaction>,
    /// Map of gene product ids to gene products
    pub gene_products: IndexMap<String, GeneProduct>,
}

impl SbmlModel {
    /// Add a gene product to the model, keyed by its id
    pub fn add_gene_product(&mut self, gene_product: GeneProduct) {
        self.gene_products
            .insert(gene_product.id.clone(), gene_product);
    }
}

impl ForeignModel for SbmlModel {
    fn reaction_count(&self) -> usize {
        self.reactions.len()
    }

    fn reaction(&self, index: usize) -> Option<&SbmlReaction> {
        self.reactions.get(index)
    }

    fn gene_product(&self, id: &str) -> Option<&GeneProduct> {
        self.gene_products.get(id)
    }
}

impl Display for SbmlModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (&self.id, &self.name) {
            (Some(id), Some(name)) => write!(f, "{} ({})", id, name),
            (Some(id), None) => write!(f, "{}", id),
            (None, Some(name)) => write!(f, "{}", name),
            (None, None) => write!(f, "unnamed model"),
        }
    }
}

/// A reaction node of an SBML model
#[derive(Builder, Clone, Debug, PartialEq)]
pub struct SbmlReaction {
    /// SBML id, including the type prefix
    pub id: String,
    /// Human-readable reaction name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Whether the reaction can run in reverse
    #[builder(default = "true")]
    pub reversible: bool,
    /// Species consumed by the reaction
    #[builder(default = "Vec::new()")]
    pub reactants: Vec<SpeciesReference>,
    /// Species produced by the reaction
    #[builder(default = "Vec::new()")]
    pub products: Vec<SpeciesReference>,
    /// FBC gene product association, if the reaction has one
    #[builder(default = "None")]
    pub association: Option<Association>,
}

/// Reference from a reaction to a species, with its stoichiometry
#[derive(Clone, Debug, PartialEq)]
pub struct SpeciesReference {
    /// SBML species id, including the type prefix
    pub species: String,
    /// Stoichiometric magnitude (always positive, the side of the reaction gives the sign)
    pub stoichiometry: f64,
}

impl SpeciesReference {
    pub fn new(species: &str, stoichiometry: f64) -> SpeciesReference {
        SpeciesReference {
            species: species.to_string(),
            stoichiometry,
        }
    }
}

/// Entry of the FBC gene product table
#[derive(Clone, Debug, PartialEq)]
pub struct GeneProduct {
    /// SBML id, including the type prefix
    pub id: String,
    /// Label of the gene product, usually the locus tag
    pub label: String,
    /// Human-readable gene name
    pub name: Option<String>,
}

impl GeneProduct {
    pub fn new(id: &str, label: &str, name: Option<&str>) -> GeneProduct {
        GeneProduct {
            id: id.to_string(),
            label: label.to_string(),
            name: name.map(str::to_string),
        }
    }

    /// Name to show for this gene product, falling back to the label
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.label)
    }
}

/// FBC gene product association tree
#[derive(Clone, Debug, PartialEq)]
pub enum Association {
    /// Leaf referring to a gene product by its (prefixed) id
    GeneProductRef(String),
    /// Logical operator over an ordered list of sub-associations
    Operator {
        kind: LogicalOperator,
        children: Vec<Association>,
    },
}

impl Association {
    /// Create a new gene product leaf
    pub fn gene(id: &str) -> Association {
        Association::GeneProductRef(id.to_string())
    }

    /// Create a new `and` node
    pub fn and(children: Vec<Association>) -> Association {
        Association::Operator {
            kind: LogicalOperator::And,
            children,
        }
    }

    /// Create a new `or` node
    pub fn or(children: Vec<Association>) -> Association {
        Association::Operator {
            kind: LogicalOperator::Or,
            children,
        }
    }
}

/// Operators allowed in an FBC association
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogicalOperator {
    /// All children are required
    And,
    /// Any one child is sufficient
    Or,
}

impl LogicalOperator {
    /// Text placed between the children of this operator in a rule
    pub fn separator(&self) -> &'static str {
        match self {
            LogicalOperator::And => " and ",
            LogicalOperator::Or => " or ",
        }
    }
}
