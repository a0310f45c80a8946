//! Conversion between SBML identifiers and the native (BiGG-style) identifiers used by maps
//!
//! SBML models following the Argonne conventions prefix every identifier with a type tag
//! (`R_` for reactions, `M_` for metabolites, `G_` for gene products). The map uses the bare
//! identifiers, so these have to be stripped when data crosses over. The gene product table of
//! the SBML model is still keyed by the prefixed identifiers, so lookups into that table go
//! through [`lookup_key`] instead.

/// Kinds of identifiers found in an SBML model
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum IdKind {
    Reaction,
    Metabolite,
    Gene,
}

/// The type prefix expected for each kind of identifier
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IdPrefixes {
    pub reaction: String,
    pub metabolite: String,
    pub gene: String,
}

impl Default for IdPrefixes {
    fn default() -> Self {
        IdPrefixes {
            reaction: "R_".to_string(),
            metabolite: "M_".to_string(),
            gene: "G_".to_string(),
        }
    }
}

impl IdPrefixes {
    /// Prefix used for identifiers of the given kind
    pub fn prefix(&self, kind: IdKind) -> &str {
        match kind {
            IdKind::Reaction => &self.reaction,
            IdKind::Metabolite => &self.metabolite,
            IdKind::Gene => &self.gene,
        }
    }

    /// Native identifier to show in the map for an SBML identifier of the given kind
    pub fn normalize_for_display<'a>(&self, kind: IdKind, id: &'a str) -> &'a str {
        strip_type_prefix(id, self.prefix(kind))
    }
}

/// Remove one leading `prefix` from `id`, returning `id` unchanged if it is not there
pub fn strip_type_prefix<'a>(id: &'a str, prefix: &str) -> &'a str {
    id.strip_prefix(prefix).unwrap_or(id)
}

/// Key to use when looking a gene product up in the SBML gene product table
///
/// The table is keyed by the original SBML identifier, so this never strips anything.
pub fn lookup_key(gene_id: &str) -> &str {
    gene_id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_reaction_prefix() {
        let prefixes = IdPrefixes::default();
        assert_eq!(prefixes.normalize_for_display(IdKind::Reaction, "R_PGI"), "PGI");
        assert_eq!(prefixes.normalize_for_display(IdKind::Metabolite, "M_g6p_c"), "g6p_c");
        assert_eq!(prefixes.normalize_for_display(IdKind::Gene, "G_b4025"), "b4025");
    }

    #[test]
    fn leaves_unprefixed_ids_alone() {
        let prefixes = IdPrefixes::default();
        assert_eq!(prefixes.normalize_for_display(IdKind::Reaction, "PGI"), "PGI");
        // Only the prefix for the requested kind is removed
        assert_eq!(prefixes.normalize_for_display(IdKind::Reaction, "M_g6p_c"), "M_g6p_c");
        // And only once
        assert_eq!(strip_type_prefix("R_R_PGI", "R_"), "R_PGI");
        assert_eq!(strip_type_prefix("", "R_"), "");
    }

    #[test]
    fn lookup_key_keeps_prefix() {
        assert_eq!(lookup_key("G_b1234"), "G_b1234");
    }
}
