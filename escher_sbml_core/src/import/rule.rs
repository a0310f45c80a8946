//! Translation of FBC gene product associations into map gene reaction rules
use std::collections::BTreeSet;

use crate::sbml::model::Association;
use crate::utils::ids::{IdKind, IdPrefixes};

/// Rule text produced from an association, with the gene products it uses
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TranslatedRule {
    /// Rule text, fully parenthesized, e.g. `"((a or b) and c)"`
    pub rule: String,
    /// SBML ids (prefix intact) of every gene product in the rule
    pub genes: BTreeSet<String>,
}

/// Translate an association tree into a rule string
pub fn translate_rule(association: &Association, prefixes: &IdPrefixes) -> TranslatedRule {
    let mut genes = BTreeSet::new();
    let rule = process_rule(association, prefixes, &mut genes);
    TranslatedRule { rule, genes }
}

fn process_rule(
    association: &Association,
    prefixes: &IdPrefixes,
    genes: &mut BTreeSet<String>,
) -> String {
    match association {
        Association::GeneProductRef(id) => {
            genes.insert(id.clone());
            prefixes.normalize_for_display(IdKind::Gene, id).to_string()
        }
        Association::Operator { kind, children } => {
            let parts: Vec<String> = children
                .iter()
                .map(|child| process_rule(child, prefixes, genes))
                .collect();
            format!("({})", parts.join(kind.separator()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(association: &Association) -> TranslatedRule {
        translate_rule(association, &IdPrefixes::default())
    }

    #[test]
    fn leaf() {
        let translated = translate(&Association::gene("G_b1234"));
        assert_eq!(translated.rule, "b1234");
        assert_eq!(
            translated.genes.into_iter().collect::<Vec<_>>(),
            vec!["G_b1234"]
        );
    }

    #[test]
    fn operator() {
        let translated = translate(&Association::or(vec![
            Association::gene("G_a"),
            Association::gene("G_b"),
        ]));
        assert_eq!(translated.rule, "(a or b)");
        assert_eq!(translated.genes.len(), 2);
    }

    #[test]
    fn nested_operators_keep_order() {
        let translated = translate(&Association::and(vec![
            Association::or(vec![Association::gene("G_b"), Association::gene("G_a")]),
            Association::gene("G_c"),
        ]));
        assert_eq!(translated.rule, "((b or a) and c)");
        assert_eq!(
            translated.genes.into_iter().collect::<Vec<_>>(),
            vec!["G_a", "G_b", "G_c"]
        );
    }

    #[test]
    fn degenerate_operators() {
        let single = translate(&Association::and(vec![Association::gene("G_a")]));
        assert_eq!(single.rule, "(a)");
        let empty = translate(&Association::or(Vec::new()));
        assert_eq!(empty.rule, "()");
        assert!(empty.genes.is_empty());
    }

    #[test]
    fn unprefixed_genes() {
        let translated = translate(&Association::or(vec![
            Association::gene("b0001"),
            Association::gene("G_b0001"),
        ]));
        assert_eq!(translated.rule, "(b0001 or b0001)");
        assert_eq!(
            translated.genes.into_iter().collect::<Vec<_>>(),
            vec!["G_b0001", "b0001"]
        );
    }
}
