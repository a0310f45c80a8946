//! Module providing an SBML reader for the parts of a model needed to import reactions
//!
//! Only reactions, their species references, their FBC gene product associations, and the FBC
//! gene product table are read. Everything else in the document is skipped.
use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;
use tracing::{debug, info};

use crate::configuration::Configuration;
use crate::sbml::model::{
    Association, GeneProduct, LogicalOperator, SbmlModel, SbmlReaction, SpeciesReference,
};

impl SbmlModel {
    /// Read an SBML file
    pub fn read_sbml<P: AsRef<Path>>(path: P) -> Result<SbmlModel, SbmlError> {
        let xml = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) => {
                return Err(SbmlError::UnableToRead(format!(
                    "{}: {}",
                    path.as_ref().display(),
                    err
                )))
            }
        };
        let model = SbmlModel::from_sbml_str(&xml)?;
        info!(
            "{} reactions and {} gene products read from SBML model {}.",
            model.reactions.len(),
            model.gene_products.len(),
            model
        );
        Ok(model)
    }

    /// Parse an SBML document held in a string
    pub fn from_sbml_str(xml: &str) -> Result<SbmlModel, SbmlError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        let mut parser = SbmlParser::new(Configuration::current());
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => parser.open(e)?,
                Event::Empty(ref e) => {
                    parser.open(e)?;
                    parser.close(e.local_name().as_ref())?;
                }
                Event::End(ref e) => parser.close(e.local_name().as_ref())?,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(parser.model)
    }
}

/// Which species list of a reaction is currently open
#[derive(Clone, Copy, Debug)]
enum Side {
    Reactants,
    Products,
}

/// Event-driven state for building an [`SbmlModel`]
struct SbmlParser {
    model: SbmlModel,
    config: Configuration,
    /// Reaction whose element is currently open
    reaction: Option<SbmlReaction>,
    side: Option<Side>,
    in_association: bool,
    /// Depth inside a `notes` or `annotation` subtree, whose content is ignored
    skip_depth: usize,
    /// Operators whose elements are open, innermost last
    operators: Vec<(LogicalOperator, Vec<Association>)>,
    /// Completed top-level association of the current reaction
    association: Option<Association>,
}

impl SbmlParser {
    fn new(config: Configuration) -> Self {
        SbmlParser {
            model: SbmlModel::default(),
            config,
            reaction: None,
            side: None,
            in_association: false,
            skip_depth: 0,
            operators: Vec::new(),
            association: None,
        }
    }

    fn open(&mut self, e: &BytesStart) -> Result<(), SbmlError> {
        let name = e.local_name();
        if self.skip_depth > 0 || matches!(name.as_ref(), b"notes" | b"annotation") {
            self.skip_depth += 1;
            return Ok(());
        }
        if self.in_association {
            return match name.as_ref() {
                b"and" => {
                    self.operators.push((LogicalOperator::And, Vec::new()));
                    Ok(())
                }
                b"or" => {
                    self.operators.push((LogicalOperator::Or, Vec::new()));
                    Ok(())
                }
                b"geneProductRef" => {
                    let gene = required_attribute(e, b"geneProduct", "geneProductRef")?;
                    self.attach(Association::GeneProductRef(gene))
                }
                other => Err(SbmlError::UnsupportedAssociationShape {
                    reaction: self.reaction_id(),
                    element: String::from_utf8_lossy(other).into_owned(),
                }),
            };
        }
        match name.as_ref() {
            b"model" => {
                self.model.id = attribute(e, b"id")?;
                self.model.name = attribute(e, b"name")?;
            }
            b"reaction" => {
                let id = required_attribute(e, b"id", "reaction")?;
                let reversible = match attribute(e, b"reversible")? {
                    Some(value) => parse_bool(&value)?,
                    None => self.config.default_reversible,
                };
                self.reaction = Some(SbmlReaction {
                    id,
                    name: attribute(e, b"name")?,
                    reversible,
                    reactants: Vec::new(),
                    products: Vec::new(),
                    association: None,
                });
            }
            b"listOfReactants" => self.side = Some(Side::Reactants),
            b"listOfProducts" => self.side = Some(Side::Products),
            b"speciesReference" => {
                if let (Some(reaction), Some(side)) = (self.reaction.as_mut(), self.side) {
                    let species = required_attribute(e, b"species", "speciesReference")?;
                    let stoichiometry = match attribute(e, b"stoichiometry")? {
                        Some(value) => value
                            .trim()
                            .parse::<f64>()
                            .map_err(|_| SbmlError::InvalidNumber(value))?,
                        None => self.config.default_stoichiometry,
                    };
                    let species_ref = SpeciesReference {
                        species,
                        stoichiometry,
                    };
                    match side {
                        Side::Reactants => reaction.reactants.push(species_ref),
                        Side::Products => reaction.products.push(species_ref),
                    }
                }
            }
            b"geneProductAssociation" if self.reaction.is_some() => {
                self.in_association = true;
            }
            b"geneProduct" => {
                let id = required_attribute(e, b"id", "geneProduct")?;
                let label = attribute(e, b"label")?.unwrap_or_else(|| id.clone());
                let name = attribute(e, b"name")?;
                self.model.add_gene_product(GeneProduct { id, label, name });
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) -> Result<(), SbmlError> {
        if self.skip_depth > 0 {
            self.skip_depth -= 1;
            return Ok(());
        }
        if self.in_association {
            match name {
                b"and" | b"or" => {
                    let (kind, children) = match self.operators.pop() {
                        Some(frame) => frame,
                        None => return Err(SbmlError::UnbalancedAssociation(self.reaction_id())),
                    };
                    self.attach(Association::Operator { kind, children })?;
                }
                b"geneProductAssociation" => {
                    if !self.operators.is_empty() {
                        return Err(SbmlError::UnbalancedAssociation(self.reaction_id()));
                    }
                    self.in_association = false;
                    let association = self.association.take();
                    if let Some(reaction) = self.reaction.as_mut() {
                        reaction.association = association;
                    }
                }
                _ => {}
            }
            return Ok(());
        }
        match name {
            b"reaction" => {
                if let Some(reaction) = self.reaction.take() {
                    debug!("Read SBML reaction {}.", reaction.id);
                    self.model.reactions.push(reaction);
                }
                self.side = None;
            }
            b"listOfReactants" | b"listOfProducts" => self.side = None,
            _ => {}
        }
        Ok(())
    }

    /// Add a finished association node to the innermost open operator, or make it the root
    fn attach(&mut self, node: Association) -> Result<(), SbmlError> {
        if let Some((_, children)) = self.operators.last_mut() {
            children.push(node);
            return Ok(());
        }
        if self.association.is_some() {
            // A gene product association holds exactly one top-level node
            return Err(SbmlError::UnbalancedAssociation(self.reaction_id()));
        }
        self.association = Some(node);
        Ok(())
    }

    fn reaction_id(&self) -> String {
        self.reaction
            .as_ref()
            .map(|r| r.id.clone())
            .unwrap_or_default()
    }
}

/// Find an attribute by local name, ignoring any namespace prefix
fn attribute(e: &BytesStart, name: &[u8]) -> Result<Option<String>, SbmlError> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn required_attribute(e: &BytesStart, name: &[u8], element: &str) -> Result<String, SbmlError> {
    match attribute(e, name)? {
        Some(value) => Ok(value),
        None => Err(SbmlError::MissingAttribute {
            element: element.to_string(),
            attribute: String::from_utf8_lossy(name).into_owned(),
        }),
    }
}

fn parse_bool(value: &str) -> Result<bool, SbmlError> {
    match value.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(SbmlError::InvalidBoolean(value.to_string())),
    }
}

#[derive(Error, Debug)]
pub enum SbmlError {
    #[error("Unable to read SBML file: {0}")]
    UnableToRead(String),
    #[error("Malformed SBML document")]
    XmlError(#[from] quick_xml::Error),
    #[error("<{element}> element is missing its {attribute} attribute")]
    MissingAttribute { element: String, attribute: String },
    #[error("Invalid number {0}")]
    InvalidNumber(String),
    #[error("Invalid boolean {0}")]
    InvalidBoolean(String),
    #[error("Gene association of reaction {reaction} contains unsupported element <{element}>")]
    UnsupportedAssociationShape { reaction: String, element: String },
    #[error("Gene association of reaction {0} is not a single well-formed tree")]
    UnbalancedAssociation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbml::model::ForeignModel;

    const FBA_MODEL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sbml xmlns="http://www.sbml.org/sbml/level3/version1/core" xmlns:fbc="http://www.sbml.org/sbml/level3/version1/fbc/version2" level="3" version="1" fbc:required="false">
  <model id="test_model" name="Test model" fbc:strict="true">
    <listOfReactions>
      <reaction id="R_FBA" name="Fructose-bisphosphate aldolase" reversible="false" fast="false">
        <listOfReactants>
          <speciesReference species="M_fdp_c" stoichiometry="1" constant="true"/>
        </listOfReactants>
        <listOfProducts>
          <speciesReference species="M_dhap_c" stoichiometry="1" constant="true"/>
          <speciesReference species="M_g3p_c" stoichiometry="1" constant="true"/>
        </listOfProducts>
        <fbc:geneProductAssociation>
          <fbc:and>
            <fbc:or>
              <fbc:geneProductRef fbc:geneProduct="G_b2097"/>
              <fbc:geneProductRef fbc:geneProduct="G_b1773"/>
            </fbc:or>
            <fbc:geneProductRef fbc:geneProduct="G_b2925"/>
          </fbc:and>
        </fbc:geneProductAssociation>
      </reaction>
      <reaction id="R_EX_glc" reversible="true">
        <listOfReactants>
          <speciesReference species="M_glc__D_e"/>
        </listOfReactants>
        <listOfModifiers>
          <modifierSpeciesReference species="M_atp_c"/>
        </listOfModifiers>
      </reaction>
    </listOfReactions>
    <fbc:listOfGeneProducts>
      <fbc:geneProduct fbc:id="G_b2097" fbc:label="b2097" fbc:name="fbaB"/>
      <fbc:geneProduct fbc:id="G_b1773" fbc:label="b1773" fbc:name="ydjI"/>
      <fbc:geneProduct fbc:id="G_b2925" fbc:label="b2925"/>
    </fbc:listOfGeneProducts>
  </model>
</sbml>"#;

    #[test]
    fn reads_reactions() {
        let model = SbmlModel::from_sbml_str(FBA_MODEL).unwrap();
        assert_eq!(model.id.as_deref(), Some("test_model"));
        assert_eq!(model.reaction_count(), 2);

        let fba = model.reaction(0).unwrap();
        assert_eq!(fba.id, "R_FBA");
        assert_eq!(fba.name.as_deref(), Some("Fructose-bisphosphate aldolase"));
        assert!(!fba.reversible);
        assert_eq!(fba.reactants, vec![SpeciesReference::new("M_fdp_c", 1.)]);
        assert_eq!(
            fba.products,
            vec![
                SpeciesReference::new("M_dhap_c", 1.),
                SpeciesReference::new("M_g3p_c", 1.)
            ]
        );
        assert_eq!(
            fba.association,
            Some(Association::and(vec![
                Association::or(vec![
                    Association::gene("G_b2097"),
                    Association::gene("G_b1773")
                ]),
                Association::gene("G_b2925"),
            ]))
        );
    }

    #[test]
    fn applies_defaults() {
        let model = SbmlModel::from_sbml_str(FBA_MODEL).unwrap();
        let exchange = model.reaction(1).unwrap();
        assert_eq!(exchange.name, None);
        assert!(exchange.reversible);
        assert_eq!(exchange.association, None);
        // Modifiers are not part of the stoichiometry
        assert_eq!(exchange.reactants, vec![SpeciesReference::new("M_glc__D_e", 1.)]);
        assert!(exchange.products.is_empty());
    }

    #[test]
    fn reads_gene_products() {
        let model = SbmlModel::from_sbml_str(FBA_MODEL).unwrap();
        let product = model.gene_product("G_b2097").unwrap();
        assert_eq!(product.label, "b2097");
        assert_eq!(product.display_name(), "fbaB");
        assert_eq!(model.gene_product("G_b2925").unwrap().display_name(), "b2925");
        assert!(model.gene_product("b2097").is_none());
    }

    #[test]
    fn rejects_unknown_association_element() {
        let xml = r#"<sbml><model><listOfReactions>
            <reaction id="R_X" reversible="false">
              <fbc:geneProductAssociation>
                <fbc:not><fbc:geneProductRef fbc:geneProduct="G_a"/></fbc:not>
              </fbc:geneProductAssociation>
            </reaction>
        </listOfReactions></model></sbml>"#;
        match SbmlModel::from_sbml_str(xml) {
            Err(SbmlError::UnsupportedAssociationShape { reaction, element }) => {
                assert_eq!(reaction, "R_X");
                assert_eq!(element, "not");
            }
            other => panic!("Expected an unsupported association, got {:?}", other),
        }
    }

    #[test]
    fn annotated_association() {
        let xml = r##"<sbml><model><listOfReactions>
            <reaction id="R_X" reversible="false">
              <fbc:geneProductAssociation metaid="gpa_R_X">
                <annotation>
                  <rdf:RDF><rdf:Description rdf:about="#gpa_R_X"><bqbiol:is/></rdf:Description></rdf:RDF>
                </annotation>
                <fbc:geneProductRef fbc:geneProduct="G_a"/>
              </fbc:geneProductAssociation>
            </reaction>
        </listOfReactions></model></sbml>"##;
        let model = SbmlModel::from_sbml_str(xml).unwrap();
        assert_eq!(model.reaction(0).unwrap().association, Some(Association::gene("G_a")));
    }

    #[test]
    fn notes_inside_association_nodes() {
        let xml = r#"<sbml><model><listOfReactions>
            <reaction id="R_X">
              <notes><p>reaction notes</p></notes>
              <fbc:geneProductAssociation>
                <fbc:or>
                  <notes><html:p>isozymes</html:p><annotation/></notes>
                  <fbc:geneProductRef fbc:geneProduct="G_a">
                    <notes><html:p>subunit</html:p></notes>
                  </fbc:geneProductRef>
                  <fbc:and>
                    <annotation><rdf:RDF><and/></rdf:RDF></annotation>
                    <fbc:geneProductRef fbc:geneProduct="G_b"/>
                    <fbc:geneProductRef fbc:geneProduct="G_c"/>
                  </fbc:and>
                </fbc:or>
              </fbc:geneProductAssociation>
            </reaction>
        </listOfReactions></model></sbml>"#;
        let model = SbmlModel::from_sbml_str(xml).unwrap();
        assert_eq!(
            model.reaction(0).unwrap().association,
            Some(Association::or(vec![
                Association::gene("G_a"),
                Association::and(vec![Association::gene("G_b"), Association::gene("G_c")]),
            ]))
        );
    }

    #[test]
    fn rejects_missing_species() {
        let xml = r#"<sbml><model><listOfReactions>
            <reaction id="R_X"><listOfProducts><speciesReference/></listOfProducts></reaction>
        </listOfReactions></model></sbml>"#;
        assert!(matches!(
            SbmlModel::from_sbml_str(xml),
            Err(SbmlError::MissingAttribute { .. })
        ));
    }

    #[test]
    fn empty_operator_is_kept() {
        let xml = r#"<sbml><model><listOfReactions>
            <reaction id="R_X"><fbc:geneProductAssociation><fbc:or/></fbc:geneProductAssociation></reaction>
        </listOfReactions></model></sbml>"#;
        let model = SbmlModel::from_sbml_str(xml).unwrap();
        assert_eq!(
            model.reaction(0).unwrap().association,
            Some(Association::or(Vec::new()))
        );
    }
}
