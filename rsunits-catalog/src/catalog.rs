use crate::config::{CatalogConfig, UnitDefinition, UnitOperation};
use crate::errors::{CatalogError, CatalogResult};
use log::debug;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::{Direction, Graph};
use rsunits_core::conversion_factor::ConversionFactor;
use rsunits_core::convert::convert;
use rsunits_core::dimension::{BaseDimension, Dimension};
use rsunits_core::quantity::Quantity;
use rsunits_core::ratio_sqrt::DEFAULT_SQRT_EPSILON;
use rsunits_core::rational::Rational;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named unit in a [`UnitCatalog`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitEntry {
    pub name: String,
    pub abbreviation: Option<String>,
    pub factor: ConversionFactor,
}

/// A registry of named units.
///
/// Every unit is declared exactly once, anchored either to a base dimension, to a previously
/// declared unit, or given directly as a compound factor. Units derived from another unit are
/// linked to it in a graph whose edges carry the ratio of the child to its parent, so the
/// derivation chain of a unit can be recovered with [`UnitCatalog::ancestry`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitCatalog {
    node_indexes: Vec<NodeIndex>,
    by_name: HashMap<String, NodeIndex>,
    graph: Graph<UnitEntry, Rational>,
}

impl Default for UnitCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitCatalog {
    pub fn new() -> Self {
        Self {
            node_indexes: Vec::new(),
            by_name: HashMap::new(),
            graph: Graph::default(),
        }
    }

    fn index(&self, name: &str) -> CatalogResult<NodeIndex> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| CatalogError::UnknownUnit(name.to_string()))
    }

    fn insert(
        &mut self,
        name: &str,
        abbreviation: Option<&str>,
        factor: ConversionFactor,
        parent: Option<NodeIndex>,
    ) -> CatalogResult<&ConversionFactor> {
        if self.by_name.contains_key(name) {
            return Err(CatalogError::DuplicateUnit(name.to_string()));
        }
        if let Some(abbreviation) = abbreviation {
            if self.by_name.contains_key(abbreviation) {
                return Err(CatalogError::DuplicateUnit(abbreviation.to_string()));
            }
        }
        let relative_ratio = match parent {
            Some(parent) => Some(factor.ratio().checked_div(&self.graph[parent].factor.ratio())?),
            None => None,
        };

        debug!("Declaring unit {name} = {factor}");
        let node_index = self.graph.add_node(UnitEntry {
            name: name.to_string(),
            abbreviation: abbreviation.map(str::to_string),
            factor,
        });
        if let (Some(parent), Some(ratio)) = (parent, relative_ratio) {
            self.graph.add_edge(parent, node_index, ratio);
        }
        self.node_indexes.push(node_index);
        self.by_name.insert(name.to_string(), node_index);
        if let Some(abbreviation) = abbreviation {
            self.by_name.insert(abbreviation.to_string(), node_index);
        }
        Ok(&self.graph[node_index].factor)
    }

    /// Declares the base unit of a dimension, e.g. meters for length.
    pub fn define_base(
        &mut self,
        name: &str,
        base: BaseDimension,
    ) -> CatalogResult<&ConversionFactor> {
        self.insert(name, None, ConversionFactor::base(Dimension::base(base)), None)
    }

    /// Declares a unit relative to a previously declared one.
    ///
    /// See [`ConversionFactor::derive`] for how `ratio`, `pi_exponent` and `translation`
    /// combine with the parent.
    pub fn derive_unit(
        &mut self,
        name: &str,
        parent: &str,
        ratio: Rational,
        pi_exponent: Rational,
        translation: Rational,
    ) -> CatalogResult<&ConversionFactor> {
        let parent_index = self.index(parent)?;
        let factor = self.graph[parent_index]
            .factor
            .derive(ratio, pi_exponent, translation)?;
        self.insert(name, None, factor, Some(parent_index))
    }

    /// Shorthand for [`derive_unit`](Self::derive_unit) with a plain `numer / denom` ratio.
    pub fn derive_ratio(
        &mut self,
        name: &str,
        parent: &str,
        numer: i128,
        denom: i128,
    ) -> CatalogResult<&ConversionFactor> {
        self.derive_unit(
            name,
            parent,
            Rational::new(numer, denom)?,
            Rational::ZERO,
            Rational::ZERO,
        )
    }

    /// Declares a unit from an already composed factor, such as `meters / seconds`.
    pub fn define_compound(
        &mut self,
        name: &str,
        factor: ConversionFactor,
    ) -> CatalogResult<&ConversionFactor> {
        self.insert(name, None, factor, None)
    }

    /// Registers an abbreviation as an alternative lookup key for a declared unit.
    pub fn abbreviate(&mut self, name: &str, abbreviation: &str) -> CatalogResult<()> {
        let index = self.index(name)?;
        if self.by_name.contains_key(abbreviation) {
            return Err(CatalogError::DuplicateUnit(abbreviation.to_string()));
        }
        self.graph[index].abbreviation = Some(abbreviation.to_string());
        self.by_name.insert(abbreviation.to_string(), index);
        Ok(())
    }

    /// Looks up a unit by name or abbreviation.
    pub fn get(&self, name: &str) -> Option<&ConversionFactor> {
        self.entry(name).map(|entry| &entry.factor)
    }

    pub fn entry(&self, name: &str) -> Option<&UnitEntry> {
        self.by_name.get(name).map(|x| &self.graph[*x])
    }

    /// Like [`get`](Self::get), failing with [`CatalogError::UnknownUnit`].
    pub fn require(&self, name: &str) -> CatalogResult<&ConversionFactor> {
        self.get(name)
            .ok_or_else(|| CatalogError::UnknownUnit(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Unit names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.node_indexes
            .iter()
            .map(move |x| self.graph[*x].name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitEntry> {
        self.node_indexes.iter().map(move |x| &self.graph[*x])
    }

    pub fn len(&self) -> usize {
        self.node_indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_indexes.is_empty()
    }

    /// A linear quantity of `value` in the named unit.
    pub fn quantity(&self, value: f64, unit: &str) -> CatalogResult<Quantity> {
        Ok(Quantity::new(value, self.require(unit)?.clone()))
    }

    /// A decibel quantity of `value` dB in the named unit.
    pub fn decibel(&self, value: f64, unit: &str) -> CatalogResult<Quantity> {
        Ok(Quantity::decibel(value, self.require(unit)?.clone()))
    }

    /// Converts `value` between two named units.
    pub fn convert(&self, value: f64, from: &str, to: &str) -> CatalogResult<f64> {
        Ok(convert(value, self.require(from)?, self.require(to)?)?)
    }

    /// The derivation chain of a unit, from the unit itself up to its root declaration.
    ///
    /// Each step carries the ratio of the unit to its parent. The root has no ratio.
    pub fn ancestry(&self, name: &str) -> CatalogResult<Vec<(&str, Option<Rational>)>> {
        let mut current = self.index(name)?;
        let mut chain = Vec::new();
        loop {
            let mut parents = self
                .graph
                .edges_directed(current, Direction::Incoming)
                .map(|edge| (edge.source(), *edge.weight()));
            let entry = &self.graph[current];
            match parents.next() {
                Some((parent, ratio)) => {
                    chain.push((entry.name.as_str(), Some(ratio)));
                    current = parent;
                }
                None => {
                    chain.push((entry.name.as_str(), None));
                    return Ok(chain);
                }
            }
        }
    }

    /// Validates `config` and applies every definition in order.
    ///
    /// Definitions may only refer to units declared earlier, either in this catalog or in the
    /// configuration itself. Declarations made before a failing definition are kept.
    pub fn extend_from_config(&mut self, config: &CatalogConfig) -> CatalogResult<()> {
        config.validate()?;
        debug!("Loading {} units from catalog config", config.units.len());
        let eps = i128::from(config.sqrt_epsilon);
        for definition in &config.units {
            self.define(definition, eps)?;
        }
        Ok(())
    }

    /// Declares a single configured unit, using `eps` for square roots.
    pub fn define(&mut self, definition: &UnitDefinition, eps: i128) -> CatalogResult<()> {
        let (anchor, parent) = match (&definition.base, &definition.parent) {
            (Some(base), None) => (ConversionFactor::base(Dimension::base(*base)), None),
            (None, Some(parent)) => {
                let index = self.index(parent)?;
                (self.graph[index].factor.clone(), Some(index))
            }
            _ => {
                return Err(CatalogError::Config(format!(
                    "unit {} needs exactly one of `base` or `parent`",
                    definition.name
                )))
            }
        };
        let anchor = match definition.operation {
            None => anchor,
            Some(UnitOperation::Square) => anchor.square()?,
            Some(UnitOperation::Cube) => anchor.cube()?,
            Some(UnitOperation::Sqrt) => anchor.sqrt(eps)?,
            Some(UnitOperation::Invert) => anchor.invert()?,
        };
        let factor = anchor.derive(
            definition.ratio,
            definition.pi_exponent,
            definition.translation,
        )?;
        self.insert(
            &definition.name,
            definition.abbreviation.as_deref(),
            factor,
            parent,
        )?;
        Ok(())
    }

    /// Builds a catalog from a TOML definition.
    pub fn from_toml(source: &str) -> CatalogResult<Self> {
        let mut catalog = Self::new();
        catalog.extend_from_config(&CatalogConfig::from_toml(source)?)?;
        Ok(catalog)
    }

    /// Square root of a named unit with the default tolerance, as an unnamed factor.
    pub fn sqrt_of(&self, name: &str) -> CatalogResult<ConversionFactor> {
        Ok(self.require(name)?.sqrt(DEFAULT_SQRT_EPSILON)?)
    }
}
