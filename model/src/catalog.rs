use bevy::prelude::Resource;
use itertools::Itertools;
use miette::Diagnostic;
use rustc_hash::FxHashSet;
use strum::IntoEnumIterator;
use thiserror::Error;

use crate::part::{FuelType, Part, PartError, PartKind, PartTemplate};

/// Templates that can be picked while building, grouped by [PartKind]
#[derive(Debug, Clone, Resource)]
pub struct Catalog {
    templates: Vec<PartTemplate>,
}

#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("Could not parse the catalog: {0}")]
    #[diagnostic(code(model::catalog::parse))]
    Parse(#[from] serde_json5::Error),
    #[error("Catalog doesn't declare any parts")]
    #[diagnostic(code(model::catalog::empty))]
    Empty,
    #[error("Part `{0}` is declared twice")]
    #[diagnostic(code(model::catalog::duplicate))]
    Duplicate(String),
    #[error("Part at position {index} is invalid")]
    #[diagnostic(code(model::catalog::invalid))]
    Invalid {
        index: usize,
        #[source]
        #[diagnostic_source]
        source: PartError,
    },
}

impl Catalog {
    /// Validates every template and orders them by kind, keeping the declared
    /// order inside a kind
    pub fn new(templates: Vec<PartTemplate>) -> Result<Self, CatalogError> {
        if templates.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut names = FxHashSet::default();
        for (index, template) in templates.iter().enumerate() {
            Part::create(template).map_err(|source| CatalogError::Invalid { index, source })?;
            if !names.insert(template.name.as_str()) {
                return Err(CatalogError::Duplicate(template.name.clone()));
            }
        }

        let templates = templates
            .into_iter()
            .sorted_by_key(|template| template.kind)
            .collect();
        Ok(Self { templates })
    }

    /// Parses a JSON5 list of templates
    pub fn from_json5(text: &str) -> Result<Self, CatalogError> {
        let templates: Vec<PartTemplate> = serde_json5::from_str(text)?;
        Self::new(templates)
    }

    /// Parts available when no catalog file is provided
    pub fn builtin() -> Self {
        let templates = vec![
            engine("Small Engine", 1.5, 50.0, 50.0, 200.0, 50.0, FuelType::Liquid, 2.0),
            engine("Large Engine", 4.0, 60.0, 80.0, 520.0, 80.0, FuelType::Liquid, 5.0),
            engine("Solid Booster", 3.0, 30.0, 120.0, 350.0, 300.0, FuelType::Solid, 8.0),
            tank("Small Tank", 1.0, 50.0, 100.0, 400.0, FuelType::Liquid),
            tank("Large Tank", 2.2, 50.0, 150.0, 900.0, FuelType::Liquid),
            tank("Solid Fuel Block", 2.5, 40.0, 60.0, 350.0, FuelType::Solid),
            plain("Nose Cone", PartKind::Structure, 0.5, 50.0, 40.0),
            plain("Girder", PartKind::Structure, 0.8, 20.0, 100.0),
            plain("Adapter Plate", PartKind::Structure, 0.4, 60.0, 10.0),
            plain("Fin", PartKind::Decorative, 0.2, 30.0, 40.0),
            plain("Window", PartKind::Decorative, 0.1, 20.0, 20.0),
            plain("Capsule", PartKind::Additional, 2.0, 50.0, 50.0),
            plain("Parachute", PartKind::Additional, 0.3, 40.0, 20.0),
        ];
        Self { templates }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PartTemplate> {
        self.templates.get(index)
    }

    pub fn find(&self, name: &str) -> Option<&PartTemplate> {
        self.templates.iter().find(|template| template.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PartTemplate> {
        self.templates.iter()
    }

    /// Non-empty template groups, in [PartKind] order
    pub fn groups(&self) -> impl Iterator<Item = (PartKind, &[PartTemplate])> {
        PartKind::iter().filter_map(|kind| {
            let start = self.templates.partition_point(|e| e.kind < kind);
            let end = self.templates.partition_point(|e| e.kind <= kind);
            (start < end).then(|| (kind, &self.templates[start..end]))
        })
    }
}

#[allow(clippy::too_many_arguments)]
fn engine(
    name: &str,
    mass: f32,
    width: f32,
    height: f32,
    thrust: f32,
    fuel_capacity: f32,
    fuel_type: FuelType,
    fuel_consumption: f32,
) -> PartTemplate {
    PartTemplate {
        thrust,
        fuel_capacity,
        fuel_type: Some(fuel_type),
        fuel_consumption,
        ..plain(name, PartKind::Engine, mass, width, height)
    }
}

fn tank(
    name: &str,
    mass: f32,
    width: f32,
    height: f32,
    fuel_capacity: f32,
    fuel_type: FuelType,
) -> PartTemplate {
    PartTemplate {
        fuel_capacity,
        fuel_type: Some(fuel_type),
        ..plain(name, PartKind::Fuel, mass, width, height)
    }
}

fn plain(name: &str, kind: PartKind, mass: f32, width: f32, height: f32) -> PartTemplate {
    PartTemplate {
        name: name.to_string(),
        kind,
        mass,
        width,
        height,
        thrust: 0.0,
        fuel_capacity: 0.0,
        fuel_type: None,
        fuel_consumption: 0.0,
    }
}
