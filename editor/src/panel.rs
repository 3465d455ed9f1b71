use bevy::prelude::Resource;
use rocketry_core::model::catalog::Catalog;
use rocketry_core::model::part::PartKind;
use rocketry_core::model::settings::PanelSettings;
use rocketry_core::model::units::{BuildPoint, BuildRect, BuildVector};

/// Column of catalog slots drawn left of the build area, one slot per template
/// in catalog order. Each part kind forms its own block
#[derive(Debug, Clone, Resource)]
pub struct CatalogPanel {
    /// Indexed like the catalog
    slots: Vec<(PartKind, BuildRect)>,
}

impl CatalogPanel {
    pub fn new(settings: &PanelSettings, catalog: &Catalog) -> Self {
        let stride = settings.slot_size.height + settings.spacing;
        let mut slots = Vec::with_capacity(catalog.len());
        let mut top = 0.0;
        for (group, (kind, templates)) in catalog.groups().enumerate() {
            if group > 0 {
                top += settings.group_gap;
            }
            for _ in templates {
                let offset = BuildVector::new(0.0, top);
                slots.push((kind, BuildRect::new(settings.origin + offset, settings.slot_size)));
                top += stride;
            }
        }
        Self { slots }
    }

    pub fn slot(&self, index: usize) -> Option<BuildRect> {
        self.slots.get(index).map(|(_, rect)| *rect)
    }

    /// Catalog index, kind and rect of every slot
    pub fn slots(&self) -> impl Iterator<Item = (usize, PartKind, BuildRect)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, (kind, rect))| (index, *kind, *rect))
    }

    /// Catalog index of the slot under the pointer, gaps between slots miss
    pub fn slot_at(&self, pointer: BuildPoint) -> Option<usize> {
        self.slots
            .iter()
            .position(|(_, rect)| rect.contains(pointer))
    }
}
