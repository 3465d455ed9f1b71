use bevy::log::debug;
use bevy::prelude::Resource;
use rocketry_core::model::design::DesignStats;
use rocketry_core::model::part::{Part, PartError, PartId, PartTemplate};
use rocketry_core::model::settings::BuildSettings;
use rocketry_core::model::units::{BuildPoint, BuildRect, BuildSize};

/// Snap granularity used when no valid sizes are configured
pub const DEFAULT_GRID: f32 = 10.0;

/// Aligns `v` down to a multiple of `grid`
pub fn snap(v: f32, grid: f32) -> f32 {
    v - v.rem_euclid(grid)
}

/// Aligns `v` up to a multiple of `grid`
pub fn snap_up(v: f32, grid: f32) -> f32 {
    let snapped = snap(v, grid);
    if snapped < v {
        snapped + grid
    } else {
        snapped
    }
}

/// Edit command coming from the input layer
#[derive(Debug, Clone)]
pub enum BuildCommand {
    Pick(PartTemplate),
    Place(BuildPoint),
    BeginDrag(BuildPoint),
    DragTo(BuildPoint),
    EndDrag,
    Rotate(i32),
    Delete(BuildPoint),
    ToggleGrid,
}

/// Fixed set of snap sizes, cycled through in order
#[derive(Debug, Clone, PartialEq)]
pub struct GridCycle {
    sizes: Vec<f32>,
    current: usize,
}

impl GridCycle {
    pub fn new(sizes: impl IntoIterator<Item = f32>) -> Self {
        let mut sizes: Vec<f32> = sizes
            .into_iter()
            .filter(|size| size.is_finite() && *size > 0.0)
            .collect();
        if sizes.is_empty() {
            sizes.push(DEFAULT_GRID);
        }
        Self { sizes, current: 0 }
    }

    pub fn size(&self) -> f32 {
        self.sizes[self.current]
    }

    pub fn advance(&mut self) -> f32 {
        self.current = (self.current + 1) % self.sizes.len();
        self.size()
    }
}

/// Editing state of the rocket under construction
///
/// Parts later in [placed](BuildSurface::placed) are drawn over earlier ones,
/// so every hit test walks the list back to front. A part is either held in
/// hand or dragged, never both.
#[derive(Debug, Resource)]
pub struct BuildSurface {
    area: BuildRect,
    grid: GridCycle,
    placed: Vec<Part>,
    selected: Option<Part>,
    dragged: Option<PartId>,
}

impl BuildSurface {
    pub fn new(area: BuildRect, grid: GridCycle) -> Self {
        Self {
            area,
            grid,
            placed: vec![],
            selected: None,
            dragged: None,
        }
    }

    pub fn from_settings(settings: &BuildSettings) -> Self {
        Self::new(
            settings.area(),
            GridCycle::new(settings.grid_sizes.iter().copied()),
        )
    }

    pub fn area(&self) -> BuildRect {
        self.area
    }

    pub fn grid_size(&self) -> f32 {
        self.grid.size()
    }

    pub fn placed(&self) -> &[Part] {
        &self.placed
    }

    pub fn selected(&self) -> Option<&Part> {
        self.selected.as_ref()
    }

    pub fn dragged(&self) -> Option<&Part> {
        let id = self.dragged?;
        self.placed.iter().find(|part| part.id() == id)
    }

    pub fn stats(&self) -> DesignStats {
        DesignStats::measure(&self.placed)
    }

    pub fn apply(&mut self, command: BuildCommand) -> Result<(), PartError> {
        match command {
            BuildCommand::Pick(template) => {
                self.pick_from_catalog(&template)?;
            }
            BuildCommand::Place(pointer) => {
                self.place_at(pointer);
            }
            BuildCommand::BeginDrag(pointer) => {
                self.begin_drag(pointer);
            }
            BuildCommand::DragTo(pointer) => {
                self.drag_to(pointer);
            }
            BuildCommand::EndDrag => self.end_drag(),
            BuildCommand::Rotate(by) => self.rotate_current(by)?,
            BuildCommand::Delete(pointer) => {
                self.delete_at(pointer);
            }
            BuildCommand::ToggleGrid => {
                self.toggle_grid();
            }
        }
        Ok(())
    }

    /// Takes a fresh copy of `template` in hand, replacing whatever was held
    pub fn pick_from_catalog(&mut self, template: &PartTemplate) -> Result<&Part, PartError> {
        let part = Part::create(template)?;
        self.dragged = None;
        Ok(&*self.selected.insert(part))
    }

    /// Where the part in hand would land for this pointer position
    pub fn preview_at(&self, pointer: BuildPoint) -> Option<BuildPoint> {
        let part = self.selected.as_ref()?;
        self.area
            .contains(pointer)
            .then(|| self.anchor(pointer, part.effective_bounds()))
    }

    /// Drops the part in hand centered on the pointer. Pointers outside of the
    /// build area are ignored and the part stays in hand
    pub fn place_at(&mut self, pointer: BuildPoint) -> Option<PartId> {
        if !self.area.contains(pointer) {
            debug!(?pointer, "Placement outside of the build area ignored");
            return None;
        }
        let mut part = self.selected.take()?;
        part.place(self.anchor(pointer, part.effective_bounds()));
        let id = part.id();
        self.placed.push(part);
        Some(id)
    }

    /// Picks up the topmost placed part under the pointer
    pub fn begin_drag(&mut self, pointer: BuildPoint) -> Option<PartId> {
        if self.selected.is_some() {
            return None;
        }
        let id = self.topmost_at(pointer)?.id();
        self.dragged = Some(id);
        Some(id)
    }

    /// Moves the dragged part, it stays put while the pointer is outside of
    /// the build area
    pub fn drag_to(&mut self, pointer: BuildPoint) -> bool {
        let Some(id) = self.dragged else {
            return false;
        };
        if !self.area.contains(pointer) {
            return false;
        }
        let Some(index) = self.index_of(id) else {
            self.dragged = None;
            return false;
        };
        let target = self.anchor(pointer, self.placed[index].effective_bounds());
        self.placed[index].place(target);
        true
    }

    pub fn end_drag(&mut self) {
        self.dragged = None;
    }

    /// Rotates the part in hand, or the dragged one if nothing is held. A
    /// dragged part is pushed back inside the build area if it sticks out
    pub fn rotate_current(&mut self, by: i32) -> Result<(), PartError> {
        if let Some(part) = &mut self.selected {
            return part.rotate(by);
        }
        if let Some(index) = self.dragged.and_then(|id| self.index_of(id)) {
            self.placed[index].rotate(by)?;
            let part = &self.placed[index];
            let target = self.fit(part.position(), part.effective_bounds());
            self.placed[index].place(target);
        }
        Ok(())
    }

    /// Removes the topmost placed part under the pointer
    pub fn delete_at(&mut self, pointer: BuildPoint) -> Option<Part> {
        let index = self
            .placed
            .iter()
            .rposition(|part| part.bounds().contains(pointer))?;
        let part = self.placed.remove(index);
        if self.dragged == Some(part.id()) {
            self.dragged = None;
        }
        Some(part)
    }

    pub fn toggle_grid(&mut self) -> f32 {
        self.grid.advance()
    }

    pub fn topmost_at(&self, pointer: BuildPoint) -> Option<&Part> {
        self.placed
            .iter()
            .rev()
            .find(|part| part.bounds().contains(pointer))
    }

    /// Drops the part in hand and any drag, leaving only placed parts
    pub fn finalize(&mut self) {
        self.selected = None;
        self.dragged = None;
    }

    pub fn replace_placed(&mut self, parts: Vec<Part>) {
        self.placed = parts;
        self.dragged = None;
    }

    pub fn clear(&mut self) {
        self.placed.clear();
        self.finalize();
    }

    fn index_of(&self, id: PartId) -> Option<usize> {
        self.placed.iter().position(|part| part.id() == id)
    }

    /// Top left corner for a part of `size` centered on the pointer
    fn anchor(&self, pointer: BuildPoint, size: BuildSize) -> BuildPoint {
        self.fit(pointer - size.to_vector() / 2.0, size)
    }

    /// Snaps `corner` to the grid, keeping a part of `size` inside the build
    /// area. Both bounds are grid lines too, the upper one wins only if the
    /// part fits between them
    fn fit(&self, corner: BuildPoint, size: BuildSize) -> BuildPoint {
        let grid = self.grid.size();
        let axis = |value: f32, min: f32, max: f32, extent: f32| {
            snap(value, grid)
                .min(snap(max - extent, grid))
                .max(snap_up(min, grid))
        };
        BuildPoint::new(
            axis(corner.x, self.area.min_x(), self.area.max_x(), size.width),
            axis(corner.y, self.area.min_y(), self.area.max_y(), size.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocketry_core::model::catalog::Catalog;
    use rocketry_core::model::part::Rotation;
    use rocketry_core::model::settings::BuildSettings;

    fn surface() -> BuildSurface {
        BuildSurface::from_settings(&BuildSettings::default())
    }

    fn template(name: &str) -> PartTemplate {
        Catalog::builtin().find(name).unwrap().clone()
    }

    fn point(x: f32, y: f32) -> BuildPoint {
        BuildPoint::new(x, y)
    }

    fn place(surface: &mut BuildSurface, name: &str, x: f32, y: f32) -> PartId {
        surface.pick_from_catalog(&template(name)).unwrap();
        surface.place_at(point(x, y)).unwrap()
    }

    #[test]
    fn snap_is_idempotent_and_aligned() {
        for grid in [5.0, 10.0, 20.0, 40.0] {
            for v in [-73.0, -10.0, -0.5, 0.0, 3.0, 9.9, 10.0, 137.0, 599.0, 1234.5] {
                let snapped = snap(v, grid);
                assert_eq!(snap(snapped, grid), snapped);
                assert_eq!(snapped.rem_euclid(grid), 0.0);
                assert!(snapped <= v && v - snapped < grid);
            }
        }
    }

    #[test]
    fn engine_placed_at_area_corner() {
        let mut surface = surface();
        assert_eq!(surface.grid_size(), 10.0);
        let id = place(&mut surface, "Small Engine", 162.0, 61.0);

        let part = &surface.placed()[0];
        assert_eq!(part.id(), id);
        assert_eq!(part.position(), point(160.0, 60.0));
        assert!(surface.selected().is_none());
    }

    #[test]
    fn placement_centers_part_on_pointer() {
        let mut surface = surface();
        place(&mut surface, "Small Tank", 400.0, 300.0);
        // 50x100 tank: corner at (375, 250), snapped down to (370, 250)
        assert_eq!(surface.placed()[0].position(), point(370.0, 250.0));
    }

    #[test]
    fn placement_stays_inside_area() {
        let mut surface = surface();
        place(&mut surface, "Large Tank", 755.0, 655.0);
        let bounds = surface.placed()[0].bounds();
        assert!(surface.area().contains_rect(&bounds));
        assert_eq!(bounds.origin, point(710.0, 510.0));
    }

    #[test]
    fn rotation_of_held_part() {
        let mut surface = surface();
        surface.pick_from_catalog(&template("Small Engine")).unwrap();
        surface.rotate_current(90).unwrap();
        let engine = surface.selected().unwrap();
        assert_eq!(engine.effective_bounds(), BuildSize::new(50.0, 50.0));

        surface.pick_from_catalog(&template("Small Tank")).unwrap();
        surface.rotate_current(90).unwrap();
        let tank = surface.selected().unwrap();
        assert_eq!(tank.effective_bounds(), BuildSize::new(100.0, 50.0));
        assert_eq!(tank.rotation(), Rotation::Deg90);
    }

    #[test]
    fn placement_outside_area_is_ignored() {
        let mut surface = surface();
        place(&mut surface, "Fin", 300.0, 300.0);
        surface.pick_from_catalog(&template("Capsule")).unwrap();
        let held = surface.selected().unwrap().id();

        let outside = [
            point(10.0, 10.0),
            point(159.0, 300.0),
            point(760.0, 300.0),
            point(300.0, 660.0),
        ];
        for outside in outside {
            assert_eq!(surface.place_at(outside), None);
            assert_eq!(surface.placed().len(), 1);
            assert_eq!(surface.selected().map(Part::id), Some(held));
        }
    }

    #[test]
    fn placing_without_selection_does_nothing() {
        let mut surface = surface();
        assert_eq!(surface.place_at(point(300.0, 300.0)), None);
        assert!(surface.placed().is_empty());
    }

    #[test]
    fn last_pick_wins() {
        let mut surface = surface();
        surface.pick_from_catalog(&template("Fin")).unwrap();
        surface.pick_from_catalog(&template("Girder")).unwrap();
        assert_eq!(surface.selected().unwrap().name(), "Girder");
    }

    #[test]
    fn drag_picks_latest_of_overlapping_parts() {
        let mut surface = surface();
        let first = place(&mut surface, "Small Tank", 400.0, 300.0);
        let second = place(&mut surface, "Small Tank", 410.0, 320.0);
        assert_ne!(first, second);

        assert_eq!(surface.begin_drag(point(400.0, 320.0)), Some(second));
        assert_eq!(surface.dragged().unwrap().id(), second);
    }

    #[test]
    fn drag_on_empty_space_is_noop() {
        let mut surface = surface();
        place(&mut surface, "Fin", 300.0, 300.0);
        assert_eq!(surface.begin_drag(point(600.0, 600.0)), None);
        assert!(surface.dragged().is_none());
        assert!(!surface.drag_to(point(400.0, 400.0)));
    }

    #[test]
    fn drag_is_blocked_while_holding_a_part() {
        let mut surface = surface();
        place(&mut surface, "Fin", 300.0, 300.0);
        surface.pick_from_catalog(&template("Capsule")).unwrap();
        assert_eq!(surface.begin_drag(point(300.0, 300.0)), None);
    }

    #[test]
    fn pick_ends_drag() {
        let mut surface = surface();
        place(&mut surface, "Fin", 300.0, 300.0);
        surface.begin_drag(point(300.0, 300.0)).unwrap();
        surface.pick_from_catalog(&template("Capsule")).unwrap();
        assert!(surface.dragged().is_none());
        assert!(surface.selected().is_some());
    }

    #[test]
    fn drag_follows_pointer_inside_area_only() {
        let mut surface = surface();
        place(&mut surface, "Small Engine", 300.0, 300.0);
        surface.begin_drag(point(300.0, 300.0)).unwrap();

        assert!(surface.drag_to(point(500.0, 402.0)));
        assert_eq!(surface.placed()[0].position(), point(470.0, 370.0));

        assert!(!surface.drag_to(point(50.0, 50.0)));
        assert_eq!(surface.placed()[0].position(), point(470.0, 370.0));

        surface.end_drag();
        assert!(!surface.drag_to(point(300.0, 300.0)));
        assert_eq!(surface.placed()[0].position(), point(470.0, 370.0));
    }

    #[test]
    fn rotate_applies_to_dragged_part() {
        let mut surface = surface();
        place(&mut surface, "Girder", 300.0, 300.0);
        surface.begin_drag(point(300.0, 300.0)).unwrap();
        surface.rotate_current(90).unwrap();
        assert_eq!(surface.placed()[0].effective_bounds(), BuildSize::new(100.0, 20.0));

        surface.end_drag();
        surface.rotate_current(90).unwrap();
        assert_eq!(surface.placed()[0].rotation(), Rotation::Deg90);
        assert_eq!(
            surface.rotate_current(45),
            Ok(()),
            "nothing is held, so nothing is rotated"
        );
    }

    #[test]
    fn bad_rotation_is_rejected() {
        let mut surface = surface();
        surface.pick_from_catalog(&template("Girder")).unwrap();
        assert_eq!(surface.rotate_current(30), Err(PartError::InvalidArgument(30)));
        assert_eq!(surface.selected().unwrap().rotation(), Rotation::Deg0);
    }

    #[test]
    fn delete_removes_topmost_only() {
        let mut surface = surface();
        let first = place(&mut surface, "Small Tank", 400.0, 300.0);
        let second = place(&mut surface, "Small Tank", 410.0, 320.0);

        assert_eq!(surface.delete_at(point(400.0, 320.0)).unwrap().id(), second);
        assert_eq!(surface.placed().len(), 1);
        assert_eq!(surface.placed()[0].id(), first);

        assert!(surface.delete_at(point(700.0, 100.0)).is_none());
        assert_eq!(surface.placed().len(), 1);
    }

    #[test]
    fn deleting_dragged_part_ends_drag() {
        let mut surface = surface();
        place(&mut surface, "Fin", 300.0, 300.0);
        surface.begin_drag(point(300.0, 300.0)).unwrap();
        surface.delete_at(point(300.0, 300.0)).unwrap();
        assert!(surface.dragged().is_none());
        assert!(!surface.drag_to(point(400.0, 400.0)));
    }

    #[test]
    fn grid_cycles_through_allowed_sizes() {
        let mut surface = surface();
        assert_eq!(surface.toggle_grid(), 20.0);
        assert_eq!(surface.toggle_grid(), 40.0);
        assert_eq!(surface.toggle_grid(), 10.0);
    }

    #[test]
    fn invalid_grid_sizes_fall_back() {
        let mut grid = GridCycle::new([0.0, -5.0, f32::NAN]);
        assert_eq!(grid.size(), DEFAULT_GRID);
        assert_eq!(grid.advance(), DEFAULT_GRID);
    }

    #[test]
    fn snap_up_is_aligned() {
        assert_eq!(snap_up(60.0, 40.0), 80.0);
        assert_eq!(snap_up(160.0, 40.0), 160.0);
        assert_eq!(snap_up(-30.0, 20.0), -20.0);
    }

    #[test]
    fn edge_placements_stay_on_grid() {
        let pointers = [
            point(161.0, 61.0),
            point(170.0, 70.0),
            point(759.0, 61.0),
            point(161.0, 659.0),
            point(759.0, 659.0),
            point(460.0, 61.0),
            point(161.0, 360.0),
            point(459.0, 359.0),
        ];
        for grid in BuildSettings::default().grid_sizes {
            let mut surface = surface();
            while surface.grid_size() != grid {
                surface.toggle_grid();
            }
            for name in ["Small Engine", "Large Tank", "Girder", "Adapter Plate"] {
                for pointer in pointers {
                    place(&mut surface, name, pointer.x, pointer.y);
                    let part = surface.placed().last().unwrap();
                    let position = part.position();
                    assert_eq!(position.x.rem_euclid(grid), 0.0, "{name} at {pointer:?}");
                    assert_eq!(position.y.rem_euclid(grid), 0.0, "{name} at {pointer:?}");
                    assert!(
                        surface.area().contains_rect(&part.bounds()),
                        "{name} at {pointer:?} on grid {grid}"
                    );
                }
            }
        }
    }

    #[test]
    fn coarse_grid_clamps_to_first_inner_line() {
        let mut surface = surface();
        surface.toggle_grid();
        surface.toggle_grid();
        assert_eq!(surface.grid_size(), 40.0);
        place(&mut surface, "Small Engine", 170.0, 70.0);
        assert_eq!(surface.placed()[0].position(), point(160.0, 80.0));
    }

    #[test]
    fn rotating_dragged_part_keeps_it_inside() {
        let mut surface = surface();
        place(&mut surface, "Girder", 755.0, 300.0);
        assert_eq!(surface.placed()[0].position(), point(740.0, 250.0));

        surface.begin_drag(point(750.0, 300.0)).unwrap();
        surface.rotate_current(90).unwrap();
        let girder = &surface.placed()[0];
        assert_eq!(girder.effective_bounds(), BuildSize::new(100.0, 20.0));
        assert_eq!(girder.position(), point(660.0, 250.0));
        assert!(surface.area().contains_rect(&girder.bounds()));
    }

    #[test]
    fn placement_uses_active_grid() {
        let mut surface = surface();
        surface.toggle_grid();
        place(&mut surface, "Window", 333.0, 333.0);
        // 20x20 window, corner (323, 323) snapped to 20
        assert_eq!(surface.placed()[0].position(), point(320.0, 320.0));
    }

    #[test]
    fn commands_drive_the_surface() {
        let mut surface = surface();
        let commands = [
            BuildCommand::Pick(template("Small Tank")),
            BuildCommand::Rotate(90),
            BuildCommand::Place(point(400.0, 300.0)),
            BuildCommand::BeginDrag(point(400.0, 300.0)),
            BuildCommand::DragTo(point(500.0, 500.0)),
            BuildCommand::EndDrag,
            BuildCommand::ToggleGrid,
        ];
        for command in commands {
            surface.apply(command).unwrap();
        }
        let tank = &surface.placed()[0];
        assert_eq!(tank.effective_bounds(), BuildSize::new(100.0, 50.0));
        assert_eq!(tank.position(), point(450.0, 470.0));
        assert!(surface.dragged().is_none());
        assert_eq!(surface.grid_size(), 20.0);

        surface.apply(BuildCommand::Delete(point(500.0, 500.0))).unwrap();
        assert!(surface.placed().is_empty());
    }

    #[test]
    fn finalize_and_clear() {
        let mut surface = surface();
        place(&mut surface, "Fin", 300.0, 300.0);
        surface.pick_from_catalog(&template("Capsule")).unwrap();
        surface.finalize();
        assert!(surface.selected().is_none());
        assert_eq!(surface.placed().len(), 1);

        surface.clear();
        assert!(surface.placed().is_empty());
    }

    #[test]
    fn replace_placed_keeps_order() {
        let mut surface = surface();
        let catalog = Catalog::builtin();
        let parts: Vec<Part> = ["Fin", "Girder", "Capsule"]
            .iter()
            .map(|name| Part::create(catalog.find(name).unwrap()).unwrap())
            .collect();
        surface.replace_placed(parts);
        let names: Vec<&str> = surface.placed().iter().map(Part::name).collect();
        assert_eq!(names, ["Fin", "Girder", "Capsule"]);
        assert_eq!(surface.stats().part_count, 3);
    }
}
