use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_vector_shapes::prelude::*;
use rocketry_core::model::catalog::Catalog;
use rocketry_core::model::settings::Settings;
use rocketry_core::model::units::{BuildPoint, BuildRect};
use rocketry_core::model::world::LaunchSite;
use rocketry_core::persistence::{DesignStore, PersistenceError};
use rocketry_core::screen::ScreenMapping;
use rocketry_core::{report_error, GameState};

use crate::panel::CatalogPanel;
use crate::render::{fill_rect, grid_lines, kind_color, outline_rect, to_screen};
use crate::surface::{BuildCommand, BuildSurface};

pub mod panel;
pub mod render;
pub mod surface;

/// Rotation step of the `R` key, in degrees
pub const ROTATE_STEP: i32 = 90;

pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnExit(GameState::Init), init_surface)
            .add_systems(OnEnter(GameState::Build), enter_build)
            .add_systems(OnExit(GameState::Build), finalize_design)
            .add_systems(
                Update,
                (pointer_input, keyboard_input, persistence_input, draw_build)
                    .chain()
                    .run_if(in_state(GameState::Build)),
            );
    }
}

fn init_surface(mut commands: Commands, settings: Res<Settings>, catalog: Res<Catalog>) {
    commands.insert_resource(BuildSurface::from_settings(&settings.build));
    commands.insert_resource(CatalogPanel::new(&settings.build.panel, &catalog));
}

fn enter_build(surface: Res<BuildSurface>) {
    info!(
        parts = surface.placed().len(),
        grid = surface.grid_size(),
        "Entered build mode"
    );
}

/// Mode barrier, flight only ever sees placed parts
fn finalize_design(mut surface: ResMut<BuildSurface>) {
    surface.finalize();
    let stats = surface.stats();
    info!(
        parts = stats.part_count,
        mass = stats.total_mass,
        thrust = stats.total_thrust,
        fuel = stats.fuel_capacity,
        twr = stats.thrust_to_weight(),
        burn_time = ?stats.burn_time(),
        "Design finalized"
    );
}

fn cursor(windows: &Query<&Window, With<PrimaryWindow>>) -> Option<BuildPoint> {
    let position = windows.get_single().ok()?.cursor_position()?;
    Some(BuildPoint::new(position.x, position.y))
}

/// Translates the mouse state of this frame into surface edits
pub fn pointer_commands(
    buttons: &Input<MouseButton>,
    pointer: Option<BuildPoint>,
    catalog: &Catalog,
    panel: &CatalogPanel,
    holding: bool,
) -> Vec<BuildCommand> {
    let mut commands = vec![];
    if let Some(pointer) = pointer {
        if buttons.just_pressed(MouseButton::Left) {
            if let Some(template) = panel.slot_at(pointer).and_then(|slot| catalog.get(slot)) {
                commands.push(BuildCommand::Pick(template.clone()));
            } else if holding {
                commands.push(BuildCommand::Place(pointer));
            } else {
                commands.push(BuildCommand::BeginDrag(pointer));
            }
        } else if buttons.pressed(MouseButton::Left) {
            commands.push(BuildCommand::DragTo(pointer));
        }
        if buttons.just_pressed(MouseButton::Right) {
            commands.push(BuildCommand::Delete(pointer));
        }
    }
    if buttons.just_released(MouseButton::Left) {
        commands.push(BuildCommand::EndDrag);
    }
    commands
}

fn pointer_input(
    buttons: Res<Input<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    catalog: Res<Catalog>,
    panel: Res<CatalogPanel>,
    mut surface: ResMut<BuildSurface>,
) {
    let commands = pointer_commands(
        &buttons,
        cursor(&windows),
        &catalog,
        &panel,
        surface.selected().is_some(),
    );
    for command in commands {
        let picked = matches!(command, BuildCommand::Pick(_));
        if let Err(err) = surface.apply(command) {
            report_error(err);
            continue;
        }
        if let Some(part) = surface.selected().filter(|_| picked) {
            info!(id = %part.id(), "Picked part\n{}", part.describe());
        }
    }
}

fn keyboard_input(
    keys: Res<Input<KeyCode>>,
    settings: Res<Settings>,
    mut surface: ResMut<BuildSurface>,
    mut site: ResMut<LaunchSite>,
    mut state: ResMut<NextState<GameState>>,
) {
    if keys.just_pressed(KeyCode::R) {
        if let Err(err) = surface.apply(BuildCommand::Rotate(ROTATE_STEP)) {
            report_error(err);
        }
    }
    if keys.just_pressed(KeyCode::G) {
        let grid = surface.toggle_grid();
        info!(grid, "Grid size changed");
    }
    if keys.just_pressed(KeyCode::Tab) {
        let planets = &settings.world.planets;
        site.cycle(planets.len());
        if let Some(planet) = site.planet(planets) {
            info!(site = planet.label(), "Launch site changed");
        }
    }
    if keys.just_pressed(KeyCode::L) {
        info!("Launch requested");
        state.set(GameState::Flight);
    }
}

fn persistence_input(
    keys: Res<Input<KeyCode>>,
    store: Res<DesignStore>,
    mut surface: ResMut<BuildSurface>,
) {
    if keys.just_pressed(KeyCode::F5) {
        match store.save(surface.placed()) {
            Ok(()) => info!(path = %store.path(), parts = surface.placed().len(), "Design saved"),
            Err(err) => report_error(err),
        }
    }
    if keys.just_pressed(KeyCode::F9) {
        match store.load() {
            Ok(parts) => {
                info!(path = %store.path(), parts = parts.len(), "Design loaded");
                surface.replace_placed(parts);
            }
            Err(PersistenceError::NotSaved(path)) => info!(%path, "No saved design to load"),
            Err(err) => report_error(err),
        }
    }
}

fn draw_build(
    mut painter: ShapePainter,
    windows: Query<&Window, With<PrimaryWindow>>,
    surface: Res<BuildSurface>,
    panel: Res<CatalogPanel>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let mapping = ScreenMapping::from_window(window);
    let area = to_screen(surface.area());

    fill_rect(&mut painter, &mapping, area, 0.0, Color::rgb(0.08, 0.09, 0.12), 0.0);
    grid_lines(&mut painter, &mapping, surface.area(), surface.grid_size(), 0.5);
    outline_rect(&mut painter, &mapping, area, 0.0, Color::GRAY, 0.6);

    for (_, kind, rect) in panel.slots() {
        let rect = to_screen(rect);
        let color = kind_color(kind);
        fill_rect(&mut painter, &mapping, rect, 0.0, color.with_a(0.35), 1.0);
        outline_rect(&mut painter, &mapping, rect, 0.0, color, 1.1);
    }

    let dragged = surface.dragged().map(|part| part.id());
    for (layer, part) in surface.placed().iter().enumerate() {
        let depth = 2.0 + layer as f32 * 0.001;
        let rect = to_screen(part.bounds());
        fill_rect(&mut painter, &mapping, rect, 0.0, kind_color(part.kind()), depth);
        let edge = if dragged == Some(part.id()) {
            Color::WHITE
        } else {
            Color::BLACK
        };
        outline_rect(&mut painter, &mapping, rect, 0.0, edge, depth + 0.0005);
    }

    let (Some(part), Some(pointer)) = (surface.selected(), cursor(&windows)) else {
        return;
    };
    let size = part.effective_bounds();
    let origin = surface
        .preview_at(pointer)
        .unwrap_or(pointer - size.to_vector() / 2.0);
    let rect = to_screen(BuildRect::new(origin, size));
    fill_rect(&mut painter, &mapping, rect, 0.0, kind_color(part.kind()).with_a(0.5), 5.0);
    outline_rect(&mut painter, &mapping, rect, 0.0, Color::WHITE, 5.1);
}
