use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_vector_shapes::prelude::*;
use editor::render::{fill_rect, kind_color, outline_rect};
use editor::surface::BuildSurface;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rocketry_core::model::settings::Settings;
use rocketry_core::model::units::{ScreenPoint, ScreenSize};
use rocketry_core::model::world::LaunchSite;
use rocketry_core::screen::ScreenMapping;
use rocketry_core::{assert_state_object, GameState, StateObjectPlugin};

use crate::model::{FlightInput, FlightModel};
use crate::render::{render_transform, to_screen};

pub mod field;
pub mod launch;
pub mod model;
pub mod render;

pub struct FlightPlugin;

impl Plugin for FlightPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(StateObjectPlugin::<GameState, FlightModel>::new(
            GameState::Flight,
        ))
        .add_systems(
            OnEnter(GameState::Flight),
            (start_flight, apply_deferred, assert_state_object::<FlightModel>).chain(),
        )
        .add_systems(
            FixedUpdate,
            flight_step.run_if(in_state(GameState::Flight)),
        )
        .add_systems(
            Update,
            (flight_reset, draw_flight).run_if(in_state(GameState::Flight)),
        );
    }
}

/// Held keys mapped onto flight controls, arrows and WASD both work
pub fn flight_input(keys: &Input<KeyCode>) -> FlightInput {
    FlightInput {
        rotate_left: keys.any_pressed([KeyCode::Left, KeyCode::A]),
        rotate_right: keys.any_pressed([KeyCode::Right, KeyCode::D]),
        thrust: keys.any_pressed([KeyCode::Up, KeyCode::W]),
        boost: keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]),
        warp_up: keys.pressed(KeyCode::Period),
        warp_down: keys.pressed(KeyCode::Comma),
    }
}

fn start_flight(
    mut commands: Commands,
    surface: Res<BuildSurface>,
    site: Res<LaunchSite>,
    settings: Res<Settings>,
) {
    let rng = settings
        .world
        .seed
        .map(StdRng::seed_from_u64)
        .unwrap_or_else(StdRng::from_entropy);
    let model = FlightModel::launch(
        surface.placed().to_vec(),
        *site,
        &settings.flight,
        &settings.world,
        rng,
    );
    let site_name = site
        .planet(&settings.world.planets)
        .map(|planet| planet.label())
        .unwrap_or("nowhere");
    info!(
        site = site_name,
        parts = model.parts().len(),
        width = model.footprint().size.width,
        height = model.footprint().size.height,
        position = ?model.ship().position,
        "Launched"
    );
    commands.insert_resource(model);
}

fn flight_step(keys: Res<Input<KeyCode>>, time: Res<Time>, mut model: ResMut<FlightModel>) {
    model.step(time.delta_seconds(), &flight_input(&keys));
}

fn flight_reset(
    keys: Res<Input<KeyCode>>,
    mut surface: ResMut<BuildSurface>,
    mut site: ResMut<LaunchSite>,
    mut state: ResMut<NextState<GameState>>,
) {
    if !keys.just_pressed(KeyCode::R) {
        return;
    }
    surface.clear();
    site.reset();
    info!("Flight reset, back to an empty build");
    state.set(GameState::Build);
}

fn visible(point: ScreenPoint, radius: f32, size: ScreenSize) -> bool {
    point.x >= -radius
        && point.y >= -radius
        && point.x <= size.width + radius
        && point.y <= size.height + radius
}

fn draw_flight(
    mut painter: ShapePainter,
    windows: Query<&Window, With<PrimaryWindow>>,
    model: Res<FlightModel>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let mapping = ScreenMapping::from_window(window);
    let size = mapping.size();
    let camera = model.camera_offset(size);

    painter.hollow = false;
    for star in model.stars() {
        let point = to_screen(star.position, camera);
        if !visible(point, 2.0, size) {
            continue;
        }
        painter.transform = mapping.point_transform(point, 0.0, 0.0);
        painter.color = Color::rgba(1.0, 1.0, 1.0, star.brightness);
        painter.circle(1.5);
    }

    for planet in model.planets() {
        let point = to_screen(planet.position, camera);
        if !visible(point, planet.radius, size) {
            continue;
        }
        let [r, g, b] = planet.color;
        painter.transform = mapping.point_transform(point, 0.0, 1.0);
        painter.hollow = false;
        painter.color = Color::rgb_linear(r, g, b);
        painter.circle(planet.radius);
    }

    painter.hollow = true;
    painter.thickness = 2.0;
    painter.color = Color::rgb(0.55, 0.5, 0.45);
    for asteroid in model.asteroids() {
        let point = to_screen(asteroid.position, camera);
        if !visible(point, asteroid.radius, size) {
            continue;
        }
        painter.transform = mapping.point_transform(point, 0.0, 2.0);
        painter.circle(asteroid.radius);
    }

    painter.transform = Transform::IDENTITY;
    painter.thickness = 1.0;
    let trail = model.trail();
    let count = trail.len().max(1) as f32;
    for (i, (from, to)) in trail.iter().zip(trail.iter().skip(1)).enumerate() {
        painter.color = Color::rgba(1.0, 0.8, 0.4, (i + 1) as f32 / count * 0.6);
        painter.line(
            mapping.line_end(to_screen(*from, camera), 3.0),
            mapping.line_end(to_screen(*to, camera), 3.0),
        );
    }

    let ship = model.ship();
    for (layer, part) in model.parts().iter().enumerate() {
        let transform = render_transform(part, ship);
        let rect = transform.screen_rect(part, camera);
        let depth = 4.0 + layer as f32 * 0.001;
        let rotation = transform.rotation;
        fill_rect(&mut painter, &mapping, rect, rotation, kind_color(part.kind()), depth);
        outline_rect(&mut painter, &mapping, rect, rotation, Color::BLACK, depth + 0.0005);
    }
}
