use bevy::prelude::*;

fn main() {
    color_backtrace::install();
    App::new()
        .insert_resource(ClearColor(Color::rgb(0.02, 0.02, 0.05)))
        .add_plugins((DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Rocketry".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..Default::default()
            }),
            ..Default::default()
        }),))
        .add_plugins(rocketry_core::CorePlugin)
        .add_plugins((editor::EditorPlugin, flight::FlightPlugin))
        .run()
}
