use crate::init::InitPlugin;
use bevy::app::{App, AppExit};
use bevy::ecs::prelude::States;
use bevy::prelude::*;
use bevy::time::Fixed;
use bevy_vector_shapes::Shape2dPlugin;

use std::marker::PhantomData;

// Re-export model
pub use model;

mod init;
pub mod persistence;
pub mod screen;

#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum GameState {
    /// Settings and catalog are being loaded
    #[default]
    Init,
    /// Rocket assembly on the build surface
    Build,
    /// Free flight with the assembled rocket
    Flight,
}

impl States for GameState {}

/// Rate of the fixed simulation clock
pub const TICK_RATE: f64 = 60.0;

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.add_state::<GameState>()
            .insert_resource(Time::<Fixed>::from_hz(TICK_RATE))
            .add_plugins((Shape2dPlugin::default(), InitPlugin))
            .add_systems(Startup, spawn_camera)
            .add_systems(Update, quit_on_escape);
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2dBundle::default());
}

fn quit_on_escape(keys: Res<Input<KeyCode>>, mut exit: EventWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        info!("Quit requested");
        exit.send(AppExit);
    }
}

/// Removes the resource `T` when leaving the state `S`
pub struct StateObjectPlugin<S: States + Clone, T: Resource>(S, PhantomData<T>);

impl<S: States + Clone, T: Resource> StateObjectPlugin<S, T> {
    pub fn new(state: S) -> Self {
        Self(state, Default::default())
    }
}

impl<S: States + Clone, T: Resource> Plugin for StateObjectPlugin<S, T> {
    fn build(&self, app: &mut App) {
        app.add_systems(OnExit(self.0.clone()), cleanup_state_object::<T>);
    }
}

/// Logs an error if the state object is missing, chain it after the system
/// that creates the object
pub fn assert_state_object<T: Resource>(res: Option<Res<T>>, state: Res<State<GameState>>) {
    if res.is_none() {
        error!(
            ?state,
            "State object is missing after transitioning to a state"
        )
    }
}

pub fn cleanup_state_object<T: Resource>(mut commands: Commands) {
    commands.remove_resource::<T>();
}

pub fn report_error(err: impl Into<miette::Report>) {
    error!("Something gone wrong.\n{:?}", err.into())
}
