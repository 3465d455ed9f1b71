use std::io::ErrorKind;

use bevy::app::{App, Plugin};
use bevy::prelude::{Commands, NextState, OnEnter, ResMut};
use camino::Utf8Path;
use miette::{miette, WrapErr};
use model::catalog::Catalog;
use model::settings::Settings;
use model::world::LaunchSite;
use tracing::info;

use crate::persistence::{DesignStore, DESIGN_FILE};
use crate::{report_error, GameState};

pub const SETTINGS_FILE: &str = "assets/settings.json5";
pub const CATALOG_FILE: &str = "assets/catalog.json5";

#[derive(Debug)]
pub struct InitPlugin;

impl Plugin for InitPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Init), load_config);
    }
}

fn load_config(mut commands: Commands, mut state: ResMut<NextState<GameState>>) {
    let settings = load_or_default(Utf8Path::new(SETTINGS_FILE), parse_settings, Settings::default);
    let catalog = load_or_default(Utf8Path::new(CATALOG_FILE), parse_catalog, Catalog::builtin);
    info!(
        parts = catalog.len(),
        planets = settings.world.planets.len(),
        "Configuration is ready, switching to build state"
    );

    commands.insert_resource(settings);
    commands.insert_resource(catalog);
    commands.insert_resource(LaunchSite::default());
    commands.insert_resource(DesignStore::new(DESIGN_FILE));
    state.set(GameState::Build);
}

fn parse_settings(text: &str) -> miette::Result<Settings> {
    Ok(Settings::from_json5(text)?)
}

fn parse_catalog(text: &str) -> miette::Result<Catalog> {
    Ok(Catalog::from_json5(text)?)
}

/// Reads and parses an optional config file. Missing files silently fall back
/// to the defaults, broken ones are reported first
fn load_or_default<T>(
    path: &Utf8Path,
    parse: impl FnOnce(&str) -> miette::Result<T>,
    fallback: impl FnOnce() -> T,
) -> T {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(%path, "No config file, using defaults");
            return fallback();
        }
        Err(err) => {
            report_error(miette!("Could not read `{path}`: {err}"));
            return fallback();
        }
    };

    match parse(&text).wrap_err_with(|| format!("Failed to load `{path}`, using defaults")) {
        Ok(value) => {
            info!(%path, "Loaded config file");
            value
        }
        Err(err) => {
            report_error(err);
            fallback()
        }
    }
}
