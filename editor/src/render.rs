use bevy::prelude::{Color, Transform, Vec2};
use bevy_vector_shapes::prelude::*;
use rocketry_core::model::part::PartKind;
use rocketry_core::model::units::{BuildPoint, BuildRect, ScreenRect};
use rocketry_core::screen::ScreenMapping;

use crate::surface::snap;

pub const OUTLINE: f32 = 1.5;

pub fn kind_color(kind: PartKind) -> Color {
    match kind {
        PartKind::Engine => Color::rgb(0.86, 0.36, 0.22),
        PartKind::Fuel => Color::rgb(0.92, 0.76, 0.24),
        PartKind::Structure => Color::rgb(0.62, 0.63, 0.68),
        PartKind::Decorative => Color::rgb(0.36, 0.7, 0.92),
        PartKind::Additional => Color::rgb(0.5, 0.84, 0.46),
    }
}

/// Build space shares the window's pixel grid
pub fn to_screen(rect: BuildRect) -> ScreenRect {
    rect.cast_unit()
}

pub fn fill_rect(
    painter: &mut ShapePainter,
    mapping: &ScreenMapping,
    rect: ScreenRect,
    rotation: f32,
    color: Color,
    depth: f32,
) {
    painter.transform = mapping.rect_transform(rect, rotation, depth);
    painter.hollow = false;
    painter.color = color;
    painter.rect(Vec2::new(rect.width(), rect.height()));
}

pub fn outline_rect(
    painter: &mut ShapePainter,
    mapping: &ScreenMapping,
    rect: ScreenRect,
    rotation: f32,
    color: Color,
    depth: f32,
) {
    painter.transform = mapping.rect_transform(rect, rotation, depth);
    painter.hollow = true;
    painter.thickness = OUTLINE;
    painter.color = color;
    painter.rect(Vec2::new(rect.width(), rect.height()));
}

/// Snap lines over the build area
pub fn grid_lines(
    painter: &mut ShapePainter,
    mapping: &ScreenMapping,
    area: BuildRect,
    grid: f32,
    depth: f32,
) {
    painter.transform = Transform::IDENTITY;
    painter.thickness = 0.5;
    painter.color = Color::rgba(1.0, 1.0, 1.0, 0.08);

    for x in grid_positions(area.min_x(), area.max_x(), grid) {
        let top = BuildPoint::new(x, area.min_y()).cast_unit();
        let bottom = BuildPoint::new(x, area.max_y()).cast_unit();
        painter.line(mapping.line_end(top, depth), mapping.line_end(bottom, depth));
    }
    for y in grid_positions(area.min_y(), area.max_y(), grid) {
        let left = BuildPoint::new(area.min_x(), y).cast_unit();
        let right = BuildPoint::new(area.max_x(), y).cast_unit();
        painter.line(mapping.line_end(left, depth), mapping.line_end(right, depth));
    }
}

/// Multiples of `grid` strictly between `min` and `max`, where parts snap to
pub fn grid_positions(min: f32, max: f32, grid: f32) -> impl Iterator<Item = f32> {
    let first = snap(min, grid) + grid;
    (0..)
        .map(move |step| first + step as f32 * grid)
        .take_while(move |line| *line < max)
}
