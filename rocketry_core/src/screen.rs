use bevy::math::{Quat, Vec2, Vec3};
use bevy::prelude::Transform;
use bevy::window::Window;
use model::units::{ScreenPoint, ScreenRect, ScreenSize};

/// Maps window pixels (origin top left, y down) onto the 2d camera, which sits
/// at the origin with y pointing up
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenMapping {
    size: ScreenSize,
}

impl ScreenMapping {
    pub fn new(size: ScreenSize) -> Self {
        Self { size }
    }

    pub fn from_window(window: &Window) -> Self {
        Self::new(ScreenSize::new(window.width(), window.height()))
    }

    pub fn size(&self) -> ScreenSize {
        self.size
    }

    pub fn to_camera(&self, point: ScreenPoint) -> Vec2 {
        Vec2::new(
            point.x - self.size.width / 2.0,
            self.size.height / 2.0 - point.y,
        )
    }

    /// Transform placing a shape at the center of `rect`, turned by
    /// `rotation` degrees counter-clockwise as seen on screen
    pub fn rect_transform(&self, rect: ScreenRect, rotation: f32, depth: f32) -> Transform {
        self.point_transform(rect.center(), rotation, depth)
    }

    pub fn point_transform(&self, point: ScreenPoint, rotation: f32, depth: f32) -> Transform {
        Transform::from_translation(self.to_camera(point).extend(depth))
            .with_rotation(Quat::from_rotation_z(rotation.to_radians()))
    }

    pub fn line_end(&self, point: ScreenPoint, depth: f32) -> Vec3 {
        self.to_camera(point).extend(depth)
    }
}
