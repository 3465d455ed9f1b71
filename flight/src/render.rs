use rocketry_core::model::part::Part;
use rocketry_core::model::units::{
    wrap_degrees, ScreenPoint, ScreenRect, WorldPoint, WorldSize, WorldVector,
};

use crate::model::Ship;

/// Where a part of the rigid body is drawn this frame
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PartTransform {
    /// Top left corner of the part's unrotated footprint
    pub position: WorldPoint,
    /// Degrees, in `[0, 360)`
    pub rotation: f32,
}

impl PartTransform {
    /// Screen rect of the part's base shape, to be turned by
    /// [rotation](PartTransform::rotation) around its center
    pub fn screen_rect(&self, part: &Part, camera: WorldPoint) -> ScreenRect {
        let effective: WorldSize = part.effective_bounds().cast_unit();
        let center = self.position + effective.to_vector() / 2.0;
        let base: WorldSize = part.base_size().cast_unit();
        let corner = center - base.to_vector() / 2.0;
        ScreenRect::new(to_screen(corner, camera), base.cast_unit())
    }
}

/// Places `part` relative to the ship origin by its build coordinates, the
/// part itself is left untouched
pub fn render_transform(part: &Part, ship: &Ship) -> PartTransform {
    let offset: WorldVector = part.position().to_vector().cast_unit();
    PartTransform {
        position: ship.position + offset,
        rotation: wrap_degrees(part.rotation().degrees() as f32 + ship.heading),
    }
}

pub fn to_screen(point: WorldPoint, camera: WorldPoint) -> ScreenPoint {
    (point - camera).to_point().cast_unit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rocketry_core::model::catalog::Catalog;
    use rocketry_core::model::part::Rotation;
    use rocketry_core::model::units::{BuildPoint, ScreenSize};

    fn ship(x: f32, y: f32, heading: f32) -> Ship {
        let mut ship = Ship::at(WorldPoint::new(x, y));
        ship.heading = heading;
        ship
    }

    fn tank() -> Part {
        let mut part = Part::create(Catalog::builtin().find("Small Tank").unwrap()).unwrap();
        part.place(BuildPoint::new(200.0, 120.0));
        part
    }

    #[test]
    fn offsets_by_build_coordinates() {
        let transform = render_transform(&tank(), &ship(1000.0, -500.0, 0.0));
        assert_eq!(transform.position, WorldPoint::new(1200.0, -380.0));
        assert_eq!(transform.rotation, 0.0);
    }

    #[test]
    fn rotation_composes_with_heading() {
        let mut part = tank();
        part.rotate(270).unwrap();
        let transform = render_transform(&part, &ship(0.0, 0.0, 135.0));
        assert_relative_eq!(transform.rotation, 45.0);
    }

    #[test]
    fn part_is_not_mutated() {
        let mut part = tank();
        part.rotate(90).unwrap();
        let before = (part.position(), part.rotation(), part.effective_bounds());
        for heading in [0.0, 90.0, 181.5, 359.0] {
            render_transform(&part, &ship(10.0, 20.0, heading));
        }
        assert_eq!((part.position(), part.rotation(), part.effective_bounds()), before);
        assert_eq!(part.rotation(), Rotation::Deg90);
    }

    #[test]
    fn screen_rect_keeps_center_of_rotated_part() {
        let mut part = tank();
        part.rotate(90).unwrap();
        let transform = render_transform(&part, &ship(0.0, 0.0, 0.0));
        let camera = WorldPoint::new(-100.0, -100.0);
        let rect = transform.screen_rect(&part, camera);
        // sideways tank spans 100x50 from (200, 120), center (250, 145)
        assert_eq!(rect.center(), ScreenPoint::new(350.0, 245.0));
        assert_eq!(rect.size, ScreenSize::new(50.0, 100.0));
    }
}
