use euclid::{Point2D, Rect, Size2D, Vector2D};

/// Build area coordinates. Same pixels as the window while editing, y grows down
#[derive(Debug)]
pub struct BuildSpace;
pub type BuildPoint = Point2D<f32, BuildSpace>;
pub type BuildVector = Vector2D<f32, BuildSpace>;
pub type BuildSize = Size2D<f32, BuildSpace>;
pub type BuildRect = Rect<f32, BuildSpace>;

/// Flight map coordinates, y grows down and heading 0 points to -y
#[derive(Debug)]
pub struct WorldSpace;
pub type WorldPoint = Point2D<f32, WorldSpace>;
pub type WorldVector = Vector2D<f32, WorldSpace>;
pub type WorldSize = Size2D<f32, WorldSpace>;

/// Window pixels, origin at the top left corner
#[derive(Debug)]
pub struct ScreenSpace;
pub type ScreenPoint = Point2D<f32, ScreenSpace>;
pub type ScreenSize = Size2D<f32, ScreenSpace>;
pub type ScreenRect = Rect<f32, ScreenSpace>;

/// Wraps an angle in degrees into `[0, 360)`
pub fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if wrapped >= 360.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::wrap_degrees;

    #[test]
    fn wraps_into_range() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(450.0), 90.0);
        assert_eq!(wrap_degrees(-90.0), 270.0);
        let tiny = wrap_degrees(-1e-9);
        assert!((0.0..360.0).contains(&tiny));
    }
}
