//! The wheel: four fixed angular sectors and pointer hit-testing.
//!
//! Angles are degrees in `[0, 360)`, measured with `atan2` in screen
//! coordinates (y down), so 0-90 is the lower-right quadrant.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    Red,
    Yellow,
    Green,
    Blue,
}

impl Sector {
    pub const COUNT: usize = 4;

    /// All sectors in angular order around the wheel.
    pub const ALL: [Sector; Sector::COUNT] = [
        Sector::Red,
        Sector::Yellow,
        Sector::Green,
        Sector::Blue,
    ];

    /// Half-open angular range `[start, end)` of this sector, in degrees.
    pub const fn angles(self) -> (f32, f32) {
        match self {
            Sector::Red => (0.0, 90.0),
            Sector::Yellow => (90.0, 180.0),
            Sector::Green => (180.0, 270.0),
            Sector::Blue => (270.0, 360.0),
        }
    }

    /// Maps a normalized angle in `[0, 360)` onto the partition.
    pub fn from_angle(degrees: f32) -> Sector {
        if degrees < 90.0 {
            Sector::Red
        } else if degrees < 180.0 {
            Sector::Yellow
        } else if degrees < 270.0 {
            Sector::Green
        } else {
            Sector::Blue
        }
    }
}

/// Placement of the wheel on a surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelGeometry {
    pub center_x: f32,
    pub center_y: f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
}

impl WheelGeometry {
    /// Resolves a pointer position to the sector under it.
    ///
    /// Points inside the hub or outside the rim resolve to `None` and are
    /// ignored by the caller.
    pub fn sector_at(&self, x: f32, y: f32) -> Option<Sector> {
        let dx = x - self.center_x;
        let dy = y - self.center_y;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance < self.inner_radius || distance > self.outer_radius {
            return None;
        }

        let mut angle = dy.atan2(dx).to_degrees();
        if angle < 0.0 {
            angle += 360.0;
        }
        Some(Sector::from_angle(angle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> WheelGeometry {
        WheelGeometry {
            center_x: 0.0,
            center_y: 0.0,
            inner_radius: 5.0,
            outer_radius: 20.0,
        }
    }

    #[test]
    fn angular_ranges_partition_the_circle() {
        let mut end = 0.0;
        for sector in Sector::ALL {
            let (start, next_end) = sector.angles();
            assert_eq!(start, end, "ranges must be contiguous");
            assert!(next_end > start);
            end = next_end;
        }
        assert_eq!(end, 360.0);
    }

    #[test]
    fn each_quadrant_resolves_to_its_sector() {
        let geo = geometry();
        assert_eq!(geo.sector_at(10.0, 10.0), Some(Sector::Red));
        assert_eq!(geo.sector_at(-10.0, 10.0), Some(Sector::Yellow));
        assert_eq!(geo.sector_at(-10.0, -10.0), Some(Sector::Green));
        assert_eq!(geo.sector_at(10.0, -10.0), Some(Sector::Blue));
    }

    #[test]
    fn hub_and_rim_misses_resolve_to_none() {
        let geo = geometry();
        assert_eq!(geo.sector_at(1.0, 1.0), None, "inside the hub");
        assert_eq!(geo.sector_at(30.0, 30.0), None, "outside the rim");
    }

    #[test]
    fn ring_boundary_is_inclusive() {
        let geo = geometry();
        assert_eq!(geo.sector_at(20.0, 0.0), Some(Sector::Red));
        assert_eq!(geo.sector_at(0.0, 5.0), Some(Sector::Yellow));
    }

    #[test]
    fn from_angle_handles_range_edges() {
        assert_eq!(Sector::from_angle(0.0), Sector::Red);
        assert_eq!(Sector::from_angle(89.999), Sector::Red);
        assert_eq!(Sector::from_angle(90.0), Sector::Yellow);
        assert_eq!(Sector::from_angle(359.999), Sector::Blue);
    }
}
