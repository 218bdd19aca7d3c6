//! Geometry types shared by the planning stages
//!
//! All coordinates are absolute world blocks. Rectangles are inclusive on
//! both ends, so a rectangle with `x_min == x_max` is one block wide.

use serde::Serialize;

use crate::plan::Pos;

/// Inclusive horizontal rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Rect {
    pub x_min: i32,
    pub x_max: i32,
    pub z_min: i32,
    pub z_max: i32,
}

impl Rect {
    pub fn new(x_min: i32, x_max: i32, z_min: i32, z_max: i32) -> Self {
        Self { x_min, x_max, z_min, z_max }
    }

    /// Rectangle spanning `center ± half_x` by `center ± half_z`.
    pub fn centered(cx: i32, cz: i32, half_x: i32, half_z: i32) -> Self {
        Self::new(cx - half_x, cx + half_x, cz - half_z, cz + half_z)
    }

    /// Blocks along X
    pub fn span_x(&self) -> i32 {
        self.x_max - self.x_min + 1
    }

    /// Blocks along Z
    pub fn span_z(&self) -> i32 {
        self.z_max - self.z_min + 1
    }

    pub fn is_empty(&self) -> bool {
        self.x_max < self.x_min || self.z_max < self.z_min
    }

    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.span_x() as i64 * self.span_z() as i64
        }
    }

    /// Shrink by `n` on every side (negative `n` grows). `None` if nothing is left.
    pub fn inset(&self, n: i32) -> Option<Rect> {
        let r = Rect::new(self.x_min + n, self.x_max - n, self.z_min + n, self.z_max - n);
        if r.is_empty() {
            None
        } else {
            Some(r)
        }
    }

    pub fn outset(&self, n: i32) -> Rect {
        Rect::new(self.x_min - n, self.x_max + n, self.z_min - n, self.z_max + n)
    }

    pub fn contains(&self, x: i32, z: i32) -> bool {
        (self.x_min..=self.x_max).contains(&x) && (self.z_min..=self.z_max).contains(&z)
    }

    /// True if `other` fits inside with at least one block to spare on every side.
    pub fn strictly_contains(&self, other: &Rect) -> bool {
        other.x_min > self.x_min
            && other.x_max < self.x_max
            && other.z_min > self.z_min
            && other.z_max < self.z_max
    }

    /// Corners as `(x, z)`: (min,min), (min,max), (max,min), (max,max).
    pub fn corners(&self) -> [(i32, i32); 4] {
        [
            (self.x_min, self.z_min),
            (self.x_min, self.z_max),
            (self.x_max, self.z_min),
            (self.x_max, self.z_max),
        ]
    }

    /// Midpoints of the four edges as `(x, z)`: west, north, east, south.
    pub fn edge_midpoints(&self) -> [(i32, i32); 4] {
        let mid_x = (self.x_min + self.x_max).div_euclid(2);
        let mid_z = (self.z_min + self.z_max).div_euclid(2);
        [
            (self.x_min, mid_z),
            (mid_x, self.z_min),
            (self.x_max, mid_z),
            (mid_x, self.z_max),
        ]
    }

    /// Box corners of this rectangle between two heights.
    pub fn box_corners(&self, y0: i32, y1: i32) -> (Pos, Pos) {
        ([self.x_min, y0, self.z_min], [self.x_max, y1, self.z_max])
    }
}

/// The chosen building location. `base_y` is the platform elevation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Site {
    pub x: i32,
    pub z: i32,
    pub base_y: i32,
}

/// How a site was obtained
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SiteQuality {
    /// Picked uniformly among this many flat windows
    Flat { candidates: usize },
    /// No flat window existed; centre of the build area, flatness not guaranteed
    Fallback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SiteSelection {
    pub site: Site,
    pub quality: SiteQuality,
}

impl SiteSelection {
    pub fn is_fallback(&self) -> bool {
        self.quality == SiteQuality::Fallback
    }
}

/// Long axis of the building
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Orientation {
    NorthSouth,
    EastWest,
}

impl Orientation {
    pub fn display_name(&self) -> &'static str {
        match self {
            Orientation::NorthSouth => "north-south",
            Orientation::EastWest => "east-west",
        }
    }
}

/// Horizontal direction, named the way block states spell it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Facing {
    North,
    South,
    East,
    West,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::North, Facing::South, Facing::East, Facing::West];

    pub fn as_str(&self) -> &'static str {
        match self {
            Facing::North => "north",
            Facing::South => "south",
            Facing::East => "east",
            Facing::West => "west",
        }
    }

    /// Unit step `(dx, dz)`; north is -Z, east is +X.
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Facing::North => (0, -1),
            Facing::South => (0, 1),
            Facing::East => (1, 0),
            Facing::West => (-1, 0),
        }
    }
}

/// Door position (lower half) and the direction it faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Door {
    pub pos: Pos,
    pub facing: Facing,
}

/// The building rectangle and everything drawn with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Footprint {
    pub rect: Rect,
    /// Drawn width (short side across the orientation axis)
    pub width: i32,
    /// Drawn length
    pub length: i32,
    pub wall_height: i32,
    pub orientation: Orientation,
    pub door: Door,
    /// Site centre the rectangle is built around
    pub center: (i32, i32),
    pub platform_y: i32,
}

impl Footprint {
    /// Y of the top wall layer.
    pub fn wall_top_y(&self) -> i32 {
        self.platform_y + self.wall_height
    }
}

/// Open courtyard nested inside the footprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Courtyard {
    pub rect: Rect,
    /// `min(width, length) / 2 - 2`
    pub size: i32,
}

impl Courtyard {
    /// Ring of blocks immediately around the courtyard, where its columns stand.
    pub fn frame(&self) -> Rect {
        self.rect.outset(1)
    }
}

/// Why a pillar exists
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PillarRole {
    /// Buried support below a footprint corner
    Pier,
    /// Visible column framing the courtyard
    Column,
    /// Support below a garden tree
    TreePier,
}

/// Vertical fill at one anchor column, `base_y..=top_y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PillarSpec {
    pub x: i32,
    pub z: i32,
    pub role: PillarRole,
    /// Sampled terrain surface at the anchor
    pub terrain_y: i32,
    pub base_y: i32,
    pub top_y: i32,
}

impl PillarSpec {
    pub fn height(&self) -> i32 {
        self.top_y - self.base_y + 1
    }
}

/// Block role of a roof layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RoofRole {
    /// Sloped stepped tier
    Eave,
    /// Flat capping layer
    Cap,
}

/// One roof layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RoofTier {
    /// 1-based from the bottom; the cap is `tier_count + 1`
    pub index: u32,
    pub rect: Rect,
    pub y: i32,
    pub role: RoofRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_spans_are_inclusive() {
        let r = Rect::centered(0, 0, 9, 10);
        assert_eq!(r.span_x(), 19);
        assert_eq!(r.span_z(), 21);
        assert_eq!(r.area(), 19 * 21);
    }

    #[test]
    fn test_inset_until_empty() {
        let r = Rect::new(0, 4, 0, 2);
        assert_eq!(r.inset(1), Some(Rect::new(1, 3, 1, 1)));
        assert_eq!(r.inset(2), None);
        assert_eq!(r.inset(-1), Some(r.outset(1)));
    }

    #[test]
    fn test_strict_containment() {
        let outer = Rect::new(0, 10, 0, 10);
        assert!(outer.strictly_contains(&Rect::new(1, 9, 1, 9)));
        assert!(!outer.strictly_contains(&Rect::new(0, 9, 1, 9)));
    }

    #[test]
    fn test_edge_midpoints() {
        let r = Rect::new(0, 8, 10, 14);
        assert_eq!(r.edge_midpoints(), [(0, 12), (4, 10), (8, 12), (4, 14)]);
        // Rounds down, not towards zero.
        let neg = Rect::new(-5, -2, -3, 0);
        assert_eq!(neg.edge_midpoints()[1], (-4, -3));
    }

    #[test]
    fn test_facing_offsets() {
        for facing in Facing::ALL {
            let (dx, dz) = facing.offset();
            assert_eq!(dx.abs() + dz.abs(), 1);
        }
        assert_eq!(Facing::West.as_str(), "west");
    }
}
