//! Build area and elevation grid
//!
//! The elevation grid is the read-only terrain model every planning stage
//! samples. It stores one integer surface height per horizontal block in a
//! single flat buffer indexed by `(x - origin_x, z - origin_z)`.
//!
//! A surface height `t` is the Y of the first free block above the ground,
//! so a pier filling `[t, platform_y - 1]` closes the gap exactly.

use std::path::Path;

use noise::{NoiseFn, Perlin, Seedable};
use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::tilemap::Tilemap;

// =============================================================================
// BUILD AREA
// =============================================================================

/// Axis-aligned box of world blocks, inclusive on both corners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildArea {
    pub begin: [i32; 3],
    pub last: [i32; 3],
}

impl BuildArea {
    /// Create an area from two opposite corners in any order.
    pub fn new(a: [i32; 3], b: [i32; 3]) -> Self {
        Self {
            begin: [a[0].min(b[0]), a[1].min(b[1]), a[2].min(b[2])],
            last: [a[0].max(b[0]), a[1].max(b[1]), a[2].max(b[2])],
        }
    }

    pub fn min_x(&self) -> i32 {
        self.begin[0]
    }

    pub fn max_x(&self) -> i32 {
        self.last[0]
    }

    pub fn min_z(&self) -> i32 {
        self.begin[2]
    }

    pub fn max_z(&self) -> i32 {
        self.last[2]
    }

    pub fn bottom_y(&self) -> i32 {
        self.begin[1]
    }

    pub fn top_y(&self) -> i32 {
        self.last[1]
    }

    /// Number of blocks along X
    pub fn width(&self) -> usize {
        (self.last[0] - self.begin[0] + 1) as usize
    }

    /// Number of blocks along Z
    pub fn depth(&self) -> usize {
        (self.last[2] - self.begin[2] + 1) as usize
    }

    pub fn contains_xz(&self, x: i32, z: i32) -> bool {
        (self.min_x()..=self.max_x()).contains(&x) && (self.min_z()..=self.max_z()).contains(&z)
    }

    /// Centre column, rounded towards the begin corner.
    pub fn center_xz(&self) -> (i32, i32) {
        (
            self.min_x() + (self.max_x() - self.min_x()) / 2,
            self.min_z() + (self.max_z() - self.min_z()) / 2,
        )
    }

    /// Clamp a column into the area.
    pub fn clamp_xz(&self, x: i32, z: i32) -> (i32, i32) {
        (x.clamp(self.min_x(), self.max_x()), z.clamp(self.min_z(), self.max_z()))
    }
}

// =============================================================================
// ELEVATION GRID
// =============================================================================

/// Dense surface heights over a build area.
#[derive(Clone, Debug, PartialEq)]
pub struct ElevationGrid {
    area: BuildArea,
    heights: Tilemap<i32>,
}

impl ElevationGrid {
    /// Wrap a height buffer. Its dimensions must match the area exactly,
    /// so every column inside the area has a defined elevation.
    pub fn new(area: BuildArea, heights: Tilemap<i32>) -> Result<Self, PlanError> {
        if heights.width != area.width() || heights.height != area.depth() {
            return Err(PlanError::GridSizeMismatch {
                expected_width: area.width(),
                expected_depth: area.depth(),
                actual_width: heights.width,
                actual_depth: heights.height,
            });
        }
        Ok(Self { area, heights })
    }

    pub fn flat(area: BuildArea, elevation: i32) -> Self {
        Self {
            area,
            heights: Tilemap::new_with(area.width(), area.depth(), elevation),
        }
    }

    /// Build a grid by evaluating `f(x, z)` at every world column.
    pub fn from_fn(area: BuildArea, mut f: impl FnMut(i32, i32) -> i32) -> Self {
        let mut heights = Tilemap::new(area.width(), area.depth());
        for dz in 0..area.depth() {
            for dx in 0..area.width() {
                let x = area.min_x() + dx as i32;
                let z = area.min_z() + dz as i32;
                heights.set(dx, dz, f(x, z));
            }
        }
        Self { area, heights }
    }

    pub fn area(&self) -> &BuildArea {
        &self.area
    }

    pub fn contains(&self, x: i32, z: i32) -> bool {
        self.area.contains_xz(x, z)
    }

    /// Elevation at a world column, or `None` outside the area.
    pub fn get(&self, x: i32, z: i32) -> Option<i32> {
        if !self.contains(x, z) {
            return None;
        }
        let dx = (x - self.area.min_x()) as usize;
        let dz = (z - self.area.min_z()) as usize;
        Some(*self.heights.get(dx, dz))
    }

    /// Elevation at a world column, failing with `OutOfBoundsAnchor`.
    pub fn elevation(&self, x: i32, z: i32) -> Result<i32, PlanError> {
        self.get(x, z).ok_or(PlanError::OutOfBoundsAnchor { x, z })
    }

    /// Elevation at the nearest column inside the area.
    pub fn get_clamped(&self, x: i32, z: i32) -> i32 {
        let (cx, cz) = self.area.clamp_xz(x, z);
        let dx = (cx - self.area.min_x()) as usize;
        let dz = (cz - self.area.min_z()) as usize;
        *self.heights.get(dx, dz)
    }

    /// `(min, max)` over the square window `[cx - half, cx + half]` x
    /// `[cz - half, cz + half]`, or `None` if any part falls outside.
    pub fn window_min_max(&self, cx: i32, cz: i32, half: i32) -> Option<(i32, i32)> {
        if !self.contains(cx - half, cz - half) || !self.contains(cx + half, cz + half) {
            return None;
        }
        let x0 = (cx - half - self.area.min_x()) as usize;
        let x1 = (cx + half - self.area.min_x()) as usize;
        let z0 = (cz - half - self.area.min_z()) as usize;
        let z1 = (cz + half - self.area.min_z()) as usize;

        let mut lo = i32::MAX;
        let mut hi = i32::MIN;
        for dz in z0..=z1 {
            for &h in &self.heights.row(dz)[x0..=x1] {
                lo = lo.min(h);
                hi = hi.max(h);
            }
        }
        Some((lo, hi))
    }

    /// `(min, max)` over the whole grid.
    pub fn range(&self) -> (i32, i32) {
        self.heights
            .iter()
            .fold((i32::MAX, i32::MIN), |(lo, hi), (_, _, &h)| (lo.min(h), hi.max(h)))
    }

    // =========================================================================
    // LOADERS
    // =========================================================================

    /// Load a grid from JSON:
    /// `{ "area": { "begin": [x, y, z], "last": [x, y, z] }, "heights": [[..], ..] }`
    /// with one inner array per Z row, ordered by X.
    pub fn from_json_file(path: &Path) -> Result<Self, PlanError> {
        let contents = std::fs::read_to_string(path)?;
        let file: GridFile = serde_json::from_str(&contents)?;
        file.into_grid()
    }

    /// Write the grid in the same JSON layout `from_json_file` reads.
    pub fn to_json_file(&self, path: &Path) -> Result<(), PlanError> {
        let file = GridFile {
            area: self.area,
            heights: (0..self.heights.height).map(|z| self.heights.row(z).to_vec()).collect(),
        };
        std::fs::write(path, serde_json::to_string(&file)?)?;
        Ok(())
    }

    /// Load a grayscale PNG as a grid; each pixel is one column, image X
    /// maps to world X and image Y to world Z.
    pub fn from_png(path: &Path, import: &PngImport) -> Result<Self, PlanError> {
        let img = image::open(path)?.to_luma8();
        let (w, h) = img.dimensions();
        let area = BuildArea::new(
            [import.origin_x, import.bottom_y, import.origin_z],
            [
                import.origin_x + w as i32 - 1,
                import.top_y,
                import.origin_z + h as i32 - 1,
            ],
        );
        let data = img
            .pixels()
            .map(|p| import.base + (p.0[0] as f32 / 255.0 * import.relief as f32).round() as i32)
            .collect();
        let heights = Tilemap::from_vec(w as usize, h as usize, data).ok_or(
            PlanError::GridSizeMismatch {
                expected_width: w as usize,
                expected_depth: h as usize,
                actual_width: 0,
                actual_depth: 0,
            },
        )?;
        Self::new(area, heights)
    }
}

#[derive(Serialize, Deserialize)]
struct GridFile {
    area: BuildArea,
    heights: Vec<Vec<i32>>,
}

impl GridFile {
    fn into_grid(self) -> Result<ElevationGrid, PlanError> {
        let depth = self.heights.len();
        let width = self.heights.first().map_or(0, Vec::len);
        if self.heights.iter().any(|row| row.len() != width) {
            return Err(PlanError::InvalidConfig("heights rows have unequal lengths".into()));
        }
        let data: Vec<i32> = self.heights.into_iter().flatten().collect();
        let heights = Tilemap::from_vec(width, depth, data).ok_or(PlanError::GridSizeMismatch {
            expected_width: self.area.width(),
            expected_depth: self.area.depth(),
            actual_width: width,
            actual_depth: depth,
        })?;
        ElevationGrid::new(self.area, heights)
    }
}

/// How pixel values of a grayscale heightmap map to world coordinates.
#[derive(Clone, Debug)]
pub struct PngImport {
    pub origin_x: i32,
    pub origin_z: i32,
    /// Lowest Y of the build area
    pub bottom_y: i32,
    /// Highest Y of the build area
    pub top_y: i32,
    /// Elevation of a black pixel
    pub base: i32,
    /// Elevation difference between black and white
    pub relief: i32,
}

impl Default for PngImport {
    fn default() -> Self {
        Self {
            origin_x: 0,
            origin_z: 0,
            bottom_y: 0,
            top_y: 255,
            base: 60,
            relief: 32,
        }
    }
}

// =============================================================================
// SYNTHETIC TERRAIN
// =============================================================================

/// Parameters for synthetic terrain generation
#[derive(Clone, Debug)]
pub struct TerrainParams {
    /// Elevation of the noise midpoint
    pub base: i32,
    /// Peak deviation from `base` in blocks
    pub relief: f64,
    /// Base frequency for noise (lower = larger features)
    pub base_frequency: f64,
    /// Number of noise octaves
    pub octaves: u32,
    /// Amplitude decay per octave (0.0-1.0)
    pub persistence: f64,
    /// Frequency multiplier per octave
    pub lacunarity: f64,
    /// Heights snap to multiples of this step, producing buildable terraces
    pub terrace_step: i32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            base: 64,
            relief: 14.0,
            base_frequency: 0.012,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            terrace_step: 4,
        }
    }
}

/// Generate a terraced fBm height field over the area.
pub fn generate_terrain(area: BuildArea, seed: u64, params: &TerrainParams) -> ElevationGrid {
    let noise = Perlin::new(1).set_seed(seed as u32);
    let step = params.terrace_step.max(1);

    ElevationGrid::from_fn(area, |x, z| {
        let n = fbm(
            &noise,
            x as f64 * params.base_frequency,
            z as f64 * params.base_frequency,
            params.octaves,
            params.persistence,
            params.lacunarity,
        );
        let offset = (n * params.relief).round() as i32;
        let terraced = offset.div_euclid(step) * step;
        (params.base + terraced).clamp(area.bottom_y(), area.top_y())
    })
}

/// Fractional Brownian Motion - multi-octave noise
fn fbm(noise: &Perlin, x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves.max(1) {
        total += amplitude * noise.get([x * frequency, y * frequency]);
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    total / max_value
}
