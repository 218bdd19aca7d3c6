//! Diagnostic plot of a planned site
//!
//! Top-down PNG of the elevation grid with the plan drawn over it. Each grid
//! column becomes a `CELL_PX` square; north (-Z) is at the top.

use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};

use crate::error::PlanError;
use crate::heightmap::ElevationGrid;
use crate::structures::decor::tree_anchors;
use crate::structures::types::Rect;
use crate::structures::PlannedStructure;

/// Pixels per grid column.
const CELL_PX: u32 = 4;

const FOOTPRINT_COLOR: [u8; 3] = [0, 0, 0];
const COURTYARD_COLOR: [u8; 3] = [40, 90, 220];
const GARDEN_COLOR: [u8; 3] = [240, 210, 30];
/// Terrain below the platform: a pier is needed.
const PIER_COLOR: [u8; 3] = [220, 30, 30];
/// Terrain at or above the platform.
const GROUNDED_COLOR: [u8; 3] = [30, 170, 60];

/// Render the grid with the planned structure and save it as PNG.
pub fn render_site_plot(
    grid: &ElevationGrid,
    planned: &PlannedStructure,
    garden_buffer: i32,
    path: &Path,
) -> Result<(), PlanError> {
    let img = render_site_image(grid, planned, garden_buffer);
    img.save(path)?;
    Ok(())
}

/// Render to an image buffer.
pub fn render_site_image(grid: &ElevationGrid, planned: &PlannedStructure, garden_buffer: i32) -> RgbImage {
    let area = grid.area();
    let width = area.width() as u32 * CELL_PX;
    let height = area.depth() as u32 * CELL_PX;
    let mut img: RgbImage = ImageBuffer::new(width, height);

    let (lo, hi) = grid.range();
    let span = (hi - lo).max(1) as f32;
    for z in area.min_z()..=area.max_z() {
        for x in area.min_x()..=area.max_x() {
            let h = grid.get_clamped(x, z);
            let color = terrain_colormap((h - lo) as f32 / span);
            fill_cell(&mut img, grid, x, z, color);
        }
    }

    let fp = &planned.footprint;
    if garden_buffer > 0 {
        outline(&mut img, grid, &fp.rect.outset(garden_buffer), GARDEN_COLOR);
    }
    outline(&mut img, grid, &fp.rect, FOOTPRINT_COLOR);
    outline(&mut img, grid, &planned.courtyard.rect, COURTYARD_COLOR);

    let markers = fp.rect.corners().into_iter().chain(tree_anchors(fp, garden_buffer));
    for (x, z) in markers {
        let (cx, cz) = area.clamp_xz(x, z);
        let color = if grid.get_clamped(cx, cz) < fp.platform_y {
            PIER_COLOR
        } else {
            GROUNDED_COLOR
        };
        fill_cell(&mut img, grid, cx, cz, color);
    }

    img
}

fn fill_cell(img: &mut RgbImage, grid: &ElevationGrid, x: i32, z: i32, color: [u8; 3]) {
    if !grid.contains(x, z) {
        return;
    }
    let px = (x - grid.area().min_x()) as u32 * CELL_PX;
    let pz = (z - grid.area().min_z()) as u32 * CELL_PX;
    for dy in 0..CELL_PX {
        for dx in 0..CELL_PX {
            img.put_pixel(px + dx, pz + dy, Rgb(color));
        }
    }
}

/// Draw the border cells of a rect; cells outside the grid are skipped.
fn outline(img: &mut RgbImage, grid: &ElevationGrid, rect: &Rect, color: [u8; 3]) {
    for x in rect.x_min..=rect.x_max {
        fill_cell(img, grid, x, rect.z_min, color);
        fill_cell(img, grid, x, rect.z_max, color);
    }
    for z in rect.z_min..=rect.z_max {
        fill_cell(img, grid, rect.x_min, z, color);
        fill_cell(img, grid, rect.x_max, z, color);
    }
}

/// Elevation stops from sea blue through lowland green and brown up to
/// white peaks (matplotlib's `terrain`).
const TERRAIN_STOPS: [(f32, [u8; 3]); 6] = [
    (0.00, [51, 51, 153]),
    (0.15, [0, 153, 255]),
    (0.25, [0, 204, 102]),
    (0.50, [255, 255, 153]),
    (0.75, [128, 92, 84]),
    (1.00, [255, 255, 255]),
];

/// Colour for a normalized elevation, clamped to `[0, 1]`.
fn terrain_colormap(t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    for pair in TERRAIN_STOPS.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let frac = (t - t0) / (t1 - t0);
            return std::array::from_fn(|i| {
                (c0[i] as f32 + (c1[i] as f32 - c0[i] as f32) * frac).round() as u8
            });
        }
    }
    TERRAIN_STOPS[TERRAIN_STOPS.len() - 1].1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::heightmap::BuildArea;
    use crate::seeds::PlanSeeds;
    use crate::structures::plan_structure;

    #[test]
    fn test_plot_marks_footprint_and_piers() {
        let area = BuildArea::new([0, 0, 0], [59, 255, 59]);
        // West half sits lower than the east half.
        let grid = ElevationGrid::from_fn(area, |x, _| if x < 30 { 60 } else { 64 });
        let config = PlannerConfig { flatness_tolerance: 4, ..PlannerConfig::default() };
        let planned = plan_structure(&grid, &config, &PlanSeeds::from_master(3)).unwrap();

        let img = render_site_image(&grid, &planned, config.garden_buffer);
        assert_eq!(img.dimensions(), (60 * CELL_PX, 60 * CELL_PX));

        let r = planned.footprint.rect;
        let pixel = |x: i32, z: i32| img.get_pixel(x as u32 * CELL_PX + 1, z as u32 * CELL_PX + 1).0;
        let expected = |x: i32, z: i32| {
            if grid.get_clamped(x, z) < planned.footprint.platform_y {
                PIER_COLOR
            } else {
                GROUNDED_COLOR
            }
        };
        for (x, z) in r.corners() {
            assert_eq!(pixel(x, z), expected(x, z));
        }
        // Edge midpoints of the footprint are outline, not markers.
        assert_eq!(pixel(r.x_min, (r.z_min + r.z_max) / 2), FOOTPRINT_COLOR);
    }

    #[test]
    fn test_colormap_endpoints() {
        assert_eq!(terrain_colormap(0.0), [51, 51, 153]);
        assert_eq!(terrain_colormap(0.5), [255, 255, 153]);
        assert_eq!(terrain_colormap(1.0), [255, 255, 255]);
        assert_eq!(terrain_colormap(-3.0), terrain_colormap(0.0));
        assert_eq!(terrain_colormap(7.0), terrain_colormap(1.0));
    }
}
