//! Site selection over an elevation grid
//!
//! Every column far enough from the build area edges is the centre of a
//! square window. A window is a candidate site when its elevation spread is
//! within tolerance and its highest sample leaves headroom below the top of
//! the build area. One candidate is chosen uniformly at random; with no
//! candidates the build area centre is used instead.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::heightmap::ElevationGrid;
use super::types::{Site, SiteQuality, SiteSelection};

/// Result of a flatness scan
#[derive(Clone, Debug, Default)]
pub struct ScanReport {
    /// Candidate sites in scan order (x-major, then z)
    pub candidates: Vec<Site>,
    /// Number of windows evaluated
    pub windows_scanned: usize,
}

/// Evaluate the window centred at `(x, z)`.
///
/// Returns the candidate site with the window minimum as platform elevation.
pub fn evaluate_window(grid: &ElevationGrid, x: i32, z: i32, config: &PlannerConfig) -> Option<Site> {
    let half = config.min_size / 2;
    let (lo, hi) = grid.window_min_max(x, z, half)?;
    let clearance_limit = grid.area().top_y() - config.clearance_margin;

    if hi - lo <= config.flatness_tolerance && hi < clearance_limit {
        Some(Site { x, z, base_y: lo })
    } else {
        None
    }
}

/// Scan all interior columns for flat windows.
///
/// Columns are split across threads by X; results are concatenated in
/// scan order so the candidate list is the same as a sequential scan.
pub fn scan_candidates(grid: &ElevationGrid, config: &PlannerConfig) -> ScanReport {
    let area = grid.area();
    let x_start = area.min_x() + config.min_size;
    let x_end = area.max_x() - config.min_size;
    let z_start = area.min_z() + config.min_size;
    let z_end = area.max_z() - config.min_size;

    if x_start > x_end || z_start > z_end {
        return ScanReport::default();
    }

    let candidates: Vec<Site> = (x_start..=x_end)
        .into_par_iter()
        .flat_map_iter(|x| (z_start..=z_end).filter_map(move |z| evaluate_window(grid, x, z, config)))
        .collect();

    let windows_scanned = ((x_end - x_start + 1) * (z_end - z_start + 1)) as usize;

    ScanReport {
        candidates,
        windows_scanned,
    }
}

/// Pick the building site.
///
/// With `allow_fallback` (the default) this never fails: an empty candidate
/// set yields the build area centre with the elevation sampled there, and
/// the selection is flagged as `SiteQuality::Fallback`.
pub fn find_site(
    grid: &ElevationGrid,
    config: &PlannerConfig,
    rng: &mut ChaCha8Rng,
) -> Result<SiteSelection, PlanError> {
    log::info!("Scanning for a suitable build location (window {})", config.min_size);
    let report = scan_candidates(grid, config);

    if !report.candidates.is_empty() {
        let idx = rng.gen_range(0..report.candidates.len());
        let site = report.candidates[idx];
        log::info!(
            "Chose site ({}, {}, {}) among {} flat windows of {} scanned",
            site.x,
            site.base_y,
            site.z,
            report.candidates.len(),
            report.windows_scanned
        );
        return Ok(SiteSelection {
            site,
            quality: SiteQuality::Flat {
                candidates: report.candidates.len(),
            },
        });
    }

    if !config.allow_fallback {
        return Err(PlanError::NoFlatSiteFound {
            candidates_checked: report.windows_scanned,
        });
    }

    let (x, z) = grid.area().center_xz();
    let base_y = grid.elevation(x, z)?;
    log::warn!(
        "No suitable flat spot among {} windows; using build area centre ({}, {}, {})",
        report.windows_scanned,
        x,
        base_y,
        z
    );
    Ok(SiteSelection {
        site: Site { x, z, base_y },
        quality: SiteQuality::Fallback,
    })
}
