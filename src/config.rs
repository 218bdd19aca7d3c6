//! Planner tunables
//!
//! All constants of the planning pipeline live here so that a JSON file (or a
//! test) can change them without touching the algorithms.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Smallest garden that keeps tree canopies off the walls.
pub const MIN_DECORATED_GARDEN: i32 = 3;

/// Inclusive integer range `[lo, hi]`, serialized as a two-element array.
pub type Span = (i32, i32);

/// Global planner parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    // =========================================================================
    // Site Scan
    // =========================================================================

    /// Side of the square flatness window, and the inset from every build
    /// area edge for scanned centres (default: 19)
    pub min_size: i32,

    /// Largest allowed `max - min` elevation inside a window (default: 1)
    pub flatness_tolerance: i32,

    /// Headroom required between the window's highest sample and the top of
    /// the build area (default: 10)
    pub clearance_margin: i32,

    /// Use the build area centre when no flat window exists.
    /// When false, the scan fails with `NoFlatSiteFound` instead.
    pub allow_fallback: bool,

    // =========================================================================
    // Footprint
    // =========================================================================

    /// Building width range (default: [19, 23])
    pub width_range: Span,

    /// Building length range (default: [19, 23])
    pub length_range: Span,

    /// Wall height above the platform (default: [4, 6])
    pub wall_height_range: Span,

    /// How many times to redraw dimensions after a degenerate layout
    pub max_layout_attempts: u32,

    // =========================================================================
    // Roof
    // =========================================================================

    /// Number of stepped roof tiers (default: 3)
    pub roof_tier_count: u32,

    /// Outset of the lowest tier beyond the walls (default: 0)
    pub eave_overhang: i32,

    // =========================================================================
    // Decoration
    // =========================================================================

    /// Emit windows, furniture, garden and trees after the structure
    pub decorate: bool,

    /// Width of the grass ring around the footprint (default: 5)
    pub garden_buffer: i32,

    /// Tree trunk height range (default: [4, 6])
    pub tree_height_range: Span,

    /// Number of random grass tufts outside the footprint
    pub grass_patches: u32,

    /// Number of random flowers outside the footprint
    pub flowers: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            min_size: 19,
            flatness_tolerance: 1,
            clearance_margin: 10,
            allow_fallback: true,

            width_range: (19, 23),
            length_range: (19, 23),
            wall_height_range: (4, 6),
            max_layout_attempts: 8,

            roof_tier_count: 3,
            eave_overhang: 0,

            decorate: true,
            garden_buffer: 5,
            tree_height_range: (4, 6),
            grass_patches: 6,
            flowers: 20,
        }
    }
}

impl PlannerConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, PlanError> {
        let contents = std::fs::read_to_string(path)?;
        let config: PlannerConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject combinations the planner cannot work with.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.min_size < 1 {
            return Err(PlanError::InvalidConfig(format!(
                "min_size must be positive, got {}",
                self.min_size
            )));
        }
        if self.flatness_tolerance < 0 {
            return Err(PlanError::InvalidConfig(format!(
                "flatness_tolerance must not be negative, got {}",
                self.flatness_tolerance
            )));
        }
        for (name, (lo, hi)) in [
            ("width_range", self.width_range),
            ("length_range", self.length_range),
            ("wall_height_range", self.wall_height_range),
            ("tree_height_range", self.tree_height_range),
        ] {
            if lo > hi || lo < 1 {
                return Err(PlanError::InvalidConfig(format!(
                    "{} must be a positive range with lo <= hi, got [{}, {}]",
                    name, lo, hi
                )));
            }
        }
        // Cocoa pods are drawn from [2, trunk - 1].
        if self.tree_height_range.0 < 3 {
            return Err(PlanError::InvalidConfig(format!(
                "tree_height_range must start at 3 or more, got {}",
                self.tree_height_range.0
            )));
        }
        if self.roof_tier_count == 0 {
            return Err(PlanError::InvalidConfig("roof_tier_count must be at least 1".into()));
        }
        if self.eave_overhang < 0 {
            return Err(PlanError::InvalidConfig(format!(
                "eave_overhang must not be negative, got {}",
                self.eave_overhang
            )));
        }
        if self.max_layout_attempts == 0 {
            return Err(PlanError::InvalidConfig("max_layout_attempts must be at least 1".into()));
        }
        if self.garden_buffer < 0 {
            return Err(PlanError::InvalidConfig(format!(
                "garden_buffer must not be negative, got {}",
                self.garden_buffer
            )));
        }
        // Trees stand on the garden corners with a canopy two blocks wide.
        if self.decorate && self.garden_buffer < MIN_DECORATED_GARDEN {
            return Err(PlanError::InvalidConfig(format!(
                "garden_buffer must be at least {} when decorating, got {}",
                MIN_DECORATED_GARDEN, self.garden_buffer
            )));
        }
        Ok(())
    }
}
