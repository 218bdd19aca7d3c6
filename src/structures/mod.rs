//! Courtyard house planning
//!
//! This module plans one building on an elevation grid:
//! - Finds a flat site (or falls back to the build area centre)
//! - Draws the footprint, courtyard and wall height
//! - Reconciles piers and courtyard columns with the terrain
//! - Plans the stepped roof
//! - Assembles everything into an ordered structure plan
//! - Optionally appends furnishing, garden and trees
//!
//! Each stage draws from its own seeded RNG, so a plan is a pure function
//! of the grid, the config and the seeds.

pub mod decor;
pub mod footprint;
pub mod layout;
pub mod pillars;
pub mod placement;
pub mod roof;
pub mod types;

use rand_chacha::ChaCha8Rng;

use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::heightmap::ElevationGrid;
use crate::plan::StructurePlan;
use crate::seeds::PlanSeeds;

use decor::{choose_window_glass, decorate};
use footprint::{plan_courtyard, plan_footprint};
use layout::assemble;
use pillars::plan_pillars;
use placement::find_site;
use roof::plan_roof;
use types::{Courtyard, Footprint, PillarSpec, RoofTier, Site, SiteSelection};

/// Everything decided while planning one building
#[derive(Clone, Debug)]
pub struct PlannedStructure {
    pub selection: SiteSelection,
    pub footprint: Footprint,
    pub courtyard: Courtyard,
    /// Foundation piers and courtyard columns
    pub pillars: Vec<PillarSpec>,
    /// Eave tiers from the bottom up, cap last
    pub roof: Vec<RoofTier>,
    /// Piers under garden trees (empty without decoration)
    pub tree_piers: Vec<PillarSpec>,
    pub plan: StructurePlan,
    /// Footprint draws needed to get a non-degenerate layout
    pub layout_attempts: u32,
}

/// Main entry point for structure planning
///
/// 1. Pick the site
/// 2. Draw footprint, courtyard and roof, redrawing on degenerate sizes
/// 3. Reconcile piers and columns with the terrain
/// 4. Assemble the plan
/// 5. Append decoration
pub fn plan_structure(
    grid: &ElevationGrid,
    config: &PlannerConfig,
    seeds: &PlanSeeds,
) -> Result<PlannedStructure, PlanError> {
    config.validate()?;

    let mut site_rng = seeds.site_rng();
    let selection = find_site(grid, config, &mut site_rng)?;

    let mut layout_rng = seeds.layout_rng();
    let (footprint, courtyard, roof, layout_attempts) =
        plan_layout(&selection.site, config, &mut layout_rng)?;
    log::info!(
        "Building {}x{} {} house at ({}, {}, {})",
        footprint.width,
        footprint.length,
        footprint.orientation.display_name(),
        selection.site.x,
        selection.site.base_y,
        selection.site.z
    );

    let pillars = plan_pillars(&footprint, &courtyard, grid)?;

    let mut decor_rng = seeds.decor_rng();
    let window_glass = config.decorate.then(|| choose_window_glass(&mut decor_rng));

    let mut plan = assemble(&footprint, &courtyard, &pillars, &roof, window_glass.as_deref());

    let tree_piers = if config.decorate {
        let decoration = decorate(&footprint, &courtyard, grid, config, &mut decor_rng);
        plan.extend(decoration.plan);
        decoration.tree_piers
    } else {
        Vec::new()
    };

    log::info!("Plan ready: {} primitives, {} blocks", plan.len(), plan.total_volume());

    Ok(PlannedStructure {
        selection,
        footprint,
        courtyard,
        pillars,
        roof,
        tree_piers,
        plan,
        layout_attempts,
    })
}

/// Draw dimensions until courtyard and roof are both non-degenerate.
fn plan_layout(
    site: &Site,
    config: &PlannerConfig,
    rng: &mut ChaCha8Rng,
) -> Result<(Footprint, Courtyard, Vec<RoofTier>, u32), PlanError> {
    let mut last = PlanError::InvalidConfig("max_layout_attempts is zero".into());

    for attempt in 1..=config.max_layout_attempts {
        let footprint = plan_footprint(site, config, rng);
        let layout = plan_courtyard(&footprint).and_then(|courtyard| {
            plan_roof(&footprint, footprint.wall_top_y(), config.roof_tier_count, config.eave_overhang)
                .map(|roof| (courtyard, roof))
        });

        match layout {
            Ok((courtyard, roof)) => return Ok((footprint, courtyard, roof, attempt)),
            Err(err) if err.is_retryable() => {
                log::warn!("Layout attempt {} rejected: {}", attempt, err);
                last = err;
            }
            Err(err) => return Err(err),
        }
    }

    Err(PlanError::LayoutAttemptsExhausted {
        attempts: config.max_layout_attempts,
        last: Box::new(last),
    })
}
