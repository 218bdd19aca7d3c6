//! Terrain reconciliation for the flat platform
//!
//! The platform sits at one elevation while the terrain under it does not.
//! Two kinds of vertical fill bridge the difference:
//! - piers under the footprint corners, filling `[terrain, platform - 1]`
//!   only where the terrain is below the platform
//! - columns around the courtyard, from `min(terrain, platform)` up to the
//!   wall top, always emitted

use serde::Serialize;

use crate::error::PlanError;
use crate::heightmap::ElevationGrid;
use super::types::{Courtyard, Footprint, PillarRole, PillarSpec};

/// A column position and the role a pillar there would play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Anchor {
    pub x: i32,
    pub z: i32,
    pub role: PillarRole,
}

/// The four footprint corners.
pub fn foundation_anchors(footprint: &Footprint) -> Vec<Anchor> {
    footprint
        .rect
        .corners()
        .into_iter()
        .map(|(x, z)| Anchor { x, z, role: PillarRole::Pier })
        .collect()
}

/// Corners then edge midpoints of the ring around the courtyard.
pub fn courtyard_anchors(courtyard: &Courtyard) -> Vec<Anchor> {
    let frame = courtyard.frame();
    frame
        .corners()
        .into_iter()
        .chain(frame.edge_midpoints())
        .map(|(x, z)| Anchor { x, z, role: PillarRole::Column })
        .collect()
}

/// Every anchor must have a terrain sample.
pub fn validate_anchors(anchors: &[Anchor], grid: &ElevationGrid) -> Result<(), PlanError> {
    match anchors.iter().find(|a| !grid.contains(a.x, a.z)) {
        Some(a) => Err(PlanError::OutOfBoundsAnchor { x: a.x, z: a.z }),
        None => Ok(()),
    }
}

/// Pier filling the gap below the platform, if there is one.
pub fn reconcile_pier(x: i32, z: i32, terrain_y: i32, platform_y: i32, role: PillarRole) -> Option<PillarSpec> {
    if terrain_y >= platform_y {
        return None;
    }
    Some(PillarSpec {
        x,
        z,
        role,
        terrain_y,
        base_y: terrain_y,
        top_y: platform_y - 1,
    })
}

/// Visible column from the ground (never above the platform) to `top_y`.
pub fn reconcile_column(x: i32, z: i32, terrain_y: i32, platform_y: i32, top_y: i32) -> PillarSpec {
    PillarSpec {
        x,
        z,
        role: PillarRole::Column,
        terrain_y,
        base_y: terrain_y.min(platform_y),
        top_y,
    }
}

/// Resolve anchors against the terrain.
///
/// Anchors are validated up front, so a bad anchor fails the whole call
/// without a partial result. Columns top out at `platform_y + wall_height`.
pub fn reconcile_pillars(
    anchors: &[Anchor],
    grid: &ElevationGrid,
    platform_y: i32,
    wall_height: i32,
) -> Result<Vec<PillarSpec>, PlanError> {
    validate_anchors(anchors, grid)?;

    let mut pillars = Vec::with_capacity(anchors.len());
    for anchor in anchors {
        let terrain_y = grid.elevation(anchor.x, anchor.z)?;
        match anchor.role {
            PillarRole::Column => pillars.push(reconcile_column(
                anchor.x,
                anchor.z,
                terrain_y,
                platform_y,
                platform_y + wall_height,
            )),
            PillarRole::Pier | PillarRole::TreePier => {
                if let Some(pier) = reconcile_pier(anchor.x, anchor.z, terrain_y, platform_y, anchor.role) {
                    pillars.push(pier);
                }
            }
        }
    }
    Ok(pillars)
}

/// Piers and columns for a footprint, in anchor order.
pub fn plan_pillars(
    footprint: &Footprint,
    courtyard: &Courtyard,
    grid: &ElevationGrid,
) -> Result<Vec<PillarSpec>, PlanError> {
    let mut anchors = foundation_anchors(footprint);
    anchors.extend(courtyard_anchors(courtyard));
    let pillars = reconcile_pillars(&anchors, grid, footprint.platform_y, footprint.wall_height)?;

    let piers = pillars.iter().filter(|p| p.role == PillarRole::Pier).count();
    log::debug!("{} foundation piers, {} courtyard columns", piers, pillars.len() - piers);
    Ok(pillars)
}
