//! Stepped roof
//!
//! Tier `h` (1-based) covers the wall rectangle inset by `h - 1` at
//! `wall_top_y + h`, so each level loses one block per side. A flat cap
//! inset by 2 from the walls closes the top at `wall_top_y + tier_count + 1`.

use crate::error::PlanError;
use super::types::{Footprint, RoofRole, RoofTier};

/// Inset of the cap layer from the wall rectangle.
const CAP_INSET: i32 = 2;

/// Plan the roof layers from the bottom tier up, cap last.
///
/// `overhang` pushes every tier outward by that many blocks; the cap stays
/// put. Fails with `DegenerateRoofTier` when the footprint is too narrow for
/// the requested tiers.
pub fn plan_roof(
    footprint: &Footprint,
    wall_top_y: i32,
    tier_count: u32,
    overhang: i32,
) -> Result<Vec<RoofTier>, PlanError> {
    let walls = footprint.rect;
    let degenerate = |tier: u32| PlanError::DegenerateRoofTier {
        tier,
        tier_count,
        span_x: walls.span_x(),
        span_z: walls.span_z(),
    };

    let min_span = 2 * tier_count as i32;
    if walls.span_x() < min_span || walls.span_z() < min_span {
        return Err(degenerate(tier_count));
    }

    let mut tiers = Vec::with_capacity(tier_count as usize + 1);
    for h in 1..=tier_count {
        let inset = h as i32 - 1 - overhang;
        let rect = walls.inset(inset).ok_or_else(|| degenerate(h))?;
        tiers.push(RoofTier {
            index: h,
            rect,
            y: wall_top_y + h as i32,
            role: RoofRole::Eave,
        });
    }

    let cap = walls.inset(CAP_INSET).ok_or_else(|| degenerate(tier_count + 1))?;
    tiers.push(RoofTier {
        index: tier_count + 1,
        rect: cap,
        y: wall_top_y + tier_count as i32 + 1,
        role: RoofRole::Cap,
    });

    Ok(tiers)
}
