//! Assembly of the structure plan
//!
//! Turns the planned geometry into primitives, in a fixed order:
//! foundation, piers, walls, roof, door, windows, courtyard void and floor,
//! interior wing clears, courtyard columns, courtyard dressing.
//!
//! Later primitives overwrite earlier ones on purpose: the courtyard void
//! cuts through walls and roof, and the wing clears hollow the wall box.
//! Columns come after the clears because they stand on the ring the wings
//! cover.

use crate::plan::{Block, StructurePlan};
use super::types::{Courtyard, Facing, Footprint, PillarRole, PillarSpec, Rect, RoofRole, RoofTier};

const FOUNDATION: &str = "stone";
const PILLAR: &str = "dark_oak_log";
const WALL: &str = "cut_sandstone";
const CORNER_POST: &str = "oak_log";
const EAVE: &str = "red_nether_brick_stairs";
const CAP: &str = "red_nether_brick_slab";
const DOOR: &str = "oak_door";
const COURTYARD_FLOOR: &str = "grass_block";
const SEAT: &str = "oak_stairs";
const CAMPFIRE: &str = "campfire";

/// Offset of each window from the wall ends
const WINDOW_INSET: i32 = 4;

/// One of the four rooms between the outer walls and the courtyard,
/// named by the side of the courtyard it lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wing {
    pub side: Facing,
    pub rect: Rect,
}

/// Split the interior (inside the walls, outside the courtyard) along the
/// courtyard's extended edges. West and east wings run the full interior
/// depth; north and south wings fill the gap between them.
pub fn interior_wings(footprint: &Footprint, courtyard: &Courtyard) -> [Wing; 4] {
    let f = footprint.rect;
    let c = courtyard.rect;
    [
        Wing {
            side: Facing::West,
            rect: Rect::new(f.x_min + 1, c.x_min - 1, f.z_min + 1, f.z_max - 1),
        },
        Wing {
            side: Facing::East,
            rect: Rect::new(c.x_max + 1, f.x_max - 1, f.z_min + 1, f.z_max - 1),
        },
        Wing {
            side: Facing::North,
            rect: Rect::new(c.x_min, c.x_max, f.z_min + 1, c.z_min - 1),
        },
        Wing {
            side: Facing::South,
            rect: Rect::new(c.x_min, c.x_max, c.z_max + 1, f.z_max - 1),
        },
    ]
}

/// Window openings as `(from, to)` box corners, two per wall.
pub fn window_boxes(footprint: &Footprint) -> Vec<([i32; 3], [i32; 3])> {
    let r = footprint.rect;
    let y0 = footprint.platform_y + 2;
    let y1 = footprint.platform_y + 3;
    let mut boxes = Vec::with_capacity(8);

    for wall_x in [r.x_min, r.x_max] {
        for win_z in [r.z_min + WINDOW_INSET, r.z_max - WINDOW_INSET] {
            boxes.push(([wall_x, y0, win_z - 1], [wall_x, y1, win_z + 2]));
        }
    }
    for wall_z in [r.z_min, r.z_max] {
        for win_x in [r.x_min + WINDOW_INSET, r.x_max - WINDOW_INSET] {
            boxes.push(([win_x - 1, y0, wall_z], [win_x + 2, y1, wall_z]));
        }
    }
    boxes
}

fn fill_pillar(plan: &mut StructurePlan, pillar: &PillarSpec) {
    plan.fill(
        [pillar.x, pillar.base_y, pillar.z],
        [pillar.x, pillar.top_y, pillar.z],
        Block::new(PILLAR).with("axis", "y"),
    );
}

/// Build the plan. `window_glass` names the pane material; `None` leaves
/// the walls solid.
pub fn assemble(
    footprint: &Footprint,
    courtyard: &Courtyard,
    pillars: &[PillarSpec],
    roof: &[RoofTier],
    window_glass: Option<&str>,
) -> StructurePlan {
    let mut plan = StructurePlan::new();
    let y = footprint.platform_y;
    let rect = footprint.rect;

    plan.begin_section("foundation");
    let (a, b) = rect.box_corners(y, y);
    plan.fill(a, b, Block::new(FOUNDATION));

    plan.begin_section("piers");
    for pier in pillars.iter().filter(|p| p.role == PillarRole::Pier) {
        fill_pillar(&mut plan, pier);
    }

    plan.begin_section("walls");
    let (a, b) = rect.box_corners(y + 1, footprint.wall_top_y());
    plan.fill(a, b, Block::new(WALL));
    for (x, z) in rect.corners() {
        plan.fill([x, y + 1, z], [x, footprint.wall_top_y(), z], Block::new(CORNER_POST).with("axis", "y"));
    }

    plan.begin_section("roof");
    for tier in roof {
        let material = match tier.role {
            RoofRole::Eave => EAVE,
            RoofRole::Cap => CAP,
        };
        let (a, b) = tier.rect.box_corners(tier.y, tier.y);
        plan.fill(a, b, Block::new(material));
    }

    plan.begin_section("door");
    let door = footprint.door;
    let [dx, dy, dz] = door.pos;
    let door_block = Block::new(DOOR).with("facing", door.facing.as_str());
    plan.set([dx, dy, dz], door_block.clone().with("half", "lower"));
    plan.set([dx, dy + 1, dz], door_block.with("half", "upper"));

    if let Some(glass) = window_glass {
        plan.begin_section("windows");
        for (a, b) in window_boxes(footprint) {
            plan.fill(a, b, Block::new(glass));
        }
    }

    plan.begin_section("courtyard");
    let void_top = roof.iter().map(|t| t.y).max().unwrap_or(footprint.wall_top_y());
    let court = courtyard.rect;
    let (a, b) = court.box_corners(y + 1, void_top);
    plan.fill(a, b, Block::air());
    let (a, b) = court.box_corners(y, y);
    plan.fill(a, b, Block::new(COURTYARD_FLOOR));

    plan.begin_section("interior");
    for wing in interior_wings(footprint, courtyard) {
        if wing.rect.is_empty() {
            continue;
        }
        let (a, b) = wing.rect.box_corners(y + 1, footprint.wall_top_y());
        plan.fill(a, b, Block::air());
    }

    plan.begin_section("columns");
    for column in pillars.iter().filter(|p| p.role == PillarRole::Column) {
        fill_pillar(&mut plan, column);
    }

    plan.begin_section("courtyard_dressing");
    // Seats along the courtyard edge, backs to the wings.
    for x in court.x_min..=court.x_max {
        plan.set([x, y + 1, court.z_min], Block::new(SEAT).with("facing", Facing::North.as_str()));
        plan.set([x, y + 1, court.z_max], Block::new(SEAT).with("facing", Facing::South.as_str()));
    }
    for z in court.z_min + 1..court.z_max {
        plan.set([court.x_min, y + 1, z], Block::new(SEAT).with("facing", Facing::West.as_str()));
        plan.set([court.x_max, y + 1, z], Block::new(SEAT).with("facing", Facing::East.as_str()));
    }
    let (cx, cz) = footprint.center;
    plan.set([cx, y + 1, cz], Block::new(CAMPFIRE));

    plan
}
