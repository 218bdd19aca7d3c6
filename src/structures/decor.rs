//! Furnishing and garden
//!
//! Runs after the structure is assembled and only appends. Every position is
//! derived from the planned footprint and courtyard; nothing is re-drawn.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::PlannerConfig;
use crate::heightmap::ElevationGrid;
use crate::plan::{Block, StructurePlan};
use super::pillars::reconcile_pier;
use super::types::{Courtyard, Facing, Footprint, PillarRole, PillarSpec};

const GLASS_COLORS: &[&str] = &[
    "orange", "magenta", "light_blue", "yellow", "lime", "pink", "gray",
    "light_gray", "cyan", "purple", "blue", "brown", "green", "red",
];

const CARPET_COLORS: &[&str] = &["red", "blue", "yellow", "purple", "orange", "white", "black"];

const CAT_VARIANTS: &[&str] = &["red", "siamese", "white", "jellie"];

const FLOWERS: &[&str] = &[
    "dandelion", "poppy", "azure_bluet", "oxeye_daisy", "lilac", "rose_bush", "peony",
];

/// Decoration appended to a structure plan
#[derive(Clone, Debug, Default)]
pub struct Decoration {
    pub plan: StructurePlan,
    /// Piers emitted under garden trees
    pub tree_piers: Vec<PillarSpec>,
}

/// Stained glass pane material for the windows.
pub fn choose_window_glass(rng: &mut ChaCha8Rng) -> String {
    let color = GLASS_COLORS.choose(rng).copied().unwrap_or("light_gray");
    format!("{}_stained_glass_pane", color)
}

/// Garden tree positions: the corners of the garden ring.
pub fn tree_anchors(footprint: &Footprint, garden_buffer: i32) -> [(i32, i32); 4] {
    footprint.rect.outset(garden_buffer).corners()
}

/// Furnish the wings, lay the garden, plant the trees.
pub fn decorate(
    footprint: &Footprint,
    courtyard: &Courtyard,
    grid: &ElevationGrid,
    config: &PlannerConfig,
    rng: &mut ChaCha8Rng,
) -> Decoration {
    let mut plan = StructurePlan::new();
    furnish_interior(&mut plan, footprint, courtyard, rng);
    lay_garden(&mut plan, footprint, grid, config, rng);
    let tree_piers = plant_trees(&mut plan, footprint, grid, config, rng);

    log::debug!("Decoration: {} primitives, {} tree piers", plan.len(), tree_piers.len());
    Decoration { plan, tree_piers }
}

fn furnish_interior(
    plan: &mut StructurePlan,
    footprint: &Footprint,
    courtyard: &Courtyard,
    rng: &mut ChaCha8Rng,
) {
    let r = footprint.rect;
    let c = courtyard.rect;
    let y = footprint.platform_y + 1;

    plan.begin_section("furnishing");

    // Living room
    for x in [r.x_min + 3, r.x_min + 4] {
        plan.set([x, y, r.z_min + 3], Block::new("oak_stairs").with("facing", "north"));
    }
    let carpet = CARPET_COLORS.choose(rng).copied().unwrap_or("white");
    plan.fill(
        [r.x_min + 3, y, r.z_min + 4],
        [r.x_min + 4, y, r.z_min + 5],
        Block::new(format!("{}_carpet", carpet)),
    );

    // Bedroom
    let bed = Block::new("cyan_bed").with("facing", "south");
    plan.set([r.x_min + 3, y, r.z_max - 3], bed.clone().with("part", "foot"));
    plan.set([r.x_min + 3, y, r.z_max - 2], bed.with("part", "head"));
    plan.set([r.x_min + 4, y, r.z_max - 2], Block::new("chest"));

    // Kitchen
    plan.set([r.x_max - 3, y, c.z_min + 2], Block::new("crafting_table"));
    plan.set([r.x_max - 3, y, c.z_min + 3], Block::new("furnace").with("facing", "west"));
    plan.set([r.x_max - 2, y, c.z_min + 2], Block::new("barrel").with("open", "true"));

    let variant = CAT_VARIANTS.choose(rng).copied().unwrap_or("red");
    let mut cat = BTreeMap::new();
    cat.insert("variant".to_string(), variant.to_string());
    plan.summon([c.x_max + 2, y, footprint.center.1], "cat", cat);
}

fn lay_garden(
    plan: &mut StructurePlan,
    footprint: &Footprint,
    grid: &ElevationGrid,
    config: &PlannerConfig,
    rng: &mut ChaCha8Rng,
) {
    let r = footprint.rect;
    let b = config.garden_buffer;
    let y = footprint.platform_y;
    let garden = r.outset(b);

    plan.begin_section("garden");
    if b > 0 {
        let grass = Block::new("grass_block");
        plan.fill([garden.x_min, y, garden.z_min], [garden.x_max, y, r.z_min - 1], grass.clone());
        plan.fill([garden.x_min, y, r.z_max + 1], [garden.x_max, y, garden.z_max], grass.clone());
        plan.fill([garden.x_min, y, r.z_min], [r.x_min - 1, y, r.z_max], grass.clone());
        plan.fill([r.x_max + 1, y, r.z_min], [garden.x_max, y, r.z_max], grass);
    }

    let area = *grid.area();
    let random_column = |rng: &mut ChaCha8Rng| {
        (
            rng.gen_range(area.min_x()..=area.max_x()),
            rng.gen_range(area.min_z()..=area.max_z()),
        )
    };

    // 3x3 tufts, one block per column so each cell sits on its own surface.
    for _ in 0..config.grass_patches {
        let (gx, gz) = random_column(rng);
        for x in gx - 1..=gx + 1 {
            for z in gz - 1..=gz + 1 {
                if garden.contains(x, z) {
                    continue;
                }
                if let Some(t) = grid.get(x, z) {
                    plan.set([x, t, z], Block::new("short_grass"));
                }
            }
        }
    }

    for _ in 0..config.flowers {
        let (fx, fz) = random_column(rng);
        let flower = FLOWERS.choose(rng).copied().unwrap_or("poppy");
        if garden.contains(fx, fz) {
            continue;
        }
        plan.set([fx, grid.get_clamped(fx, fz), fz], Block::new(flower));
    }
}

fn plant_trees(
    plan: &mut StructurePlan,
    footprint: &Footprint,
    grid: &ElevationGrid,
    config: &PlannerConfig,
    rng: &mut ChaCha8Rng,
) -> Vec<PillarSpec> {
    let y = footprint.platform_y;
    let (lo, hi) = config.tree_height_range;
    let mut piers = Vec::new();

    plan.begin_section("trees");
    for (tx, tz) in tree_anchors(footprint, config.garden_buffer) {
        // Trees at the edge of a small build area sample the nearest column.
        let terrain = grid.get_clamped(tx, tz);
        if let Some(pier) = reconcile_pier(tx, tz, terrain, y, PillarRole::TreePier) {
            plan.fill(
                [tx, pier.base_y, tz],
                [tx, pier.top_y, tz],
                Block::new("dark_oak_log").with("axis", "y"),
            );
            piers.push(pier);
        }

        let trunk = rng.gen_range(lo..=hi);
        plan.fill([tx, y + 1, tz], [tx, y + trunk, tz], Block::new("oak_log").with("axis", "y"));

        let leaves = rng.gen_range(trunk..=trunk + 1);
        plan.fill(
            [tx - 2, y + leaves, tz - 2],
            [tx + 2, y + leaves + 1, tz + 2],
            Block::new("oak_leaves").with("persistent", "true"),
        );

        for side in Facing::ALL {
            let (dx, dz) = side.offset();
            let cocoa_y = y + rng.gen_range(2..=trunk - 1);
            plan.set(
                [tx + dx, cocoa_y, tz + dz],
                Block::new("cocoa").with("facing", side.as_str()).with("age", "2"),
            );
        }
    }
    piers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightmap::BuildArea;
    use crate::plan::Primitive;
    use crate::structures::types::{Door, Orientation, Rect};
    use rand::SeedableRng;

    fn footprint() -> Footprint {
        Footprint {
            rect: Rect::centered(40, 40, 9, 10),
            width: 19,
            length: 21,
            wall_height: 5,
            orientation: Orientation::NorthSouth,
            door: Door { pos: [40, 65, 30], facing: Facing::North },
            center: (40, 40),
            platform_y: 64,
        }
    }

    fn courtyard() -> Courtyard {
        Courtyard { rect: Rect::centered(40, 40, 3, 3), size: 7 }
    }

    fn grid() -> ElevationGrid {
        ElevationGrid::from_fn(BuildArea::new([0, 0, 0], [79, 255, 79]), |x, _| if x < 40 { 60 } else { 66 })
    }

    #[test]
    fn test_decoration_is_deterministic() {
        let config = PlannerConfig::default();
        let a = decorate(&footprint(), &courtyard(), &grid(), &config, &mut ChaCha8Rng::seed_from_u64(4));
        let b = decorate(&footprint(), &courtyard(), &grid(), &config, &mut ChaCha8Rng::seed_from_u64(4));
        assert_eq!(a.plan, b.plan);
        assert_eq!(a.tree_piers, b.tree_piers);
    }

    #[test]
    fn test_tree_piers_follow_terrain() {
        let config = PlannerConfig::default();
        let deco = decorate(&footprint(), &courtyard(), &grid(), &config, &mut ChaCha8Rng::seed_from_u64(4));
        // West trees stand on terrain 60, east trees on 66.
        assert_eq!(deco.tree_piers.len(), 2);
        for pier in &deco.tree_piers {
            assert!(pier.x < 40);
            assert_eq!((pier.base_y, pier.top_y), (60, 63));
        }
    }

    #[test]
    fn test_furniture_inside_walls() {
        let fp = footprint();
        let config = PlannerConfig::default();
        let deco = decorate(&fp, &courtyard(), &grid(), &config, &mut ChaCha8Rng::seed_from_u64(9));
        let interior = fp.rect.inset(1).unwrap();
        for primitive in deco.plan.section("furnishing").unwrap() {
            let (x, z) = match primitive {
                Primitive::SetBlock { pos, .. } | Primitive::Summon { pos, .. } => (pos[0], pos[2]),
                Primitive::FillBox { from, .. } => (from[0], from[2]),
            };
            assert!(interior.contains(x, z), "{:?}", primitive);
            assert!(!courtyard().rect.contains(x, z), "{:?}", primitive);
        }
    }

    #[test]
    fn test_random_dressing_avoids_garden() {
        let fp = footprint();
        let config = PlannerConfig { flowers: 200, grass_patches: 50, ..PlannerConfig::default() };
        let deco = decorate(&fp, &courtyard(), &grid(), &config, &mut ChaCha8Rng::seed_from_u64(2));
        let garden = fp.rect.outset(config.garden_buffer);
        let ring = deco.plan.section("garden").unwrap();
        // Four grass strips, then scattered tufts and flowers, one block each.
        assert!(ring[..4].iter().all(|p| matches!(p, Primitive::FillBox { .. })));
        for primitive in &ring[4..] {
            match primitive {
                Primitive::SetBlock { pos, .. } => assert!(!garden.contains(pos[0], pos[2]), "{:?}", pos),
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn test_tufts_keep_the_garden_ring_intact() {
        let fp = footprint();
        let flat = ElevationGrid::flat(BuildArea::new([0, 0, 0], [79, 255, 79]), 64);
        let config = PlannerConfig { grass_patches: 400, flowers: 0, ..PlannerConfig::default() };
        let deco = decorate(&fp, &courtyard(), &flat, &config, &mut ChaCha8Rng::seed_from_u64(1));
        let garden = fp.rect.outset(config.garden_buffer);

        let tufts: Vec<_> = deco.plan.section("garden").unwrap()[4..].to_vec();
        assert!(!tufts.is_empty());
        for primitive in &tufts {
            if let Primitive::SetBlock { pos, block } = primitive {
                assert_eq!(block.material, "short_grass");
                assert!(!garden.contains(pos[0], pos[2]), "{:?}", pos);
            }
        }
    }

    #[test]
    fn test_tuft_cells_follow_the_surface() {
        let fp = footprint();
        let slope = ElevationGrid::from_fn(BuildArea::new([0, 0, 0], [79, 255, 79]), |x, z| 50 + x / 3 + z / 5);
        let config = PlannerConfig { grass_patches: 50, flowers: 0, ..PlannerConfig::default() };
        let deco = decorate(&fp, &courtyard(), &slope, &config, &mut ChaCha8Rng::seed_from_u64(6));

        for primitive in &deco.plan.section("garden").unwrap()[4..] {
            if let Primitive::SetBlock { pos, .. } = primitive {
                assert_eq!(pos[1], slope.get(pos[0], pos[2]).unwrap());
            }
        }
    }

    #[test]
    fn test_trees_clear_the_house() {
        let fp = footprint();
        let config = PlannerConfig::default();
        let deco = decorate(&fp, &courtyard(), &grid(), &config, &mut ChaCha8Rng::seed_from_u64(8));
        for primitive in deco.plan.section("trees").unwrap() {
            let (a, b) = match primitive {
                Primitive::FillBox { from, to, .. } => (*from, *to),
                Primitive::SetBlock { pos, .. } => (*pos, *pos),
                Primitive::Summon { .. } => unreachable!(),
            };
            let touches = a[0] <= fp.rect.x_max && b[0] >= fp.rect.x_min && a[2] <= fp.rect.z_max && b[2] >= fp.rect.z_min;
            assert!(!touches, "{:?}", primitive);
        }
    }

    #[test]
    fn test_window_glass_is_a_pane() {
        let glass = choose_window_glass(&mut ChaCha8Rng::seed_from_u64(0));
        assert!(glass.ends_with("_stained_glass_pane"));
    }
}
