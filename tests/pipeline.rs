//! End-to-end planning over whole grids

use courtyard_planner::backend::{apply_plan, CommandScriptWriter, VoxelBuffer};
use courtyard_planner::heightmap::{generate_terrain, TerrainParams};
use courtyard_planner::structures::types::PillarRole;
use courtyard_planner::{plan_structure, BuildArea, ElevationGrid, PlanError, PlanSeeds, PlannerConfig};

fn flat_grid() -> ElevationGrid {
    ElevationGrid::flat(BuildArea::new([100, 0, -200], [179, 255, -121]), 64)
}

#[test]
fn same_seed_same_plan() {
    let area = BuildArea::new([0, 0, 0], [95, 255, 95]);
    let grid = generate_terrain(area, 7, &TerrainParams::default());
    let config = PlannerConfig::default();

    for master in [1, 2, 3] {
        let seeds = PlanSeeds::from_master(master);
        let a = plan_structure(&grid, &config, &seeds).unwrap();
        let b = plan_structure(&grid, &config, &seeds).unwrap();
        assert_eq!(a.plan, b.plan);
        assert_eq!(a.plan.to_json().unwrap(), b.plan.to_json().unwrap());
    }
}

#[test]
fn flat_plan_applied_to_voxels() {
    let grid = flat_grid();
    let planned = plan_structure(&grid, &PlannerConfig::default(), &PlanSeeds::from_master(11)).unwrap();
    let mut world = VoxelBuffer::new();
    apply_plan(&planned.plan, &mut world).unwrap();

    let fp = planned.footprint;
    let r = fp.rect;
    let y = fp.platform_y;
    let court = planned.courtyard.rect;
    let (cx, cz) = fp.center;

    assert_eq!(world.material_at([r.x_min, y, r.z_min]), Some("stone"));
    assert_eq!(world.material_at([r.x_min, y + 1, r.z_min + 1]), Some("cut_sandstone"));
    assert_eq!(world.material_at([r.x_min, y + 1, r.z_min]), Some("oak_log"));
    assert_eq!(world.material_at(fp.door.pos), Some("oak_door"));

    // Courtyard: grass floor, campfire in the middle, open to the sky.
    assert_eq!(world.material_at([cx, y, cz]), Some("grass_block"));
    assert_eq!(world.material_at([cx, y + 1, cz]), Some("campfire"));
    let roof_top = planned.roof.iter().map(|t| t.y).max().unwrap();
    assert_eq!(world.material_at([cx, roof_top, cz]), Some("air"));
    assert_eq!(world.material_at([court.x_min, roof_top - 1, court.z_min]), Some("air"));

    // Wings are hollow under the roof.
    assert_eq!(world.material_at([r.x_min + 1, fp.wall_top_y(), r.z_min + 1]), Some("air"));
    assert_eq!(world.material_at([r.x_min + 1, fp.wall_top_y() + 1, r.z_min + 1]), Some("red_nether_brick_stairs"));

    // Columns survive the interior clears.
    for column in planned.pillars.iter().filter(|p| p.role == PillarRole::Column) {
        for cy in [y + 1, fp.wall_top_y()] {
            assert_eq!(world.material_at([column.x, cy, column.z]), Some("dark_oak_log"));
        }
    }

    assert_eq!(world.entities().len(), 1);
    assert_eq!(world.entities()[0].kind, "cat");
}

#[test]
fn pillars_reconcile_rough_terrain() {
    let area = BuildArea::new([0, 0, 0], [95, 255, 95]);
    let config = PlannerConfig {
        flatness_tolerance: 3,
        ..PlannerConfig::default()
    };
    let params = TerrainParams {
        terrace_step: 1,
        ..TerrainParams::default()
    };

    for seed in 0..6 {
        let grid = generate_terrain(area, seed, &params);
        let planned = plan_structure(&grid, &config, &PlanSeeds::from_master(seed)).unwrap();
        let fp = planned.footprint;

        for (x, z) in fp.rect.corners() {
            let terrain = grid.get(x, z).unwrap();
            let pier = planned
                .pillars
                .iter()
                .find(|p| p.role == PillarRole::Pier && (p.x, p.z) == (x, z));
            if terrain < fp.platform_y {
                let pier = pier.unwrap();
                assert_eq!((pier.base_y, pier.top_y), (terrain, fp.platform_y - 1));
            } else {
                assert!(pier.is_none());
            }
        }
        for pillar in planned.pillars.iter().chain(&planned.tree_piers) {
            assert!(pillar.top_y >= pillar.base_y, "{:?}", pillar);
        }
        for column in planned.pillars.iter().filter(|p| p.role == PillarRole::Column) {
            assert!(column.base_y <= fp.platform_y);
            assert_eq!(column.top_y, fp.wall_top_y());
        }
    }
}

#[test]
fn fallback_on_rough_grid() {
    let area = BuildArea::new([0, 0, 0], [59, 255, 59]);
    let grid = ElevationGrid::from_fn(area, |x, z| 64 + ((x + z) % 2) * 5);

    let planned = plan_structure(&grid, &PlannerConfig::default(), &PlanSeeds::from_master(0)).unwrap();
    assert!(planned.selection.is_fallback());
    assert_eq!((planned.selection.site.x, planned.selection.site.z), (29, 29));
    assert_eq!(planned.selection.site.base_y, grid.get(29, 29).unwrap());

    let strict = PlannerConfig {
        allow_fallback: false,
        ..PlannerConfig::default()
    };
    let err = plan_structure(&grid, &strict, &PlanSeeds::from_master(0)).unwrap_err();
    assert!(matches!(err, PlanError::NoFlatSiteFound { .. }));
}

#[test]
fn command_script_has_one_line_per_primitive() {
    let grid = flat_grid();
    let planned = plan_structure(&grid, &PlannerConfig::default(), &PlanSeeds::from_master(4)).unwrap();

    let mut writer = CommandScriptWriter::new(Vec::new());
    apply_plan(&planned.plan, &mut writer).unwrap();
    assert_eq!(writer.lines_written(), planned.plan.len());

    let script = String::from_utf8(writer.into_inner()).unwrap();
    assert!(script.starts_with("fill "));
    assert!(script.lines().any(|l| l.starts_with("summon minecraft:cat")));
}

#[test]
fn plan_json_is_tagged() {
    let grid = flat_grid();
    let config = PlannerConfig {
        decorate: false,
        ..PlannerConfig::default()
    };
    let planned = plan_structure(&grid, &config, &PlanSeeds::from_master(4)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&planned.plan.to_json().unwrap()).unwrap();

    let first = &json["primitives"][0];
    assert_eq!(first["kind"], "fill_box");
    assert_eq!(first["block"]["material"], "stone");
    assert_eq!(json["sections"][0]["name"], "foundation");
}

#[test]
fn narrow_garden_is_rejected_and_minimum_keeps_trees_outside() {
    let grid = flat_grid();
    let narrow = PlannerConfig {
        garden_buffer: 1,
        ..PlannerConfig::default()
    };
    let err = plan_structure(&grid, &narrow, &PlanSeeds::from_master(1)).unwrap_err();
    assert!(matches!(err, PlanError::InvalidConfig(_)));

    let tight = PlannerConfig {
        garden_buffer: 3,
        ..PlannerConfig::default()
    };
    for master in 0..5 {
        let planned = plan_structure(&grid, &tight, &PlanSeeds::from_master(master)).unwrap();
        let mut world = VoxelBuffer::new();
        apply_plan(&planned.plan, &mut world).unwrap();

        let r = planned.footprint.rect;
        let top = planned.roof.iter().map(|t| t.y).max().unwrap();
        for x in r.x_min..=r.x_max {
            for z in r.z_min..=r.z_max {
                for y in planned.footprint.platform_y..=top {
                    let material = world.material_at([x, y, z]);
                    assert_ne!(material, Some("oak_leaves"), "({}, {}, {})", x, y, z);
                    assert_ne!(material, Some("cocoa"), "({}, {}, {})", x, y, z);
                }
            }
        }
    }
}
