//! Debug tool for the site scan
//! Generates synthetic terrain, runs the flatness scan and prints an ASCII
//! map of candidate window centres.

use clap::Parser;
use courtyard_planner::config::PlannerConfig;
use courtyard_planner::heightmap::{generate_terrain, BuildArea, TerrainParams};
use courtyard_planner::structures::placement::{find_site, scan_candidates};
use courtyard_planner::PlanSeeds;

#[derive(Parser, Debug)]
#[command(name = "debug_site")]
struct Args {
    /// Terrain seed
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Side length of the square build area
    #[arg(long, default_value = "64")]
    size: i32,

    /// Flatness tolerance override
    #[arg(long)]
    tolerance: Option<i32>,

    /// Terrace step of the synthetic terrain (1 = no terracing)
    #[arg(long, default_value = "4")]
    terrace: i32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut config = PlannerConfig::default();
    if let Some(t) = args.tolerance {
        config.flatness_tolerance = t;
    }

    let area = BuildArea::new([0, 0, 0], [args.size - 1, 255, args.size - 1]);
    let params = TerrainParams {
        terrace_step: args.terrace,
        ..TerrainParams::default()
    };
    let grid = generate_terrain(area, args.seed, &params);
    let (lo, hi) = grid.range();

    println!("Terrain seed {}, {}x{}, elevation {} to {}", args.seed, args.size, args.size, lo, hi);

    let report = scan_candidates(&grid, &config);
    println!(
        "Window {} tolerance {}: {} of {} windows flat ({:.1}%)",
        config.min_size,
        config.flatness_tolerance,
        report.candidates.len(),
        report.windows_scanned,
        100.0 * report.candidates.len() as f64 / report.windows_scanned.max(1) as f64
    );

    let chosen = find_site(&grid, &config, &mut PlanSeeds::from_master(args.seed).site_rng());
    match &chosen {
        Ok(selection) => println!(
            "Chosen site: ({}, {}, {}){}",
            selection.site.x,
            selection.site.base_y,
            selection.site.z,
            if selection.is_fallback() { " [fallback]" } else { "" }
        ),
        Err(e) => println!("No site: {}", e),
    }

    // Legend: '#' flat window centre, '@' chosen site, '0'-'9' elevation decile
    println!();
    let span = (hi - lo).max(1);
    for z in area.min_z()..=area.max_z() {
        let line: String = (area.min_x()..=area.max_x())
            .map(|x| {
                if let Ok(selection) = &chosen {
                    if (selection.site.x, selection.site.z) == (x, z) {
                        return '@';
                    }
                }
                if report.candidates.iter().any(|s| s.x == x && s.z == z) {
                    return '#';
                }
                let h = grid.get(x, z).unwrap_or(lo);
                let decile = ((h - lo) * 9 / span) as u32;
                char::from_digit(decile, 10).unwrap_or('?')
            })
            .collect();
        println!("{}", line);
    }
}
