use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::Parser;

use courtyard_planner::backend::{apply_plan, CommandScriptWriter, VoxelBuffer};
use courtyard_planner::config::PlannerConfig;
use courtyard_planner::heightmap::{self, BuildArea, ElevationGrid, PngImport, TerrainParams};
use courtyard_planner::seeds::PlanSeeds;
use courtyard_planner::site_plot;
use courtyard_planner::structures::plan_structure;

#[derive(Parser, Debug)]
#[command(name = "courtyard_planner")]
#[command(about = "Plan a courtyard house that adapts to the terrain of a build area")]
struct Args {
    /// Width (X) of the build area when generating terrain
    #[arg(short = 'W', long, default_value = "96")]
    width: i32,

    /// Depth (Z) of the build area when generating terrain
    #[arg(short = 'D', long, default_value = "96")]
    depth: i32,

    /// Build area origin as X,Y,Z
    #[arg(long, value_delimiter = ',', num_args = 3, default_values_t = [0, 0, 0])]
    origin: Vec<i32>,

    /// Top Y of the build area
    #[arg(long, default_value = "255")]
    top_y: i32,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Planner config JSON (missing fields use defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Terrain to plan on: a grid JSON file or a grayscale PNG
    /// (synthetic terrain from the seed if not specified)
    #[arg(long)]
    heightmap: Option<PathBuf>,

    /// Write the structure plan as JSON
    #[arg(short, long, default_value = "plan.json")]
    output: PathBuf,

    /// Write the plan as a game command script
    #[arg(long)]
    commands: Option<PathBuf>,

    /// Write a diagnostic PNG of the chosen site
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Write the terrain grid used as JSON
    #[arg(long)]
    export_grid: Option<PathBuf>,

    /// Skip furnishing, garden and trees
    #[arg(long)]
    no_decor: bool,

    /// Log per-stage details
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let seed = args.seed.unwrap_or_else(rand::random);
    let seeds = PlanSeeds::from_master(seed);
    println!("Planning with seed: {}", seed);

    let mut config = match &args.config {
        Some(path) => PlannerConfig::from_json_file(path)?,
        None => PlannerConfig::default(),
    };
    if args.no_decor {
        config.decorate = false;
    }
    config.validate()?;

    println!("Loading terrain...");
    let grid = load_terrain(&args, seed)?;
    let area = grid.area();
    let (lo, hi) = grid.range();
    println!(
        "Build area: ({}, {}, {}) to ({}, {}, {}), elevation {} to {}",
        area.begin[0], area.begin[1], area.begin[2], area.last[0], area.last[1], area.last[2], lo, hi
    );

    if let Some(path) = &args.export_grid {
        grid.to_json_file(path)?;
        println!("Exported terrain grid to {}", path.display());
    }

    println!("Planning structure...");
    let planned = plan_structure(&grid, &config, &seeds)?;
    let site = planned.selection.site;
    let fp = &planned.footprint;
    println!(
        "Site: ({}, {}, {}){}",
        site.x,
        site.base_y,
        site.z,
        if planned.selection.is_fallback() { " [fallback]" } else { "" }
    );
    println!(
        "Footprint: {}x{} {}, walls {} high, courtyard {}x{}",
        fp.width,
        fp.length,
        fp.orientation.display_name(),
        fp.wall_height,
        planned.courtyard.size,
        planned.courtyard.size
    );
    println!(
        "Pillars: {} ({} tree piers), roof layers: {}",
        planned.pillars.len(),
        planned.tree_piers.len(),
        planned.roof.len()
    );

    let mut buffer = VoxelBuffer::new();
    apply_plan(&planned.plan, &mut buffer)?;
    println!(
        "Plan: {} primitives in {} sections, {} solid blocks after overwrites",
        planned.plan.len(),
        planned.plan.sections().len(),
        buffer.solid_count()
    );
    for (material, count) in buffer.material_counts() {
        log::debug!("  {:<28} {}", material, count);
    }

    std::fs::write(&args.output, planned.plan.to_json()?)?;
    println!("Exported plan to {}", args.output.display());

    if let Some(path) = &args.commands {
        let mut writer = CommandScriptWriter::new(BufWriter::new(File::create(path)?));
        apply_plan(&planned.plan, &mut writer)?;
        println!("Exported {} commands to {}", writer.lines_written(), path.display());
    }

    if let Some(path) = &args.plot {
        site_plot::render_site_plot(&grid, &planned, config.garden_buffer, path)?;
        println!("Exported site plot to {}", path.display());
    }

    println!("Done!");
    Ok(())
}

fn load_terrain(args: &Args, seed: u64) -> Result<ElevationGrid, Box<dyn Error>> {
    let [ox, oy, oz] = origin(&args.origin);

    let grid = match &args.heightmap {
        Some(path) if is_png(path) => {
            let import = PngImport {
                origin_x: ox,
                origin_z: oz,
                bottom_y: oy,
                top_y: args.top_y,
                ..PngImport::default()
            };
            ElevationGrid::from_png(path, &import)?
        }
        Some(path) => ElevationGrid::from_json_file(path)?,
        None => {
            if args.width < 1 || args.depth < 1 {
                return Err("build area width and depth must be positive".into());
            }
            let area = BuildArea::new([ox, oy, oz], [ox + args.width - 1, args.top_y, oz + args.depth - 1]);
            heightmap::generate_terrain(area, seed, &TerrainParams::default())
        }
    };
    Ok(grid)
}

fn origin(values: &[i32]) -> [i32; 3] {
    match values {
        [x, y, z] => [*x, *y, *z],
        _ => [0, 0, 0],
    }
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}
