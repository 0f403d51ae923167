//! Tile map generator CLI.
//!
//! Without a subcommand it starts the interactive menu.

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use tilemap::loader;
use tilemap::render::{MapRenderer, RenderOptions, DEFAULT_SCALE};
use tilemap::request::{parse_custom_ground, CustomGround, MapRequest};
use tilemap::shell::Shell;
use tilemap::TileMap;

/// Procedural tile map generator.
#[derive(Parser)]
#[command(name = "tilemap-cli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new map.
    Generate(GenerateArgs),
    /// Load a saved map image and show it in the terminal.
    Load {
        /// Path of the image to load.
        path: PathBuf,
    },
    /// Start the interactive menu.
    Shell {
        /// Random seed for reproducible maps.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Pixels per cell for saved images.
        #[arg(long, default_value_t = DEFAULT_SCALE)]
        scale: u32,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// JSON file holding a map request; flags override its fields.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Map width in cells.
    #[arg(long, allow_negative_numbers = true, required_unless_present = "config")]
    width: Option<i64>,

    /// Map height in cells.
    #[arg(long, allow_negative_numbers = true, required_unless_present = "config")]
    height: Option<i64>,

    /// Built-in ground to use (water, land, sand, forest, stone, ice, snow).
    #[arg(short, long = "ground", value_delimiter = ',')]
    grounds: Vec<String>,

    /// Custom ground as NAME=(R,G,B).
    #[arg(long = "custom", value_parser = parse_custom_arg)]
    custom: Vec<CustomGround>,

    /// Smallest number of seeds to place.
    #[arg(long, allow_negative_numbers = true)]
    min_seeds: Option<i64>,

    /// Largest number of seeds to place.
    #[arg(long, allow_negative_numbers = true)]
    max_seeds: Option<i64>,

    /// Random seed for reproducible generation.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Save the rendered map; the format follows the extension.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pixels per cell in the saved image.
    #[arg(long, default_value_t = DEFAULT_SCALE)]
    scale: u32,

    /// Leave out the cell grid in the saved image.
    #[arg(long)]
    no_grid: bool,

    /// Write the map (palette, seeds, tiles) as JSON.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Show the map in the terminal.
    #[arg(long)]
    show: bool,
}

fn parse_custom_arg(text: &str) -> Result<CustomGround, String> {
    parse_custom_ground(text).map_err(|err| err.reason().to_string())
}

fn build_request(args: &GenerateArgs) -> Result<MapRequest> {
    let mut request = match &args.config {
        Some(path) => MapRequest::load(path)?,
        None => MapRequest::default(),
    };
    if let Some(width) = args.width {
        request.width = width;
    }
    if let Some(height) = args.height {
        request.height = height;
    }
    if args.min_seeds.is_some() {
        request.min_seeds = args.min_seeds;
    }
    if args.max_seeds.is_some() {
        request.max_seeds = args.max_seeds;
    }
    request
        .grounds
        .extend(args.grounds.iter().map(|name| name.trim().to_string()));
    for ground in &args.custom {
        request.add_custom(ground.clone());
    }
    Ok(request)
}

fn print_map_info(map: &TileMap) {
    println!("Generated {}x{} map from {} seeds", map.width, map.height, map.seeds().len());
    let area = map.width * map.height;
    for share in map.color_counts() {
        println!("  {} {:?} - {:.1}%", share.label(), share.color, share.percent(area));
    }
}

fn generate(args: GenerateArgs) -> Result<()> {
    let request = build_request(&args)?;
    let map = match args.seed {
        Some(seed) => TileMap::with_seed(&request, seed)?,
        None => TileMap::new(&request)?,
    };
    print_map_info(&map);

    if args.show {
        MapRenderer::display(&map, &mut io::stdout().lock())?;
    }

    if let Some(path) = &args.json {
        let json = map.to_json()?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        println!("Map data written to: {}", path.display());
    }

    if let Some(path) = &args.output {
        let options = RenderOptions {
            scale: args.scale,
            grid: !args.no_grid,
        };
        match MapRenderer::save(&map, path, options) {
            Ok(()) => println!("Map saved as: {}", path.display()),
            Err(err) => eprintln!("Error saving map: {}", err),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Generate(args)) => generate(args)?,
        Some(Commands::Load { path }) => match loader::load(&path) {
            Ok(img) => loader::show(&img, &mut io::stdout().lock())?,
            Err(err) => eprintln!("{}", err),
        },
        Some(Commands::Shell { seed, scale }) => run_shell(seed, scale)?,
        None => run_shell(None, DEFAULT_SCALE)?,
    }
    Ok(())
}

fn run_shell(seed: Option<u64>, scale: u32) -> Result<()> {
    let stdin = io::stdin();
    let mut shell = Shell::new(stdin.lock(), io::stdout().lock()).with_render_options(RenderOptions {
        scale,
        grid: true,
    });
    if let Some(seed) = seed {
        shell = shell.with_seed(seed);
    }
    shell.run()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_flags() {
        let cli = Cli::try_parse_from([
            "tilemap-cli",
            "generate",
            "--width",
            "20",
            "--height",
            "30",
            "--ground",
            "water,land",
            "--ground",
            "sand",
            "--custom",
            "black=(0,0,0)",
            "--min-seeds",
            "10",
        ])
        .unwrap();
        let Some(Commands::Generate(args)) = cli.command else {
            panic!("expected generate");
        };
        let request = build_request(&args).unwrap();
        assert_eq!(request.width, 20);
        assert_eq!(request.grounds, vec!["water", "land", "sand"]);
        assert_eq!(request.custom_grounds, vec![CustomGround::new("black", &[0, 0, 0])]);
        assert_eq!(request.min_seeds, Some(10));
        assert_eq!(request.max_seeds, None);
    }

    #[test]
    fn test_generate_needs_dimensions() {
        assert!(Cli::try_parse_from(["tilemap-cli", "generate", "--width", "20"]).is_err());
        assert!(Cli::try_parse_from(["tilemap-cli", "generate", "--config", "map.json"]).is_ok());
    }

    #[test]
    fn test_config_file_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.json");
        fs::write(&path, r#"{ "width": 12, "height": 12, "grounds": ["ice"], "max_seeds": 8 }"#)
            .unwrap();
        let cli = Cli::try_parse_from([
            "tilemap-cli",
            "generate",
            "--config",
            path.to_str().unwrap(),
            "--height",
            "16",
            "--ground",
            "snow",
        ])
        .unwrap();
        let Some(Commands::Generate(args)) = cli.command else {
            panic!("expected generate");
        };
        let request = build_request(&args).unwrap();
        assert_eq!((request.width, request.height), (12, 16));
        assert_eq!(request.grounds, vec!["ice", "snow"]);
        assert_eq!(request.max_seeds, Some(8));
    }

    #[test]
    fn test_bad_custom_flag() {
        assert!(Cli::try_parse_from([
            "tilemap-cli",
            "generate",
            "--width",
            "10",
            "--height",
            "10",
            "--custom",
            "black",
        ])
        .is_err());
    }
}
