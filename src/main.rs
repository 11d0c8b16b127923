use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use anyhow::Context;
use clap::{Parser, Subcommand};
use tsx_hitbox::config::PhysicsConfig;
use tsx_hitbox::debug::render_tileset_svg;
use tsx_hitbox::map::validate_tileset;
use tsx_hitbox::{verify_tile_images, AssetManager, ColliderBuilder, Config, FileProtocol, HitboxShape, Tileset, TsxLoader};

/// Inspects Tiled tilesets and the hitboxes drawn on their tiles.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// YAML settings file. Defaults are used for anything it leaves out.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Prints a summary of each tileset and the hitboxes of every tile.
    Inspect {
        #[arg(required = true, value_name = "TSX")]
        paths: Vec<String>,
    },
    /// Prints the colliders of a tileset as YAML.
    Colliders {
        #[arg(value_name = "TSX")]
        path: String,
        /// Writes to a file instead of stdout.
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Validates hitboxes and images. Exits with 1 when errors are found.
    Check {
        #[arg(required = true, value_name = "TSX")]
        paths: Vec<String>,
        /// Also opens every referenced image.
        #[arg(long)]
        images: bool,
    },
    /// Draws hitboxes and colliders of a tileset to an SVG file.
    Svg {
        #[arg(value_name = "TSX")]
        path: String,
        #[arg(short, long, value_name = "PATH")]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    #[cfg(feature = "profile")]
    let _profile_guard = start_profiling();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        },
    }
}

#[cfg(feature = "profile")]
fn start_profiling() -> tracing_chrome::FlushGuard {
    use tracing_subscriber::prelude::*;
    let (chrome_layer, guard) = tracing_chrome::ChromeLayerBuilder::new().build();
    tracing_subscriber::registry().with(chrome_layer).init();
    guard
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let manager = tileset_manager(&config);
    match cli.command {
        Command::Inspect { paths } => {
            for tileset in load_all(&manager, &paths)? {
                print_tileset(&tileset);
            }
            Ok(ExitCode::SUCCESS)
        },
        Command::Colliders { path, output } => {
            let tileset = manager.load(&path)?;
            let colliders = ColliderBuilder::new(&config.physics).build_tileset(&tileset)?;
            let yaml = serde_yaml::to_string(&colliders)?;
            match output {
                Some(output) => write_file(&output, &yaml)?,
                None => print!("{yaml}"),
            }
            Ok(ExitCode::SUCCESS)
        },
        Command::Check { paths, images } => {
            let image_root = image_root(&config);
            let mut errors = 0;
            for (path, result) in paths.iter().zip(manager.load_all(&paths[..])) {
                let tileset = match result {
                    Ok(tileset) => tileset,
                    Err(_) => {
                        errors += 1;
                        continue;
                    },
                };
                let diagnostics = validate_tileset(&tileset, config.loader.bounds_tolerance);
                for diagnostic in &diagnostics {
                    println!("{path}: {diagnostic}");
                }
                errors += diagnostics.iter().filter(|diagnostic| diagnostic.is_error()).count();
                if images || config.loader.verify_images {
                    let issues = verify_tile_images(&tileset, &image_root);
                    for issue in &issues {
                        println!("{path}: error: {issue}");
                    }
                    errors += issues.len();
                }
            }
            if errors > 0 {
                log::error!("Found {errors} errors");
                return Ok(ExitCode::FAILURE);
            }
            log::info!("No errors found");
            Ok(ExitCode::SUCCESS)
        },
        Command::Svg { path, output } => {
            let tileset = manager.load(&path)?;
            let physics = PhysicsConfig {
                pixels_per_unit: 1.0,
                flip_y: false,
                center_origin: false,
                ..config.physics.clone()
            };
            let colliders = ColliderBuilder::new(&physics).build_tileset(&tileset)?;
            let svg = render_tileset_svg(&tileset, &colliders, &config.debug_draw);
            write_file(&output, &svg)?;
            Ok(ExitCode::SUCCESS)
        },
    }
}

fn tileset_manager(config: &Config) -> AssetManager<TsxLoader> {
    let mut manager = AssetManager::new(TsxLoader::new(config.loader.clone()));
    manager.add_protocol(FileProtocol, true);
    manager.set_path_prefix(config.loader.asset_root.clone());
    manager
}

fn image_root(config: &Config) -> PathBuf {
    match &config.loader.asset_root {
        Some(root) => PathBuf::from(root),
        None => PathBuf::from("."),
    }
}

/// Loads every tileset, failing on the first one that cannot be loaded.
fn load_all(manager: &AssetManager<TsxLoader>, paths: &[String]) -> anyhow::Result<Vec<Arc<Tileset>>> {
    paths
        .iter()
        .zip(manager.load_all(paths))
        .map(|(path, result)| result.with_context(|| format!("Failed to load {path}")))
        .collect()
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

fn print_tileset(tileset: &Tileset) {
    let kind = match tileset.is_image_collection() {
        true => "image collection",
        false => "atlas",
    };
    println!(
        "{} ({kind}, {}x{}, {} tiles, {} with hitboxes, {} hitboxes)",
        tileset.name,
        tileset.tile_width,
        tileset.tile_height,
        tileset.tiles.len(),
        tileset.hitbox_tiles().count(),
        tileset.hitbox_count(),
    );
    for tile in tileset.hitbox_tiles() {
        let (width, height) = tileset.tile_size(tile.id);
        println!("  tile {} ({width}x{height})", tile.id);
        for hitbox in &tile.hitboxes {
            let shape = match &hitbox.shape {
                HitboxShape::Rect { size } | HitboxShape::Ellipse { size } => format!("{}x{}", size.x, size.y),
                HitboxShape::Polygon { points } => format!("{} points", points.len()),
            };
            print!("    {} {}: {shape} at ({}, {})", hitbox.kind(), hitbox.object_id, hitbox.position.x, hitbox.position.y);
            if hitbox.is_rotated() {
                print!(" rotated {}°", hitbox.rotation);
            }
            println!();
        }
    }
}
