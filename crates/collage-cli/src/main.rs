use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use collage_core::{
    Color, Composer, InputTile, LayoutConfig, LayoutOverrides, OutputFormat, plan_layout,
};
use globset::{Glob, GlobMatcher};
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "collage",
    about = "Arrange images into a numbered grid collage",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show a progress bar (disable with --progress=false or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(long, default_value_t = false, global = true, help_heading = "Logging/UX")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compose the collage and write the output image
    Compose(ComposeArgs),
    /// Compute tile placements only and export them as JSON (no image output)
    Layout(ComposeArgs),
}

#[derive(Parser, Debug, Clone)]
struct ComposeArgs {
    // Input/Output
    /// Input directory (non-recursive)
    #[arg(short, long, default_value = "images", help_heading = "Input/Output")]
    input: PathBuf,
    /// Comma separated, ordered list of image paths; takes precedence over --input
    #[arg(short, long, help_heading = "Input/Output")]
    files: Option<String>,
    /// File name pattern used when scanning --input
    #[arg(long, default_value = "*.jpg", help_heading = "Input/Output")]
    pattern: String,
    /// Output image file
    #[arg(short, long, default_value = "output/collage.jpg", help_heading = "Input/Output")]
    output: PathBuf,
    /// YAML settings file; command-line options override its values
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,

    // Layout
    /// Tile (cell) width in pixels
    #[arg(long, help_heading = "Layout")]
    tile_width: Option<u32>,
    /// Tile (cell) height in pixels
    #[arg(long, help_heading = "Layout")]
    tile_height: Option<u32>,
    /// Resize tiles that don't match the tile size, keeping aspect ratio
    #[arg(long, num_args = 0..=1, default_missing_value = "true", help_heading = "Layout")]
    resize: Option<bool>,
    /// Number of grid columns
    #[arg(long, help_heading = "Layout")]
    cols: Option<u32>,
    /// Leading empty cells before the first tile
    #[arg(long, help_heading = "Layout")]
    offset: Option<u32>,
    /// Outside padding in pixels
    #[arg(long, help_heading = "Layout")]
    padding: Option<u32>,
    /// Gap between tiles in pixels
    #[arg(long, help_heading = "Layout")]
    gap: Option<u32>,
    /// Background color (#rgb, #rrggbb or a color name)
    #[arg(long, help_heading = "Layout")]
    bgcolor: Option<Color>,

    // Labels
    /// Draw a number on each tile
    #[arg(long, num_args = 0..=1, default_missing_value = "true", help_heading = "Labels")]
    write: Option<bool>,
    /// Font file (TTF/OTF) used for labels
    #[arg(long, help_heading = "Labels")]
    font: Option<PathBuf>,
    /// Font size in pixels
    #[arg(long, help_heading = "Labels")]
    font_size: Option<f32>,
    /// Label color
    #[arg(long, help_heading = "Labels")]
    font_color: Option<Color>,
    /// Label inset from the tile's bottom-right corner
    #[arg(long, help_heading = "Labels")]
    font_padding: Option<u32>,
    /// Number given to the first tile
    #[arg(long, help_heading = "Labels")]
    number_start: Option<usize>,
    /// Label template; `{n}` is replaced with the tile number
    #[arg(long, help_heading = "Labels")]
    label_format: Option<String>,

    // Export
    /// Output quality (1-100, JPEG only)
    #[arg(short, long, help_heading = "Export")]
    quality: Option<u8>,
    /// Output format: auto | jpeg | png
    #[arg(long, value_parser = ["auto", "jpeg", "jpg", "png"], help_heading = "Export")]
    format: Option<String>,
    /// Export tile placements (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_layout: Option<PathBuf>,
    /// Print the merged configuration (defaults, settings file, flags) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compose but do not write any files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

impl ComposeArgs {
    fn overrides(&self) -> anyhow::Result<LayoutOverrides> {
        let format = match &self.format {
            Some(s) => Some(
                s.parse::<OutputFormat>()
                    .map_err(|_| anyhow::anyhow!("unknown output format: {}", s))?,
            ),
            None => None,
        };
        Ok(LayoutOverrides {
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            resize: self.resize,
            cols: self.cols,
            offset: self.offset,
            padding: self.padding,
            gap: self.gap,
            bgcolor: self.bgcolor,
            write: self.write.or(self.font.as_ref().map(|_| true)),
            font: self.font.clone(),
            font_size: self.font_size,
            font_color: self.font_color,
            font_padding: self.font_padding,
            number_start: self.number_start,
            label_format: self.label_format.clone(),
            quality: self.quality,
            format,
        })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Compose(args) => run_compose(args, cli.progress && !cli.quiet),
        Commands::Layout(args) => run_layout(args),
    }
}

fn load_config(args: &ComposeArgs) -> anyhow::Result<LayoutConfig> {
    let file_overrides = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("read settings {}", path.display()))?;
            serde_yaml::from_str::<LayoutOverrides>(&text)
                .with_context(|| format!("parse settings {}", path.display()))?
        }
        None => LayoutOverrides::default(),
    };
    let cfg = file_overrides
        .merge(args.overrides()?)
        .apply(LayoutConfig::default());
    cfg.validate()?;
    Ok(cfg)
}

fn print_config(cfg: &LayoutConfig, format: &str) -> anyhow::Result<()> {
    match format {
        "yaml" => println!("{}", serde_yaml::to_string(cfg)?),
        _ => println!("{}", serde_json::to_string_pretty(cfg)?),
    }
    Ok(())
}

fn run_compose(args: &ComposeArgs, show_progress: bool) -> anyhow::Result<()> {
    let cfg = load_config(args)?;
    if args.print_config {
        return print_config(&cfg, &args.print_config_format);
    }

    let paths = gather_paths(args)?;
    info!(count = paths.len(), "found input files");
    let tiles: Vec<InputTile> = paths.iter().map(InputTile::from_path).collect();

    let bar = show_progress.then(|| progress_bar(tiles.len() as u64));
    let mut composer = Composer::new(cfg.clone());
    if let Some(b) = bar.clone() {
        composer = composer.with_progress(move |ev| {
            let name = Path::new(ev.key)
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or(ev.key);
            b.set_message(name.to_string());
            b.set_position(ev.index as u64 + 1);
        });
    }

    let result = if args.dry_run {
        composer.compose(&tiles).map(|out| out.layout)
    } else {
        composer.compose_to_file(&tiles, &args.output)
    };
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    let layout = result.with_context(|| format!("compose {}", args.output.display()))?;

    info!(
        width = layout.width,
        height = layout.height,
        cols = layout.grid.cols,
        rows = layout.grid.rows,
        tiles = layout.placements.len(),
        "collage composed"
    );
    if args.dry_run {
        println!(
            "canvas={}x{} cols={} rows={} tiles={}",
            layout.width,
            layout.height,
            layout.grid.cols,
            layout.grid.rows,
            layout.placements.len()
        );
    } else {
        info!(output = ?args.output, "output written");
    }

    if let Some(path) = &args.export_layout {
        write_layout(path, &layout, args.dry_run)?;
    }
    Ok(())
}

fn run_layout(args: &ComposeArgs) -> anyhow::Result<()> {
    let cfg = load_config(args)?;
    if args.print_config {
        return print_config(&cfg, &args.print_config_format);
    }
    let paths = gather_paths(args)?;
    let mut sizes = Vec::with_capacity(paths.len());
    for p in &paths {
        let (w, h) = image::image_dimensions(p)
            .with_context(|| format!("read dimensions of {}", p.display()))?;
        sizes.push((p.to_string_lossy().replace('\\', "/"), w, h));
    }
    let layout = plan_layout(&sizes, &cfg)?;
    match &args.export_layout {
        Some(path) => write_layout(path, &layout, args.dry_run)?,
        None => println!(
            "{}",
            serde_json::to_string_pretty(&collage_core::to_json(&layout))?
        ),
    }
    Ok(())
}

fn write_layout(
    path: &Path,
    layout: &collage_core::CollageLayout,
    dry_run: bool,
) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&collage_core::to_json(layout))?;
    if dry_run {
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    info!(?path, "layout exported");
    Ok(())
}

/// Explicit `--files` (existing entries only, in the given order) or the
/// `--input` directory filtered by `--pattern` and sorted by file name.
fn gather_paths(args: &ComposeArgs) -> anyhow::Result<Vec<PathBuf>> {
    if let Some(list) = &args.files {
        let files = parse_file_list(list);
        if !files.is_empty() {
            return Ok(files);
        }
        warn!("none of the --files exist, scanning input directory instead");
    }
    let matcher = Glob::new(&args.pattern)
        .with_context(|| format!("invalid pattern {}", args.pattern))?
        .compile_matcher();
    scan_dir(&args.input, &matcher)
}

fn parse_file_list(list: &str) -> Vec<PathBuf> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .filter(|p| {
            let ok = p.is_file();
            if !ok {
                warn!(?p, "skipping missing file");
            }
            ok
        })
        .collect()
}

fn scan_dir(dir: &Path, matcher: &GlobMatcher) -> anyhow::Result<Vec<PathBuf>> {
    let mut list = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("scan {}", dir.display()))?;
        if entry.file_type().is_file() && matcher.is_match(entry.file_name()) {
            list.push(entry.into_path());
        }
    }
    Ok(list)
}

fn progress_bar(len: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};
    let b = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} placing {pos}/{len} [{elapsed_precise}] {wide_msg}",
    ) {
        b.set_style(style);
    }
    b
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}
