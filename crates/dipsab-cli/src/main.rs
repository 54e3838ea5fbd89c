use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use dipsab_core::pipeline::check_sections;
use dipsab_core::prelude::*;
use image::RgbImage;
use serde::Serialize;
use tracing::info;

mod recent;

use recent::{RECENTS_FILE, RecentFiles};

#[derive(Parser, Debug)]
#[command(
    name = "dipsab",
    about = "Directory images padded, stacked and bordered",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --progress false or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a project file to an image
    Render(RenderArgs),
    /// Render a single directory into one section image
    Section(SectionArgs),
    /// Layout-only export (no pixels): compute placements and write JSON
    Layout(LayoutArgs),
    /// Write a new project file
    New(NewArgs),
    /// Add or reorder sections of an existing project
    Edit(EditArgs),
    /// List recently used project files
    Recent,
}

#[derive(Parser, Debug, Clone)]
struct RenderArgs {
    /// Project file (.json, .yaml); defaults to the most recent project
    #[arg(help_heading = "Input/Output")]
    project: Option<PathBuf>,
    /// Output image (defaults to the project's export path)
    #[arg(short, long, help_heading = "Input/Output")]
    output: Option<PathBuf>,
    /// Also write a downscaled preview fitting WIDTHxHEIGHT
    #[arg(long, value_parser = parse_size, help_heading = "Input/Output")]
    preview: Option<(u32, u32)>,
    /// Print the resolved configuration and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: render but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct SectionArgs {
    /// Input directory
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output image path
    #[arg(long, default_value = "dirim.jpg", help_heading = "Input/Output")]
    output: PathBuf,
    /// Background color (#rrggbb, #rgb or a color name)
    #[arg(long, default_value = "black", help_heading = "Layout")]
    bgcolor: String,
    /// Width of the section image in pixels
    #[arg(long, default_value_t = 1840, help_heading = "Layout")]
    width: u32,
    /// Horizontal pixels between images
    #[arg(long, default_value_t = 0, help_heading = "Layout")]
    hpad: u32,
    /// Vertical pixels between rows
    #[arg(long, default_value_t = 0, help_heading = "Layout")]
    vpad: u32,
    /// File name sorting case sensitivity (0|1)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=1), help_heading = "Sorting")]
    case: u8,
    /// Keep leading articles when sorting file names (0|1)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=1), help_heading = "Sorting")]
    articles: u8,
}

#[derive(Parser, Debug, Clone)]
struct LayoutArgs {
    /// Project file (.json, .yaml); defaults to the most recent project
    project: Option<PathBuf>,
    /// Output JSON path
    #[arg(short, long, default_value = "layout.json")]
    output: PathBuf,
}

#[derive(Parser, Debug, Clone)]
struct NewArgs {
    /// Project file to create
    #[arg(help_heading = "Input/Output")]
    project: PathBuf,
    /// Section directory, stacked in the order given (repeatable)
    #[arg(long = "section", help_heading = "Input/Output")]
    sections: Vec<PathBuf>,
    /// Export image path stored in the project
    #[arg(long, help_heading = "Input/Output")]
    export: Option<PathBuf>,
    /// Canvas width
    #[arg(long, default_value_t = 1920, help_heading = "Canvas")]
    width: u32,
    /// Canvas height
    #[arg(long, default_value_t = 1080, help_heading = "Canvas")]
    height: u32,
    /// Border size
    #[arg(long, default_value_t = 40, help_heading = "Canvas")]
    border: u32,
    /// Background color
    #[arg(long, default_value = "#000000", help_heading = "Canvas")]
    bgcolor: String,
    /// Pin the first section beneath the top border
    #[arg(long, default_value_t = false, help_heading = "Canvas")]
    header: bool,
    /// Pin the last section above the bottom border
    #[arg(long, default_value_t = false, help_heading = "Canvas")]
    footer: bool,
    /// Horizontal padding for every section
    #[arg(long, default_value_t = 10, help_heading = "Sections")]
    hpad: u32,
    /// Vertical padding for every section
    #[arg(long, default_value_t = 10, help_heading = "Sections")]
    vpad: u32,
    /// File name sorting case sensitivity (0|1)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=1), help_heading = "Sorting")]
    case: u8,
    /// Keep leading articles when sorting file names (0|1)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=1), help_heading = "Sorting")]
    articles: u8,
}

#[derive(Parser, Debug, Clone)]
struct EditArgs {
    /// Project file to update
    project: PathBuf,
    /// Append a section directory with default padding (repeatable)
    #[arg(long = "add")]
    add: Vec<PathBuf>,
    /// Swap two sections by 1-based position, e.g. `--swap 1,3` (repeatable, applied after --add)
    #[arg(long = "swap", value_parser = parse_pair)]
    swap: Vec<(usize, usize)>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    let mut recents = RecentFiles::load(RECENTS_FILE);
    match &cli.command {
        Commands::Render(args) => run_render(args, &mut recents, cli.progress && !cli.quiet),
        Commands::Section(args) => run_section(args),
        Commands::Layout(args) => run_layout(args, &recents),
        Commands::New(args) => run_new(args, &mut recents),
        Commands::Edit(args) => run_edit(args, &mut recents),
        Commands::Recent => {
            for name in recents.names() {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn run_render(args: &RenderArgs, recents: &mut RecentFiles, show_progress: bool) -> anyhow::Result<()> {
    let project_path = resolve_project(args.project.as_deref(), recents)?;
    let project = load_project(&project_path)?;
    let cfg = project.canvas_config();

    if args.print_config {
        let resolved = ResolvedConfig {
            canvas: &cfg,
            sections: project.sections(),
            export_path: project.export_path(),
        };
        match args.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&resolved)?),
            _ => println!("{}", serde_json::to_string_pretty(&resolved)?),
        }
        return Ok(());
    }

    let output = match args.output.clone().or_else(|| project.export_path()) {
        Some(p) => with_default_extension(p),
        None if args.dry_run => PathBuf::new(),
        None => anyhow::bail!(
            "no export file name configured in {}; pass --output",
            project_path.display()
        ),
    };

    let canvas = render_with_progress(&cfg, project.sections(), show_progress)?;
    info!(
        sections = project.sections().len(),
        width = canvas.width(),
        height = canvas.height(),
        "canvas rendered"
    );

    if args.dry_run {
        return Ok(());
    }
    canvas
        .save(&output)
        .with_context(|| format!("write {}", output.display()))?;
    info!(?output, "image written");

    if let Some(available) = args.preview {
        let small = preview(&canvas, available);
        let preview_path = preview_path(&output);
        small
            .save(&preview_path)
            .with_context(|| format!("write {}", preview_path.display()))?;
        info!(?preview_path, w = small.width(), h = small.height(), "preview written");
    }
    recents.update(&project_path)?;
    Ok(())
}

fn run_section(args: &SectionArgs) -> anyhow::Result<()> {
    let mut req = LayoutRequest::new(&args.input, args.width);
    req.hpad = args.hpad;
    req.vpad = args.vpad;
    req.background = args.bgcolor.parse()?;
    req.sort = SortOptions {
        case_sensitive: args.case != 0,
        include_articles: args.articles != 0,
    };
    let layer = render_section(&req)?;
    let output = with_default_extension(args.output.clone());
    layer
        .save(&output)
        .with_context(|| format!("write {}", output.display()))?;
    info!(?output, w = layer.width(), h = layer.height(), "section written");
    Ok(())
}

fn run_layout(args: &LayoutArgs, recents: &RecentFiles) -> anyhow::Result<()> {
    let project_path = resolve_project(args.project.as_deref(), recents)?;
    let project = load_project(&project_path)?;
    let layout = layout_project(&project.canvas_config(), project.sections())?;
    let json = serde_json::to_string_pretty(&dipsab_core::to_json(&layout))?;
    fs::write(&args.output, json).with_context(|| format!("write {}", args.output.display()))?;
    info!(
        output = ?args.output,
        layers = layout.sections.len(),
        images = layout.canvas_placements().len(),
        "layout written"
    );
    Ok(())
}

fn run_new(args: &NewArgs, recents: &mut RecentFiles) -> anyhow::Result<()> {
    let cfg = CanvasConfig::builder()
        .with_dimensions(args.width, args.height)
        .border_size(args.border)
        .background(args.bgcolor.parse()?)
        .header(args.header)
        .footer(args.footer)
        .case_sensitive(args.case != 0)
        .include_articles(args.articles != 0)
        .build();
    cfg.validate()?;
    let sections = args
        .sections
        .iter()
        .map(|d| SectionConfig::new(d).with_padding(args.hpad, args.vpad))
        .collect();
    let project = Project::from_parts(&cfg, sections, args.export.as_deref());
    save_project(&project, &args.project)?;
    info!(project = ?args.project, sections = project.sections().len(), "project written");
    recents.update(&args.project)?;
    Ok(())
}

fn run_edit(args: &EditArgs, recents: &mut RecentFiles) -> anyhow::Result<()> {
    let mut project = load_project(&args.project)?;
    apply_edits(&mut project, args)?;
    save_project(&project, &args.project)?;
    info!(project = ?args.project, sections = project.sections().len(), "project updated");
    recents.update(&args.project)?;
    Ok(())
}

fn apply_edits(project: &mut Project, args: &EditArgs) -> anyhow::Result<()> {
    for dir in &args.add {
        project.add_section(dir);
    }
    for &(one, other) in &args.swap {
        project.swap_sections(one - 1, other - 1)?;
    }
    Ok(())
}

/// Renders section by section so progress can be shown; without a progress bar
/// the whole project goes through `render_project`. With the `parallel` feature
/// sections render concurrently either way.
fn render_with_progress(
    cfg: &CanvasConfig,
    sections: &[SectionConfig],
    progress: bool,
) -> anyhow::Result<RgbImage> {
    use indicatif::{ProgressBar, ProgressStyle};
    if !progress {
        return Ok(render_project(cfg, sections)?);
    }
    cfg.validate()?;
    check_sections(sections)?;
    let bar = ProgressBar::new(sections.len() as u64);
    bar.set_style(ProgressStyle::with_template(
        "{spinner:.green} rendering {pos}/{len} [{elapsed_precise}] {wide_msg}",
    )?);
    let render_one = |section: &SectionConfig| {
        bar.set_message(section.directory.display().to_string());
        let layer = render_section(&cfg.layout_request(section));
        bar.inc(1);
        layer
    };

    #[cfg(feature = "parallel")]
    let layers = {
        use rayon::prelude::*;
        sections
            .par_iter()
            .map(render_one)
            .collect::<Result<Vec<_>, _>>()?
    };
    #[cfg(not(feature = "parallel"))]
    let layers = sections
        .iter()
        .map(render_one)
        .collect::<Result<Vec<_>, _>>()?;

    bar.finish_and_clear();
    Ok(compose_canvas(&layers, cfg))
}

fn resolve_project(explicit: Option<&Path>, recents: &RecentFiles) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => recents
            .top()
            .context("no project given and no recent project available"),
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "yaml" | "yml")
    )
}

fn load_project(path: &Path) -> anyhow::Result<Project> {
    if is_yaml(path) {
        let text =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Ok(serde_yaml::from_str(&text)?)
    } else {
        Project::load(path).with_context(|| format!("load project {}", path.display()))
    }
}

fn save_project(project: &Project, path: &Path) -> anyhow::Result<()> {
    if is_yaml(path) {
        fs::write(path, serde_yaml::to_string(project)?)
            .with_context(|| format!("write {}", path.display()))?;
    } else {
        project
            .save(path)
            .with_context(|| format!("write {}", path.display()))?;
    }
    Ok(())
}

/// Paths without an extension get `.jpg`.
fn with_default_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension("jpg")
    }
}

fn preview_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = output
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "jpg".into());
    output.with_file_name(format!("{stem}_preview.{ext}"))
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s}"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("width: {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("height: {e}"))?;
    if w == 0 || h == 0 {
        return Err("preview size must be non-zero".into());
    }
    Ok((w, h))
}

/// Parses `I,J` into two 1-based positions.
fn parse_pair(s: &str) -> Result<(usize, usize), String> {
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| format!("expected I,J, got {s}"))?;
    let a: usize = a.trim().parse().map_err(|e| format!("first position: {e}"))?;
    let b: usize = b.trim().parse().map_err(|e| format!("second position: {e}"))?;
    if a == 0 || b == 0 {
        return Err("positions start at 1".into());
    }
    Ok((a, b))
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

#[derive(Serialize)]
struct ResolvedConfig<'a> {
    canvas: &'a CanvasConfig,
    sections: &'a [SectionConfig],
    export_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_argument_parses() {
        assert_eq!(parse_size("800x600"), Ok((800, 600)));
        assert_eq!(parse_size("64X32"), Ok((64, 32)));
        assert!(parse_size("800").is_err());
        assert!(parse_size("0x10").is_err());
    }

    #[test]
    fn extension_is_added_only_when_missing() {
        assert_eq!(with_default_extension("out".into()), PathBuf::from("out.jpg"));
        assert_eq!(with_default_extension("out.png".into()), PathBuf::from("out.png"));
        assert_eq!(
            preview_path(Path::new("dir/out.png")),
            PathBuf::from("dir/out_preview.png")
        );
    }

    #[test]
    fn yaml_projects_use_the_same_document_shape() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("p.yaml");
        let cfg = CanvasConfig::builder().with_dimensions(640, 480).header(true).build();
        let project = Project::from_parts(&cfg, vec![SectionConfig::new("icons")], None);
        save_project(&project, &path).unwrap();
        assert_eq!(load_project(&path).unwrap(), project);
    }

    #[test]
    fn edit_appends_then_swaps_by_position() {
        let mut project = Project::from_parts(
            &CanvasConfig::default(),
            vec![SectionConfig::new("a"), SectionConfig::new("b")],
            None,
        );
        let args = EditArgs {
            project: "p.json".into(),
            add: vec!["c".into()],
            swap: vec![parse_pair("1,3").unwrap()],
        };
        apply_edits(&mut project, &args).unwrap();
        let dirs: Vec<_> = project.sections().iter().map(|s| s.directory.clone()).collect();
        assert_eq!(dirs, vec![PathBuf::from("c"), PathBuf::from("b"), PathBuf::from("a")]);

        let out_of_range = EditArgs {
            swap: vec![(1, 9)],
            ..args
        };
        assert!(apply_edits(&mut project, &out_of_range).is_err());
        assert!(parse_pair("0,2").is_err());
        assert!(parse_pair("2").is_err());
    }

    #[test]
    fn progress_render_matches_library_render() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut sections = Vec::new();
        for (name, shade) in [("one", 60u8), ("two", 120), ("three", 200)] {
            let section = dir.path().join(name);
            fs::create_dir_all(&section).unwrap();
            for (i, w) in [30u32, 50, 20].into_iter().enumerate() {
                image::RgbaImage::from_pixel(w, 16, image::Rgba([shade, 0, i as u8, 255]))
                    .save(section.join(format!("img{i}.png")))
                    .unwrap();
            }
            sections.push(SectionConfig::new(&section).with_padding(4, 4));
        }
        let cfg = CanvasConfig::builder()
            .with_dimensions(200, 160)
            .border_size(10)
            .header(true)
            .build();

        let with_bar = render_with_progress(&cfg, &sections, true).unwrap();
        let direct = render_project(&cfg, &sections).unwrap();
        assert_eq!(with_bar.dimensions(), (200, 160));
        assert_eq!(with_bar, direct);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
