use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use cct::scheme::{builtin_scheme, BUILTIN_NAMES};
use cct::{Codebook, Scheme};
use cct_gen::page::{draw_sheet, draw_target_page};
use cct_gen::sheet::{self, PageSpec, SheetSpec};
use cct_gen::svg::SvgWriter;
use cct_gen::target;

mod render_pdf;
mod render_png;

/// Circular coded target generation and sheet rendering CLI
#[derive(Parser)]
#[command(name = "cct-gen", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all built-in code schemes
    List,
    /// Show detailed info about a code scheme
    Info {
        /// Scheme name (built-in) or path to .toml config
        #[arg(long, default_value = "cct14")]
        scheme: String,
    },
    /// Print the full codebook of a scheme
    Codes {
        /// Scheme name (built-in) or path to .toml config
        #[arg(long, default_value = "cct14")]
        scheme: String,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Render individual targets, one file each
    Render {
        /// Scheme name (built-in) or path to .toml config
        #[arg(long, default_value = "cct14")]
        scheme: String,
        /// Target IDs to render (e.g. "0", "0-9", "0,3,5")
        #[arg(long, default_value = "0")]
        ids: String,
        /// Center dot diameter in mm
        #[arg(long, default_value = "20")]
        diameter_mm: f64,
        /// Page margin around the target in mm
        #[arg(long, default_value = "10")]
        margin_mm: f64,
        /// Output format
        #[arg(long, default_value = "svg")]
        format: String,
        /// Pixels per mm for PNG previews
        #[arg(long, default_value = "4")]
        scale: f64,
        /// Suppress the printed ID label
        #[arg(long)]
        no_labels: bool,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: String,
    },
    /// Lay out a sheet of targets and write it
    Sheet {
        /// Scheme name (built-in) or path to .toml config
        #[arg(long, default_value = "cct14")]
        scheme: String,
        /// Sheet configuration TOML path
        #[arg(long)]
        config: Option<String>,
        /// Evenly spread grid, as ROWSxCOLS (e.g. "4x2")
        #[arg(long)]
        grid: Option<String>,
        /// Center dot diameter in mm (grid mode)
        #[arg(long, default_value = "20")]
        diameter_mm: f64,
        /// First target ID (grid mode)
        #[arg(long, default_value = "0")]
        start_id: usize,
        /// Suppress the printed ID labels
        #[arg(long)]
        no_labels: bool,
        /// Output format
        #[arg(long, default_value = "pdf")]
        format: String,
        /// Pixels per mm for PNG previews
        #[arg(long, default_value = "4")]
        scale: f64,
        /// Output file path
        #[arg(short, long, default_value = "sheet.pdf")]
        output: String,
    },
    /// Regenerate a codebook and check every scheme invariant
    Verify {
        /// Scheme name (built-in) or path to .toml config
        #[arg(long, default_value = "cct14")]
        scheme: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::List => cmd_list(),
        Command::Info { scheme } => cmd_info(&scheme),
        Command::Codes { scheme, json } => cmd_codes(&scheme, json),
        Command::Render {
            scheme,
            ids,
            diameter_mm,
            margin_mm,
            format,
            scale,
            no_labels,
            output,
        } => cmd_render(
            &scheme,
            &ids,
            diameter_mm,
            margin_mm,
            &format,
            scale,
            !no_labels,
            &output,
        ),
        Command::Sheet {
            scheme,
            config,
            grid,
            diameter_mm,
            start_id,
            no_labels,
            format,
            scale,
            output,
        } => cmd_sheet(
            &scheme,
            config.as_deref(),
            grid.as_deref(),
            diameter_mm,
            start_id,
            !no_labels,
            &format,
            scale,
            &output,
        ),
        Command::Verify { scheme } => cmd_verify(&scheme),
    }
}

/// Load a scheme by name (built-in) or path (.toml file).
fn load_scheme(name_or_path: &str) -> Result<Scheme> {
    if let Some(scheme) = builtin_scheme(name_or_path) {
        return Ok(scheme);
    }

    let toml_path = Path::new(name_or_path);
    if toml_path.exists() {
        let toml_str = std::fs::read_to_string(toml_path)
            .with_context(|| format!("reading {}", toml_path.display()))?;
        return Scheme::from_toml(&toml_str)
            .with_context(|| format!("parsing scheme from {}", toml_path.display()));
    }

    anyhow::bail!(
        "unknown scheme '{}'. Use 'list' to see built-in schemes, or provide a .toml path.",
        name_or_path
    );
}

/// Parse an ID specification like "0", "0-9", "0,3,5", "0-4,7,10-12".
fn parse_ids(spec: &str, max_id: usize) -> Result<Vec<usize>> {
    let mut ids = Vec::new();
    for part in spec.split(',') {
        let part = part.trim();
        if let Some((start, end)) = part.split_once('-') {
            let start: usize = start.trim().parse().context("invalid ID range start")?;
            let end: usize = end.trim().parse().context("invalid ID range end")?;
            anyhow::ensure!(
                end < max_id,
                "ID {} exceeds max {} for this scheme",
                end,
                max_id - 1
            );
            ids.extend(start..=end);
        } else {
            let id: usize = part.parse().context("invalid ID")?;
            anyhow::ensure!(
                id < max_id,
                "ID {} exceeds max {} for this scheme",
                id,
                max_id - 1
            );
            ids.push(id);
        }
    }
    Ok(ids)
}

fn cmd_list() -> Result<()> {
    println!(
        "{:<8} {:>5} {:>12} {:>7}",
        "Scheme", "Bits", "Transitions", "Codes"
    );
    println!("{}", "-".repeat(36));
    for name in BUILTIN_NAMES {
        let scheme = builtin_scheme(name).unwrap();
        let book = Codebook::generate(&scheme);
        let transitions = scheme
            .transitions()
            .map_or("any".to_string(), |t| t.to_string());
        println!(
            "{:<8} {:>5} {:>12} {:>7}",
            scheme.name(),
            scheme.bits(),
            transitions,
            book.len(),
        );
    }
    Ok(())
}

fn cmd_info(name: &str) -> Result<()> {
    let scheme = load_scheme(name)?;
    let book = Codebook::generate(&scheme);
    let width = scheme.bits() as usize;

    println!("Scheme:       {}", scheme.name());
    println!("Bits:         {}", scheme.bits());
    match scheme.transitions() {
        Some(t) => println!("Transitions:  {t}"),
        None => println!("Transitions:  any"),
    }
    println!("Codes:        {}", book.len());
    if let (Some(first), Some(last)) = (book.codes().first(), book.codes().last()) {
        println!("First code:   {first:#x} ({first:0width$b})");
        println!("Last code:    {last:#x} ({last:0width$b})");
    }
    Ok(())
}

#[derive(Serialize)]
struct CodesOutput<'a> {
    scheme: &'a str,
    bits: u32,
    count: usize,
    codes: Vec<CodeEntry>,
}

#[derive(Serialize)]
struct CodeEntry {
    id: usize,
    code: u64,
    binary: String,
}

fn cmd_codes(name: &str, json: bool) -> Result<()> {
    let scheme = load_scheme(name)?;
    let book = Codebook::generate(&scheme);
    let width = scheme.bits() as usize;

    if json {
        let out = CodesOutput {
            scheme: scheme.name(),
            bits: scheme.bits(),
            count: book.len(),
            codes: book
                .codes()
                .iter()
                .enumerate()
                .map(|(id, &code)| CodeEntry {
                    id,
                    code,
                    binary: format!("{code:0width$b}"),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Codes (as binary):");
    for &code in book.codes() {
        println!("{code:0width$b}");
    }
    println!("\nCodes (as integer):");
    println!("{:?}", book.codes());
    println!("\nNumber of codes: {}", book.len());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_render(
    name: &str,
    id_spec: &str,
    diameter_mm: f64,
    margin_mm: f64,
    format: &str,
    scale: f64,
    with_labels: bool,
    output_dir: &str,
) -> Result<()> {
    let scheme = load_scheme(name)?;
    let book = Codebook::generate(&scheme);
    anyhow::ensure!(!book.is_empty(), "scheme '{}' has an empty codebook", scheme.name());
    let ids = parse_ids(id_spec, book.len())?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory '{}'", output_dir))?;

    for &id in &ids {
        let rendered = target::render(&book, id, diameter_mm)?;
        let filename = format!("{}_{:04}.{}", scheme.name(), id, format);
        let path = Path::new(output_dir).join(&filename);

        match format {
            "svg" => {
                let mut svg = SvgWriter::new();
                draw_target_page(&mut svg, &rendered, margin_mm, with_labels)?;
                std::fs::write(&path, &svg.pages()[0])
                    .with_context(|| format!("writing {}", path.display()))?;
            }
            "pdf" => {
                render_pdf::write_target_pdf(&rendered, margin_mm, with_labels, &path)?;
            }
            "png" => {
                let mut png = render_png::PngWriter::new(scale);
                draw_target_page(&mut png, &rendered, margin_mm, with_labels)?;
                png.write_page(0, &path)?;
            }
            _ => anyhow::bail!("unknown format '{}', use 'svg', 'pdf' or 'png'", format),
        }
        println!("wrote {}", path.display());
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_sheet(
    name: &str,
    config: Option<&str>,
    grid: Option<&str>,
    diameter_mm: f64,
    start_id: usize,
    with_labels: bool,
    format: &str,
    scale: f64,
    output: &str,
) -> Result<()> {
    let scheme = load_scheme(name)?;
    let book = Codebook::generate(&scheme);

    let mut spec = match (config, grid) {
        (Some(_), Some(_)) => anyhow::bail!("--config and --grid are mutually exclusive"),
        (Some(path), None) => {
            let toml_str = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path))?;
            SheetSpec::from_toml(&toml_str)
                .with_context(|| format!("parsing sheet config from {}", path))?
        }
        (None, Some(grid)) => {
            let (rows, cols) = parse_grid(grid)?;
            sheet::grid_spec(&book, PageSpec::default(), diameter_mm, start_id, rows, cols)?
        }
        (None, None) => anyhow::bail!("pass either --config <sheet.toml> or --grid ROWSxCOLS"),
    };
    if !with_labels {
        spec.labels = false;
    }

    let layout = sheet::layout(&book, &spec)?;
    let out_path = Path::new(output);

    match format {
        "pdf" => {
            render_pdf::write_sheet_pdf(&layout, out_path)?;
            println!("wrote {}", out_path.display());
        }
        "svg" => {
            let mut svg = SvgWriter::new();
            draw_sheet(&mut svg, &layout)?;
            let pages = svg.pages();
            for (idx, page) in pages.iter().enumerate() {
                let path = page_path(out_path, idx, pages.len());
                std::fs::write(&path, page)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("wrote {}", path.display());
            }
        }
        "png" => {
            let mut png = render_png::PngWriter::new(scale);
            draw_sheet(&mut png, &layout)?;
            for idx in 0..png.page_count() {
                let path = page_path(out_path, idx, png.page_count());
                png.write_page(idx, &path)?;
                println!("wrote {}", path.display());
            }
        }
        _ => anyhow::bail!("unknown format '{}', use 'pdf', 'svg' or 'png'", format),
    }
    Ok(())
}

fn cmd_verify(name: &str) -> Result<()> {
    let scheme = load_scheme(name)?;
    let book = Codebook::generate(&scheme);

    // from_codes re-runs every per-code invariant plus the pairwise
    // rotation-uniqueness check.
    Codebook::from_codes(&scheme, book.codes().to_vec())
        .with_context(|| format!("FAIL: {}", scheme.name()))?;

    println!(
        "PASS: {} — {} codes, rotation-invariant unique",
        scheme.name(),
        book.len()
    );
    Ok(())
}

/// Parse a grid spec like "4x2" into (rows, cols).
fn parse_grid(spec: &str) -> Result<(usize, usize)> {
    let (rows, cols) = spec
        .split_once(['x', 'X'])
        .with_context(|| format!("grid must be ROWSxCOLS, got '{spec}'"))?;
    let rows: usize = rows.trim().parse().context("invalid grid row count")?;
    let cols: usize = cols.trim().parse().context("invalid grid column count")?;
    Ok((rows, cols))
}

/// Per-page output path: `sheet.svg` stays as-is for a single page,
/// multi-page output becomes `sheet_p1.svg`, `sheet_p2.svg`, …
fn page_path(base: &Path, idx: usize, total: usize) -> PathBuf {
    if total <= 1 {
        return base.to_path_buf();
    }
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sheet".to_string());
    let ext = base
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = if ext.is_empty() {
        format!("{}_p{}", stem, idx + 1)
    } else {
        format!("{}_p{}.{}", stem, idx + 1, ext)
    };
    base.with_file_name(name)
}
