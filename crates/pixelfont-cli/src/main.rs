use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flexi_logger::Logger;
use pixelfont::{
    coverage, export_font, glyph_set::assemble, naming::glyph_name, outline::to_svg_path,
    ExportFormat, Project, SaveToDirectory, TrueTypeEncoder,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pixelfont", about = "Pixel grid font toolkit CLI")]
struct Cli {
    /// Log pipeline details
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Export a project as a font file
    Export {
        #[arg(short, long)]
        project: PathBuf,
        /// Target directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
        /// Override the font name stored in the project
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        units_per_em: Option<u16>,
        /// ttf or otf
        #[arg(long, default_value = "ttf")]
        format: ExportFormat,
    },
    /// Show printable ASCII coverage
    Coverage {
        #[arg(short, long)]
        project: PathBuf,
    },
    /// List the glyphs an export would contain
    Inspect {
        #[arg(short, long)]
        project: PathBuf,
    },
    /// Print the SVG path of one character
    Svg {
        #[arg(short, long)]
        project: PathBuf,
        #[arg(short, long)]
        char: char,
        /// Size of one pixel in SVG units
        #[arg(long, default_value = "10")]
        scale: f64,
    },
}

fn load(path: &Path) -> Result<Project> {
    Project::load(path).with_context(|| format!("loading {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    let _logger = Logger::try_with_env_or_str(level)?.log_to_stderr().start()?;

    match cli.command {
        Cmd::Export {
            project,
            output,
            name,
            units_per_em,
            format,
        } => {
            let mut project = load(&project)?;
            if let Some(name) = name {
                project.settings.font_name = name;
            }
            if let Some(upm) = units_per_em {
                project.settings.units_per_em = upm;
            }
            let mut delivery = SaveToDirectory::new(&output);
            let report = export_font(
                &project.characters,
                &project.settings,
                &TrueTypeEncoder::new(),
                &mut delivery,
                format,
            )?;
            println!(
                "Exported {} ({} glyphs, {} bytes, {}% coverage)",
                output.join(&report.filename).display(),
                report.glyph_count,
                report.byte_len,
                report.coverage.percentage
            );
        }
        Cmd::Coverage { project } => {
            let project = load(&project)?;
            let stats = coverage(Some(&project.characters));
            println!(
                "Designed: {}/{} ({}%)",
                stats.designed, stats.total, stats.percentage
            );
            println!("  Uppercase: {}", stats.uppercase);
            println!("  Lowercase: {}", stats.lowercase);
            println!("  Numbers:   {}", stats.numbers);
            println!("  Symbols:   {}", stats.symbols);
            if !stats.missing.is_empty() {
                let missing: String = stats.missing.iter().collect();
                println!("Missing: {missing}");
            }
        }
        Cmd::Inspect { project } => {
            let project = load(&project)?;
            let glyph_set = assemble(&project.characters, &project.settings);
            println!(
                "Font: {} {} ({} units/em)",
                glyph_set.family_name, glyph_set.style_name, glyph_set.units_per_em
            );
            println!("  Glyphs: {}", glyph_set.glyphs.len());
            for glyph in &glyph_set.glyphs {
                let code = glyph
                    .codepoint
                    .map(|c| format!("U+{c:04X}"))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "  {:<8} {:<14} advance {:>5}  rects {}",
                    code,
                    glyph.name,
                    glyph.advance_width,
                    glyph.outline.len()
                );
            }
        }
        Cmd::Svg {
            project,
            char,
            scale,
        } => {
            let project = load(&project)?;
            let bitmap = project
                .characters
                .get(&(char as u32))
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "no character '{char}' ({}) in project",
                        glyph_name(char as u32)
                    )
                })?;
            println!("{}", to_svg_path(bitmap, scale));
        }
    }
    Ok(())
}
