//! pdfops CLI - PDF compression, merge and split tool

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfops::{
    compress_with_progress, estimate_for, format_file_size, merge_with_progress,
    split_pages_with_progress, CompressionLevel, CompressionOptions, Document, PageSelection,
    PdfBlob, SourceFile, SplitOptions,
};

#[derive(Parser)]
#[command(name = "pdfops")]
#[command(version)]
#[command(about = "Compress, merge and split PDF files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a PDF
    Compress {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (defaults to compressed_<name>.pdf in the output directory)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output directory
        #[arg(long, value_name = "DIR", env = "PDFOPS_OUTPUT_DIR", default_value = ".")]
        output_dir: PathBuf,

        /// Compression level
        #[arg(short, long, value_enum, env = "PDFOPS_LEVEL", default_value = "balanced")]
        level: Level,

        /// Quality (1-100)
        #[arg(short, long, env = "PDFOPS_QUALITY", default_value = "80",
              value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: u8,

        /// Clear title, author and other document info
        #[arg(long)]
        strip_metadata: bool,

        /// Remove page annotations
        #[arg(long)]
        strip_annotations: bool,

        /// Remove bookmarks
        #[arg(long)]
        strip_bookmarks: bool,
    },

    /// Merge PDFs in the given order
    Merge {
        /// Input PDF files
        #[arg(value_name = "FILES", required = true, num_args = 2..)]
        inputs: Vec<PathBuf>,

        /// Output file (defaults to merged.pdf in the output directory)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output directory
        #[arg(long, value_name = "DIR", env = "PDFOPS_OUTPUT_DIR", default_value = ".")]
        output_dir: PathBuf,
    },

    /// Split a PDF into single-page files
    Split {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", env = "PDFOPS_OUTPUT_DIR", default_value = ".")]
        output: PathBuf,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Estimate the compressed size of a PDF
    Estimate {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Compression level
        #[arg(short, long, value_enum, env = "PDFOPS_LEVEL", default_value = "balanced")]
        level: Level,

        /// Quality (1-100)
        #[arg(short, long, env = "PDFOPS_QUALITY", default_value = "80",
              value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: u8,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Level {
    /// Re-serialize only
    Light,
    /// Scale pages above 1500x2000 (default)
    Balanced,
    /// Scale pages above 1200x1600
    Aggressive,
}

impl From<Level> for CompressionLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Light => CompressionLevel::Light,
            Level::Balanced => CompressionLevel::Balanced,
            Level::Aggressive => CompressionLevel::Aggressive,
        }
    }
}

type CmdResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compress {
            input,
            output,
            output_dir,
            level,
            quality,
            strip_metadata,
            strip_annotations,
            strip_bookmarks,
        } => {
            let options = CompressionOptions::new()
                .with_level(level.into())
                .with_quality(quality)
                .with_remove_metadata(strip_metadata)
                .with_remove_annotations(strip_annotations)
                .with_remove_bookmarks(strip_bookmarks);
            cmd_compress(&input, output.as_deref(), &output_dir, &options)
        }
        Commands::Merge {
            inputs,
            output,
            output_dir,
        } => cmd_merge(&inputs, output.as_deref(), &output_dir),
        Commands::Split {
            input,
            output,
            pages,
        } => cmd_split(&input, &output, pages.as_deref()),
        Commands::Estimate {
            input,
            level,
            quality,
        } => cmd_estimate(&input, level, quality),
        Commands::Info { input, json } => cmd_info(&input, json),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn progress_bar(message: &'static str) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message(message);
    Ok(pb)
}

fn write_output(
    blob: &PdfBlob,
    output: Option<&Path>,
    output_dir: &Path,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &blob.data)?;
            Ok(path.to_path_buf())
        }
        None => Ok(blob.write_to_dir(output_dir)?),
    }
}

fn cmd_compress(
    input: &Path,
    output: Option<&Path>,
    output_dir: &Path,
    options: &CompressionOptions,
) -> CmdResult {
    let source = SourceFile::from_path(input)?;
    source.ensure_pdf()?;
    log::debug!("Compressing {} with {:?}", input.display(), options);

    let pb = progress_bar("Compressing...")?;
    let mut report = |percent: u8| pb.set_position(u64::from(percent));
    let result = compress_with_progress(&source.data, options, &mut report);
    let result = match result {
        Ok(result) => {
            pb.finish_with_message("Done!");
            result
        }
        Err(e) => {
            pb.abandon();
            return Err(e.into());
        }
    };

    let original_size = result.original_size;
    let compressed_size = result.compressed_size;
    let kept_original = result.kept_original;
    let ratio = result.reduction_ratio();
    let (scaled, skipped) = (result.pages_scaled, result.pages_skipped);

    let blob = PdfBlob::compressed(&source.name, result.data);
    let path = write_output(&blob, output, output_dir)?;

    println!();
    println!("{}: {}", "Original".bold(), format_file_size(original_size as u64));
    println!("{}: {}", "Compressed".bold(), format_file_size(compressed_size as u64));
    println!("{}: {:.1}%", "Reduction".bold(), ratio * 100.0);
    if scaled > 0 {
        println!("{}: {}", "Pages scaled".bold(), scaled);
    }
    if skipped > 0 {
        println!("{} {} pages could not be optimized", "Warning:".yellow(), skipped);
    }
    if kept_original {
        println!("{}", "Output was not smaller; original kept".yellow());
    }
    println!("{} {}", "Saved to".green(), path.display());

    Ok(())
}

fn cmd_merge(inputs: &[PathBuf], output: Option<&Path>, output_dir: &Path) -> CmdResult {
    let sources = inputs
        .iter()
        .map(|path| SourceFile::from_path(path).map(|source| source.data))
        .collect::<pdfops::Result<Vec<_>>>()?;

    let pb = progress_bar("Merging...")?;
    let mut report = |percent: u8| pb.set_position(u64::from(percent));
    let data = match merge_with_progress(&sources, &mut report) {
        Ok(data) => {
            pb.finish_with_message("Done!");
            data
        }
        Err(e) => {
            pb.abandon();
            return Err(e.into());
        }
    };

    let blob = PdfBlob::merged(data);
    let path = write_output(&blob, output, output_dir)?;

    println!(
        "\n{} {} files merged ({})",
        "Done!".green().bold(),
        inputs.len(),
        format_file_size(blob.len() as u64)
    );
    println!("{} {}", "Saved to".green(), path.display());

    Ok(())
}

fn cmd_split(input: &Path, output: &Path, pages: Option<&str>) -> CmdResult {
    let page_selection = if let Some(p) = pages {
        PageSelection::parse(p)?
    } else {
        PageSelection::All
    };
    let options = SplitOptions::new().with_pages(page_selection);

    let source = SourceFile::from_path(input)?;
    source.ensure_pdf()?;
    log::debug!("Splitting {} ({:?})", input.display(), options.pages);

    let pb = progress_bar("Splitting...")?;
    let mut report = |percent: u8| pb.set_position(u64::from(percent));
    let pages = match split_pages_with_progress(&source.data, &options, &mut report) {
        Ok(pages) => {
            pb.finish_with_message("Done!");
            pages
        }
        Err(e) => {
            pb.abandon();
            return Err(e.into());
        }
    };

    println!();
    let count = pages.len();
    for page in pages {
        let blob = PdfBlob::page(&source.name, page.number, page.data);
        let path = blob.write_to_dir(output)?;
        println!("{} {}", "Wrote".green(), path.display());
    }

    println!("\n{} {} pages written", "Done!".green().bold(), count);

    Ok(())
}

fn cmd_estimate(input: &Path, level: Level, quality: u8) -> CmdResult {
    let size = std::fs::metadata(input)?.len();
    let options = CompressionOptions::new()
        .with_level(level.into())
        .with_quality(quality);
    options.validate()?;

    println!("{}: {}", "Original".bold(), format_file_size(size));
    println!(
        "{}: ~{} ({} level, quality {})",
        "Estimated".bold(),
        format_file_size(estimate_for(size, &options)),
        options.level,
        options.quality
    );

    Ok(())
}

fn cmd_info(input: &Path, json: bool) -> CmdResult {
    let source = SourceFile::from_path(input)?;
    let doc = Document::load(&source.data)?;
    let metadata = doc.metadata();
    let pages = doc.page_infos()?;

    if json {
        let info = serde_json::json!({
            "file": source.name,
            "size": source.size(),
            "metadata": metadata,
            "bookmarks": doc.has_outlines(),
            "pages": pages,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Size".bold(), format_file_size(source.size() as u64));
    println!("{}: PDF {}", "Format".bold(), metadata.pdf_version);
    println!("{}: {}", "Pages".bold(), metadata.page_count);
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if metadata.encrypted { "Yes" } else { "No" }
    );
    println!(
        "{}: {}",
        "Bookmarks".bold(),
        if doc.has_outlines() { "Yes" } else { "No" }
    );

    let fields = [
        ("Title", &metadata.title),
        ("Author", &metadata.author),
        ("Subject", &metadata.subject),
        ("Keywords", &metadata.keywords),
        ("Creator", &metadata.creator),
        ("Producer", &metadata.producer),
    ];
    for (label, value) in fields {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            println!("{}: {}", label.bold(), value);
        }
    }
    if let Some(ref created) = metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    println!();
    println!("{}", "Pages".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for page in &pages {
        print!(
            "{:>4}  {:.0} x {:.0}",
            page.number, page.geometry.width, page.geometry.height
        );
        if page.rotation != 0 {
            print!("  rotated {}°", page.rotation);
        }
        if page.annotations > 0 {
            print!("  {} annotations", page.annotations);
        }
        println!();
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfops".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF compression, merge and split tool");
    println!();
    println!("License: MIT");
}
