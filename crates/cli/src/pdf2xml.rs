//! pdf2xml - Dump the layout of PDF pages as XML
//!
//! Lines, curves, figures and images are written as elements; characters
//! and rectangles are collected per page and can be summarized with
//! `--summary`.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use contour_core::api::{ConvertOptions, convert_to_xml_with};
use contour_core::converter::XMLConverter;
use contour_core::document::{DocumentSource, LopdfDocument};
use contour_core::image::ImageWriter;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// A command line tool for dumping the layout tree of PDF pages as XML.
#[derive(Parser, Debug)]
#[command(name = "pdf2xml")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a PDF file, or "-" for stdin
    file: String,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Text encoding for output file
    #[arg(short = 'c', long)]
    codec: Option<String>,

    /// Directory to extract images to (if not given, images are not extracted)
    #[arg(short = 'O', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Remove control characters from XML output
    #[arg(short = 'S', long = "strip-control", action = ArgAction::SetTrue)]
    strip_control: bool,

    /// The maximum number of pages to parse (0 = no limit)
    #[arg(short = 'm', long)]
    maxpages: Option<usize>,

    /// A space- or comma-separated list of page numbers to parse (1-indexed)
    #[arg(long = "page-numbers")]
    page_numbers: Option<String>,

    /// JSON file with conversion options; flags given on the command line win
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Print the per-page character count and rectangle extents to stderr
    #[arg(long, action = ArgAction::SetTrue)]
    summary: bool,
}

/// Parse 1-indexed page numbers into 0-indexed ones.
fn parse_page_numbers(list: &str) -> Option<Vec<usize>> {
    let nums: Vec<usize> = list
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.trim().parse::<usize>().ok())
        .map(|n| n.saturating_sub(1))
        .collect();
    if nums.is_empty() { None } else { Some(nums) }
}

/// Build conversion options from the config file (if any) and the flags.
fn build_options(args: &Args) -> Result<ConvertOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => ConvertOptions::default(),
    };
    if let Some(codec) = &args.codec {
        options.codec = codec.clone();
    }
    if args.strip_control {
        options.strip_control = true;
    }
    if let Some(maxpages) = args.maxpages {
        options.maxpages = maxpages;
    }
    if let Some(list) = &args.page_numbers {
        options.page_numbers = parse_page_numbers(list);
    }
    Ok(options)
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_input(file: &str) -> Result<Vec<u8>> {
    if file == "-" {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data).context("reading stdin")?;
        Ok(data)
    } else {
        std::fs::read(file).with_context(|| format!("reading {}", file))
    }
}

fn run<W: Write>(args: &Args, writer: W) -> Result<W> {
    let options = build_options(args)?;
    let pdf_data = read_input(&args.file)?;
    let doc = LopdfDocument::from_bytes(&pdf_data)
        .with_context(|| format!("loading {}", args.file))?;
    tracing::info!(file = %args.file, pages = doc.page_count(), "document loaded");

    let mut converter =
        XMLConverter::new(writer, &options.codec)?.with_strip_control(options.strip_control);
    if let Some(dir) = &args.output_dir {
        converter.set_image_writer(Box::new(ImageWriter::new(dir)?));
    }

    let summary = args.summary;
    let writer = convert_to_xml_with(&doc, converter, &options, |pageid, buffers| {
        if summary {
            eprintln!("page {}\n{}", pageid, buffers.summary());
        }
        Ok(())
    })?;
    Ok(writer)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    if args.outfile == "-" {
        let stdout = io::stdout();
        let mut writer = run(&args, BufWriter::new(stdout.lock()))?;
        writer.flush()?;
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("creating {}", args.outfile))?;
        let mut writer = run(&args, BufWriter::new(file))?;
        writer.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_numbers_are_one_based() {
        assert_eq!(parse_page_numbers("1, 3 4"), Some(vec![0, 2, 3]));
        assert_eq!(parse_page_numbers(" "), None);
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("options.json");
        std::fs::write(&config, r#"{"codec": "latin1", "maxpages": 5}"#).unwrap();
        let args = Args::try_parse_from([
            "pdf2xml",
            "in.pdf",
            "--config",
            config.to_str().unwrap(),
            "-m",
            "2",
            "-S",
        ])
        .unwrap();
        let options = build_options(&args).unwrap();
        assert_eq!(options.codec, "latin1");
        assert_eq!(options.maxpages, 2);
        assert!(options.strip_control);
    }

    #[test]
    fn stdin_marker_is_accepted() {
        let args = Args::try_parse_from(["pdf2xml", "-", "--summary"]).unwrap();
        assert_eq!(args.file, "-");
        assert!(args.summary);
        assert_eq!(args.outfile, "-");
    }
}
