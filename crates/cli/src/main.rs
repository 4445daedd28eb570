// ABOUTME: CLI front end for the serpmill capture parser.
// ABOUTME: Parses one capture file or a whole directory and prints JSON for verification.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser as ClapParser;
use serde_json::json;
use serpmill_parser::{Engine, ImageFormat, ImageOptions, Parser, ResultKind, Warning};

/// Parse archived search engine result pages and output JSON.
#[derive(ClapParser, Debug)]
#[command(name = "serpmill")]
#[command(about = "Extract structured records from saved SERP captures", long_about = None)]
struct Args {
    /// A capture file, or a directory of captures to merge.
    target: PathBuf,

    /// Search engine the captures come from.
    #[arg(long)]
    engine: Engine,

    /// Result kind: text, news, videos, or images.
    #[arg(long, default_value = "text")]
    kind: ResultKind,

    /// Extract inline thumbnails into this directory.
    #[arg(long)]
    images_dir: Option<PathBuf>,

    /// Filename prefix for extracted thumbnails.
    #[arg(long, default_value = "image")]
    image_prefix: String,

    /// Thumbnail encoding: jpeg or png.
    #[arg(long, default_value = "jpeg")]
    image_format: String,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut builder = Parser::builder().engine(args.engine, args.kind);
    if let Some(dir) = &args.images_dir {
        let format = match args.image_format.to_lowercase().as_str() {
            "png" => ImageFormat::Png,
            _ => ImageFormat::Jpeg,
        };
        builder = builder.extract_images(
            ImageOptions::new(dir)
                .prefix(args.image_prefix.clone())
                .format(format),
        );
    }
    let parser = builder.build()?;

    let (output, warnings) = if args.target.is_dir() {
        let merged = parser.parse_dir(&args.target)?;
        (
            json!({
                "metadata": merged.metadata,
                "columns": merged.table.columns,
                "results": merged.table.rows,
            }),
            merged.warnings,
        )
    } else {
        let page = parser.parse_file(&args.target)?;
        (
            json!({
                "metadata": page.metadata,
                "results": page.records,
            }),
            page.warnings,
        )
    };

    report_warnings(&warnings);

    if args.compact {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}

fn report_warnings(warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("warning: {warning}");
    }
}
