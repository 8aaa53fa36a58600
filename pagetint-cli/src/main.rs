use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pagetint::{
    AnalysisSummary, AnalyzerOptions, ClassificationThresholds, CostBreakdown, DocumentAnalyzer,
    PdfiumBackend, RasterBackend, RasterDocument, RateCard,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "pagetint",
    about = "Classify PDF pages as black-and-white, color, or photographic",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a PDF and report per-page color classification
    Analyze {
        /// Input PDF file
        input: PathBuf,

        /// Minimum colored-pixel percentage for a color page
        #[arg(long, default_value_t = pagetint::DEFAULT_COLOR_THRESHOLD)]
        color_threshold: f64,

        /// Minimum colored-pixel percentage for a photographic page
        #[arg(long, default_value_t = pagetint::DEFAULT_PHOTO_THRESHOLD)]
        photo_threshold: f64,

        /// Linear downsample factor applied before classification
        #[arg(long, default_value_t = pagetint::DEFAULT_DOWNSAMPLE)]
        scale: f64,

        /// Worker threads (defaults to available cores)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Abort if analysis takes longer than this many seconds
        #[arg(long)]
        deadline_secs: Option<u64>,

        /// Emit the summary as JSON instead of a report
        #[arg(long)]
        json: bool,

        /// Include a price quote in the output
        #[arg(short, long)]
        quote: bool,

        /// Per-page rate for black-and-white pages
        #[arg(long, default_value_t = 500.0)]
        rate_bw: f64,

        /// Per-page rate for color pages
        #[arg(long, default_value_t = 1500.0)]
        rate_color: f64,

        /// Per-page rate for photographic pages
        #[arg(long, default_value_t = 1500.0)]
        rate_photo: f64,
    },

    /// Print the page count of a PDF
    Info {
        /// Input PDF file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pagetint=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            color_threshold,
            photo_threshold,
            scale,
            jobs,
            deadline_secs,
            json,
            quote,
            rate_bw,
            rate_color,
            rate_photo,
        } => {
            let bytes = read_input(&input)?;

            let mut options = AnalyzerOptions::default().with_downsample(scale);
            if let Some(jobs) = jobs {
                options = options.with_max_workers(jobs);
            }
            if let Some(secs) = deadline_secs {
                options = options.with_deadline(Duration::from_secs(secs));
            }

            let analyzer = DocumentAnalyzer::with_options(PdfiumBackend::new(), options);
            let thresholds = ClassificationThresholds::new(color_threshold, photo_threshold);
            let summary = analyzer
                .analyze(&bytes, thresholds)
                .with_context(|| format!("failed to analyze {}", input.display()))?;

            let breakdown =
                quote.then(|| RateCard::new(rate_bw, rate_color, rate_photo).quote(&summary));

            if json {
                print_json(&summary, breakdown)?;
            } else {
                print_report(&input, &summary, breakdown);
            }
        }

        Commands::Info { input } => {
            let bytes = read_input(&input)?;
            let document = PdfiumBackend::new()
                .open_document(&bytes)
                .with_context(|| format!("failed to open {}", input.display()))?;
            println!("{}: {} pages", input.display(), document.page_count());
        }
    }

    Ok(())
}

fn read_input(input: &Path) -> Result<Vec<u8>> {
    std::fs::read(input).with_context(|| format!("failed to read {}", input.display()))
}

fn print_json(summary: &AnalysisSummary, breakdown: Option<CostBreakdown>) -> Result<()> {
    let output = match breakdown {
        Some(quote) => serde_json::json!({ "summary": summary, "quote": quote }),
        None => serde_json::to_value(summary)?,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_report(input: &Path, summary: &AnalysisSummary, breakdown: Option<CostBreakdown>) {
    println!("Document: {}", input.display());
    println!(
        "Thresholds: color >= {}%, photographic >= {}%",
        summary.thresholds.color, summary.thresholds.photo
    );
    println!("Total pages: {}", summary.total_pages);
    println!("  black-and-white: {}", summary.bw_pages);
    println!("  color:           {}", summary.color_pages);
    println!("  photographic:    {}", summary.photo_pages);

    if !summary.pages.is_empty() {
        println!();
        println!("{:>5}  {:<16} {:>8}", "Page", "Class", "Color %");
        for page in &summary.pages {
            println!(
                "{:>5}  {:<16} {:>8.2}",
                page.page_number,
                page.class.as_str(),
                page.color_percentage
            );
        }
    }

    if let Some(quote) = breakdown {
        println!();
        println!("Quote:");
        println!("  black-and-white: {:.2}", quote.bw_cost);
        println!("  color:           {:.2}", quote.color_cost);
        println!("  photographic:    {:.2}", quote.photo_cost);
        println!("  total:           {:.2}", quote.total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_analyze_defaults() {
        let cli = Cli::parse_from(["pagetint", "analyze", "scan.pdf"]);
        match cli.command {
            Commands::Analyze {
                color_threshold,
                photo_threshold,
                scale,
                json,
                quote,
                ..
            } => {
                assert_eq!(color_threshold, 10.0);
                assert_eq!(photo_threshold, 30.0);
                assert_eq!(scale, 0.25);
                assert!(!json);
                assert!(!quote);
            }
            _ => panic!("expected analyze command"),
        }
    }

    #[test]
    fn test_analyze_overrides() {
        let cli = Cli::parse_from([
            "pagetint",
            "analyze",
            "scan.pdf",
            "--color-threshold",
            "5",
            "--photo-threshold",
            "50",
            "--jobs",
            "2",
            "--json",
        ]);
        match cli.command {
            Commands::Analyze {
                color_threshold,
                photo_threshold,
                jobs,
                json,
                ..
            } => {
                assert_eq!(color_threshold, 5.0);
                assert_eq!(photo_threshold, 50.0);
                assert_eq!(jobs, Some(2));
                assert!(json);
            }
            _ => panic!("expected analyze command"),
        }
    }
}
