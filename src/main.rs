use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use seabed_profile::profile_reader::CsvProfileSource;
use seabed_profile::report_writer::{write_attributes_csv, write_failures_csv};
use seabed_profile::{
    run_batch, BatchReport, ClassifierConfig, Polarity, SkewnessConvention, ThresholdCarry,
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolarityArg {
    High,
    Low,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SkewnessArg {
    Population,
    Sample,
}

/// Derive profile shape attributes for bathymetric high/low features
#[derive(Debug, Parser)]
#[command(name = "seabed-profile", version)]
struct Cli {
    /// Profile point CSV file, or a folder of CSV files
    input: PathBuf,

    /// Feature type: high (top attributes) or low (bottom attributes)
    #[arg(long, value_enum, default_value = "high")]
    polarity: PolarityArg,

    /// Knick-point grouping window; derived from sample count when omitted
    #[arg(long)]
    gap: Option<usize>,

    /// Reuse the first round's threshold in every later detection round
    #[arg(long)]
    legacy_threshold: bool,

    #[arg(long, value_enum, default_value = "population")]
    skewness: SkewnessArg,

    /// Worker threads (0 = one per core)
    #[arg(long, default_value_t = 0)]
    workers: usize,

    /// Attribute CSV path [default: <input>_profile_attributes.csv]
    #[arg(long)]
    output: Option<PathBuf>,

    /// Failed-feature CSV path [default: <input>_failed_features.csv]
    #[arg(long)]
    failures: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> ClassifierConfig {
        let mut config = match self.polarity {
            PolarityArg::High => ClassifierConfig::high(),
            PolarityArg::Low => ClassifierConfig::low(),
        };
        config.gap = self.gap;
        config.workers = self.workers;
        config.skewness = match self.skewness {
            SkewnessArg::Population => SkewnessConvention::Population,
            SkewnessArg::Sample => SkewnessConvention::Sample,
        };
        if self.legacy_threshold {
            config.knick.threshold_carry = ThresholdCarry::FirstRound;
        }
        config
    }
}

fn sibling_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("profiles");
    input.with_file_name(format!("{}_{}.csv", stem, suffix))
}

fn print_summary(report: &BatchReport, polarity: Polarity) {
    println!("\n📊 PROFILE ATTRIBUTE SUMMARY ({})", polarity.extreme_label());
    println!("================================");
    println!("Features: {}", report.outcomes.len());
    println!("✅ Classified: {}", report.success_count());
    if report.failure_count() > 0 {
        println!("⚠️  Failed: {}", report.failure_count());
    }

    let counts = report.shape_counts();
    if !counts.is_empty() {
        println!("\nProfile shapes:");
        for (shape, count) in counts {
            println!("  {:<10} {}", shape, count);
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config();

    let source = CsvProfileSource::from_path(&cli.input)
        .with_context(|| format!("reading input {}", cli.input.display()))?;
    info!("Found {} profile file(s)", source.paths().len());

    let report = run_batch(&source, &config).context("profile classification failed")?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| sibling_path(&cli.input, "profile_attributes"));
    write_attributes_csv(&report, config.polarity, &output)
        .with_context(|| format!("writing {}", output.display()))?;

    if report.failure_count() > 0 || cli.failures.is_some() {
        let failures = cli
            .failures
            .clone()
            .unwrap_or_else(|| sibling_path(&cli.input, "failed_features"));
        write_failures_csv(&report, &failures)
            .with_context(|| format!("writing {}", failures.display()))?;
        println!("📁 Failed features listed in: {}", failures.display());
    }

    print_summary(&report, config.polarity);
    println!("📁 Results saved to: {}", output.display());

    Ok(())
}
