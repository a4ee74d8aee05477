// SPDX-License-Identifier: PMPL-1.0-or-later

//! pump-attack: empirical ReDoS confirmation
//!
//! Profiles every candidate in the selected corpora with a two-point growth
//! sample, or ramps a single candidate through up to twenty pump steps.

use anyhow::{bail, Result};
use clap::{ArgAction, Parser};
use pump_attack::attack::{CancelToken, ValidationExecutor};
use pump_attack::config::RunSettings;
use pump_attack::corpus::{Corpus, Suite};
use pump_attack::engine::{BacktrackEngine, MatchEngine};
use pump_attack::report::{self, ReportFormatter, ReportOutputFormat};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pump-attack")]
#[command(version)]
#[command(about = "Empirically confirm ReDoS candidates by timing pumped attack strings")]
#[command(long_about = None)]
struct Cli {
    /// Base pump-count added to every record's baseline (default 0)
    #[arg(long, value_name = "INT")]
    base: Option<usize>,

    /// Stress-test the vulnerability with this id instead of profiling
    #[arg(long, value_name = "ID", default_value = "")]
    stress: String,

    /// Bundled suite(s) to validate
    #[arg(long, value_enum, default_value = "all")]
    suite: SuiteArg,

    /// Corpus file(s) to validate instead of the bundled suites (JSON or YAML)
    #[arg(long, value_name = "PATH")]
    corpus: Vec<PathBuf>,

    /// Wall-clock budget for a single match, in milliseconds
    #[arg(long, value_name = "MS")]
    budget_ms: Option<u64>,

    /// Growth percentage above which a candidate counts as confirmed
    #[arg(long, value_name = "PERCENT")]
    threshold: Option<f64>,

    /// Profile records in parallel (noisier timings)
    #[arg(long)]
    parallel: bool,

    /// Run settings file (JSON or YAML)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Also write the full report to this file
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Format for --output (default: from extension, else json)
    #[arg(long, value_enum)]
    format: Option<ReportOutputFormat>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum SuiteArg {
    Regexlib,
    Snort,
    All,
}

impl SuiteArg {
    fn suites(self) -> Vec<Suite> {
        match self {
            SuiteArg::Regexlib => vec![Suite::Regexlib],
            SuiteArg::Snort => vec![Suite::Snort],
            SuiteArg::All => Suite::all(),
        }
    }
}

fn init_logging(verbose: u8, no_color: bool) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .init();
}

fn settings_from(cli: &Cli) -> Result<RunSettings> {
    let mut settings = match &cli.config {
        Some(path) => RunSettings::load(path)?,
        None => RunSettings::default(),
    };
    if let Some(base) = cli.base {
        settings.base = base;
    }
    if let Some(budget_ms) = cli.budget_ms {
        settings.budget_ms = budget_ms;
    }
    if let Some(threshold) = cli.threshold {
        settings.growth.threshold_percent = threshold;
    }
    if cli.parallel {
        settings.parallel = true;
    }
    settings.validate()?;
    Ok(settings)
}

fn load_corpora(cli: &Cli) -> Result<Vec<Corpus>> {
    let mut corpora = Vec::new();
    if cli.corpus.is_empty() {
        for suite in cli.suite.suites() {
            corpora.push(suite.load()?);
        }
    } else {
        for path in &cli.corpus {
            corpora.push(Corpus::load(path)?);
        }
    }
    Ok(corpora)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.no_color);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let settings = settings_from(&cli)?;
    let corpora = load_corpora(&cli)?;

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    if let Err(err) = ctrlc::set_handler(move || handler_token.cancel()) {
        tracing::warn!("interrupt handler unavailable: {}", err);
    }

    let engine = BacktrackEngine::new();
    let executor = ValidationExecutor::new(&engine, settings.clone()).with_cancel(cancel.clone());
    let formatter = if cli.no_color {
        ReportFormatter::plain()
    } else {
        ReportFormatter::new()
    };

    let mut profiles = Vec::new();
    let mut stress = Vec::new();

    if cli.stress.is_empty() {
        for corpus in &corpora {
            if cancel.is_cancelled() {
                break;
            }
            let profile = executor.profile(corpus);
            report::print_profile(&profile, &formatter);
            profiles.push(profile);
        }
    } else {
        for corpus in &corpora {
            if let Some(ramp) = executor.stress(corpus, &cli.stress) {
                report::print_stress(&ramp, &formatter);
                stress.push(ramp);
            }
        }
        if stress.is_empty() {
            bail!("no record with id '{}' in the selected corpora", cli.stress);
        }
    }

    let abandoned = executor.abandoned_workers();
    if abandoned > 0 {
        tracing::warn!(abandoned, "match workers were abandoned after timing out");
    }

    if let Some(path) = &cli.output {
        let format = cli
            .format
            .or_else(|| ReportOutputFormat::from_path(path))
            .unwrap_or(ReportOutputFormat::Json);
        let full = report::assemble(engine.name(), settings.budget_ms, profiles, stress);
        report::save_report(&full, path, format)?;
        println!("Report saved to: {}", path.display());
    }

    Ok(())
}
