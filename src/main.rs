use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use match_stats::api::{LocalStore, MatchStore, SupabaseClient};
use match_stats::config::Config;
use match_stats::display::output::{
    display_error, display_head_to_head, display_info, display_records, display_streaks,
    display_success, display_teammates, display_trend,
};
use match_stats::{PlayerReport, RelationshipStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Report {
    All,
    HeadToHead,
    Teammates,
    Trend,
    Streaks,
    Records,
}

#[derive(Parser, Debug)]
#[command(name = "match-stats")]
#[command(about = "Head-to-head, teammate, streak and record stats from match history", long_about = None)]
#[command(version)]
struct Args {
    /// Registered user id to report on
    user_id: String,

    /// Which report to show
    #[arg(short, long, value_enum, default_value = "all")]
    report: Report,

    /// Rows to show in the opponent and teammate tables
    #[arg(short, long, default_value = "10")]
    top_n: usize,

    /// Most recent matches to show in the trend table
    #[arg(long, default_value = "20")]
    trend_rows: usize,

    /// Read matches and profiles from a JSON export instead of Supabase
    #[arg(long)]
    from_file: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(args) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn open_store(args: &Args) -> Result<Box<dyn MatchStore>> {
    match &args.from_file {
        Some(path) => {
            let store = LocalStore::load(path)
                .with_context(|| format!("loading match export {}", path.display()))?;
            if !args.json {
                display_info(&format!("Reading matches from {}", store.path().display()));
            }
            Ok(Box::new(store))
        }
        None => {
            let config = Config::from_env().context("loading Supabase configuration")?;
            if !args.json {
                display_info(&format!("Reading matches from {}", config.supabase_url));
            }
            Ok(Box::new(SupabaseClient::new(config)))
        }
    }
}

fn build_report(stats: &RelationshipStats<Box<dyn MatchStore>>, args: &Args) -> PlayerReport {
    let user_id = args.user_id.as_str();
    let wants = |report: Report| args.report == Report::All || args.report == report;

    let spinner = ProgressBar::new_spinner();
    if !args.json {
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
    }

    let mut report = PlayerReport {
        user_id: user_id.to_string(),
        ..Default::default()
    };

    if wants(Report::HeadToHead) {
        spinner.set_message("Computing head-to-head records...");
        report.head_to_head = stats.head_to_head(user_id);
    }
    if wants(Report::Teammates) {
        spinner.set_message("Computing teammate synergy...");
        report.teammates = stats.teammate_stats(user_id);
    }
    if wants(Report::Trend) {
        spinner.set_message("Building performance trend...");
        report.trend = stats.performance_trend(user_id);
    }
    if wants(Report::Streaks) {
        spinner.set_message("Computing streaks...");
        report.streaks = stats.streak_info(user_id);
    }
    if wants(Report::Records) {
        spinner.set_message("Finding personal records...");
        report.records = stats.personal_records(user_id);
    }

    spinner.finish_and_clear();
    report
}

fn print_json(report: &PlayerReport, selected: Report) -> Result<()> {
    let json = match selected {
        Report::All => serde_json::to_string_pretty(report),
        Report::HeadToHead => serde_json::to_string_pretty(&report.head_to_head),
        Report::Teammates => serde_json::to_string_pretty(&report.teammates),
        Report::Trend => serde_json::to_string_pretty(&report.trend),
        Report::Streaks => serde_json::to_string_pretty(&report.streaks),
        Report::Records => serde_json::to_string_pretty(&report.records),
    }
    .context("serializing report")?;

    println!("{}", json);
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let store = open_store(&args)?;
    let stats = RelationshipStats::new(store);

    let report = build_report(&stats, &args);

    if args.json {
        return print_json(&report, args.report);
    }

    display_success(&format!("Stats ready for {}", args.user_id));

    let wants = |r: Report| args.report == Report::All || args.report == r;
    if wants(Report::HeadToHead) {
        display_head_to_head(&report.head_to_head, args.top_n);
    }
    if wants(Report::Teammates) {
        display_teammates(&report.teammates, args.top_n);
    }
    if wants(Report::Trend) {
        display_trend(&report.trend, args.trend_rows);
    }
    if wants(Report::Streaks) {
        display_streaks(&report.streaks);
    }
    if wants(Report::Records) {
        display_records(&report.records);
    }

    Ok(())
}
