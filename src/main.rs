use camp_roster::config::{AppConfig, SelectionConfig};
use camp_roster::error::AppError;
use camp_roster::telemetry;
use camp_roster::workflows::intake::RosterImporter;
use camp_roster::workflows::roster::{
    select, RosterReport, RosterSnapshot, RosterSummary, SelectionDriver,
};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::info;

const EXPORT_HELP: &str = "The pre-registration form must be exported as CSV (File > Download > \
Comma-separated values). Spreadsheet .xlsx exports are not read.";

#[derive(Parser, Debug)]
#[command(
    name = "camp-roster",
    about = "Draw the winter camp roster from the pre-registration export",
    after_help = EXPORT_HELP,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw the roster and optionally save it back to the selection config (default command)
    Draw(DrawArgs),
    /// Validate the roster export against the selection config without drawing
    Check(SourceArgs),
}

#[derive(Args, Debug, Default, Clone)]
struct SourceArgs {
    /// Selection config document (overrides CAMP_ROSTER_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Pre-registration export saved as CSV (not .xlsx); discovered in --dir when omitted
    #[arg(long)]
    roster: Option<PathBuf>,
    /// Directory searched for the export (overrides CAMP_ROSTER_DIR)
    #[arg(long)]
    dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
struct DrawArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Seed for a reproducible draw (overrides CAMP_ROSTER_SEED)
    #[arg(long)]
    seed: Option<u64>,
    /// Save the registered list without asking
    #[arg(long, conflicts_with = "dry_run")]
    yes: bool,
    /// Never save the registered list
    #[arg(long)]
    dry_run: bool,
    /// Print the roster snapshot and summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct DrawResponse {
    snapshot: RosterSnapshot,
    summary: RosterSummary,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Draw(DrawArgs::default()));

    match command {
        Command::Draw(args) => run_draw(args),
        Command::Check(args) => run_check(args),
    }
}

/// Loads app settings, applies command line overrides and starts logging.
fn prepare(source: &SourceArgs) -> Result<(AppConfig, PathBuf), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(path) = source.config.clone() {
        config.selection_path = path;
    }
    if let Some(dir) = source.dir.clone() {
        config.roster_dir = dir;
    }

    telemetry::init(&config.telemetry)?;

    let roster_path = match source.roster.clone() {
        Some(path) => path,
        None => RosterImporter::discover(&config.roster_dir)?,
    };

    Ok((config, roster_path))
}

fn run_draw(args: DrawArgs) -> Result<(), AppError> {
    let (mut config, roster_path) = prepare(&args.source)?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let candidates = RosterImporter::from_path(&roster_path)?;
    let selection = SelectionConfig::load(&config.selection_path)?;
    info!(
        roster = %roster_path.display(),
        candidates = candidates.len(),
        places = selection.places,
        seed = ?config.seed,
        "loaded pre-registrations"
    );

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let outcome = select(&selection, candidates, &mut rng)?;

    let report = RosterReport::new(&outcome);
    let snapshot = report.snapshot();
    let summary = report.summary();
    if args.json {
        let body = serde_json::to_string_pretty(&DrawResponse { snapshot, summary })?;
        println!("{body}");
    } else {
        render_roster(&snapshot, &summary);
    }

    let save = if args.dry_run {
        false
    } else if args.yes {
        true
    } else {
        confirm_save(&config.selection_path)?
    };

    if save {
        selection
            .with_registered(outcome.ledger.registered_ids())
            .save(&config.selection_path)?;
        info!(
            path = %config.selection_path.display(),
            registered = outcome.ledger.registered_count(),
            "saved registered list"
        );
    }

    Ok(())
}

fn run_check(args: SourceArgs) -> Result<(), AppError> {
    let (config, roster_path) = prepare(&args)?;

    let candidates = RosterImporter::from_path(&roster_path)?;
    let selection = SelectionConfig::load(&config.selection_path)?;
    let driver = SelectionDriver::new(&selection, candidates)?;

    println!("Roster: {}", roster_path.display());
    println!("Selection config: {}", config.selection_path.display());
    println!("Candidates: {}", driver.ledger().len());
    println!("Places: {}", selection.places);
    println!("Organizers: {}", selection.organizers.len());
    println!("Conflict groups: {}", selection.conflicts.len());
    println!("Forced groups: {}", selection.groups.len());
    println!("Previously registered: {}", selection.carry_over().len());

    Ok(())
}

fn confirm_save(path: &Path) -> Result<bool, AppError> {
    let mut stderr = std::io::stderr();
    write!(
        stderr,
        "\nSave the registered list to {}? [y/N] ",
        path.display()
    )?;
    stderr.flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(parse_confirmation(&answer))
}

fn parse_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn render_roster(snapshot: &RosterSnapshot, summary: &RosterSummary) {
    println!("Registered: ({})", snapshot.registered.len());
    for candidate in &snapshot.registered {
        println!(" - {}", candidate.full_name);
    }

    println!(
        "\nRemaining people: ({})",
        snapshot.pool.len() + snapshot.rejected.len()
    );
    for candidate in &snapshot.pool {
        println!(" - {}", candidate.full_name);
    }
    for candidate in &snapshot.rejected {
        println!(" - (Rejected) {}", candidate.full_name);
    }

    println!("\nGender ratio");
    println!(" - Males: {:.1} %", summary.gender_ratio.male);
    println!(" - Females: {:.1} %", summary.gender_ratio.female);
    println!(" - Non-binary: {:.1} %", summary.gender_ratio.non_binary);

    println!("\nDoctoral school ratio");
    for share in &summary.school_ratio {
        println!(" - {}: {:.1} %", share.school, share.percent);
    }

    println!("\nSeats: {}", summary.seats);
    println!("Remaining seats: {}", summary.remaining_seats);

    println!("\nEmails");
    println!("{}", summary.emails.join("; "));
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn draw_accepts_seed_and_sources() {
        let cli = Cli::try_parse_from([
            "camp-roster",
            "draw",
            "--seed",
            "7",
            "--roster",
            "export.csv",
            "--config",
            "camp.yaml",
            "--dry-run",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Draw(args)) => {
                assert_eq!(args.seed, Some(7));
                assert_eq!(args.source.roster, Some(PathBuf::from("export.csv")));
                assert_eq!(args.source.config, Some(PathBuf::from("camp.yaml")));
                assert!(args.dry_run);
                assert!(!args.yes);
            }
            other => panic!("expected draw command, got {other:?}"),
        }
    }

    #[test]
    fn help_tells_users_to_export_csv() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("exported as CSV"));
        assert!(help.contains(".xlsx"));
    }

    #[test]
    fn yes_and_dry_run_are_exclusive() {
        assert!(Cli::try_parse_from(["camp-roster", "draw", "--yes", "--dry-run"]).is_err());
    }

    #[test]
    fn confirmation_accepts_only_explicit_yes() {
        assert!(parse_confirmation("y\n"));
        assert!(parse_confirmation(" YES "));
        assert!(!parse_confirmation("\n"));
        assert!(!parse_confirmation("no"));
    }
}
