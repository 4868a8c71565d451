use clap::{Parser, Subcommand};
use std::path::PathBuf;

use points_slip::config::{self, Config};
use points_slip::slip::{local_today, JsonFileStore, ScoreSheet};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_USAGE: i32 = 2;
const EXIT_CONFIG: i32 = 4;
const EXIT_STORAGE: i32 = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive slip (default if no subcommand)
    Tui,
    /// Print today's slip
    Show {
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Set a category's count
    Set {
        /// Category number (1-based, as shown by `show`)
        index: usize,
        /// New count; non-digits are ignored and the value is capped at 10000
        value: String,
    },
    /// Add to (or subtract from) a category's count
    Add {
        /// Category number (1-based, as shown by `show`)
        index: usize,
        /// Amount to add; negative values subtract
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Set every count back to 0
    Reset,
    /// Print the day's points
    Total,
    /// Write a config file with every default spelled out
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "points-slip")]
#[command(about = "Daily points slip: weighted counts per category", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/points-slip/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init { force } = command {
        let path = config_path.unwrap_or_else(config::get_config_path);
        if path.exists() && !force {
            eprintln!(
                "Config already exists at {}. Use --force to overwrite.",
                path.display()
            );
            std::process::exit(EXIT_CONFIG);
        }
        if let Err(e) = config::write_config(&path, &Config::with_defaults()) {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        println!("Wrote {}", path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let state_path = config::state_path(&config);
    if cli.verbose {
        eprintln!("Slip file: {}", state_path.display());
    }

    let sheet = ScoreSheet::load(
        config.effective_categories(),
        config.effective_bonus(),
        JsonFileStore::new(state_path),
        local_today,
    );

    if cli.verbose {
        eprintln!(
            "Loaded slip for {} ({} categories)",
            points_slip::slip::format_day(sheet.day()),
            sheet.len()
        );
        let bonus = sheet.bonus();
        if bonus.is_enabled() {
            eprintln!(
                "Bonus: {} points per {} on category {}",
                bonus.points,
                bonus.every,
                bonus.category + 1
            );
        } else {
            eprintln!("Bonus: off");
        }
    }

    let code = match command {
        Commands::Tui => {
            let colors = points_slip::tui::resolve_theme(config.effective_theme());
            let app = points_slip::tui::App::new(sheet, colors);
            match points_slip::tui::run_tui(app) {
                Ok(()) => EXIT_SUCCESS,
                Err(e) => {
                    eprintln!("TUI error: {:#}", e);
                    EXIT_FAILURE
                }
            }
        }
        Commands::Show { tsv } => {
            let rows = sheet.rows();
            let summary = sheet.summary();
            if tsv {
                println!("{}", points_slip::output::format_tsv(&rows, &summary));
            } else {
                let use_colors = points_slip::output::should_use_colors();
                println!(
                    "{}",
                    points_slip::output::format_slip_table(&rows, &summary, use_colors)
                );
            }
            EXIT_SUCCESS
        }
        Commands::Set { index, value } => {
            let mut sheet = sheet;
            match to_zero_based(index, sheet.len()) {
                Some(i) => report(sheet.set_count_text(i, &value), &sheet, i),
                None => usage_error(index, sheet.len()),
            }
        }
        Commands::Add { index, delta } => {
            let mut sheet = sheet;
            match to_zero_based(index, sheet.len()) {
                Some(i) => report(sheet.step(i, delta), &sheet, i),
                None => usage_error(index, sheet.len()),
            }
        }
        Commands::Reset => {
            let mut sheet = sheet;
            match sheet.reset() {
                Ok(()) => {
                    println!("Slip reset. Points: 0");
                    EXIT_SUCCESS
                }
                Err(e) => {
                    eprintln!("Storage error: {:#}", e);
                    EXIT_STORAGE
                }
            }
        }
        Commands::Total => {
            println!("{}", sheet.slip_total());
            EXIT_SUCCESS
        }
        Commands::Init { .. } => EXIT_SUCCESS,
    };

    std::process::exit(code);
}

/// Convert a 1-based category number to an index, if it is in range
fn to_zero_based(index: usize, len: usize) -> Option<usize> {
    if index >= 1 && index <= len {
        Some(index - 1)
    } else {
        None
    }
}

fn usage_error(index: usize, len: usize) -> i32 {
    eprintln!("Invalid index {}. Must be between 1 and {}.", index, len);
    EXIT_USAGE
}

fn report<S: points_slip::slip::SlipStore>(
    result: anyhow::Result<()>,
    sheet: &ScoreSheet<S>,
    index: usize,
) -> i32 {
    match result {
        Ok(()) => {
            let label = &sheet.categories()[index].label;
            println!(
                "{}: {} (Points: {})",
                label,
                sheet.count(index).unwrap_or_default(),
                points_slip::output::format_points(sheet.slip_total())
            );
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Storage error: {:#}", e);
            EXIT_STORAGE
        }
    }
}
