use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use pertplan::config::Config;
use pertplan::intake::Conversation;
use pertplan::{Error, Estimator, ProjectEstimate, ProjectId, Result};

/// pertplan - PERT project estimates from decomposed task lists
#[derive(Parser, Debug)]
#[command(name = "pertplan")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    PERTPLAN_DEBUG=1     Enable debug logging (alternative to --debug)")]
pub struct Cli {
    /// Enable debug logging (writes to ~/.pertplan/pertplan.log)
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// Config file to use instead of ~/.pertplan/pertplan.toml
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Estimate a task decomposition produced by the upstream model
    Estimate {
        /// File with the model's response, or "-" for stdin
        input: String,

        /// Project the estimate belongs to (a new one if not given)
        #[arg(long)]
        project_id: Option<String>,

        /// Project start as RFC 3339 (defaults to now)
        #[arg(long)]
        start: Option<String>,

        /// Print the full estimate as JSON
        #[arg(long)]
        json: bool,
    },

    /// Answer the intake questions and print the decomposition prompt
    Intake,

    /// Show the effective hourly rate table
    Rates,

    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ConfigAction {
    /// Write the default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    pertplan::log::init_with_debug(cli.debug);

    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::config_path()?,
    };

    match cli.command {
        Command::Estimate {
            input,
            project_id,
            start,
            json,
        } => run_estimate(&config_path, &input, project_id, start, json),
        Command::Intake => run_intake(),
        Command::Rates => run_rates(&config_path),
        Command::Config {
            action: ConfigAction::Init { force },
        } => run_config_init(&config_path, force),
    }
}

fn run_estimate(
    config_path: &Path,
    input: &str,
    project_id: Option<String>,
    start: Option<String>,
    json: bool,
) -> Result<()> {
    let config = Config::load_from(config_path)?;
    let project_id = match project_id {
        Some(id) => id
            .parse::<ProjectId>()
            .map_err(|e| Error::Validation(format!("invalid project id '{}': {}", id, e)))?,
        None => ProjectId::new(),
    };
    let started_at = match start {
        Some(start) => DateTime::parse_from_rfc3339(&start)
            .map_err(|e| Error::Validation(format!("invalid start '{}': {}", start, e)))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let response = read_input(input)?;
    let tasks = pertplan::intake::decomposition::parse_tasks(&response)?;
    let estimate = Estimator::new(config.rates).estimate_at(project_id, tasks, started_at)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
    } else {
        print_estimate(&estimate);
    }
    Ok(())
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(std::fs::read_to_string(input)?)
    }
}

fn print_estimate(estimate: &ProjectEstimate) {
    println!("Project:       {}", estimate.project_id.short());
    println!("Tasks:         {}", estimate.tasks.len());
    println!("Total cost:    {:.2}", estimate.total_cost);
    println!("Duration:      {:.1} days", estimate.total_duration_days);
    println!("Start:         {}", estimate.start_date.format("%Y-%m-%d"));
    println!("End:           {}", estimate.end_date.format("%Y-%m-%d"));
    if estimate.critical_path.is_empty() {
        println!("Critical path: (none, durations serialized)");
    } else {
        println!("Critical path: {}", estimate.critical_path.join(" -> "));
    }
    println!();

    for task in &estimate.tasks {
        let marker = if estimate.critical_path.contains(&task.id) {
            "*"
        } else {
            " "
        };
        println!(
            "{} {:<8} {:>7.1}d {:>12.2}  {}",
            marker, task.id, task.expected_days, task.cost, task.title
        );
    }
}

fn run_intake() -> Result<()> {
    let mut conversation = Conversation::start();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("{}\n", conversation.messages[0].content);
    while !conversation.is_ready() {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            println!();
            println!("Intake ended before all questions were answered.");
            return Ok(());
        };
        let reply = conversation.respond(line?.trim());
        println!("\n{}\n", reply.response);
    }

    let prompt = conversation.brief().decomposition_prompt();
    println!("{}", serde_json::to_string_pretty(&prompt)?);
    Ok(())
}

fn run_rates(config_path: &Path) -> Result<()> {
    let config = Config::load_from(config_path)?;
    for (role, rate) in &config.rates.roles {
        println!("{:<20} {:>10.2}", role, rate);
    }
    println!("{:<20} {:>10.2}", "(default)", config.rates.default_rate);
    Ok(())
}

fn run_config_init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        return Err(Error::Validation(format!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        )));
    }
    Config::default().save_to(config_path)?;
    println!("Wrote {}", config_path.display());
    Ok(())
}
