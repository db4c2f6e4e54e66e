use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use bastion_config::EngineSettings;
use bastion_engine::{PolicyEngine, load_workflow};
use bastion_scanner::ScanResult;
use bastion_workflow::Workflow;

/// Bastion - compliance guardrails and role contracts for workflow graphs
#[derive(Parser)]
#[command(name = "bastion")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the settings file (default: ~/.bastion/config.json, if present)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Pretty-print JSON output
  #[arg(long, global = true)]
  pretty: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Detect standards, inject guardrails, validate roles and score risk
  Analyze {
    /// Path to the workflow file (JSON), or `-` for stdin
    workflow_file: PathBuf,
  },

  /// Scan a workflow for performance, cost, reliability, security and scalability issues
  Scan {
    /// Path to the workflow file (JSON), or `-` for stdin
    workflow_file: PathBuf,

    /// Earlier scan result to compare against
    #[arg(long)]
    previous: Option<PathBuf>,
  },

  /// Resolve roles and report privilege violations, without injecting guardrails
  Roles {
    /// Path to the workflow file (JSON), or `-` for stdin
    workflow_file: PathBuf,
  },

  /// List the built-in guardrail rules
  Registry,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = load_settings(cli.config.as_deref())?;
  let engine = PolicyEngine::new(settings);

  match cli.command {
    Some(Commands::Analyze { workflow_file }) => {
      let workflow = read_workflow(&workflow_file)?;
      let report = engine.analyze(&workflow).context("analysis failed")?;
      print_json(&report, cli.pretty)?;
    }
    Some(Commands::Scan {
      workflow_file,
      previous,
    }) => {
      let workflow = read_workflow(&workflow_file)?;
      let result = engine.scan(&workflow);
      match previous {
        Some(path) => {
          let previous = read_scan_result(&path)?;
          let trend = result.compare(&previous);
          print_json(
            &serde_json::json!({ "result": result, "trend": trend }),
            cli.pretty,
          )?;
        }
        None => print_json(&result, cli.pretty)?,
      }
    }
    Some(Commands::Roles { workflow_file }) => {
      let workflow = read_workflow(&workflow_file)?;
      let roles = engine
        .roles(&workflow)
        .context("role validation failed")?;
      print_json(&roles.contract_block(), cli.pretty)?;
    }
    Some(Commands::Registry) => {
      print_json(engine.registry().rules(), cli.pretty)?;
    }
    None => {
      println!("bastion - use --help to see available commands");
    }
  }

  Ok(())
}

/// Explicit settings file, else the default location if it exists, else defaults.
fn load_settings(explicit: Option<&Path>) -> Result<EngineSettings> {
  if let Some(path) = explicit {
    return EngineSettings::load(path)
      .with_context(|| format!("failed to load settings: {}", path.display()));
  }

  let default_path = dirs::home_dir().map(|home| home.join(".bastion").join("config.json"));
  match default_path {
    Some(path) if path.is_file() => {
      debug!(path = %path.display(), "loading default settings");
      EngineSettings::load(&path)
        .with_context(|| format!("failed to load settings: {}", path.display()))
    }
    _ => Ok(EngineSettings::default()),
  }
}

fn read_workflow(path: &Path) -> Result<Workflow> {
  let content = read_input(path)?;
  load_workflow(&content)
    .with_context(|| format!("failed to load workflow: {}", path.display()))
}

fn read_scan_result(path: &Path) -> Result<ScanResult> {
  let content = read_input(path)?;
  serde_json::from_str(&content)
    .with_context(|| format!("failed to parse scan result: {}", path.display()))
}

fn read_input(path: &Path) -> Result<String> {
  if path == Path::new("-") {
    let mut input = String::new();
    io::stdin()
      .read_to_string(&mut input)
      .context("failed to read stdin")?;
    return Ok(input);
  }

  std::fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
  let output = if pretty {
    serde_json::to_string_pretty(value)?
  } else {
    serde_json::to_string(value)?
  };
  println!("{output}");
  Ok(())
}
