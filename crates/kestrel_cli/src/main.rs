//! Kestrel CLI
//!
//! Load select widgets from TOML definitions and replay input against them.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kestrel_cn::WidgetDefinition;

mod script;

use script::{parse_script, Session, Step};

#[derive(Parser)]
#[command(name = "kestrel")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Kestrel select widget inspector", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay scripted input and print the widget after every step
    Replay {
        /// Widget definition (TOML)
        definition: PathBuf,

        /// Script file, one step per line
        script: Option<PathBuf>,

        /// Inline step, may be repeated (runs after the script file)
        #[arg(short, long = "step")]
        steps: Vec<String>,

        /// Print one JSON object per step
        #[arg(long)]
        json: bool,
    },

    /// Validate a widget definition
    Check {
        /// Widget definition (TOML)
        definition: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Replay {
            definition,
            script,
            steps,
            json,
        } => cmd_replay(&definition, script.as_deref(), &steps, json),

        Commands::Check { definition } => cmd_check(&definition),
    }
}

fn load_definition(path: &Path) -> Result<WidgetDefinition> {
    WidgetDefinition::load(path)
        .with_context(|| format!("Failed to load widget definition {}", path.display()))
}

fn cmd_replay(definition: &Path, script: Option<&Path>, inline: &[String], json: bool) -> Result<()> {
    let widget = load_definition(definition)?;

    let mut steps = match script {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("Failed to read script {}", path.display()))?;
            parse_script(&source).with_context(|| format!("Invalid script {}", path.display()))?
        }
        None => Vec::new(),
    };
    for step in inline {
        steps.push(Step::parse(step).with_context(|| format!("Invalid step '{}'", step))?);
    }

    info!(
        "Replaying {} steps against {} options",
        steps.len(),
        widget.options.len()
    );

    let mut session = Session::new(&widget);
    if !json {
        println!("{}", session.controller().trigger_text());
        println!();
    }

    for step in &steps {
        let outcome = session.apply(step);
        let snapshot = session.snapshot(step, outcome);
        if json {
            println!("{}", serde_json::to_string(&snapshot)?);
        } else {
            println!("{}", snapshot);
        }
    }

    Ok(())
}

fn cmd_check(definition: &Path) -> Result<()> {
    let widget = load_definition(definition)?;
    let session = Session::new(&widget);
    let controller = session.controller();

    let disabled = widget.options.iter().filter(|o| o.disabled).count();
    info!("Definition {} is valid", definition.display());

    println!("Kestrel widget");
    println!("==============");
    println!();
    println!(
        "Kind:        {}{}",
        controller.mode(),
        if widget.select.searchable { " (searchable)" } else { "" }
    );
    println!("Options:     {} ({} disabled)", widget.options.len(), disabled);
    println!("Trigger:     {}", controller.trigger_text());
    println!("Status:      {}", controller.status_text());
    println!(
        "Closes:      {}",
        if widget.select.closes_on_select() {
            "on select"
        } else {
            "explicitly"
        }
    );

    Ok(())
}
