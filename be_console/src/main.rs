//! A line-oriented console for running bracket tournaments.
//!
//! Commands are read from stdin, or from a script file, and executed
//! against an in-memory tournament manager.

use anyhow::{Context, Result};
use be_console::{
    config::ConsoleConfig,
    session::{COMMANDS_HELP, Console, Reply},
};
use log::info;
use pico_args::Arguments;
use std::{
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
};

const HELP: &str = "\
Run single-elimination tournaments from the terminal

USAGE:
  be_console [OPTIONS]

OPTIONS:
  --script     FILE        Execute commands from FILE instead of stdin

FLAGS:
  -h, --help               Print help information
  --echo                   Print each script command before its reply

ENVIRONMENT:
  CONSOLE_GROUP_ID         Group the console acts in  [default: console]
  CONSOLE_ORGANIZER_ID     Organizer of created tournaments  [default: organizer]
  CONSOLE_SNAPSHOTS        Keep JSON snapshots after each change  [default: false]
  TOURNEY_MAX_TEAMS_CAP    Upper bound for tournament capacity  [default: 64]
  TOURNEY_MIN_PARTICIPANTS Participants needed to start  [default: 2]
  RUST_LOG                 Log filter  [default: info]
";

struct Args {
    script: Option<PathBuf>,
    echo: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        script: pargs.opt_value_from_str("--script")?,
        echo: pargs.contains("--echo"),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let config = ConsoleConfig::from_env().context("Invalid configuration")?;
    info!(
        "Starting console for group {} (max {} teams per tournament)",
        config.group_id, config.engine.max_teams_cap
    );

    let mut console = Console::new(config);

    match args.script {
        Some(path) => {
            let script = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read script {}", path.display()))?;
            run_script(&mut console, &script, args.echo).await
        }
        None => run_interactive(&mut console).await,
    }
}

async fn run_script(console: &mut Console, script: &str, echo: bool) -> Result<()> {
    for line in script.lines() {
        if echo && !line.trim().is_empty() {
            println!("> {line}");
        }
        match console.handle_line(line).await {
            Some(Reply::Text(text)) => println!("{text}"),
            Some(Reply::Quit) => break,
            None => {}
        }
    }
    Ok(())
}

async fn run_interactive(console: &mut Console) -> Result<()> {
    println!("Bracket console. Type 'help' for commands.");
    let stdin = io::stdin();
    let mut input = String::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        match console.handle_line(&input).await {
            Some(Reply::Text(text)) => println!("{text}"),
            Some(Reply::Quit) => break,
            None => {}
        }
    }

    info!(
        "Console closed with {} tournaments",
        console.manager().tournament_count().await
    );
    Ok(())
}
