use charm_address::config::{ENV_LOG_CONFIG, LOG_CONFIG_FILE};
use charm_address::{
    canonical_url_for, read_snapshot, AddressResolver, HookTools, UnitEnvironment,
};
use clap::Parser;
use colored::Colorize;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::path::Path;

mod cli;

use cli::{Cli, Command};

fn main() {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    if let Err(e) = init_logging() {
        eprintln!("{} failed to initialise logging: {e}", "warning:".yellow());
    }
    log::info!("#Start main()");

    match run(&cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            log::error!("{e}");
            eprintln!("{} {e}", "error:".red());
            std::process::exit(1);
        }
    }
}

/// log4rs from file when present, otherwise warnings to stderr.
fn init_logging() -> Result<(), Box<dyn Error>> {
    let path = std::env::var(ENV_LOG_CONFIG).unwrap_or_else(|_| LOG_CONFIG_FILE.to_string());
    if Path::new(&path).exists() {
        log4rs::init_file(&path, Default::default())?;
        return Ok(());
    }

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l})} {t} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(log::LevelFilter::Warn))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn run(cli: &Cli) -> Result<String, Box<dyn Error>> {
    match &cli.snapshot {
        Some(path) => {
            let snapshot = read_snapshot(path)?;
            run_command(&cli.command, &snapshot, &snapshot.complete_contexts)
        }
        None => {
            let tools = HookTools::from_env()?;
            run_command(&cli.command, &tools, &[])
        }
    }
}

fn run_command<E: UnitEnvironment>(
    command: &Command,
    env: &E,
    contexts: &[String],
) -> Result<String, Box<dyn Error>> {
    let resolver = AddressResolver::from_environment(env);
    let output = match command {
        Command::Address(args) => resolver.resolve_address(args.role)?,
        Command::Url(args) => {
            let mut complete = contexts.to_vec();
            complete.extend(args.context.iter().cloned());
            canonical_url_for(&resolver, &complete, args.role)?
        }
    };
    Ok(output)
}
