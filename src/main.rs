//! Gridcalc - command-mode host for the spreadsheet recalculation core

mod command;
mod config;
mod error;

use anyhow::Context;
use gridcalc_core::Sheet;
use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use config::Config;

fn print_usage() {
    eprintln!("Usage: gridcalc [OPTIONS] [SCRIPT]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [SCRIPT]                  File of commands to run (default: stdin)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <CMD>       Run a command (can be repeated; SCRIPT is ignored)");
    eprintln!("  --config <FILE>           Load settings from FILE instead of the user config");
    eprintln!("  --no-config               Ignore the user config file");
    eprintln!("  -h, --help                Print help");
    eprintln!();
    eprintln!("Commands: set <CELL> <TEXT>, clear <CELL>, get <CELL>, text <CELL>,");
    eprintln!("          refs <CELL>, size, values, texts");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut script_path: Option<PathBuf> = None;
    let mut commands: Vec<String> = Vec::new();
    let mut config_path: Option<PathBuf> = None;
    let mut no_config = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-c" | "--command" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --command requires a value");
                    std::process::exit(1);
                }
                commands.push(args[i].to_string());
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
                config_path = Some(PathBuf::from(&args[i]));
            }
            "--no-config" => no_config = true,
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if script_path.is_none() {
                    script_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    let config = if no_config && config_path.is_none() {
        Config::default()
    } else {
        match config::load_config(config_path.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    };
    init_logging(&config.log_level);

    if let Err(e) = run(&commands, script_path, &config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level);
    // A logger may already be installed when embedded; keep the existing one.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

fn run(commands: &[String], script_path: Option<PathBuf>, config: &Config) -> anyhow::Result<()> {
    let mut sheet = Sheet::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if !commands.is_empty() {
        for (n, line) in commands.iter().enumerate() {
            command::run_line(&mut sheet, line, &mut out, config)
                .with_context(|| format!("command {} ({})", n + 1, line))?;
        }
    } else {
        let reader: Box<dyn BufRead> = match &script_path {
            Some(path) => Box::new(BufReader::new(
                File::open(path).with_context(|| format!("opening {}", path.display()))?,
            )),
            None => Box::new(io::stdin().lock()),
        };
        for (n, line) in reader.lines().enumerate() {
            let line = line.context("reading commands")?;
            command::run_line(&mut sheet, &line, &mut out, config)
                .with_context(|| format!("line {}", n + 1))?;
        }
    }

    out.flush()?;
    log::debug!(
        "finished with {} cells, printable size {:?}",
        sheet.len(),
        sheet.printable_size()
    );
    Ok(())
}
