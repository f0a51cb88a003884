#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use b3audit::cli::app::{Cli, Command, RuntimeArgs};
use b3audit::cli::commands;
use b3audit::config::RuntimePaths;
use clap::Parser;
use clap::error::ErrorKind;

const EXIT_SUCCESS: i32 = 0;
const EXIT_RUNTIME_FAILURE: i32 = 1;
const EXIT_AUDIT_FAILURE: i32 = 2;
const EXIT_USAGE_ERROR: i32 = 64;

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return exit_code_for_parse_error(error),
    };
    let command_name = command_name(&cli.command);
    println!("b3audit: starting `{command_name}`");

    match execute(cli) {
        Ok(()) => {
            println!("b3audit: completed `{command_name}` (exit_code={EXIT_SUCCESS})");
            EXIT_SUCCESS
        }
        Err(error) => {
            let exit_code = classify_runtime_error(&error);
            eprintln!("b3audit: failed `{command_name}` (exit_code={exit_code})");
            eprintln!("{error:#}");
            exit_code
        }
    }
}

fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Types(args) => {
            let runtime_paths = resolve_runtime_paths(&cli.runtime)?;
            commands::types::run(&args, &runtime_paths)
        }
        Command::Names(args) => {
            let runtime_paths = resolve_runtime_paths(&cli.runtime)?;
            commands::names::run(&args, &runtime_paths)
        }
        Command::Schema(args) => commands::schema::run(&args),
    }
}

fn classify_runtime_error(error: &anyhow::Error) -> i32 {
    if error
        .downcast_ref::<commands::types::StrictAuditFailure>()
        .is_some()
    {
        EXIT_AUDIT_FAILURE
    } else {
        EXIT_RUNTIME_FAILURE
    }
}

fn exit_code_for_parse_error(error: clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = error.print();
            EXIT_SUCCESS
        }
        _ => {
            let _ = error.print();
            EXIT_USAGE_ERROR
        }
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Types(_) => "types",
        Command::Names(_) => "names",
        Command::Schema(_) => "schema",
    }
}

fn resolve_runtime_paths(args: &RuntimeArgs) -> Result<RuntimePaths> {
    let db_path = match &args.db {
        Some(path) => path.clone(),
        None => std::env::var_os("B3AUDIT_DB")
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("database path is not set; pass --db or set B3AUDIT_DB"))?,
    };

    let home_dir = match &args.home_dir {
        Some(path) => path.clone(),
        None => std::env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("HOME is not set; pass --home-dir"))?,
    };

    let cwd = match &args.cwd {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };

    b3audit::config::resolve_runtime_paths(&db_path, &home_dir, &cwd, args.out_dir.as_deref())
}
