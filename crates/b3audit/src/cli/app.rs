use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::commands::{names::NamesArgs, schema::SchemaArgs, types::TypesArgs};

#[derive(Debug, Parser)]
#[command(
    name = "b3audit",
    version,
    about = "Read-only audits over the B3 enriched instruments table"
)]
pub struct Cli {
    #[command(flatten)]
    pub runtime: RuntimeArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct RuntimeArgs {
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub home_dir: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub cwd: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Types(TypesArgs),
    Names(NamesArgs),
    Schema(SchemaArgs),
}
