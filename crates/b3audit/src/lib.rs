#![forbid(unsafe_code)]

pub mod audit;
pub mod cli;
pub mod config;
pub mod models;
pub mod names;
pub mod report;
pub mod rules;
pub mod sqlite;

pub use cli::app::{Cli, Command};
