pub mod roofs;
pub mod search;
pub mod toggle;

use anyhow::Result;
use roofmap::Config;

use crate::cli::Cli;

pub fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::from_path(path),
        None => Ok(Config::default()),
    }
}
