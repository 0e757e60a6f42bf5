use crate::error::CliError;
use crate::format::print_json;
use searchgate_config::load_config;
use std::path::Path;

/// Load and validate a config file, printing the normalized document.
pub fn run_config_check(config_path: &Path, pretty: bool) -> Result<(), CliError> {
    let config = load_config(config_path).map_err(CliError::from)?;
    print_json(config.as_ref(), pretty)
}
