use crate::error::CliError;
use clap::Args;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, Args)]
pub struct OutputArgs {
    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,
}

pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let encoded = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    let mut stdout = std::io::stdout();
    stdout.write_all(encoded.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}
