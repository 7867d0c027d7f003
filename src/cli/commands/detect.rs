//! `passcodec detect`: guess the scheme behind a stored value.

use crate::cli::{build_manager, charset, output, read_encoded, Cli};
use crate::errors::Result;

pub fn execute(cli: &Cli, encoded: &str, is_base64: bool) -> Result<()> {
    let charset = charset(cli)?;
    let manager = build_manager(cli)?;
    let raw = read_encoded(encoded, is_base64, charset)?;

    match manager.detect(&raw, charset, None) {
        Some(encoder) => {
            output::success(&format!("Looks like: {}", encoder.id()));
            if encoder.id() == "plain" {
                output::tip("Nothing else claimed it; 'plain' claims everything.");
            }
        }
        None => output::warning("No registered scheme claims this value."),
    }
    Ok(())
}
