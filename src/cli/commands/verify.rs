//! `passcodec verify`: check a plaintext against a stored value.

use crate::cli::{
    build_manager, charset, output, read_encoded, resolve_passphrase, resolve_plain, Cli,
};
use crate::errors::{EncoderError, Result};

pub fn execute(
    cli: &Cli,
    encoded: &str,
    plain: Option<&str>,
    scheme: Option<&str>,
    is_base64: bool,
    passphrase: Option<&str>,
    prompt_passphrase: bool,
) -> Result<()> {
    let charset = charset(cli)?;
    let manager = build_manager(cli)?;
    let plain = resolve_plain(plain)?;
    let passphrase = resolve_passphrase(passphrase, prompt_passphrase)?;
    let raw = read_encoded(encoded, is_base64, charset)?;

    let scheme = match scheme {
        Some(id) => id.to_string(),
        None => {
            let detected = manager.detect(&raw, charset, None).ok_or_else(|| {
                EncoderError::Command("no scheme claims this value; pass --scheme".into())
            })?;
            output::info(&format!("Detected scheme: {}", detected.id()));
            detected.id().to_string()
        }
    };

    let matched = manager.matches(
        &raw,
        &plain,
        &scheme,
        passphrase.as_ref().map(|p| p.as_bytes()),
        charset,
    )?;

    if matched {
        output::success(&format!("Plaintext matches the stored {scheme} value."));
        Ok(())
    } else {
        Err(EncoderError::Command(format!(
            "plaintext does not match the stored {scheme} value"
        )))
    }
}
