//! `passcodec decode`: recover the plaintext from a reversible scheme.

use crate::cli::{build_manager, charset, read_encoded, resolve_passphrase, Cli};
use crate::errors::Result;

pub fn execute(
    cli: &Cli,
    encoded: &str,
    scheme: &str,
    is_base64: bool,
    passphrase: Option<&str>,
    prompt_passphrase: bool,
) -> Result<()> {
    let charset = charset(cli)?;
    let manager = build_manager(cli)?;
    let passphrase = resolve_passphrase(passphrase, prompt_passphrase)?;
    let raw = read_encoded(encoded, is_base64, charset)?;

    let plain = manager.decode(
        &raw,
        Some(scheme),
        passphrase.as_ref().map(|p| p.as_bytes()),
        charset,
    )?;

    println!("{plain}");
    Ok(())
}
