//! `passcodec encode`: produce a stored credential form.

use crate::cli::{
    build_manager, charset, render_encoded, resolve_passphrase, resolve_plain, Cli,
};
use crate::errors::Result;

pub fn execute(
    cli: &Cli,
    plain: Option<&str>,
    scheme: Option<&str>,
    salt: Option<&str>,
    passphrase: Option<&str>,
    prompt_passphrase: bool,
    base64: bool,
) -> Result<()> {
    let charset = charset(cli)?;
    let manager = build_manager(cli)?;
    let plain = resolve_plain(plain)?;
    let passphrase = resolve_passphrase(passphrase, prompt_passphrase)?;
    let salt_bytes = salt.map(|s| charset.encode(s)).transpose()?;

    let encoded = manager.encode(
        &plain,
        scheme,
        salt_bytes.as_deref(),
        passphrase.as_ref().map(|p| p.as_bytes()),
        charset,
    )?;

    println!("{}", render_encoded(&encoded, base64, charset));
    Ok(())
}
