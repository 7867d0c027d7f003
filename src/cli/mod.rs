//! CLI module: clap argument parser, output helpers, and command
//! implementations.

pub mod commands;
pub mod output;

use std::path::Path;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use clap::Parser;
use zeroize::Zeroizing;

use crate::charset::Charset;
use crate::errors::{EncoderError, Result};
use crate::manager::EncoderManager;
use crate::token::TokenDatabase;

/// Password codec toolbox: encode, verify and inspect stored credentials.
#[derive(Parser)]
#[command(
    name = "passcodec",
    about = "Encode, decode and verify legacy password formats",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Charset for plaintext and textual encodings (utf-8, ascii, latin1)
    #[arg(long, default_value = "utf-8", global = true)]
    pub charset: String,

    /// Directory of a provisioned token database; enables the token schemes
    #[arg(long, global = true)]
    pub token_db: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// List registered encoding schemes in detection order
    List,

    /// Encode a plaintext with a scheme
    Encode {
        /// The plaintext (omit for interactive prompt)
        plain: Option<String>,

        /// Scheme ID (default: plain)
        #[arg(short, long)]
        scheme: Option<String>,

        /// Salt text; most salted schemes generate one when omitted
        #[arg(long)]
        salt: Option<String>,

        /// Passphrase for cipher schemes
        #[arg(short, long)]
        passphrase: Option<String>,

        /// Prompt for the passphrase instead of passing it on the command line
        #[arg(long)]
        prompt_passphrase: bool,

        /// Print the result as base64 even when it is printable text
        #[arg(long)]
        base64: bool,
    },

    /// Decode an encoded value back to plaintext (reversible schemes only)
    Decode {
        /// The encoded value
        encoded: String,

        /// Scheme ID
        #[arg(short, long)]
        scheme: String,

        /// Treat the encoded value as base64 of the raw stored bytes
        #[arg(long)]
        base64: bool,

        /// Passphrase for cipher schemes
        #[arg(short, long)]
        passphrase: Option<String>,

        /// Prompt for the passphrase instead of passing it on the command line
        #[arg(long)]
        prompt_passphrase: bool,
    },

    /// Check a plaintext against an encoded value
    Verify {
        /// The encoded value
        encoded: String,

        /// The plaintext (omit for interactive prompt)
        plain: Option<String>,

        /// Scheme ID (detected from the encoded value when omitted)
        #[arg(short, long)]
        scheme: Option<String>,

        /// Treat the encoded value as base64 of the raw stored bytes
        #[arg(long)]
        base64: bool,

        /// Passphrase for cipher schemes
        #[arg(short, long)]
        passphrase: Option<String>,

        /// Prompt for the passphrase instead of passing it on the command line
        #[arg(long)]
        prompt_passphrase: bool,
    },

    /// Guess which scheme produced an encoded value
    Detect {
        /// The encoded value
        encoded: String,

        /// Treat the encoded value as base64 of the raw stored bytes
        #[arg(long)]
        base64: bool,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Parse the global `--charset` argument.
pub fn charset(cli: &Cli) -> Result<Charset> {
    Charset::parse(&cli.charset)
}

/// Build the encoder registry, wiring in the token database when the
/// caller pointed us at one.
pub fn build_manager(cli: &Cli) -> Result<EncoderManager> {
    let mut manager = EncoderManager::with_default_encoders();
    if let Some(dir) = &cli.token_db {
        let db = Arc::new(TokenDatabase::open(Path::new(dir))?);
        manager.register_token_encoders(db)?;
    }
    Ok(manager)
}

/// Resolve the passphrase, trying in order:
/// 1. `--passphrase` on the command line
/// 2. `PASSCODEC_PASSPHRASE` env var (CI friendly)
/// 3. Interactive prompt, when `--prompt-passphrase` was given
///
/// Returns `Zeroizing<String>` so the passphrase is wiped on drop.
pub fn resolve_passphrase(
    passphrase: Option<&str>,
    prompt: bool,
) -> Result<Option<Zeroizing<String>>> {
    if let Some(p) = passphrase {
        return Ok(Some(Zeroizing::new(p.to_string())));
    }
    if let Ok(pw) = std::env::var("PASSCODEC_PASSPHRASE") {
        if !pw.is_empty() {
            return Ok(Some(Zeroizing::new(pw)));
        }
    }
    if prompt {
        let pw = dialoguer::Password::new()
            .with_prompt("Enter passphrase")
            .interact()
            .map_err(|e| EncoderError::Command(format!("passphrase prompt: {e}")))?;
        return Ok(Some(Zeroizing::new(pw)));
    }
    Ok(None)
}

/// Prompt for the plaintext when it was not given on the command line.
pub fn resolve_plain(plain: Option<&str>) -> Result<Zeroizing<String>> {
    match plain {
        Some(p) => Ok(Zeroizing::new(p.to_string())),
        None => {
            let pw = dialoguer::Password::new()
                .with_prompt("Enter plaintext")
                .interact()
                .map_err(|e| EncoderError::Command(format!("plaintext prompt: {e}")))?;
            Ok(Zeroizing::new(pw))
        }
    }
}

/// Turn a command-line encoded value into the raw stored bytes.
pub fn read_encoded(value: &str, is_base64: bool, charset: Charset) -> Result<Vec<u8>> {
    if is_base64 {
        BASE64
            .decode(value.trim())
            .map_err(|e| EncoderError::Command(format!("invalid base64 input: {e}")))
    } else {
        charset.encode(value)
    }
}

/// Render encoder output for the terminal: the charset text when it is
/// printable, base64 otherwise (or when forced).
pub fn render_encoded(bytes: &[u8], force_base64: bool, charset: Charset) -> String {
    if !force_base64 {
        if let Ok(text) = charset.decode(bytes) {
            if !text.chars().any(char::is_control) {
                return text;
            }
        }
    }
    BASE64.encode(bytes)
}
