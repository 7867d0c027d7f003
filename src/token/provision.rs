//! Provisioning of the on-disk security token.
//!
//! The token itself is created by the platform's NSS tools, not by this
//! crate, so the step is behind a trait: production wires in
//! [`CertutilProvisioner`], tests substitute something that does not
//! shell out.  Provisioning failures are fatal for database creation.

use std::fs;
use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::encoder::random_bytes;
use crate::errors::{EncoderError, Result};

/// Creates the backing token store for a new database directory.
pub trait Provisioner: Send + Sync {
    /// Create the token in `directory`, protected by `password`.
    /// `seed` is extra entropy for key generation inside the token.
    fn provision(&self, directory: &Path, password: &str, seed: &[u8]) -> Result<()>;
}

/// Shells out to the NSS `certutil`/`modutil` tools.
pub struct CertutilProvisioner {
    certutil: String,
    modutil: String,
}

impl Default for CertutilProvisioner {
    fn default() -> Self {
        Self {
            certutil: "certutil".into(),
            modutil: "modutil".into(),
        }
    }
}

impl CertutilProvisioner {
    pub fn with_tools(certutil: impl Into<String>, modutil: impl Into<String>) -> Self {
        Self {
            certutil: certutil.into(),
            modutil: modutil.into(),
        }
    }

    fn run(&self, label: &str, cmd: &mut Command) -> Result<()> {
        debug!(command = ?cmd, "running {label}");
        let output = cmd
            .output()
            .map_err(|e| EncoderError::Provision(format!("{label} could not be started: {e}")))?;
        if !output.status.success() {
            return Err(EncoderError::Provision(format!(
                "{label} exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

impl Provisioner for CertutilProvisioner {
    fn provision(&self, directory: &Path, password: &str, seed: &[u8]) -> Result<()> {
        info!(directory = %directory.display(), "provisioning security token");

        // certutil reads the password and the entropy from files.
        let password_file = directory.join("pwdfile.txt");
        fs::write(&password_file, password)?;
        let noise_file = directory.join("noise.bin");
        let mut noise = seed.to_vec();
        noise.extend_from_slice(&random_bytes(32));
        fs::write(&noise_file, &noise)?;

        let result = self
            .run(
                "certutil -N",
                Command::new(&self.certutil)
                    .arg("-N")
                    .arg("-d")
                    .arg(directory)
                    .arg("-f")
                    .arg(&password_file),
            )
            .and_then(|()| {
                self.run(
                    "modutil -fips false",
                    Command::new(&self.modutil)
                        .arg("-fips")
                        .arg("false")
                        .arg("-dbdir")
                        .arg(directory)
                        .arg("-force"),
                )
            })
            .and_then(|()| {
                // A self-signed certificate forces the token to mint its
                // key material while the noise file is still fresh.
                self.run(
                    "certutil -S",
                    Command::new(&self.certutil)
                        .arg("-S")
                        .arg("-d")
                        .arg(directory)
                        .arg("-f")
                        .arg(&password_file)
                        .arg("-z")
                        .arg(&noise_file)
                        .arg("-s")
                        .arg("CN=token")
                        .arg("-n")
                        .arg("token")
                        .arg("-x")
                        .arg("-t")
                        .arg("CT,,")
                        .arg("-v")
                        .arg("120"),
                )
            });

        // Never leave the secrets behind, even on failure.
        let _ = fs::remove_file(&noise_file);
        let _ = fs::remove_file(&password_file);
        result?;

        info!(directory = %directory.display(), "token provisioned");
        Ok(())
    }
}
