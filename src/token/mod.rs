//! Token-backed reversible encryption.
//!
//! A token database is a directory holding an NSS security token plus a
//! keystore with the RSA keypair used for password encryption.  The
//! directory is created and provisioned exactly once; afterwards it is
//! opened read-only.  The database password lives in a tightly-permissioned
//! file inside the directory, so possession of the directory is the
//! credential.

pub mod keystore;
pub mod provision;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand_core::OsRng;
use rsa::pkcs8::{DecodePrivateKey, EncodePrivateKey};
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use tracing::info;
use zeroize::Zeroizing;

use crate::encoder::random_bytes;
use crate::errors::{EncoderError, Result};
use provision::{CertutilProvisioner, Provisioner};

const KEYSTORE_FILE: &str = "token.keystore";
const PIN_FILE: &str = "token.pin";
const DEFAULT_KEY_BITS: usize = 2048;

/// Construction options for a new token database.
pub struct TokenDatabaseOptions {
    directory: PathBuf,
    password: Option<String>,
    seed: Vec<u8>,
    key_bits: usize,
    provisioner: Box<dyn Provisioner>,
}

impl TokenDatabaseOptions {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            password: None,
            seed: Vec::new(),
            key_bits: DEFAULT_KEY_BITS,
            provisioner: Box::new(CertutilProvisioner::default()),
        }
    }

    /// Fix the database password instead of generating one.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Extra entropy mixed into token provisioning.
    pub fn seed(mut self, seed: impl Into<Vec<u8>>) -> Self {
        self.seed = seed.into();
        self
    }

    pub fn key_bits(mut self, key_bits: usize) -> Self {
        self.key_bits = key_bits;
        self
    }

    pub fn provisioner(mut self, provisioner: Box<dyn Provisioner>) -> Self {
        self.provisioner = provisioner;
        self
    }
}

/// An opened token database, ready to encrypt and decrypt.
pub struct TokenDatabase {
    directory: PathBuf,
    private_key: RsaPrivateKey,
    public_key: RsaPublicKey,
}

// Key material stays out of debug output.
impl fmt::Debug for TokenDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenDatabase")
            .field("directory", &self.directory)
            .finish_non_exhaustive()
    }
}

impl TokenDatabase {
    /// Open the database if it exists, provision a fresh one otherwise.
    pub fn open_or_create(options: TokenDatabaseOptions) -> Result<Self> {
        if options.directory.join(KEYSTORE_FILE).exists() {
            Self::open(&options.directory)
        } else {
            Self::create(options)
        }
    }

    /// Provision a new database. Fails if one already exists in the
    /// directory, or if traces of an earlier creation are present;
    /// provisioning errors are fatal and roll the directory back.
    pub fn create(options: TokenDatabaseOptions) -> Result<Self> {
        let TokenDatabaseOptions {
            directory,
            password,
            seed,
            key_bits,
            provisioner,
        } = options;
        if directory.join(KEYSTORE_FILE).exists() {
            return Err(EncoderError::TokenState(format!(
                "token database already exists at {}",
                directory.display()
            )));
        }
        // A leftover password file means a database was created here
        // before and its keystore has gone missing. Re-provisioning now
        // would generate a new keypair and orphan every credential
        // encrypted under the old one.
        if directory.join(PIN_FILE).exists() {
            return Err(EncoderError::TokenState(format!(
                "keystore missing but password file present at {}; refusing to re-provision",
                directory.display()
            )));
        }
        let created_directory = !directory.exists();
        fs::create_dir_all(&directory)?;
        restrict_dir(&directory)?;

        match Self::provision_and_store(&directory, password, &seed, key_bits, provisioner.as_ref())
        {
            Ok(private_key) => {
                info!(directory = %directory.display(), "token database created");
                let public_key = RsaPublicKey::from(&private_key);
                Ok(Self { directory, private_key, public_key })
            }
            Err(e) => {
                if created_directory {
                    let _ = fs::remove_dir_all(&directory);
                }
                Err(e)
            }
        }
    }

    fn provision_and_store(
        directory: &Path,
        password: Option<String>,
        seed: &[u8],
        key_bits: usize,
        provisioner: &dyn Provisioner,
    ) -> Result<RsaPrivateKey> {
        let password = Zeroizing::new(match password {
            Some(p) => p,
            None => BASE64.encode(random_bytes(32)),
        });

        provisioner.provision(directory, &password, seed)?;

        info!(key_bits, "generating database keypair");
        let private_key = RsaPrivateKey::new(&mut OsRng, key_bits)
            .map_err(|e| EncoderError::Crypto(format!("RSA key generation failed: {e}")))?;
        let der = private_key
            .to_pkcs8_der()
            .map_err(|e| EncoderError::Crypto(format!("key serialization failed: {e}")))?;
        keystore::write_keystore(
            &directory.join(KEYSTORE_FILE),
            password.as_bytes(),
            der.as_bytes(),
            key_bits,
        )?;
        write_pin_file(&directory.join(PIN_FILE), &password)?;
        Ok(private_key)
    }

    /// Open an existing database using the password file stored beside
    /// the keystore.
    pub fn open(directory: &Path) -> Result<Self> {
        let pin = fs::read_to_string(directory.join(PIN_FILE)).map_err(|e| {
            EncoderError::TokenState(format!(
                "cannot read database password from {}: {e}",
                directory.display()
            ))
        })?;
        let password = Zeroizing::new(pin.trim_end().to_string());

        let (_, der) = keystore::read_keystore(&directory.join(KEYSTORE_FILE), password.as_bytes())?;
        let private_key = RsaPrivateKey::from_pkcs8_der(&der)
            .map_err(|e| EncoderError::TokenState(format!("corrupted keystore: {e}")))?;
        let public_key = RsaPublicKey::from(&private_key);
        Ok(Self {
            directory: directory.to_path_buf(),
            private_key,
            public_key,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Encrypt with the database's public key; output is base64 text.
    pub fn encrypt(&self, plain: &[u8]) -> Result<String> {
        let ciphertext = self
            .public_key
            .encrypt(&mut OsRng, Pkcs1v15Encrypt, plain)
            .map_err(|e| EncoderError::Crypto(format!("RSA encryption failed: {e}")))?;
        Ok(BASE64.encode(ciphertext))
    }

    /// Reverse of [`encrypt`](Self::encrypt).
    pub fn decrypt(&self, encoded: &str) -> Result<Vec<u8>> {
        let ciphertext = BASE64
            .decode(encoded.trim())
            .map_err(|_| EncoderError::DecodeFailed)?;
        self.private_key
            .decrypt(Pkcs1v15Encrypt, &ciphertext)
            .map_err(|_| EncoderError::DecodeFailed)
    }
}

#[cfg(unix)]
fn restrict_dir(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_dir(_path: &Path) -> Result<()> {
    Ok(())
}

fn write_pin_file(path: &Path, password: &str) -> Result<()> {
    fs::write(path, password)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o400))?;
    }
    Ok(())
}
