//! Durable storage of private key state.
//!
//! An XMSS private key changes with every signature. [`KeyStore`] is the
//! seam through which [`crate::sign::sign_persisted`] writes the advanced key
//! before a signature is released.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;
use zeroize::Zeroize;

use crate::error::Result;
use crate::keygen::PrivateKey;
use crate::params::Params;

/// Durable storage for serialized private keys.
pub trait KeyStore {
    /// Durably stores the serialized private key.
    ///
    /// Must only return `Ok` once the bytes would survive a crash.
    fn persist(&mut self, private_key: &[u8]) -> Result<()>;
}

/// Stores the private key in a single file.
///
/// Writes go to a sibling `.tmp` file which is synced and then renamed over
/// the target, so the file always holds either the old or the new key.
#[derive(Clone, Debug)]
pub struct FileKeyStore {
    path: PathBuf,
}

impl FileKeyStore {
    /// Creates a store backed by `path`. Nothing is written until `persist`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileKeyStore { path: path.into() }
    }

    /// Path of the key file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored private key.
    pub fn load(&self, params: Params) -> Result<PrivateKey> {
        let mut bytes = fs::read(&self.path)?;
        let key = PrivateKey::from_bytes(&bytes, params);
        bytes.zeroize();
        key
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl KeyStore for FileKeyStore {
    fn persist(&mut self, private_key: &[u8]) -> Result<()> {
        let tmp = self.tmp_path();

        let mut file = File::create(&tmp)?;
        file.write_all(private_key)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp, &self.path)?;
        sync_parent_dir(&self.path)?;

        debug!(path = %self.path.display(), "persisted private key state");
        Ok(())
    }
}

/// Syncs the directory holding `path` so a completed rename survives a crash.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    File::open(dir)?.sync_all()
}

/// Directory handles cannot be synced on this platform.
#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Keeps the latest private key in memory.
///
/// For tests and for callers that persist the bytes in their own transaction.
#[derive(Default)]
pub struct MemoryKeyStore {
    current: Option<Vec<u8>>,
    writes: usize,
}

impl MemoryKeyStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently persisted key bytes.
    pub fn current(&self) -> Option<&[u8]> {
        self.current.as_deref()
    }

    /// Number of successful `persist` calls.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyStore for MemoryKeyStore {
    fn persist(&mut self, private_key: &[u8]) -> Result<()> {
        if let Some(old) = self.current.as_mut() {
            old.zeroize();
        }
        self.current = Some(private_key.to_vec());
        self.writes += 1;
        Ok(())
    }
}

impl Drop for MemoryKeyStore {
    fn drop(&mut self) {
        if let Some(bytes) = self.current.as_mut() {
            bytes.zeroize();
        }
    }
}

impl std::fmt::Debug for MemoryKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryKeyStore")
            .field("writes", &self.writes)
            .finish_non_exhaustive()
    }
}
