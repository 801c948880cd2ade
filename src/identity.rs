//! Record ids and the per-installation device id.

use once_cell::sync::{Lazy, OnceCell};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

const DEVICE_ID_FILE: &str = "device_id";

static GLOBAL_IDENTITY: Lazy<Arc<LocalIdentity>> =
    Lazy::new(|| Arc::new(LocalIdentity::new(default_data_dir())));

pub trait IdentityProvider: Send + Sync {
    /// A fresh identifier, never handed out twice.
    fn new_id(&self) -> String;

    /// The stable identifier of this installation.
    fn device_id(&self) -> String;
}

/// `dirs::data_dir()/docjson`, or `.docjson` when there is no data dir.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("docjson"))
        .unwrap_or_else(|| PathBuf::from(".docjson"))
}

/// Generates v4 UUIDs and keeps the device id in a file under `data_dir`.
///
/// The device id is read (or created) on first use and cached for the
/// lifetime of the value.
#[derive(Debug)]
pub struct LocalIdentity {
    data_dir: PathBuf,
    device_id: OnceCell<String>,
}

impl LocalIdentity {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
            device_id: OnceCell::new(),
        }
    }

    /// Process-wide instance backed by [`default_data_dir`].
    pub fn global() -> Arc<LocalIdentity> {
        Arc::clone(&GLOBAL_IDENTITY)
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(DEVICE_ID_FILE)
    }

    fn load_or_create(&self) -> String {
        let path = self.store_path();
        if let Some(existing) = read_device_id(&path) {
            debug!(path = %path.display(), "Loaded device id");
            return existing;
        }

        let generated = Uuid::new_v4().to_string();
        if let Err(e) = std::fs::create_dir_all(&self.data_dir)
            .and_then(|_| std::fs::write(&path, &generated))
        {
            warn!(path = %path.display(), error = %e, "Could not persist device id; using it for this process only");
        }
        generated
    }
}

impl IdentityProvider for LocalIdentity {
    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    fn device_id(&self) -> String {
        self.device_id.get_or_init(|| self.load_or_create()).clone()
    }
}

fn read_device_id(path: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(path).ok()?;
    let trimmed = raw.trim();
    Uuid::parse_str(trimmed).ok().map(|_| trimmed.to_string())
}
