//! Published snapshots of the device registry.
//!
//! A running probe cycle holds an `Arc` to the snapshot it started with.
//! Reloading or importing installs a fresh snapshot and wakes every
//! subscriber; that wake-up is the "config reloaded" signal. Subscribers
//! read the new devices through [`RegistryStore::snapshot`].

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use netcheck_common::error::RegistryError;
use netcheck_common::success;
use tokio::sync::watch;
use tracing::{debug, info};

use super::{DeviceRegistry, paths};

pub struct RegistryStore {
    path: PathBuf,
    tx: watch::Sender<Arc<DeviceRegistry>>,
    modified: Mutex<Option<SystemTime>>,
}

impl RegistryStore {
    /// Loads the persisted document at `path`. A missing file gives an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let path: PathBuf = path.into();
        let registry: DeviceRegistry = DeviceRegistry::load_from_path(&path)?;
        let (tx, _rx) = watch::channel(Arc::new(registry));

        Ok(Self {
            modified: Mutex::new(modified_at(&path)),
            path,
            tx,
        })
    }

    pub fn open_default() -> Result<Self, RegistryError> {
        Self::open(paths::default_config_path()?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> Arc<DeviceRegistry> {
        Arc::clone(&self.tx.borrow())
    }

    /// Receiver that wakes whenever a new snapshot is installed.
    pub fn subscribe(&self) -> watch::Receiver<Arc<DeviceRegistry>> {
        self.tx.subscribe()
    }

    /// Re-reads the persisted document and installs it.
    pub fn reload(&self) -> Result<Arc<DeviceRegistry>, RegistryError> {
        let stamp: Option<SystemTime> = modified_at(&self.path);
        let registry: Arc<DeviceRegistry> = Arc::new(DeviceRegistry::load_from_path(&self.path)?);
        self.install(Arc::clone(&registry), stamp);
        info!("Reloaded {} device(s) from {}", registry.devices().len(), self.path.display());
        Ok(registry)
    }

    /// Reloads only when the file's modification time moved since the last load.
    ///
    /// Returns `None` when nothing changed.
    pub fn reload_if_changed(&self) -> Result<Option<Arc<DeviceRegistry>>, RegistryError> {
        let current: Option<SystemTime> = modified_at(&self.path);
        let last: Option<SystemTime> = *self.modified.lock().unwrap_or_else(PoisonError::into_inner);
        if current == last {
            return Ok(None);
        }
        debug!("{} changed on disk", self.path.display());
        self.reload().map(Some)
    }

    /// Copies the document at `selected` over the persisted one.
    ///
    /// The document is decoded first; if it is not valid the persisted file
    /// is left untouched and the error is returned.
    pub fn import(&self, selected: &Path) -> Result<Arc<DeviceRegistry>, RegistryError> {
        let bytes: Vec<u8> = fs::read(selected).map_err(|e| RegistryError::io(selected, e))?;
        let registry: Arc<DeviceRegistry> = Arc::new(DeviceRegistry::load(&bytes)?);

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| RegistryError::io(dir, e))?;
        }

        let staging: PathBuf = self.path.with_extension("json.tmp");
        fs::write(&staging, &bytes).map_err(|e| RegistryError::io(&staging, e))?;
        if let Err(e) = fs::rename(&staging, &self.path) {
            let _ = fs::remove_file(&staging);
            return Err(RegistryError::io(&self.path, e));
        }

        self.install(Arc::clone(&registry), modified_at(&self.path));
        success!(
            "Imported {} device(s) from {}",
            registry.devices().len(),
            selected.display()
        );
        Ok(registry)
    }

    fn install(&self, registry: Arc<DeviceRegistry>, stamp: Option<SystemTime>) {
        *self.modified.lock().unwrap_or_else(PoisonError::into_inner) = stamp;
        self.tx.send_replace(registry);
    }
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
