// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod clear;
pub mod drain;
pub mod dropped;
pub mod enqueue;
pub mod status;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs2::FileExt;
use sj_core::FileStore;

use crate::config::{find_data_dir, get_lock_path, Config};
use crate::error::{Error, Result};
use crate::sync::{Connectivity, ManualConnectivity, RemoteRegistry, SyncManager};

/// Resolved data directory plus its configuration.
#[derive(Debug, Clone)]
pub struct Context {
    pub data_dir: PathBuf,
    pub config: Config,
}

impl Context {
    pub fn new(data_dir: PathBuf, config: Config) -> Self {
        Context { data_dir, config }
    }

    /// Resolves the data directory and loads `config.toml` from it.
    pub fn load(directory: Option<&Path>) -> Result<Self> {
        let data_dir = find_data_dir(directory)?;
        let config = Config::load(&data_dir)?;
        Ok(Context::new(data_dir, config))
    }

    /// Opens a manager over the data directory with simulated remotes.
    ///
    /// The returned connectivity handle starts at `online` and is the only
    /// way to flip it.
    pub fn open_manager(&self, online: bool) -> Result<(SyncManager, Arc<ManualConnectivity>)> {
        let store = FileStore::open(&self.data_dir)?;
        let connectivity = Arc::new(ManualConnectivity::new(online));
        let remotes = RemoteRegistry::simulated(
            self.config.remote.latency_scale,
            &self.config.remote.fail_kinds,
        );
        let manager = SyncManager::new(
            self.config.sync_config(),
            Arc::new(store),
            remotes,
            Arc::clone(&connectivity) as Arc<dyn Connectivity>,
        );
        Ok((manager, connectivity))
    }
}

/// Exclusive lock on `drain.lock`, released when dropped.
///
/// Every command that rewrites the queue holds it so two processes never
/// overwrite each other's copy.
#[derive(Debug)]
pub struct DrainLock {
    _file: File,
}

impl DrainLock {
    fn open(data_dir: &Path) -> Result<(File, PathBuf)> {
        std::fs::create_dir_all(data_dir)?;
        let lock_path = get_lock_path(data_dir);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        Ok((file, lock_path))
    }

    /// Takes the lock or fails with [`Error::DrainInProgress`].
    pub fn try_acquire(data_dir: &Path) -> Result<Self> {
        let (file, lock_path) = Self::open(data_dir)?;
        file.try_lock_exclusive()
            .map_err(|_| Error::DrainInProgress(lock_path.display().to_string()))?;
        Ok(DrainLock { _file: file })
    }

    /// Blocks until the lock is free.
    pub fn wait(data_dir: &Path) -> Result<Self> {
        let (file, _) = Self::open(data_dir)?;
        file.lock_exclusive()?;
        Ok(DrainLock { _file: file })
    }
}
