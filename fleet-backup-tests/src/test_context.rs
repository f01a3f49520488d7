//! Scratch directory management for tests
//!
//! A `TestContext` owns a temp tree laid out like a backup target:
//! one directory per server with artifacts inside, plus room for
//! config files next to them.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestContext {
    root: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let root = TempDir::new().expect("temp dir for test context");
        Self { root }
    }

    /// Root of the scratch tree.
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Artifact directory for one server, created on first use.
    pub fn server_dir(&self, server: &str) -> PathBuf {
        let dir = self.root.path().join(server);
        std::fs::create_dir_all(&dir).expect("create server dir");
        dir
    }

    /// Write a file somewhere under the root, creating intermediate
    /// directories as needed. Returns the absolute path.
    pub fn create_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(relative);
        let parent = path.parent().expect("file path has a parent");
        std::fs::create_dir_all(parent).expect("create parent dirs");
        std::fs::write(&path, content).expect("write test file");
        path
    }
}
