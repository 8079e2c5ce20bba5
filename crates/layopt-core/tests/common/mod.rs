#![allow(dead_code)]

use layopt_core::pool::PoolOptions;
use layopt_core::resources::Resources;
use std::path::{Path, PathBuf};

/// Workspace root, where the bundled conf/, data/ and cache/ live.
pub fn repo_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

pub fn bundled_resources() -> Resources {
    Resources::load(&repo_root()).expect("bundled documents should load")
}

pub fn small_pool(seed: u64) -> PoolOptions {
    PoolOptions {
        size: 16,
        workers: 2,
        seed: Some(seed),
    }
}
