//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for the
//! demo's operations. It dispatches to `commands/*.rs` and returns
//! `Result<CmdResult>`; it never prints and holds no business logic.
//!
//! `WherekitApi<S: DataStore<Palette>>` is generic over the storage backend:
//! `FileStore` in the binary, `InMemoryStore` in tests.

use crate::commands;
use crate::error::Result;
use crate::model::Palette;
use crate::store::DataStore;
use rand::Rng;
use std::path::{Path, PathBuf};

pub struct WherekitApi<S: DataStore<Palette>> {
    store: S,
    config_dir: PathBuf,
}

impl<S: DataStore<Palette>> WherekitApi<S> {
    pub fn new(store: S, config_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            config_dir: config_dir.into(),
        }
    }

    pub fn add_random<R: Rng>(&mut self, count: usize, rng: &mut R) -> Result<CmdResult> {
        commands::add::random(&mut self.store, count, rng)
    }

    pub fn add_palette(
        &mut self,
        name: &str,
        hue: i64,
        saturation: f64,
        brightness: f64,
    ) -> Result<CmdResult> {
        commands::add::one(&mut self.store, name, hue, saturation, brightness)
    }

    pub fn list(&self, selection: &Selection, listing: &Listing) -> Result<CmdResult> {
        commands::list::run(&self.store, selection, listing)
    }

    pub fn count(&self, selection: &Selection) -> Result<CmdResult> {
        commands::count::run(&self.store, selection)
    }

    pub fn delete(&mut self, selection: &Selection) -> Result<CmdResult> {
        commands::delete::run(&mut self.store, selection)
    }

    pub fn clear(&mut self) -> Result<CmdResult> {
        commands::clear::run(&mut self.store)
    }

    pub fn explain(&self, selection: &Selection, listing: &Listing) -> Result<CmdResult> {
        commands::explain::run(selection, listing)
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.config_dir, action)
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

pub use commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, Listing, MessageLevel, Preset, Selection, SortField};
