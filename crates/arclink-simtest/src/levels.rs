//! Level packs as JSON files.
//!
//! A pack bundles pack metadata, the index of the level being played and the
//! levels themselves, using the same camelCase field names as `Level`.

use anyhow::{Context, Result};
use arclink_logic::level::Level;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The pack bundled with the harness.
pub const BUNDLED_PACK: &str = include_str!("../../../data/levels.json");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackInfo {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelPack {
    pub info: PackInfo,
    #[serde(default)]
    pub current_level: usize,
    pub levels: Vec<Level>,
}

impl LevelPack {
    pub fn parse(text: &str) -> Result<Self> {
        let pack: LevelPack = serde_json::from_str(text).context("parsing level pack")?;
        Ok(pack)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading level pack {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("in {}", path.display()))
    }

    pub fn bundled() -> Result<Self> {
        Self::parse(BUNDLED_PACK)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing level pack")
    }

    pub fn level(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }
}
