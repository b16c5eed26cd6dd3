//! Saved progress across a level pack.
//!
//! Uses bincode for a compact binary file. Writes go to a sibling temp file
//! that is renamed over the target, so a crash never leaves a torn save.

use anyhow::{bail, Context, Result};
use arclink_logic::level::Level;
use arclink_logic::puzzle::Puzzle;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Version number for the save format (increment when the format changes)
const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub version: u32,
    pub current_level: usize,
    pub levels: Vec<Level>,
}

impl Progress {
    /// Fresh progress over the given pack levels.
    pub fn new(levels: Vec<Level>) -> Self {
        Self {
            version: SAVE_VERSION,
            current_level: 0,
            levels,
        }
    }

    /// Store the outcome of a session on level `index`.
    ///
    /// A won level is reset to its pack layout so it can be replayed, keeping
    /// only the win count and best score. An unfinished one keeps the board
    /// as the player left it.
    pub fn record(&mut self, index: usize, original: &Level, puzzle: &Puzzle) {
        let entry = if puzzle.is_won() {
            let mut level = original.clone();
            level.moves = 0;
            level.win_count = puzzle.win_count();
            level.moves_best_score = puzzle.moves_best_score();
            level
        } else {
            puzzle.to_level()
        };
        if index < self.levels.len() {
            self.levels[index] = entry;
        } else {
            log::warn!("progress has no level {}; appending", index);
            self.levels.push(entry);
        }
        self.current_level = index;
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        bincode::serialize_into(writer, self).context("encoding progress")?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        let progress: Progress = bincode::deserialize_from(reader).context("decoding progress")?;
        if progress.version != SAVE_VERSION {
            bail!(
                "save version mismatch: expected {}, found {}",
                SAVE_VERSION,
                progress.version
            );
        }
        Ok(progress)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let tmp = path.with_extension("tmp");
        {
            let file = File::create(&tmp)
                .with_context(|| format!("creating {}", tmp.display()))?;
            let mut writer = BufWriter::new(file);
            self.write_to(&mut writer)?;
            writer.flush()?;
        }
        fs::rename(&tmp, path)
            .with_context(|| format!("replacing {}", path.display()))?;
        log::info!("saved progress for {} levels to {}", self.levels.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        Self::read_from(BufReader::new(file)).with_context(|| format!("in {}", path.display()))
    }
}
