//! High score leaderboard
//!
//! Top 10 by score, persisted to LocalStorage on the web and to a JSON file
//! natively. The simulation only reads it (for the top 10 check) and hands
//! back candidate entries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Longest name the prompt accepts
pub const MAX_NAME_LEN: usize = 20;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
    /// Percent, one decimal
    pub accuracy: f32,
    /// Run length in seconds
    pub time_secs: u64,
    /// Level reached
    pub level: u32,
    /// Display date, formatted by the host
    pub date: String,
}

/// Why a name submission was refused
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("player name is empty")]
    EmptyName,
    #[error("no high score is waiting for a name")]
    NoPendingPrompt,
}

/// Native leaderboard file problems
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("leaderboard file: {0}")]
    Io(#[from] std::io::Error),
    #[error("leaderboard json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Trim and cap a prompt name. `None` when nothing is left.
pub fn clean_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_NAME_LEN).collect())
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HighScores {
    pub entries: Vec<LeaderboardEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "gun_game_leaderboard";

    /// Default leaderboard file for the native runner
    pub const DEFAULT_PATH: &'static str = "gun_game_leaderboard.json";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Seed from a previously persisted sequence, restoring the sort order
    /// and cap in case the stored copy was edited
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_HIGH_SCORES);
        Self { entries }
    }

    /// Room on the board, or better than the current 10th place
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Merge an entry, keep the board sorted and capped.
    /// Returns the rank achieved (1-indexed) or None if it fell off the end.
    pub fn add_entry(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        // Equal scores keep their earlier place
        let pos = self
            .entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);

        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(entries) = serde_json::from_str::<Vec<LeaderboardEntry>>(&json) {
                    log::info!("Loaded {} high scores", entries.len());
                    return Self::from_entries(entries);
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(&self.entries) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("High scores saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Load from a JSON file holding the entry list
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path)?;
        let entries: Vec<LeaderboardEntry> = serde_json::from_str(&json)?;
        Ok(Self::from_entries(entries))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: impl AsRef<std::path::Path>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Native: the default file, or an empty board if it is missing or bad
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match Self::load_from(Self::DEFAULT_PATH) {
            Ok(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(e) => {
                log::info!("No high scores loaded ({e}), starting fresh");
                Self::new()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        match self.save_to(Self::DEFAULT_PATH) {
            Ok(()) => log::info!("High scores saved ({} entries)", self.entries.len()),
            Err(e) => log::warn!("Could not save high scores: {e}"),
        }
    }
}

/// Today's date for a new entry (WASM only; native hosts pass their own)
#[cfg(target_arch = "wasm32")]
pub fn today() -> String {
    let date = js_sys::Date::new_0();
    format!(
        "{}/{}/{}",
        date.get_month() + 1,
        date.get_date(),
        date.get_full_year()
    )
}
