//! Persistence and leaderboard service
//!
//! The game talks to storage through the `Backend` trait: plain
//! request/response calls, no atomicity across them. The browser build
//! persists to LocalStorage; tests and the native shell use the in-memory
//! implementation. Injected into the orchestrator at startup, never a
//! global.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::{MiniGame, Session};

/// Leaderboard length kept server-side.
pub const LEADERBOARD_CAP: usize = 25;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("storage unavailable")]
    StorageUnavailable,
    #[error("malformed record: {0}")]
    Malformed(String),
    #[error("username must not be empty")]
    EmptyUsername,
}

/// One persisted save, keyed by user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRecord {
    pub version: u32,
    pub session: Session,
    /// Last final score per mini-game key.
    pub scores: BTreeMap<String, u32>,
    pub total_score: u32,
    pub achievements: Vec<String>,
}

pub const SAVE_VERSION: u32 = 1;

impl SaveRecord {
    /// Snapshot the current session into a save record.
    pub fn from_session(session: &Session) -> Self {
        let scores = MiniGame::ALL
            .iter()
            .filter(|g| session.completed.contains(g))
            .map(|g| (g.key().to_string(), session.score_of(*g)))
            .collect();
        Self {
            version: SAVE_VERSION,
            session: session.clone(),
            scores,
            total_score: session.total_score,
            achievements: session.achievements(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub total_score: u32,
    /// Unix timestamp (ms) of submission.
    pub created_at: f64,
}

/// Request/response persistence surface.
pub trait Backend {
    /// Mint an anonymous user id for first-time saves.
    fn create_anonymous_session(&mut self) -> Result<String, BackendError>;
    fn save_game_state(&mut self, user_id: &str, record: &SaveRecord) -> Result<(), BackendError>;
    fn load_game_state(&mut self, user_id: &str) -> Result<Option<SaveRecord>, BackendError>;
    fn submit_to_leaderboard(
        &mut self,
        username: &str,
        total_score: u32,
        now_ms: f64,
    ) -> Result<(), BackendError>;
    fn get_leaderboard(&mut self, limit: usize) -> Result<Vec<LeaderboardEntry>, BackendError>;
}

/// Insert an entry keeping the list sorted descending and capped. Shared by
/// both implementations so the ordering rule lives in one place.
fn insert_entry(entries: &mut Vec<LeaderboardEntry>, entry: LeaderboardEntry) {
    let pos = entries
        .iter()
        .position(|e| entry.total_score > e.total_score)
        .unwrap_or(entries.len());
    entries.insert(pos, entry);
    entries.truncate(LEADERBOARD_CAP);
}

/// In-memory backend for native builds and tests.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    saves: BTreeMap<String, SaveRecord>,
    leaderboard: Vec<LeaderboardEntry>,
    next_id: u64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for MemoryBackend {
    fn create_anonymous_session(&mut self) -> Result<String, BackendError> {
        self.next_id += 1;
        Ok(format!("anon-{}", self.next_id))
    }

    fn save_game_state(&mut self, user_id: &str, record: &SaveRecord) -> Result<(), BackendError> {
        self.saves.insert(user_id.to_string(), record.clone());
        Ok(())
    }

    fn load_game_state(&mut self, user_id: &str) -> Result<Option<SaveRecord>, BackendError> {
        Ok(self.saves.get(user_id).cloned())
    }

    fn submit_to_leaderboard(
        &mut self,
        username: &str,
        total_score: u32,
        now_ms: f64,
    ) -> Result<(), BackendError> {
        if username.trim().is_empty() {
            return Err(BackendError::EmptyUsername);
        }
        insert_entry(
            &mut self.leaderboard,
            LeaderboardEntry {
                username: username.to_string(),
                total_score,
                created_at: now_ms,
            },
        );
        Ok(())
    }

    fn get_leaderboard(&mut self, limit: usize) -> Result<Vec<LeaderboardEntry>, BackendError> {
        Ok(self.leaderboard.iter().take(limit).cloned().collect())
    }
}

/// LocalStorage-backed implementation for the browser build.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageBackend;

#[cfg(target_arch = "wasm32")]
impl LocalStorageBackend {
    const SAVE_PREFIX: &'static str = "gym_rush_save_";
    const BOARD_KEY: &'static str = "gym_rush_leaderboard";

    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<web_sys::Storage, BackendError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(BackendError::StorageUnavailable)
    }

    fn read_board(storage: &web_sys::Storage) -> Vec<LeaderboardEntry> {
        storage
            .get_item(Self::BOARD_KEY)
            .ok()
            .flatten()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }
}

#[cfg(target_arch = "wasm32")]
impl Backend for LocalStorageBackend {
    fn create_anonymous_session(&mut self) -> Result<String, BackendError> {
        // Date-based ids are unique enough for one browser's storage.
        Ok(format!("anon-{}", js_sys::Date::now() as u64))
    }

    fn save_game_state(&mut self, user_id: &str, record: &SaveRecord) -> Result<(), BackendError> {
        let storage = Self::storage()?;
        let json = serde_json::to_string(record)
            .map_err(|e| BackendError::Malformed(e.to_string()))?;
        storage
            .set_item(&format!("{}{}", Self::SAVE_PREFIX, user_id), &json)
            .map_err(|_| BackendError::StorageUnavailable)?;
        log::info!("Saved game for {user_id}");
        Ok(())
    }

    fn load_game_state(&mut self, user_id: &str) -> Result<Option<SaveRecord>, BackendError> {
        let storage = Self::storage()?;
        let Some(json) = storage
            .get_item(&format!("{}{}", Self::SAVE_PREFIX, user_id))
            .ok()
            .flatten()
        else {
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| BackendError::Malformed(e.to_string()))
    }

    fn submit_to_leaderboard(
        &mut self,
        username: &str,
        total_score: u32,
        now_ms: f64,
    ) -> Result<(), BackendError> {
        if username.trim().is_empty() {
            return Err(BackendError::EmptyUsername);
        }
        let storage = Self::storage()?;
        let mut board = Self::read_board(&storage);
        insert_entry(
            &mut board,
            LeaderboardEntry {
                username: username.to_string(),
                total_score,
                created_at: now_ms,
            },
        );
        let json = serde_json::to_string(&board)
            .map_err(|e| BackendError::Malformed(e.to_string()))?;
        storage
            .set_item(Self::BOARD_KEY, &json)
            .map_err(|_| BackendError::StorageUnavailable)
    }

    fn get_leaderboard(&mut self, limit: usize) -> Result<Vec<LeaderboardEntry>, BackendError> {
        let storage = Self::storage()?;
        Ok(Self::read_board(&storage).into_iter().take(limit).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    #[test]
    fn test_save_then_load_round_trips() {
        let mut backend = MemoryBackend::new();
        let user = backend.create_anonymous_session().unwrap();

        let mut session = Session::new(1);
        session.complete(MiniGame::Workout, 1200);
        let record = SaveRecord::from_session(&session);
        backend.save_game_state(&user, &record).unwrap();

        let loaded = backend.load_game_state(&user).unwrap().unwrap();
        assert_eq!(loaded.total_score, 1200);
        assert_eq!(loaded.scores.get("workout"), Some(&1200));
        assert_eq!(loaded.version, SAVE_VERSION);
        assert!(loaded.achievements.contains(&"First Workout".to_string()));
    }

    #[test]
    fn test_load_unknown_user_is_none() {
        let mut backend = MemoryBackend::new();
        assert!(backend.load_game_state("nobody").unwrap().is_none());
    }

    #[test]
    fn test_leaderboard_sorted_descending_and_capped() {
        let mut backend = MemoryBackend::new();
        for i in 0..40u32 {
            backend
                .submit_to_leaderboard(&format!("p{i}"), i * 10, i as f64)
                .unwrap();
        }
        let board = backend.get_leaderboard(100).unwrap();
        assert_eq!(board.len(), LEADERBOARD_CAP);
        assert!(board.windows(2).all(|w| w[0].total_score >= w[1].total_score));
        assert_eq!(board[0].total_score, 390);
    }

    #[test]
    fn test_empty_username_rejected() {
        let mut backend = MemoryBackend::new();
        assert!(matches!(
            backend.submit_to_leaderboard("  ", 10, 0.0),
            Err(BackendError::EmptyUsername)
        ));
    }

    #[test]
    fn test_save_record_only_maps_completed_games() {
        let mut session = Session::new(2);
        session.complete(MiniGame::Yoga, 600);
        let record = SaveRecord::from_session(&session);
        assert_eq!(record.scores.len(), 1);
        assert!(record.scores.contains_key("yoga"));
    }
}
