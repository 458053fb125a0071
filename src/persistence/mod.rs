//! Saved games and the high score table over a key/value store

pub mod highscore;
pub mod snapshot;
pub mod store;

pub use highscore::{load_high_scores, record_high_score, render_high_scores, HighScoreEntry, HIGH_SCORE_KEY};
pub use snapshot::{clear_snapshot, load_snapshot, save_snapshot, Snapshot, SNAPSHOT_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore};
