//! Top-ten high score table

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::config::Difficulty;
use crate::core::error::Result;
use crate::persistence::store::KeyValueStore;

pub const HIGH_SCORE_KEY: &str = "catlife-highscores";
pub const MAX_HIGH_SCORES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: i64,
    pub difficulty: Difficulty,
    pub date: DateTime<Utc>,
}

/// Stored table, best first. A corrupt table reads as empty.
pub fn load_high_scores(store: &dyn KeyValueStore) -> Result<Vec<HighScoreEntry>> {
    let Some(json) = store.get(HIGH_SCORE_KEY)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str::<Vec<HighScoreEntry>>(&json) {
        Ok(mut entries) => {
            sort_and_trim(&mut entries);
            Ok(entries)
        }
        Err(e) => {
            tracing::warn!(error = %e, "ignoring corrupt high score table");
            Ok(Vec::new())
        }
    }
}

/// Insert a score; returns its 1-based rank, or None if it did not make the table
pub fn record_high_score(
    store: &mut dyn KeyValueStore,
    name: &str,
    score: i64,
    difficulty: Difficulty,
) -> Result<Option<usize>> {
    let mut entries = load_high_scores(store)?;
    let entry = HighScoreEntry {
        name: name.to_string(),
        score,
        difficulty,
        date: Utc::now(),
    };
    entries.push(entry.clone());
    sort_and_trim(&mut entries);

    let rank = entries.iter().position(|e| e == &entry).map(|i| i + 1);
    store.set(HIGH_SCORE_KEY, &serde_json::to_string(&entries)?)?;
    tracing::info!(name, score, ?rank, "high score recorded");
    Ok(rank)
}

/// Descending by score; earlier entries win ties
fn sort_and_trim(entries: &mut Vec<HighScoreEntry>) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(MAX_HIGH_SCORES);
}

pub fn render_high_scores(entries: &[HighScoreEntry]) -> String {
    if entries.is_empty() {
        return "No high scores yet.".to_string();
    }
    let mut out = String::from("High Scores:");
    for (i, e) in entries.iter().enumerate() {
        out.push_str(&format!(
            "\n{:>2}. {:<16} {:>6}  {:<6} {}",
            i + 1,
            e.name,
            e.score,
            e.difficulty,
            e.date.format("%Y-%m-%d")
        ));
    }
    out
}
