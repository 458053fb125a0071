//! Full session snapshots for save / continue

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::persistence::store::KeyValueStore;
use crate::simulation::session::GameSession;

pub const SNAPSHOT_KEY: &str = "catlife-save";

/// Bumped whenever the saved layout changes incompatibly
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub session: GameSession,
}

pub fn save_snapshot(store: &mut dyn KeyValueStore, session: &GameSession) -> Result<()> {
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        saved_at: Utc::now(),
        session: session.clone(),
    };
    let json = serde_json::to_string(&snapshot)?;
    store.set(SNAPSHOT_KEY, &json)?;
    tracing::info!(day = session.day(), score = session.score, "game saved");
    Ok(())
}

/// Load the saved session. Missing, corrupt or inconsistent snapshots read as "no saved game".
pub fn load_snapshot(store: &dyn KeyValueStore) -> Result<Option<GameSession>> {
    let Some(json) = store.get(SNAPSHOT_KEY)? else {
        return Ok(None);
    };
    let snapshot: Snapshot = match serde_json::from_str(&json) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring corrupt snapshot");
            return Ok(None);
        }
    };
    if snapshot.version != SNAPSHOT_VERSION {
        tracing::warn!(found = snapshot.version, expected = SNAPSHOT_VERSION, "ignoring snapshot from another version");
        return Ok(None);
    }
    if let Err(problem) = snapshot.session.check_membership() {
        tracing::warn!(%problem, "ignoring inconsistent snapshot");
        return Ok(None);
    }
    tracing::info!(saved_at = %snapshot.saved_at, "game loaded");
    Ok(Some(snapshot.session))
}

pub fn clear_snapshot(store: &mut dyn KeyValueStore) -> Result<()> {
    store.remove(SNAPSHOT_KEY)
}
