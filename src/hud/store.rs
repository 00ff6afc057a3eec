//! Owner of the live [`AppState`] and bridge to the key-value collaborator.
//!
//! Startup adopts a persisted blob only when its `schemaVersion` matches
//! [`CURRENT_SCHEMA_VERSION`]; anything else (missing, malformed, other version,
//! failed read) leaves the freshly seeded state in place. A failed read does not
//! write the seed back. Every dispatch writes the whole
//! state back. Storage failures are logged and swallowed so the session keeps
//! running on the in-memory state.

use chrono::Utc;
use log::{debug, error, info, warn};

use crate::hud::errors::LifeHudError;
use crate::hud::reducer::{reduce, Action};
use crate::hud::seed::create_seed_data;
use crate::hud::storage::KeyValueStore;
use crate::hud::types::{AppState, CURRENT_SCHEMA_VERSION};

/// Fixed key the state blob lives under.
pub const STORAGE_KEY: &str = "lifehud_state";

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// How the store arrived at its initial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing persisted yet; the seed is in use.
    Fresh,
    /// The persisted blob was adopted.
    Restored,
    /// The persisted blob had another schema version and was discarded.
    Reseeded { found: u32 },
    /// The persisted blob was malformed and has been replaced by the seed.
    Unreadable,
    /// The backend refused the read; the seed is in use and nothing was written.
    StorageUnavailable,
}

pub struct Store<S: KeyValueStore> {
    backend: S,
    key: String,
    state: AppState,
    load_outcome: LoadOutcome,
}

impl<S: KeyValueStore> Store<S> {
    /// Open the store under [`STORAGE_KEY`].
    pub fn open(backend: S) -> Self {
        Self::open_with_key(backend, STORAGE_KEY)
    }

    pub fn open_with_key(backend: S, key: impl Into<String>) -> Self {
        Self::open_at(backend, key, now_ms())
    }

    /// Open with an explicit clock reading, used for the seed timestamps.
    pub fn open_at(backend: S, key: impl Into<String>, now: i64) -> Self {
        let mut store = Self {
            backend,
            key: key.into(),
            state: create_seed_data(now),
            load_outcome: LoadOutcome::Fresh,
        };

        match store.read_persisted() {
            Ok(Some(persisted)) => {
                info!(
                    "Restored state: {} quests, {} effects, {} loadouts, {} XP",
                    persisted.quests.len(),
                    persisted.effects.len(),
                    persisted.loadouts.len(),
                    persisted.xp_total
                );
                store.load_outcome = LoadOutcome::Restored;
                store.dispatch_at(Action::LoadState(persisted), now);
            }
            Ok(None) => {
                info!("No persisted state under '{}'; starting from seed data", store.key);
                store.persist();
            }
            Err(LifeHudError::SchemaMismatch { expected, found }) => {
                warn!(
                    "Persisted state has schema version {} (expected {}); discarding and reseeding",
                    found, expected
                );
                store.load_outcome = LoadOutcome::Reseeded { found };
                store.dispatch_at(Action::ResetData, now);
            }
            Err(e @ (LifeHudError::Json(_) | LifeHudError::Utf8(_))) => {
                error!("Persisted state is malformed ({}); replacing it with seed data", e);
                store.load_outcome = LoadOutcome::Unreadable;
                store.persist();
            }
            Err(e) => {
                // Leave the stored blob alone; the next dispatch writes over it.
                error!("Failed to read persisted state: {}", e);
                store.load_outcome = LoadOutcome::StorageUnavailable;
            }
        }

        store
    }

    fn read_persisted(&self) -> Result<Option<AppState>, LifeHudError> {
        let Some(raw) = self.backend.get(&self.key)? else {
            return Ok(None);
        };
        parse_state(&raw).map(Some)
    }

    /// Current snapshot.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn load_outcome(&self) -> LoadOutcome {
        self.load_outcome
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Apply `action` at the current wall-clock time and persist the result.
    pub fn dispatch(&mut self, action: Action) -> &AppState {
        self.dispatch_at(action, now_ms())
    }

    /// Apply `action` at `now` and persist the result.
    pub fn dispatch_at(&mut self, action: Action, now: i64) -> &AppState {
        debug!("dispatch {}", action.name());
        self.state = reduce(&self.state, action, now);
        self.persist();
        &self.state
    }

    /// Write the whole state under the store key. Failures are logged only.
    fn persist(&self) {
        let result = serialize_state(&self.state)
            .and_then(|blob| self.backend.set(&self.key, &blob));
        if let Err(e) = result {
            error!("Failed to save state: {}", e);
        }
    }

    /// Pretty-printed JSON of the current state, for export.
    pub fn export_json(&self) -> Result<String, LifeHudError> {
        Ok(serde_json::to_string_pretty(&self.state)?)
    }
}

pub fn serialize_state(state: &AppState) -> Result<String, LifeHudError> {
    Ok(serde_json::to_string(state)?)
}

/// Parse a persisted blob, rejecting any schema version other than the current one
/// before the body is interpreted.
pub fn parse_state(raw: &str) -> Result<AppState, LifeHudError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let found = value
        .get("schemaVersion")
        .and_then(|v| v.as_u64())
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0);
    if found != CURRENT_SCHEMA_VERSION {
        return Err(LifeHudError::SchemaMismatch {
            expected: CURRENT_SCHEMA_VERSION,
            found,
        });
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hud::storage::MemoryKvStore;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn fresh_store_seeds_and_writes() {
        let store = Store::open_at(MemoryKvStore::new(), STORAGE_KEY, NOW);
        assert_eq!(store.load_outcome(), LoadOutcome::Fresh);
        assert_eq!(store.state().xp_total, 120);
        let blob = store.backend().peek(STORAGE_KEY).expect("seed persisted");
        assert_eq!(parse_state(&blob).expect("parse"), *store.state());
    }

    #[test]
    fn restores_matching_version() {
        let mut saved = AppState::empty();
        saved.xp_total = 777;
        let blob = serialize_state(&saved).expect("serialize");
        let store = Store::open_at(MemoryKvStore::with_entry(STORAGE_KEY, &blob), STORAGE_KEY, NOW);
        assert_eq!(store.load_outcome(), LoadOutcome::Restored);
        assert_eq!(*store.state(), saved);
    }

    #[test]
    fn schema_mismatch_reseeds() {
        let mut saved = AppState::empty();
        saved.schema_version = 0;
        saved.xp_total = 9_999;
        let blob = serialize_state(&saved).expect("serialize");
        let store = Store::open_at(MemoryKvStore::with_entry(STORAGE_KEY, &blob), STORAGE_KEY, NOW);
        assert_eq!(store.load_outcome(), LoadOutcome::Reseeded { found: 0 });
        assert_eq!(store.state().xp_total, 120);
        assert_eq!(store.state().quests.len(), 3);
    }

    #[test]
    fn garbage_blob_is_replaced_with_seed() {
        let store = Store::open_at(
            MemoryKvStore::with_entry(STORAGE_KEY, "{not json"),
            STORAGE_KEY,
            NOW,
        );
        assert_eq!(store.load_outcome(), LoadOutcome::Unreadable);
        let blob = store.backend().peek(STORAGE_KEY).expect("overwritten");
        assert!(parse_state(&blob).is_ok());
    }

    #[test]
    fn failed_read_keeps_stored_blob() {
        let mut saved = AppState::empty();
        saved.xp_total = 777;
        let blob = serialize_state(&saved).expect("serialize");
        let mut backend = MemoryKvStore::with_entry(STORAGE_KEY, &blob);
        backend.fail_reads = true;

        let store = Store::open_at(backend, STORAGE_KEY, NOW);
        assert_eq!(store.load_outcome(), LoadOutcome::StorageUnavailable);
        assert_eq!(store.state().xp_total, 120);
        let kept = store.backend().peek(STORAGE_KEY).expect("blob still there");
        assert_eq!(parse_state(&kept).expect("parse").xp_total, 777);
    }

    #[test]
    fn write_failures_do_not_block_dispatch() {
        let mut backend = MemoryKvStore::new();
        backend.fail_writes = true;
        let mut store = Store::open_at(backend, STORAGE_KEY, NOW);
        let id = store.state().quests[0].id.clone();
        store.dispatch_at(Action::TurnInQuest(id), NOW);
        assert_eq!(store.state().xp_total, 150);
        assert!(store.backend().peek(STORAGE_KEY).is_none());
    }

    #[test]
    fn missing_schema_version_counts_as_mismatch() {
        let err = parse_state("{\"xpTotal\":3}").expect_err("mismatch");
        assert!(matches!(err, LifeHudError::SchemaMismatch { found: 0, .. }));
    }
}
