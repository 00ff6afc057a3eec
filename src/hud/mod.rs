//! LifeHUD data model, state transitions and persistence.
//! Types and seed data sit at the bottom, the reducer and selectors work on
//! plain [`AppState`] values, and [`Store`] ties the reducer to a key-value
//! backend.

pub mod errors;
pub mod ids;
pub mod presets;
pub mod reducer;
pub mod seed;
pub mod selectors;
pub mod storage;
pub mod store;
pub mod types;

pub use errors::LifeHudError;
pub use ids::generate_id;
pub use presets::{find_preset, get_preset, EffectPreset, EFFECT_PRESETS};
pub use reducer::{reduce, Action, StepDirection};
pub use seed::create_seed_data;
pub use selectors::{
    active_effects, active_quests, backlog_quests, completed_quests, effect_progress,
    effect_remaining_ms, equipped_loadout, expired_effects, filter_quests, level,
    location_markers, next_step, search, step_progress, xp_progress, LocationMarker, SearchHit,
    SearchKind,
};
pub use storage::{KeyValueStore, MemoryKvStore, SledKvStore, SledKvStoreBuilder};
pub use store::{now_ms, parse_state, serialize_state, LoadOutcome, Store, STORAGE_KEY};
pub use types::*;
