//! Integration tests for the sled-backed store: startup protocol, write-through
//! on every dispatch and the reseed-on-schema-mismatch policy.
use lifehud::hud::{
    active_effects, effect_remaining_ms, expired_effects, parse_state, serialize_state, Action,
    AppState, KeyValueStore, LoadOutcome, SledKvStore, SledKvStoreBuilder, Store, STORAGE_KEY,
};
use tempfile::TempDir;

const NOW: i64 = 1_700_000_000_000;

fn setup_backend() -> (SledKvStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let backend = SledKvStoreBuilder::new(temp_dir.path()).open().unwrap();
    (backend, temp_dir)
}

#[test]
fn every_dispatch_is_written_through() {
    let (backend, temp) = setup_backend();
    let mut store = Store::open_at(backend, STORAGE_KEY, NOW);
    assert_eq!(store.load_outcome(), LoadOutcome::Fresh);

    let quest_id = store.state().quests[0].id.clone();
    store.dispatch_at(Action::TurnInQuest(quest_id.clone()), NOW + 10);
    let expected = store.state().clone();
    drop(store);

    let backend = SledKvStoreBuilder::new(temp.path()).open().unwrap();
    let reopened = Store::open_at(backend, STORAGE_KEY, NOW + 20);
    assert_eq!(reopened.load_outcome(), LoadOutcome::Restored);
    assert_eq!(*reopened.state(), expected);
    assert_eq!(reopened.state().xp_total, 150);
    assert!(reopened.state().quest(&quest_id).unwrap().is_completed());
}

#[test]
fn old_schema_version_is_discarded() {
    let (backend, temp) = setup_backend();
    let mut stale = AppState::empty();
    stale.schema_version = 0;
    stale.xp_total = 5_000;
    backend
        .set(STORAGE_KEY, &serialize_state(&stale).unwrap())
        .unwrap();
    drop(backend);

    let backend = SledKvStoreBuilder::new(temp.path()).open().unwrap();
    let store = Store::open_at(backend, STORAGE_KEY, NOW);
    assert_eq!(store.load_outcome(), LoadOutcome::Reseeded { found: 0 });
    assert_eq!(store.state().xp_total, 120);
    assert_eq!(store.state().quests.len(), 3);
    assert_eq!(store.state().effects.len(), 2);
    assert_eq!(store.state().loadouts.len(), 2);

    // the reseeded state replaced the stale blob
    let blob = store.backend().get(STORAGE_KEY).unwrap().unwrap();
    assert_eq!(parse_state(&blob).unwrap().xp_total, 120);
}

#[test]
fn state_round_trips_through_json() {
    let (backend, _temp) = setup_backend();
    let mut store = Store::open_at(backend, STORAGE_KEY, NOW);
    let loadout_id = store.state().loadouts[0].id.clone();
    store.dispatch_at(Action::EquipLoadout(loadout_id.clone()), NOW);
    store.dispatch_at(
        Action::ToggleChecklistItem {
            loadout_id,
            item: "Towel".into(),
        },
        NOW,
    );

    let blob = serialize_state(store.state()).unwrap();
    assert_eq!(parse_state(&blob).unwrap(), *store.state());
}

#[test]
fn custom_key_is_isolated() {
    let (backend, temp) = setup_backend();
    let mut store = Store::open_at(backend, "profile_b", NOW);
    store.dispatch_at(Action::LoadState(AppState::empty()), NOW);
    drop(store);

    let backend = SledKvStoreBuilder::new(temp.path()).open().unwrap();
    let default_profile = Store::open_at(backend, STORAGE_KEY, NOW);
    assert_eq!(default_profile.load_outcome(), LoadOutcome::Fresh);
    assert!(default_profile.backend().get("profile_b").unwrap().is_some());
}

#[test]
fn exported_json_uses_persisted_field_names() {
    let (backend, _temp) = setup_backend();
    let store = Store::open_at(backend, STORAGE_KEY, NOW);
    let json = store.export_json().unwrap();
    let fields = [
        "schemaVersion",
        "xpTotal",
        "quests",
        "effects",
        "loadouts",
        "checklistChecked",
        "isEquipped",
        "durationMin",
    ];
    for field in fields {
        assert!(json.contains(field), "missing {field}");
    }
}

#[test]
fn far_future_effect_in_stored_blob_is_handled() {
    let (backend, temp) = setup_backend();
    let blob = r#"{
        "schemaVersion": 1,
        "xpTotal": 10,
        "quests": [],
        "effects": [{
            "id": "e1",
            "name": "Clock skew",
            "kind": "buff",
            "intensity": 2,
            "startAt": 9223372036854775000,
            "durationMin": 10
        }],
        "loadouts": []
    }"#;
    backend.set(STORAGE_KEY, blob).unwrap();
    drop(backend);

    let backend = SledKvStoreBuilder::new(temp.path()).open().unwrap();
    let mut store = Store::open_at(backend, STORAGE_KEY, NOW);
    assert_eq!(store.load_outcome(), LoadOutcome::Restored);

    let effect = &store.state().effects[0];
    assert_eq!(active_effects(store.state(), NOW).len(), 1);
    assert!(expired_effects(store.state(), NOW).is_empty());
    assert!(effect_remaining_ms(effect, NOW) > 0);

    store.dispatch_at(Action::ClearExpiredEffects, NOW);
    assert_eq!(store.state().effects.len(), 1);
}
