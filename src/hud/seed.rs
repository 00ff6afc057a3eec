//! Starter dataset used on first run and on explicit reset.
//!
//! The shape is fixed (three quests, two effects, two loadouts, 120 XP) while ids
//! are freshly generated on every call, so two seeds never share entity ids.

use crate::hud::ids::generate_id;
use crate::hud::presets::get_preset;
use crate::hud::types::{
    AppState, Loadout, LoadoutSlots, PresetKey, Priority, Quest, QuestStatus, QuestStep,
    CURRENT_SCHEMA_VERSION, MS_PER_MINUTE,
};

pub const SEED_XP_TOTAL: u64 = 120;

const MS_PER_DAY: i64 = 86_400_000;

fn step(text: &str) -> QuestStep {
    QuestStep::new(generate_id(), text)
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn seed_quests(now: i64) -> Vec<Quest> {
    let mut quests = Vec::new();

    let mut groceries = Quest::new(generate_id(), "Weekly Grocery Run", 30, now - MS_PER_DAY);
    groceries.description =
        Some("Get essentials for the week including healthy meal prep ingredients".to_string());
    groceries.status = QuestStatus::Active;
    groceries.priority = Priority::High;
    groceries.tags = tags(&["errands", "health"]);
    groceries.steps = vec![
        step("Check pantry and make list").done(),
        step("Pick up vegetables and proteins").with_location("Trader Joe's"),
        step("Get coffee beans and snacks").with_location("Whole Foods"),
    ];
    groceries.updated_at = now;
    quests.push(groceries);

    let mut workout = Quest::new(generate_id(), "Morning Workout Routine", 25, now - 2 * MS_PER_DAY);
    workout.description = Some("Complete the full gym session as planned".to_string());
    workout.status = QuestStatus::Active;
    workout.priority = Priority::Med;
    workout.tags = tags(&["fitness", "daily"]);
    workout.steps = vec![
        step("15 min cardio warmup")
            .with_location("Gym")
            .with_time_window("6:00 AM - 6:15 AM")
            .done(),
        step("Upper body strength training").with_location("Gym"),
        step("Cool down and stretch"),
    ];
    workout.updated_at = now;
    quests.push(workout);

    let mut presentation =
        Quest::new(generate_id(), "Ship Client Presentation", 50, now - 3 * MS_PER_DAY);
    presentation.description = Some("Finalize and send the Q1 review deck".to_string());
    presentation.status = QuestStatus::Backlog;
    presentation.priority = Priority::High;
    presentation.tags = tags(&["work", "deadline"]);
    presentation.steps = vec![
        step("Review slide content"),
        step("Add final metrics"),
        step("Send to client"),
    ];
    presentation.updated_at = now;
    quests.push(presentation);

    quests
}

fn seed_loadouts() -> Vec<Loadout> {
    let mut gym = Loadout::new(generate_id(), "Gym Set");
    gym.context_tags = tags(&["fitness", "morning"]);
    gym.slots = LoadoutSlots {
        headwear: "Baseball Cap".to_string(),
        top: "Dry-fit Tank".to_string(),
        outerwear: "Zip Hoodie".to_string(),
        bottom: "Athletic Shorts".to_string(),
        footwear: "Running Shoes".to_string(),
        accessory: "Fitness Watch".to_string(),
        bag: "Gym Duffel".to_string(),
    };
    gym.checklist = tags(&["Water bottle", "Towel", "Earbuds", "Protein bar"]);
    gym.checklist_checked.insert("Water bottle".to_string());

    let mut meeting = Loadout::new(generate_id(), "Meeting Set");
    meeting.context_tags = tags(&["work", "professional"]);
    meeting.slots = LoadoutSlots {
        headwear: String::new(),
        top: "Oxford Shirt".to_string(),
        outerwear: "Blazer".to_string(),
        bottom: "Chinos".to_string(),
        footwear: "Leather Loafers".to_string(),
        accessory: "Watch".to_string(),
        bag: "Laptop Bag".to_string(),
    };
    meeting.checklist = tags(&["Laptop", "Notebook", "Business cards", "Charger"]);
    meeting.checklist_checked.insert("Laptop".to_string());
    meeting.checklist_checked.insert("Notebook".to_string());
    meeting.is_equipped = true;

    vec![gym, meeting]
}

/// Build the starter dataset relative to `now` (epoch milliseconds).
pub fn create_seed_data(now: i64) -> AppState {
    let mut caffeine = get_preset(PresetKey::Caffeine).start(now - 30 * MS_PER_MINUTE);
    caffeine.tags = tags(&["energy"]);
    let mut inertia = get_preset(PresetKey::SleepInertia).start(now - 15 * MS_PER_MINUTE);
    inertia.tags = tags(&["morning"]);

    AppState {
        schema_version: CURRENT_SCHEMA_VERSION,
        xp_total: SEED_XP_TOTAL,
        quests: seed_quests(now),
        effects: vec![caffeine, inertia],
        loadouts: seed_loadouts(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seed_has_expected_shape() {
        let state = create_seed_data(1_700_000_000_000);
        assert_eq!(state.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(state.xp_total, 120);
        assert_eq!(state.quests.len(), 3);
        assert_eq!(state.effects.len(), 2);
        assert_eq!(state.loadouts.len(), 2);
        assert_eq!(state.loadouts.iter().filter(|l| l.is_equipped).count(), 1);
        assert!(state.quests.iter().all(|q| !q.steps.is_empty()));
        assert!(state.quests.iter().all(|q| q.updated_at >= q.created_at));
    }

    #[test]
    fn seeded_effects_are_running() {
        let now = 1_700_000_000_000;
        let state = create_seed_data(now);
        assert!(state.effects.iter().all(|e| e.is_active_at(now)));
    }

    #[test]
    fn reseeding_generates_fresh_ids() {
        let a = create_seed_data(0);
        let b = create_seed_data(0);
        let ids_a: HashSet<&str> = a.quests.iter().map(|q| q.id.as_str()).collect();
        assert!(b.quests.iter().all(|q| !ids_a.contains(q.id.as_str())));
    }
}
