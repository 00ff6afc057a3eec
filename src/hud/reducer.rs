//! The state transition function.
//!
//! [`reduce`] borrows the current snapshot and returns a new one, so a prior
//! snapshot held by a caller is never touched. Actions naming a quest, step,
//! effect or loadout that does not exist leave the state as it was, with one
//! exception: [`Action::EquipLoadout`] always rewrites every loadout's equipped
//! flag, so an unknown id un-equips everything.

use crate::hud::seed::create_seed_data;
use crate::hud::types::{AppState, Effect, Loadout, Quest, QuestStatus, QuestStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LoadState(AppState),
    ResetData,

    AddQuest(Quest),
    UpdateQuest(Quest),
    DeleteQuest(String),
    ActivateQuest(String),
    CompleteStep { quest_id: String, step_id: String },
    ToggleStep { quest_id: String, step_id: String },
    AddStep { quest_id: String, step: QuestStep },
    MoveStep { quest_id: String, step_id: String, direction: StepDirection },
    DeleteStep { quest_id: String, step_id: String },
    TurnInQuest(String),

    AddEffect(Effect),
    DeleteEffect(String),
    ReUpEffect { id: String, new_id: String },
    ClearExpiredEffects,

    AddLoadout(Loadout),
    UpdateLoadout(Loadout),
    DeleteLoadout(String),
    EquipLoadout(String),
    ToggleChecklistItem { loadout_id: String, item: String },
}

impl Action {
    /// Short tag for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Action::LoadState(_) => "LOAD_STATE",
            Action::ResetData => "RESET_DATA",
            Action::AddQuest(_) => "ADD_QUEST",
            Action::UpdateQuest(_) => "UPDATE_QUEST",
            Action::DeleteQuest(_) => "DELETE_QUEST",
            Action::ActivateQuest(_) => "ACTIVATE_QUEST",
            Action::CompleteStep { .. } => "COMPLETE_STEP",
            Action::ToggleStep { .. } => "TOGGLE_STEP",
            Action::AddStep { .. } => "ADD_STEP",
            Action::MoveStep { .. } => "MOVE_STEP",
            Action::DeleteStep { .. } => "DELETE_STEP",
            Action::TurnInQuest(_) => "TURN_IN_QUEST",
            Action::AddEffect(_) => "ADD_EFFECT",
            Action::DeleteEffect(_) => "DELETE_EFFECT",
            Action::ReUpEffect { .. } => "RE_UP_EFFECT",
            Action::ClearExpiredEffects => "CLEAR_EXPIRED_EFFECTS",
            Action::AddLoadout(_) => "ADD_LOADOUT",
            Action::UpdateLoadout(_) => "UPDATE_LOADOUT",
            Action::DeleteLoadout(_) => "DELETE_LOADOUT",
            Action::EquipLoadout(_) => "EQUIP_LOADOUT",
            Action::ToggleChecklistItem { .. } => "TOGGLE_CHECKLIST_ITEM",
        }
    }
}

/// Apply `action` to `state` at wall-clock `now` (epoch milliseconds).
pub fn reduce(state: &AppState, action: Action, now: i64) -> AppState {
    match action {
        Action::LoadState(next) => next,
        Action::ResetData => create_seed_data(now),

        Action::AddQuest(quest) => {
            let mut next = state.clone();
            next.quests.push(quest);
            next
        }
        Action::UpdateQuest(mut quest) => {
            if state.quest(&quest.id).is_none() {
                return state.clone();
            }
            quest.touch(now);
            let mut next = state.clone();
            for slot in next.quests.iter_mut().filter(|q| q.id == quest.id) {
                *slot = quest.clone();
            }
            next
        }
        Action::DeleteQuest(id) => {
            let mut next = state.clone();
            next.quests.retain(|q| q.id != id);
            next
        }
        Action::ActivateQuest(id) => edit_quest(state, &id, now, |quest| {
            if quest.status != QuestStatus::Backlog {
                return false;
            }
            quest.status = QuestStatus::Active;
            true
        }),
        Action::CompleteStep { quest_id, step_id } => edit_quest(state, &quest_id, now, |quest| {
            for step in quest.steps.iter_mut().filter(|s| s.id == step_id) {
                step.done = true;
            }
            true
        }),
        Action::ToggleStep { quest_id, step_id } => edit_quest(state, &quest_id, now, |quest| {
            match quest.steps.iter_mut().find(|s| s.id == step_id) {
                Some(step) => {
                    step.done = !step.done;
                    true
                }
                None => false,
            }
        }),
        Action::AddStep { quest_id, step } => edit_quest(state, &quest_id, now, |quest| {
            quest.steps.push(step);
            true
        }),
        Action::MoveStep {
            quest_id,
            step_id,
            direction,
        } => edit_quest(state, &quest_id, now, |quest| {
            move_step(&mut quest.steps, &step_id, direction)
        }),
        Action::DeleteStep { quest_id, step_id } => edit_quest(state, &quest_id, now, |quest| {
            // A quest keeps at least one step.
            if quest.steps.len() <= 1 || !quest.steps.iter().any(|s| s.id == step_id) {
                return false;
            }
            quest.steps.retain(|s| s.id != step_id);
            true
        }),
        Action::TurnInQuest(id) => turn_in_quest(state, &id, now),

        Action::AddEffect(effect) => {
            let mut next = state.clone();
            next.effects.push(effect);
            next
        }
        Action::DeleteEffect(id) => {
            let mut next = state.clone();
            next.effects.retain(|e| e.id != id);
            next
        }
        Action::ReUpEffect { id, new_id } => {
            let Some(original) = state.effect(&id) else {
                return state.clone();
            };
            let mut renewed = original.clone();
            renewed.id = new_id;
            renewed.start_at = now;
            let mut next = state.clone();
            next.effects.retain(|e| e.id != id);
            next.effects.push(renewed);
            next
        }
        Action::ClearExpiredEffects => {
            let mut next = state.clone();
            next.effects.retain(|e| e.is_active_at(now));
            next
        }

        Action::AddLoadout(loadout) => {
            let mut next = state.clone();
            next.loadouts.push(loadout);
            next
        }
        Action::UpdateLoadout(loadout) => {
            let mut next = state.clone();
            for slot in next.loadouts.iter_mut().filter(|l| l.id == loadout.id) {
                *slot = loadout.clone();
            }
            next
        }
        Action::DeleteLoadout(id) => {
            let mut next = state.clone();
            next.loadouts.retain(|l| l.id != id);
            next
        }
        Action::EquipLoadout(id) => {
            let mut next = state.clone();
            for loadout in next.loadouts.iter_mut() {
                loadout.is_equipped = loadout.id == id;
            }
            next
        }
        Action::ToggleChecklistItem { loadout_id, item } => {
            let mut next = state.clone();
            if let Some(loadout) = next.loadouts.iter_mut().find(|l| l.id == loadout_id) {
                if !loadout.checklist_checked.remove(&item) {
                    loadout.checklist_checked.insert(item);
                }
            }
            next
        }
    }
}

/// Run `edit` against the matching quest of a cloned state. When `edit` reports a
/// change the quest's `updated_at` is refreshed; otherwise the original is
/// returned as-is.
fn edit_quest<F>(state: &AppState, quest_id: &str, now: i64, edit: F) -> AppState
where
    F: FnOnce(&mut Quest) -> bool,
{
    let mut next = state.clone();
    let Some(quest) = next.quests.iter_mut().find(|q| q.id == quest_id) else {
        return state.clone();
    };
    if !edit(quest) {
        return state.clone();
    }
    quest.touch(now);
    next
}

fn move_step(steps: &mut [QuestStep], step_id: &str, direction: StepDirection) -> bool {
    let Some(index) = steps.iter().position(|s| s.id == step_id) else {
        return false;
    };
    let swap_with = match direction {
        StepDirection::Up if index > 0 => index - 1,
        StepDirection::Down if index + 1 < steps.len() => index + 1,
        _ => return false,
    };
    steps.swap(index, swap_with);
    true
}

fn turn_in_quest(state: &AppState, id: &str, now: i64) -> AppState {
    let Some(quest) = state.quest(id) else {
        return state.clone();
    };
    // XP is credited once; re-issuing against a completed quest changes nothing.
    if quest.is_completed() {
        return state.clone();
    }
    let reward = quest.xp_reward;
    let mut next = state.clone();
    next.xp_total = next.xp_total.saturating_add(reward);
    for quest in next.quests.iter_mut().filter(|q| q.id == id) {
        quest.status = QuestStatus::Completed;
        quest.touch(now);
    }
    next
}
