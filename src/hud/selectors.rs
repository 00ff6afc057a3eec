//! Read-only views derived from an [`AppState`] snapshot.
//!
//! Every selector is a plain function over borrowed state. Effect selectors take
//! the caller's notion of "now", so evaluating them again later against the same
//! snapshot may move effects from active to expired.

use std::collections::BTreeMap;

use crate::hud::types::{
    AppState, Effect, Loadout, Priority, Quest, QuestStatus, QuestStep, XP_PER_LEVEL,
};

fn quests_with_status(state: &AppState, status: QuestStatus) -> Vec<&Quest> {
    state.quests.iter().filter(|q| q.status == status).collect()
}

pub fn active_quests(state: &AppState) -> Vec<&Quest> {
    quests_with_status(state, QuestStatus::Active)
}

pub fn backlog_quests(state: &AppState) -> Vec<&Quest> {
    quests_with_status(state, QuestStatus::Backlog)
}

pub fn completed_quests(state: &AppState) -> Vec<&Quest> {
    quests_with_status(state, QuestStatus::Completed)
}

/// First unfinished step in stored order.
pub fn next_step(quest: &Quest) -> Option<&QuestStep> {
    quest.steps.iter().find(|s| !s.done)
}

/// `(done, total)` step counts.
pub fn step_progress(quest: &Quest) -> (usize, usize) {
    let done = quest.steps.iter().filter(|s| s.done).count();
    (done, quest.steps.len())
}

/// The equipped loadout, if any. Reads the at-most-one invariant, does not enforce it.
pub fn equipped_loadout(state: &AppState) -> Option<&Loadout> {
    state.loadouts.iter().find(|l| l.is_equipped)
}

pub fn active_effects(state: &AppState, now: i64) -> Vec<&Effect> {
    state.effects.iter().filter(|e| e.is_active_at(now)).collect()
}

pub fn expired_effects(state: &AppState, now: i64) -> Vec<&Effect> {
    state.effects.iter().filter(|e| !e.is_active_at(now)).collect()
}

/// Milliseconds until the effect wears off, zero once expired.
pub fn effect_remaining_ms(effect: &Effect, now: i64) -> i64 {
    effect.end_at().saturating_sub(now).max(0)
}

/// Elapsed share of the effect's duration, clamped to `0.0..=1.0`.
pub fn effect_progress(effect: &Effect, now: i64) -> f64 {
    let total = effect.end_at().saturating_sub(effect.start_at);
    if total <= 0 {
        return 1.0;
    }
    let elapsed = now.saturating_sub(effect.start_at) as f64 / total as f64;
    elapsed.clamp(0.0, 1.0)
}

pub fn level(xp_total: u64) -> u64 {
    xp_total / XP_PER_LEVEL + 1
}

pub fn xp_progress(xp_total: u64) -> u64 {
    xp_total % XP_PER_LEVEL
}

fn matches_query(quest: &Quest, needle: &str) -> bool {
    quest.title.to_lowercase().contains(needle)
        || quest
            .steps
            .iter()
            .any(|s| s.text.to_lowercase().contains(needle))
}

/// Narrow a quest list by a case-insensitive text query (title or any step text)
/// and an optional priority. An empty query matches everything.
pub fn filter_quests<'a>(
    quests: &[&'a Quest],
    query: &str,
    priority: Option<Priority>,
) -> Vec<&'a Quest> {
    let needle = query.trim().to_lowercase();
    quests
        .iter()
        .copied()
        .filter(|q| needle.is_empty() || matches_query(q, &needle))
        .filter(|q| priority.map_or(true, |p| q.priority == p))
        .collect()
}

/// A pending step pinned to a named place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationMarker<'a> {
    pub quest: &'a Quest,
    pub step_text: &'a str,
}

/// Pending steps with a location label across active and backlog quests, grouped
/// by label.
pub fn location_markers(state: &AppState) -> BTreeMap<&str, Vec<LocationMarker<'_>>> {
    let mut markers: BTreeMap<&str, Vec<LocationMarker<'_>>> = BTreeMap::new();
    let open = active_quests(state)
        .into_iter()
        .chain(backlog_quests(state));
    for quest in open {
        for step in quest.steps.iter().filter(|s| !s.done) {
            if let Some(label) = step.location_label.as_deref() {
                markers.entry(label).or_default().push(LocationMarker {
                    quest,
                    step_text: &step.text,
                });
            }
        }
    }
    markers
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Quest,
    Effect,
    Loadout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub kind: SearchKind,
    pub id: String,
    pub title: String,
    pub subtitle: String,
}

/// Global search over quests (title or step text), effect names and loadout names.
/// Hits are grouped quests, effects, loadouts, each in stored order.
pub fn search(state: &AppState, query: &str) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let quests = state
        .quests
        .iter()
        .filter(|q| matches_query(q, &needle))
        .map(|q| SearchHit {
            kind: SearchKind::Quest,
            id: q.id.clone(),
            title: q.title.clone(),
            subtitle: format!("{} • {} steps", q.status.label(), q.steps.len()),
        });
    let effects = state
        .effects
        .iter()
        .filter(|e| e.name.to_lowercase().contains(&needle))
        .map(|e| SearchHit {
            kind: SearchKind::Effect,
            id: e.id.clone(),
            title: e.name.clone(),
            subtitle: e.kind.label().to_string(),
        });
    let loadouts = state
        .loadouts
        .iter()
        .filter(|l| l.name.to_lowercase().contains(&needle))
        .map(|l| SearchHit {
            kind: SearchKind::Loadout,
            id: l.id.clone(),
            title: l.name.clone(),
            subtitle: if l.is_equipped { "Equipped".to_string() } else { String::new() },
        });

    quests.chain(effects).chain(loadouts).collect()
}
