//! Input validation for entity drafts.
//!
//! The reducer trusts its payloads, so callers build quests, effects and loadouts
//! through these drafts first. Each `build` trims text, drops blank entries and
//! rejects input the rest of the core assumes never happens (untitled quests,
//! quests without steps, intensities outside 1..=5).

use std::collections::BTreeSet;

use crate::hud::ids::generate_id;
use crate::hud::types::{
    Effect, EffectKind, Loadout, LoadoutSlots, Priority, Quest, QuestStatus, QuestStep,
};

pub const MIN_INTENSITY: u8 = 1;
pub const MAX_INTENSITY: u8 = 5;
pub const DEFAULT_XP_REWARD: u64 = 25;

/// Validation errors with helpful messages
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required")]
    MissingTitle,

    #[error("At least one step is required")]
    NoSteps,

    #[error("XP reward must be positive")]
    ZeroXp,

    #[error("Name is required")]
    MissingName,

    #[error("Intensity must be between 1 and 5 (got {0})")]
    IntensityOutOfRange(u8),

    #[error("Duration must be at least one minute")]
    ZeroDuration,
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn non_blank_opt(value: Option<&str>) -> Option<String> {
    value.and_then(non_blank)
}

/// Split a comma separated tag list, trimming and dropping empties and repeats
/// while keeping first-seen order.
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.to_string()))
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct StepDraft {
    pub text: String,
    pub location_label: Option<String>,
    pub time_window: Option<String>,
    pub notes: Option<String>,
}

impl StepDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// `None` when the step text is blank.
    pub fn build(&self) -> Option<QuestStep> {
        let text = non_blank(&self.text)?;
        Some(QuestStep {
            id: generate_id(),
            text,
            done: false,
            location_label: non_blank_opt(self.location_label.as_deref()),
            time_window: non_blank_opt(self.time_window.as_deref()),
            notes: non_blank_opt(self.notes.as_deref()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct QuestDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: QuestStatus,
    pub priority: Priority,
    /// Comma separated.
    pub tags: String,
    pub steps: Vec<StepDraft>,
    pub xp_reward: u64,
}

impl Default for QuestDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            status: QuestStatus::Backlog,
            priority: Priority::Med,
            tags: String::new(),
            steps: Vec::new(),
            xp_reward: DEFAULT_XP_REWARD,
        }
    }
}

impl QuestDraft {
    pub fn build(&self, now: i64) -> Result<Quest, ValidationError> {
        let title = non_blank(&self.title).ok_or(ValidationError::MissingTitle)?;
        let steps: Vec<QuestStep> = self.steps.iter().filter_map(StepDraft::build).collect();
        if steps.is_empty() {
            return Err(ValidationError::NoSteps);
        }
        if self.xp_reward == 0 {
            return Err(ValidationError::ZeroXp);
        }
        Ok(Quest {
            id: generate_id(),
            title,
            description: non_blank_opt(self.description.as_deref()),
            status: self.status,
            priority: self.priority,
            tags: parse_tags(&self.tags),
            steps,
            xp_reward: self.xp_reward,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone)]
pub struct EffectDraft {
    pub name: String,
    pub kind: EffectKind,
    pub intensity: u8,
    pub duration_min: u32,
    pub notes: Option<String>,
}

impl EffectDraft {
    pub fn build(&self, now: i64) -> Result<Effect, ValidationError> {
        let name = non_blank(&self.name).ok_or(ValidationError::MissingName)?;
        if !(MIN_INTENSITY..=MAX_INTENSITY).contains(&self.intensity) {
            return Err(ValidationError::IntensityOutOfRange(self.intensity));
        }
        if self.duration_min == 0 {
            return Err(ValidationError::ZeroDuration);
        }
        Ok(Effect {
            id: generate_id(),
            name,
            kind: self.kind,
            intensity: self.intensity,
            start_at: now,
            duration_min: self.duration_min,
            tags: Vec::new(),
            notes: non_blank_opt(self.notes.as_deref()),
            preset_key: None,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadoutDraft {
    pub name: String,
    /// Comma separated.
    pub context_tags: String,
    pub slots: LoadoutSlots,
    pub checklist: Vec<String>,
}

impl From<&Loadout> for LoadoutDraft {
    /// Draft pre-filled from an existing loadout, for editing.
    fn from(loadout: &Loadout) -> Self {
        Self {
            name: loadout.name.clone(),
            context_tags: loadout.context_tags.join(", "),
            slots: loadout.slots.clone(),
            checklist: loadout.checklist.clone(),
        }
    }
}

impl LoadoutDraft {
    /// Build a new, unequipped loadout.
    pub fn build(&self) -> Result<Loadout, ValidationError> {
        self.build_with_id(generate_id())
    }

    /// Rebuild an existing loadout from edited fields. Checked entries whose text
    /// is still on the checklist stay checked; the equipped flag is kept.
    pub fn rebuild(&self, existing: &Loadout) -> Result<Loadout, ValidationError> {
        let mut loadout = self.build_with_id(existing.id.clone())?;
        loadout.is_equipped = existing.is_equipped;
        loadout.checklist_checked = existing
            .checklist_checked
            .iter()
            .filter(|item| loadout.checklist.contains(item))
            .cloned()
            .collect();
        Ok(loadout)
    }

    fn build_with_id(&self, id: String) -> Result<Loadout, ValidationError> {
        let name = non_blank(&self.name).ok_or(ValidationError::MissingName)?;
        let trim = |s: &String| s.trim().to_string();
        Ok(Loadout {
            id,
            name,
            context_tags: parse_tags(&self.context_tags),
            slots: LoadoutSlots {
                headwear: trim(&self.slots.headwear),
                top: trim(&self.slots.top),
                outerwear: trim(&self.slots.outerwear),
                bottom: trim(&self.slots.bottom),
                footwear: trim(&self.slots.footwear),
                accessory: trim(&self.slots.accessory),
                bag: trim(&self.slots.bag),
            },
            checklist: self
                .checklist
                .iter()
                .filter_map(|item| non_blank(item))
                .collect(),
            checklist_checked: BTreeSet::new(),
            is_equipped: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quest_draft() -> QuestDraft {
        QuestDraft {
            title: "  Plan trip ".into(),
            tags: "travel, , fun, travel".into(),
            steps: vec![
                StepDraft::new("Book flights"),
                StepDraft::new("   "),
                StepDraft {
                    text: "Pack".into(),
                    location_label: Some(" Home ".into()),
                    time_window: Some("  ".into()),
                    notes: None,
                },
            ],
            ..QuestDraft::default()
        }
    }

    #[test]
    fn quest_draft_trims_and_drops_blank_steps() {
        let quest = quest_draft().build(42).expect("valid");
        assert_eq!(quest.title, "Plan trip");
        assert_eq!(quest.tags, vec!["travel", "fun"]);
        assert_eq!(quest.steps.len(), 2);
        assert_eq!(quest.steps[1].location_label.as_deref(), Some("Home"));
        assert!(quest.steps[1].time_window.is_none());
        assert_eq!(quest.created_at, 42);
        assert_eq!(quest.updated_at, 42);
        assert_eq!(quest.status, QuestStatus::Backlog);
    }

    #[test]
    fn quest_draft_requires_title_and_steps() {
        let mut draft = quest_draft();
        draft.title = " ".into();
        assert_eq!(draft.build(0), Err(ValidationError::MissingTitle));

        let mut draft = quest_draft();
        draft.steps = vec![StepDraft::new("")];
        assert_eq!(draft.build(0), Err(ValidationError::NoSteps));

        let mut draft = quest_draft();
        draft.xp_reward = 0;
        assert_eq!(draft.build(0), Err(ValidationError::ZeroXp));
    }

    #[test]
    fn effect_draft_checks_intensity_and_duration() {
        let mut draft = EffectDraft {
            name: "Focus".into(),
            kind: EffectKind::Buff,
            intensity: 6,
            duration_min: 30,
            notes: None,
        };
        assert_eq!(draft.build(0), Err(ValidationError::IntensityOutOfRange(6)));
        draft.intensity = 5;
        draft.duration_min = 0;
        assert_eq!(draft.build(0), Err(ValidationError::ZeroDuration));
        draft.duration_min = 30;
        let effect = draft.build(7).expect("valid");
        assert_eq!(effect.start_at, 7);
        assert!(effect.preset_key.is_none());
    }

    #[test]
    fn loadout_rebuild_keeps_checks_for_surviving_items() {
        let mut existing = Loadout::new("l1", "Travel");
        existing.checklist = vec!["Passport".into(), "Charger".into()];
        existing.checklist_checked.insert("Passport".into());
        existing.checklist_checked.insert("Charger".into());
        existing.is_equipped = true;

        let draft = LoadoutDraft {
            name: "Travel".into(),
            checklist: vec!["Passport".into(), "USB-C charger".into(), " ".into()],
            ..LoadoutDraft::default()
        };
        let rebuilt = draft.rebuild(&existing).expect("valid");
        assert_eq!(rebuilt.id, "l1");
        assert!(rebuilt.is_equipped);
        assert_eq!(rebuilt.checklist.len(), 2);
        assert!(rebuilt.is_checked("Passport"));
        assert!(!rebuilt.is_checked("Charger"));
    }

    #[test]
    fn unedited_draft_rebuilds_the_same_loadout() {
        let mut existing = Loadout::new("l1", "Gym Set");
        existing.context_tags = vec!["gym".into(), "morning".into()];
        existing.slots.footwear = "Trainers".into();
        existing.checklist = vec!["Towel".into()];
        existing.checklist_checked.insert("Towel".into());

        let rebuilt = LoadoutDraft::from(&existing).rebuild(&existing).expect("valid");
        assert_eq!(rebuilt, existing);
    }

    #[test]
    fn loadout_requires_name() {
        assert_eq!(
            LoadoutDraft::default().build(),
            Err(ValidationError::MissingName)
        );
    }
}
