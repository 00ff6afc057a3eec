use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Version tag written into every persisted state blob. A blob carrying any other
/// value is discarded on load.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Milliseconds per minute, used for effect duration math.
pub const MS_PER_MINUTE: i64 = 60_000;

/// XP needed to advance one level.
pub const XP_PER_LEVEL: u64 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    Backlog,
    Active,
    Completed,
}

impl QuestStatus {
    pub fn label(&self) -> &'static str {
        match self {
            QuestStatus::Backlog => "backlog",
            QuestStatus::Active => "active",
            QuestStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Med,
    High,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Med => "med",
            Priority::High => "high",
        }
    }

    /// Parse the lowercase wire label (`low`, `med`, `high`).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "med" | "medium" => Some(Priority::Med),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Buff,
    Debuff,
}

impl EffectKind {
    pub fn label(&self) -> &'static str {
        match self {
            EffectKind::Buff => "buff",
            EffectKind::Debuff => "debuff",
        }
    }
}

/// Built-in effect templates an effect may have been created from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PresetKey {
    Caffeine,
    Alcohol,
    SleepInertia,
}

impl PresetKey {
    pub fn label(&self) -> &'static str {
        match self {
            PresetKey::Caffeine => "caffeine",
            PresetKey::Alcohol => "alcohol",
            PresetKey::SleepInertia => "sleep_inertia",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuestStep {
    pub id: String,
    pub text: String,
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_window: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl QuestStep {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            done: false,
            location_label: None,
            time_window: None,
            notes: None,
        }
    }

    pub fn with_location(mut self, label: impl Into<String>) -> Self {
        self.location_label = Some(label.into());
        self
    }

    pub fn with_time_window(mut self, window: impl Into<String>) -> Self {
        self.time_window = Some(window.into());
        self
    }

    pub fn done(mut self) -> Self {
        self.done = true;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: QuestStatus,
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    pub steps: Vec<QuestStep>,
    pub xp_reward: u64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Quest {
    pub fn new(id: impl Into<String>, title: impl Into<String>, xp_reward: u64, now: i64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            status: QuestStatus::Backlog,
            priority: Priority::Med,
            tags: Vec::new(),
            steps: Vec::new(),
            xp_reward,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == QuestStatus::Completed
    }

    /// Refresh `updated_at`, never moving it behind `created_at`.
    pub fn touch(&mut self, now: i64) {
        self.updated_at = now.max(self.created_at);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    pub id: String,
    pub name: String,
    pub kind: EffectKind,
    pub intensity: u8,
    pub start_at: i64,
    pub duration_min: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_key: Option<PresetKey>,
}

impl Effect {
    /// Wall-clock millisecond at which the effect wears off.
    /// Saturates at `i64::MAX` for out-of-range persisted values.
    pub fn end_at(&self) -> i64 {
        self.start_at
            .saturating_add(i64::from(self.duration_min).saturating_mul(MS_PER_MINUTE))
    }

    pub fn is_active_at(&self, now: i64) -> bool {
        self.end_at() > now
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoadoutSlots {
    #[serde(default)]
    pub headwear: String,
    #[serde(default)]
    pub top: String,
    #[serde(default)]
    pub outerwear: String,
    #[serde(default)]
    pub bottom: String,
    #[serde(default)]
    pub footwear: String,
    #[serde(default)]
    pub accessory: String,
    #[serde(default)]
    pub bag: String,
}

impl LoadoutSlots {
    /// Slot name and item pairs in display order.
    pub fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("headwear", self.headwear.as_str()),
            ("top", self.top.as_str()),
            ("outerwear", self.outerwear.as_str()),
            ("bottom", self.bottom.as_str()),
            ("footwear", self.footwear.as_str()),
            ("accessory", self.accessory.as_str()),
            ("bag", self.bag.as_str()),
        ]
    }

    pub fn filled(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries().into_iter().filter(|(_, item)| !item.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Loadout {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub context_tags: Vec<String>,
    pub slots: LoadoutSlots,
    #[serde(default)]
    pub checklist: Vec<String>,
    /// Checked entries, keyed by the literal checklist text. Renaming an item
    /// orphans its checked state.
    #[serde(default)]
    pub checklist_checked: BTreeSet<String>,
    #[serde(default)]
    pub is_equipped: bool,
}

impl Loadout {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            context_tags: Vec::new(),
            slots: LoadoutSlots::default(),
            checklist: Vec::new(),
            checklist_checked: BTreeSet::new(),
            is_equipped: false,
        }
    }

    pub fn is_checked(&self, item: &str) -> bool {
        self.checklist_checked.contains(item)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub schema_version: u32,
    pub xp_total: u64,
    #[serde(default)]
    pub quests: Vec<Quest>,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub loadouts: Vec<Loadout>,
}

impl AppState {
    /// An empty state at the current schema version.
    pub fn empty() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            xp_total: 0,
            quests: Vec::new(),
            effects: Vec::new(),
            loadouts: Vec::new(),
        }
    }

    pub fn quest(&self, id: &str) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == id)
    }

    pub fn effect(&self, id: &str) -> Option<&Effect> {
        self.effects.iter().find(|e| e.id == id)
    }

    pub fn loadout(&self, id: &str) -> Option<&Loadout> {
        self.loadouts.iter().find(|l| l.id == id)
    }
}
