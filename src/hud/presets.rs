//! Built-in effect templates for quick-adding common buffs and debuffs.

use crate::hud::ids::generate_id;
use crate::hud::types::{Effect, EffectKind, PresetKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectPreset {
    pub key: PresetKey,
    pub name: &'static str,
    pub kind: EffectKind,
    pub intensity: u8,
    pub duration_min: u32,
}

pub const EFFECT_PRESETS: [EffectPreset; 3] = [
    EffectPreset {
        key: PresetKey::Caffeine,
        name: "Caffeine",
        kind: EffectKind::Buff,
        intensity: 3,
        duration_min: 300, // 5 hours
    },
    EffectPreset {
        key: PresetKey::Alcohol,
        name: "Alcohol",
        kind: EffectKind::Debuff,
        intensity: 3,
        duration_min: 480, // 8 hours
    },
    EffectPreset {
        key: PresetKey::SleepInertia,
        name: "Sleep Inertia",
        kind: EffectKind::Debuff,
        intensity: 2,
        duration_min: 45,
    },
];

pub fn get_preset(key: PresetKey) -> &'static EffectPreset {
    // Every PresetKey variant has exactly one entry.
    match key {
        PresetKey::Caffeine => &EFFECT_PRESETS[0],
        PresetKey::Alcohol => &EFFECT_PRESETS[1],
        PresetKey::SleepInertia => &EFFECT_PRESETS[2],
    }
}

/// Look up a preset by its wire label (`caffeine`, `alcohol`, `sleep_inertia`).
pub fn find_preset(label: &str) -> Option<&'static EffectPreset> {
    let wanted = label.trim().to_ascii_lowercase();
    EFFECT_PRESETS.iter().find(|p| p.key.label() == wanted)
}

impl EffectPreset {
    /// Start a fresh effect from this template at `now`.
    pub fn start(&self, now: i64) -> Effect {
        Effect {
            id: generate_id(),
            name: self.name.to_string(),
            kind: self.kind,
            intensity: self.intensity,
            start_at: now,
            duration_min: self.duration_min,
            tags: Vec::new(),
            notes: None,
            preset_key: Some(self.key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_preset_matches_key() {
        for preset in EFFECT_PRESETS.iter() {
            assert_eq!(get_preset(preset.key).key, preset.key);
        }
    }

    #[test]
    fn find_preset_by_label() {
        let preset = find_preset("sleep_inertia").expect("preset");
        assert_eq!(preset.duration_min, 45);
        assert_eq!(preset.kind, EffectKind::Debuff);
        assert!(find_preset("espresso").is_none());
    }

    #[test]
    fn started_effect_carries_preset_fields() {
        let effect = get_preset(PresetKey::Alcohol).start(10_000);
        assert_eq!(effect.name, "Alcohol");
        assert_eq!(effect.start_at, 10_000);
        assert_eq!(effect.duration_min, 480);
        assert_eq!(effect.preset_key, Some(PresetKey::Alcohol));
        assert!(effect.tags.is_empty());
    }
}
