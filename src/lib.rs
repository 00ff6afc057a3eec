//! # LifeHUD - a personal gamification dashboard core
//!
//! LifeHUD models real-life tasks as RPG-style quests, timed buffs and debuffs as
//! effects, and outfit presets as loadouts, and keeps all of it in a local
//! key-value store.
//!
//! ## Features
//!
//! - **Quests**: ordered steps, priorities, tags and an XP reward credited once on turn-in.
//! - **Effects**: intensity 1-5 buffs/debuffs whose active or expired status is derived from wall-clock time.
//! - **Loadouts**: seven equipment slots plus a checklist; at most one loadout is equipped.
//! - **Levels**: 100 XP per level, no cap.
//! - **Persistence**: full-state JSON snapshots in a sled database, reseeded on schema mismatch.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lifehud::hud::{active_quests, level, Action, SledKvStore, Store};
//!
//! fn main() -> Result<(), lifehud::hud::LifeHudError> {
//!     let backend = SledKvStore::open("./data/lifehud")?;
//!     let mut store = Store::open(backend);
//!
//!     let first = active_quests(store.state())[0].id.clone();
//!     store.dispatch(Action::TurnInQuest(first));
//!     println!("Level {}", level(store.state().xp_total));
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`hud`] - domain types, reducer, selectors, store and storage backends
//! - [`validation`] - draft types that check user input before it becomes an action
//! - [`config`] - configuration management
//! - [`logutil`] - helpers for single-line log output

pub mod config;
pub mod hud;
pub mod logutil;
pub mod validation;
