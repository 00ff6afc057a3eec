//! Binary entrypoint for the LifeHUD CLI.
//!
//! Commands:
//! - `init` - create a starter `lifehud.toml`
//! - `status` - level, XP, active quests, running effects and the equipped loadout
//! - `quests [--search q] [--priority p]` - list quests by status
//! - `add-quest`, `activate`, `complete-step`, `turn-in`, `delete-quest` - quest lifecycle
//! - `effect <preset>`, `add-effect`, `re-up`, `clear-expired`, `delete-effect` - effects
//! - `add-loadout`, `edit-loadout`, `delete-loadout`, `equip`, `check` - loadouts
//! - `search <query>`, `export`, `reset`
//!
//! See the library crate docs for module-level details: `lifehud::`.
use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{info, warn};

use lifehud::config::Config;
use lifehud::hud::{
    active_effects, active_quests, backlog_quests, completed_quests, effect_remaining_ms,
    equipped_loadout, expired_effects, filter_quests, find_preset, generate_id, level,
    location_markers, next_step, now_ms, search, step_progress, xp_progress, Action, AppState,
    EffectKind, LoadOutcome, LoadoutSlots, Priority, Quest, QuestStatus, SledKvStore, Store,
    EFFECT_PRESETS,
};
use lifehud::logutil::{escape_log, format_remaining};
use lifehud::validation::{EffectDraft, LoadoutDraft, QuestDraft, StepDraft};

#[derive(Parser)]
#[command(name = "lifehud")]
#[command(about = "Quests, effects and loadouts for real life")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "lifehud.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Buff,
    Debuff,
}

/// Equipment slot values. Omitted slots stay empty on create and unchanged on edit.
#[derive(Args)]
struct SlotArgs {
    #[arg(long)]
    headwear: Option<String>,
    #[arg(long)]
    top: Option<String>,
    #[arg(long)]
    outerwear: Option<String>,
    #[arg(long)]
    bottom: Option<String>,
    #[arg(long)]
    footwear: Option<String>,
    #[arg(long)]
    accessory: Option<String>,
    #[arg(long)]
    bag: Option<String>,
}

impl SlotArgs {
    fn apply(self, slots: &mut LoadoutSlots) {
        let pairs = [
            (self.headwear, &mut slots.headwear),
            (self.top, &mut slots.top),
            (self.outerwear, &mut slots.outerwear),
            (self.bottom, &mut slots.bottom),
            (self.footwear, &mut slots.footwear),
            (self.accessory, &mut slots.accessory),
            (self.bag, &mut slots.bag),
        ];
        for (value, slot) in pairs {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    #[command(flatten)]
    Hud(HudCommand),
}

#[derive(Subcommand)]
enum HudCommand {
    /// Show level, XP, active quests, effects and the equipped loadout
    Status,
    /// Replace all data with the demo dataset
    Reset,
    /// List quests grouped by status
    Quests {
        /// Match against quest titles and step text
        #[arg(short, long, default_value = "")]
        search: String,
        /// Only show quests with this priority (low, med, high)
        #[arg(short, long)]
        priority: Option<String>,
    },
    /// Create a quest
    AddQuest {
        #[arg(short, long)]
        title: String,
        /// Step text; repeat for several steps
        #[arg(short, long = "step", required = true)]
        steps: Vec<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// low, med or high
        #[arg(short, long, default_value = "med")]
        priority: String,
        /// Comma separated tags
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(short, long, default_value_t = 25)]
        xp: u64,
        /// Start the quest as active instead of backlog
        #[arg(long)]
        active: bool,
    },
    /// Move a backlog quest to active
    Activate { quest: String },
    /// Mark a quest step done
    CompleteStep { quest: String, step: String },
    /// Complete a quest and collect its XP
    TurnIn { quest: String },
    /// Remove a quest
    DeleteQuest { quest: String },
    /// Start an effect from a preset (caffeine, alcohol, sleep_inertia)
    Effect { preset: String },
    /// Start a custom effect
    AddEffect {
        #[arg(short, long)]
        name: String,
        #[arg(short, long, value_enum, default_value = "buff")]
        kind: KindArg,
        #[arg(short, long, default_value_t = 3)]
        intensity: u8,
        #[arg(short, long, default_value_t = 60)]
        minutes: u32,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Restart an effect from now
    ReUp { effect: String },
    /// Remove every expired effect
    ClearExpired,
    /// Remove an effect
    DeleteEffect { effect: String },
    /// Create a loadout
    AddLoadout {
        #[arg(short, long)]
        name: String,
        /// Comma separated context tags
        #[arg(long, default_value = "")]
        tags: String,
        #[command(flatten)]
        slots: SlotArgs,
        /// Checklist entry; repeat for several
        #[arg(long = "item")]
        items: Vec<String>,
    },
    /// Change a loadout's name, tags, slots or checklist
    EditLoadout {
        loadout: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(long)]
        tags: Option<String>,
        #[command(flatten)]
        slots: SlotArgs,
        /// Replacement checklist entry; repeat for several
        #[arg(long = "item")]
        items: Vec<String>,
    },
    /// Remove a loadout
    DeleteLoadout { loadout: String },
    /// Equip a loadout (un-equips the others)
    Equip { loadout: String },
    /// Toggle a loadout checklist item
    Check { loadout: String, item: String },
    /// Search quests, effects and loadouts
    Search { query: String },
    /// Print the persisted state as JSON
    Export,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            init_logging(&None, cli.verbose);
            info!("Initializing new LifeHUD configuration");
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
            Ok(())
        }
        Commands::Hud(command) => run(command, &cli.config, cli.verbose).await,
    }
}

async fn run(command: HudCommand, config_path: &str, verbose: u8) -> Result<()> {
    let config = match Config::load(config_path).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} (using defaults; run `lifehud init` to create one)", e);
            Config::default()
        }
    };
    init_logging(&Some(config.clone()), verbose);

    let db_path = config.storage.db_path();
    let backend = SledKvStore::open(&db_path)
        .map_err(|e| anyhow!("Failed to open state database {}: {}", db_path.display(), e))?;
    let mut store = Store::open_with_key(backend, config.storage.state_key.clone());
    match store.load_outcome() {
        LoadOutcome::Reseeded { found } => {
            warn!("Stored data used schema version {}; demo data restored", found)
        }
        LoadOutcome::Unreadable => warn!("Stored data was unreadable; demo data restored"),
        LoadOutcome::StorageUnavailable => {
            warn!("Could not read stored data; showing demo data until the next change")
        }
        LoadOutcome::Fresh | LoadOutcome::Restored => {}
    }

    match command {
        HudCommand::Status => print_status(store.state(), now_ms()),
        HudCommand::Reset => {
            store.dispatch(Action::ResetData);
            println!("Data reset to demo state.");
        }
        HudCommand::Quests { search, priority } => {
            let priority = match priority {
                Some(label) => Some(
                    Priority::from_label(&label)
                        .ok_or_else(|| anyhow!("Unknown priority '{}'", label))?,
                ),
                None => None,
            };
            print_quests(store.state(), &search, priority);
        }
        HudCommand::AddQuest {
            title,
            steps,
            description,
            priority,
            tags,
            xp,
            active,
        } => {
            let draft = QuestDraft {
                title,
                description,
                status: if active { QuestStatus::Active } else { QuestStatus::Backlog },
                priority: Priority::from_label(&priority)
                    .ok_or_else(|| anyhow!("Unknown priority '{}'", priority))?,
                tags,
                steps: steps.into_iter().map(StepDraft::new).collect(),
                xp_reward: xp,
            };
            let quest = draft.build(now_ms())?;
            info!("Created quest {} '{}'", quest.id, escape_log(&quest.title));
            println!("Quest created: {} ({})", quest.title, quest.id);
            store.dispatch(Action::AddQuest(quest));
        }
        HudCommand::Activate { quest } => {
            let found = require_quest(store.state(), &quest)?;
            if found.status != QuestStatus::Backlog {
                println!("'{}' is already {}.", found.title, found.status.label());
                return Ok(());
            }
            store.dispatch(Action::ActivateQuest(quest));
            println!("Quest activated.");
        }
        HudCommand::CompleteStep { quest, step } => {
            let found = require_quest(store.state(), &quest)?;
            if !found.steps.iter().any(|s| s.id == step) {
                return Err(anyhow!("No step '{}' in quest '{}'", step, found.title));
            }
            store.dispatch(Action::CompleteStep {
                quest_id: quest,
                step_id: step,
            });
            println!("Step complete.");
        }
        HudCommand::TurnIn { quest } => {
            let found = require_quest(store.state(), &quest)?;
            if found.is_completed() {
                println!("'{}' was already turned in.", found.title);
                return Ok(());
            }
            let reward = found.xp_reward;
            let state = store.dispatch(Action::TurnInQuest(quest));
            println!(
                "+{} XP! Level {} ({}/100)",
                reward,
                level(state.xp_total),
                xp_progress(state.xp_total)
            );
        }
        HudCommand::DeleteQuest { quest } => {
            let title = require_quest(store.state(), &quest)?.title.clone();
            store.dispatch(Action::DeleteQuest(quest));
            println!("Deleted quest '{}'.", title);
        }
        HudCommand::Effect { preset } => {
            let Some(preset) = find_preset(&preset) else {
                let known: Vec<&str> = EFFECT_PRESETS.iter().map(|p| p.key.label()).collect();
                return Err(anyhow!("Unknown preset '{}' (known: {})", preset, known.join(", ")));
            };
            store.dispatch(Action::AddEffect(preset.start(now_ms())));
            println!("{} effect added.", preset.name);
        }
        HudCommand::AddEffect {
            name,
            kind,
            intensity,
            minutes,
            notes,
        } => {
            let draft = EffectDraft {
                name,
                kind: match kind {
                    KindArg::Buff => EffectKind::Buff,
                    KindArg::Debuff => EffectKind::Debuff,
                },
                intensity,
                duration_min: minutes,
                notes,
            };
            let effect = draft.build(now_ms())?;
            println!("{} added: {}", effect.kind.label(), effect.name);
            store.dispatch(Action::AddEffect(effect));
        }
        HudCommand::ReUp { effect } => {
            if store.state().effect(&effect).is_none() {
                return Err(anyhow!("No effect with id '{}'", effect));
            }
            store.dispatch(Action::ReUpEffect {
                id: effect,
                new_id: generate_id(),
            });
            println!("Effect restarted.");
        }
        HudCommand::ClearExpired => {
            let count = expired_effects(store.state(), now_ms()).len();
            store.dispatch(Action::ClearExpiredEffects);
            println!("Cleared {} expired effect(s).", count);
        }
        HudCommand::DeleteEffect { effect } => {
            let name = store
                .state()
                .effect(&effect)
                .map(|e| e.name.clone())
                .ok_or_else(|| anyhow!("No effect with id '{}'", effect))?;
            store.dispatch(Action::DeleteEffect(effect));
            println!("Removed {}.", name);
        }
        HudCommand::AddLoadout {
            name,
            tags,
            slots,
            items,
        } => {
            let mut draft = LoadoutDraft {
                name,
                context_tags: tags,
                checklist: items,
                ..LoadoutDraft::default()
            };
            slots.apply(&mut draft.slots);
            let loadout = draft.build()?;
            info!("Created loadout {} '{}'", loadout.id, escape_log(&loadout.name));
            println!("Loadout created: {} ({})", loadout.name, loadout.id);
            store.dispatch(Action::AddLoadout(loadout));
        }
        HudCommand::EditLoadout {
            loadout,
            name,
            tags,
            slots,
            items,
        } => {
            let existing = store
                .state()
                .loadout(&loadout)
                .ok_or_else(|| anyhow!("No loadout with id '{}'", loadout))?;
            let mut draft = LoadoutDraft::from(existing);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(tags) = tags {
                draft.context_tags = tags;
            }
            if !items.is_empty() {
                draft.checklist = items;
            }
            slots.apply(&mut draft.slots);
            let updated = draft.rebuild(existing)?;
            println!("{} updated.", updated.name);
            store.dispatch(Action::UpdateLoadout(updated));
        }
        HudCommand::DeleteLoadout { loadout } => {
            let name = store
                .state()
                .loadout(&loadout)
                .map(|l| l.name.clone())
                .ok_or_else(|| anyhow!("No loadout with id '{}'", loadout))?;
            store.dispatch(Action::DeleteLoadout(loadout));
            println!("Deleted loadout {}.", name);
        }
        HudCommand::Equip { loadout } => {
            let name = store
                .state()
                .loadout(&loadout)
                .map(|l| l.name.clone())
                .ok_or_else(|| anyhow!("No loadout with id '{}'", loadout))?;
            store.dispatch(Action::EquipLoadout(loadout));
            println!("{} equipped.", name);
        }
        HudCommand::Check { loadout, item } => {
            let found = store
                .state()
                .loadout(&loadout)
                .ok_or_else(|| anyhow!("No loadout with id '{}'", loadout))?;
            if !found.checklist.contains(&item) {
                warn!(
                    "'{}' is not on the checklist of {}",
                    escape_log(&item),
                    found.name
                );
            }
            let state = store.dispatch(Action::ToggleChecklistItem {
                loadout_id: loadout.clone(),
                item: item.clone(),
            });
            let checked = state.loadout(&loadout).map_or(false, |l| l.is_checked(&item));
            println!("{} {}", if checked { "[x]" } else { "[ ]" }, item);
        }
        HudCommand::Search { query } => {
            info!("search '{}'", escape_log(&query));
            let hits = search(store.state(), &query);
            if hits.is_empty() {
                println!("No results.");
            }
            for hit in hits {
                println!("{:?}\t{}\t{}\t{}", hit.kind, hit.id, hit.title, hit.subtitle);
            }
        }
        HudCommand::Export => println!("{}", store.export_json()?),
    }

    Ok(())
}

fn require_quest<'a>(state: &'a AppState, id: &str) -> Result<&'a Quest> {
    state
        .quest(id)
        .ok_or_else(|| anyhow!("No quest with id '{}'", id))
}

fn print_status(state: &AppState, now: i64) {
    println!(
        "Level {}  XP {} ({}/100)",
        level(state.xp_total),
        state.xp_total,
        xp_progress(state.xp_total)
    );

    println!("\nActive quests:");
    for quest in active_quests(state) {
        let (done, total) = step_progress(quest);
        let next = next_step(quest).map_or("all steps done".to_string(), |s| {
            format!("next: {} [{}]", s.text, s.id)
        });
        println!("  {} {} ({}/{}) - {}", quest.id, quest.title, done, total, next);
    }

    println!("\nEffects:");
    for effect in active_effects(state, now) {
        println!(
            "  {} {} ({} {}) {} left",
            effect.id,
            effect.name,
            effect.kind.label(),
            effect.intensity,
            format_remaining(effect_remaining_ms(effect, now))
        );
    }
    let expired = expired_effects(state, now).len();
    if expired > 0 {
        println!("  ({} expired; `lifehud clear-expired` removes them)", expired);
    }

    println!("\nEquipped:");
    match equipped_loadout(state) {
        Some(loadout) => {
            println!("  {} {}", loadout.id, loadout.name);
            for (slot, item) in loadout.slots.filled() {
                println!("    {:<10} {}", slot, item);
            }
            for item in &loadout.checklist {
                let mark = if loadout.is_checked(item) { "[x]" } else { "[ ]" };
                println!("    {} {}", mark, item);
            }
        }
        None => println!("  nothing"),
    }
}

fn print_quests(state: &AppState, query: &str, priority: Option<Priority>) {
    let groups = [
        ("Backlog", backlog_quests(state)),
        ("Active", active_quests(state)),
        ("Completed", completed_quests(state)),
    ];
    for (label, quests) in groups {
        let shown = filter_quests(&quests, query, priority);
        println!("{} ({})", label, shown.len());
        for quest in shown {
            println!(
                "  {} [{}] {} +{}xp",
                quest.id,
                quest.priority.label(),
                quest.title,
                quest.xp_reward
            );
        }
    }

    let markers = location_markers(state);
    if !markers.is_empty() {
        println!("\nLocations:");
        for (place, entries) in markers {
            let texts: Vec<&str> = entries.iter().map(|m| m.step_text).collect();
            println!("  {}: {}", place, texts.join("; "));
        }
    }
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match (verbosity, config) {
        (0, Some(cfg)) => cfg.logging.level_filter(),
        (0, None) => log::LevelFilter::Info,
        (1, _) => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config
        .as_ref()
        .and_then(|cfg| cfg.logging.file.as_ref())
        .and_then(|file| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .ok()
        });

    if let Some(f) = log_file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Echo to the console only when attached to a terminal
        let is_tty = atty::is(atty::Stream::Stderr);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
