pub mod bounds;
pub mod formula;
pub mod roll;

use std::path::Path;

use ac_core::{Actor, DegreeOfSuccess, Item};
use ac_mechanics::DoublingScope;
use ac_session::{AltCritSession, AltCritSettings, ChatEntry, ChatEntryCreated, RollRecord};
use serde_json::Value;

use crate::AttackArgs;
use crate::host::LocalHost;

/// Everything read from the files and flags of one attack.
pub struct Attack {
    pub item: Item,
    pub actor: Option<Actor>,
    pub capture: Option<Value>,
    pub outcome: Option<DegreeOfSuccess>,
    pub settings: AltCritSettings,
}

impl Attack {
    pub fn load(args: &AttackArgs) -> Result<Self, String> {
        let item = Item::from_json(&read(&args.item)?).map_err(|e| e.to_string())?;
        let actor = match &args.actor {
            Some(path) => Some(Actor::from_json(&read(path)?).map_err(|e| e.to_string())?),
            None => None,
        };
        let capture = match &args.capture {
            Some(path) => Some(
                serde_json::from_str(&read(path)?)
                    .map_err(|e| format!("invalid capture {}: {e}", path.display()))?,
            ),
            None => None,
        };
        let outcome = match &args.outcome {
            Some(s) => Some(s.parse::<DegreeOfSuccess>().map_err(|e| e.to_string())?),
            None if args.critical => Some(DegreeOfSuccess::CriticalSuccess),
            None => None,
        };

        Ok(Self {
            item,
            actor,
            capture,
            outcome,
            settings: settings(args)?,
        })
    }

    /// A session on a local host with the capture, if any, already recorded.
    pub fn session(&self, seed: u64) -> AltCritSession<LocalHost> {
        let mut session = AltCritSession::new(LocalHost::new(self.settings.clone(), seed));
        if let Some(damage) = &self.capture {
            let event = ChatEntryCreated {
                rolls: vec![RollRecord::damage_roll(damage.clone())],
                source_item: Some(self.item.id.clone()),
            };
            if !session.on_chat_entry_created(&event) {
                tracing::warn!("capture holds no recognizable damage, ignoring it");
            }
        }
        session
    }

    pub fn entry(&self) -> ChatEntry {
        ChatEntry {
            item: Some(self.item.clone()),
            actor: self.actor.clone(),
            outcome: self.outcome,
            ..Default::default()
        }
    }

    pub fn is_critical(&self) -> bool {
        DegreeOfSuccess::is_critical_flag(self.outcome)
    }
}

fn settings(args: &AttackArgs) -> Result<AltCritSettings, String> {
    let mut settings = match &args.settings {
        Some(path) => serde_json::from_str(&read(path)?)
            .map_err(|e| format!("invalid settings {}: {e}", path.display()))?,
        None => AltCritSettings::default(),
    };
    if args.double_static || args.double_all_static {
        settings = settings.with_double_static(true);
    }
    if args.double_all_static {
        settings = settings.with_doubling_scope(DoublingScope::AllStatic);
    }
    if args.disabled {
        settings = settings.with_enabled(false);
    }
    Ok(settings)
}

fn read(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))
}
