//! The alternative critical orchestrator.
//!
//! One invocation walks a fixed sequence of tiers and stops at the first
//! that yields damage:
//!
//! ```text
//! captured roll ─miss─▶ estimate from item data ─fail─▶ item damage fields ─fail─▶ warn, no roll
//! ```
//!
//! The chosen structure is assembled into formula parts, every part is
//! evaluated by the host in one batch, and the results are posted as a
//! single chat message.

use std::fmt;

use ac_core::{Actor, DegreeOfSuccess, Item};
use ac_mechanics::{
    AlternativeCriticalFormula, CaptureCache, RichDamageStructure, SynthOptions, assemble,
    estimate, normalize, normalize_item,
};
use futures::future::try_join_all;

use crate::clock::{Clock, SystemClock};
use crate::error::{SessionError, SessionResult};
use crate::event::{AltCritAction, ChatEntry, ChatEntryCreated, ChatEntryRendering};
use crate::host::{ChatPost, EvaluatedRoll, Host, RollContext};

/// Where an invocation's damage structure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// A fresh capture of the same item's damage roll.
    Captured,
    /// Reconstructed from the item's dice and the actor's strength.
    Estimated,
    /// Read straight from the item's damage fields.
    ItemFields,
}

impl Tier {
    /// Every tier in the order they are tried.
    pub const ORDER: [Tier; 3] = [Tier::Captured, Tier::Estimated, Tier::ItemFields];

    /// Returns true for tiers that can miss situational or class-feature
    /// modifiers.
    pub fn is_lossy(self) -> bool {
        self != Self::Captured
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Captured => write!(f, "captured roll"),
            Self::Estimated => write!(f, "estimated from item data"),
            Self::ItemFields => write!(f, "item damage fields"),
        }
    }
}

/// Annotation added whenever a lossy tier is used.
pub const MISSING_MODIFIERS_NOTE: &str =
    "Situational and class-feature modifiers may be missing from this roll.";

/// Flavor text describing the outcome and the tier used.
pub fn provenance(item_name: &str, critical: bool, tier: Tier) -> String {
    let headline = if critical {
        "Alternative Critical"
    } else {
        "Alternative Damage (not a critical hit)"
    };
    let mut lines = vec![format!("{headline}: {item_name}"), format!("Source: {tier}")];
    if tier.is_lossy() {
        lines.push(MISSING_MODIFIERS_NOTE.to_string());
    }
    lines.join("\n")
}

/// What one invocation did.
#[derive(Debug, Clone)]
pub struct AltCritReport {
    /// The tier that supplied the damage structure.
    pub tier: Tier,
    /// Whether critical damage was rolled.
    pub critical: bool,
    /// The synthesized formula.
    pub formula: AlternativeCriticalFormula,
    /// The message that was posted.
    pub post: ChatPost,
}

impl AltCritReport {
    /// The evaluated rolls in formula order.
    pub fn rolls(&self) -> &[EvaluatedRoll] {
        &self.post.rolls
    }

    /// Sum of every roll.
    pub fn total(&self) -> i64 {
        self.post.total()
    }
}

/// Alternative critical state for one host session.
///
/// Owns the capture cache; nothing is shared between sessions.
pub struct AltCritSession<H, C = SystemClock> {
    host: H,
    clock: C,
    captures: CaptureCache,
}

impl<H: Host> AltCritSession<H> {
    /// Create a session on the wall clock.
    pub fn new(host: H) -> Self {
        Self::with_clock(host, SystemClock)
    }
}

impl<H: Host, C: Clock> AltCritSession<H, C> {
    /// Create a session with an explicit clock.
    pub fn with_clock(host: H, clock: C) -> Self {
        let settings = host.settings();
        let captures = CaptureCache::new(settings.capture_ttl_ms, settings.capture_capacity);
        Self {
            host,
            clock,
            captures,
        }
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The capture cache.
    pub fn captures(&self) -> &CaptureCache {
        &self.captures
    }

    /// Handle a newly created chat entry. Returns true if its damage was
    /// captured.
    ///
    /// Only entries whose first roll is a damage roll and that name a
    /// source item are captured. A later capture always replaces an earlier
    /// one for the same item.
    pub fn on_chat_entry_created(&mut self, event: &ChatEntryCreated) -> bool {
        let settings = self.host.settings();
        if !settings.enabled {
            return false;
        }
        self.captures
            .configure(settings.capture_ttl_ms, settings.capture_capacity);

        let Some(item) = &event.source_item else {
            return false;
        };
        let Some(damage) = event
            .rolls
            .first()
            .filter(|r| r.is_damage_roll())
            .and_then(|r| r.damage.as_ref())
        else {
            return false;
        };

        match normalize(damage) {
            Ok(structure) => {
                let now = self.clock.now_millis();
                tracing::debug!(item = %item, at = now, "captured damage roll");
                self.captures.record(item.clone(), structure, now);
                true
            }
            Err(err) => {
                tracing::debug!(item = %item, %err, "damage roll not captured");
                false
            }
        }
    }

    /// The action to show on a chat entry, if any.
    ///
    /// Offered only while the feature is enabled, when the host already
    /// shows its own damage action, and when the entry has an item.
    pub fn offer_action(&self, rendering: &ChatEntryRendering) -> Option<AltCritAction> {
        if !self.host.settings().enabled || !rendering.has_damage_action {
            return None;
        }
        let item = rendering.entry.item.as_ref()?;
        let critical = DegreeOfSuccess::is_critical_flag(rendering.entry.outcome);
        let label = if critical {
            "Alternative Critical"
        } else {
            "Alternative Damage"
        };
        Some(AltCritAction {
            item: item.id.clone(),
            critical,
            label: label.to_string(),
        })
    }

    /// Try each tier in order and return the first non-empty formula set.
    ///
    /// A tier whose structure assembles to no parts counts as a miss and the
    /// next tier is tried.
    pub fn resolve_formula(
        &self,
        item: &Item,
        actor: Option<&Actor>,
        options: &SynthOptions,
    ) -> Option<(Tier, AlternativeCriticalFormula)> {
        let now = self.clock.now_millis();
        Tier::ORDER.into_iter().find_map(|tier| {
            let structure = self.try_tier(tier, item, actor, now)?;
            let formula = assemble(&structure, options);
            if formula.is_empty() {
                tracing::debug!(item = %item.id, %tier, "tier assembled no damage");
                return None;
            }
            tracing::debug!(item = %item.id, %tier, "damage tier selected");
            Some((tier, formula))
        })
    }

    fn try_tier(
        &self,
        tier: Tier,
        item: &Item,
        actor: Option<&Actor>,
        now: i64,
    ) -> Option<RichDamageStructure> {
        let result = match tier {
            Tier::Captured => return self.captures.lookup(&item.id, now).cloned(),
            Tier::Estimated => estimate(item, actor),
            Tier::ItemFields => normalize_item(item),
        };
        result
            .map_err(|err| tracing::debug!(item = %item.id, %tier, %err, "tier failed"))
            .ok()
    }

    /// Roll alternative damage for a chat entry and post it.
    ///
    /// Nothing is posted unless every formula part evaluated.
    pub async fn roll_alt_crit(&self, entry: &ChatEntry) -> SessionResult<AltCritReport> {
        let settings = self.host.settings();
        if !settings.enabled {
            return Err(SessionError::Disabled);
        }
        let item = entry.item.as_ref().ok_or(SessionError::MissingItem)?;
        let critical = DegreeOfSuccess::is_critical_flag(entry.outcome);

        let options = settings.synth_options(critical);
        let resolved = self.resolve_formula(item, entry.actor.as_ref(), &options);
        let Some((tier, formula)) = resolved else {
            self.host
                .warn(&format!("No damage found for {}.", item.name));
            return Err(SessionError::NoDamageFound(item.name.clone()));
        };

        let context = RollContext {
            actor: entry.actor.clone(),
            item: Some(item.id.clone()),
        };
        let rolls = try_join_all(
            formula
                .parts
                .iter()
                .map(|part| self.host.evaluate(&part.expression, &context)),
        )
        .await
        .map_err(|err| {
            self.host
                .warn(&format!("Could not roll alternative damage: {err}"));
            SessionError::Evaluation(err.to_string())
        })?;

        let post = ChatPost {
            rolls,
            speaker: entry.actor.as_ref().map(|a| a.name.clone()),
            flavor: provenance(&item.name, critical, tier),
            visibility: entry.visibility,
            formula: formula.combined(),
        };
        self.host
            .post(post.clone())
            .await
            .map_err(|err| SessionError::Post(err.to_string()))?;
        tracing::info!(
            item = %item.id,
            %tier,
            critical,
            total = post.total(),
            "alternative damage posted"
        );

        Ok(AltCritReport {
            tier,
            critical,
            formula,
            post,
        })
    }
}
