//! The narrow interface to the host application.
//!
//! Rolling dice, posting to chat, settings storage, and user notifications
//! all belong to the host. The session only sees them through [`Host`].

use ac_core::{Actor, ItemId};
use ac_mechanics::RolledDice;
use async_trait::async_trait;
use thiserror::Error;

use crate::config::AltCritSettings;
use crate::event::Visibility;

/// Failure reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HostError(pub String);

/// Roll data the host resolves expressions against.
#[derive(Debug, Clone, Default)]
pub struct RollContext {
    /// The attacking actor.
    pub actor: Option<Actor>,
    /// The item rolled for.
    pub item: Option<ItemId>,
}

/// One evaluated expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatedRoll {
    /// The expression that was evaluated.
    pub formula: String,
    /// The roll's total.
    pub total: i64,
    /// The individual dice.
    pub dice: RolledDice,
}

/// A chat message to post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPost {
    /// Evaluated rolls in formula order.
    pub rolls: Vec<EvaluatedRoll>,
    /// Speaker name.
    pub speaker: Option<String>,
    /// Flavor text above the rolls.
    pub flavor: String,
    /// Who can see the post.
    pub visibility: Visibility,
    /// The combined `{a,b,...}` expression set.
    pub formula: String,
}

impl ChatPost {
    /// Sum of all roll totals.
    pub fn total(&self) -> i64 {
        self.rolls.iter().map(|r| r.total).sum()
    }
}

/// Services the host provides.
///
/// Implementations can be:
/// - the real application's roll engine and chat log
/// - a local command-line stand-in
/// - scripted fixtures in tests
#[async_trait]
pub trait Host: Send + Sync {
    /// Current settings. Called once per invocation and never cached.
    fn settings(&self) -> AltCritSettings;

    /// Evaluate one damage expression.
    async fn evaluate(&self, expression: &str, context: &RollContext)
    -> Result<EvaluatedRoll, HostError>;

    /// Post the result to chat.
    async fn post(&self, post: ChatPost) -> Result<(), HostError>;

    /// Show a warning to the user.
    fn warn(&self, message: &str);
}
