//! Alternative critical damage against a roleplaying-system host.
//!
//! Captures rich damage rolls as the host reports them, offers an
//! alternative critical action on qualifying chat entries, and on demand
//! picks the best available damage source, synthesizes the formula, has the
//! host evaluate it, and posts the result.

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod host;
pub mod session;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AltCritSettings;
pub use error::{SessionError, SessionResult};
pub use event::{
    AltCritAction, ChatEntry, ChatEntryCreated, ChatEntryRendering, DAMAGE_ROLL_TAG, RollRecord,
    Visibility,
};
pub use host::{ChatPost, EvaluatedRoll, Host, HostError, RollContext};
pub use session::{AltCritReport, AltCritSession, Tier, provenance};
