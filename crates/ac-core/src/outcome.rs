use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Degree of success of an attack, as flagged by the host on a chat entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DegreeOfSuccess {
    /// Missed by 10 or more, or a natural 1 that downgraded.
    CriticalFailure,
    /// A miss.
    Failure,
    /// A hit.
    Success,
    /// A critical hit.
    CriticalSuccess,
}

impl DegreeOfSuccess {
    /// Returns true only for a critical hit.
    pub fn is_critical(self) -> bool {
        self == Self::CriticalSuccess
    }

    /// Critical iff an outcome flag is present and says so. An absent flag
    /// is a normal hit.
    pub fn is_critical_flag(outcome: Option<Self>) -> bool {
        outcome.is_some_and(Self::is_critical)
    }
}

impl FromStr for DegreeOfSuccess {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "criticalfailure" | "critfailure" => Ok(Self::CriticalFailure),
            "failure" | "miss" => Ok(Self::Failure),
            "success" | "hit" => Ok(Self::Success),
            "criticalsuccess" | "critsuccess" | "crit" | "critical" => Ok(Self::CriticalSuccess),
            _ => Err(CoreError::UnknownOutcome(s.to_string())),
        }
    }
}

impl fmt::Display for DegreeOfSuccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CriticalFailure => write!(f, "critical failure"),
            Self::Failure => write!(f, "failure"),
            Self::Success => write!(f, "success"),
            Self::CriticalSuccess => write!(f, "critical success"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_host_flag_spellings() {
        assert_eq!(
            "criticalSuccess".parse::<DegreeOfSuccess>().unwrap(),
            DegreeOfSuccess::CriticalSuccess
        );
        assert_eq!(
            "critical-failure".parse::<DegreeOfSuccess>().unwrap(),
            DegreeOfSuccess::CriticalFailure
        );
        assert_eq!(
            "success".parse::<DegreeOfSuccess>().unwrap(),
            DegreeOfSuccess::Success
        );
        assert!("graze".parse::<DegreeOfSuccess>().is_err());
    }

    #[test]
    fn only_critical_success_is_critical() {
        assert!(DegreeOfSuccess::CriticalSuccess.is_critical());
        assert!(!DegreeOfSuccess::Success.is_critical());
        assert!(!DegreeOfSuccess::CriticalFailure.is_critical());
    }

    #[test]
    fn absent_flag_is_not_critical() {
        assert!(!DegreeOfSuccess::is_critical_flag(None));
        assert!(DegreeOfSuccess::is_critical_flag(Some(
            DegreeOfSuccess::CriticalSuccess
        )));
    }

    #[test]
    fn serde_uses_host_names() {
        let json = serde_json::to_string(&DegreeOfSuccess::CriticalSuccess).unwrap();
        assert_eq!(json, "\"criticalSuccess\"");
    }
}
