//! Mailing lifecycle types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Returned when a stored or requested value does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Lifecycle status of a mailing job.
///
/// ```text
/// created ──sweep──▶ launched ──sweep──▶ completed
///                     ▲    │
///             operator│    │operator
///                     │    ▼
///                   deactivated
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MailingStatus {
    Created,
    Launched,
    Deactivated,
    Completed,
}

impl MailingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Launched => "launched",
            Self::Deactivated => "deactivated",
            Self::Completed => "completed",
        }
    }

    /// Every spelling of this status that may be stored. Filters must match all
    /// of them; writes always use [`as_str`](Self::as_str).
    pub fn stored_names(self) -> &'static [&'static str] {
        match self {
            Self::Created => &["created"],
            Self::Launched => &["launched", "started"],
            Self::Deactivated => &["deactivated"],
            Self::Completed => &["completed"],
        }
    }

    /// Transitions the dispatch sweep is allowed to make.
    pub fn sweep_can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Created, Self::Launched) | (Self::Launched, Self::Completed)
        )
    }

    /// Transitions an operator is allowed to make by hand.
    pub fn operator_can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Launched, Self::Deactivated) | (Self::Deactivated, Self::Launched)
        )
    }
}

impl fmt::Display for MailingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MailingStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            // older rows written by the "started" variant of the scheduler
            "launched" | "started" => Ok(Self::Launched),
            "deactivated" => Ok(Self::Deactivated),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownVariant {
                kind: "mailing status",
                value: other.to_owned(),
            }),
        }
    }
}

/// Recurrence hint. Stored for operators; the sweep never derives a next run from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Periodicity {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Periodicity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl FromStr for Periodicity {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(UnknownVariant {
                kind: "periodicity",
                value: other.to_owned(),
            }),
        }
    }
}

/// Result of a single delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Success,
    Failure,
}

impl AttemptOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

impl FromStr for AttemptOutcome {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            other => Err(UnknownVariant {
                kind: "attempt outcome",
                value: other.to_owned(),
            }),
        }
    }
}
