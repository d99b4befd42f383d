//! Status conditions and the readiness rule.
//!
//! Every Strimzi custom resource reports its state as a list of conditions in
//! `status.conditions`. A resource is ready iff one of them has
//! `type: Ready` and `status: "True"`. A missing status block, an empty list,
//! and a `Ready` condition that is not `True` all count as not ready.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Condition type that marks a resource as ready.
pub const READY: &str = "Ready";

/// Status value of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ConditionStatus {
    True,
    False,
    #[serde(other)]
    Unknown,
}

/// A status condition reported by the operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Condition type (`Ready`, `NotReady`, `Warning`, `ProposalReady`, ...).
    #[serde(rename = "type")]
    pub type_: String,

    /// Condition status.
    pub status: ConditionStatus,

    /// Machine-readable reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Last transition time (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
}

impl Condition {
    /// Create a condition without reason or message.
    pub fn new(type_: impl Into<String>, status: ConditionStatus) -> Self {
        Self {
            type_: type_.into(),
            status,
            reason: None,
            message: None,
            last_transition_time: None,
        }
    }

    /// Attach a message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach a reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Shorthand for `Ready=True`.
    pub fn ready() -> Self {
        Self::new(READY, ConditionStatus::True)
    }

    /// Shorthand for `Ready=False` with a message.
    pub fn not_ready(message: impl Into<String>) -> Self {
        Self::new(READY, ConditionStatus::False).with_message(message)
    }

    fn is_true(&self) -> bool {
        self.status == ConditionStatus::True
    }
}

/// Readiness derived from a condition set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    NotReady {
        /// Reason of the most relevant condition, if any.
        reason: Option<String>,
        /// Message of the most relevant condition, if any.
        message: Option<String>,
    },
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready)
    }

    /// Short status label used in listings.
    pub fn label(&self) -> &'static str {
        match self {
            Readiness::Ready => "Ready",
            Readiness::NotReady { .. } => "NotReady",
        }
    }

    /// Message explaining why the resource is not ready.
    pub fn message(&self) -> Option<&str> {
        match self {
            Readiness::Ready => None,
            Readiness::NotReady { message, .. } => message.as_deref(),
        }
    }
}

/// Compute readiness from an optional condition list.
///
/// The message of a non-ready resource comes from its `Ready` condition when
/// present, otherwise from the first condition that carries one.
pub fn readiness(conditions: Option<&[Condition]>) -> Readiness {
    let conditions = conditions.unwrap_or_default();

    if conditions.iter().any(|c| c.type_ == READY && c.is_true()) {
        return Readiness::Ready;
    }

    let relevant = conditions
        .iter()
        .find(|c| c.type_ == READY)
        .or_else(|| conditions.iter().find(|c| c.message.is_some()));

    Readiness::NotReady {
        reason: relevant.and_then(|c| c.reason.clone()),
        message: relevant.and_then(|c| c.message.clone()),
    }
}

/// Access to the status conditions of a resource.
pub trait HasConditions {
    /// Conditions from `status.conditions`, `None` if there is no status.
    fn conditions(&self) -> Option<&[Condition]>;

    fn readiness(&self) -> Readiness {
        readiness(self.conditions())
    }

    fn is_ready(&self) -> bool {
        self.readiness().is_ready()
    }

    /// Find the first condition of the given type.
    fn condition(&self, type_: &str) -> Option<&Condition> {
        self.conditions()?.iter().find(|c| c.type_ == type_)
    }
}
