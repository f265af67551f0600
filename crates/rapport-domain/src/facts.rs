//! Relationship facts - already-resolved signals about how people are connected
//!
//! Every fact type is independent. The engine does not decide which signals
//! exist; it only turns the ones it is handed into edges.

use crate::PersonId;
use std::collections::BTreeSet;

/// Grouping kind of a context record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContextKind {
    /// Members of one household
    Household,
    /// Members of one business
    Business,
    /// Any other label; ignored for edge purposes
    Other(String),
}

impl ContextKind {
    /// Classify a free-text context label
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed.eq_ignore_ascii_case("household") {
            ContextKind::Household
        } else if trimmed.eq_ignore_ascii_case("business") {
            ContextKind::Business
        } else {
            ContextKind::Other(trimmed.to_string())
        }
    }
}

/// A grouping record (household, business, ...) with its participants
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    /// Unique identifier
    pub id: PersonId,

    /// Free-text type label, e.g. "Household" or "Business"
    pub kind_label: String,

    /// Participant identifiers
    pub participants: Vec<PersonId>,
}

impl Context {
    /// Create a new context
    pub fn new(id: PersonId, kind_label: impl Into<String>, participants: Vec<PersonId>) -> Self {
        Self {
            id,
            kind_label: kind_label.into(),
            participants,
        }
    }

    /// Classified kind of this context
    pub fn kind(&self) -> ContextKind {
        ContextKind::from_label(&self.kind_label)
    }

    /// Participants with duplicates removed, first occurrence order kept
    pub fn distinct_participants(&self) -> Vec<PersonId> {
        let mut seen = BTreeSet::new();
        self.participants
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

/// Directed referral: `referrer` sent `referred`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Referral {
    /// Person who made the referral
    pub referrer: PersonId,
    /// Person who was referred
    pub referred: PersonId,
}

/// Directed recruiting link with the recruit's stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecruitingLink {
    /// Recruiter
    pub recruiter: PersonId,
    /// Recruit
    pub recruit: PersonId,
    /// Stage label, e.g. "Studying" or "Licensed"
    pub stage: String,
}

/// Two people who attended calendar events together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoAttendance {
    /// First attendee
    pub a: PersonId,
    /// Second attendee
    pub b: PersonId,
    /// Number of shared meetings
    pub meeting_count: i64,
}

/// Dominant direction of contact between two people
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommunicationDirection {
    /// Mostly from the user's side
    Outbound,
    /// Mostly from the other side
    Inbound,
    /// Roughly even in both directions
    Balanced,
}

impl CommunicationDirection {
    /// Get the direction name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            CommunicationDirection::Outbound => "outbound",
            CommunicationDirection::Inbound => "inbound",
            CommunicationDirection::Balanced => "balanced",
        }
    }

    /// Parse a direction (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "outbound" => Some(CommunicationDirection::Outbound),
            "inbound" => Some(CommunicationDirection::Inbound),
            "balanced" => Some(CommunicationDirection::Balanced),
            _ => None,
        }
    }
}

/// Aggregate messaging/call contact between two people
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommunicationLink {
    /// First party
    pub a: PersonId,
    /// Second party
    pub b: PersonId,
    /// Number of messages/calls observed
    pub evidence_count: i64,
    /// Last contact (milliseconds since Unix epoch)
    pub last_contact: u64,
    /// Dominant direction
    pub direction: CommunicationDirection,
}

/// Two known people mentioned together in notes or messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MentionPair {
    /// First person
    pub a: PersonId,
    /// Second person
    pub b: PersonId,
    /// Number of co-mentions
    pub co_mention_count: i64,
}

/// A name mentioned by known people that is not itself a tracked person
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhostMention {
    /// Mentioned name, free text
    pub name: String,
    /// Known people who mentioned the name
    pub mentioned_by: BTreeSet<PersonId>,
    /// Suggested role label for the ghost
    pub suggested_role: Option<String>,
}

impl GhostMention {
    /// Create a ghost mention without a suggested role
    pub fn new(name: impl Into<String>, mentioned_by: impl IntoIterator<Item = PersonId>) -> Self {
        Self {
            name: name.into(),
            mentioned_by: mentioned_by.into_iter().collect(),
            suggested_role: None,
        }
    }

    /// Set the suggested role
    pub fn with_suggested_role(mut self, role: impl Into<String>) -> Self {
        self.suggested_role = Some(role.into());
        self
    }
}

/// Normalize a display name for comparison: trimmed, lowercased, single spaces
pub(crate) fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
