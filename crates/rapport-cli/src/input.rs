//! JSON snapshot input.
//!
//! A snapshot is the persistence layer's export: people plus already-resolved
//! relationship facts. Ids are free-form strings; UUID strings are used as-is
//! and anything else maps to a stable UUIDv5.

use crate::error::{CliError, Result};
use rapport_domain::traits::GraphSource;
use rapport_domain::{
    CoAttendance, CommunicationDirection, CommunicationLink, Context, GhostMention, GraphInput,
    MentionPair, Person, PersonId, RecruitingLink, Referral, RelationshipHealth,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// Namespace for ids derived from non-UUID keys.
const KEY_NAMESPACE: Uuid = Uuid::from_u128(0x6a1f_3c2e_9b4d_5e07_8c61_d2a9_0f3b_7e15);

/// Map a snapshot key to a node id.
pub fn key_to_id(key: &str) -> PersonId {
    let key = key.trim();
    match Uuid::parse_str(key) {
        Ok(uuid) => PersonId::from_value(uuid.as_u128()),
        Err(_) => PersonId::from_value(Uuid::new_v5(&KEY_NAMESPACE, key.as_bytes()).as_u128()),
    }
}

/// Whole snapshot file; every collection is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    /// Tracked people
    pub people: Vec<PersonRecord>,
    /// Household/business/other groupings
    pub contexts: Vec<ContextRecord>,
    /// Referral links
    pub referrals: Vec<ReferralRecord>,
    /// Recruiting links
    pub recruiting: Vec<RecruitingRecord>,
    /// Co-attendance pairs
    pub co_attendance: Vec<CoAttendanceRecord>,
    /// Communication links
    pub communications: Vec<CommunicationRecord>,
    /// Mention pairs
    pub mentions: Vec<MentionRecord>,
    /// Mentions of untracked names
    pub ghost_mentions: Vec<GhostMentionRecord>,
}

/// A person entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Person key
    pub id: String,
    /// Display name
    pub name: String,
    /// Role labels
    #[serde(default)]
    pub roles: Vec<String>,
    /// healthy, cooling or at_risk
    #[serde(default)]
    pub health: Option<String>,
    /// Production value
    #[serde(default)]
    pub production: f64,
    /// Status text
    #[serde(default)]
    pub status: Option<String>,
    /// Pipeline stage
    #[serde(default)]
    pub pipeline_stage: Option<String>,
}

/// A context entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextRecord {
    /// Context key; generated from the position when absent
    #[serde(default)]
    pub id: Option<String>,
    /// Context type label
    pub kind: String,
    /// Participant keys
    #[serde(default)]
    pub participants: Vec<String>,
}

/// A referral entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferralRecord {
    /// Referrer key
    pub referrer: String,
    /// Referred person key
    pub referred: String,
}

/// A recruiting entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecruitingRecord {
    /// Recruiter key
    pub recruiter: String,
    /// Recruit key
    pub recruit: String,
    /// Stage label
    #[serde(default)]
    pub stage: String,
}

/// A co-attendance entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoAttendanceRecord {
    /// First attendee key
    pub a: String,
    /// Second attendee key
    pub b: String,
    /// Shared meetings
    pub meeting_count: i64,
}

/// A communication entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunicationRecord {
    /// First party key
    pub a: String,
    /// Second party key
    pub b: String,
    /// Messages/calls observed
    pub evidence_count: i64,
    /// Last contact, milliseconds since epoch
    #[serde(default)]
    pub last_contact: u64,
    /// outbound, inbound or balanced
    pub direction: String,
}

/// A mention pair entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentionRecord {
    /// First person key
    pub a: String,
    /// Second person key
    pub b: String,
    /// Co-mentions
    pub co_mention_count: i64,
}

/// A ghost mention entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GhostMentionRecord {
    /// Mentioned name
    pub name: String,
    /// Keys of people who mentioned the name
    #[serde(default)]
    pub mentioned_by: Vec<String>,
    /// Suggested role label
    #[serde(default)]
    pub suggested_role: Option<String>,
}

impl Snapshot {
    /// Read and parse a snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let snapshot = Self::from_json(&contents)?;
        tracing::debug!(
            "Loaded snapshot {}: {} people",
            path.display(),
            snapshot.people.len()
        );
        Ok(snapshot)
    }

    /// Parse a snapshot from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert to builder input.
    pub fn to_input(&self) -> Result<GraphInput> {
        let people = self
            .people
            .iter()
            .map(PersonRecord::to_person)
            .collect::<Result<Vec<_>>>()?;

        let contexts = self
            .contexts
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let key = c.id.clone().unwrap_or_else(|| format!("context:{}", i));
                Context::new(
                    key_to_id(&key),
                    c.kind.clone(),
                    c.participants.iter().map(|p| key_to_id(p)).collect(),
                )
            })
            .collect();

        let referrals = self
            .referrals
            .iter()
            .map(|r| Referral {
                referrer: key_to_id(&r.referrer),
                referred: key_to_id(&r.referred),
            })
            .collect();

        let recruiting_links = self
            .recruiting
            .iter()
            .map(|r| RecruitingLink {
                recruiter: key_to_id(&r.recruiter),
                recruit: key_to_id(&r.recruit),
                stage: r.stage.clone(),
            })
            .collect();

        let co_attendance = self
            .co_attendance
            .iter()
            .map(|c| CoAttendance {
                a: key_to_id(&c.a),
                b: key_to_id(&c.b),
                meeting_count: c.meeting_count,
            })
            .collect();

        let communications = self
            .communications
            .iter()
            .map(|c| -> Result<CommunicationLink> {
                let direction = CommunicationDirection::parse(&c.direction).ok_or_else(|| {
                    CliError::InvalidInput(format!("Unknown communication direction: {}", c.direction))
                })?;
                Ok(CommunicationLink {
                    a: key_to_id(&c.a),
                    b: key_to_id(&c.b),
                    evidence_count: c.evidence_count,
                    last_contact: c.last_contact,
                    direction,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mentions = self
            .mentions
            .iter()
            .map(|m| MentionPair {
                a: key_to_id(&m.a),
                b: key_to_id(&m.b),
                co_mention_count: m.co_mention_count,
            })
            .collect();

        let ghost_mentions = self
            .ghost_mentions
            .iter()
            .map(|g| {
                let mention = GhostMention::new(g.name.clone(), g.mentioned_by.iter().map(|k| key_to_id(k)));
                match &g.suggested_role {
                    Some(role) => mention.with_suggested_role(role.clone()),
                    None => mention,
                }
            })
            .collect();

        Ok(GraphInput {
            people,
            contexts,
            referrals,
            recruiting_links,
            co_attendance,
            communications,
            mentions,
            ghost_mentions,
        })
    }

    /// Display keys for every person id in the snapshot.
    pub fn labels(&self) -> IdLabels {
        IdLabels {
            keys: self
                .people
                .iter()
                .map(|p| (key_to_id(&p.id), p.id.trim().to_string()))
                .collect(),
        }
    }
}

impl GraphSource for Snapshot {
    type Error = CliError;

    fn load_input(&self) -> Result<GraphInput> {
        self.to_input()
    }
}

impl PersonRecord {
    fn to_person(&self) -> Result<Person> {
        let health = match &self.health {
            Some(h) => RelationshipHealth::parse(h)
                .ok_or_else(|| CliError::InvalidInput(format!("Unknown health for {}: {}", self.id, h)))?,
            None => RelationshipHealth::default(),
        };

        let mut person = Person::new(key_to_id(&self.id), self.name.clone())
            .with_health(health)
            .with_production(self.production);
        for role in &self.roles {
            person = person.with_role(role.clone());
        }
        person.status = self.status.clone();
        person.pipeline_stage = self.pipeline_stage.clone();
        Ok(person)
    }
}

/// Reverse map from node id to the snapshot key it came from.
#[derive(Debug, Clone, Default)]
pub struct IdLabels {
    keys: HashMap<PersonId, String>,
}

impl IdLabels {
    /// Original key for `id`, or the id itself (ghosts have no key).
    pub fn label(&self, id: PersonId) -> String {
        self.keys
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }
}
