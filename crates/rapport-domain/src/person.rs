//! Person module - the people a relationship graph is built from

use std::collections::BTreeSet;
use std::fmt;

/// Namespace for ghost ids
const GHOST_NAMESPACE: uuid::Uuid = uuid::Uuid::from_u128(0x3d9e_71b0_c4a2_5f18_9b07_e6d3_2a5c_8f41);

/// Unique identifier for a person or graph node, backed by a UUID
///
/// Tracked people arrive with identifiers assigned by the persistence layer.
/// Ghost nodes derive a UUIDv5 from their normalized name, so rebuilding the
/// same input yields the same ghost ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PersonId(u128);

impl PersonId {
    /// Generate a new UUIDv7-based PersonId
    ///
    /// # Examples
    ///
    /// ```
    /// use rapport_domain::PersonId;
    ///
    /// let id = PersonId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Stable id for a ghost node, derived from its normalized name
    pub fn for_ghost(name_key: &str) -> Self {
        Self(uuid::Uuid::new_v5(&GHOST_NAMESPACE, name_key.as_bytes()).as_u128())
    }

    /// Create a PersonId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a PersonId from a UUID string
    ///
    /// # Examples
    ///
    /// ```
    /// use rapport_domain::PersonId;
    ///
    /// let id = PersonId::new();
    /// let parsed = PersonId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid UUID string: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for PersonId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Health classification of a relationship with a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RelationshipHealth {
    /// Recent, regular contact
    #[default]
    Healthy,

    /// Contact is tapering off
    Cooling,

    /// Relationship needs attention
    AtRisk,
}

impl RelationshipHealth {
    /// Get the health name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipHealth::Healthy => "healthy",
            RelationshipHealth::Cooling => "cooling",
            RelationshipHealth::AtRisk => "at_risk",
        }
    }

    /// Parse a health classification (case-insensitive, `-`/`_`/space tolerant)
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect();
        match normalized.as_str() {
            "healthy" => Some(RelationshipHealth::Healthy),
            "cooling" => Some(RelationshipHealth::Cooling),
            "atrisk" => Some(RelationshipHealth::AtRisk),
            _ => None,
        }
    }
}

impl std::str::FromStr for RelationshipHealth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid relationship health: {}", s))
    }
}

/// A tracked person, as supplied by the persistence layer
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    /// Unique identifier
    pub id: PersonId,

    /// Display name
    pub name: String,

    /// Role labels (unordered, may be empty)
    pub roles: BTreeSet<String>,

    /// Relationship health classification
    pub health: RelationshipHealth,

    /// Production value (monetary magnitude, non-negative)
    pub production: f64,

    /// Short status text
    pub status: Option<String>,

    /// Pipeline stage label
    pub pipeline_stage: Option<String>,
}

impl Person {
    /// Create a person with no roles, healthy status and zero production
    pub fn new(id: PersonId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            roles: BTreeSet::new(),
            health: RelationshipHealth::Healthy,
            production: 0.0,
            status: None,
            pipeline_stage: None,
        }
    }

    /// Add a role label
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    /// Set the health classification
    pub fn with_health(mut self, health: RelationshipHealth) -> Self {
        self.health = health;
        self
    }

    /// Set the production value
    pub fn with_production(mut self, production: f64) -> Self {
        self.production = production;
        self
    }

    /// Production value with negative and non-finite inputs mapped to zero
    pub fn normalized_production(&self) -> f64 {
        if self.production.is_finite() && self.production > 0.0 {
            self.production
        } else {
            0.0
        }
    }
}
