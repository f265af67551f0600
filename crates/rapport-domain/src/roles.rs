//! Role ranking - resolves a person's role labels to a single primary role

use std::collections::BTreeSet;

/// Role labels with a known display priority, highest first
///
/// A person tagged with several roles is drawn as the highest-ranked one:
/// an active client outranks a lead, which outranks a generic vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KnownRole {
    /// Active client
    Client,
    /// Licensed agent on the team
    Agent,
    /// Recruit in the recruiting tree
    Recruit,
    /// Source of referrals
    ReferralPartner,
    /// Center of influence
    CenterOfInfluence,
    /// Qualified prospect
    Prospect,
    /// Unqualified lead
    Lead,
    /// Family member
    Family,
    /// Friend
    Friend,
    /// Vendor or service provider
    Vendor,
}

impl KnownRole {
    /// Every known role in priority order
    pub const ALL: [KnownRole; 10] = [
        KnownRole::Client,
        KnownRole::Agent,
        KnownRole::Recruit,
        KnownRole::ReferralPartner,
        KnownRole::CenterOfInfluence,
        KnownRole::Prospect,
        KnownRole::Lead,
        KnownRole::Family,
        KnownRole::Friend,
        KnownRole::Vendor,
    ];

    /// Canonical label
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownRole::Client => "Client",
            KnownRole::Agent => "Agent",
            KnownRole::Recruit => "Recruit",
            KnownRole::ReferralPartner => "Referral Partner",
            KnownRole::CenterOfInfluence => "Center of Influence",
            KnownRole::Prospect => "Prospect",
            KnownRole::Lead => "Lead",
            KnownRole::Family => "Family",
            KnownRole::Friend => "Friend",
            KnownRole::Vendor => "Vendor",
        }
    }

    /// Parse a role label (case-insensitive, surrounding whitespace ignored)
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(label))
    }

    /// Priority rank, 0 being the highest
    pub fn priority(&self) -> usize {
        *self as usize
    }
}

/// Priority rank of a label; unknown labels rank below every known role
pub fn role_priority(label: &str) -> usize {
    KnownRole::parse(label)
        .map(|role| role.priority())
        .unwrap_or(KnownRole::ALL.len())
}

/// Resolve the primary role of a label set
///
/// Returns the label with the best priority, keeping its original spelling.
/// Ties between unranked labels go to the lexicographically smallest one.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use rapport_domain::roles::primary_role;
///
/// let roles: BTreeSet<String> = ["Vendor", "Client"].iter().map(|s| s.to_string()).collect();
/// assert_eq!(primary_role(&roles).as_deref(), Some("Client"));
/// assert_eq!(primary_role(&BTreeSet::new()), None);
/// ```
pub fn primary_role(labels: &BTreeSet<String>) -> Option<String> {
    labels
        .iter()
        .filter(|label| !label.trim().is_empty())
        .min_by(|a, b| role_priority(a).cmp(&role_priority(b)).then_with(|| a.cmp(b)))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_client_outranks_vendor() {
        assert_eq!(primary_role(&labels(&["Vendor", "Client"])).as_deref(), Some("Client"));
    }

    #[test]
    fn test_agent_outranks_lead() {
        assert_eq!(primary_role(&labels(&["Lead", "Agent"])).as_deref(), Some("Agent"));
    }

    #[test]
    fn test_empty_roles() {
        assert_eq!(primary_role(&BTreeSet::new()), None);
        assert_eq!(primary_role(&labels(&["  "])), None);
    }

    #[test]
    fn test_unranked_never_outranks_known() {
        assert_eq!(primary_role(&labels(&["Astronaut", "Vendor"])).as_deref(), Some("Vendor"));
        assert_eq!(primary_role(&labels(&["Zebra", "Aardvark"])).as_deref(), Some("Aardvark"));
    }

    #[test]
    fn test_case_insensitive_keeps_spelling() {
        assert_eq!(primary_role(&labels(&["lead", "CLIENT"])).as_deref(), Some("CLIENT"));
        assert_eq!(KnownRole::parse(" referral partner "), Some(KnownRole::ReferralPartner));
    }

    #[test]
    fn test_priority_order() {
        for pair in KnownRole::ALL.windows(2) {
            assert!(pair[0].priority() < pair[1].priority());
        }
        assert_eq!(role_priority("Unknown"), KnownRole::ALL.len());
    }
}
