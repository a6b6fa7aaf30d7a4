use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// The five persisted collections. The string form is the storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Donations,
    Requests,
    Users,
    Campaigns,
    Notifications,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Donations,
        Collection::Requests,
        Collection::Users,
        Collection::Campaigns,
        Collection::Notifications,
    ];

    /// Convert from a storage key. Keys are case-sensitive.
    pub fn from_key(s: &str) -> Option<Self> {
        match s {
            "donations" => Some(Collection::Donations),
            "requests" => Some(Collection::Requests),
            "users" => Some(Collection::Users),
            "campaigns" => Some(Collection::Campaigns),
            "notifications" => Some(Collection::Notifications),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Collection::Donations => "donations",
            Collection::Requests => "requests",
            Collection::Users => "users",
            Collection::Campaigns => "campaigns",
            Collection::Notifications => "notifications",
        }
    }

    /// Whether entries of this collection age out of the active view.
    pub fn is_retained(self) -> bool {
        !matches!(self, Collection::Users)
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// An entity stored as one element of a collection's serialized sequence.
pub trait CollectionEntity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: Collection;

    fn id(&self) -> &str;

    /// Creation time used by the retention filter. `None` exempts the entity.
    fn created_at(&self) -> Option<DateTime<Utc>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for c in Collection::ALL {
            assert_eq!(Collection::from_key(c.key()), Some(c));
        }
        assert_eq!(Collection::from_key("Donations"), None);
        assert_eq!(Collection::from_key("USERS"), None);
        assert_eq!(Collection::from_key("theme"), None);
    }

    #[test]
    fn only_users_are_exempt() {
        let exempt: Vec<_> = Collection::ALL
            .into_iter()
            .filter(|c| !c.is_retained())
            .collect();
        assert_eq!(exempt, vec![Collection::Users]);
    }
}
