use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Display identity of the active citizen. Mutable in place; one instance
/// per session; last write wins when synchronized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    pub commune: String,
    pub avatar: String,
    pub joined_at: DateTime<Utc>,
    pub motto: String,
    pub id_number: String,
    /// Consecutive days of activity; maintained by the caller.
    pub streak: u32,
}

impl UserProfile {
    /// The default identity handed to a fresh install.
    pub fn anonymous() -> Self {
        let suffix: u32 = rand::rng().random_range(1000..10000);
        Self {
            username: "Citoyen Anonyme".to_string(),
            commune: "Abidjan".to_string(),
            avatar: "https://api.dicebear.com/7.x/bottts/svg?seed=Sentinelle".to_string(),
            joined_at: Utc::now(),
            motto: "Pour une Côte d'Ivoire plus propre.".to_string(),
            id_number: format!("SV-225-{}", suffix),
            streak: 1,
        }
    }
}

/// The mocked authentication principal for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub uid: String,
    pub display_name: String,
}

impl SessionUser {
    /// The local mock account used while real authentication is absent.
    pub fn local_mock() -> Self {
        Self {
            uid: "local-user-123".to_string(),
            display_name: "Sentinelle CI".to_string(),
        }
    }
}
