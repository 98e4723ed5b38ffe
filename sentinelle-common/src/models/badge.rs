use serde::{Deserialize, Serialize};

/// Aggregate gamification numbers derived from a report collection.
/// Always recomputed from scratch, never maintained incrementally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactStats {
    pub points: u64,
    pub solutions_count: u64,
    pub reports_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeCategory {
    Reports,
    Solutions,
    Points,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub threshold: u64,
    pub category: BadgeCategory,
}

impl Badge {
    pub fn unlocked_by(&self, stats: &ImpactStats) -> bool {
        let value = match self.category {
            BadgeCategory::Reports => stats.reports_count,
            BadgeCategory::Solutions => stats.solutions_count,
            BadgeCategory::Points => stats.points,
        };
        value >= self.threshold
    }
}

pub const OFFICIAL_BADGES: [Badge; 4] = [
    Badge {
        id: "1",
        title: "Vigilant",
        description: "Premier signalement effectué",
        icon: "visibility",
        threshold: 1,
        category: BadgeCategory::Reports,
    },
    Badge {
        id: "2",
        title: "Nettoyeur",
        description: "Une zone résolue avec succès",
        icon: "cleaning_services",
        threshold: 1,
        category: BadgeCategory::Solutions,
    },
    Badge {
        id: "3",
        title: "Patriote",
        description: "5 signalements d'intérêt public",
        icon: "flag",
        threshold: 5,
        category: BadgeCategory::Reports,
    },
    Badge {
        id: "4",
        title: "Expert",
        description: "Atteindre 500 points d'impact",
        icon: "military_tech",
        threshold: 500,
        category: BadgeCategory::Points,
    },
];
