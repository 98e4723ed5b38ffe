use tracing::info;

use sentinelle_common::models::badge::{Badge, ImpactStats, OFFICIAL_BADGES};

use crate::eventbus::{AppEvent, EventBus};

/// Evaluates the official badge table against derived impact stats and
/// announces threshold crossings.
pub struct ImpactService {
    events: EventBus,
}

impl ImpactService {
    pub fn new(events: EventBus) -> Self {
        Self { events }
    }

    /// All badges unlocked at the given stats.
    pub fn unlocked(stats: &ImpactStats) -> Vec<&'static Badge> {
        OFFICIAL_BADGES
            .iter()
            .filter(|b| b.unlocked_by(stats))
            .collect()
    }

    /// Badges crossing their threshold between two snapshots. Each one is
    /// published so the shell can run its celebration overlay.
    pub async fn newly_unlocked(
        &self,
        before: &ImpactStats,
        after: &ImpactStats,
    ) -> Vec<&'static Badge> {
        let fresh: Vec<&'static Badge> = OFFICIAL_BADGES
            .iter()
            .filter(|b| !b.unlocked_by(before) && b.unlocked_by(after))
            .collect();

        for badge in &fresh {
            info!(badge = badge.title, "badge unlocked");
            self.events
                .publish(AppEvent::BadgeUnlocked {
                    badge_title: badge.title.to_string(),
                })
                .await;
        }
        fresh
    }
}
