//! Funnel journey aggregation.
//!
//! A pure projection over the conversion event log: grouped by
//! (cookie, partner, campaign), rebuilt wholesale on every run so reruns
//! can never double count. Dashboards read it eventually-consistently; it
//! is not on the attribution critical path.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::{
    data::{
        conversion::ConversionRepository,
        event_type::EventTypeRepository,
        funnel::{FunnelJourneyRepository, JourneyRollup},
    },
    error::Error,
};

pub struct FunnelService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> FunnelService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Recomputes every journey rollup from the conversion event log.
    /// Returns the number of journeys written.
    pub async fn recompute(&self, now: NaiveDateTime) -> Result<u64, Error> {
        let conversion_repo = ConversionRepository::new(self.db);
        let event_type_repo = EventTypeRepository::new(self.db);
        let journey_repo = FunnelJourneyRepository::new(self.db);

        let events = conversion_repo.list_attributed().await?;
        let terminal_ids = event_type_repo.terminal_ids().await?;

        let mut groups: BTreeMap<(Uuid, i32, i32), JourneyRollup> = BTreeMap::new();

        for event in events {
            // list_attributed only returns rows with all three keys present
            let (Some(cookie_id), Some(partner_id), Some(campaign_id)) =
                (event.cookie_id, event.partner_id, event.campaign_id)
            else {
                continue;
            };

            let commission = event.commission_amount.unwrap_or(Decimal::ZERO);
            let reached_terminal = terminal_ids.contains(&event.event_type_id);

            groups
                .entry((cookie_id, partner_id, campaign_id))
                .and_modify(|rollup| {
                    rollup.journey_started_at = rollup.journey_started_at.min(event.occurred_at);
                    rollup.last_event_at = rollup.last_event_at.max(event.occurred_at);
                    rollup.total_events += 1;
                    rollup.total_commission += commission;
                    rollup.is_converted |= reached_terminal;
                })
                .or_insert(JourneyRollup {
                    cookie_id,
                    partner_id,
                    campaign_id,
                    journey_started_at: event.occurred_at,
                    last_event_at: event.occurred_at,
                    total_events: 1,
                    total_commission: commission,
                    is_converted: reached_terminal,
                });
        }

        let rollups: Vec<JourneyRollup> = groups.into_values().collect();
        let written = journey_repo.replace_all(rollups, now).await?;

        tracing::info!("Recomputed {written} funnel journeys");

        Ok(written)
    }
}
