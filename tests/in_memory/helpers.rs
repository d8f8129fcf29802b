//! Shared test helpers for in-memory integration tests.

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use cicerone::bus::message::{Envelope, WireMessage};
use cicerone::bus::ports::{BusResult, MessageHandler};
use cicerone::scheduling::domain::{
    GuideId, GuideOffer, Money, Tag, TimeWindow, TouristId, TouristRequest,
};
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Mutex;

/// Clock pinned to a fixed instant for deterministic timestamps.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A fixed reference instant all test timestamps derive from.
pub fn reference_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// A window on the reference day, hours in whole-hour offsets.
pub fn window(start_hour: u32, end_hour: u32) -> TimeWindow {
    let start = Utc
        .with_ymd_and_hms(2026, 8, 1, start_hour, 0, 0)
        .single()
        .expect("valid start");
    let end = Utc
        .with_ymd_and_hms(2026, 8, 1, end_hour, 0, 0)
        .single()
        .expect("valid end");
    TimeWindow::new(start, end).expect("valid window")
}

/// Builds a tag set from string literals.
pub fn tags(values: &[&str]) -> BTreeSet<Tag> {
    values
        .iter()
        .map(|value| Tag::new(*value).expect("valid tag"))
        .collect()
}

/// Builds a tourist request published at the reference instant.
pub fn tourist(
    id: &str,
    availability: Vec<TimeWindow>,
    budget_cents: i64,
    preferences: &[&str],
) -> TouristRequest {
    TouristRequest::new(
        TouristId::new(id).expect("valid tourist id"),
        availability,
        Money::from_cents(budget_cents).expect("valid budget"),
        tags(preferences),
        &FixedClock(reference_instant()),
    )
}

/// Builds a guide offer published at the reference instant.
pub fn guide(
    id: &str,
    categories: &[&str],
    available_window: TimeWindow,
    rate_cents: i64,
    max_group_size: u32,
) -> GuideOffer {
    GuideOffer::new(
        GuideId::new(id).expect("valid guide id"),
        tags(categories),
        available_window,
        Money::from_cents(rate_cents).expect("valid rate"),
        max_group_size,
        &FixedClock(reference_instant()),
    )
    .expect("valid offer")
}

/// Handler that records every delivered envelope.
#[derive(Default)]
pub struct Recorder {
    envelopes: Mutex<Vec<Envelope>>,
}

impl Recorder {
    /// Returns the payloads delivered so far, in order.
    pub fn payloads(&self) -> Vec<WireMessage> {
        self.envelopes
            .lock()
            .expect("recorder lock")
            .iter()
            .map(|envelope| envelope.payload().clone())
            .collect()
    }
}

#[async_trait]
impl MessageHandler for Recorder {
    async fn handle(&self, envelope: &Envelope) -> BusResult<()> {
        self.envelopes
            .lock()
            .expect("recorder lock")
            .push(envelope.clone());
        Ok(())
    }
}
