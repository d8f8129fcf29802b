//! Unit tests for the agent registry.

use super::fixtures::{guide, reference_instant, tags, tourist, window, FixedClock};
use crate::scheduling::domain::{GuideId, Money, TouristId, TouristRequest};
use crate::scheduling::registry::{AgentRegistry, UpsertOutcome};
use chrono::Duration;
use eyre::ensure;
use rstest::{fixture, rstest};

#[fixture]
fn registry() -> AgentRegistry {
    AgentRegistry::new(Duration::minutes(5))
}

/// A request for `t1` published at an offset from the reference instant.
fn request_published_at(offset: Duration, budget_cents: i64) -> TouristRequest {
    TouristRequest::new(
        TouristId::new("t1").expect("valid tourist id"),
        vec![window(9, 12)],
        Money::from_cents(budget_cents).expect("valid budget"),
        tags(&["history"]),
        &FixedClock(reference_instant() + offset),
    )
}

#[rstest]
fn upsert_replaces_the_stored_request(registry: AgentRegistry) -> eyre::Result<()> {
    registry.upsert_request(request_published_at(Duration::zero(), 5000))?;
    let outcome = registry.upsert_request(request_published_at(Duration::minutes(1), 9000))?;

    ensure!(outcome.is_applied());
    let snapshot = registry.snapshot()?;
    ensure!(snapshot.requests().len() == 1);
    let stored = snapshot
        .requests()
        .first()
        .ok_or_else(|| eyre::eyre!("one request"))?;
    ensure!(stored.budget() == Money::from_cents(9000)?);
    Ok(())
}

#[rstest]
fn upsert_beyond_staleness_window_is_discarded(registry: AgentRegistry) -> eyre::Result<()> {
    registry.upsert_request(request_published_at(Duration::minutes(10), 5000))?;
    let outcome = registry.upsert_request(request_published_at(Duration::zero(), 9000))?;

    ensure!(outcome == UpsertOutcome::DiscardedStale);
    let snapshot = registry.snapshot()?;
    let stored = snapshot
        .requests()
        .first()
        .ok_or_else(|| eyre::eyre!("one request"))?;
    ensure!(stored.budget() == Money::from_cents(5000)?);
    Ok(())
}

#[rstest]
fn slightly_older_upsert_within_window_still_wins(registry: AgentRegistry) -> eyre::Result<()> {
    // Last write wins inside the jitter tolerance even when its timestamp
    // lags the stored record.
    registry.upsert_request(request_published_at(Duration::minutes(2), 5000))?;
    let outcome = registry.upsert_request(request_published_at(Duration::zero(), 9000))?;

    ensure!(outcome.is_applied());
    let snapshot = registry.snapshot()?;
    let stored = snapshot
        .requests()
        .first()
        .ok_or_else(|| eyre::eyre!("one request"))?;
    ensure!(stored.budget() == Money::from_cents(9000)?);
    Ok(())
}

#[rstest]
fn cancel_reports_whether_an_entry_existed(registry: AgentRegistry) -> eyre::Result<()> {
    let tourist_id = TouristId::new("t1")?;
    ensure!(!registry.cancel_request(&tourist_id)?);

    registry.upsert_request(request_published_at(Duration::zero(), 5000))?;
    ensure!(registry.cancel_request(&tourist_id)?);
    ensure!(registry.snapshot()?.is_empty());
    Ok(())
}

#[rstest]
fn cancel_offer_removes_the_guide(registry: AgentRegistry) -> eyre::Result<()> {
    registry.upsert_offer(guide("g1", &["history"], window(9, 12), 6000, 4))?;
    let guide_id = GuideId::new("g1")?;

    ensure!(registry.cancel_offer(&guide_id)?);
    ensure!(!registry.cancel_offer(&guide_id)?);
    Ok(())
}

#[rstest]
fn remove_expired_prunes_finished_windows(registry: AgentRegistry) -> eyre::Result<()> {
    registry.upsert_request(tourist("t1", vec![window(9, 10)], 5000, &[]))?;
    registry.upsert_request(tourist("t2", vec![window(9, 10), window(15, 16)], 5000, &[]))?;
    registry.upsert_offer(guide("g1", &["history"], window(9, 10), 6000, 4))?;
    registry.upsert_offer(guide("g2", &["food"], window(15, 16), 6000, 4))?;

    let pruned = registry.remove_expired(window(11, 12).start())?;

    ensure!(pruned.requests_removed == 1);
    ensure!(pruned.offers_removed == 1);
    let snapshot = registry.snapshot()?;
    ensure!(snapshot.requests().len() == 1);
    ensure!(snapshot.offers().len() == 1);
    Ok(())
}

#[rstest]
fn snapshot_is_sorted_and_detached(registry: AgentRegistry) -> eyre::Result<()> {
    registry.upsert_request(tourist("t2", vec![window(9, 12)], 5000, &[]))?;
    registry.upsert_request(tourist("t1", vec![window(9, 12)], 5000, &[]))?;
    registry.upsert_offer(guide("g2", &["food"], window(9, 12), 6000, 4))?;
    registry.upsert_offer(guide("g1", &["history"], window(9, 12), 6000, 4))?;

    let snapshot = registry.snapshot()?;
    registry.upsert_request(tourist("t3", vec![window(9, 12)], 5000, &[]))?;

    ensure!(
        snapshot
            .requests()
            .iter()
            .map(|request| request.tourist_id().as_str())
            .eq(["t1", "t2"])
    );
    ensure!(
        snapshot
            .offers()
            .iter()
            .map(|offer| offer.guide_id().as_str())
            .eq(["g1", "g2"])
    );
    Ok(())
}
