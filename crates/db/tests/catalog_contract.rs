use turfquote_core::domain::pricing::{assert_no_bracket_overlap, Tier};
use turfquote_core::quoting::scoring;
use turfquote_core::{
    DeterministicQuoteRuntime, DisplaySeason, QuoteEvaluationInput, QuoteRuntime,
};
use turfquote_db::repositories::{CatalogRepository, LeadRepository, SqlCatalogRepository, SqlLeadRepository};
use turfquote_db::{connect_with_settings, migrations, DbPool, DemoCatalog};

async fn seeded_pool() -> DbPool {
    let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
    migrations::run_pending(&pool).await.expect("run migrations");
    DemoCatalog::load(&pool).await.expect("load demo catalog");
    pool
}

#[tokio::test]
async fn seeded_catalog_satisfies_domain_invariants() {
    let pool = seeded_pool().await;
    let catalog = SqlCatalogRepository::new(pool);

    for service in catalog.active_services().await.expect("services") {
        service.validate().expect("service invariants");

        let rows = catalog.pricing_rows_for_service(&service.id).await.expect("rows");
        for row in &rows {
            row.validate().expect("pricing row invariants");
        }
        assert_no_bracket_overlap(&rows).expect("brackets must not overlap");

        for modifier in catalog.modifiers_for_service(&service.id).await.expect("modifiers") {
            modifier.validate().expect("modifier invariants");
        }
    }
}

#[tokio::test]
async fn winter_quote_for_maplewood_small_lot_uses_override_and_off_season_rate() {
    let pool = seeded_pool().await;
    let catalog = SqlCatalogRepository::new(pool);

    let mowing =
        catalog.find_service_by_slug("lawn-mowing").await.expect("query").expect("seeded service");
    let maplewood =
        catalog.find_location_by_slug("maplewood").await.expect("query").expect("seeded location");
    let rows = catalog.pricing_rows_for_service(&mowing.id).await.expect("rows");
    let modifiers = catalog.modifiers_for_service(&mowing.id).await.expect("modifiers");

    let runtime = DeterministicQuoteRuntime::default();
    let evaluation = runtime.evaluate(QuoteEvaluationInput {
        rows: &rows,
        modifiers: &modifiers,
        location: Some(&maplewood.id),
        lot_size_sqft: Some(5_000.0),
        month: 1,
    });

    assert_eq!(evaluation.display_season, DisplaySeason::Winter);
    assert_eq!(evaluation.seasonal_label.as_deref(), Some("Off-season rate"));

    let tiers: Vec<Tier> = evaluation.ranges.iter().map(|range| range.tier).collect();
    assert_eq!(tiers, vec![Tier::Good, Tier::Better, Tier::Best]);

    // Maplewood override [45,65] at 0.90: 40.5 and 58.5 round away from zero.
    let good = &evaluation.ranges[0];
    assert_eq!((good.min, good.max), (41, 59));

    // Default better row [55,80] at 0.90: 49.5 rounds to 50.
    let better = &evaluation.ranges[1];
    assert_eq!((better.min, better.max), (50, 72));

    // Default best row [75,105] at 0.90: 67.5 and 94.5 round away from zero.
    let best = &evaluation.ranges[2];
    assert_eq!((best.min, best.max), (68, 95));
}

#[tokio::test]
async fn summer_quote_uses_unmodified_default_rows() {
    let pool = seeded_pool().await;
    let catalog = SqlCatalogRepository::new(pool);

    let mowing =
        catalog.find_service_by_slug("lawn-mowing").await.expect("query").expect("seeded service");
    let rows = catalog.pricing_rows_for_service(&mowing.id).await.expect("rows");
    let modifiers = catalog.modifiers_for_service(&mowing.id).await.expect("modifiers");

    let runtime = DeterministicQuoteRuntime::default();
    let evaluation = runtime.evaluate(QuoteEvaluationInput {
        rows: &rows,
        modifiers: &modifiers,
        location: None,
        lot_size_sqft: Some(15_000.0),
        month: 7,
    });

    assert_eq!(evaluation.display_season, DisplaySeason::Summer);
    assert_eq!(evaluation.seasonal_label, None);

    // Medium-bracket default rows pass through untouched in July.
    assert_eq!(evaluation.ranges.len(), 2);
    assert_eq!((evaluation.ranges[0].min, evaluation.ranges[0].max), (55, 75));
    assert_eq!((evaluation.ranges[1].min, evaluation.ranges[1].max), (70, 95));
}

#[tokio::test]
async fn stored_lead_score_matches_the_engine() {
    let pool = seeded_pool().await;
    let leads = SqlLeadRepository::new(pool);

    let recent = leads.list_recent(10).await.expect("list leads");
    assert_eq!(recent.len(), 1, "demo catalog seeds exactly one lead");

    let lead = &recent[0];
    assert_eq!(lead.score, scoring::score(&lead.submission), "stored score must not drift");
    assert_eq!(lead.score, 95);
}

#[tokio::test]
async fn lead_round_trip_preserves_submission_fields() {
    use chrono::Utc;
    use turfquote_core::domain::lead::{Frequency, Lead, LeadId, LeadSubmission};
    use uuid::Uuid;

    let pool = seeded_pool().await;
    let catalog = SqlCatalogRepository::new(pool.clone());
    let leads = SqlLeadRepository::new(pool);

    let mowing =
        catalog.find_service_by_slug("lawn-mowing").await.expect("query").expect("seeded service");

    let submission = LeadSubmission {
        name: Some("Casey Nguyen".to_string()),
        email: Some("casey@example.com".to_string()),
        phone: None,
        address: None,
        city: Some("Cedar Grove".to_string()),
        zip: Some("07009".to_string()),
        service_id: Some(mowing.id),
        location_id: None,
        tier: Some(Tier::Good),
        frequency: Some(Frequency::Biweekly),
        notes: None,
    };
    let lead = Lead::from_submission(
        LeadId(Uuid::new_v4()),
        submission.clone(),
        scoring::score(&submission),
        Utc::now(),
    );
    let id = lead.id;

    leads.insert(lead).await.expect("insert lead");
    let found = leads.find_by_id(&id).await.expect("find lead").expect("lead present");

    assert_eq!(found.submission, submission);
    // 15 email + 5 city/zip + 10 service + 10 good tier + 15 biweekly
    assert_eq!(found.score, 55);
}
