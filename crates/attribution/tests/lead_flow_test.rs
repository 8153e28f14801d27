//! End-to-end attribution and scoring for a visitor who lands from an ad,
//! browses, and later submits a lead form.

use chrono::{Duration, Utc};
use leadflow_attribution::{
    calculate_conversion_value, calculate_lead_score, get_attribution_data, get_gclid,
    priority_for, qualification_for, validate_submission, ConversionEvent,
};
use leadflow_cache::{KeyValueStore, MemoryStore, ScopedStore};
use leadflow_core::types::{
    BudgetBracket, Lead, Priority, Qualification, RequestContext, TimelineBracket,
};

#[test]
fn test_ad_click_attributed_on_later_form_submit() {
    let shared = MemoryStore::new(31 * 24 * 3600, 1_000);
    let visitor = ScopedStore::new(&shared, "anon-42");
    let landed_at = Utc::now();

    let landing = RequestContext::parse(
        "/business-website?gclid=ABC123&utm_source=google&utm_medium=cpc",
        Some("https://www.google.com/"),
        landed_at,
    )
    .unwrap();
    let first = get_attribution_data(&visitor, &landing);
    assert_eq!(first.gclid.as_deref(), Some("ABC123"));
    assert_eq!(first.utm_medium.as_deref(), Some("cpc"));

    // Second visit a week later arrives organically.
    let contact_page = RequestContext::parse("/contact", None, landed_at + Duration::days(7))
        .unwrap();
    let second = get_attribution_data(&visitor, &contact_page);
    assert_eq!(second.gclid.as_deref(), Some("ABC123"));
    assert_eq!(second.utm_source, None);
    assert_eq!(second.referrer, None);
    assert_eq!(second.landing_page.as_deref(), Some("/contact"));

    // Another visitor sharing the store sees nothing.
    let stranger = ScopedStore::new(&shared, "anon-7");
    assert_eq!(get_gclid(&stranger, &contact_page), None);

    let lead: Lead = serde_json::from_value(serde_json::json!({
        "budget": "5lakh-plus",
        "timeline": "urgent",
        "email": "a@b.com",
        "phone": "1",
        "message": "x".repeat(60),
        "time_on_page": 200,
        "pages_visited": 5,
        "budget_approved": true
    }))
    .unwrap();
    validate_submission(None, &lead).unwrap();

    let score = calculate_lead_score(&lead);
    assert_eq!(score, 100);
    assert_eq!(qualification_for(score), Qualification::Hot);
    assert_eq!(priority_for(&lead), Priority::High);
    assert_eq!(
        calculate_conversion_value("business-website", lead.budget, lead.timeline),
        90_000
    );
    assert_eq!(
        ConversionEvent::for_source(Some("business-website")).as_str(),
        "business_website_lead_submit"
    );
}

#[test]
fn test_click_id_expires_after_thirty_days() {
    let store = MemoryStore::new(31 * 24 * 3600, 100);
    let start = Utc::now();
    let with_gclid = RequestContext::parse("/?gclid=ABC123", None, start).unwrap();
    assert_eq!(get_gclid(&store, &with_gclid).as_deref(), Some("ABC123"));

    let after = RequestContext::parse("/", None, start + Duration::days(30) + Duration::seconds(1))
        .unwrap();
    assert_eq!(get_gclid(&store, &after), None);
    assert_eq!(store.get("gclid").unwrap(), None);
    assert_eq!(store.get("gclid_expires").unwrap(), None);
}

#[test]
fn test_unknown_brackets_score_like_missing_ones() {
    let lead: Lead =
        serde_json::from_str(r#"{"budget": "1crore", "timeline": "next-year"}"#).unwrap();
    assert_eq!(calculate_lead_score(&lead), 0);
    assert_eq!(calculate_conversion_value("seo-audit", lead.budget, lead.timeline), 5_000);

    let low = Lead {
        budget: Some(BudgetBracket::Under50k),
        timeline: Some(TimelineBracket::Exploring),
        ..Default::default()
    };
    assert_eq!(calculate_lead_score(&low), 15);
    assert_eq!(qualification_for(calculate_lead_score(&low)), Qualification::Cold);
}
