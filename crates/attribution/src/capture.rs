//! Attribution capture: reads click ids and UTM tags from the landing URL and
//! keeps the Google Ads click id (GCLID) in visitor storage for 30 days so
//! later conversions can still be attributed to the original ad click.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use leadflow_cache::KeyValueStore;
use leadflow_core::config::{AttributionConfig, MAX_CLICK_ID_TTL_DAYS};
use leadflow_core::types::{AttributionData, RequestContext};
use leadflow_core::{LeadError, LeadResult};
use tracing::{debug, error, info, warn};

pub const GCLID_KEY: &str = "gclid";
pub const GCLID_EXPIRES_KEY: &str = "gclid_expires";

/// Captures attribution for a page view against an injected store.
#[derive(Debug, Clone)]
pub struct AttributionCapture {
    click_id_ttl: Duration,
}

impl Default for AttributionCapture {
    fn default() -> Self {
        Self::new(&AttributionConfig::default())
    }
}

impl AttributionCapture {
    /// Windows outside `1..=MAX_CLICK_ID_TTL_DAYS` are clamped.
    pub fn new(config: &AttributionConfig) -> Self {
        let days = config.click_id_ttl_days.clamp(1, MAX_CLICK_ID_TTL_DAYS);
        if days != config.click_id_ttl_days {
            warn!(
                configured = config.click_id_ttl_days,
                clamped = days,
                "Click id window out of range"
            );
        }
        Self {
            click_id_ttl: Duration::try_days(days).unwrap_or_else(|| Duration::days(1)),
        }
    }

    /// GCLID from the URL (persisted with a fresh expiry), else the stored one
    /// if it has not expired. Storage failures are logged and yield `None`.
    pub fn get_gclid<S>(&self, store: &S, ctx: &RequestContext) -> Option<String>
    where
        S: KeyValueStore + ?Sized,
    {
        match self.resolve_gclid(store, ctx) {
            Ok(gclid) => gclid,
            Err(e) => {
                error!(error = %e, "Error getting GCLID");
                None
            }
        }
    }

    fn resolve_gclid<S>(&self, store: &S, ctx: &RequestContext) -> LeadResult<Option<String>>
    where
        S: KeyValueStore + ?Sized,
    {
        if let Some(gclid) = ctx.query_param(GCLID_KEY) {
            let expires_at = ctx
                .now()
                .checked_add_signed(self.click_id_ttl)
                .ok_or_else(|| {
                    LeadError::Validation(format!("GCLID expiry overflows from {}", ctx.now()))
                })?;
            store.set(GCLID_KEY, &gclid)?;
            store.set(
                GCLID_EXPIRES_KEY,
                &expires_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            )?;
            metrics::counter!("attribution.gclid.captured").increment(1);
            info!(gclid = %gclid, expires_at = %expires_at, "GCLID captured");
            return Ok(Some(gclid));
        }

        let stored = store.get(GCLID_KEY)?.filter(|v| !v.is_empty());
        let expires = store.get(GCLID_EXPIRES_KEY)?.filter(|v| !v.is_empty());
        let (Some(stored), Some(expires)) = (stored, expires) else {
            return Ok(None);
        };

        match DateTime::parse_from_rfc3339(&expires) {
            Ok(expiry) if expiry.with_timezone(&Utc) > ctx.now() => Ok(Some(stored)),
            parsed => {
                if parsed.is_err() {
                    warn!(expires = %expires, "Unparsable GCLID expiry, discarding");
                }
                store.remove(GCLID_KEY)?;
                store.remove(GCLID_EXPIRES_KEY)?;
                metrics::counter!("attribution.gclid.expired").increment(1);
                debug!(gclid = %stored, "Stored GCLID expired, cleared");
                Ok(None)
            }
        }
    }

    /// Everything known about where this visit came from.
    pub fn get_attribution_data<S>(&self, store: &S, ctx: &RequestContext) -> AttributionData
    where
        S: KeyValueStore + ?Sized,
    {
        let data = AttributionData {
            gclid: self.get_gclid(store, ctx),
            utm_source: ctx.query_param("utm_source"),
            utm_medium: ctx.query_param("utm_medium"),
            utm_campaign: ctx.query_param("utm_campaign"),
            utm_term: ctx.query_param("utm_term"),
            utm_content: ctx.query_param("utm_content"),
            fbclid: ctx.query_param("fbclid"),
            referrer: ctx.referrer().map(str::to_string),
            landing_page: Some(ctx.path().to_string()).filter(|p| !p.is_empty()),
        };

        debug!(attribution = ?data, "Captured attribution data");
        data
    }

    /// Like [`Self::get_attribution_data`] but starting from a raw URL string.
    /// A URL that cannot be parsed yields empty attribution.
    pub fn capture_from_url<S>(
        &self,
        store: &S,
        raw_url: &str,
        referrer: Option<&str>,
        now: DateTime<Utc>,
    ) -> AttributionData
    where
        S: KeyValueStore + ?Sized,
    {
        match RequestContext::parse(raw_url, referrer, now) {
            Ok(ctx) => self.get_attribution_data(store, &ctx),
            Err(e) => {
                error!(error = %e, url = raw_url, "Error getting attribution data");
                AttributionData::default()
            }
        }
    }
}

/// [`AttributionCapture::get_gclid`] with the standard 30-day window.
pub fn get_gclid<S: KeyValueStore + ?Sized>(store: &S, ctx: &RequestContext) -> Option<String> {
    AttributionCapture::default().get_gclid(store, ctx)
}

/// [`AttributionCapture::get_attribution_data`] with the standard 30-day window.
pub fn get_attribution_data<S: KeyValueStore + ?Sized>(
    store: &S,
    ctx: &RequestContext,
) -> AttributionData {
    AttributionCapture::default().get_attribution_data(store, ctx)
}

pub fn capture_from_url<S: KeyValueStore + ?Sized>(
    store: &S,
    raw_url: &str,
    referrer: Option<&str>,
    now: DateTime<Utc>,
) -> AttributionData {
    AttributionCapture::default().capture_from_url(store, raw_url, referrer, now)
}
