use crate::error::{LeadError, LeadResult};
use crate::types::{BudgetBracket, TimelineBracket};
use serde::Deserialize;
use std::collections::HashMap;

/// Root application configuration. Loaded from an optional
/// `config/leadflow.toml` file and environment variables with the prefix
/// `LEADFLOW__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub attribution: AttributionConfig,
    #[serde(default)]
    pub scoring: ScoringWeights,
    #[serde(default)]
    pub value: ValueTable,
    #[serde(default)]
    pub conversion: ConversionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

/// In-process visitor storage.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_store_max_entries")]
    pub max_entries: usize,
    #[serde(default = "default_maintenance_interval_secs")]
    pub maintenance_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttributionConfig {
    /// How long a captured GCLID stays attributable (Google's standard window).
    #[serde(default = "default_click_id_ttl_days")]
    pub click_id_ttl_days: i64,
}

/// Longest accepted click id window. Google Ads caps attribution at 90 days.
pub const MAX_CLICK_ID_TTL_DAYS: i64 = 365;

const SECS_PER_DAY: u64 = 86_400;

impl AttributionConfig {
    /// The window must be between one day and [`MAX_CLICK_ID_TTL_DAYS`].
    pub fn validate(&self) -> LeadResult<()> {
        if !(1..=MAX_CLICK_ID_TTL_DAYS).contains(&self.click_id_ttl_days) {
            return Err(LeadError::Config(format!(
                "attribution.click_id_ttl_days must be within 1..={MAX_CLICK_ID_TTL_DAYS}, got {}",
                self.click_id_ttl_days
            )));
        }
        Ok(())
    }

    /// Window length in seconds, clamped to the accepted range.
    pub fn click_id_ttl_secs(&self) -> u64 {
        self.click_id_ttl_days.clamp(1, MAX_CLICK_ID_TTL_DAYS) as u64 * SECS_PER_DAY
    }
}

// Default functions
fn default_node_id() -> String {
    "leadflow-01".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_metrics_port() -> u16 {
    9091
}
fn default_store_ttl_secs() -> u64 {
    // Outlives the click id window so expiry is decided by the stored timestamp.
    31 * 24 * 3600
}
fn default_store_max_entries() -> usize {
    1_000_000
}
fn default_maintenance_interval_secs() -> u64 {
    60
}
fn default_click_id_ttl_days() -> i64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            port: default_metrics_port(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_store_ttl_secs(),
            max_entries: default_store_max_entries(),
            maintenance_interval_secs: default_maintenance_interval_secs(),
        }
    }
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            click_id_ttl_days: default_click_id_ttl_days(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            store: StoreConfig::default(),
            attribution: AttributionConfig::default(),
            scoring: ScoringWeights::default(),
            value: ValueTable::default(),
            conversion: ConversionConfig::default(),
        }
    }
}

// ─── Bracket Tables ─────────────────────────────────────────────────────────

/// One entry per budget bracket.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BudgetTable<T> {
    pub under_50k: T,
    pub from_50k_to_2lakh: T,
    pub from_2lakh_to_5lakh: T,
    pub above_5lakh: T,
}

impl<T: Copy> BudgetTable<T> {
    pub fn get(&self, bracket: BudgetBracket) -> T {
        match bracket {
            BudgetBracket::Under50k => self.under_50k,
            BudgetBracket::From50kTo2Lakh => self.from_50k_to_2lakh,
            BudgetBracket::From2LakhTo5Lakh => self.from_2lakh_to_5lakh,
            BudgetBracket::Above5Lakh => self.above_5lakh,
        }
    }
}

/// One entry per timeline bracket.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TimelineTable<T> {
    pub urgent: T,
    pub this_month: T,
    pub this_quarter: T,
    pub exploring: T,
}

impl<T: Copy> TimelineTable<T> {
    pub fn get(&self, bracket: TimelineBracket) -> T {
        match bracket {
            TimelineBracket::Urgent => self.urgent,
            TimelineBracket::ThisMonth => self.this_month,
            TimelineBracket::ThisQuarter => self.this_quarter,
            TimelineBracket::Exploring => self.exploring,
        }
    }
}

// ─── Lead Scoring Weights ───────────────────────────────────────────────────

/// Points awarded per lead attribute. The defaults are the production
/// heuristics and have no derivation beyond that.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub budget: BudgetTable<u32>,
    pub timeline: TimelineTable<u32>,
    pub email: u32,
    pub phone: u32,
    pub detailed_message: u32,
    /// A message must be strictly longer than this to count as detailed.
    pub detailed_message_chars: usize,
    pub engaged_time: u32,
    pub engaged_time_secs: f64,
    pub multi_page: u32,
    pub multi_page_threshold: u32,
    pub max_score: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            budget: BudgetTable {
                under_50k: 10,
                from_50k_to_2lakh: 25,
                from_2lakh_to_5lakh: 35,
                above_5lakh: 40,
            },
            timeline: TimelineTable {
                urgent: 20,
                this_month: 15,
                this_quarter: 10,
                exploring: 5,
            },
            email: 10,
            phone: 10,
            detailed_message: 10,
            detailed_message_chars: 50,
            engaged_time: 5,
            engaged_time_secs: 120.0,
            multi_page: 5,
            multi_page_threshold: 3,
            max_score: 100,
        }
    }
}

// ─── Conversion Value Table ─────────────────────────────────────────────────

/// Base value (INR) per landing page and the multipliers applied on top.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValueTable {
    pub base_values: HashMap<String, u64>,
    pub fallback_value: u64,
    pub budget_multipliers: BudgetTable<f64>,
    pub timeline_multipliers: TimelineTable<f64>,
}

impl Default for ValueTable {
    fn default() -> Self {
        let base_values = [
            ("business-website", 15_000),
            ("seo-audit", 5_000),
            ("next-js-development", 25_000),
            ("reactjs-development", 25_000),
            ("web-development", 20_000),
            ("website-services", 18_000),
            ("enterprise", 50_000),
        ]
        .into_iter()
        .map(|(slug, value)| (slug.to_string(), value))
        .collect();

        Self {
            base_values,
            fallback_value: 10_000,
            budget_multipliers: BudgetTable {
                under_50k: 0.5,
                from_50k_to_2lakh: 1.0,
                from_2lakh_to_5lakh: 2.0,
                above_5lakh: 3.0,
            },
            timeline_multipliers: TimelineTable {
                urgent: 2.0,
                this_month: 1.5,
                this_quarter: 1.0,
                exploring: 0.5,
            },
        }
    }
}

// ─── Google Ads Conversion Config ───────────────────────────────────────────

/// Placeholder left in label slots that were never configured in Google Ads.
pub const UNSET_CONVERSION_LABEL: &str = "LABEL_HERE";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Google Ads conversion id, e.g. `AW-XXXXXXXXXX`.
    pub conversion_id: String,
    /// Conversion label keyed by event name.
    pub labels: HashMap<String, String>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        let labels = [
            ("business_website_lead_submit", "Y3bsCKXpn6gbEJC-sctB"),
            ("business_website_call_click", "IFTrCKXfy6gbEJC-sctB"),
            ("business_website_whatsapp_click", "XO54CKjpn6gbEJC-sctB"),
        ]
        .into_iter()
        .map(|(event, label)| (event.to_string(), label.to_string()))
        .collect();

        Self {
            conversion_id: "AW-17606401808".to_string(),
            labels,
        }
    }
}

impl AppConfig {
    /// Load configuration from the optional config file and environment variables.
    pub fn load() -> LeadResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/leadflow").required(false))
            .add_source(
                config::Environment::with_prefix("LEADFLOW")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.normalize()?;
        Ok(config)
    }

    /// Validate cross-section settings. Store entries must outlive the click
    /// id window, so the store TTL is raised to the window plus one day.
    pub fn normalize(&mut self) -> LeadResult<()> {
        self.attribution.validate()?;
        let min_store_ttl = self.attribution.click_id_ttl_secs() + SECS_PER_DAY;
        self.store.ttl_secs = self.store.ttl_secs.max(min_store_ttl);
        Ok(())
    }
}
