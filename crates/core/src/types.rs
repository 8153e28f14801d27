use crate::error::{LeadError, LeadResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Base used to resolve path-only URLs such as `/business-website?gclid=X`.
const RELATIVE_URL_BASE: &str = "http://localhost/";

/// Marketing attribution captured for a single page view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gclid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fbclid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landing_page: Option<String>,
}

/// Budget bracket selected on a lead form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BudgetBracket {
    #[serde(rename = "under-50k")]
    Under50k,
    #[serde(rename = "50k-2lakh")]
    From50kTo2Lakh,
    #[serde(rename = "2lakh-5lakh")]
    From2LakhTo5Lakh,
    #[serde(rename = "5lakh-plus")]
    Above5Lakh,
}

impl BudgetBracket {
    pub const ALL: [BudgetBracket; 4] = [
        BudgetBracket::Under50k,
        BudgetBracket::From50kTo2Lakh,
        BudgetBracket::From2LakhTo5Lakh,
        BudgetBracket::Above5Lakh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetBracket::Under50k => "under-50k",
            BudgetBracket::From50kTo2Lakh => "50k-2lakh",
            BudgetBracket::From2LakhTo5Lakh => "2lakh-5lakh",
            BudgetBracket::Above5Lakh => "5lakh-plus",
        }
    }

    /// Lenient lookup: unknown keys yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        key.parse().ok()
    }
}

impl FromStr for BudgetBracket {
    type Err = LeadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|bracket| bracket.as_str() == s)
            .ok_or_else(|| LeadError::Validation(format!("unknown budget bracket '{s}'")))
    }
}

impl fmt::Display for BudgetBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How soon the prospect wants to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimelineBracket {
    Urgent,
    ThisMonth,
    ThisQuarter,
    Exploring,
}

impl TimelineBracket {
    pub const ALL: [TimelineBracket; 4] = [
        TimelineBracket::Urgent,
        TimelineBracket::ThisMonth,
        TimelineBracket::ThisQuarter,
        TimelineBracket::Exploring,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimelineBracket::Urgent => "urgent",
            TimelineBracket::ThisMonth => "this-month",
            TimelineBracket::ThisQuarter => "this-quarter",
            TimelineBracket::Exploring => "exploring",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        key.parse().ok()
    }
}

impl FromStr for TimelineBracket {
    type Err = LeadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|bracket| bracket.as_str() == s)
            .ok_or_else(|| LeadError::Validation(format!("unknown timeline bracket '{s}'")))
    }
}

impl fmt::Display for TimelineBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lead form state used for scoring. Never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lead {
    #[serde(default, deserialize_with = "lenient_bracket")]
    pub budget: Option<BudgetBracket>,
    #[serde(default, deserialize_with = "lenient_bracket")]
    pub timeline: Option<TimelineBracket>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Seconds spent on the landing page.
    #[serde(default)]
    pub time_on_page: Option<f64>,
    #[serde(default)]
    pub pages_visited: Option<u32>,
    #[serde(default)]
    pub budget_approved: bool,
}

/// Unknown bracket keys degrade to "no bracket" instead of rejecting the lead.
fn lenient_bracket<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|key| key.parse().ok()))
}

/// Sales banding of a lead score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Qualification {
    Hot,
    Warm,
    Cold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Page-view inputs that a browser would expose as globals: the current URL,
/// `document.referrer`, and the clock.
#[derive(Debug, Clone)]
pub struct RequestContext {
    url: Url,
    referrer: Option<String>,
    now: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(url: Url, referrer: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            url,
            referrer: referrer.filter(|r| !r.is_empty()),
            now,
        }
    }

    /// Parse an absolute URL or a path with query string.
    pub fn parse(raw_url: &str, referrer: Option<&str>, now: DateTime<Utc>) -> LeadResult<Self> {
        let base = Url::parse(RELATIVE_URL_BASE)?;
        let url = Url::options().base_url(Some(&base)).parse(raw_url)?;
        Ok(Self::new(url, referrer.map(str::to_string), now))
    }

    /// First value of a query parameter. Empty values count as absent.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn referrer(&self) -> Option<&str> {
        self.referrer.as_deref()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}
