//! Marketing attribution and lead scoring.
//!
//! # Modules
//!
//! - [`capture`]: GCLID persistence and UTM/referrer aggregation
//! - [`scoring`]: 0-100 lead score, qualification band, follow-up priority
//! - [`value`]: dynamic conversion value for ad-platform bidding
//! - [`conversion`]: Google Ads conversion event and label lookup
//! - [`validation`]: lead intake checks

#![warn(clippy::unwrap_used)]

pub mod capture;
pub mod conversion;
pub mod scoring;
pub mod validation;
pub mod value;

pub use capture::{capture_from_url, get_attribution_data, get_gclid, AttributionCapture};
pub use conversion::ConversionEvent;
pub use scoring::{calculate_lead_score, priority_for, qualification_for, LeadScorer};
pub use validation::{is_valid_email, validate_submission};
pub use value::{calculate_conversion_value, ValueCalculator};
