//! Google Ads conversion events fired when a lead is submitted.

use leadflow_core::config::{ConversionConfig, UNSET_CONVERSION_LABEL};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lead-submit conversion action per landing page family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionEvent {
    BusinessWebsiteLeadSubmit,
    AiVoiceAgentsLeadSubmit,
    SeoAuditLeadSubmit,
    NseMcxLiveMarketDataLeadSubmit,
    HealthcareSoftwareDevelopmentLeadSubmit,
}

impl ConversionEvent {
    /// Map a lead's source page to its conversion action. Pages without a
    /// dedicated action report as business-website submissions.
    pub fn for_source(source: Option<&str>) -> Self {
        match source {
            Some("ai-voice-agents") => ConversionEvent::AiVoiceAgentsLeadSubmit,
            Some("seo-audit") => ConversionEvent::SeoAuditLeadSubmit,
            Some("nse-mcx-live-market-data") => ConversionEvent::NseMcxLiveMarketDataLeadSubmit,
            Some("healthcare-software-development") => {
                ConversionEvent::HealthcareSoftwareDevelopmentLeadSubmit
            }
            _ => ConversionEvent::BusinessWebsiteLeadSubmit,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionEvent::BusinessWebsiteLeadSubmit => "business_website_lead_submit",
            ConversionEvent::AiVoiceAgentsLeadSubmit => "ai_voice_agents_lead_submit",
            ConversionEvent::SeoAuditLeadSubmit => "seo_audit_lead_submit",
            ConversionEvent::NseMcxLiveMarketDataLeadSubmit => {
                "nse_mcx_live_market_data_lead_submit"
            }
            ConversionEvent::HealthcareSoftwareDevelopmentLeadSubmit => {
                "healthcare_software_development_lead_submit"
            }
        }
    }

    /// Configured label, or `None` if the slot is empty or still a placeholder.
    pub fn label<'a>(&self, config: &'a ConversionConfig) -> Option<&'a str> {
        config
            .labels
            .get(self.as_str())
            .map(String::as_str)
            .filter(|label| !label.is_empty() && *label != UNSET_CONVERSION_LABEL)
    }
}

impl fmt::Display for ConversionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
