//! Dynamic conversion value reported to the ad platform with each lead.

use leadflow_core::config::ValueTable;
use leadflow_core::types::{BudgetBracket, TimelineBracket};
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct ValueCalculator {
    table: ValueTable,
}

impl ValueCalculator {
    pub fn new(table: ValueTable) -> Self {
        Self { table }
    }

    /// Base value of the landing page, or the fallback for unknown slugs.
    pub fn base_value(&self, landing_page_slug: &str) -> u64 {
        self.table
            .base_values
            .get(landing_page_slug)
            .copied()
            .unwrap_or(self.table.fallback_value)
    }

    /// `base × budget multiplier × timeline multiplier`, rounded. Missing
    /// brackets multiply by 1.0.
    pub fn calculate(
        &self,
        landing_page_slug: &str,
        budget: Option<BudgetBracket>,
        timeline: Option<TimelineBracket>,
    ) -> u64 {
        let base_value = self.base_value(landing_page_slug);
        let budget_multiplier = budget.map_or(1.0, |b| self.table.budget_multipliers.get(b));
        let timeline_multiplier =
            timeline.map_or(1.0, |t| self.table.timeline_multipliers.get(t));

        let product = base_value as f64 * budget_multiplier * timeline_multiplier;
        let final_value = product.max(0.0).round() as u64;

        info!(
            landing_page_slug = landing_page_slug,
            base_value = base_value,
            budget = ?budget,
            timeline = ?timeline,
            budget_multiplier = budget_multiplier,
            timeline_multiplier = timeline_multiplier,
            final_value = final_value,
            "Conversion value calculated"
        );

        final_value
    }
}

/// Conversion value with the production tables.
pub fn calculate_conversion_value(
    landing_page_slug: &str,
    budget: Option<BudgetBracket>,
    timeline: Option<TimelineBracket>,
) -> u64 {
    ValueCalculator::default().calculate(landing_page_slug, budget, timeline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_value_with_default_multipliers() {
        assert_eq!(calculate_conversion_value("business-website", None, None), 15_000);
        assert_eq!(calculate_conversion_value("enterprise", None, None), 50_000);
    }

    #[test]
    fn test_top_budget_and_urgent_timeline() {
        let value = calculate_conversion_value(
            "business-website",
            Some(BudgetBracket::Above5Lakh),
            Some(TimelineBracket::Urgent),
        );
        assert_eq!(value, 90_000);
    }

    #[test]
    fn test_unknown_slug_uses_fallback() {
        assert_eq!(calculate_conversion_value("unknown-slug", None, None), 10_000);
        assert_eq!(calculate_conversion_value("", None, None), 10_000);
    }

    #[test]
    fn test_fractional_multipliers() {
        let value = calculate_conversion_value(
            "seo-audit",
            Some(BudgetBracket::Under50k),
            Some(TimelineBracket::Exploring),
        );
        assert_eq!(value, 1_250);

        let value = calculate_conversion_value(
            "website-services",
            Some(BudgetBracket::From50kTo2Lakh),
            Some(TimelineBracket::ThisMonth),
        );
        assert_eq!(value, 27_000);
    }

    #[test]
    fn test_rounds_to_nearest_integer() {
        let mut table = ValueTable::default();
        table.base_values.insert("odd".into(), 3);
        let calculator = ValueCalculator::new(table);
        // 3 × 0.5 × 1.5 = 2.25
        let value = calculator.calculate(
            "odd",
            Some(BudgetBracket::Under50k),
            Some(TimelineBracket::ThisMonth),
        );
        assert_eq!(value, 2);
        // 3 × 0.5 = 1.5
        assert_eq!(calculator.calculate("odd", Some(BudgetBracket::Under50k), None), 2);
    }

    #[test]
    fn test_negative_multiplier_clamped_to_zero() {
        let mut table = ValueTable::default();
        table.budget_multipliers.under_50k = -1.0;
        let calculator = ValueCalculator::new(table);
        assert_eq!(calculator.calculate("seo-audit", Some(BudgetBracket::Under50k), None), 0);
    }
}
