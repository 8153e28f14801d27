//! Heuristic lead quality score.

use leadflow_core::config::ScoringWeights;
use leadflow_core::types::{Lead, Priority, Qualification, TimelineBracket};

/// Scores leads against a weight table.
#[derive(Debug, Clone, Default)]
pub struct LeadScorer {
    weights: ScoringWeights,
}

impl LeadScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Sum of budget, timeline, completeness and engagement points, capped at
    /// `max_score`. Pure; no I/O.
    pub fn score(&self, lead: &Lead) -> u32 {
        let w = &self.weights;
        let mut score = 0;

        // Budget and urgency
        score += lead.budget.map_or(0, |b| w.budget.get(b));
        score += lead.timeline.map_or(0, |t| w.timeline.get(t));

        // Form completeness
        if is_present(&lead.email) {
            score += w.email;
        }
        if is_present(&lead.phone) {
            score += w.phone;
        }
        if lead
            .message
            .as_deref()
            .is_some_and(|m| m.chars().count() > w.detailed_message_chars)
        {
            score += w.detailed_message;
        }

        // Engagement
        if lead.time_on_page.is_some_and(|secs| secs > w.engaged_time_secs) {
            score += w.engaged_time;
        }
        if lead.pages_visited.is_some_and(|n| n > w.multi_page_threshold) {
            score += w.multi_page;
        }

        score.min(w.max_score)
    }
}

fn is_present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.is_empty())
}

/// Score with the production weight table. Always within 0..=100.
pub fn calculate_lead_score(lead: &Lead) -> u32 {
    LeadScorer::default().score(lead)
}

/// Hot at 80+, Warm at 60+, otherwise Cold.
pub fn qualification_for(score: u32) -> Qualification {
    match score {
        80.. => Qualification::Hot,
        60..=79 => Qualification::Warm,
        _ => Qualification::Cold,
    }
}

/// Follow-up priority for sales: urgent with an approved budget goes first,
/// then anyone who gave both a budget and a timeline.
pub fn priority_for(lead: &Lead) -> Priority {
    match (lead.budget, lead.timeline) {
        (_, Some(TimelineBracket::Urgent)) if lead.budget_approved => Priority::High,
        (Some(_), Some(_)) => Priority::Medium,
        _ => Priority::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadflow_core::types::BudgetBracket;

    fn full_lead() -> Lead {
        Lead {
            budget: Some(BudgetBracket::Above5Lakh),
            timeline: Some(TimelineBracket::Urgent),
            email: Some("a@b.com".into()),
            phone: Some("1".into()),
            message: Some("x".repeat(60)),
            time_on_page: Some(200.0),
            pages_visited: Some(5),
            budget_approved: false,
        }
    }

    #[test]
    fn test_empty_lead_scores_zero() {
        assert_eq!(calculate_lead_score(&Lead::default()), 0);
    }

    #[test]
    fn test_full_lead_scores_hundred() {
        assert_eq!(calculate_lead_score(&full_lead()), 100);
    }

    #[test]
    fn test_score_bounded_for_every_bracket_combination() {
        let budgets = BudgetBracket::ALL.map(Some).into_iter().chain([None]);
        for budget in budgets {
            for timeline in TimelineBracket::ALL.map(Some).into_iter().chain([None]) {
                let lead = Lead {
                    budget,
                    timeline,
                    ..full_lead()
                };
                let score = calculate_lead_score(&lead);
                assert!(score <= 100, "{budget:?}/{timeline:?} scored {score}");
            }
        }
    }

    #[test]
    fn test_individual_contributions() {
        let budget_only = Lead {
            budget: Some(BudgetBracket::From2LakhTo5Lakh),
            ..Default::default()
        };
        assert_eq!(calculate_lead_score(&budget_only), 35);

        let timeline_only = Lead {
            timeline: Some(TimelineBracket::ThisMonth),
            ..Default::default()
        };
        assert_eq!(calculate_lead_score(&timeline_only), 15);

        let contact = Lead {
            email: Some("lead@example.in".into()),
            phone: Some("+91 98200 00000".into()),
            ..Default::default()
        };
        assert_eq!(calculate_lead_score(&contact), 20);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let at_threshold = Lead {
            message: Some("x".repeat(50)),
            time_on_page: Some(120.0),
            pages_visited: Some(3),
            ..Default::default()
        };
        assert_eq!(calculate_lead_score(&at_threshold), 0);

        let past_threshold = Lead {
            message: Some("x".repeat(51)),
            time_on_page: Some(120.5),
            pages_visited: Some(4),
            ..Default::default()
        };
        assert_eq!(calculate_lead_score(&past_threshold), 20);
    }

    #[test]
    fn test_empty_strings_do_not_count() {
        let lead = Lead {
            email: Some(String::new()),
            phone: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(calculate_lead_score(&lead), 0);
    }

    #[test]
    fn test_custom_weights_still_capped() {
        let scorer = LeadScorer::new(ScoringWeights {
            email: 90,
            phone: 90,
            ..Default::default()
        });
        let lead = Lead {
            email: Some("a@b.com".into()),
            phone: Some("1".into()),
            ..Default::default()
        };
        assert_eq!(scorer.score(&lead), 100);
    }

    #[test]
    fn test_qualification_bands() {
        assert_eq!(qualification_for(100), Qualification::Hot);
        assert_eq!(qualification_for(80), Qualification::Hot);
        assert_eq!(qualification_for(79), Qualification::Warm);
        assert_eq!(qualification_for(60), Qualification::Warm);
        assert_eq!(qualification_for(59), Qualification::Cold);
        assert_eq!(qualification_for(0), Qualification::Cold);
    }

    #[test]
    fn test_priority_rules() {
        let approved_urgent = Lead {
            timeline: Some(TimelineBracket::Urgent),
            budget_approved: true,
            ..Default::default()
        };
        assert_eq!(priority_for(&approved_urgent), Priority::High);

        let unapproved = Lead {
            budget_approved: false,
            ..full_lead()
        };
        assert_eq!(priority_for(&unapproved), Priority::Medium);

        let budget_only = Lead {
            budget: Some(BudgetBracket::Under50k),
            ..Default::default()
        };
        assert_eq!(priority_for(&budget_only), Priority::Low);
    }

    #[test]
    fn test_unrecognised_brackets_give_low_priority() {
        let lead: Lead = serde_json::from_str(
            r#"{"budget": "1crore", "timeline": "next-year", "budget_approved": true}"#,
        )
        .unwrap();
        assert_eq!(priority_for(&lead), Priority::Low);
    }
}
