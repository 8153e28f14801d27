//! Lead intake checks applied before a submission is scored.

use leadflow_core::types::Lead;
use leadflow_core::{LeadError, LeadResult};

/// A submission needs at least one way to reach the person, and any email
/// given must look like an address.
pub fn validate_submission(name: Option<&str>, lead: &Lead) -> LeadResult<()> {
    if !present(name) && !present(lead.email.as_deref()) && !present(lead.phone.as_deref()) {
        return Err(LeadError::Validation(
            "At least one identifier (name/phone/email) required".to_string(),
        ));
    }
    if let Some(email) = lead.email.as_deref().filter(|e| !e.is_empty()) {
        if !is_valid_email(email) {
            return Err(LeadError::Validation("Invalid email format".to_string()));
        }
    }
    Ok(())
}

fn present(field: Option<&str>) -> bool {
    field.is_some_and(|v| !v.is_empty())
}

/// `local@domain.tld`: no whitespace, a single `@`, and a dot inside the domain.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .match_indices('.')
        .any(|(i, _)| i > 0 && i + 1 < domain.len())
}
