//! Helpers renderers use for input validation and countdowns.

use crate::data_model::DataModel;
use crate::error::{A2uiClientError, Result};
use crate::resolve::resolve_string;
use a2ui_core::types::{TextField, Timeout};
use chrono::{DateTime, TimeDelta, Utc};
use regex::Regex;

/// Checks candidate input against a text field's `validationRegexp`.
pub trait FieldValidation {
    /// `Ok(true)` when the field has no pattern or the pattern matches.
    ///
    /// The pattern is applied as written; it is not implicitly anchored.
    fn validate(&self, candidate: &str) -> Result<bool>;
}

impl FieldValidation for TextField {
    fn validate(&self, candidate: &str) -> Result<bool> {
        let Some(pattern) = &self.validation_regexp else {
            return Ok(true);
        };
        let regex = Regex::new(pattern).map_err(|source| A2uiClientError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        Ok(regex.is_match(candidate))
    }
}

/// Where a countdown stands relative to its target time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStatus {
    Pending { remaining: TimeDelta },
    Expired,
}

/// Evaluates a `Timeout` component against the clock.
///
/// Expiry is informational; nothing is removed from the surface when it
/// passes.
pub trait TimeoutStatus {
    /// `None` when `targetTimeUtc` does not resolve to an RFC 3339 time.
    fn status(&self, model: &DataModel, now: DateTime<Utc>) -> Option<CountdownStatus>;
}

impl TimeoutStatus for Timeout {
    fn status(&self, model: &DataModel, now: DateTime<Utc>) -> Option<CountdownStatus> {
        let raw = resolve_string(&self.target_time_utc, model)?;
        let target = DateTime::parse_from_rfc3339(&raw).ok()?.with_timezone(&Utc);
        if target > now {
            Some(CountdownStatus::Pending {
                remaining: target - now,
            })
        } else {
            Some(CountdownStatus::Expired)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use a2ui_core::types::{BoundValue, ScopeUpdate};
    use assert_matches::assert_matches;

    #[test]
    fn test_validate_without_pattern() {
        let field = TextField::new(BoundValue::path("/form/name"));
        assert!(field.validate("anything").unwrap());
    }

    #[test]
    fn test_validate_email_pattern() {
        let field = TextField::new(BoundValue::path("/form/email"))
            .with_validation(r"^[^@\s]+@[^@\s]+\.[a-z]+$");
        assert!(field.validate("john@example.com").unwrap());
        assert!(!field.validate("john.example.com").unwrap());
    }

    #[test]
    fn test_unanchored_pattern_matches_substring() {
        let field = TextField::new(BoundValue::literal("")).with_validation("[0-9]+");
        assert!(field.validate("age 25").unwrap());
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let field = TextField::new(BoundValue::literal("")).with_validation("([a-z");
        assert_matches!(
            field.validate("abc"),
            Err(A2uiClientError::InvalidPattern { pattern, .. }) if pattern == "([a-z"
        );
    }

    fn timeout() -> Timeout {
        Timeout {
            target_time_utc: BoundValue::path("/request/deadline"),
            usage_hint: None,
        }
    }

    fn model(deadline: &str) -> DataModel {
        let mut model = DataModel::new();
        model.apply(ScopeUpdate::new("request").with_value("deadline", deadline));
        model
    }

    #[test]
    fn test_timeout_pending_and_expired() {
        let now = DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let model = model("2025-06-01T12:05:00+00:00");

        assert_eq!(
            timeout().status(&model, now),
            Some(CountdownStatus::Pending {
                remaining: TimeDelta::minutes(5)
            })
        );
        assert_eq!(
            timeout().status(&model, now + TimeDelta::minutes(5)),
            Some(CountdownStatus::Expired)
        );
    }

    #[test]
    fn test_timeout_unresolvable() {
        let now = Utc::now();
        assert_eq!(timeout().status(&DataModel::new(), now), None);
        assert_eq!(timeout().status(&model("next tuesday"), now), None);
    }
}
