// src/domain/classify.rs

use crate::domain::record::{MailService, StateRule};

/// Standard-mail floor applied when a state has no rule on file.
pub const DEFAULT_STANDARD_THRESHOLD: f64 = 50.0;

/// Determines the required mail service tier for an amount under a state's
/// rule. The order of checks determines precedence: certified wins over
/// standard, and an amount equal to a threshold takes the stricter tier.
///
/// Pure and deterministic — no side effects and no error path. Malformed
/// amounts are coerced to 0 by the CSV parser before they get here.
pub fn determine_required_service(amount: f64, rule: Option<&StateRule>) -> MailService {
    let Some(rule) = rule else {
        // No rule on file for this state: default standard-mail policy.
        if amount >= DEFAULT_STANDARD_THRESHOLD {
            return MailService::Standard;
        }
        return MailService::NotRequired;
    };

    if amount >= rule.min_amount_certified {
        MailService::Certified
    } else if amount >= rule.min_amount_standard {
        MailService::Standard
    } else {
        MailService::NotRequired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(certified: f64, standard: f64) -> StateRule {
        StateRule {
            id: 1,
            state_code: "NY".to_string(),
            state_name: "New York".to_string(),
            min_amount_certified: certified,
            min_amount_standard: standard,
            certified_mail_required: true,
        }
    }

    #[test]
    fn large_amount_with_rule_requires_certified() {
        let r = rule(1000.0, 100.0);
        assert_eq!(
            determine_required_service(1500.0, Some(&r)),
            MailService::Certified
        );
    }

    #[test]
    fn mid_amount_with_rule_requires_standard() {
        let r = rule(1000.0, 100.0);
        assert_eq!(
            determine_required_service(500.0, Some(&r)),
            MailService::Standard
        );
    }

    #[test]
    fn small_amount_with_rule_is_not_required() {
        let r = rule(1000.0, 100.0);
        assert_eq!(
            determine_required_service(99.99, Some(&r)),
            MailService::NotRequired
        );
    }

    #[test]
    fn amounts_equal_to_a_threshold_round_up_to_the_stricter_tier() {
        let r = rule(1000.0, 100.0);
        assert_eq!(
            determine_required_service(1000.0, Some(&r)),
            MailService::Certified
        );
        assert_eq!(
            determine_required_service(100.0, Some(&r)),
            MailService::Standard
        );
    }

    #[test]
    fn unknown_state_falls_back_to_fifty_dollar_standard_floor() {
        // amount=75, no rule -> Standard (75 >= 50)
        assert_eq!(
            determine_required_service(75.0, None),
            MailService::Standard
        );
        // amount=10, no rule -> Not Required
        assert_eq!(
            determine_required_service(10.0, None),
            MailService::NotRequired
        );
        // exactly at the floor
        assert_eq!(
            determine_required_service(50.0, None),
            MailService::Standard
        );
    }

    #[test]
    fn zero_amount_is_never_mailed() {
        let r = rule(1000.0, 100.0);
        assert_eq!(
            determine_required_service(0.0, Some(&r)),
            MailService::NotRequired
        );
        assert_eq!(determine_required_service(0.0, None), MailService::NotRequired);
    }
}
