//! Recovery goal generation and progress arithmetic.
//!
//! Generation is a wholesale replacement: callers persist the returned list in
//! place of any existing goals, never splice into one. An empty list means no
//! deficiency was found, not an error. Whether a recovery program is active is
//! decided elsewhere (the recalculation service flips the flag when it detects
//! a score drop); goals may exist while the program is inactive and vice
//! versa.

use super::domain::{GoalKind, RecoveryGoal, VendorTrustProfile};

pub const ORDER_GOAL_TARGET: u32 = 5;
pub const REVIEW_GOAL_TARGET: u32 = 3;
pub const POLICY_GOAL_TARGET: u32 = 1;
pub const DISPUTE_FREE_WINDOW_DAYS: u32 = 30;
pub const REPORT_FREE_WINDOW_DAYS: u32 = 30;

/// Produce one goal per deficiency found in the snapshot, in fixed order.
pub fn generate_goals(profile: &VendorTrustProfile) -> Vec<RecoveryGoal> {
    let mut goals = Vec::new();

    if profile.orders_fulfilled < ORDER_GOAL_TARGET {
        goals.push(RecoveryGoal::new(
            GoalKind::Orders,
            "Complete 5 on-time orders",
            ORDER_GOAL_TARGET,
            profile.orders_fulfilled,
        ));
    }

    if profile.disputes_count > 0 {
        // Counts down to a target of zero, so the completion flag reads true
        // from generation onward. Matches the production rule.
        goals.push(RecoveryGoal::new(
            GoalKind::Disputes,
            "Resolve all open disputes",
            0,
            profile.disputes_count,
        ));
        goals.push(RecoveryGoal::new(
            GoalKind::DisputeFree,
            "Maintain 30 days dispute-free",
            DISPUTE_FREE_WINDOW_DAYS,
            0,
        ));
    }

    if profile.positive_reviews < REVIEW_GOAL_TARGET {
        goals.push(RecoveryGoal::new(
            GoalKind::Reviews,
            "Achieve 3 new 4\u{2605}+ reviews",
            REVIEW_GOAL_TARGET,
            profile.positive_reviews,
        ));
    }

    if !profile.acknowledged_latest_policies {
        goals.push(RecoveryGoal::new(
            GoalKind::Policies,
            "Re-acknowledge all active policies",
            POLICY_GOAL_TARGET,
            0,
        ));
    }

    if profile.warnings_count > 0 {
        goals.push(RecoveryGoal::new(
            GoalKind::Warnings,
            "Zero new reports in 30 days",
            REPORT_FREE_WINDOW_DAYS,
            0,
        ));
    }

    goals
}

/// Percentage of completed goals over the whole list; zero for an empty list.
pub fn recovery_progress(goals: &[RecoveryGoal]) -> f32 {
    if goals.is_empty() {
        return 0.0;
    }
    let completed = goals.iter().filter(|goal| goal.completed).count();
    100.0 * completed as f32 / goals.len() as f32
}
