//! Display-only estimate of how the trust score decomposes per category.
//!
//! The authoritative score lives with the external recalculation service and
//! is not required to match this estimate. The `max(orders_fulfilled, 1)`
//! denominators reproduce the production rule as-is: fulfillment collapses to
//! 0-or-35 and the dispute ratio scales against fulfilled rather than received
//! orders. Preserved for behavioral parity.

use serde::{Deserialize, Serialize};

use super::domain::VendorTrustProfile;

/// Categories contributing to the displayed score estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Fulfillment,
    Reviews,
    DisputeFree,
    PolicyCompliance,
    Warnings,
}

impl ScoreFactor {
    pub const ALL: [ScoreFactor; 5] = [
        ScoreFactor::Fulfillment,
        ScoreFactor::Reviews,
        ScoreFactor::DisputeFree,
        ScoreFactor::PolicyCompliance,
        ScoreFactor::Warnings,
    ];

    /// Fixed maxima; the five values sum to exactly 100.
    pub const fn max_points(self) -> u8 {
        match self {
            ScoreFactor::Fulfillment => 35,
            ScoreFactor::Reviews => 25,
            ScoreFactor::DisputeFree => 15,
            ScoreFactor::PolicyCompliance => 15,
            ScoreFactor::Warnings => 10,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ScoreFactor::Fulfillment => "Order fulfillment",
            ScoreFactor::Reviews => "Positive reviews",
            ScoreFactor::DisputeFree => "Dispute-free record",
            ScoreFactor::PolicyCompliance => "Policy compliance",
            ScoreFactor::Warnings => "Warning history",
        }
    }
}

/// Discrete contribution to the score estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownComponent {
    pub factor: ScoreFactor,
    pub points: u8,
    pub max_points: u8,
    pub notes: String,
}

/// Per-category point estimate for display next to the stored trust score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub components: Vec<BreakdownComponent>,
    pub total: u8,
}

impl ScoreBreakdown {
    /// Well-defined value served when no profile is on record.
    pub fn zero() -> Self {
        let components = ScoreFactor::ALL
            .into_iter()
            .map(|factor| BreakdownComponent {
                factor,
                points: 0,
                max_points: factor.max_points(),
                notes: "no profile on record".to_string(),
            })
            .collect();
        Self {
            components,
            total: 0,
        }
    }

    pub fn component(&self, factor: ScoreFactor) -> Option<&BreakdownComponent> {
        self.components.iter().find(|c| c.factor == factor)
    }
}

/// Estimate the per-category breakdown for a profile snapshot. Pure and
/// deterministic; never written back to the persisted score.
pub fn estimate_breakdown(profile: &VendorTrustProfile) -> ScoreBreakdown {
    let mut components = Vec::with_capacity(ScoreFactor::ALL.len());

    let fulfilled = profile.orders_fulfilled;
    let rate = f64::from(fulfilled) / f64::from(fulfilled.max(1));
    let fulfillment_points = (rate * f64::from(ScoreFactor::Fulfillment.max_points())).round() as u8;
    components.push(BreakdownComponent {
        factor: ScoreFactor::Fulfillment,
        points: fulfillment_points,
        max_points: ScoreFactor::Fulfillment.max_points(),
        notes: format!("{fulfilled} fulfilled order(s)"),
    });

    let review_points = if profile.positive_reviews > 0 { 25 } else { 15 };
    components.push(BreakdownComponent {
        factor: ScoreFactor::Reviews,
        points: review_points,
        max_points: ScoreFactor::Reviews.max_points(),
        notes: format!("{} positive review(s)", profile.positive_reviews),
    });

    let denom = f64::from(fulfilled.max(1));
    let dispute_ratio = f64::from(profile.disputes_count) / denom;
    let raw = ((1.0 - dispute_ratio) * f64::from(ScoreFactor::DisputeFree.max_points())).round();
    let dispute_free_points = if raw > 0.0 { raw as u8 } else { 0 };
    components.push(BreakdownComponent {
        factor: ScoreFactor::DisputeFree,
        points: dispute_free_points,
        max_points: ScoreFactor::DisputeFree.max_points(),
        notes: format!("{} open dispute(s)", profile.disputes_count),
    });

    let policy_points = if profile.acknowledged_latest_policies {
        15
    } else {
        0
    };
    components.push(BreakdownComponent {
        factor: ScoreFactor::PolicyCompliance,
        points: policy_points,
        max_points: ScoreFactor::PolicyCompliance.max_points(),
        notes: if profile.acknowledged_latest_policies {
            "latest policies acknowledged".to_string()
        } else {
            "latest policies not acknowledged".to_string()
        },
    });

    let penalty = profile.warnings_count.saturating_mul(2);
    let warning_points = u32::from(ScoreFactor::Warnings.max_points()).saturating_sub(penalty) as u8;
    components.push(BreakdownComponent {
        factor: ScoreFactor::Warnings,
        points: warning_points,
        max_points: ScoreFactor::Warnings.max_points(),
        notes: format!("{} warning(s) on file", profile.warnings_count),
    });

    let total = components.iter().map(|c| u32::from(c.points)).sum::<u32>() as u8;

    ScoreBreakdown { components, total }
}
