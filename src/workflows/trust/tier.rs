//! Display affordances derived from the stored tier label.
//!
//! The tier itself is written by the recalculation service and treated as
//! authoritative; this module only decides how to render it and whether the
//! vendor may request verification.

use serde::Serialize;

use super::domain::{TrustTier, VendorTrustProfile};

/// Minimum stored score before an unverified vendor may request verification.
pub const VERIFICATION_SCORE_FLOOR: u8 = 75;

/// Color token consumed by the client when rendering the tier badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TierAccent {
    Emerald,
    Sky,
    Amber,
    Rose,
    Slate,
}

/// Rendering hints for a tier badge plus the verification call-to-action flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierAffordance {
    pub label: String,
    pub accent: TierAccent,
    pub show_verification_cta: bool,
}

pub fn verification_eligible(profile: &VendorTrustProfile) -> bool {
    !profile.verified_vendor && profile.trust_score >= VERIFICATION_SCORE_FLOOR
}

/// Unrecognized tier labels are rendered with the neutral accent, never
/// rejected.
pub fn tier_affordance(profile: &VendorTrustProfile) -> TierAffordance {
    let accent = match &profile.trust_tier {
        TrustTier::TrustedVendor => TierAccent::Emerald,
        TrustTier::VerifiedAndReliable => TierAccent::Sky,
        TrustTier::NewOrImproving => TierAccent::Amber,
        TrustTier::UnderReview => TierAccent::Rose,
        TrustTier::Unrecognized(_) => TierAccent::Slate,
    };

    TierAffordance {
        label: profile.trust_tier.label().to_string(),
        accent,
        show_verification_cta: verification_eligible(profile),
    }
}
