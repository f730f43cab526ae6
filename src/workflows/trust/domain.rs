use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for vendor accounts. Every engine operation takes the
/// vendor explicitly; there is no ambient "current vendor".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VendorId(pub String);

/// Trust score assigned to freshly provisioned vendor accounts.
pub const DEFAULT_TRUST_SCORE: u8 = 70;

/// Tier label written by the authoritative recalculation service. The stored
/// label is never re-derived locally; labels this crate does not recognize
/// round-trip untouched and render with a neutral affordance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TrustTier {
    TrustedVendor,
    VerifiedAndReliable,
    NewOrImproving,
    UnderReview,
    Unrecognized(String),
}

impl TrustTier {
    pub fn label(&self) -> &str {
        match self {
            TrustTier::TrustedVendor => "Trusted Vendor",
            TrustTier::VerifiedAndReliable => "Verified & Reliable",
            TrustTier::NewOrImproving => "New or Improving",
            TrustTier::UnderReview => "Under Review",
            TrustTier::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for TrustTier {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Trusted Vendor" => TrustTier::TrustedVendor,
            "Verified & Reliable" => TrustTier::VerifiedAndReliable,
            "New or Improving" => TrustTier::NewOrImproving,
            "Under Review" => TrustTier::UnderReview,
            _ => TrustTier::Unrecognized(raw),
        }
    }
}

impl From<TrustTier> for String {
    fn from(tier: TrustTier) -> Self {
        tier.label().to_string()
    }
}

/// Closed set of remediation goal categories. New categories must be added
/// here so the generator's exhaustive match catches them at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GoalKind {
    Orders,
    Disputes,
    DisputeFree,
    Reviews,
    Policies,
    Warnings,
}

impl GoalKind {
    pub const fn label(self) -> &'static str {
        match self {
            GoalKind::Orders => "orders",
            GoalKind::Disputes => "disputes",
            GoalKind::DisputeFree => "dispute-free",
            GoalKind::Reviews => "reviews",
            GoalKind::Policies => "policies",
            GoalKind::Warnings => "warnings",
        }
    }
}

/// One measurable remediation target inside a recovery program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryGoal {
    pub kind: GoalKind,
    pub description: String,
    pub target_value: u32,
    pub current_value: u32,
    pub completed: bool,
}

impl RecoveryGoal {
    pub fn new(
        kind: GoalKind,
        description: impl Into<String>,
        target_value: u32,
        current_value: u32,
    ) -> Self {
        Self {
            kind,
            description: description.into(),
            target_value,
            current_value,
            completed: current_value >= target_value,
        }
    }

    /// Record a new measured value and refresh the completion flag.
    pub fn record_progress(&mut self, value: u32) {
        self.current_value = value;
        self.completed = value >= self.target_value;
    }
}

/// Persisted trust state for a single vendor. The profile store is the source
/// of truth; in-memory copies never survive across a mutating action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorTrustProfile {
    pub vendor_id: VendorId,
    pub trust_score: u8,
    pub trust_tier: TrustTier,
    pub verified_vendor: bool,
    pub orders_fulfilled: u32,
    pub disputes_count: u32,
    pub warnings_count: u32,
    pub positive_reviews: u32,
    pub acknowledged_latest_policies: bool,
    pub trust_recovery_active: bool,
    pub trust_recovery_start: Option<DateTime<Utc>>,
    pub trust_recovery_goals: Vec<RecoveryGoal>,
    pub trust_recovery_progress: f32,
    pub trust_recovery_completed: bool,
    pub trust_score_last_drop_reason: Option<String>,
    pub last_update: DateTime<Utc>,
}

impl VendorTrustProfile {
    /// Defaults applied when the onboarding flow provisions a vendor account.
    pub fn provisioned(vendor_id: VendorId, now: DateTime<Utc>) -> Self {
        Self {
            vendor_id,
            trust_score: DEFAULT_TRUST_SCORE,
            trust_tier: TrustTier::NewOrImproving,
            verified_vendor: false,
            orders_fulfilled: 0,
            disputes_count: 0,
            warnings_count: 0,
            positive_reviews: 0,
            acknowledged_latest_policies: false,
            trust_recovery_active: false,
            trust_recovery_start: None,
            trust_recovery_goals: Vec::new(),
            trust_recovery_progress: 0.0,
            trust_recovery_completed: false,
            trust_score_last_drop_reason: None,
            last_update: now,
        }
    }
}
