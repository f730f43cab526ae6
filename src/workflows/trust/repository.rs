use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{RecoveryGoal, VendorId, VendorTrustProfile};
use super::tier::{tier_affordance, verification_eligible, TierAffordance};

/// Store-backed record: the profile plus the revision used for conditional
/// writes. Every mutation carries the revision it read; a concurrent writer
/// surfaces as [`StoreError::RevisionMismatch`] instead of a lost update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub profile: VendorTrustProfile,
    pub revision: u64,
}

impl ProfileRecord {
    /// Sanitized representation served to vendor-facing callers.
    pub fn trust_view(&self) -> TrustProfileView {
        TrustProfileView {
            vendor_id: self.profile.vendor_id.clone(),
            trust_score: self.profile.trust_score,
            tier: tier_affordance(&self.profile),
            verified_vendor: self.profile.verified_vendor,
            verification_eligible: verification_eligible(&self.profile),
            recovery_active: self.profile.trust_recovery_active,
            recovery_completed: self.profile.trust_recovery_completed,
            recovery_progress: self.profile.trust_recovery_progress,
            goals: self.profile.trust_recovery_goals.clone(),
            last_drop_reason: self.profile.trust_score_last_drop_reason.clone(),
            last_update: self.profile.last_update,
        }
    }
}

/// Profile state as exposed over the API.
#[derive(Debug, Clone, Serialize)]
pub struct TrustProfileView {
    pub vendor_id: VendorId,
    pub trust_score: u8,
    pub tier: TierAffordance,
    pub verified_vendor: bool,
    pub verification_eligible: bool,
    pub recovery_active: bool,
    pub recovery_completed: bool,
    pub recovery_progress: f32,
    pub goals: Vec<RecoveryGoal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_drop_reason: Option<String>,
    pub last_update: DateTime<Utc>,
}

/// Persistence boundary for vendor trust profiles. The store is the single
/// source of truth; the orchestrator re-fetches after every mutation.
pub trait ProfileStore: Send + Sync {
    /// Provision a fresh profile; rejects an existing vendor with `Conflict`.
    fn insert(&self, profile: VendorTrustProfile) -> Result<ProfileRecord, StoreError>;

    fn fetch(&self, vendor_id: &VendorId) -> Result<Option<ProfileRecord>, StoreError>;

    /// Replace the goal list wholesale. The stored progress is re-derived from
    /// the replacement list so it always matches the completed/total ratio.
    fn write_goals(
        &self,
        vendor_id: &VendorId,
        goals: Vec<RecoveryGoal>,
        expected_revision: u64,
    ) -> Result<(), StoreError>;

    /// Replace the goal list together with an explicitly computed progress.
    fn write_goals_and_progress(
        &self,
        vendor_id: &VendorId,
        goals: Vec<RecoveryGoal>,
        progress: f32,
        expected_revision: u64,
    ) -> Result<(), StoreError>;

    /// Record the recovery state machine flags. Recording a completion also
    /// clears the recovery start timestamp.
    fn write_recovery_flags(
        &self,
        vendor_id: &VendorId,
        active: bool,
        completed: bool,
        expected_revision: u64,
    ) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("vendor profile not found")]
    NotFound,
    #[error("vendor profile already exists")]
    Conflict,
    #[error("profile changed concurrently; re-read and retry")]
    RevisionMismatch,
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}

/// Boundary to the authoritative score recalculation service. Opaque: it owns
/// the real scoring rule, the tier label, and recovery activation on drops.
pub trait RecalculationService: Send + Sync {
    fn recalculate(&self, vendor_id: &VendorId) -> Result<(), RecalculationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RecalculationError {
    #[error("recalculation service unavailable: {0}")]
    Unavailable(String),
    #[error("recalculation rejected: {0}")]
    Rejected(String),
}

/// Verification request handed to asynchronous human review. Granting the
/// badge is an admin action; the engine never flips `verified_vendor` itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub vendor_id: VendorId,
    pub trust_score: u8,
    pub requested_at: DateTime<Utc>,
}

pub trait VerificationQueue: Send + Sync {
    fn submit(&self, request: VerificationRequest) -> Result<(), VerificationQueueError>;
}

#[derive(Debug, thiserror::Error)]
pub enum VerificationQueueError {
    #[error("verification queue unavailable: {0}")]
    Transport(String),
}
