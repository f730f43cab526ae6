use std::sync::Arc;

use chrono::Utc;

use super::breakdown::{estimate_breakdown, ScoreBreakdown};
use super::domain::{VendorId, VendorTrustProfile};
use super::recovery;
use super::repository::{
    ProfileRecord, ProfileStore, RecalculationError, RecalculationService, StoreError,
    VerificationQueue, VerificationQueueError, VerificationRequest,
};
use super::tier::VERIFICATION_SCORE_FLOOR;

/// Orchestrator over a vendor's persisted trust profile.
///
/// Reads go straight to the store; mutations validate locally, perform their
/// one or two boundary calls, then re-fetch so callers only ever see the
/// store's view. Each write is conditional on the revision read at the start
/// of the action.
pub struct TrustProfileService<S, R, Q> {
    store: Arc<S>,
    recalculator: Arc<R>,
    verification: Arc<Q>,
}

impl<S, R, Q> TrustProfileService<S, R, Q>
where
    S: ProfileStore + 'static,
    R: RecalculationService + 'static,
    Q: VerificationQueue + 'static,
{
    pub fn new(store: Arc<S>, recalculator: Arc<R>, verification: Arc<Q>) -> Self {
        Self {
            store,
            recalculator,
            verification,
        }
    }

    /// Provision a profile with onboarding defaults (score 70, "New or
    /// Improving"). Called by the external onboarding flow, not the engine.
    pub fn provision(&self, vendor_id: &VendorId) -> Result<ProfileRecord, TrustServiceError> {
        let profile = VendorTrustProfile::provisioned(vendor_id.clone(), Utc::now());
        Ok(self.store.insert(profile)?)
    }

    pub fn profile(&self, vendor_id: &VendorId) -> Result<ProfileRecord, TrustServiceError> {
        Ok(self.store.fetch(vendor_id)?.ok_or(StoreError::NotFound)?)
    }

    /// Display-only score breakdown for the stored snapshot.
    pub fn breakdown(&self, vendor_id: &VendorId) -> Result<ScoreBreakdown, TrustServiceError> {
        let record = self.profile(vendor_id)?;
        Ok(estimate_breakdown(&record.profile))
    }

    /// Regenerate the recovery goal list from the current snapshot, replacing
    /// any existing goals. An empty result means nothing needs remediation.
    pub fn generate_goals(&self, vendor_id: &VendorId) -> Result<ProfileRecord, TrustServiceError> {
        let record = self.profile(vendor_id)?;
        let goals = recovery::generate_goals(&record.profile);
        self.store
            .write_goals(vendor_id, goals, record.revision)?;
        self.profile(vendor_id)
    }

    /// Record a new measured value for one goal and recompute the program
    /// progress over the whole list. Out-of-range indexes are rejected before
    /// any boundary call.
    pub fn update_goal_progress(
        &self,
        vendor_id: &VendorId,
        index: usize,
        new_value: u32,
    ) -> Result<ProfileRecord, TrustServiceError> {
        let record = self.profile(vendor_id)?;
        let mut goals = record.profile.trust_recovery_goals.clone();
        let goal_count = goals.len();
        let goal = goals
            .get_mut(index)
            .ok_or(TrustValidationError::GoalIndexOutOfRange { index, goal_count })?;
        goal.record_progress(new_value);

        let progress = recovery::recovery_progress(&goals);
        self.store
            .write_goals_and_progress(vendor_id, goals, progress, record.revision)?;
        self.profile(vendor_id)
    }

    /// Close out an active recovery program: refresh the authoritative score,
    /// then record `(active=false, completed=true)`. The engine does not gate
    /// this on measured progress; offering the action is the client's call.
    /// A failure in either boundary call leaves the stored flags untouched.
    pub fn complete_recovery(
        &self,
        vendor_id: &VendorId,
    ) -> Result<ProfileRecord, TrustServiceError> {
        self.profile(vendor_id)?;
        self.recalculator.recalculate(vendor_id)?;

        // Recalculation may have advanced the record; condition the flag write
        // on the post-recalculation revision.
        let refreshed = self.profile(vendor_id)?;
        self.store
            .write_recovery_flags(vendor_id, false, true, refreshed.revision)?;
        self.profile(vendor_id)
    }

    /// Queue a verification request for human review. Rejected up front when
    /// the vendor is already verified or below the score floor; the request
    /// never flips `verified_vendor` by itself.
    pub fn request_verification(
        &self,
        vendor_id: &VendorId,
    ) -> Result<VerificationRequest, TrustServiceError> {
        let record = self.profile(vendor_id)?;
        if record.profile.verified_vendor {
            return Err(TrustValidationError::AlreadyVerified.into());
        }
        if record.profile.trust_score < VERIFICATION_SCORE_FLOOR {
            return Err(TrustValidationError::ScoreBelowVerificationFloor {
                score: record.profile.trust_score,
                floor: VERIFICATION_SCORE_FLOOR,
            }
            .into());
        }

        let request = VerificationRequest {
            vendor_id: vendor_id.clone(),
            trust_score: record.profile.trust_score,
            requested_at: Utc::now(),
        };
        self.verification.submit(request.clone())?;
        Ok(request)
    }
}

/// Caller errors rejected synchronously, before any boundary call.
#[derive(Debug, thiserror::Error)]
pub enum TrustValidationError {
    #[error("goal index {index} out of range for {goal_count} goal(s)")]
    GoalIndexOutOfRange { index: usize, goal_count: usize },
    #[error("vendor is already verified")]
    AlreadyVerified,
    #[error("trust score {score} below verification floor {floor}")]
    ScoreBelowVerificationFloor { score: u8, floor: u8 },
}

/// Error raised by the trust profile orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum TrustServiceError {
    #[error(transparent)]
    Validation(#[from] TrustValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Recalculation(#[from] RecalculationError),
    #[error(transparent)]
    Verification(#[from] VerificationQueueError),
}
