//! Vendor trust and reputation engine.
//!
//! Pure pieces first: the score breakdown estimator, the tier affordance
//! classifier, and the recovery goal generator/progress arithmetic. The
//! [`TrustProfileService`] orchestrator wires those to the persistence and
//! recalculation boundaries; [`trust_router`] exposes it over HTTP.

pub mod breakdown;
pub mod domain;
pub mod memory;
pub mod recovery;
pub mod repository;
pub mod router;
pub mod service;
pub mod tier;

#[cfg(test)]
mod tests;

pub use breakdown::{estimate_breakdown, BreakdownComponent, ScoreBreakdown, ScoreFactor};
pub use domain::{
    GoalKind, RecoveryGoal, TrustTier, VendorId, VendorTrustProfile, DEFAULT_TRUST_SCORE,
};
pub use memory::{
    MemoryProfileStore, RecordingVerificationQueue, ScriptedRecalculation, StampingRecalculator,
};
pub use recovery::{generate_goals, recovery_progress};
pub use repository::{
    ProfileRecord, ProfileStore, RecalculationError, RecalculationService, StoreError,
    TrustProfileView, VerificationQueue, VerificationQueueError, VerificationRequest,
};
pub use router::trust_router;
pub use service::{TrustProfileService, TrustServiceError, TrustValidationError};
pub use tier::{
    tier_affordance, verification_eligible, TierAccent, TierAffordance, VERIFICATION_SCORE_FLOOR,
};
