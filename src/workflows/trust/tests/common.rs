use std::sync::Arc;

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::workflows::trust::domain::{RecoveryGoal, TrustTier, VendorId, VendorTrustProfile};
use crate::workflows::trust::memory::{
    MemoryProfileStore, RecordingVerificationQueue, StampingRecalculator,
};
use crate::workflows::trust::repository::{ProfileRecord, ProfileStore, StoreError};
use crate::workflows::trust::router::trust_router;
use crate::workflows::trust::service::TrustProfileService;

pub(super) type MemoryTrustService =
    TrustProfileService<MemoryProfileStore, StampingRecalculator, RecordingVerificationQueue>;

pub(super) fn vendor(id: &str) -> VendorId {
    VendorId(id.to_string())
}

pub(super) fn healthy_profile(id: &str) -> VendorTrustProfile {
    let now = Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap();
    let mut profile = VendorTrustProfile::provisioned(vendor(id), now);
    profile.trust_score = 82;
    profile.trust_tier = TrustTier::VerifiedAndReliable;
    profile.orders_fulfilled = 10;
    profile.positive_reviews = 5;
    profile.acknowledged_latest_policies = true;
    profile
}

pub(super) fn distressed_profile(id: &str) -> VendorTrustProfile {
    let now = Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap();
    let mut profile = VendorTrustProfile::provisioned(vendor(id), now);
    profile.trust_score = 48;
    profile.trust_tier = TrustTier::UnderReview;
    profile.orders_fulfilled = 0;
    profile.disputes_count = 2;
    profile.positive_reviews = 1;
    profile.warnings_count = 1;
    profile.acknowledged_latest_policies = false;
    profile.trust_recovery_active = true;
    profile.trust_recovery_start = Some(now);
    profile.trust_score_last_drop_reason = Some("Dispute volume spike".to_string());
    profile
}

pub(super) fn build_service() -> (
    MemoryTrustService,
    Arc<MemoryProfileStore>,
    Arc<StampingRecalculator>,
    Arc<RecordingVerificationQueue>,
) {
    let store = Arc::new(MemoryProfileStore::default());
    let recalculator = Arc::new(StampingRecalculator::new(store.as_ref().clone()));
    let verification = Arc::new(RecordingVerificationQueue::default());
    let service = TrustProfileService::new(
        store.clone(),
        recalculator.clone(),
        verification.clone(),
    );
    (service, store, recalculator, verification)
}

pub(super) fn seed(store: &MemoryProfileStore, profile: VendorTrustProfile) -> ProfileRecord {
    store.insert(profile).expect("seed insert succeeds")
}

pub(super) fn trust_router_with_service(service: MemoryTrustService) -> axum::Router {
    trust_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Store stub whose every call fails, for exercising boundary error paths.
pub(super) struct UnavailableStore;

impl ProfileStore for UnavailableStore {
    fn insert(
        &self,
        _profile: VendorTrustProfile,
    ) -> Result<ProfileRecord, StoreError> {
        Err(StoreError::Unavailable("profile store offline".to_string()))
    }

    fn fetch(&self, _vendor_id: &VendorId) -> Result<Option<ProfileRecord>, StoreError> {
        Err(StoreError::Unavailable("profile store offline".to_string()))
    }

    fn write_goals(
        &self,
        _vendor_id: &VendorId,
        _goals: Vec<RecoveryGoal>,
        _expected_revision: u64,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("profile store offline".to_string()))
    }

    fn write_goals_and_progress(
        &self,
        _vendor_id: &VendorId,
        _goals: Vec<RecoveryGoal>,
        _progress: f32,
        _expected_revision: u64,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("profile store offline".to_string()))
    }

    fn write_recovery_flags(
        &self,
        _vendor_id: &VendorId,
        _active: bool,
        _completed: bool,
        _expected_revision: u64,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("profile store offline".to_string()))
    }
}
