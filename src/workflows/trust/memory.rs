//! In-memory boundary adapters used by the demo command and the test suites.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::info;

use super::domain::{RecoveryGoal, TrustTier, VendorId, VendorTrustProfile};
use super::recovery::recovery_progress;
use super::repository::{
    ProfileRecord, ProfileStore, RecalculationError, RecalculationService, StoreError,
    VerificationQueue, VerificationQueueError, VerificationRequest,
};

#[derive(Default, Clone)]
pub struct MemoryProfileStore {
    records: Arc<Mutex<HashMap<VendorId, ProfileRecord>>>,
}

impl MemoryProfileStore {
    fn with_record<T>(
        &self,
        vendor_id: &VendorId,
        expected_revision: u64,
        mutate: impl FnOnce(&mut VendorTrustProfile) -> T,
    ) -> Result<T, StoreError> {
        let mut guard = self.records.lock().expect("profile store mutex poisoned");
        let record = guard.get_mut(vendor_id).ok_or(StoreError::NotFound)?;
        if record.revision != expected_revision {
            return Err(StoreError::RevisionMismatch);
        }
        let out = mutate(&mut record.profile);
        record.revision += 1;
        Ok(out)
    }
}

impl ProfileStore for MemoryProfileStore {
    fn insert(&self, profile: VendorTrustProfile) -> Result<ProfileRecord, StoreError> {
        let mut guard = self.records.lock().expect("profile store mutex poisoned");
        if guard.contains_key(&profile.vendor_id) {
            return Err(StoreError::Conflict);
        }
        let record = ProfileRecord {
            profile,
            revision: 1,
        };
        guard.insert(record.profile.vendor_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, vendor_id: &VendorId) -> Result<Option<ProfileRecord>, StoreError> {
        let guard = self.records.lock().expect("profile store mutex poisoned");
        Ok(guard.get(vendor_id).cloned())
    }

    fn write_goals(
        &self,
        vendor_id: &VendorId,
        goals: Vec<RecoveryGoal>,
        expected_revision: u64,
    ) -> Result<(), StoreError> {
        self.with_record(vendor_id, expected_revision, |profile| {
            profile.trust_recovery_progress = recovery_progress(&goals);
            profile.trust_recovery_goals = goals;
        })
    }

    fn write_goals_and_progress(
        &self,
        vendor_id: &VendorId,
        goals: Vec<RecoveryGoal>,
        progress: f32,
        expected_revision: u64,
    ) -> Result<(), StoreError> {
        self.with_record(vendor_id, expected_revision, |profile| {
            profile.trust_recovery_goals = goals;
            profile.trust_recovery_progress = progress;
        })
    }

    fn write_recovery_flags(
        &self,
        vendor_id: &VendorId,
        active: bool,
        completed: bool,
        expected_revision: u64,
    ) -> Result<(), StoreError> {
        self.with_record(vendor_id, expected_revision, |profile| {
            if active && profile.trust_recovery_start.is_none() {
                profile.trust_recovery_start = Some(Utc::now());
            }
            if completed {
                profile.trust_recovery_start = None;
            }
            profile.trust_recovery_active = active;
            profile.trust_recovery_completed = completed;
        })
    }
}

/// What the stub recalculator applies on its next invocation, standing in for
/// the opaque server-side rule.
#[derive(Debug, Clone)]
pub struct ScriptedRecalculation {
    pub trust_score: u8,
    pub trust_tier: TrustTier,
    pub drop_reason: Option<String>,
    pub activate_recovery: bool,
}

enum RecalcPlan {
    Apply(ScriptedRecalculation),
    Fail(String),
}

/// Recalculation stub backed by the same in-memory store. With no script it
/// only refreshes `last_update`, mirroring a no-change recalculation.
#[derive(Clone)]
pub struct StampingRecalculator {
    store: MemoryProfileStore,
    next: Arc<Mutex<Option<RecalcPlan>>>,
}

impl StampingRecalculator {
    pub fn new(store: MemoryProfileStore) -> Self {
        Self {
            store,
            next: Arc::new(Mutex::new(None)),
        }
    }

    pub fn script(&self, outcome: ScriptedRecalculation) {
        *self.next.lock().expect("recalculator mutex poisoned") = Some(RecalcPlan::Apply(outcome));
    }

    pub fn fail_next(&self, reason: impl Into<String>) {
        *self.next.lock().expect("recalculator mutex poisoned") =
            Some(RecalcPlan::Fail(reason.into()));
    }
}

impl RecalculationService for StampingRecalculator {
    fn recalculate(&self, vendor_id: &VendorId) -> Result<(), RecalculationError> {
        let plan = self
            .next
            .lock()
            .expect("recalculator mutex poisoned")
            .take();

        if let Some(RecalcPlan::Fail(reason)) = plan {
            return Err(RecalculationError::Unavailable(reason));
        }

        let mut guard = self
            .store
            .records
            .lock()
            .expect("profile store mutex poisoned");
        let record = guard
            .get_mut(vendor_id)
            .ok_or_else(|| RecalculationError::Rejected(format!("unknown vendor {}", vendor_id.0)))?;

        if let Some(RecalcPlan::Apply(outcome)) = plan {
            record.profile.trust_score = outcome.trust_score;
            record.profile.trust_tier = outcome.trust_tier;
            if let Some(reason) = outcome.drop_reason {
                record.profile.trust_score_last_drop_reason = Some(reason);
            }
            if outcome.activate_recovery {
                record.profile.trust_recovery_active = true;
                record.profile.trust_recovery_completed = false;
                if record.profile.trust_recovery_start.is_none() {
                    record.profile.trust_recovery_start = Some(Utc::now());
                }
            }
        }

        record.profile.last_update = Utc::now();
        record.revision += 1;
        Ok(())
    }
}

/// Records submitted requests and logs them; review itself happens elsewhere.
#[derive(Default, Clone)]
pub struct RecordingVerificationQueue {
    requests: Arc<Mutex<Vec<VerificationRequest>>>,
}

impl RecordingVerificationQueue {
    pub fn requests(&self) -> Vec<VerificationRequest> {
        self.requests
            .lock()
            .expect("verification queue mutex poisoned")
            .clone()
    }
}

impl VerificationQueue for RecordingVerificationQueue {
    fn submit(&self, request: VerificationRequest) -> Result<(), VerificationQueueError> {
        info!(vendor_id = %request.vendor_id.0, score = request.trust_score, "verification request queued");
        self.requests
            .lock()
            .expect("verification queue mutex poisoned")
            .push(request);
        Ok(())
    }
}
