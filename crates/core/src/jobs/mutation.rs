//! Local flag mutations and their propagation across cached result lists.
//!
//! Flags are set optimistically: the local state always reflects what the
//! user did, whether or not the tracking call that follows succeeds.

use super::JobsStore;
use crate::model::{FlagsPatch, JobOffer};
use crate::transport::ViewMetadata;

impl JobsStore {
    /// Mark a job viewed everywhere, then report the view.
    pub async fn record_view(&self, job: &JobOffer) {
        self.mark_viewed(&job.id).await;

        let metadata = ViewMetadata::for_job(job);
        if let Err(e) = self.tracking.post_view(&job.id, &metadata).await {
            tracing::warn!(job_id = %job.id, error = %e, "failed to track job view");
        }
    }

    /// Mark a job applied (and viewed) everywhere, then report the application.
    pub async fn record_application(&self, job_id: &str) {
        self.mark_applied(job_id).await;

        if let Err(e) = self.tracking.post_application(job_id).await {
            tracing::warn!(job_id, error = %e, "failed to track job application");
        }
    }

    /// Set `is_viewed` on every copy of the job. No tracking call.
    ///
    /// Returns the number of cache entries that contain the job.
    pub async fn mark_viewed(&self, job_id: &str) -> usize {
        self.patch(job_id, FlagsPatch::viewed()).await
    }

    /// Set `is_viewed` and `is_applied` on every copy of the job. No tracking call.
    pub async fn mark_applied(&self, job_id: &str) -> usize {
        self.patch(job_id, FlagsPatch::applied()).await
    }

    async fn patch(&self, job_id: &str, patch: FlagsPatch) -> usize {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        for job in state
            .durable
            .current_jobs
            .iter_mut()
            .filter(|job| job.id == job_id)
        {
            job.apply_flags(patch);
        }
        let entries = state.durable.jobs_cache.patch_item_flags(job_id, patch);

        tracing::debug!(job_id, entries, viewed = patch.viewed, applied = patch.applied, "patched job flags");
        self.commit(state).await;
        entries
    }
}
