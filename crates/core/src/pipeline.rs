//! Pipeline stage derivation.
//!
//! The UI visualizes a job as a fixed, ordered sequence of named stages
//! and maps the job's single 0-100 progress value onto them by
//! partitioning the range into equal buckets, one per stage. This is a
//! presentational approximation -- the backend does not report
//! per-stage transitions -- so the derivation is a pure function that
//! is recomputed from scratch on every job update, never patched
//! incrementally.

use serde::Serialize;

use crate::job::JobStatus;

/// Stage labels used by the transformation pipeline view.
pub const TRANSFORM_STAGES: [&str; 4] = [
    "Packet Ingestion",
    "Semantic Analysis",
    "Neural Patterning",
    "Final Synthesis",
];

/// Derived display state of one pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Pending,
    Active,
    Complete,
    Error,
}

/// Derive per-stage statuses for a job.
///
/// The 0-100 progress range is split into `stage_count` equal buckets
/// in stage order. A stage is `Complete` once progress has passed its
/// bucket's upper bound, `Active` while progress falls inside the
/// bucket (exclusive lower bound, inclusive upper bound), otherwise
/// `Pending`.
///
/// Two status overrides apply regardless of progress:
/// - `Completed` forces every stage to `Complete`;
/// - `Failed` forces the derived current stage to `Error` (the first
///   active stage, or the first pending one when nothing is active,
///   or the last stage when progress already covered every bucket).
pub fn derive_stage_statuses(
    stage_count: usize,
    status: JobStatus,
    progress: u8,
) -> Vec<StageStatus> {
    if stage_count == 0 {
        return Vec::new();
    }
    if status == JobStatus::Completed {
        return vec![StageStatus::Complete; stage_count];
    }

    let p = f64::from(progress.min(100));
    let bucket = 100.0 / stage_count as f64;

    let mut stages: Vec<StageStatus> = (0..stage_count)
        .map(|idx| {
            let lower = idx as f64 * bucket;
            let upper = (idx as f64 + 1.0) * bucket;
            if p >= upper {
                StageStatus::Complete
            } else if p > lower {
                StageStatus::Active
            } else {
                StageStatus::Pending
            }
        })
        .collect();

    if status == JobStatus::Failed {
        let current = stages
            .iter()
            .position(|s| *s == StageStatus::Active)
            .or_else(|| stages.iter().position(|s| *s == StageStatus::Pending))
            .unwrap_or(stage_count - 1);
        stages[current] = StageStatus::Error;
    }

    stages
}

/// Percentage completed *within* a stage's own bucket, for rendering a
/// per-stage progress bar. Returns `None` unless the stage is the one
/// progress currently falls in.
pub fn stage_progress(stage_count: usize, stage_index: usize, progress: u8) -> Option<u8> {
    if stage_count == 0 || stage_index >= stage_count {
        return None;
    }

    let p = f64::from(progress.min(100));
    let bucket = 100.0 / stage_count as f64;
    let lower = stage_index as f64 * bucket;
    let upper = (stage_index as f64 + 1.0) * bucket;

    if p > lower && p < upper {
        Some(((p - lower) / bucket * 100.0).round() as u8)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use StageStatus::*;

    #[test]
    fn progress_55_over_four_stages() {
        // Buckets [0,25,50,75,100]: 55 has passed the first two, sits
        // inside (50,75], and has not reached the last.
        let stages = derive_stage_statuses(4, JobStatus::Processing, 55);
        assert_eq!(stages, [Complete, Complete, Active, Pending]);
    }

    #[test]
    fn zero_progress_leaves_everything_pending() {
        let stages = derive_stage_statuses(4, JobStatus::Queued, 0);
        assert_eq!(stages, [Pending, Pending, Pending, Pending]);
    }

    #[test]
    fn bucket_upper_bound_is_inclusive() {
        let stages = derive_stage_statuses(4, JobStatus::Processing, 50);
        assert_eq!(stages, [Complete, Complete, Pending, Pending]);
    }

    #[test]
    fn completed_forces_all_stages_complete() {
        let stages = derive_stage_statuses(4, JobStatus::Completed, 10);
        assert_eq!(stages, [Complete, Complete, Complete, Complete]);
    }

    #[test]
    fn failed_marks_the_active_stage_as_error() {
        let stages = derive_stage_statuses(4, JobStatus::Failed, 55);
        assert_eq!(stages, [Complete, Complete, Error, Pending]);
    }

    #[test]
    fn failed_with_no_active_stage_marks_the_next_pending_one() {
        let stages = derive_stage_statuses(4, JobStatus::Failed, 0);
        assert_eq!(stages, [Error, Pending, Pending, Pending]);
    }

    #[test]
    fn failed_at_full_progress_marks_the_last_stage() {
        let stages = derive_stage_statuses(4, JobStatus::Failed, 100);
        assert_eq!(stages, [Complete, Complete, Complete, Error]);
    }

    #[test]
    fn uneven_bucket_counts_partition_cleanly() {
        // Three stages: buckets of 33.3. Progress 34 is inside the
        // second bucket.
        let stages = derive_stage_statuses(3, JobStatus::Processing, 34);
        assert_eq!(stages, [Complete, Active, Pending]);
    }

    #[test]
    fn empty_stage_list_derives_nothing() {
        assert!(derive_stage_statuses(0, JobStatus::Processing, 50).is_empty());
    }

    #[test]
    fn progress_above_100_is_clamped() {
        let stages = derive_stage_statuses(4, JobStatus::Processing, 250);
        assert_eq!(stages, [Complete, Complete, Complete, Complete]);
    }

    #[test]
    fn stage_progress_reports_intra_bucket_percentage() {
        // 55 within (50,75] is 5/25ths of the way through stage 3.
        assert_eq!(stage_progress(4, 2, 55), Some(20));
        assert_eq!(stage_progress(4, 0, 55), None);
        assert_eq!(stage_progress(4, 3, 55), None);
    }

    #[test]
    fn stage_count_matches_transform_stage_labels() {
        let stages = derive_stage_statuses(TRANSFORM_STAGES.len(), JobStatus::Rendering, 80);
        assert_eq!(stages.len(), TRANSFORM_STAGES.len());
    }
}
