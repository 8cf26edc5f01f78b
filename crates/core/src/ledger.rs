//! Keyed job collection with prepend-or-merge reconciliation.
//!
//! A page-level consumer owns exactly one [`JobLedger`] and is the only
//! code that mutates it, so the ledger itself needs no locking. Display
//! order is newest-first: unknown ids are prepended, known ids are
//! merged in place without reordering.

use crate::job::{JobDelta, JobRecord};
use crate::types::JobId;

/// Ordered collection of job records, at most one per id.
#[derive(Debug, Default)]
pub struct JobLedger {
    jobs: Vec<JobRecord>,
}

impl JobLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the collection with records fetched from the REST API.
    ///
    /// The API already returns newest-first. Duplicate ids keep the
    /// first occurrence.
    pub fn seed(&mut self, records: Vec<JobRecord>) {
        self.jobs.clear();
        for record in records {
            if self.index_of(&record.id).is_none() {
                self.jobs.push(record);
            }
        }
    }

    /// Fold one stream delta into the collection.
    ///
    /// Known id: shallow-merge into the existing record. Unknown id:
    /// prepend a new record materialized from the delta. Returns a
    /// reference to the affected record.
    pub fn apply(&mut self, delta: &JobDelta) -> &JobRecord {
        match self.index_of(&delta.id) {
            Some(idx) => {
                self.jobs[idx].apply(delta);
                &self.jobs[idx]
            }
            None => {
                self.jobs.insert(0, JobRecord::from_delta(delta));
                &self.jobs[0]
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&JobRecord> {
        self.index_of(id).map(|idx| &self.jobs[idx])
    }

    /// All records in display order (newest first).
    pub fn jobs(&self) -> &[JobRecord] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.jobs.iter().position(|job| job.id == id)
    }
}

/// Convenience for callers that track a "selected" job by id.
pub fn selected<'a>(ledger: &'a JobLedger, id: Option<&JobId>) -> Option<&'a JobRecord> {
    id.and_then(|id| ledger.get(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobStatus;

    fn delta(json: &str) -> JobDelta {
        serde_json::from_str(json).expect("test delta should parse")
    }

    #[test]
    fn unknown_id_is_prepended() {
        let mut ledger = JobLedger::new();
        ledger.apply(&delta(r#"{"id":"old","status":"queued"}"#));
        ledger.apply(&delta(r#"{"id":"new","status":"queued"}"#));

        let ids: Vec<_> = ledger.jobs().iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, ["new", "old"]);
    }

    #[test]
    fn known_id_merges_without_reordering() {
        let mut ledger = JobLedger::new();
        ledger.apply(&delta(r#"{"id":"a","status":"queued"}"#));
        ledger.apply(&delta(r#"{"id":"b","status":"queued"}"#));
        ledger.apply(&delta(r#"{"id":"a","status":"processing","progress":40}"#));

        assert_eq!(ledger.len(), 2);
        let ids: Vec<_> = ledger.jobs().iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(ledger.get("a").unwrap().progress, 40);
    }

    #[test]
    fn two_delta_scenario_preserves_status_and_overwrites_progress() {
        let mut ledger = JobLedger::new();
        ledger.apply(&delta(r#"{"id":"abc","status":"processing","progress":40}"#));
        ledger.apply(&delta(r#"{"id":"abc","progress":70}"#));

        let job = ledger.get("abc").unwrap();
        assert_eq!(job.status, JobStatus::Processing);
        assert_eq!(job.progress, 70);
    }

    #[test]
    fn seed_replaces_and_deduplicates() {
        let mut ledger = JobLedger::new();
        ledger.apply(&delta(r#"{"id":"stale"}"#));

        let records: Vec<JobRecord> = serde_json::from_str(
            r#"[{"id":"a","status":"Completed","progress":100},
                {"id":"b","status":"Queued","progress":0},
                {"id":"a","status":"Failed","progress":10}]"#,
        )
        .unwrap();
        ledger.seed(records);

        assert_eq!(ledger.len(), 2);
        assert!(ledger.get("stale").is_none());
        assert_eq!(ledger.get("a").unwrap().status, JobStatus::Completed);
    }

    #[test]
    fn selected_resolves_through_the_ledger() {
        let mut ledger = JobLedger::new();
        ledger.apply(&delta(r#"{"id":"abc","status":"queued"}"#));

        let id = Some("abc".to_string());
        assert!(selected(&ledger, id.as_ref()).is_some());
        assert!(selected(&ledger, None).is_none());
    }
}
