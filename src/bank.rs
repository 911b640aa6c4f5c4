//! The question bank: an immutable, read-only snapshot of the repository.
//!
//! The engine only ever reads. `QuestionBank` is the seam a remote-backed
//! repository would implement; the in-memory bank here is built once at
//! startup from the TOML config plus built-in seeds.

use std::collections::HashMap;

use crate::domain::{Difficulty, Question, QuestionType, SourceCategory};
use crate::error::BankError;

/// A single repository query. `chapters: None` means "whole subject";
/// filters of `None`/`Any` are absent.
#[derive(Clone, Debug)]
pub struct BankQuery {
    pub qtype: QuestionType,
    pub subject: u32,
    pub chapters: Option<Vec<u32>>,
    pub source: Option<SourceCategory>,
    pub difficulty: Difficulty,
    pub limit: Option<usize>,
}

/// Read-only query capability over the question repository.
/// Default ordering is id-descending (newest bank content first).
pub trait QuestionBank: Send + Sync {
    fn query(&self, q: &BankQuery) -> Result<Vec<Question>, BankError>;

    /// Fetch by explicit ids, preserving the caller's order. Unknown ids are
    /// silently skipped.
    fn by_ids(&self, ids: &[u64]) -> Vec<Question>;

    /// Distinct chapter ids known for a subject, ascending.
    fn chapters_for_subject(&self, subject: u32) -> Vec<u32>;
}

/// In-memory bank. Immutable after construction, so composition requests
/// can share it behind an `Arc` without locks.
pub struct InMemoryBank {
    by_id: HashMap<u64, Question>,
    /// Ids in descending order; drives the default query ordering.
    ordered: Vec<u64>,
}

impl InMemoryBank {
    pub fn new(questions: Vec<Question>) -> Self {
        let mut by_id = HashMap::with_capacity(questions.len());
        for q in questions {
            by_id.insert(q.id, q);
        }
        let mut ordered: Vec<u64> = by_id.keys().copied().collect();
        ordered.sort_unstable_by(|a, b| b.cmp(a));
        Self { by_id, ordered }
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    fn matches(q: &Question, query: &BankQuery) -> bool {
        if q.qtype != query.qtype || q.subject != query.subject {
            return false;
        }
        if let Some(chapters) = &query.chapters {
            if !chapters.contains(&q.chapter) {
                return false;
            }
        }
        if let Some(source) = query.source {
            if q.source != source {
                return false;
            }
        }
        Difficulty::accepts(q.difficulty, query.difficulty)
    }
}

impl QuestionBank for InMemoryBank {
    fn query(&self, query: &BankQuery) -> Result<Vec<Question>, BankError> {
        let limit = query.limit.unwrap_or(usize::MAX);
        let mut out = Vec::new();
        for id in &self.ordered {
            if out.len() >= limit {
                break;
            }
            let q = &self.by_id[id];
            if Self::matches(q, query) {
                out.push(q.clone());
            }
        }
        Ok(out)
    }

    fn by_ids(&self, ids: &[u64]) -> Vec<Question> {
        ids.iter()
            .filter_map(|id| self.by_id.get(id).cloned())
            .collect()
    }

    fn chapters_for_subject(&self, subject: u32) -> Vec<u32> {
        let mut chapters: Vec<u32> = self
            .by_id
            .values()
            .filter(|q| q.subject == subject)
            .map(|q| q.chapter)
            .collect();
        chapters.sort_unstable();
        chapters.dedup();
        chapters
    }
}
