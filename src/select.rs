//! Fallback question selection.
//!
//! The bank rarely holds exactly what a teacher asks for, so selection is a
//! cascade of progressively relaxed repository queries. The cascade is a
//! data table: adding a fifth relaxation level is a new `RelaxationLevel`
//! entry, not new control flow. Each level re-queries the bank, because each
//! relaxation changes which rows are visible; we stop at the first level
//! that satisfies the desired count and otherwise keep the best pool seen.

use tracing::{debug, warn};

use crate::bank::{BankQuery, QuestionBank};
use crate::domain::{Difficulty, Question, QuestionType, SourceCategory};
use crate::error::BankError;

/// One relaxation level: which filters of the base query are dropped.
struct RelaxationLevel {
    label: &'static str,
    drop_difficulty: bool,
    drop_source: bool,
    drop_chapters: bool,
}

/// Strict relaxation order: exact match first, then widen difficulty, then
/// source, then fall back to the whole subject.
const RELAXATION_LEVELS: &[RelaxationLevel] = &[
    RelaxationLevel {
        label: "exact",
        drop_difficulty: false,
        drop_source: false,
        drop_chapters: false,
    },
    RelaxationLevel {
        label: "any_difficulty",
        drop_difficulty: true,
        drop_source: false,
        drop_chapters: false,
    },
    RelaxationLevel {
        label: "any_source",
        drop_difficulty: true,
        drop_source: true,
        drop_chapters: false,
    },
    RelaxationLevel {
        label: "subject_wide",
        drop_difficulty: true,
        drop_source: true,
        drop_chapters: true,
    },
];

/// Outcome of selection for one question type.
#[derive(Clone, Debug)]
pub struct TypeSelection {
    /// Up to `fetch_limit` candidates, bank default order (id descending).
    pub pool: Vec<Question>,
    /// Label of the cascade level the pool came from.
    pub level: &'static str,
    /// True when the exact-match level could not satisfy the desired count.
    pub relaxed: bool,
    /// True when even the widest level returned nothing.
    pub unsatisfiable: bool,
}

/// Filters for one type, before relaxation.
#[derive(Clone, Debug)]
pub struct TypeFilters {
    pub qtype: QuestionType,
    pub subject: u32,
    pub chapters: Vec<u32>,
    pub difficulty: Difficulty,
    pub source: Option<SourceCategory>,
}

impl TypeFilters {
    fn query_at(&self, level: &RelaxationLevel, limit: usize) -> BankQuery {
        BankQuery {
            qtype: self.qtype,
            subject: self.subject,
            chapters: if level.drop_chapters {
                None
            } else {
                Some(self.chapters.clone())
            },
            source: if level.drop_source { None } else { self.source },
            difficulty: if level.drop_difficulty {
                Difficulty::Any
            } else {
                self.difficulty
            },
            limit: Some(limit),
        }
    }

    /// A level that drops a filter the caller never set produces the same
    /// query as its predecessor; re-running it would be a wasted round-trip.
    fn level_is_distinct(&self, level: &RelaxationLevel, prev: Option<&RelaxationLevel>) -> bool {
        let Some(prev) = prev else { return true };
        let diff_changes = level.drop_difficulty != prev.drop_difficulty && self.difficulty.is_filter();
        let source_changes = level.drop_source != prev.drop_source && self.source.is_some();
        let chapter_changes = level.drop_chapters != prev.drop_chapters;
        diff_changes || source_changes || chapter_changes
    }
}

/// Select up to `fetch_limit` candidates for one type, relaxing filters in
/// the fixed cascade order until `desired` are available. Fewer than
/// `desired` is acceptable; zero at the widest level marks the type
/// unsatisfiable (a warning, not an error — the composer decides).
pub fn select_for_type(
    bank: &dyn QuestionBank,
    filters: &TypeFilters,
    desired: usize,
    fetch_limit: usize,
) -> Result<TypeSelection, BankError> {
    let mut best: Vec<Question> = Vec::new();
    let mut best_level = RELAXATION_LEVELS[0].label;
    let mut prev: Option<&RelaxationLevel> = None;

    for level in RELAXATION_LEVELS {
        if !filters.level_is_distinct(level, prev) {
            prev = Some(level);
            continue;
        }
        prev = Some(level);

        let pool = bank.query(&filters.query_at(level, fetch_limit))?;
        debug!(
            target: "composer",
            qtype = ?filters.qtype,
            level = level.label,
            found = pool.len(),
            desired,
            "selection level queried"
        );

        if pool.len() >= desired {
            return Ok(TypeSelection {
                pool,
                level: level.label,
                relaxed: level.label != "exact",
                unsatisfiable: false,
            });
        }
        // Relaxed queries are supersets, but keep the best seen in case a
        // remote bank behaves otherwise.
        if pool.len() > best.len() || best.is_empty() {
            best = pool;
            best_level = level.label;
        }
    }

    let unsatisfiable = best.is_empty();
    if unsatisfiable {
        warn!(target: "composer", qtype = ?filters.qtype, "type unsatisfiable after full relaxation");
    } else {
        warn!(
            target: "composer",
            qtype = ?filters.qtype,
            level = best_level,
            found = best.len(),
            desired,
            "selection fell short of desired count"
        );
    }

    Ok(TypeSelection {
        pool: best,
        level: best_level,
        relaxed: true,
        unsatisfiable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::InMemoryBank;
    use crate::domain::{Question, SourceCategory};

    fn q(
        id: u64,
        chapter: u32,
        difficulty: Difficulty,
        source: SourceCategory,
    ) -> Question {
        Question {
            id,
            qtype: QuestionType::Short,
            subject: 1,
            chapter,
            difficulty,
            source,
            text_en: format!("q{}", id),
            text_ur: None,
            options: Vec::new(),
            answer: None,
        }
    }

    fn bank() -> InMemoryBank {
        InMemoryBank::new(vec![
            q(1, 1, Difficulty::Easy, SourceCategory::Book),
            q(2, 1, Difficulty::Hard, SourceCategory::Book),
            q(3, 1, Difficulty::Hard, SourceCategory::PastPaper),
            q(4, 2, Difficulty::Medium, SourceCategory::Book),
            // Outside the requested chapter scope entirely.
            q(5, 9, Difficulty::Easy, SourceCategory::Book),
        ])
    }

    fn filters(difficulty: Difficulty, source: Option<SourceCategory>) -> TypeFilters {
        TypeFilters {
            qtype: QuestionType::Short,
            subject: 1,
            chapters: vec![1, 2],
            difficulty,
            source,
        }
    }

    #[test]
    fn exact_level_satisfies_without_relaxing() {
        let bank = bank();
        let got = select_for_type(
            &bank,
            &filters(Difficulty::Hard, Some(SourceCategory::Book)),
            1,
            3,
        )
        .unwrap();
        assert_eq!(got.level, "exact");
        assert!(!got.relaxed);
        assert_eq!(got.pool[0].id, 2);
    }

    #[test]
    fn difficulty_dropped_before_source() {
        // Only one easy book question exists in scope; asking for two must
        // first widen difficulty (still book-only), which then suffices.
        let bank = bank();
        let got = select_for_type(
            &bank,
            &filters(Difficulty::Easy, Some(SourceCategory::Book)),
            2,
            6,
        )
        .unwrap();
        assert_eq!(got.level, "any_difficulty");
        assert!(got.relaxed);
        let ids: Vec<u64> = got.pool.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![4, 2, 1]);
    }

    #[test]
    fn chapters_dropped_last() {
        // Five in-subject questions exist but only four inside the scope, so
        // the cascade must fall through to the subject-wide level.
        let bank = bank();
        let got = select_for_type(&bank, &filters(Difficulty::Any, None), 5, 10).unwrap();
        assert_eq!(got.level, "subject_wide");
        assert_eq!(got.pool.len(), 5);
    }

    #[test]
    fn cascade_is_monotonic() {
        let bank = bank();
        let tf = filters(Difficulty::Easy, Some(SourceCategory::Book));
        let mut last = 0usize;
        let mut prev: Option<&RelaxationLevel> = None;
        for level in RELAXATION_LEVELS {
            if !tf.level_is_distinct(level, prev) {
                prev = Some(level);
                continue;
            }
            prev = Some(level);
            let n = bank.query(&tf.query_at(level, 100)).unwrap().len();
            assert!(n >= last, "level {} shrank the pool", level.label);
            last = n;
        }
    }

    #[test]
    fn short_pool_returns_best_available() {
        let bank = bank();
        let got = select_for_type(&bank, &filters(Difficulty::Any, None), 50, 150).unwrap();
        assert!(!got.unsatisfiable);
        assert_eq!(got.pool.len(), 5);
        assert_eq!(got.level, "subject_wide");
    }

    #[test]
    fn empty_subject_is_unsatisfiable_not_an_error() {
        let bank = bank();
        let tf = TypeFilters {
            qtype: QuestionType::Passage,
            subject: 1,
            chapters: vec![1],
            difficulty: Difficulty::Any,
            source: None,
        };
        let got = select_for_type(&bank, &tf, 2, 6).unwrap();
        assert!(got.unsatisfiable);
        assert!(got.pool.is_empty());
    }

    #[test]
    fn redundant_levels_are_skipped() {
        // With no difficulty or source filter set, only "exact" and
        // "subject_wide" are distinct queries.
        let tf = filters(Difficulty::Any, None);
        let mut distinct = 0;
        let mut prev: Option<&RelaxationLevel> = None;
        for level in RELAXATION_LEVELS {
            if tf.level_is_distinct(level, prev) {
                distinct += 1;
            }
            prev = Some(level);
        }
        assert_eq!(distinct, 2);
    }
}
