//! The paper composer: the pipeline behind one composition request.
//!
//! Budgets are resolved first, then each requested type is filled (by the
//! fallback selector plus chapter balancing, or by a manual id list), the
//! picks become ordered sections, and marks are derived from the attempt
//! prefixes. The result is an immutable `ComposedPaper`; edits recompose.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::bank::QuestionBank;
use crate::distribute::{chapter_balance, shuffle_rng};
use crate::domain::{
    ComposedPaper, ComposedSection, Question, QuestionType, SelectedQuestion, SubjectCategory,
    TypeRequest,
};
use crate::error::ComposeError;
use crate::layout::{resolve_budgets, Adjustment, AdjustedField, LayoutProfile};
use crate::marks::{resolved_marks, section_marks, total_marks};
use crate::select::{select_for_type, TypeFilters};

/// Over-fetch factor for randomized selection, so chapter balancing has
/// slack to spread the draw.
const OVERFETCH_FACTOR: usize = 3;

/// One composition request, fully resolved by the caller (chapter scope is
/// already a concrete id list).
#[derive(Clone, Debug)]
pub struct CompositionRequest {
    pub subject: u32,
    pub category: SubjectCategory,
    pub scope: Vec<u32>,
    /// Ordered: declaration order drives section order and rebalance
    /// priority.
    pub requests: Vec<TypeRequest>,
    pub profile: LayoutProfile,
    pub mark_overrides: HashMap<u64, u32>,
    pub seed: Option<u64>,
}

/// Per-type feedback for the UI: did this type fall back, and how far.
#[derive(Clone, Debug, serde::Serialize)]
pub struct TypeReport {
    pub qtype: QuestionType,
    pub requested: u32,
    pub selected: u32,
    pub level: String,
    pub relaxed: bool,
    pub unsatisfiable: bool,
}

/// Everything the caller gets back on success. Warnings and adjustments
/// carry the partial-success story; they are not errors.
#[derive(Debug)]
pub struct ComposeOutput {
    pub paper: ComposedPaper,
    pub adjustments: Vec<Adjustment>,
    pub reports: Vec<TypeReport>,
    pub warnings: Vec<String>,
}

#[instrument(level = "info", skip(bank, request), fields(subject = request.subject, layout = request.profile.name, types = request.requests.len()))]
pub fn compose(
    bank: &dyn QuestionBank,
    request: &CompositionRequest,
) -> Result<ComposeOutput, ComposeError> {
    if request.scope.is_empty() {
        return Err(ComposeError::Validation("chapter scope is empty".into()));
    }
    if request.requests.is_empty() {
        return Err(ComposeError::Validation("no question types requested".into()));
    }
    if let Some(bad) = request
        .requests
        .iter()
        .find(|r| r.criteria.marks_each == 0)
    {
        return Err(ComposeError::Validation(format!(
            "marks per question must be at least 1 (got 0 for {:?})",
            bad.qtype
        )));
    }

    let (resolved, mut adjustments) =
        resolve_budgets(&request.requests, &request.profile, request.category);
    let mut rng = shuffle_rng(request.seed);

    let mut reports: Vec<TypeReport> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();
    // (request, picked questions) per surviving type, declaration order.
    let mut picked: Vec<(TypeRequest, Vec<Question>)> = Vec::new();

    for req in &resolved {
        if let Some(ids) = &req.manual_ids {
            // A manual list bypasses selection, not the section's type.
            let pool: Vec<Question> = bank
                .by_ids(ids)
                .into_iter()
                .filter(|q| q.qtype == req.qtype)
                .collect();
            let skipped = ids.len() - pool.len();
            if skipped > 0 {
                warnings.push(format!(
                    "{:?}: {} manual ids were unknown or of another type and skipped",
                    req.qtype, skipped
                ));
            }
            reports.push(TypeReport {
                qtype: req.qtype,
                requested: ids.len() as u32,
                selected: pool.len() as u32,
                level: "manual".into(),
                relaxed: false,
                unsatisfiable: pool.is_empty(),
            });
            if pool.is_empty() {
                warnings.push(format!("{:?}: no questions; section omitted", req.qtype));
                continue;
            }
            picked.push((req.clone(), pool));
            continue;
        }

        let desired = req.criteria.requested_total as usize;
        if desired == 0 {
            continue;
        }

        let filters = TypeFilters {
            qtype: req.qtype,
            subject: request.subject,
            chapters: request.scope.clone(),
            difficulty: req.criteria.difficulty,
            source: req.criteria.source,
        };
        let selection = select_for_type(bank, &filters, desired, desired * OVERFETCH_FACTOR)?;

        reports.push(TypeReport {
            qtype: req.qtype,
            requested: req.criteria.requested_total,
            selected: selection.pool.len().min(desired) as u32,
            level: selection.level.to_string(),
            relaxed: selection.relaxed,
            unsatisfiable: selection.unsatisfiable,
        });

        if selection.unsatisfiable {
            warnings.push(format!("{:?}: no questions; section omitted", req.qtype));
            continue;
        }

        let questions = if request.scope.len() > 1 {
            chapter_balance(selection.pool, desired, &request.scope, &mut rng)
        } else {
            let mut pool = selection.pool;
            pool.shuffle(&mut rng);
            pool.truncate(desired);
            pool
        };
        picked.push((req.clone(), questions));
    }

    if picked.is_empty() {
        return Err(ComposeError::EmptyPaper);
    }

    // Post-composition cap check. Resolution already clamped requested
    // counts, so this only ever fires for manual id lists that bypassed it;
    // the contract is to re-clamp by truncation and report, never to error.
    enforce_caps_by_truncation(&mut picked, &request.profile, request.category, &mut adjustments, &mut warnings);

    let mut sections: Vec<ComposedSection> = Vec::with_capacity(picked.len());
    for (req, questions) in picked {
        let selected: Vec<SelectedQuestion> = questions
            .iter()
            .enumerate()
            .map(|(i, q)| SelectedQuestion {
                id: q.id,
                order: i as u32 + 1,
                marks: resolved_marks(q.id, req.criteria.marks_each, &request.mark_overrides),
            })
            .collect();
        // A short pool drags the attempt count down with it.
        let attempt = req.criteria.requested_attempt.min(selected.len() as u32);
        let section_marks = section_marks(&selected, attempt);
        sections.push(ComposedSection {
            qtype: req.qtype,
            questions: selected,
            attempt,
            section_marks,
            marks_each: req.criteria.marks_each,
        });
    }

    let paper = ComposedPaper {
        id: Uuid::new_v4().to_string(),
        layout: request.profile.name.to_string(),
        total_marks: total_marks(&sections),
        duplicate_count: request.profile.duplicate_count,
        page_break_before_subjective: request.profile.page_break_before_subjective,
        sections,
    };

    info!(
        target: "composer",
        paper = %paper.id,
        sections = paper.sections.len(),
        total_marks = paper.total_marks,
        warnings = warnings.len(),
        "paper composed"
    );

    Ok(ComposeOutput {
        paper,
        adjustments,
        reports,
        warnings,
    })
}

/// Truncate any section set that still violates the profile caps. MCQ first,
/// then the subjective aggregate, trimmed from the last-declared section
/// backwards so earlier-declared types keep their questions.
fn enforce_caps_by_truncation(
    picked: &mut [(TypeRequest, Vec<Question>)],
    profile: &LayoutProfile,
    category: SubjectCategory,
    adjustments: &mut Vec<Adjustment>,
    warnings: &mut Vec<String>,
) {
    for (req, questions) in picked.iter_mut() {
        if req.qtype.is_mcq() && questions.len() as u32 > profile.mcq_max {
            let old = questions.len() as u32;
            questions.truncate(profile.mcq_max as usize);
            adjustments.push(Adjustment {
                qtype: req.qtype,
                field: AdjustedField::SectionLength,
                old,
                new: profile.mcq_max,
            });
            warnings.push(format!(
                "{:?}: truncated from {} to {} to fit the {} layout",
                req.qtype, old, profile.mcq_max, profile.name
            ));
            warn!(target: "composer", qtype = ?req.qtype, old, new = profile.mcq_max, "mcq cap enforced by truncation");
        }
    }

    let subjective_max = profile.subjective_max(category) as usize;
    let mut subjective_len: usize = picked
        .iter()
        .filter(|(r, _)| !r.qtype.is_mcq())
        .map(|(_, qs)| qs.len())
        .sum();
    if subjective_len <= subjective_max {
        return;
    }

    for (req, questions) in picked.iter_mut().rev() {
        if subjective_len <= subjective_max {
            break;
        }
        if req.qtype.is_mcq() || questions.is_empty() {
            continue;
        }
        let excess = subjective_len - subjective_max;
        let old = questions.len();
        let keep = old.saturating_sub(excess);
        questions.truncate(keep);
        subjective_len -= old - keep;
        adjustments.push(Adjustment {
            qtype: req.qtype,
            field: AdjustedField::SectionLength,
            old: old as u32,
            new: keep as u32,
        });
        warnings.push(format!(
            "{:?}: truncated from {} to {} to fit the {} layout",
            req.qtype, old, keep, profile.name
        ));
        warn!(target: "composer", qtype = ?req.qtype, old, new = keep, "subjective cap enforced by truncation");
    }
}
