//! Layout profiles and the budget resolver.
//!
//! A layout profile names a physical-page arrangement and the hard caps it
//! imposes: how many MCQs fit, how much room the subjective sections share,
//! and how many identical paper copies go on one printed sheet. The resolver
//! clamps a requested per-type map against those caps and reports every
//! clamp it makes, so the UI can tell the teacher what changed.

use serde::Serialize;

use crate::domain::{QuestionType, SubjectCategory, TypeRequest};

/// Hard caps for one named physical-page arrangement.
#[derive(Clone, Debug, Serialize)]
pub struct LayoutProfile {
    pub name: &'static str,
    pub mcq_max: u32,
    pub subjective_base: u32,
    /// Extra subjective room for qualifying subject categories. Zero means
    /// the cap is fixed regardless of subject.
    pub subjective_bonus: u32,
    /// Identical physical copies of the paper per printed sheet.
    pub duplicate_count: u32,
    pub page_break_before_subjective: bool,
}

impl LayoutProfile {
    /// Full-size paper, one per sheet, objective and subjective parts on
    /// separate pages.
    pub const fn separate() -> Self {
        Self {
            name: "separate",
            mcq_max: 15,
            subjective_base: 30,
            subjective_bonus: 5,
            duplicate_count: 1,
            page_break_before_subjective: true,
        }
    }

    /// Compact paper, everything on one page.
    pub const fn combined() -> Self {
        Self {
            name: "combined",
            mcq_max: 5,
            subjective_base: 15,
            subjective_bonus: 5,
            duplicate_count: 1,
            page_break_before_subjective: false,
        }
    }

    /// Two identical copies side by side on one sheet.
    pub const fn paired_sheet() -> Self {
        Self {
            name: "paired_sheet",
            mcq_max: 5,
            subjective_base: 10,
            subjective_bonus: 5,
            duplicate_count: 2,
            page_break_before_subjective: false,
        }
    }

    /// Three identical copies per sheet. The subjective cap is fixed: no
    /// subject-category bonus applies.
    pub const fn tripled_sheet() -> Self {
        Self {
            name: "tripled_sheet",
            mcq_max: 5,
            subjective_base: 15,
            subjective_bonus: 0,
            duplicate_count: 3,
            page_break_before_subjective: false,
        }
    }

    pub fn all() -> [LayoutProfile; 4] {
        [
            Self::separate(),
            Self::combined(),
            Self::paired_sheet(),
            Self::tripled_sheet(),
        ]
    }

    pub fn by_name(name: &str) -> Option<LayoutProfile> {
        Self::all().into_iter().find(|p| p.name == name)
    }

    /// Effective subjective aggregate cap for a subject category.
    pub fn subjective_max(&self, category: SubjectCategory) -> u32 {
        if category.qualifies_for_bonus() {
            self.subjective_base + self.subjective_bonus
        } else {
            self.subjective_base
        }
    }
}

/// Which numeric field of a request got clamped.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdjustedField {
    RequestedTotal,
    RequestedAttempt,
    /// Post-composition truncation of a manually supplied section.
    SectionLength,
}

/// One caller-visible record of a clamp the resolver (or composer) made.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Adjustment {
    pub qtype: QuestionType,
    pub field: AdjustedField,
    pub old: u32,
    pub new: u32,
}

/// Clamp and rebalance the ordered per-type request map against a profile's
/// caps. Returns the adjusted map plus the list of clamps made; the list is
/// empty exactly when nothing had to change.
///
/// Attempt counts are clamped to their (possibly reduced) totals after all
/// total clamping, never the reverse.
pub fn resolve_budgets(
    requests: &[TypeRequest],
    profile: &LayoutProfile,
    category: SubjectCategory,
) -> (Vec<TypeRequest>, Vec<Adjustment>) {
    let mut out: Vec<TypeRequest> = requests.to_vec();
    let mut adjustments = Vec::new();

    // MCQ cap.
    for req in out.iter_mut().filter(|r| r.qtype.is_mcq()) {
        if req.criteria.requested_total > profile.mcq_max {
            adjustments.push(Adjustment {
                qtype: req.qtype,
                field: AdjustedField::RequestedTotal,
                old: req.criteria.requested_total,
                new: profile.mcq_max,
            });
            req.criteria.requested_total = profile.mcq_max;
        }
    }

    // Subjective aggregate cap, shared by every non-MCQ type.
    let subjective_max = profile.subjective_max(category);
    let subjective: Vec<usize> = (0..out.len()).filter(|&i| !out[i].qtype.is_mcq()).collect();
    let sum: u64 = subjective
        .iter()
        .map(|&i| out[i].criteria.requested_total as u64)
        .sum();

    if sum > subjective_max as u64 {
        let scaled = largest_remainder_scale(
            &subjective
                .iter()
                .map(|&i| out[i].criteria.requested_total)
                .collect::<Vec<_>>(),
            subjective_max,
        );
        for (slot, &i) in subjective.iter().enumerate() {
            let old = out[i].criteria.requested_total;
            let new = scaled[slot];
            if new != old {
                adjustments.push(Adjustment {
                    qtype: out[i].qtype,
                    field: AdjustedField::RequestedTotal,
                    old,
                    new,
                });
                out[i].criteria.requested_total = new;
            }
        }
    }

    // Attempt invariant: always <= total, clamped last.
    for req in out.iter_mut() {
        if req.criteria.requested_attempt > req.criteria.requested_total {
            adjustments.push(Adjustment {
                qtype: req.qtype,
                field: AdjustedField::RequestedAttempt,
                old: req.criteria.requested_attempt,
                new: req.criteria.requested_total,
            });
            req.criteria.requested_attempt = req.criteria.requested_total;
        }
    }

    (out, adjustments)
}

/// Scale `counts` down so they sum to `target`, using the largest-remainder
/// method. Remainder units go to the largest fractional share first, ties to
/// the earliest-declared type. A non-zero count is never reduced to zero
/// while `target` is at least the number of non-zero counts: rounding alone
/// must not drop a whole section.
fn largest_remainder_scale(counts: &[u32], target: u32) -> Vec<u32> {
    let sum: u64 = counts.iter().map(|&c| c as u64).sum();
    debug_assert!(sum > target as u64);

    let mut scaled: Vec<u32> = Vec::with_capacity(counts.len());
    let mut remainders: Vec<(u64, usize)> = Vec::with_capacity(counts.len());
    for (i, &c) in counts.iter().enumerate() {
        let num = c as u64 * target as u64;
        scaled.push((num / sum) as u32);
        remainders.push((num % sum, i));
    }

    let assigned: u32 = scaled.iter().sum();
    let mut leftover = target - assigned;
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for &(_, i) in &remainders {
        if leftover == 0 {
            break;
        }
        if counts[i] > 0 {
            scaled[i] += 1;
            leftover -= 1;
        }
    }

    // Rescue any non-zero request that rounded to zero, funded by the
    // largest allocation. Skipped when the cap cannot fit one question per
    // non-zero type anyway.
    let nonzero = counts.iter().filter(|&&c| c > 0).count() as u32;
    if target >= nonzero {
        loop {
            let starved = (0..counts.len()).find(|&i| counts[i] > 0 && scaled[i] == 0);
            let Some(starved) = starved else { break };
            let donor = (0..counts.len())
                .filter(|&i| scaled[i] > 1)
                .max_by_key(|&i| (scaled[i], i));
            let Some(donor) = donor else { break };
            scaled[donor] -= 1;
            scaled[starved] = 1;
        }
    }

    scaled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SelectionCriteria;

    fn req(qtype: QuestionType, total: u32, attempt: u32) -> TypeRequest {
        TypeRequest {
            qtype,
            criteria: SelectionCriteria {
                requested_total: total,
                requested_attempt: attempt,
                marks_each: 1,
                difficulty: Default::default(),
                source: None,
            },
            manual_ids: None,
        }
    }

    fn totals(reqs: &[TypeRequest]) -> Vec<u32> {
        reqs.iter().map(|r| r.criteria.requested_total).collect()
    }

    #[test]
    fn mcq_clamped_under_combined_profile() {
        let requests = vec![req(QuestionType::Mcq, 20, 20)];
        let (out, adj) =
            resolve_budgets(&requests, &LayoutProfile::combined(), SubjectCategory::Science);
        assert_eq!(out[0].criteria.requested_total, 5);
        assert_eq!(out[0].criteria.requested_attempt, 5);
        assert_eq!(adj.len(), 2); // total, then attempt
    }

    #[test]
    fn caps_hold_for_every_profile() {
        for profile in LayoutProfile::all() {
            for category in [
                SubjectCategory::Science,
                SubjectCategory::Arts,
                SubjectCategory::Language,
            ] {
                let requests = vec![
                    req(QuestionType::Mcq, 40, 38),
                    req(QuestionType::Short, 25, 20),
                    req(QuestionType::Long, 25, 12),
                    req(QuestionType::Passage, 3, 3),
                ];
                let (out, _) = resolve_budgets(&requests, &profile, category);
                assert!(out[0].criteria.requested_total <= profile.mcq_max);
                let subjective: u32 = out[1..]
                    .iter()
                    .map(|r| r.criteria.requested_total)
                    .sum();
                assert!(subjective <= profile.subjective_max(category));
                for r in &out {
                    assert!(r.criteria.requested_attempt <= r.criteria.requested_total);
                }
            }
        }
    }

    #[test]
    fn language_category_gets_bonus_except_tripled() {
        assert_eq!(
            LayoutProfile::separate().subjective_max(SubjectCategory::Language),
            35
        );
        assert_eq!(
            LayoutProfile::separate().subjective_max(SubjectCategory::Science),
            30
        );
        assert_eq!(
            LayoutProfile::tripled_sheet().subjective_max(SubjectCategory::Language),
            15
        );
    }

    #[test]
    fn proportional_rebalance_sums_to_cap() {
        let requests = vec![
            req(QuestionType::Short, 13, 10),
            req(QuestionType::Long, 13, 8),
            req(QuestionType::TranslateUrdu, 1, 1),
        ];
        let (out, adj) =
            resolve_budgets(&requests, &LayoutProfile::combined(), SubjectCategory::Science);
        assert_eq!(totals(&out), vec![7, 7, 1]);
        assert!(!adj.is_empty());
    }

    #[test]
    fn small_type_survives_rounding() {
        // Paired sheet, science: subjective max 10. Naive rounding would
        // zero out the single-question passage request.
        let requests = vec![
            req(QuestionType::Short, 20, 15),
            req(QuestionType::Long, 20, 10),
            req(QuestionType::Passage, 1, 1),
        ];
        let (out, _) =
            resolve_budgets(&requests, &LayoutProfile::paired_sheet(), SubjectCategory::Science);
        let got = totals(&out);
        assert_eq!(got.iter().sum::<u32>(), 10);
        assert!(got[2] >= 1, "passage dropped: {:?}", got);
    }

    #[test]
    fn zero_requests_stay_zero() {
        let requests = vec![
            req(QuestionType::Short, 30, 20),
            req(QuestionType::Long, 30, 10),
            req(QuestionType::Passage, 0, 0),
        ];
        let (out, _) =
            resolve_budgets(&requests, &LayoutProfile::combined(), SubjectCategory::Science);
        assert_eq!(out[2].criteria.requested_total, 0);
        assert_eq!(totals(&out).iter().sum::<u32>(), 15);
    }

    #[test]
    fn no_adjustments_when_within_budget() {
        let requests = vec![
            req(QuestionType::Mcq, 10, 10),
            req(QuestionType::Short, 8, 5),
            req(QuestionType::Long, 5, 3),
        ];
        let (out, adj) =
            resolve_budgets(&requests, &LayoutProfile::separate(), SubjectCategory::Science);
        assert!(adj.is_empty());
        assert_eq!(totals(&out), vec![10, 8, 5]);
    }

    #[test]
    fn attempt_clamped_after_total_never_reverse() {
        // Total shrinks 13 -> 7 under the combined cap; the attempt of 9
        // must follow the *new* total.
        let requests = vec![
            req(QuestionType::Short, 13, 9),
            req(QuestionType::Long, 13, 4),
            req(QuestionType::TranslateUrdu, 1, 1),
        ];
        let (out, _) =
            resolve_budgets(&requests, &LayoutProfile::combined(), SubjectCategory::Science);
        assert_eq!(out[0].criteria.requested_total, 7);
        assert_eq!(out[0].criteria.requested_attempt, 7);
    }
}
