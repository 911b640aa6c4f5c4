//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.
//!
//! Rendering concerns live here too: `to_out` applies the bilingual
//! normalizer per question and replicates the section set once per physical
//! copy of the sheet, so the payload is ready for the print backend.

use serde::{Deserialize, Serialize};

use crate::bank::QuestionBank;
use crate::bilingual::normalize;
use crate::compose::{ComposeOutput, CompositionRequest, TypeReport};
use crate::domain::{
    ComposedPaper, Difficulty, QuestionType, SelectionCriteria, SourceCategory, SubjectCategory,
    TypeRequest,
};
use crate::layout::{Adjustment, LayoutProfile};

//
// Request DTOs
//

#[derive(Debug, Deserialize)]
pub struct ComposeIn {
    #[serde(rename = "subjectId")]
    pub subject_id: u32,
    #[serde(rename = "subjectCategory")]
    pub subject_category: SubjectCategory,
    /// Already-resolved chapter scope (see /scope/resolve).
    pub chapters: Vec<u32>,
    pub layout: String,
    pub types: Vec<TypeRequestIn>,
    #[serde(default, rename = "markOverrides")]
    pub mark_overrides: Vec<MarkOverrideIn>,
    /// Optional deterministic shuffle seed ("regenerate with the same
    /// questions").
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct TypeRequestIn {
    #[serde(rename = "type")]
    pub qtype: QuestionType,
    pub total: u32,
    pub attempt: u32,
    pub marks: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub source: Option<SourceCategory>,
    /// Explicit question ids; bypasses random selection for this type.
    #[serde(default, rename = "manualIds")]
    pub manual_ids: Option<Vec<u64>>,
}

#[derive(Debug, Deserialize)]
pub struct MarkOverrideIn {
    #[serde(rename = "questionId")]
    pub question_id: u64,
    pub marks: u32,
}

impl ComposeIn {
    /// Lift the wire shape into the engine request. The layout name has
    /// already been resolved to a profile by the handler.
    pub fn into_request(self, profile: LayoutProfile) -> CompositionRequest {
        CompositionRequest {
            subject: self.subject_id,
            category: self.subject_category,
            scope: self.chapters,
            requests: self
                .types
                .into_iter()
                .map(|t| TypeRequest {
                    qtype: t.qtype,
                    criteria: SelectionCriteria {
                        requested_total: t.total,
                        requested_attempt: t.attempt,
                        marks_each: t.marks,
                        difficulty: t.difficulty,
                        source: t.source,
                    },
                    manual_ids: t.manual_ids,
                })
                .collect(),
            profile,
            mark_overrides: self
                .mark_overrides
                .into_iter()
                .map(|o| (o.question_id, o.marks))
                .collect(),
            seed: self.seed,
        }
    }
}

/// Chapter-scope resolution request: a coverage policy against a subject.
#[derive(Debug, Deserialize)]
pub struct ScopeIn {
    #[serde(rename = "subjectId")]
    pub subject_id: u32,
    pub policy: CoveragePolicy,
    /// For `single`.
    #[serde(default)]
    pub chapter: Option<u32>,
    /// For `custom`.
    #[serde(default)]
    pub chapters: Option<Vec<u32>>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoveragePolicy {
    Full,
    FirstHalf,
    SecondHalf,
    Single,
    Custom,
}

#[derive(Serialize)]
pub struct ScopeOut {
    pub chapters: Vec<u32>,
}

//
// Response DTOs
//

#[derive(Serialize)]
pub struct ComposeOut {
    pub paper: PaperOut,
    pub adjustments: Vec<Adjustment>,
    pub reports: Vec<TypeReport>,
    pub warnings: Vec<String>,
}

#[derive(Serialize)]
pub struct PaperOut {
    pub id: String,
    pub layout: String,
    #[serde(rename = "totalMarks")]
    pub total_marks: u32,
    #[serde(rename = "duplicateCount")]
    pub duplicate_count: u32,
    #[serde(rename = "pageBreakBeforeSubjective")]
    pub page_break_before_subjective: bool,
    /// One entry per physical copy on the sheet; all copies are identical.
    /// Copy boundaries are the physical separators.
    pub copies: Vec<PaperCopyOut>,
}

#[derive(Clone, Serialize)]
pub struct PaperCopyOut {
    pub copy: u32,
    pub sections: Vec<SectionOut>,
}

#[derive(Clone, Serialize)]
pub struct SectionOut {
    #[serde(rename = "type")]
    pub qtype: QuestionType,
    pub heading: &'static str,
    pub attempt: u32,
    #[serde(rename = "marksEach")]
    pub marks_each: u32,
    #[serde(rename = "sectionMarks")]
    pub section_marks: u32,
    pub questions: Vec<QuestionOut>,
}

#[derive(Clone, Serialize)]
pub struct QuestionOut {
    pub id: u64,
    pub order: u32,
    pub marks: u32,
    #[serde(rename = "textEn")]
    pub text_en: String,
    #[serde(rename = "textUr")]
    pub text_ur: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionOut>,
}

#[derive(Clone, Serialize)]
pub struct OptionOut {
    #[serde(rename = "textEn")]
    pub text_en: String,
    #[serde(rename = "textUr")]
    pub text_ur: String,
    pub correct: bool,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

/// Convert the engine output to the public DTO: bilingual pairs are derived
/// per question here, at render time, and the finalized section set is
/// replicated once per physical copy.
pub fn to_out(output: &ComposeOutput, bank: &dyn QuestionBank) -> ComposeOut {
    let sections = render_sections(&output.paper, bank);
    let copies = (1..=output.paper.duplicate_count)
        .map(|copy| PaperCopyOut {
            copy,
            sections: sections.clone(),
        })
        .collect();

    ComposeOut {
        paper: PaperOut {
            id: output.paper.id.clone(),
            layout: output.paper.layout.clone(),
            total_marks: output.paper.total_marks,
            duplicate_count: output.paper.duplicate_count,
            page_break_before_subjective: output.paper.page_break_before_subjective,
            copies,
        },
        adjustments: output.adjustments.clone(),
        reports: output.reports.clone(),
        warnings: output.warnings.clone(),
    }
}

fn render_sections(paper: &ComposedPaper, bank: &dyn QuestionBank) -> Vec<SectionOut> {
    paper
        .sections
        .iter()
        .map(|section| SectionOut {
            qtype: section.qtype,
            heading: section.qtype.heading(),
            attempt: section.attempt,
            marks_each: section.marks_each,
            section_marks: section.section_marks,
            questions: section
                .questions
                .iter()
                .map(|sq| {
                    let full = bank.by_ids(&[sq.id]).into_iter().next();
                    match full {
                        Some(q) => {
                            let text = normalize(&q.text_en, q.text_ur.as_deref());
                            QuestionOut {
                                id: sq.id,
                                order: sq.order,
                                marks: sq.marks,
                                text_en: text.primary,
                                text_ur: text.secondary,
                                options: q
                                    .options
                                    .iter()
                                    .map(|o| {
                                        let text = normalize(&o.text_en, o.text_ur.as_deref());
                                        OptionOut {
                                            text_en: text.primary,
                                            text_ur: text.secondary,
                                            correct: o.correct,
                                        }
                                    })
                                    .collect(),
                            }
                        }
                        // Finalized papers only reference bank ids, but a
                        // remote bank could lose a row between calls.
                        None => QuestionOut {
                            id: sq.id,
                            order: sq.order,
                            marks: sq.marks,
                            text_en: String::new(),
                            text_ur: String::new(),
                            options: Vec::new(),
                        },
                    }
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::InMemoryBank;
    use crate::compose::{compose, CompositionRequest};
    use crate::domain::Question;
    use std::collections::HashMap;

    fn bank() -> InMemoryBank {
        InMemoryBank::new(vec![Question {
            id: 1,
            qtype: QuestionType::Short,
            subject: 1,
            chapter: 1,
            difficulty: Difficulty::Any,
            source: SourceCategory::Book,
            text_en: "State Ohm's law. اوہم کا قانون بیان کریں۔".into(),
            text_ur: None,
            options: Vec::new(),
            answer: None,
        }])
    }

    #[test]
    fn compose_request_wire_shape_deserializes() {
        let body = serde_json::json!({
            "subjectId": 1,
            "subjectCategory": "science",
            "chapters": [1, 2],
            "layout": "combined",
            "types": [
                { "type": "mcq", "total": 10, "attempt": 10, "marks": 1 },
                { "type": "short", "total": 6, "attempt": 4, "marks": 2,
                  "difficulty": "easy", "manualIds": [3, 4] }
            ],
            "markOverrides": [{ "questionId": 3, "marks": 5 }],
            "seed": 7
        });
        let parsed: ComposeIn = serde_json::from_value(body).unwrap();
        let request = parsed.into_request(LayoutProfile::combined());
        assert_eq!(request.scope, vec![1, 2]);
        assert_eq!(request.requests.len(), 2);
        assert_eq!(request.requests[0].qtype, QuestionType::Mcq);
        assert_eq!(request.requests[1].criteria.difficulty, Difficulty::Easy);
        assert_eq!(request.requests[1].manual_ids, Some(vec![3, 4]));
        assert_eq!(request.mark_overrides[&3], 5);
        assert_eq!(request.seed, Some(7));
    }

    #[test]
    fn paper_serializes_with_wire_names() {
        let out = ComposeOut {
            paper: PaperOut {
                id: "p-1".into(),
                layout: "separate".into(),
                total_marks: 12,
                duplicate_count: 1,
                page_break_before_subjective: true,
                copies: vec![PaperCopyOut {
                    copy: 1,
                    sections: vec![SectionOut {
                        qtype: QuestionType::Short,
                        heading: QuestionType::Short.heading(),
                        attempt: 6,
                        marks_each: 2,
                        section_marks: 12,
                        questions: vec![QuestionOut {
                            id: 1,
                            order: 1,
                            marks: 2,
                            text_en: "State Ohm's law.".into(),
                            text_ur: "اوہم کا قانون بیان کریں۔".into(),
                            options: Vec::new(),
                        }],
                    }],
                }],
            },
            adjustments: Vec::new(),
            reports: Vec::new(),
            warnings: Vec::new(),
        };
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["paper"]["totalMarks"], 12);
        assert_eq!(value["paper"]["pageBreakBeforeSubjective"], true);
        let section = &value["paper"]["copies"][0]["sections"][0];
        assert_eq!(section["type"], "short");
        assert_eq!(section["marksEach"], 2);
        // Empty option lists never hit the wire.
        assert!(section["questions"][0].get("options").is_none());
    }

    #[test]
    fn replication_and_render_time_normalization() {
        let bank = bank();
        let request = CompositionRequest {
            subject: 1,
            category: SubjectCategory::Science,
            scope: vec![1],
            requests: vec![TypeRequest {
                qtype: QuestionType::Short,
                criteria: SelectionCriteria {
                    requested_total: 1,
                    requested_attempt: 1,
                    marks_each: 2,
                    difficulty: Difficulty::Any,
                    source: None,
                },
                manual_ids: None,
            }],
            profile: LayoutProfile::paired_sheet(),
            mark_overrides: HashMap::new(),
            seed: Some(1),
        };
        let output = compose(&bank, &request).unwrap();
        let out = to_out(&output, &bank);

        assert_eq!(out.paper.copies.len(), 2);
        let a = &out.paper.copies[0].sections[0].questions[0];
        let b = &out.paper.copies[1].sections[0].questions[0];
        assert_eq!(a.id, b.id);
        // The concatenated bank field was split at render time.
        assert_eq!(a.text_en, "State Ohm's law.");
        assert_eq!(a.text_ur, "اوہم کا قانون بیان کریں۔");
    }
}
