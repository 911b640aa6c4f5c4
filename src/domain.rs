//! Domain models used by the backend: questions, selection criteria, and the
//! composed paper.

use serde::{Deserialize, Serialize};

/// What kind of question is this? Subject-specific variants (passage,
/// poetry explanation, Urdu translation) live alongside the universal three.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
  Mcq,
  Short,
  Long,
  Passage,
  PoetryExplanation,
  TranslateUrdu,
}

impl QuestionType {
  pub fn is_mcq(&self) -> bool {
    matches!(self, QuestionType::Mcq)
  }

  /// Section heading printed at the top of each section.
  pub fn heading(&self) -> &'static str {
    match self {
      QuestionType::Mcq => "Multiple Choice Questions",
      QuestionType::Short => "Short Questions",
      QuestionType::Long => "Long Questions",
      QuestionType::Passage => "Comprehension Passage",
      QuestionType::PoetryExplanation => "Explanation of Verses",
      QuestionType::TranslateUrdu => "Translate into Urdu",
    }
  }
}

/// Difficulty tag on a question, or the filter requested by the caller.
/// `Any` means "no preference" on both sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
  #[default]
  Any,
}

impl Difficulty {
  /// True when a question tagged `self` satisfies the filter `wanted`.
  pub fn accepts(question: Difficulty, wanted: Difficulty) -> bool {
    wanted == Difficulty::Any || question == Difficulty::Any || question == wanted
  }

  /// Filters of `Any` behave as if no filter was given.
  pub fn is_filter(&self) -> bool {
    *self != Difficulty::Any
  }
}

/// Where a question originally came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceCategory {
  #[default]
  Book,
  PastPaper,
  ModelPaper,
  Custom,
}

/// Coarse subject grouping. Only used to decide the subjective layout bonus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectCategory {
  Science,
  Arts,
  Language,
}

impl SubjectCategory {
  /// Language subjects (Urdu, English, Islamiyat) get extra subjective room.
  pub fn qualifies_for_bonus(&self) -> bool {
    matches!(self, SubjectCategory::Language)
  }
}

/// One MCQ option with its bilingual text.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct McqOption {
  pub text_en: String,
  #[serde(default)]
  pub text_ur: Option<String>,
  #[serde(default)]
  pub correct: bool,
}

/// A question as stored in the bank. Immutable once fetched; the engine
/// works with clones and only keeps a `SelectedQuestion` view per pick.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
  pub id: u64,
  pub qtype: QuestionType,
  pub subject: u32,
  pub chapter: u32,
  #[serde(default)]
  pub difficulty: Difficulty,
  #[serde(default)]
  pub source: SourceCategory,
  pub text_en: String,
  #[serde(default)]
  pub text_ur: Option<String>,
  /// Up to 4 options; only meaningful for `Mcq`.
  #[serde(default)]
  pub options: Vec<McqOption>,
  /// Expected answer text; only meaningful for non-`Mcq`.
  #[serde(default)]
  pub answer: Option<String>,
}

/// Lightweight view of a question after selection finalizes: its place in
/// the section and the marks it carries (override already resolved).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectedQuestion {
  pub id: u64,
  pub order: u32,
  pub marks: u32,
}

/// Per-type request as submitted by the caller.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelectionCriteria {
  pub requested_total: u32,
  pub requested_attempt: u32,
  /// Default marks per question; per-question overrides may replace it.
  pub marks_each: u32,
  #[serde(default)]
  pub difficulty: Difficulty,
  /// `None` means "all sources".
  #[serde(default)]
  pub source: Option<SourceCategory>,
}

/// One entry of the ordered per-type request map. Declaration order matters:
/// it drives remainder priority during subjective rebalancing.
#[derive(Clone, Debug)]
pub struct TypeRequest {
  pub qtype: QuestionType,
  pub criteria: SelectionCriteria,
  /// Explicit question ids; bypasses selection and chapter balancing.
  pub manual_ids: Option<Vec<u64>>,
}

/// A finalized section: ordered picks plus the attempt prefix length.
#[derive(Clone, Debug, Serialize)]
pub struct ComposedSection {
  pub qtype: QuestionType,
  pub questions: Vec<SelectedQuestion>,
  /// How many questions from the top the student must answer.
  pub attempt: u32,
  /// Derived strictly from the attempt prefix; never stored independently.
  pub section_marks: u32,
  pub marks_each: u32,
}

/// The finished paper. Never mutated in place: edits recompose a new one.
#[derive(Clone, Debug, Serialize)]
pub struct ComposedPaper {
  pub id: String,
  pub layout: String,
  pub sections: Vec<ComposedSection>,
  pub total_marks: u32,
  /// Identical physical copies composited onto one printed sheet.
  pub duplicate_count: u32,
  pub page_break_before_subjective: bool,
}
