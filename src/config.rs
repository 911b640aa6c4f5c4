//! Loading the question bank from TOML.
//!
//! See `BankConfig` and `QuestionCfg` for the expected schema. The file is
//! optional: without it the server falls back to the built-in seed bank.

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{Difficulty, McqOption, Question, QuestionType, SourceCategory};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct BankConfig {
  #[serde(default)]
  pub questions: Vec<QuestionCfg>,
}

/// Question entry accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct QuestionCfg {
  pub id: u64,
  #[serde(rename = "type")]
  pub qtype: QuestionType,
  pub subject: u32,
  pub chapter: u32,
  #[serde(default)] pub difficulty: Difficulty,
  #[serde(default)] pub source: SourceCategory,
  pub text_en: String,
  #[serde(default)] pub text_ur: Option<String>,
  #[serde(default)] pub options: Vec<OptionCfg>,
  #[serde(default)] pub answer: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OptionCfg {
  pub text_en: String,
  #[serde(default)] pub text_ur: Option<String>,
  #[serde(default)] pub correct: bool,
}

impl QuestionCfg {
  /// Convert a config entry to a bank question. Entries that cannot stand
  /// on their own (an MCQ without options, or with more than four) are
  /// rejected so a typo in the file does not poison compositions.
  pub fn into_question(self) -> Option<Question> {
    if self.text_en.trim().is_empty() && self.text_ur.as_deref().map_or(true, |s| s.trim().is_empty()) {
      error!(target: "imtihan_backend", id = self.id, "Skipping bank item: no question text.");
      return None;
    }
    if self.qtype == QuestionType::Mcq {
      if self.options.is_empty() || self.options.len() > 4 {
        error!(target: "imtihan_backend", id = self.id, options = self.options.len(), "Skipping bank item: MCQ needs 1-4 options.");
        return None;
      }
    }
    Some(Question {
      id: self.id,
      qtype: self.qtype,
      subject: self.subject,
      chapter: self.chapter,
      difficulty: self.difficulty,
      source: self.source,
      text_en: self.text_en,
      text_ur: self.text_ur,
      options: self
        .options
        .into_iter()
        .map(|o| McqOption { text_en: o.text_en, text_ur: o.text_ur, correct: o.correct })
        .collect(),
      answer: self.answer,
    })
  }
}

/// Attempt to load `BankConfig` from BANK_CONFIG_PATH. On any parsing/IO
/// error, returns None.
pub fn load_bank_config_from_env() -> Option<BankConfig> {
  let path = std::env::var("BANK_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<BankConfig>(&s) {
      Ok(cfg) => {
        info!(target: "imtihan_backend", %path, count = cfg.questions.len(), "Loaded question bank (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "imtihan_backend", %path, error = %e, "Failed to parse TOML bank file");
        None
      }
    },
    Err(e) => {
      error!(target: "imtihan_backend", %path, error = %e, "Failed to read TOML bank file");
      None
    }
  }
}
