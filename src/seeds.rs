//! Built-in seed bank: a small set of bilingual questions that keeps the
//! server useful without any external bank file.
//!
//! Subject 1 is 9th-class Physics (chapters 1-3), subject 2 is Urdu
//! (chapters 1-2). Ids below 1000 are reserved for seeds.

use crate::domain::{Difficulty, McqOption, Question, QuestionType, SourceCategory};

fn mcq(
  id: u64,
  chapter: u32,
  difficulty: Difficulty,
  text_en: &str,
  text_ur: &str,
  options: [(&str, bool); 4],
) -> Question {
  Question {
    id,
    qtype: QuestionType::Mcq,
    subject: 1,
    chapter,
    difficulty,
    source: SourceCategory::Book,
    text_en: text_en.into(),
    text_ur: if text_ur.is_empty() { None } else { Some(text_ur.into()) },
    options: options
      .into_iter()
      .map(|(text, correct)| McqOption { text_en: text.into(), text_ur: None, correct })
      .collect(),
    answer: None,
  }
}

fn subjective(
  id: u64,
  qtype: QuestionType,
  subject: u32,
  chapter: u32,
  difficulty: Difficulty,
  source: SourceCategory,
  text_en: &str,
  text_ur: &str,
  answer: &str,
) -> Question {
  Question {
    id,
    qtype,
    subject,
    chapter,
    difficulty,
    source,
    text_en: text_en.into(),
    text_ur: if text_ur.is_empty() { None } else { Some(text_ur.into()) },
    options: Vec::new(),
    answer: if answer.is_empty() { None } else { Some(answer.into()) },
  }
}

pub fn seed_questions() -> Vec<Question> {
  use Difficulty::*;
  use QuestionType::*;
  use SourceCategory::*;

  vec![
    // Physics, chapter 1: physical quantities and measurement.
    mcq(
      1, 1, Easy,
      "The SI unit of length is:",
      "لمبائی کی بین الاقوامی اکائی ہے:",
      [("metre", true), ("foot", false), ("mile", false), ("inch", false)],
    ),
    mcq(
      2, 1, Medium,
      "A vernier callipers can measure up to:",
      "ورنیئر کیلیپرز پیمائش کر سکتا ہے:",
      [("1 mm", false), ("0.1 mm", true), ("0.01 mm", false), ("1 cm", false)],
    ),
    subjective(
      3, Short, 1, 1, Easy, Book,
      "Define a base quantity and give two examples.",
      "بنیادی مقدار کی تعریف کریں اور دو مثالیں دیں۔",
      "A quantity not defined in terms of others, e.g. length and time.",
    ),
    subjective(
      4, Short, 1, 1, Medium, PastPaper,
      "Why is the least count of a screw gauge smaller than that of a vernier callipers?",
      "",
      "Its pitch is divided over a circular scale of many divisions.",
    ),
    subjective(
      5, Long, 1, 1, Hard, Book,
      "Describe the working of a screw gauge and explain how zero error is corrected.",
      "سکریو گیج کی ساخت اور عمل بیان کریں اور زیرو ایرر کی درستگی سمجھائیں۔",
      "",
    ),
    // Physics, chapter 2: kinematics.
    mcq(
      6, 2, Easy,
      "The rate of change of displacement is called:",
      "ہٹاؤ کی تبدیلی کی شرح کہلاتی ہے:",
      [("speed", false), ("velocity", true), ("acceleration", false), ("force", false)],
    ),
    mcq(
      7, 2, Hard,
      "A body moving with uniform velocity has acceleration:",
      "",
      [("positive", false), ("negative", false), ("zero", true), ("uniform", false)],
    ),
    subjective(
      8, Short, 1, 2, Easy, Book,
      "Differentiate between distance and displacement.",
      "فاصلے اور ہٹاؤ میں فرق واضح کریں۔",
      "Distance is the path length; displacement is the shortest directed line.",
    ),
    subjective(
      9, Short, 1, 2, Medium, ModelPaper,
      "A car starts from rest and attains 20 m/s in 10 s. Find its acceleration.",
      "",
      "a = (20 - 0) / 10 = 2 m/s²",
    ),
    subjective(
      10, Long, 1, 2, Medium, PastPaper,
      "Derive the first and second equations of motion with a velocity-time graph.",
      "رفتار-وقت گراف کی مدد سے حرکت کی پہلی اور دوسری مساوات اخذ کریں۔",
      "",
    ),
    // Physics, chapter 3: dynamics.
    mcq(
      11, 3, Medium,
      "The SI unit of force is:",
      "قوت کی بین الاقوامی اکائی ہے:",
      [("joule", false), ("watt", false), ("newton", true), ("pascal", false)],
    ),
    subjective(
      12, Short, 1, 3, Easy, Book,
      "State Newton's first law of motion.",
      "نیوٹن کا پہلا قانونِ حرکت بیان کریں۔",
      "A body stays at rest or in uniform motion unless acted on by a force.",
    ),
    subjective(
      13, Long, 1, 3, Hard, Book,
      "State and explain Newton's second law of motion with one worked example.",
      "",
      "",
    ),
    // Urdu, chapters 1-2. These arrive with both languages concatenated in
    // one field, the shape the bilingual normalizer exists for.
    subjective(
      20, Short, 2, 1, Easy, Book,
      "Summarise the lesson in your own words. سبق کا خلاصہ اپنے الفاظ میں تحریر کریں۔",
      "",
      "",
    ),
    subjective(
      21, PoetryExplanation, 2, 1, Medium, PastPaper,
      "Explain the following verses with reference to context. درج ذیل اشعار کی تشریح سیاق و سباق کے حوالے سے کریں۔",
      "",
      "",
    ),
    subjective(
      22, TranslateUrdu, 2, 2, Medium, Book,
      "Translate the following passage into Urdu.",
      "درج ذیل عبارت کا اردو میں ترجمہ کریں۔",
      "",
    ),
    subjective(
      23, Passage, 2, 2, Hard, ModelPaper,
      "Read the passage carefully and answer the questions at the end.",
      "عبارت غور سے پڑھیں اور آخر میں دیے گئے سوالات کے جواب دیں۔",
      "",
    ),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn seed_ids_are_unique() {
    let seeds = seed_questions();
    let mut ids: Vec<u64> = seeds.iter().map(|q| q.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), seeds.len());
  }

  #[test]
  fn seed_mcqs_have_exactly_one_correct_option() {
    for q in seed_questions() {
      if q.qtype == QuestionType::Mcq {
        let correct = q.options.iter().filter(|o| o.correct).count();
        assert_eq!(correct, 1, "question {}", q.id);
      }
    }
  }
}
