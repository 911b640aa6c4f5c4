//! Marks and attempt arithmetic.
//!
//! Marks reconcile with *attempted* questions, not presented ones: a
//! section may offer ten questions with "attempt any six", and only the
//! first six in presentation order carry marks. Anything that reorders a
//! section must re-run these functions; they are never patched
//! incrementally.

use std::collections::HashMap;

use crate::domain::{ComposedSection, SelectedQuestion};

/// Marks one question carries: its override if the teacher set one,
/// otherwise the section default.
pub fn resolved_marks(id: u64, default_marks: u32, overrides: &HashMap<u64, u32>) -> u32 {
    overrides.get(&id).copied().unwrap_or(default_marks)
}

/// Sum of marks over the first `attempt` questions in order. Questions
/// beyond the attempt prefix are the optional extras and contribute zero.
pub fn section_marks(questions: &[SelectedQuestion], attempt: u32) -> u32 {
    questions
        .iter()
        .take(attempt as usize)
        .map(|q| q.marks)
        .sum()
}

/// Paper total: the sum of every section's (already prefix-derived) marks.
pub fn total_marks(sections: &[ComposedSection]) -> u32 {
    sections.iter().map(|s| s.section_marks).sum()
}
