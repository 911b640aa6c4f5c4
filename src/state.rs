//! Application state: the immutable question bank snapshot.
//!
//! Built once at startup from the TOML bank file (if any) plus the built-in
//! seeds, then shared read-only behind an `Arc`. Composition requests never
//! write, so no locks are needed.

use std::collections::{HashMap, HashSet};

use tracing::{info, instrument};

use crate::bank::InMemoryBank;
use crate::config::load_bank_config_from_env;
use crate::domain::Question;
use crate::seeds::seed_questions;

pub struct AppState {
    pub bank: InMemoryBank,
}

impl AppState {
    /// Build state from env: load the bank file, merge in seeds, log the
    /// inventory.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let mut questions: Vec<Question> = Vec::new();
        let mut taken: HashSet<u64> = HashSet::new();

        if let Some(cfg) = load_bank_config_from_env() {
            for entry in cfg.questions {
                if let Some(q) = entry.into_question() {
                    if taken.insert(q.id) {
                        questions.push(q);
                    }
                }
            }
        }

        // Always add built-in seeds, but never shadow a configured id.
        for q in seed_questions() {
            if taken.insert(q.id) {
                questions.push(q);
            }
        }

        // Inventory summary by subject and type.
        let mut by_subject: HashMap<u32, HashMap<&'static str, usize>> = HashMap::new();
        for q in &questions {
            *by_subject
                .entry(q.subject)
                .or_default()
                .entry(q.qtype.heading())
                .or_insert(0) += 1;
        }
        for (subject, counts) in by_subject {
            info!(target: "imtihan_backend", subject, ?counts, "Startup bank inventory");
        }

        Self {
            bank: InMemoryBank::new(questions),
        }
    }
}
