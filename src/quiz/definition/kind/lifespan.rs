use rand::RngCore;

use super::{draw_choices, Kind, Variant, DEFAULT_DISTRACTORS};
use crate::error::ConfigurationError;
use crate::quiz::definition::question::{Question, RawQuestion, Subject};

/// Asks how old someone was when they died.
#[derive(Clone, Debug, PartialEq)]
pub struct Lifespan {
    pub distractors: usize,
}

pub fn build(raw: &RawQuestion) -> Result<Variant, ConfigurationError> {
    Ok(Variant::Lifespan(Lifespan {
        distractors: raw.distractors.unwrap_or(DEFAULT_DISTRACTORS),
    }))
}

impl Kind for Lifespan {
    fn correct_answer(&self, question: &Question, subject: &Subject) -> Option<String> {
        subject
            .target(question.definition.field.role)
            .and_then(|p| p.lifespan())
            .map(|years| years.to_string())
    }

    fn choices(
        &self,
        question: &Question,
        subject: &Subject,
        rng: &mut dyn RngCore,
    ) -> Option<Vec<String>> {
        let correct = self.correct_answer(question, subject)?;
        let pool = subject
            .others()
            .filter_map(|p| p.lifespan())
            .map(|years| years.to_string());
        Some(draw_choices(correct, pool, self.distractors, rng))
    }

    fn is_valid_for(&self, question: &Question, subject: &Subject) -> bool {
        self.correct_answer(question, subject).is_some()
    }
}
