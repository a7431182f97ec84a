use rand::RngCore;

use super::{draw_choices, Kind, Variant, DEFAULT_DISTRACTORS};
use crate::error::ConfigurationError;
use crate::quiz::definition::question::{Question, RawQuestion, Role, Subject};

/// Picks the answer among other people's values for the same field, or
/// among a fixed list when the definition provides one.
#[derive(Clone, Debug, PartialEq)]
pub struct MultipleChoice {
    pub distractors: usize,
    pub choices: Option<Vec<String>>,
}

pub fn build(raw: &RawQuestion) -> Result<Variant, ConfigurationError> {
    if let Some(choices) = &raw.choices {
        if choices.iter().all(|c| c.trim().is_empty()) {
            return Err(ConfigurationError::invalid(&raw.id, "choices list is empty"));
        }
    }
    Ok(Variant::MultipleChoice(MultipleChoice {
        distractors: raw.distractors.unwrap_or(DEFAULT_DISTRACTORS),
        choices: raw.choices.clone(),
    }))
}

impl MultipleChoice {
    fn pool(&self, question: &Question, subject: &Subject) -> Vec<String> {
        if let Some(choices) = &self.choices {
            return choices.clone();
        }
        let path = &question.definition.field;
        subject
            .others()
            .filter(|p| match path.role {
                // Fathers are only confused with other men, mothers with other women.
                Role::Parent(role) if path.field == "name" => p.gender == role.gender(),
                _ => true,
            })
            .filter_map(|p| p.field(&path.field))
            .collect()
    }
}

impl Kind for MultipleChoice {
    fn correct_answer(&self, question: &Question, subject: &Subject) -> Option<String> {
        subject.lookup(&question.definition.field)
    }

    fn choices(
        &self,
        question: &Question,
        subject: &Subject,
        rng: &mut dyn RngCore,
    ) -> Option<Vec<String>> {
        let correct = self.correct_answer(question, subject)?;
        let pool = self.pool(question, subject);
        Some(draw_choices(correct, pool, self.distractors, rng))
    }
}
