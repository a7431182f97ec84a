use rand::RngCore;

use super::{Kind, Variant};
use crate::error::ConfigurationError;
use crate::quiz::definition::question::{normalize, Question, RawQuestion, Subject};

#[derive(Clone, Debug, PartialEq)]
pub struct FreeText;

pub fn build(raw: &RawQuestion) -> Result<Variant, ConfigurationError> {
    if raw.choices.is_some() {
        return Err(ConfigurationError::invalid(
            &raw.id,
            "free text questions cannot list choices",
        ));
    }
    Ok(Variant::FreeText(FreeText))
}

impl Kind for FreeText {
    /// Normalized, ready to be compared with what the player typed.
    fn correct_answer(&self, question: &Question, subject: &Subject) -> Option<String> {
        subject
            .lookup(&question.definition.field)
            .map(|value| normalize(&value))
    }

    fn reveal(&self, question: &Question, subject: &Subject) -> Option<String> {
        subject.lookup(&question.definition.field)
    }

    fn choices(&self, _question: &Question, _subject: &Subject, _rng: &mut dyn RngCore) -> Option<Vec<String>> {
        None
    }
}
