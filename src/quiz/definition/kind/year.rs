use chrono::Datelike;
use rand::RngCore;

use super::{draw_choices, Kind, Variant, DEFAULT_DISTRACTORS};
use crate::error::ConfigurationError;
use crate::family::parse_date;
use crate::quiz::definition::question::{Question, RawQuestion, Subject};

/// Asks for the year of a date field.
#[derive(Clone, Debug, PartialEq)]
pub struct Year {
    pub distractors: usize,
}

pub fn build(raw: &RawQuestion) -> Result<Variant, ConfigurationError> {
    if !raw.field.ends_with("_date") {
        return Err(ConfigurationError::invalid(
            &raw.id,
            format!("'{}' is not a date field", raw.field),
        ));
    }
    Ok(Variant::Year(Year {
        distractors: raw.distractors.unwrap_or(DEFAULT_DISTRACTORS),
    }))
}

fn year_of(value: &str) -> Option<String> {
    parse_date(value).ok().map(|date| date.year().to_string())
}

impl Kind for Year {
    fn correct_answer(&self, question: &Question, subject: &Subject) -> Option<String> {
        subject
            .lookup(&question.definition.field)
            .and_then(|value| year_of(&value))
    }

    fn choices(
        &self,
        question: &Question,
        subject: &Subject,
        rng: &mut dyn RngCore,
    ) -> Option<Vec<String>> {
        let correct = self.correct_answer(question, subject)?;
        let field = &question.definition.field.field;
        let pool = subject
            .others()
            .filter_map(|p| p.field(field))
            .filter_map(|value| year_of(&value));
        Some(draw_choices(correct, pool, self.distractors, rng))
    }

    fn is_valid_for(&self, question: &Question, subject: &Subject) -> bool {
        self.correct_answer(question, subject).is_some()
    }
}
