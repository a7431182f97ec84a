use rand::RngCore;

use super::{draw_choices, Kind, Variant, DEFAULT_DISTRACTORS};
use crate::error::ConfigurationError;
use crate::family::Person;
use crate::quiz::definition::question::{FieldPath, Question, RawQuestion, Role, Subject};

/// Lines the subject up with people who died younger and asks who lived the
/// longest. Choices show the definition's field, usually the name.
#[derive(Clone, Debug, PartialEq)]
pub struct LongestLived {
    pub distractors: usize,
}

pub fn build(raw: &RawQuestion) -> Result<Variant, ConfigurationError> {
    match raw.field.parse::<FieldPath>() {
        Ok(path) if path.role == Role::Person => Ok(Variant::LongestLived(LongestLived {
            distractors: raw.distractors.unwrap_or(DEFAULT_DISTRACTORS),
        })),
        _ => Err(ConfigurationError::invalid(
            &raw.id,
            format!("'{}' is not a field of the person", raw.field),
        )),
    }
}

impl LongestLived {
    fn shorter_lives<'a>(
        &self,
        question: &Question,
        subject: &Subject<'a>,
    ) -> impl Iterator<Item = &'a Person> {
        let lifespan = subject.person.lifespan();
        let field = question.definition.field.field.clone();
        subject.others().filter(move |p| match (p.lifespan(), lifespan) {
            (Some(other), Some(own)) => other < own && p.field(&field).is_some(),
            _ => false,
        })
    }
}

impl Kind for LongestLived {
    fn correct_answer(&self, question: &Question, subject: &Subject) -> Option<String> {
        subject.person.lifespan()?;
        subject.lookup(&question.definition.field)
    }

    fn choices(
        &self,
        question: &Question,
        subject: &Subject,
        rng: &mut dyn RngCore,
    ) -> Option<Vec<String>> {
        let correct = self.correct_answer(question, subject)?;
        let field = &question.definition.field.field;
        let pool = self
            .shorter_lives(question, subject)
            .filter_map(|p| p.field(field));
        Some(draw_choices(correct, pool, self.distractors, rng))
    }

    /// Someone must have died younger, or there is nothing to compare.
    fn is_valid_for(&self, question: &Question, subject: &Subject) -> bool {
        self.correct_answer(question, subject).is_some()
            && self.shorter_lives(question, subject).next().is_some()
    }
}
