use rand::RngCore;

use super::{Kind, Variant};
use crate::error::ConfigurationError;
use crate::family::{parse_date, ParentRole};
use crate::quiz::definition::question::{Question, RawQuestion, Subject};

pub const FATHER: &str = "Father";
pub const MOTHER: &str = "Mother";
pub const SAME_AGE: &str = "They were the same age";

/// Asks which parent was born first, comparing the date field of the
/// definition on both of them.
#[derive(Clone, Debug, PartialEq)]
pub struct OlderParent;

pub fn build(raw: &RawQuestion) -> Result<Variant, ConfigurationError> {
    if !raw.field.ends_with("_date") {
        return Err(ConfigurationError::invalid(
            &raw.id,
            format!("'{}' is not a date field", raw.field),
        ));
    }
    Ok(Variant::OlderParent(OlderParent))
}

impl Kind for OlderParent {
    fn correct_answer(&self, question: &Question, subject: &Subject) -> Option<String> {
        let field = &question.definition.field.field;
        let date_of = |role| {
            subject
                .get_parent(role)
                .and_then(|p| p.field(field))
                .and_then(|value| parse_date(&value).ok())
        };
        let father = date_of(ParentRole::Father)?;
        let mother = date_of(ParentRole::Mother)?;
        let answer = if father < mother {
            FATHER
        } else if mother < father {
            MOTHER
        } else {
            SAME_AGE
        };
        Some(answer.to_owned())
    }

    fn choices(
        &self,
        question: &Question,
        subject: &Subject,
        _rng: &mut dyn RngCore,
    ) -> Option<Vec<String>> {
        self.correct_answer(question, subject)?;
        Some(vec![FATHER.to_owned(), MOTHER.to_owned(), SAME_AGE.to_owned()])
    }

    fn is_valid_for(&self, question: &Question, subject: &Subject) -> bool {
        self.correct_answer(question, subject).is_some()
    }
}
