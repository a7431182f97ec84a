use rand::seq::SliceRandom;
use rand::RngCore;
use std::collections::HashSet;

use crate::error::ConfigurationError;
use crate::quiz::definition::question::{normalize, Question, RawQuestion, Subject};

mod free_text;
mod lifespan;
mod longest_lived;
mod multiple_choice;
mod older_parent;
mod year;


pub use self::free_text::FreeText;
pub use self::lifespan::Lifespan;
pub use self::longest_lived::LongestLived;
pub use self::multiple_choice::MultipleChoice;
pub use self::older_parent::OlderParent;
pub use self::year::Year;

pub const DEFAULT_DISTRACTORS: usize = 3;

/// What a question type knows how to do. New types implement this, get a
/// `Variant` arm and a row in `REGISTRY`.
pub trait Kind {
    fn text(&self, question: &Question, subject: &Subject) -> String {
        question.definition.template.render(subject)
    }

    fn correct_answer(&self, question: &Question, subject: &Subject) -> Option<String>;

    fn reveal(&self, question: &Question, subject: &Subject) -> Option<String> {
        self.correct_answer(question, subject)
    }

    /// `None` for questions answered in free text.
    fn choices(
        &self,
        question: &Question,
        subject: &Subject,
        rng: &mut dyn RngCore,
    ) -> Option<Vec<String>>;

    /// Checks on top of the required fields.
    fn is_valid_for(&self, _question: &Question, _subject: &Subject) -> bool {
        true
    }

    fn is_correct(&self, question: &Question, subject: &Subject, answer: &str) -> bool {
        match self.correct_answer(question, subject) {
            Some(correct) => normalize(&correct) == normalize(answer),
            None => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Variant {
    MultipleChoice(MultipleChoice),
    FreeText(FreeText),
    Year(Year),
    Lifespan(Lifespan),
    OlderParent(OlderParent),
    LongestLived(LongestLived),
}

impl Variant {
    pub fn get_kind(&self) -> &dyn Kind {
        match self {
            Variant::MultipleChoice(k) => k,
            Variant::FreeText(k) => k,
            Variant::Year(k) => k,
            Variant::Lifespan(k) => k,
            Variant::OlderParent(k) => k,
            Variant::LongestLived(k) => k,
        }
    }
}

pub type Constructor = fn(&RawQuestion) -> Result<Variant, ConfigurationError>;

pub const REGISTRY: &[(&str, Constructor)] = &[
    ("multiple_choice", multiple_choice::build),
    ("free_text", free_text::build),
    ("year", year::build),
    ("lifespan", lifespan::build),
    ("older_parent", older_parent::build),
    ("longest_lived", longest_lived::build),
];

pub fn constructor(tag: &str) -> Option<Constructor> {
    REGISTRY
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, constructor)| *constructor)
}

/// The correct answer plus up to `count` distinct values from `pool`, in
/// random order. Values equal to the answer or to each other once
/// normalized are dropped, and nothing is made up when the pool runs dry.
pub fn draw_choices<I>(correct: String, pool: I, count: usize, rng: &mut dyn RngCore) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    seen.insert(normalize(&correct));
    let distinct: Vec<String> = pool
        .into_iter()
        .filter(|value| !value.trim().is_empty() && seen.insert(normalize(value)))
        .collect();

    let mut choices: Vec<String> = distinct.choose_multiple(rng, count).cloned().collect();
    choices.push(correct);
    choices.shuffle(rng);
    choices
}
