use anyhow::{anyhow, Result};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

use crate::error::ValidationError;
use crate::family::{PersonId, PersonStore};
use crate::output::{Message, QuizOutput};
use crate::quiz::definition::question::normalize;
use crate::quiz::definition::{Catalog, Subject};
use crate::quiz::Settings;


#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EndReason {
    NotEnoughData,
    Exhausted,
    QuestionLimit,
    UserQuit,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Score {
    pub correct: usize,
    pub asked: usize,
}

/// One question put to the player.
#[derive(Clone, Debug, PartialEq)]
pub struct Attempt {
    pub person: PersonId,
    pub question_id: String,
    pub text: String,
    pub correct_answer: String,
    pub reveal: String,
    pub choices: Option<Vec<String>>,
    pub answer: Option<String>,
    pub is_correct: bool,
}

#[derive(Debug)]
enum Phase {
    SelectingQuestion,
    Presenting(Attempt),
    AwaitingAnswer(Attempt),
    Scored(Attempt),
    SessionEnd(EndReason),
}

/// Every (person, question index) pair that can be asked right now.
pub fn eligible_pairs(store: &PersonStore, catalog: &Catalog) -> Vec<(PersonId, usize)> {
    let mut pairs = Vec::new();
    for person in store.people() {
        let subject = Subject::new(person, store);
        for (index, question) in catalog.questions().iter().enumerate() {
            if question.is_valid_for(&subject) {
                pairs.push((person.id(), index));
            }
        }
    }
    pairs
}

/// Maps what the player typed onto one of the presented choices: its text,
/// or failing that its number. Text wins so that numeric choices such as
/// ages can be typed out.
fn resolve_choice(choices: &[String], input: &str) -> Result<String, ValidationError> {
    let typed = normalize(input);
    if let Some(choice) = choices.iter().find(|choice| normalize(choice) == typed) {
        return Ok(choice.clone());
    }
    input
        .parse::<usize>()
        .ok()
        .and_then(|number| number.checked_sub(1))
        .and_then(|index| choices.get(index))
        .cloned()
        .ok_or(ValidationError::Choice(choices.len()))
}

pub struct Session<'a, O: QuizOutput, R: Rng> {
    store: &'a PersonStore,
    catalog: &'a Catalog,
    settings: Settings,
    current_phase: Phase,
    asked: HashSet<(PersonId, usize)>,
    history: Vec<Attempt>,
    score: Score,
    output: O,
    rng: R,
}

impl<'a, O: QuizOutput, R: Rng> Session<'a, O, R> {
    pub fn new(
        store: &'a PersonStore,
        catalog: &'a Catalog,
        settings: Settings,
        output: O,
        rng: R,
    ) -> Self {
        Session {
            store,
            catalog,
            settings,
            current_phase: Phase::SelectingQuestion,
            asked: HashSet::new(),
            history: Vec::new(),
            score: Score::default(),
            output,
            rng,
        }
    }

    fn set_current_phase(&mut self, phase: Phase) {
        debug!("Entering quiz phase: {:?}", phase);
        self.current_phase = phase;
    }

    pub fn is_over(&self) -> bool {
        matches!(self.current_phase, Phase::SessionEnd(_))
    }

    pub fn is_awaiting_answer(&self) -> bool {
        matches!(self.current_phase, Phase::AwaitingAnswer(_))
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        match self.current_phase {
            Phase::SessionEnd(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn score(&self) -> Score {
        self.score
    }

    /// Questions already answered, oldest first.
    pub fn history(&self) -> &[Attempt] {
        &self.history
    }

    pub fn current_attempt(&self) -> Option<&Attempt> {
        match &self.current_phase {
            Phase::Presenting(a) | Phase::AwaitingAnswer(a) | Phase::Scored(a) => Some(a),
            _ => None,
        }
    }

    /// Moves on to the next phase. Does nothing while an answer is expected
    /// or once the session is over.
    pub fn advance(&mut self) {
        let phase = std::mem::replace(&mut self.current_phase, Phase::SelectingQuestion);
        let next = match phase {
            Phase::SelectingQuestion => self.select_question(),
            Phase::Presenting(attempt) => {
                self.output.say(&Message::QuestionBegins {
                    number: self.score.asked + 1,
                    text: attempt.text.clone(),
                    choices: attempt.choices.clone(),
                });
                Phase::AwaitingAnswer(attempt)
            }
            Phase::Scored(_) => Phase::SelectingQuestion,
            phase => {
                self.current_phase = phase;
                return;
            }
        };
        if let Phase::SessionEnd(reason) = next {
            self.finish(reason);
        } else {
            self.set_current_phase(next);
        }
    }

    /// Advances until the player has to answer or the session ends.
    pub fn advance_to_prompt(&mut self) {
        while !self.is_over() && !self.is_awaiting_answer() {
            self.advance();
        }
    }

    /// Scores `input` against the current question. Invalid input leaves the
    /// question open so it can be asked again.
    pub fn answer(&mut self, input: &str) -> Result<bool> {
        let attempt = match &self.current_phase {
            Phase::AwaitingAnswer(attempt) => attempt,
            _ => return Err(anyhow!("There is no question to answer")),
        };

        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationError::EmptyAnswer.into());
        }
        let value = match &attempt.choices {
            Some(choices) => resolve_choice(choices, input)?,
            None => input.to_owned(),
        };

        let question = &self.catalog.questions()[self.question_index(attempt)?];
        let person = self
            .store
            .get(attempt.person)
            .ok_or_else(|| anyhow!("Person {} left the family", attempt.person))?;
        let is_correct = question.is_correct(&Subject::new(person, self.store), &value);

        let mut attempt = attempt.clone();
        attempt.answer = Some(value);
        attempt.is_correct = is_correct;

        self.score.asked += 1;
        if is_correct {
            self.score.correct += 1;
            self.output.say(&Message::AnswerCorrect);
        } else {
            self.output
                .say(&Message::AnswerIncorrect(attempt.reveal.clone()));
        }
        self.history.push(attempt.clone());
        self.set_current_phase(Phase::Scored(attempt));
        Ok(is_correct)
    }

    /// Stops the session on the player's request.
    pub fn end(&mut self) {
        if !self.is_over() {
            self.finish(EndReason::UserQuit);
        }
    }

    fn finish(&mut self, reason: EndReason) {
        if reason == EndReason::NotEnoughData {
            self.output.say(&Message::NotEnoughData);
        }
        self.output.say(&Message::QuizResults(reason, self.score));
        self.set_current_phase(Phase::SessionEnd(reason));
    }

    fn question_index(&self, attempt: &Attempt) -> Result<usize> {
        self.catalog
            .questions()
            .iter()
            .position(|q| q.id == attempt.question_id)
            .ok_or_else(|| anyhow!("Unknown question '{}'", attempt.question_id))
    }

    fn select_question(&mut self) -> Phase {
        if let Some(max_questions) = self.settings.max_questions {
            if self.score.asked >= max_questions {
                return Phase::SessionEnd(EndReason::QuestionLimit);
            }
        }

        let eligible = eligible_pairs(self.store, self.catalog);
        if eligible.is_empty() {
            return Phase::SessionEnd(EndReason::NotEnoughData);
        }
        let remaining: Vec<(PersonId, usize)> = eligible
            .into_iter()
            .filter(|pair| !self.asked.contains(pair))
            .collect();

        let &(person_id, index) = match remaining.choose(&mut self.rng) {
            Some(pair) => pair,
            None => return Phase::SessionEnd(EndReason::Exhausted),
        };
        self.asked.insert((person_id, index));

        let question = &self.catalog.questions()[index];
        let person = match self.store.get(person_id) {
            Some(person) => person,
            None => return Phase::SessionEnd(EndReason::Exhausted),
        };
        let subject = Subject::new(person, self.store);
        let correct_answer = question.correct_answer(&subject).unwrap_or_default();
        let attempt = Attempt {
            person: person_id,
            question_id: question.id.clone(),
            text: question.text(&subject),
            reveal: question.reveal(&subject).unwrap_or_else(|| correct_answer.clone()),
            correct_answer,
            choices: question.choices(&subject, &mut self.rng),
            answer: None,
            is_correct: false,
        };
        Phase::Presenting(attempt)
    }
}
