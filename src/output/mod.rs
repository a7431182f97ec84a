use crate::quiz::{EndReason, Score};

pub mod console;
#[cfg(test)]
pub mod mock;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Message {
    QuizRules,
    QuestionBegins {
        number: usize,
        text: String,
        choices: Option<Vec<String>>,
    },
    AnswerCorrect,
    AnswerIncorrect(String),
    NotEnoughData,
    QuizResults(EndReason, Score),
}

pub trait QuizOutput {
    fn say(&self, message: &Message);
}
