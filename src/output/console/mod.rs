use crate::output::{Message, QuizOutput};
use crate::quiz::{EndReason, Score};


/// Prints messages on the terminal.
#[derive(Clone, Debug, Default)]
pub struct ConsoleOutput;

impl ConsoleOutput {
    pub fn new() -> Self {
        ConsoleOutput
    }
}

fn verdict(score: &Score) -> &'static str {
    if score.asked > 0 && score.correct == score.asked {
        "🎉 Perfect score! You know your family well!"
    } else if score.correct * 2 >= score.asked {
        "👍 Good job! You know quite a bit about your family!"
    } else {
        "💡 Keep learning about your ancestors!"
    }
}

pub fn interpret_message(message: &Message) -> String {
    use Message::*;
    match message {
        QuizRules => "📜 Starting the Ancestor Quiz!\nAnswer with the number of a choice, or type your answer. Enter `q` to stop.".into(),
        QuestionBegins { number, text, choices } => {
            let mut message = format!("\nQuestion {}: {}", number, text);
            if let Some(choices) = choices {
                for (index, choice) in choices.iter().enumerate() {
                    message += &format!("\n{}. {}", index + 1, choice);
                }
            }
            message
        }
        AnswerCorrect => "✅ Correct!".into(),
        AnswerIncorrect(answer) => format!("❌ Incorrect. The correct answer was: {}", answer),
        NotEnoughData => "⚠️  Not enough data to ask anything yet. Add a few family members with birth dates, places or parents first.".into(),
        QuizResults(reason, score) => {
            let mut message = String::new();
            if *reason == EndReason::Exhausted {
                message += "That was every question we could come up with.\n";
            }
            message += &format!("\n🏁 Final Score: {}/{}", score.correct, score.asked);
            if score.asked > 0 {
                message += &format!("\n{}", verdict(score));
            }
            message
        }
    }
}

impl QuizOutput for ConsoleOutput {
    fn say(&self, message: &Message) {
        println!("{}", interpret_message(message));
    }
}
