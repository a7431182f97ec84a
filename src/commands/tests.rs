use std::path::PathBuf;
use tempfile::TempDir;

use super::*;
use crate::family::Gender;
use crate::output::mock::MockQuizOutput;
use crate::output::Message;
use crate::quiz::Score;

const FAMILY: &str = "\
name,gender,birth_date,death_date,birth_place,death_place,father,mother
John Doe,Male,1920-03-14,1990-11-02,Lyon,Paris,,
Mary Doe,Female,1925-07-30,,Nantes,,,
Jane Doe,Female,1950-01-15,,Paris,,John Doe,Mary Doe
";

const QUESTIONS: &str = "
- id: birth_place
  field: birth_place
  question: Where was {person.name} born?
  required_fields: [birth_place]
";

struct ContextBuilder {
    family: Option<String>,
}

impl ContextBuilder {
    fn new() -> Self {
        ContextBuilder {
            family: Some(FAMILY.to_owned()),
        }
    }

    fn family(mut self, family: &str) -> Self {
        self.family = Some(family.to_owned());
        self
    }

    fn empty(mut self) -> Self {
        self.family = None;
        self
    }

    fn build(self) -> Context {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("family").join("people.csv");
        let store = match &self.family {
            Some(family) => {
                let mut store = PersonStore::from_reader(family.as_bytes()).unwrap();
                store.set_path(path.clone());
                store
            }
            None => PersonStore::open(&path).unwrap(),
        };
        Context {
            _dir: dir,
            path,
            store: Some(store),
            output: MockQuizOutput::new(),
        }
    }
}

struct Context {
    _dir: TempDir,
    path: PathBuf,
    store: Option<PersonStore>,
    output: MockQuizOutput,
}

impl Context {
    /// Runs the shell over `input` and hands it back for inspection.
    fn run<'a>(&mut self, input: &'a str) -> Shell<&'a [u8], Vec<u8>, MockQuizOutput> {
        let mut shell = Shell::new(
            Prompt::new(input.as_bytes(), Vec::new()),
            self.store.take().unwrap(),
            Catalog::from_yaml(QUESTIONS).unwrap(),
            Settings::default(),
            self.output.clone(),
            Some(7),
        );
        shell.run().unwrap();
        shell
    }

    fn saved(&self) -> PersonStore {
        PersonStore::open(&self.path).unwrap()
    }
}

fn transcript(shell: &Shell<&[u8], Vec<u8>, MockQuizOutput>) -> String {
    String::from_utf8(shell.prompt().output().clone()).unwrap()
}

#[test]
fn first_run_adds_the_first_person() {
    let mut ctx = ContextBuilder::new().empty().build();
    let shell = ctx.run("Jane Doe\nF\n1950-01-15\n\nParis\n\nJohn Doe\n\n\nn\n5\n");

    let transcript = transcript(&shell);
    assert!(transcript.contains("Welcome! Your family tree is empty."));
    assert!(transcript.contains("✅ Added John Doe (Male) as a new person."));
    assert!(transcript.contains("✅ Added Jane Doe to the family tree!"));

    let saved = ctx.saved();
    assert_eq!(saved.len(), 2);
    let jane = saved.find_by_name("Jane Doe").unwrap();
    assert_eq!(jane.gender, Gender::Female);
    assert_eq!(jane.field("birth_date").as_deref(), Some("1950-01-15"));
    assert_eq!(jane.father.as_deref(), Some("John Doe"));
    assert_eq!(jane.mother, None);
    assert_eq!(saved.find_by_name("John Doe").unwrap().gender, Gender::Male);
}

#[test]
fn first_run_keeps_adding_until_declined() {
    let mut ctx = ContextBuilder::new().empty().build();
    let shell = ctx.run("John Doe\nM\n\n\n\n\n\n\n\ny\nMary Doe\nF\n\n\n\n\n\n\nJohn Doe\nno\n5\n");

    assert_eq!(
        transcript(&shell)
            .matches("Would you like to add another family member?")
            .count(),
        2
    );
    let saved = ctx.saved();
    assert_eq!(saved.len(), 2);
    let mary = saved.find_by_name("Mary Doe").unwrap();
    assert_eq!(mary.field("spouse").as_deref(), Some("John Doe"));
}

#[test]
fn add_reprompts_on_invalid_input() {
    let mut ctx = ContextBuilder::new().build();
    let shell = ctx.run("2\n\njane doe\nPaul Doe\nunknown\nmale\n1952-02-30\n1952-06-01\n\n\n\n\n\n\n5\n");

    let transcript = transcript(&shell);
    assert!(transcript.contains("⚠️  name is required"));
    assert!(transcript.contains("⚠️  there is already a person named 'jane doe'"));
    assert!(transcript.contains("⚠️  'unknown' is not a gender"));
    assert!(transcript.contains("⚠️  '1952-02-30' is not a valid date"));

    let paul = shell.store().find_by_name("Paul Doe").unwrap();
    assert_eq!(paul.gender, Gender::Male);
    assert_eq!(paul.field("birth_date").as_deref(), Some("1952-06-01"));
    assert_eq!(ctx.saved().len(), 4);
}

#[test]
fn add_links_spouses() {
    let mut ctx = ContextBuilder::new().build();
    let shell = ctx.run("2\nRose Roe\nFemale\n\n\n\n\n\n\nNobody Known\nJohn Doe\n5\n");

    assert!(transcript(&shell).contains("⚠️  nobody is named 'Nobody Known', add them first"));
    let saved = ctx.saved();
    let rose = saved.find_by_name("Rose Roe").unwrap();
    let john = saved.find_by_name("John Doe").unwrap();
    assert_eq!(rose.field("spouse").as_deref(), Some("John Doe"));
    assert_eq!(john.field("spouse").as_deref(), Some("Rose Roe"));
}

#[test]
fn edit_keeps_and_clears_values() {
    let mut ctx = ContextBuilder::new().build();
    let shell = ctx.run("3\n3\n\n\n1950-13-01\n1951-02-03\n\n-\n\n\nAnne Roe\n\n5\n");

    let transcript = transcript(&shell);
    assert!(transcript.contains("Birth Date (format: YYYY-MM-DD, e.g., 1980-05-15) [1950-01-15]: "));
    assert!(transcript.contains("⚠️  '1950-13-01' is not a valid date"));
    assert!(transcript.contains("✅ Added Anne Roe (Female) as a new person."));
    assert!(transcript.contains("✅ Updated Jane Doe's information!"));

    let saved = ctx.saved();
    assert_eq!(saved.len(), 4);
    let jane = saved.find_by_name("Jane Doe").unwrap();
    assert_eq!(jane.field("birth_date").as_deref(), Some("1951-02-03"));
    assert_eq!(jane.birth_place, None);
    assert_eq!(jane.father.as_deref(), Some("John Doe"));
    assert_eq!(jane.mother.as_deref(), Some("Anne Roe"));
}

#[test]
fn failed_edit_changes_nothing() {
    let mut ctx = ContextBuilder::new().build();
    let shell = ctx.run("3\n3\nMary Doe\n\n\n\n\n\n\nAnne Roe\n5\n");

    let transcript = transcript(&shell);
    assert!(transcript.contains("⚠️  there is already a person named 'Mary Doe'"));
    assert!(!transcript.contains("Anne Roe ("));
    assert!(!transcript.contains("Updated"));

    let store = shell.store();
    let names: Vec<&str> = store.people().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["John Doe", "Mary Doe", "Jane Doe"]);
    assert_eq!(
        store.find_by_name("Jane Doe").unwrap().mother.as_deref(),
        Some("Mary Doe")
    );
    assert!(!ctx.path.exists());
}

#[test]
fn edit_clears_spouse_on_both_sides() {
    let mut ctx = ContextBuilder::new()
        .family("name,gender,spouse\nJohn Doe,Male,Mary Doe\nMary Doe,Female,John Doe\n")
        .build();
    let shell = ctx.run("3\n1\n\n\n\n\n\n\n\n\n-\n5\n");

    let transcript = transcript(&shell);
    assert!(transcript.contains("Spouse [Mary Doe]: "));
    assert!(transcript.contains("John Doe and Mary Doe are no longer married."));
    let saved = ctx.saved();
    assert_eq!(saved.find_by_name("John Doe").unwrap().field("spouse"), None);
    assert_eq!(saved.find_by_name("Mary Doe").unwrap().field("spouse"), None);
}

#[test]
fn lists_people_with_relations() {
    let mut ctx = ContextBuilder::new().build();
    let shell = ctx.run("4\n5\n");

    let transcript = transcript(&shell);
    assert!(transcript.contains("1. John Doe (Male)\n   Born: 1920-03-14 in Lyon\n   Died: 1990-11-02 in Paris\n   Children: Jane Doe"));
    assert!(transcript.contains("3. Jane Doe (Female)\n   Born: 1950-01-15 in Paris\n   Age: "));
    assert!(transcript.contains("   Parents: John Doe & Mary Doe\n"));
    assert!(!transcript.contains("Spouse:"));
}

#[test]
fn menu_reprompts_on_invalid_option() {
    let mut ctx = ContextBuilder::new().build();
    let shell = ctx.run("9\nabc\n5\n");

    let transcript = transcript(&shell);
    assert_eq!(
        transcript
            .matches("⚠️  please enter a number between 1 and 5")
            .count(),
        2
    );
    assert!(transcript.ends_with("Goodbye! 👋\n"));
}

#[test]
fn quiz_stops_on_q() {
    let mut ctx = ContextBuilder::new().build();
    ctx.run("1\nq\n5\n");

    let messages = ctx.output.flush();
    assert_eq!(messages[0], Message::QuizRules);
    assert!(matches!(messages[1], Message::QuestionBegins { number: 1, .. }));
    assert_eq!(
        messages.last(),
        Some(&Message::QuizResults(EndReason::UserQuit, Score::default()))
    );
}

#[test]
fn quiz_reports_invalid_answers() {
    let mut ctx = ContextBuilder::new().build();
    let shell = ctx.run("1\n42\nq\n5\n");

    assert!(transcript(&shell).contains("⚠️  please enter a number between 1 and 3"));
    assert!(ctx
        .output
        .contains_message(&Message::QuizResults(EndReason::UserQuit, Score::default())));
}

#[test]
fn quiz_without_data_offers_to_add_someone() {
    let mut ctx = ContextBuilder::new()
        .family("name,gender\nJohn Doe,Male\n")
        .build();
    let shell = ctx.run("1\ny\nMary Doe\nFemale\n\n\n\n\n\n\n\n5\n");

    assert!(ctx.output.contains_message(&Message::NotEnoughData));
    assert_eq!(shell.store().len(), 2);
    assert_eq!(ctx.saved().len(), 2);
}

#[test]
fn stops_when_input_ends() {
    let mut ctx = ContextBuilder::new().build();
    let shell = ctx.run("2\nPaul");
    assert!(transcript(&shell).ends_with("Goodbye! 👋\n"));
    assert!(shell.store().find_by_name("Paul").is_none());
    assert!(!ctx.path.exists());
}
