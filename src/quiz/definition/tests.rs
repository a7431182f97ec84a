use super::*;
use std::io::Write;

const TWO_QUESTIONS: &str = "
- id: birth_place
  type: multiple_choice
  field: birth_place
  question: \"Where was {person.name} born?\"
  required_fields: [name, birth_place]

- id: mother_birth_place
  type: free_text
  field: mother.birth_place
  question: \"Where was {get_parent('mother').name} born?\"
  required_fields: [mother]
  image: portraits/mother.png
";

#[test]
fn loads_definitions_in_order() {
    let catalog = Catalog::from_yaml(TWO_QUESTIONS).unwrap();
    let ids: Vec<&str> = catalog.questions().iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, ["birth_place", "mother_birth_place"]);

    let question = catalog.get("mother_birth_place").unwrap();
    assert_eq!(question.tag, "free_text");
    assert!(matches!(question.variant, Variant::FreeText(_)));
    assert_eq!(
        question.definition.field,
        FieldPath {
            role: Role::Parent(crate::family::ParentRole::Mother),
            field: "birth_place".to_owned(),
        }
    );
}

#[test]
fn type_defaults_to_multiple_choice() {
    let catalog = Catalog::from_yaml(
        "
- id: q
  field: birth_place
  question: Where?
  required_fields: [birth_place]
",
    )
    .unwrap();
    assert!(matches!(
        catalog.questions()[0].variant,
        Variant::MultipleChoice(kind::MultipleChoice {
            distractors: kind::DEFAULT_DISTRACTORS,
            choices: None,
        })
    ));
}

#[test]
fn unknown_type_fails_and_names_the_question() {
    let yaml = format!(
        "{}
- id: mystery
  type: unknown_type
  field: name
  question: Who?
  required_fields: [name]
",
        TWO_QUESTIONS
    );
    let error = Catalog::from_yaml(&yaml).unwrap_err();
    assert_eq!(error.question_id(), Some("mystery"));
    match error {
        ConfigurationError::UnknownType { id, tag } => {
            assert_eq!(id, "mystery");
            assert_eq!(tag, "unknown_type");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn missing_template_names_the_question() {
    let error = Catalog::from_yaml(
        "
- id: no_text
  field: name
  required_fields: [name]
",
    )
    .unwrap_err();
    assert!(matches!(error, ConfigurationError::Malformed { .. }));
    assert_eq!(error.question_id(), Some("no_text"));
}

#[test]
fn invalid_definitions_are_rejected() {
    let cases = [
        ("no_required", "field: name\n  question: Who?\n  required_fields: []"),
        ("bad_field", "field: uncle.name\n  question: Who?\n  required_fields: [name]"),
        ("bad_placeholder", "field: name\n  question: Who is {person}?\n  required_fields: [name]"),
        ("no_distractors", "field: name\n  question: Who?\n  required_fields: [name]\n  distractors: 0"),
        ("empty_choices", "field: name\n  question: Who?\n  required_fields: [name]\n  choices: []"),
    ];
    for (id, body) in &cases {
        let yaml = format!("- id: {}\n  {}\n", id, body);
        let error = Catalog::from_yaml(&yaml).unwrap_err();
        assert!(
            matches!(error, ConfigurationError::Invalid { .. }),
            "{}: {}",
            id,
            error
        );
        assert_eq!(error.question_id(), Some(*id));
    }
}

#[test]
fn duplicate_ids_are_rejected() {
    let yaml = format!("{}{}", TWO_QUESTIONS, TWO_QUESTIONS);
    let error = Catalog::from_yaml(&yaml).unwrap_err();
    assert_eq!(error.question_id(), Some("birth_place"));
}

#[test]
fn rejects_documents_that_are_not_lists() {
    let error = Catalog::from_yaml("id: lonely").unwrap_err();
    assert!(matches!(error, ConfigurationError::Syntax(_)));
}

#[test]
fn opens_question_files() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(TWO_QUESTIONS.as_bytes()).unwrap();
    let catalog = Catalog::open(file.path()).unwrap();
    assert_eq!(catalog.len(), 2);

    let missing = file.path().with_extension("missing");
    assert!(matches!(
        Catalog::open(&missing),
        Err(ConfigurationError::Unreadable { .. })
    ));
}

#[test]
fn bundled_questions_load() {
    let catalog = Catalog::bundled().unwrap();
    assert!(!catalog.is_empty());
    for tag in &[
        "multiple_choice",
        "free_text",
        "year",
        "lifespan",
        "older_parent",
        "longest_lived",
    ] {
        assert!(
            catalog.questions().iter().any(|q| q.tag == *tag),
            "no bundled {} question",
            tag
        );
    }
}
