use super::*;
use crate::family::Gender;
use crate::quiz::definition::Catalog;

fn question(yaml: &str) -> Question {
    Catalog::from_yaml(yaml).unwrap().questions()[0].clone()
}

fn family(csv: &str) -> PersonStore {
    PersonStore::from_reader(csv.as_bytes()).unwrap()
}

const DOE_FAMILY: &str = "\
name,gender,birth_date,death_date,birth_place,death_place,father,mother
John Doe,Male,1920-03-14,1990-11-02,Lyon,,,
Jane Doe,Female,1950-01-15,,Paris,,John Doe,
";

#[test]
fn normalize_folds_case_and_whitespace() {
    assert_eq!(normalize("John Doe"), "john doe");
    assert_eq!(normalize("  john   doe "), "john doe");
    assert_eq!(normalize("JOHN\tDOE"), "john doe");
    assert_eq!(normalize("Zoë Dupré"), "zoe dupre");
}

#[test]
fn parses_field_paths() {
    assert_eq!("birth_place".parse::<FieldPath>(), Ok(FieldPath::person("birth_place")));
    assert_eq!("person.name".parse::<FieldPath>(), Ok(FieldPath::person("name")));
    assert_eq!(
        "mother.birth_date".parse::<FieldPath>(),
        Ok(FieldPath::parent(ParentRole::Mother, "birth_date"))
    );
    assert!("uncle.name".parse::<FieldPath>().is_err());
    assert!("father.".parse::<FieldPath>().is_err());
    assert!("Birth Place".parse::<FieldPath>().is_err());
    assert_eq!(FieldPath::parent(ParentRole::Father, "name").to_string(), "father.name");
}

#[test]
fn template_lists_references() {
    let template =
        Template::parse("Was {person.name} born where {get_parent(\"father\").name} was?").unwrap();
    assert_eq!(
        template.references(),
        [
            FieldPath::person("name"),
            FieldPath::parent(ParentRole::Father, "name")
        ]
    );
    assert!(Template::parse("Who is {person}?").is_err());
    assert!(Template::parse("Who is {get_parent('uncle').name}?").is_err());
    assert!(Template::parse("   ").is_err());
}

#[test]
fn renders_person_and_parent_fields() {
    let store = family(DOE_FAMILY);
    let jane = store.find_by_name("Jane Doe").unwrap();
    let template =
        Template::parse("Where was {get_parent('father').name}, father of {person.name}, born?")
            .unwrap();
    assert_eq!(
        template.render(&Subject::new(jane, &store)),
        "Where was John Doe, father of Jane Doe, born?"
    );
}

#[test]
fn renders_placeholder_for_unknown_parent() {
    let store = family(DOE_FAMILY);
    let john = store.find_by_name("John Doe").unwrap();
    let template = Template::parse("{get_parent('mother').name} from {get_parent('mother').birth_place}!").unwrap();
    assert_eq!(template.render(&Subject::new(john, &store)), "Unknown Mother from !");
}

#[test]
fn answer_field_is_always_required() {
    let question = question(
        "
- id: q
  field: birth_place
  question: Where was {person.name} born?
  required_fields: [name]
",
    );
    assert_eq!(
        question.definition.required_fields,
        [FieldPath::person("name"), FieldPath::person("birth_place")]
    );
}

#[test]
fn eligibility_requires_every_field() {
    let question = question(
        "
- id: q
  type: free_text
  field: birth_place
  question: Where was {person.name} born?
  required_fields: [birth_date, birth_place, death_place]
",
    );
    let fields = [
        ("birth_date", "1900-01-01"),
        ("birth_place", "Lyon"),
        ("death_place", "Paris"),
    ];
    for mask in 0..(1 << fields.len()) {
        let mut person = Person::new("John Doe", Gender::Male);
        for (bit, (field, value)) in fields.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                person.set_field(field, value).unwrap();
            }
        }
        let mut store = PersonStore::new();
        let id = store.add(person).unwrap();
        let subject = Subject::new(store.get(id).unwrap(), &store);
        assert_eq!(
            question.is_valid_for(&subject),
            mask == 0b111,
            "fields present: {:03b}",
            mask
        );
    }
}

#[test]
fn eligibility_checks_parent_fields() {
    let question = question(
        "
- id: q
  type: free_text
  field: father.birth_place
  question: Where was {get_parent('father').name} born?
  required_fields: [father]
",
    );
    let store = family(
        "\
name,gender,birth_date,death_date,birth_place,death_place,father,mother
Orphan,Male,,,,,,
Ghost Child,Female,,,,,Nobody,
Plain Father,Male,,,,,,
Child A,Female,,,,,Plain Father,
Child B,Female,,,,,John Doe,
John Doe,Male,,,Lyon,,,
",
    );
    let eligible = |name: &str| {
        let person = store.find_by_name(name).unwrap();
        question.is_valid_for(&Subject::new(person, &store))
    };
    assert!(!eligible("Orphan"));
    assert!(!eligible("Ghost Child"));
    assert!(!eligible("Child A"));
    assert!(eligible("Child B"));
}

#[test]
fn template_parent_reference_makes_parent_required() {
    let question = question(
        "
- id: q
  type: free_text
  field: birth_place
  question: Where was the child of {get_parent('mother').name} born?
  required_fields: [birth_place]
",
    );
    let store = family(DOE_FAMILY);
    let jane = store.find_by_name("Jane Doe").unwrap();
    assert!(!question.is_valid_for(&Subject::new(jane, &store)));
}

#[test]
fn father_question_only_for_people_with_a_father() {
    let question = question(
        "
- id: father_name
  field: father.name
  question: Who is {person.name}'s father?
  required_fields: [father]
",
    );
    let store = family(DOE_FAMILY);
    let john = store.find_by_name("John Doe").unwrap();
    let jane = store.find_by_name("Jane Doe").unwrap();

    assert!(!question.is_valid_for(&Subject::new(john, &store)));
    assert!(question.is_valid_for(&Subject::new(jane, &store)));
    assert_eq!(
        Subject::new(jane, &store).get_parent(ParentRole::Father),
        Some(john)
    );
    assert_eq!(
        question.correct_answer(&Subject::new(jane, &store)).as_deref(),
        Some("John Doe")
    );
}
