use crate::{
    models::{
        Category, Difficulty, Explanation, GrammarQuestion, MultipleChoiceQuestion,
        QuestionOption, QuestionRecord, RawRecord, Status, VocabularyEntry,
    },
    names,
};

use super::{reconcile, submit, validate, validate::FieldErrors};

/// Per-category behavior, looked up once from the category tag.
pub struct CategoryEntry {
    pub category: Category,
    pub defaults: fn(&str) -> QuestionRecord,
    pub reconcile: fn(&str, &RawRecord) -> QuestionRecord,
    pub validate: fn(&QuestionRecord) -> FieldErrors,
    pub serialize: fn(QuestionRecord) -> QuestionRecord,
}

static MULTIPLE_CHOICE: CategoryEntry = CategoryEntry {
    category: Category::MultipleChoice,
    defaults: multiple_choice_record,
    reconcile: reconcile::multiple_choice,
    validate: validate::multiple_choice,
    serialize: submit::serialize_multiple_choice,
};

static VOCABULARY: CategoryEntry = CategoryEntry {
    category: Category::Vocabulary,
    defaults: vocabulary_record,
    reconcile: reconcile::vocabulary,
    validate: validate::vocabulary,
    serialize: submit::pass_through,
};

static GRAMMAR: CategoryEntry = CategoryEntry {
    category: Category::Grammar,
    defaults: grammar_record,
    reconcile: reconcile::grammar,
    validate: validate::grammar,
    serialize: submit::pass_through,
};

pub fn entry(category: Category) -> &'static CategoryEntry {
    match category {
        Category::MultipleChoice => &MULTIPLE_CHOICE,
        Category::Vocabulary => &VOCABULARY,
        Category::Grammar => &GRAMMAR,
    }
}

/// A fresh record with empty values for `category`, owned by `test_id`.
pub fn defaults_for(category: Category, test_id: &str) -> QuestionRecord {
    (entry(category).defaults)(test_id)
}

pub(crate) fn multiple_choice_defaults(test_id: &str) -> MultipleChoiceQuestion {
    MultipleChoiceQuestion {
        question_text: String::new(),
        options: names::OPTION_LABELS
            .iter()
            .map(|label| QuestionOption {
                label: label.to_string(),
                text: String::new(),
            })
            .collect(),
        correct_answers: Vec::new(),
        explanation: Explanation::default(),
        difficulty: Difficulty::default(),
        tags: Vec::new(),
        test_id: test_id.to_string(),
        status: Status::default(),
    }
}

pub(crate) fn vocabulary_defaults(test_id: &str) -> VocabularyEntry {
    VocabularyEntry {
        word: String::new(),
        meaning: String::new(),
        example_sentence: String::new(),
        word_class: None,
        difficulty: Difficulty::default(),
        test_id: test_id.to_string(),
    }
}

pub(crate) fn grammar_defaults(test_id: &str) -> GrammarQuestion {
    GrammarQuestion {
        question_text: String::new(),
        correct_answer: String::new(),
        alternative_answers: vec![String::new(); names::DEFAULT_ALTERNATIVE_ANSWER_SLOTS],
        explanation: String::new(),
        difficulty: Difficulty::default(),
        points: names::DEFAULT_GRAMMAR_POINTS,
        test_id: test_id.to_string(),
    }
}

fn multiple_choice_record(test_id: &str) -> QuestionRecord {
    QuestionRecord::MultipleChoice(multiple_choice_defaults(test_id))
}

fn vocabulary_record(test_id: &str) -> QuestionRecord {
    QuestionRecord::Vocabulary(vocabulary_defaults(test_id))
}

fn grammar_record(test_id: &str) -> QuestionRecord {
    QuestionRecord::Grammar(grammar_defaults(test_id))
}
