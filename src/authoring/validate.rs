use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    models::{Category, QuestionRecord},
    names,
};

use super::registry;

pub const QUESTION_TEXT_REQUIRED: &str = "Question text is required.";
pub const INSUFFICIENT_OPTIONS: &str = "Insufficient options: at least two options need text.";
pub const CORRECT_ANSWER_REQUIRED: &str = "Select at least one correct answer.";
pub const INVALID_CORRECT_ANSWER: &str = "Invalid correct answer";
pub const WORD_REQUIRED: &str = "Word is required.";
pub const MEANING_REQUIRED: &str = "Meaning is required.";
pub const GRAMMAR_ANSWER_REQUIRED: &str = "Correct answer is required.";

/// Validation messages keyed by record field name. Empty means valid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Checks `record` against the rules of `category`.
pub fn validate(category: Category, record: &QuestionRecord) -> FieldErrors {
    if record.category() != category {
        let mut errors = FieldErrors::default();
        errors.insert(
            names::CATEGORY_FIELD,
            format!("expected a {category} question, got {}", record.category()),
        );
        return errors;
    }
    (registry::entry(category).validate)(record)
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

pub(crate) fn multiple_choice(record: &QuestionRecord) -> FieldErrors {
    let mut errors = FieldErrors::default();
    let QuestionRecord::MultipleChoice(q) = record else {
        return validate(Category::MultipleChoice, record);
    };

    if is_blank(&q.question_text) {
        errors.insert(names::QUESTION_TEXT_FIELD, QUESTION_TEXT_REQUIRED);
    }

    let filled: Vec<&str> = q
        .options
        .iter()
        .filter(|o| !is_blank(&o.text))
        .map(|o| o.label.as_str())
        .collect();
    if filled.len() < 2 {
        errors.insert(names::OPTIONS_FIELD, INSUFFICIENT_OPTIONS);
    }

    if q.correct_answers.is_empty() {
        errors.insert(names::CORRECT_ANSWERS_FIELD, CORRECT_ANSWER_REQUIRED);
    } else {
        let invalid: Vec<&str> = q
            .correct_answers
            .iter()
            .map(String::as_str)
            .filter(|label| !filled.contains(label))
            .collect();
        if !invalid.is_empty() {
            errors.insert(
                names::CORRECT_ANSWERS_FIELD,
                format!("{INVALID_CORRECT_ANSWER}: {}", invalid.join(", ")),
            );
        }
    }

    errors
}

pub(crate) fn vocabulary(record: &QuestionRecord) -> FieldErrors {
    let mut errors = FieldErrors::default();
    let QuestionRecord::Vocabulary(v) = record else {
        return validate(Category::Vocabulary, record);
    };

    if is_blank(&v.word) {
        errors.insert(names::WORD_FIELD, WORD_REQUIRED);
    }
    if is_blank(&v.meaning) {
        errors.insert(names::MEANING_FIELD, MEANING_REQUIRED);
    }
    errors
}

pub(crate) fn grammar(record: &QuestionRecord) -> FieldErrors {
    let mut errors = FieldErrors::default();
    let QuestionRecord::Grammar(g) = record else {
        return validate(Category::Grammar, record);
    };

    if is_blank(&g.question_text) {
        errors.insert(names::QUESTION_TEXT_FIELD, QUESTION_TEXT_REQUIRED);
    }
    if is_blank(&g.correct_answer) {
        errors.insert(names::CORRECT_ANSWER_FIELD, GRAMMAR_ANSWER_REQUIRED);
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        authoring::defaults_for,
        models::{MultipleChoiceQuestion, QuestionOption},
    };

    fn mc_with(texts: &[&str], correct: &[&str]) -> QuestionRecord {
        let QuestionRecord::MultipleChoice(mut q) = defaults_for(Category::MultipleChoice, "T1")
        else {
            panic!("expected multiple choice");
        };
        q.question_text = "Which is a fruit?".to_string();
        for (option, text) in q.options.iter_mut().zip(texts) {
            option.text = text.to_string();
        }
        q.correct_answers = correct.iter().map(|l| l.to_string()).collect();
        QuestionRecord::MultipleChoice(q)
    }

    #[test]
    fn valid_multiple_choice_has_no_errors() {
        let errors = validate(Category::MultipleChoice, &mc_with(&["apple", "rock"], &["A"]));
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn single_filled_option_is_insufficient() {
        let errors = validate(Category::MultipleChoice, &mc_with(&["apple", "   "], &["A"]));

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("options"), Some(INSUFFICIENT_OPTIONS));
        assert_eq!(errors.get("word"), None);
        assert_eq!(errors.get("correct_answer"), None);
    }

    #[test]
    fn correct_answer_on_blank_option_is_named() {
        let errors = validate(
            Category::MultipleChoice,
            &mc_with(&["apple", "rock", ""], &["A", "C"]),
        );

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("correct_answers"), Some("Invalid correct answer: C"));
    }

    #[test]
    fn correct_answer_for_missing_option_is_named() {
        let record = QuestionRecord::MultipleChoice(MultipleChoiceQuestion {
            options: vec![
                QuestionOption { label: "A".into(), text: "yes".into() },
                QuestionOption { label: "B".into(), text: "no".into() },
            ],
            correct_answers: vec!["E".into()],
            ..match mc_with(&[], &[]) {
                QuestionRecord::MultipleChoice(q) => q,
                _ => unreachable!(),
            }
        });

        let errors = validate(Category::MultipleChoice, &record);
        assert_eq!(errors.get("correct_answers"), Some("Invalid correct answer: E"));
    }

    #[test]
    fn missing_correct_answer_and_blank_question() {
        let QuestionRecord::MultipleChoice(mut q) = mc_with(&["a", "b"], &[]) else {
            unreachable!()
        };
        q.question_text = "  ".to_string();

        let errors = validate(Category::MultipleChoice, &QuestionRecord::MultipleChoice(q));

        assert_eq!(errors.get("question_text"), Some(QUESTION_TEXT_REQUIRED));
        assert_eq!(errors.get("correct_answers"), Some(CORRECT_ANSWER_REQUIRED));
    }

    #[test]
    fn vocabulary_needs_word_and_meaning() {
        let errors = validate(Category::Vocabulary, &defaults_for(Category::Vocabulary, "T1"));

        assert_eq!(errors.get("word"), Some(WORD_REQUIRED));
        assert_eq!(errors.get("meaning"), Some(MEANING_REQUIRED));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn grammar_passes_with_blank_alternatives() {
        let QuestionRecord::Grammar(mut g) = defaults_for(Category::Grammar, "T2") else {
            unreachable!()
        };
        g.question_text = "I ___ to school.".to_string();
        g.correct_answer = "go".to_string();

        let errors = validate(Category::Grammar, &QuestionRecord::Grammar(g));
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn category_mismatch_is_reported() {
        let errors = validate(Category::Grammar, &defaults_for(Category::Vocabulary, "T1"));
        assert_eq!(
            errors.get("category"),
            Some("expected a grammar question, got vocabulary")
        );
    }
}
