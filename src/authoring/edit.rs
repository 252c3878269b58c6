use serde::Deserialize;

use crate::{
    models::{Difficulty, QuestionOption, QuestionRecord, Status},
    names,
    rejections::AuthoringError,
};

/// A new value for one scalar or list field of the working copy.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldUpdate {
    QuestionText(String),
    Difficulty(Difficulty),
    Tags(Vec<String>),
    Status(Status),
    /// Multiple-choice explanation for the correct answer.
    CorrectExplanation(String),
    Word(String),
    Meaning(String),
    ExampleSentence(String),
    WordClass(Option<String>),
    CorrectAnswer(String),
    AlternativeAnswer { index: usize, text: String },
    /// Grammar explanation.
    Explanation(String),
    Points(u32),
}

impl FieldUpdate {
    pub fn field(&self) -> &'static str {
        match self {
            FieldUpdate::QuestionText(_) => names::QUESTION_TEXT_FIELD,
            FieldUpdate::Difficulty(_) => names::DIFFICULTY_FIELD,
            FieldUpdate::Tags(_) => names::TAGS_FIELD,
            FieldUpdate::Status(_) => names::STATUS_FIELD,
            FieldUpdate::CorrectExplanation(_) | FieldUpdate::Explanation(_) => {
                names::EXPLANATION_FIELD
            }
            FieldUpdate::Word(_) => names::WORD_FIELD,
            FieldUpdate::Meaning(_) => names::MEANING_FIELD,
            FieldUpdate::ExampleSentence(_) => names::EXAMPLE_SENTENCE_FIELD,
            FieldUpdate::WordClass(_) => names::WORD_CLASS_FIELD,
            FieldUpdate::CorrectAnswer(_) => names::CORRECT_ANSWER_FIELD,
            FieldUpdate::AlternativeAnswer { .. } => names::ALTERNATIVE_ANSWERS_FIELD,
            FieldUpdate::Points(_) => names::POINTS_FIELD,
        }
    }
}

/// One mutation of the working copy.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditOp {
    Set(FieldUpdate),
    OptionText { index: usize, text: String },
    ToggleCorrect(String),
    IncorrectExplanation { label: String, text: String },
    AppendOption,
    RemoveLastOption,
}

impl EditOp {
    pub fn field(&self) -> &'static str {
        match self {
            EditOp::Set(update) => update.field(),
            EditOp::OptionText { .. } | EditOp::AppendOption | EditOp::RemoveLastOption => {
                names::OPTIONS_FIELD
            }
            EditOp::ToggleCorrect(_) => names::CORRECT_ANSWERS_FIELD,
            EditOp::IncorrectExplanation { .. } => names::EXPLANATION_FIELD,
        }
    }
}

/// Applies `op` to `record`. On error the record is left as it was.
pub(crate) fn apply(record: &mut QuestionRecord, op: EditOp) -> Result<(), AuthoringError> {
    let category = record.category();
    let not_applicable =
        |field: &'static str| AuthoringError::FieldNotApplicable { field, category };

    match (record, op) {
        (QuestionRecord::MultipleChoice(q), EditOp::Set(update)) => match update {
            FieldUpdate::QuestionText(text) => q.question_text = text,
            FieldUpdate::Difficulty(d) => q.difficulty = d,
            FieldUpdate::Tags(tags) => q.tags = tags,
            FieldUpdate::Status(status) => q.status = status,
            FieldUpdate::CorrectExplanation(text) => q.explanation.correct = text,
            other => return Err(not_applicable(other.field())),
        },
        (QuestionRecord::MultipleChoice(q), EditOp::OptionText { index, text }) => {
            let option = q
                .options
                .get_mut(index)
                .ok_or(AuthoringError::IndexOutOfRange {
                    field: names::OPTIONS_FIELD,
                    index,
                })?;
            option.text = text;
        }
        (QuestionRecord::MultipleChoice(q), EditOp::ToggleCorrect(label)) => {
            if !q.has_label(&label) {
                return Err(AuthoringError::UnknownLabel(label));
            }
            if let Some(pos) = q.correct_answers.iter().position(|l| *l == label) {
                q.correct_answers.remove(pos);
            } else {
                q.explanation.incorrect_choices.remove(&label);
                q.correct_answers.push(label);
            }
        }
        (QuestionRecord::MultipleChoice(q), EditOp::IncorrectExplanation { label, text }) => {
            if !q.has_label(&label) {
                return Err(AuthoringError::UnknownLabel(label));
            }
            if q.correct_answers.contains(&label) {
                return Err(AuthoringError::CorrectLabel(label));
            }
            if text.is_empty() {
                q.explanation.incorrect_choices.remove(&label);
            } else {
                q.explanation.incorrect_choices.insert(label, text);
            }
        }
        (QuestionRecord::MultipleChoice(q), EditOp::AppendOption) => {
            // Saved questions may reload with gaps, e.g. only B and C.
            let label = names::OPTION_LABELS
                .iter()
                .find(|l| !q.has_label(l))
                .ok_or(AuthoringError::OptionLimit(names::OPTION_LABELS.len()))?;
            q.options.push(QuestionOption {
                label: label.to_string(),
                text: String::new(),
            });
        }
        (QuestionRecord::MultipleChoice(q), EditOp::RemoveLastOption) => {
            if let Some(removed) = q.options.pop() {
                q.correct_answers.retain(|l| *l != removed.label);
                q.explanation.incorrect_choices.remove(&removed.label);
            }
        }

        (QuestionRecord::Vocabulary(v), EditOp::Set(update)) => match update {
            FieldUpdate::Word(text) => v.word = text,
            FieldUpdate::Meaning(text) => v.meaning = text,
            FieldUpdate::ExampleSentence(text) => v.example_sentence = text,
            FieldUpdate::WordClass(word_class) => v.word_class = word_class,
            FieldUpdate::Difficulty(d) => v.difficulty = d,
            other => return Err(not_applicable(other.field())),
        },

        (QuestionRecord::Grammar(g), EditOp::Set(update)) => match update {
            FieldUpdate::QuestionText(text) => g.question_text = text,
            FieldUpdate::CorrectAnswer(text) => g.correct_answer = text,
            FieldUpdate::AlternativeAnswer { index, text } => {
                let slot = g.alternative_answers.get_mut(index).ok_or(
                    AuthoringError::IndexOutOfRange {
                        field: names::ALTERNATIVE_ANSWERS_FIELD,
                        index,
                    },
                )?;
                *slot = text;
            }
            FieldUpdate::Explanation(text) => g.explanation = text,
            FieldUpdate::Difficulty(d) => g.difficulty = d,
            FieldUpdate::Points(points) => g.points = points,
            other => return Err(not_applicable(other.field())),
        },

        (_, op) => return Err(not_applicable(op.field())),
    }
    Ok(())
}
