use std::future::Future;

use color_eyre::{
    eyre::{eyre, OptionExt},
    Result,
};

use crate::models::{
    Category, Explanation, GrammarQuestion, MultipleChoiceQuestion, QuestionOption,
    QuestionRecord, RawRecord, RecordId, SavedRecord, VocabularyEntry,
};

use super::registry;

/// Whether a session saves a new record or rewrites an existing one.
/// Fixed when the session opens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionMode {
    Create,
    Update { id: RecordId },
}

pub trait MultipleChoiceStore: Send + Sync {
    fn create_multiple_choice(
        &self,
        payload: &MultipleChoiceQuestion,
    ) -> impl Future<Output = Result<SavedRecord>> + Send;

    fn update_multiple_choice(
        &self,
        id: RecordId,
        payload: &MultipleChoiceQuestion,
    ) -> impl Future<Output = Result<SavedRecord>> + Send;
}

pub trait VocabularyStore: Send + Sync {
    fn create_vocabulary(
        &self,
        payload: &VocabularyEntry,
    ) -> impl Future<Output = Result<SavedRecord>> + Send;

    fn update_vocabulary(
        &self,
        id: RecordId,
        payload: &VocabularyEntry,
    ) -> impl Future<Output = Result<SavedRecord>> + Send;
}

/// Grammar writes are authorized with a bearer credential supplied by the
/// caller.
pub trait GrammarStore: Send + Sync {
    fn create_grammar(
        &self,
        payload: &GrammarQuestion,
        bearer: &str,
    ) -> impl Future<Output = Result<SavedRecord>> + Send;

    fn update_grammar(
        &self,
        id: RecordId,
        payload: &GrammarQuestion,
        bearer: &str,
    ) -> impl Future<Output = Result<SavedRecord>> + Send;
}

/// Loads a stored record, as stored, for reconciliation.
pub trait RecordSource: Send + Sync {
    fn fetch_raw(
        &self,
        category: Category,
        id: RecordId,
    ) -> impl Future<Output = Result<RawRecord>> + Send;
}

/// Everything a session needs from storage.
pub trait QuestionStore: MultipleChoiceStore + VocabularyStore + GrammarStore + RecordSource {}

impl<T> QuestionStore for T where
    T: MultipleChoiceStore + VocabularyStore + GrammarStore + RecordSource
{
}

/// Converts a validated working copy into the payload its collaborator
/// expects.
pub fn serialize(record: QuestionRecord) -> QuestionRecord {
    (registry::entry(record.category()).serialize)(record)
}

pub(crate) fn serialize_multiple_choice(record: QuestionRecord) -> QuestionRecord {
    let QuestionRecord::MultipleChoice(q) = record else {
        return record;
    };

    let options: Vec<QuestionOption> = q
        .options
        .into_iter()
        .filter(|o| !o.text.trim().is_empty())
        .map(|o| QuestionOption {
            label: o.label,
            text: o.text.trim().to_string(),
        })
        .collect();

    // Explanations of dropped options go with them.
    let mut incorrect_choices = q.explanation.incorrect_choices;
    incorrect_choices.retain(|label, _| options.iter().any(|o| o.label == *label));

    QuestionRecord::MultipleChoice(MultipleChoiceQuestion {
        options,
        explanation: Explanation {
            correct: q.explanation.correct,
            incorrect_choices,
        },
        ..q
    })
}

// Vocabulary and grammar payloads are the record itself; grammar's
// alternative answers keep their blank slots.
pub(crate) fn pass_through(record: QuestionRecord) -> QuestionRecord {
    record
}

/// Serializes `record` and hands it to the collaborator for its category.
/// The returned record is whatever the collaborator reports as saved.
pub async fn submit<S: QuestionStore>(
    store: &S,
    category: Category,
    mode: SessionMode,
    record: QuestionRecord,
    bearer: Option<&str>,
) -> Result<SavedRecord> {
    if record.category() != category {
        return Err(eyre!(
            "cannot submit a {} record as {category}",
            record.category()
        ));
    }

    match (serialize(record), mode) {
        (QuestionRecord::MultipleChoice(q), SessionMode::Create) => {
            store.create_multiple_choice(&q).await
        }
        (QuestionRecord::MultipleChoice(q), SessionMode::Update { id }) => {
            store.update_multiple_choice(id, &q).await
        }
        (QuestionRecord::Vocabulary(v), SessionMode::Create) => store.create_vocabulary(&v).await,
        (QuestionRecord::Vocabulary(v), SessionMode::Update { id }) => {
            store.update_vocabulary(id, &v).await
        }
        (QuestionRecord::Grammar(g), mode) => {
            let bearer = bearer.ok_or_eyre("grammar questions require a bearer credential")?;
            match mode {
                SessionMode::Create => store.create_grammar(&g, bearer).await,
                SessionMode::Update { id } => store.update_grammar(id, &g, bearer).await,
            }
        }
    }
}
