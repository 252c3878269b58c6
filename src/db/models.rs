// Row types for the question tables

use color_eyre::Result;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::models::{
    Category, GrammarQuestion, MultipleChoiceQuestion, QuestionRecord, RawRecord, RecordId,
    SavedRecord, VocabularyEntry,
};

/// A row of one of the question tables.
pub trait StoredRow: DeserializeOwned + Send {
    const CATEGORY: Category;
    const TABLE: &'static str;

    fn id(&self) -> RecordId;

    /// The row as a plain object, JSON columns decoded.
    fn into_raw(self) -> Result<RawRecord>;

    fn into_saved(self) -> Result<SavedRecord> {
        let id = self.id();
        let raw = Value::Object(self.into_raw()?);
        let record = match Self::CATEGORY {
            Category::MultipleChoice => {
                QuestionRecord::MultipleChoice(serde_json::from_value::<MultipleChoiceQuestion>(raw)?)
            }
            Category::Vocabulary => {
                QuestionRecord::Vocabulary(serde_json::from_value::<VocabularyEntry>(raw)?)
            }
            Category::Grammar => {
                QuestionRecord::Grammar(serde_json::from_value::<GrammarQuestion>(raw)?)
            }
        };
        Ok(SavedRecord { id, record })
    }
}

#[derive(Deserialize)]
pub struct MultipleChoiceRow {
    pub id: i64,
    pub test_id: String,
    pub question_text: String,
    pub options: String,
    pub correct_answers: String,
    pub explanation: String,
    pub difficulty: String,
    pub tags: String,
    pub status: String,
}

impl StoredRow for MultipleChoiceRow {
    const CATEGORY: Category = Category::MultipleChoice;
    const TABLE: &'static str = "multiple_choice_questions";

    fn id(&self) -> RecordId {
        self.id
    }

    fn into_raw(self) -> Result<RawRecord> {
        let mut raw = RawRecord::new();
        raw.insert("id".into(), self.id.into());
        raw.insert("test_id".into(), self.test_id.into());
        raw.insert("question_text".into(), self.question_text.into());
        raw.insert("options".into(), serde_json::from_str(&self.options)?);
        raw.insert("correct_answers".into(), serde_json::from_str(&self.correct_answers)?);
        raw.insert("explanation".into(), serde_json::from_str(&self.explanation)?);
        raw.insert("difficulty".into(), self.difficulty.into());
        raw.insert("tags".into(), serde_json::from_str(&self.tags)?);
        raw.insert("status".into(), self.status.into());
        Ok(raw)
    }
}

#[derive(Deserialize)]
pub struct VocabularyRow {
    pub id: i64,
    pub test_id: String,
    pub word: String,
    pub meaning: String,
    pub example_sentence: String,
    pub word_class: Option<String>,
    pub difficulty: String,
}

impl StoredRow for VocabularyRow {
    const CATEGORY: Category = Category::Vocabulary;
    const TABLE: &'static str = "vocabulary_entries";

    fn id(&self) -> RecordId {
        self.id
    }

    fn into_raw(self) -> Result<RawRecord> {
        let mut raw = RawRecord::new();
        raw.insert("id".into(), self.id.into());
        raw.insert("test_id".into(), self.test_id.into());
        raw.insert("word".into(), self.word.into());
        raw.insert("meaning".into(), self.meaning.into());
        raw.insert("example_sentence".into(), self.example_sentence.into());
        if let Some(word_class) = self.word_class {
            raw.insert("word_class".into(), word_class.into());
        }
        raw.insert("difficulty".into(), self.difficulty.into());
        Ok(raw)
    }
}

#[derive(Deserialize)]
pub struct GrammarRow {
    pub id: i64,
    pub test_id: String,
    pub question_text: String,
    pub correct_answer: String,
    pub alternative_answers: String,
    pub explanation: String,
    pub difficulty: String,
    pub points: i64,
}

impl StoredRow for GrammarRow {
    const CATEGORY: Category = Category::Grammar;
    const TABLE: &'static str = "grammar_questions";

    fn id(&self) -> RecordId {
        self.id
    }

    fn into_raw(self) -> Result<RawRecord> {
        let mut raw = RawRecord::new();
        raw.insert("id".into(), self.id.into());
        raw.insert("test_id".into(), self.test_id.into());
        raw.insert("question_text".into(), self.question_text.into());
        raw.insert("correct_answer".into(), self.correct_answer.into());
        raw.insert(
            "alternative_answers".into(),
            serde_json::from_str(&self.alternative_answers)?,
        );
        raw.insert("explanation".into(), self.explanation.into());
        raw.insert("difficulty".into(), self.difficulty.into());
        raw.insert("points".into(), self.points.into());
        Ok(raw)
    }
}
