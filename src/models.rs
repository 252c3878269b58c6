use std::{
    collections::BTreeMap,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// A stored record before reconciliation: whatever object shape the storage
/// layer handed back.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

pub type RecordId = i64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[value(name = "multiple_choice")]
    MultipleChoice,
    Vocabulary,
    Grammar,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::MultipleChoice,
        Category::Vocabulary,
        Category::Grammar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::MultipleChoice => "multiple_choice",
            Category::Vocabulary => "vocabulary",
            Category::Grammar => "grammar",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = color_eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| color_eyre::eyre::eyre!("unknown question category: {s}"))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = color_eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(color_eyre::eyre::eyre!("unknown difficulty: {s}")),
        }
    }
}

/// Publication status of a multiple-choice question. Values other than
/// `active` and `inactive` are kept verbatim. Statuses compare by their
/// string form, so `Other("active")` equals `Active`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    #[default]
    Active,
    Inactive,
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Active => "active",
            Status::Inactive => "inactive",
            Status::Other(s) => s,
        }
    }
}

impl PartialEq for Status {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Status {}

impl Hash for Status {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        match s.as_str() {
            "active" => Status::Active,
            "inactive" => Status::Inactive,
            _ => Status::Other(s),
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub label: String,
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    #[serde(default)]
    pub correct: String,
    #[serde(default)]
    pub incorrect_choices: BTreeMap<String, String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleChoiceQuestion {
    pub question_text: String,
    pub options: Vec<QuestionOption>,
    pub correct_answers: Vec<String>,
    pub explanation: Explanation,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub test_id: String,
    pub status: Status,
}

impl MultipleChoiceQuestion {
    pub fn option(&self, label: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.label == label)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.option(label).is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub word: String,
    pub meaning: String,
    pub example_sentence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_class: Option<String>,
    pub difficulty: Difficulty,
    pub test_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarQuestion {
    pub question_text: String,
    pub correct_answer: String,
    pub alternative_answers: Vec<String>,
    pub explanation: String,
    pub difficulty: Difficulty,
    pub points: u32,
    pub test_id: String,
}

/// A question of any category. The variant is the category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum QuestionRecord {
    MultipleChoice(MultipleChoiceQuestion),
    Vocabulary(VocabularyEntry),
    Grammar(GrammarQuestion),
}

impl QuestionRecord {
    pub fn category(&self) -> Category {
        match self {
            QuestionRecord::MultipleChoice(_) => Category::MultipleChoice,
            QuestionRecord::Vocabulary(_) => Category::Vocabulary,
            QuestionRecord::Grammar(_) => Category::Grammar,
        }
    }

    pub fn test_id(&self) -> &str {
        match self {
            QuestionRecord::MultipleChoice(q) => &q.test_id,
            QuestionRecord::Vocabulary(v) => &v.test_id,
            QuestionRecord::Grammar(g) => &g.test_id,
        }
    }

    /// The record's fields as a plain object, without the category tag.
    pub fn to_raw(&self) -> serde_json::Result<RawRecord> {
        let value = match self {
            QuestionRecord::MultipleChoice(q) => serde_json::to_value(q)?,
            QuestionRecord::Vocabulary(v) => serde_json::to_value(v)?,
            QuestionRecord::Grammar(g) => serde_json::to_value(g)?,
        };
        serde_json::from_value(value)
    }
}

/// A record as the storage layer reports it after create or update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRecord {
    pub id: RecordId,
    pub record: QuestionRecord,
}
