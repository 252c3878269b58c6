//! Merges a stored record into category defaults.
//!
//! Stored records may predate the current shape: options saved as bare
//! strings, a single correct answer saved as a scalar, an explanation saved
//! as plain text. Reconciliation overlays whatever is present onto the
//! category defaults and repairs those shapes. Its output fed back in comes
//! out unchanged.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    models::{
        Category, Difficulty, Explanation, MultipleChoiceQuestion, QuestionOption,
        QuestionRecord, RawRecord, Status,
    },
    names,
};

use super::registry::{self, grammar_defaults, multiple_choice_defaults, vocabulary_defaults};

/// Builds the working copy for a session. `existing` is the stored record
/// when editing, `None` when creating.
pub fn reconcile(category: Category, test_id: &str, existing: Option<&RawRecord>) -> QuestionRecord {
    let entry = registry::entry(category);
    match existing {
        Some(raw) => (entry.reconcile)(test_id, raw),
        None => (entry.defaults)(test_id),
    }
}

/// Reconciles an already typed record, e.g. the working copy on re-open.
pub fn reconcile_record(
    category: Category,
    test_id: &str,
    record: &QuestionRecord,
) -> serde_json::Result<QuestionRecord> {
    let raw = record.to_raw()?;
    Ok(reconcile(category, test_id, Some(&raw)))
}

pub(crate) fn multiple_choice(test_id: &str, raw: &RawRecord) -> QuestionRecord {
    let mut q = multiple_choice_defaults(test_id);
    warn_foreign_test_id(test_id, raw);

    overlay_string(&mut q.question_text, raw, names::QUESTION_TEXT_FIELD);
    overlay_difficulty(&mut q.difficulty, raw);
    overlay_string_list(&mut q.tags, raw, names::TAGS_FIELD);
    if let Some(value) = present(raw, names::STATUS_FIELD) {
        match value.as_str() {
            Some(s) => q.status = Status::from(s.to_string()),
            None => tracing::warn!("ignoring non-text status: {value}"),
        }
    }

    if let Some(value) = present(raw, names::OPTIONS_FIELD) {
        match value.as_array() {
            Some(items) => q.options = normalize_options(items),
            None => tracing::warn!("ignoring options that are not a list: {value}"),
        }
    }

    overlay_string_list(&mut q.correct_answers, raw, names::CORRECT_ANSWERS_FIELD);
    let answers = std::mem::take(&mut q.correct_answers);
    q.correct_answers = retain_known_labels(&q, answers);

    if let Some(value) = present(raw, names::EXPLANATION_FIELD) {
        q.explanation = normalize_explanation(value);
    }
    let (options, correct) = (&q.options, &q.correct_answers);
    q.explanation
        .incorrect_choices
        .retain(|label, _| options.iter().any(|o| &o.label == label) && !correct.contains(label));

    QuestionRecord::MultipleChoice(q)
}

pub(crate) fn vocabulary(test_id: &str, raw: &RawRecord) -> QuestionRecord {
    let mut v = vocabulary_defaults(test_id);
    warn_foreign_test_id(test_id, raw);

    overlay_string(&mut v.word, raw, names::WORD_FIELD);
    overlay_string(&mut v.meaning, raw, names::MEANING_FIELD);
    overlay_string(&mut v.example_sentence, raw, names::EXAMPLE_SENTENCE_FIELD);
    if present(raw, names::WORD_CLASS_FIELD).is_some() {
        let mut word_class = String::new();
        overlay_string(&mut word_class, raw, names::WORD_CLASS_FIELD);
        v.word_class = Some(word_class);
    }
    overlay_difficulty(&mut v.difficulty, raw);

    QuestionRecord::Vocabulary(v)
}

pub(crate) fn grammar(test_id: &str, raw: &RawRecord) -> QuestionRecord {
    let mut g = grammar_defaults(test_id);
    warn_foreign_test_id(test_id, raw);

    overlay_string(&mut g.question_text, raw, names::QUESTION_TEXT_FIELD);
    overlay_string(&mut g.correct_answer, raw, names::CORRECT_ANSWER_FIELD);
    overlay_string_list(&mut g.alternative_answers, raw, names::ALTERNATIVE_ANSWERS_FIELD);
    overlay_string(&mut g.explanation, raw, names::EXPLANATION_FIELD);
    overlay_difficulty(&mut g.difficulty, raw);
    overlay_points(&mut g.points, raw);

    QuestionRecord::Grammar(g)
}

/// Normalizes stored options to `{label, text}`, keeping a stored label when
/// it is valid and unused, otherwise assigning one by position.
fn normalize_options(items: &[Value]) -> Vec<QuestionOption> {
    if items.len() > names::OPTION_LABELS.len() {
        tracing::warn!(
            "dropping {} options beyond label {}",
            items.len() - names::OPTION_LABELS.len(),
            names::OPTION_LABELS[names::OPTION_LABELS.len() - 1]
        );
    }

    let mut options: Vec<QuestionOption> = Vec::with_capacity(names::OPTION_LABELS.len());
    for (idx, item) in items.iter().take(names::OPTION_LABELS.len()).enumerate() {
        let (label, text) = match item {
            Value::Object(map) => (
                map.get("label").and_then(Value::as_str),
                map.get("text").map(scalar_text).unwrap_or_default(),
            ),
            other => (None, scalar_text(other)),
        };

        let taken = |l: &str| options.iter().any(|o| o.label == l);
        let label = label
            .filter(|l| names::is_option_label(l) && !taken(*l))
            .or_else(|| Some(names::OPTION_LABELS[idx]).filter(|l| !taken(*l)))
            .or_else(|| names::OPTION_LABELS.into_iter().find(|l| !taken(*l)))
            .unwrap_or(names::OPTION_LABELS[idx])
            .to_string();

        options.push(QuestionOption { label, text });
    }
    options
}

fn normalize_explanation(value: &Value) -> Explanation {
    match value {
        Value::Object(map) => {
            let correct = map
                .get(names::EXPLANATION_CORRECT_KEY)
                .map(scalar_text)
                .unwrap_or_default();
            let incorrect_choices = match map.get(names::EXPLANATION_INCORRECT_KEY) {
                Some(Value::Object(choices)) => choices
                    .iter()
                    .filter(|(_, v)| !v.is_null())
                    .map(|(label, v)| (label.clone(), scalar_text(v)))
                    .collect(),
                _ => BTreeMap::new(),
            };
            Explanation {
                correct,
                incorrect_choices,
            }
        }
        Value::String(s) => Explanation {
            correct: s.clone(),
            incorrect_choices: BTreeMap::new(),
        },
        other => {
            tracing::warn!("ignoring malformed explanation: {other}");
            Explanation::default()
        }
    }
}

fn retain_known_labels(q: &MultipleChoiceQuestion, labels: Vec<String>) -> Vec<String> {
    let mut kept: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        if !q.has_label(&label) {
            tracing::warn!("dropping correct answer {label:?}: no such option");
        } else if !kept.contains(&label) {
            kept.push(label);
        }
    }
    kept
}

/// A field counts as present when the key exists and is not `null`.
fn present<'a>(raw: &'a RawRecord, key: &str) -> Option<&'a Value> {
    raw.get(key).filter(|v| !v.is_null())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn overlay_string(target: &mut String, raw: &RawRecord, key: &str) {
    match present(raw, key) {
        Some(Value::Array(_) | Value::Object(_)) => {
            tracing::warn!("ignoring non-scalar value for {key}");
        }
        Some(value) => *target = scalar_text(value),
        None => {}
    }
}

/// Lists accept a bare scalar as a one-element list.
fn overlay_string_list(target: &mut Vec<String>, raw: &RawRecord, key: &str) {
    match present(raw, key) {
        Some(Value::Array(items)) => {
            *target = items
                .iter()
                .filter(|v| !matches!(v, Value::Array(_) | Value::Object(_)))
                .map(scalar_text)
                .collect();
        }
        Some(Value::Object(_)) => tracing::warn!("ignoring object value for {key}"),
        Some(scalar) => *target = vec![scalar_text(scalar)],
        None => {}
    }
}

fn overlay_difficulty(target: &mut Difficulty, raw: &RawRecord) {
    let Some(value) = present(raw, names::DIFFICULTY_FIELD) else {
        return;
    };
    match value.as_str().map(str::parse::<Difficulty>) {
        Some(Ok(difficulty)) => *target = difficulty,
        _ => tracing::warn!("unknown difficulty {value}, keeping {}", target.as_str()),
    }
}

/// Points may arrive as a number or a numeric string.
fn overlay_points(target: &mut u32, raw: &RawRecord) {
    let Some(value) = present(raw, names::POINTS_FIELD) else {
        return;
    };
    let points = match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    match points {
        Some(points) => *target = points,
        None => tracing::warn!("ignoring invalid points value {value}"),
    }
}

fn warn_foreign_test_id(test_id: &str, raw: &RawRecord) {
    if let Some(stored) = present(raw, names::TEST_ID_FIELD) {
        if scalar_text(stored) != test_id {
            tracing::warn!("record belongs to test {stored}, editing it under test {test_id}");
        }
    }
}
