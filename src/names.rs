// Option labels, in positional order
pub const OPTION_LABELS: [&str; 5] = ["A", "B", "C", "D", "E"];

// Record field names, shared by the editing surface and the error map
pub const QUESTION_TEXT_FIELD: &str = "question_text";
pub const OPTIONS_FIELD: &str = "options";
pub const CORRECT_ANSWERS_FIELD: &str = "correct_answers";
pub const EXPLANATION_FIELD: &str = "explanation";
pub const DIFFICULTY_FIELD: &str = "difficulty";
pub const TAGS_FIELD: &str = "tags";
pub const STATUS_FIELD: &str = "status";
pub const TEST_ID_FIELD: &str = "test_id";
pub const WORD_FIELD: &str = "word";
pub const MEANING_FIELD: &str = "meaning";
pub const EXAMPLE_SENTENCE_FIELD: &str = "example_sentence";
pub const WORD_CLASS_FIELD: &str = "word_class";
pub const CORRECT_ANSWER_FIELD: &str = "correct_answer";
pub const ALTERNATIVE_ANSWERS_FIELD: &str = "alternative_answers";
pub const POINTS_FIELD: &str = "points";
pub const CATEGORY_FIELD: &str = "category";

// Keys inside a multiple-choice explanation
pub const EXPLANATION_CORRECT_KEY: &str = "correct";
pub const EXPLANATION_INCORRECT_KEY: &str = "incorrect_choices";

// Record defaults
pub const DEFAULT_GRAMMAR_POINTS: u32 = 1;
pub const DEFAULT_ALTERNATIVE_ANSWER_SLOTS: usize = 3;

// Session defaults
pub const DEFAULT_SUBMIT_TIMEOUT_SECS: u64 = 30;

// Banner messages
pub const SAVE_FAILED_MESSAGE: &str = "could not save question";
pub const LOAD_FAILED_MESSAGE: &str = "could not load question";
pub const REOPEN_FAILED_MESSAGE: &str = "could not reopen question";

pub fn is_option_label(label: &str) -> bool {
    OPTION_LABELS.contains(&label)
}
