pub mod authoring;
pub mod db;
pub mod models;
pub mod names;
pub mod rejections;

pub use authoring::{
    defaults_for, reconcile, submit, validate, EditOp, Existing, FieldErrors, FieldUpdate,
    Session, SessionMode, SessionSettings, SessionState, SubmitOutcome,
};
pub use models::{Category, QuestionRecord, SavedRecord};
pub use rejections::AuthoringError;
