// Question authoring engine: defaults, reconciliation, validation and
// submission for one editing session at a time.

pub mod edit;
pub mod reconcile;
pub mod registry;
pub mod session;
pub mod submit;
pub mod validate;

pub use edit::{EditOp, FieldUpdate};
pub use reconcile::{reconcile, reconcile_record};
pub use registry::{defaults_for, CategoryEntry};
pub use session::{Existing, Session, SessionSettings, SessionState, SubmitOutcome};
pub use submit::{
    serialize, submit, GrammarStore, MultipleChoiceStore, QuestionStore, RecordSource,
    SessionMode, VocabularyStore,
};
pub use validate::{validate, FieldErrors};
