//! One editing session: opens a working copy, takes edits, submits it once.
//!
//! The session handle is cheap to clone so a host can close it from another
//! task while a submission is pending. The lock is never held across an
//! await; a submission re-checks the state when the collaborator answers
//! and drops the answer if the session was closed meanwhile.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use color_eyre::eyre::eyre;

use crate::{
    models::{Category, QuestionRecord, RawRecord, RecordId, SavedRecord},
    names,
    rejections::{AuthoringError, ResultExt},
};

use super::{
    edit::{self, EditOp, FieldUpdate},
    reconcile::{reconcile, reconcile_record},
    submit::{self, QuestionStore, SessionMode},
    validate::{validate, FieldErrors},
};

/// Session configuration, fixed for the lifetime of the session.
#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub category: Category,
    pub test_id: String,
    /// Upper bound on one collaborator call. `None` waits indefinitely.
    pub submit_timeout: Option<Duration>,
    /// Credential handed to the grammar collaborator.
    pub bearer: Option<String>,
}

impl SessionSettings {
    pub fn new(category: Category, test_id: impl Into<String>) -> Self {
        Self {
            category,
            test_id: test_id.into(),
            submit_timeout: Some(Duration::from_secs(names::DEFAULT_SUBMIT_TIMEOUT_SECS)),
            bearer: None,
        }
    }

    pub fn with_submit_timeout(mut self, submit_timeout: Option<Duration>) -> Self {
        self.submit_timeout = submit_timeout;
        self
    }

    pub fn with_bearer(mut self, bearer: impl Into<String>) -> Self {
        self.bearer = Some(bearer.into());
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Reconciling,
    Editing,
    Submitting,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionState::Idle => "idle",
            SessionState::Reconciling => "reconciling",
            SessionState::Editing => "editing",
            SessionState::Submitting => "submitting",
            SessionState::Closed => "closed",
        })
    }
}

/// The stored record a session edits.
#[derive(Clone, Debug)]
pub enum Existing {
    /// Already loaded by the caller.
    Inline { id: RecordId, record: RawRecord },
    /// Loaded from the store when the session opens.
    Fetch { id: RecordId },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The collaborator's saved record. The session is closed.
    Saved(SavedRecord),
    /// Validation failed; nothing was sent. The session keeps editing.
    Invalid(FieldErrors),
    /// The session was closed before the collaborator answered.
    Discarded,
}

#[derive(Default)]
struct Inner {
    state: SessionState,
    mode: Option<SessionMode>,
    working: Option<QuestionRecord>,
    errors: FieldErrors,
    banner: Option<String>,
}

impl Inner {
    fn expect(&self, operation: &'static str, state: SessionState) -> Result<(), AuthoringError> {
        if self.state == state {
            Ok(())
        } else {
            Err(AuthoringError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    fn working_mut(&mut self, operation: &'static str) -> Result<&mut QuestionRecord, AuthoringError> {
        let state = self.state;
        self.working
            .as_mut()
            .ok_or(AuthoringError::InvalidState { operation, state })
    }
}

pub struct Session<S> {
    settings: Arc<SessionSettings>,
    store: Arc<S>,
    inner: Arc<Mutex<Inner>>,
}

impl<S> Clone for Session<S> {
    fn clone(&self) -> Self {
        Self {
            settings: Arc::clone(&self.settings),
            store: Arc::clone(&self.store),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: QuestionStore> Session<S> {
    pub fn new(settings: SessionSettings, store: Arc<S>) -> Self {
        Self {
            settings: Arc::new(settings),
            store,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn category(&self) -> Category {
        self.settings.category
    }

    pub fn test_id(&self) -> &str {
        &self.settings.test_id
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    pub fn mode(&self) -> Option<SessionMode> {
        self.lock().mode
    }

    pub fn working_copy(&self) -> Option<QuestionRecord> {
        self.lock().working.clone()
    }

    /// Field errors from the last validation attempt.
    pub fn errors(&self) -> FieldErrors {
        self.lock().errors.clone()
    }

    pub fn banner(&self) -> Option<String> {
        self.lock().banner.clone()
    }

    /// Builds the working copy. With `existing` the session edits that
    /// record, otherwise it creates a new one. A failed load leaves the
    /// session idle so `open` can be retried.
    pub async fn open(&self, existing: Option<Existing>) -> Result<(), AuthoringError> {
        {
            let mut inner = self.lock();
            inner.expect("open", SessionState::Idle)?;
            inner.state = SessionState::Reconciling;
            inner.banner = None;
        }

        let category = self.settings.category;
        let loaded = match existing {
            None => Ok(None),
            Some(Existing::Inline { id, record }) => Ok(Some((id, record))),
            Some(Existing::Fetch { id }) => self
                .store
                .fetch_raw(category, id)
                .await
                .map(|record| Some((id, record)))
                .reject_reconciliation(names::LOAD_FAILED_MESSAGE),
        };

        let mut inner = self.lock();
        if inner.state != SessionState::Reconciling {
            tracing::debug!("session closed while loading, dropping the loaded record");
            return Err(AuthoringError::SessionClosed);
        }

        let (mode, raw) = match loaded {
            Ok(Some((id, raw))) => (SessionMode::Update { id }, Some(raw)),
            Ok(None) => (SessionMode::Create, None),
            Err(e) => {
                inner.state = SessionState::Idle;
                inner.banner = Some(e.to_string());
                return Err(e);
            }
        };

        inner.working = Some(reconcile(category, &self.settings.test_id, raw.as_ref()));
        inner.mode = Some(mode);
        inner.errors = FieldErrors::default();
        inner.state = SessionState::Editing;

        tracing::info!(
            "{category} session opened for test {}: {mode:?}",
            self.settings.test_id
        );
        Ok(())
    }

    /// Reconciles the working copy again. The session's category stays the
    /// one it was opened with; `category_hint` is only logged.
    pub fn reopen(&self, category_hint: Category) -> Result<(), AuthoringError> {
        let mut inner = self.lock();
        inner.expect("reopen", SessionState::Editing)?;

        let category = self.settings.category;
        if category_hint != category {
            tracing::debug!("ignoring category hint {category_hint}, session is {category}");
        }

        let working = inner.working_mut("reopen")?;
        *working = reconcile_record(category, &self.settings.test_id, working)
            .reject_reconciliation(names::REOPEN_FAILED_MESSAGE)?;
        Ok(())
    }

    /// Applies one edit to the working copy. Only allowed while editing.
    pub fn apply(&self, op: EditOp) -> Result<(), AuthoringError> {
        let mut inner = self.lock();
        inner.expect("apply", SessionState::Editing)?;
        edit::apply(inner.working_mut("apply")?, op)
    }

    pub fn set_field(&self, update: FieldUpdate) -> Result<(), AuthoringError> {
        self.apply(EditOp::Set(update))
    }

    pub fn set_option_text(&self, index: usize, text: impl Into<String>) -> Result<(), AuthoringError> {
        self.apply(EditOp::OptionText {
            index,
            text: text.into(),
        })
    }

    pub fn toggle_correct_answer(&self, label: impl Into<String>) -> Result<(), AuthoringError> {
        self.apply(EditOp::ToggleCorrect(label.into()))
    }

    pub fn set_incorrect_explanation(
        &self,
        label: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<(), AuthoringError> {
        self.apply(EditOp::IncorrectExplanation {
            label: label.into(),
            text: text.into(),
        })
    }

    /// Validates and saves the working copy.
    ///
    /// Invalid input returns [`SubmitOutcome::Invalid`] and keeps editing.
    /// A collaborator failure (or timeout) returns a persistence error, sets
    /// the banner and keeps the working copy for a retry. Success closes
    /// the session.
    pub async fn submit(&self) -> Result<SubmitOutcome, AuthoringError> {
        let category = self.settings.category;
        let (record, mode) = {
            let mut inner = self.lock();
            inner.expect("submit", SessionState::Editing)?;
            let record = inner.working_mut("submit")?.clone();
            let mode = inner.mode.unwrap_or(SessionMode::Create);

            let errors = validate(category, &record);
            if !errors.is_empty() {
                tracing::debug!("{category} submission rejected: {} field errors", errors.len());
                inner.errors = errors.clone();
                return Ok(SubmitOutcome::Invalid(errors));
            }

            inner.errors = FieldErrors::default();
            inner.banner = None;
            inner.state = SessionState::Submitting;
            (record, mode)
        };

        let pending = submit::submit(
            self.store.as_ref(),
            category,
            mode,
            record,
            self.settings.bearer.as_deref(),
        );
        let result = match self.settings.submit_timeout {
            Some(limit) => match tokio::time::timeout(limit, pending).await {
                Ok(result) => result,
                Err(_) => Err(eyre!("storage call timed out after {limit:?}")),
            },
            None => pending.await,
        };

        let mut inner = self.lock();
        if inner.state != SessionState::Submitting {
            tracing::debug!("session closed during submission, dropping the result");
            return Ok(SubmitOutcome::Discarded);
        }

        match result.reject_persistence(names::SAVE_FAILED_MESSAGE) {
            Ok(saved) => {
                tracing::info!(
                    "{category} question {} saved for test {}",
                    saved.id,
                    self.settings.test_id
                );
                inner.working = None;
                inner.state = SessionState::Closed;
                Ok(SubmitOutcome::Saved(saved))
            }
            Err(e) => {
                inner.banner = Some(e.to_string());
                inner.state = SessionState::Editing;
                Err(e)
            }
        }
    }

    /// Ends the session and discards the working copy. A submission still
    /// in flight will find the session closed and drop its result.
    pub fn close(&self) {
        let mut inner = self.lock();
        if inner.state == SessionState::Closed {
            return;
        }
        tracing::debug!("closing {} session from {}", self.settings.category, inner.state);
        *inner = Inner {
            state: SessionState::Closed,
            mode: inner.mode,
            ..Inner::default()
        };
    }
}
