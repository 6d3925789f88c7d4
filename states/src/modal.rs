//! Modal overlays with a submit action.
//!
//! A `Modal` hosts one `ModalAction` and enforces the lifecycle
//! `Closed -> Open -> Submitting -> (Closed | Open with error)`.
//! Only one submission can be in flight per modal; a second submit while
//! `Submitting` is rejected with `ModalError::Busy`.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use log::{debug, warn};
use thiserror::Error;

use crate::ApiError;

/// One kind of overlay: its labels, its form, and what submitting does.
#[async_trait]
pub trait ModalAction: Send + Sync {
    type Form: Clone + Send + Sync;
    type Output: Send;

    /// Title shown in the modal header.
    fn header(&self) -> String;

    /// Label of the button that opens the modal.
    fn trigger_label(&self) -> &'static str;

    /// Label of the confirming button.
    fn submit_label(&self) -> &'static str;

    /// Form contents when the modal opens.
    fn initial_form(&self) -> Self::Form;

    async fn submit(&self, form: Self::Form) -> Result<Self::Output, ApiError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Open {
        error: Option<ApiError>,
    },
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModalError {
    #[error("modal is not open")]
    NotOpen,
    #[error("a submission is already in flight")]
    Busy,
    #[error(transparent)]
    Api(#[from] ApiError),
}

struct Inner<F> {
    state: ModalState,
    form: Option<F>,
}

pub struct Modal<A: ModalAction> {
    action: A,
    inner: Mutex<Inner<A::Form>>,
}

impl<A: ModalAction> std::fmt::Debug for Modal<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Modal")
            .field("header", &self.action.header())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl<A: ModalAction> Modal<A> {
    pub fn new(action: A) -> Self {
        Self {
            action,
            inner: Mutex::new(Inner {
                state: ModalState::Closed,
                form: None,
            }),
        }
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    pub fn state(&self) -> ModalState {
        self.lock().state.clone()
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.lock().state, ModalState::Closed)
    }

    /// Submit control must be disabled while this is true.
    pub fn is_submitting(&self) -> bool {
        matches!(self.lock().state, ModalState::Submitting)
    }

    /// Error from the last failed submission, while the modal stays open.
    pub fn error(&self) -> Option<ApiError> {
        match &self.lock().state {
            ModalState::Open { error } => error.clone(),
            _ => None,
        }
    }

    /// Opens the modal with a fresh form. Reopening an open modal keeps its form.
    pub fn open(&self) {
        let mut inner = self.lock();
        if matches!(inner.state, ModalState::Closed) {
            inner.form = Some(self.action.initial_form());
            inner.state = ModalState::Open { error: None };
            debug!("Opened modal {:?}", self.action.header());
        }
    }

    /// Closes an open modal. Returns `false` while a submission is in flight.
    pub fn close(&self) -> bool {
        let mut inner = self.lock();
        match inner.state {
            ModalState::Submitting => false,
            ModalState::Closed | ModalState::Open { .. } => {
                inner.state = ModalState::Closed;
                inner.form = None;
                true
            }
        }
    }

    /// Current form contents, `None` while closed.
    pub fn form(&self) -> Option<A::Form> {
        self.lock().form.clone()
    }

    /// Edits the form of an open modal.
    pub fn update_form(&self, edit: impl FnOnce(&mut A::Form)) -> Result<(), ModalError> {
        let mut inner = self.lock();
        match inner.state {
            ModalState::Closed => Err(ModalError::NotOpen),
            ModalState::Submitting => Err(ModalError::Busy),
            ModalState::Open { .. } => {
                if let Some(form) = inner.form.as_mut() {
                    edit(form);
                }
                Ok(())
            }
        }
    }

    /// Submits the current form.
    ///
    /// On success the modal closes; on failure it stays open with the error.
    pub async fn submit(&self) -> Result<A::Output, ModalError> {
        let form = {
            let mut inner = self.lock();
            match inner.state {
                ModalState::Closed => return Err(ModalError::NotOpen),
                ModalState::Submitting => return Err(ModalError::Busy),
                ModalState::Open { .. } => {}
            }
            let form = inner
                .form
                .clone()
                .unwrap_or_else(|| self.action.initial_form());
            inner.state = ModalState::Submitting;
            form
        };

        let guard = SubmitGuard { modal: self };
        let result = self.action.submit(form).await;

        let outcome = {
            let mut inner = self.lock();
            match result {
                Ok(output) => {
                    inner.state = ModalState::Closed;
                    inner.form = None;
                    Ok(output)
                }
                Err(err) => {
                    warn!("{} failed: {err}", self.action.header());
                    inner.state = ModalState::Open {
                        error: Some(err.clone()),
                    };
                    Err(ModalError::Api(err))
                }
            }
        };
        drop(guard);
        outcome
    }

    fn lock(&self) -> MutexGuard<'_, Inner<A::Form>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Reopens the modal if a submission future is dropped before it finishes.
struct SubmitGuard<'a, A: ModalAction> {
    modal: &'a Modal<A>,
}

impl<A: ModalAction> Drop for SubmitGuard<'_, A> {
    fn drop(&mut self) {
        let mut inner = self.modal.lock();
        if matches!(inner.state, ModalState::Submitting) {
            inner.state = ModalState::Open { error: None };
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[derive(Default)]
    struct Rename {
        fail_with: Option<ApiError>,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl ModalAction for Rename {
        type Form = String;
        type Output = String;

        fn header(&self) -> String {
            "Rename".to_owned()
        }

        fn trigger_label(&self) -> &'static str {
            "Edit"
        }

        fn submit_label(&self) -> &'static str {
            "Update"
        }

        fn initial_form(&self) -> String {
            "initial".to_owned()
        }

        async fn submit(&self, form: String) -> Result<String, ApiError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(form.to_uppercase()),
            }
        }
    }

    #[tokio::test]
    async fn submit_requires_open_modal() {
        let modal = Modal::new(Rename::default());
        assert_eq!(modal.submit().await, Err(ModalError::NotOpen));
        assert_eq!(modal.update_form(|_| {}), Err(ModalError::NotOpen));
    }

    #[tokio::test]
    async fn successful_submit_closes() {
        let modal = Modal::new(Rename::default());
        modal.open();
        assert_eq!(modal.form().as_deref(), Some("initial"));

        modal.update_form(|f| *f = "edge".to_owned()).unwrap();
        assert_eq!(modal.submit().await, Ok("EDGE".to_owned()));

        assert_eq!(modal.state(), ModalState::Closed);
        assert_eq!(modal.form(), None);
    }

    #[tokio::test]
    async fn failed_submit_stays_open_with_error() {
        let modal = Modal::new(Rename {
            fail_with: Some(ApiError::field("name", "This field is required.")),
            delay: None,
        });
        modal.open();
        modal.update_form(|f| f.clear()).unwrap();

        let err = modal.submit().await.unwrap_err();
        assert!(matches!(err, ModalError::Api(ApiError::Validation { .. })));
        assert!(modal.is_open());
        assert_eq!(
            modal.error().map(|e| e.field_errors("name").to_vec()),
            Some(vec!["This field is required.".to_owned()])
        );
        // the edited form survives the failure
        assert_eq!(modal.form().as_deref(), Some(""));
    }

    #[tokio::test(start_paused = true)]
    async fn second_submit_while_in_flight_is_rejected() {
        let modal = Arc::new(Modal::new(Rename {
            fail_with: None,
            delay: Some(Duration::from_secs(1)),
        }));
        modal.open();

        let (first, second) = tokio::join!(modal.submit(), async {
            tokio::task::yield_now().await;
            assert!(modal.is_submitting());
            assert!(!modal.close());
            modal.submit().await
        });

        assert_eq!(first, Ok("INITIAL".to_owned()));
        assert_eq!(second, Err(ModalError::Busy));
        assert_eq!(modal.state(), ModalState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_submission_reopens() {
        let modal = Modal::new(Rename {
            fail_with: None,
            delay: Some(Duration::from_secs(10)),
        });
        modal.open();

        let timed_out = tokio::time::timeout(Duration::from_millis(10), modal.submit()).await;
        assert!(timed_out.is_err());
        assert_eq!(modal.state(), ModalState::Open { error: None });
    }

    #[test]
    fn reopening_keeps_form() {
        let modal = Modal::new(Rename::default());
        modal.open();
        modal.update_form(|f| f.push('!')).unwrap();
        modal.open();
        assert_eq!(modal.form().as_deref(), Some("initial!"));
        assert!(modal.close());
        modal.open();
        assert_eq!(modal.form().as_deref(), Some("initial"));
    }
}
