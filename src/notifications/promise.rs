// SPDX-License-Identifier: MPL-2.0
//! Loading → success/error notifications around a fallible future.

use super::manager::{Manager, NotifyOptions};
use super::notification::{Kind, Message, NotificationId};
use super::store::NotificationPatch;
use std::fmt;
use std::future::{Future, IntoFuture};

/// Text shown once the future settles: fixed, or computed from its output.
pub enum Outcome<T> {
    Static(String),
    Computed(Box<dyn FnOnce(&T) -> String + Send>),
}

impl<T> Outcome<T> {
    pub fn computed<F>(render: F) -> Self
    where
        F: FnOnce(&T) -> String + Send + 'static,
    {
        Outcome::Computed(Box::new(render))
    }

    #[must_use]
    pub fn resolve(self, value: &T) -> String {
        match self {
            Outcome::Static(text) => text,
            Outcome::Computed(render) => render(value),
        }
    }
}

impl<T> fmt::Debug for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Outcome::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl<T> From<&str> for Outcome<T> {
    fn from(value: &str) -> Self {
        Outcome::Static(value.to_string())
    }
}

impl<T> From<String> for Outcome<T> {
    fn from(value: String) -> Self {
        Outcome::Static(value)
    }
}

/// Messages for the three stages of [`Manager::promise`].
#[derive(Debug)]
pub struct PromiseMessages<T, E> {
    loading: Message,
    success: Outcome<T>,
    error: Outcome<E>,
    options: NotifyOptions,
}

impl<T, E> PromiseMessages<T, E> {
    pub fn new(
        loading: impl Into<Message>,
        success: impl Into<Outcome<T>>,
        error: impl Into<Outcome<E>>,
    ) -> Self {
        Self {
            loading: loading.into(),
            success: success.into(),
            error: error.into(),
            options: NotifyOptions::default(),
        }
    }

    /// Options for the loading notification (id, position, ...). The
    /// settled notification keeps the same id and position.
    #[must_use]
    pub fn with_options(mut self, options: NotifyOptions) -> Self {
        self.options = options;
        self
    }
}

/// Dismisses the loading notification if the promise is dropped (cancelled,
/// timed out, aborted) before it settles.
struct Pending<'a> {
    manager: &'a Manager,
    id: Option<NotificationId>,
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            tracing::debug!(id = %id, "promise dropped before settling");
            self.manager.dismiss(Some(&id));
        }
    }
}

impl Manager {
    /// Shows a loading notification while `future` runs, then turns it into
    /// a success or error notification with the same id.
    ///
    /// The future's output is returned unchanged, so failures still reach
    /// the caller after being shown. Dropping the returned future before it
    /// completes dismisses the loading notification.
    ///
    /// # Errors
    ///
    /// Returns the future's own error.
    pub async fn promise<F, T, E>(&self, future: F, messages: PromiseMessages<T, E>) -> Result<T, E>
    where
        F: IntoFuture<Output = Result<T, E>>,
    {
        self.promise_with(move || future.into_future(), messages).await
    }

    /// Like [`Manager::promise`], but starts the work only after the loading
    /// notification is shown.
    ///
    /// # Errors
    ///
    /// Returns the future's own error.
    pub async fn promise_with<C, Fut, T, E>(
        &self,
        start: C,
        messages: PromiseMessages<T, E>,
    ) -> Result<T, E>
    where
        C: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let PromiseMessages {
            loading,
            success,
            error,
            options,
        } = messages;
        let mut pending = Pending {
            manager: self,
            id: Some(self.notify(loading, Kind::Loading, options)),
        };

        let result = start().await;
        if let Some(id) = pending.id.take() {
            self.settle(id, &result, success, error);
        }
        result
    }

    fn settle<T, E>(
        &self,
        id: NotificationId,
        result: &Result<T, E>,
        success: Outcome<T>,
        error: Outcome<E>,
    ) {
        let patch = NotificationPatch::new(id);
        let patch = match result {
            Ok(value) => patch.kind(Kind::Success).message(success.resolve(value)),
            Err(failure) => patch.kind(Kind::Error).message(error.resolve(failure)),
        };
        tracing::debug!(id = %patch.id(), ok = result.is_ok(), "promise settled");
        self.update(patch.revive());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Policy;

    #[test]
    fn static_outcome_ignores_value() {
        let outcome: Outcome<u32> = "done".into();
        assert_eq!(outcome.resolve(&7), "done");
    }

    #[test]
    fn computed_outcome_reads_value() {
        let outcome = Outcome::computed(|count: &u32| format!("{count} files"));
        assert_eq!(outcome.resolve(&3), "3 files");
    }

    #[tokio::test]
    async fn loading_is_shown_before_work_starts() {
        let manager = Manager::new(Policy::default()).expect("runtime is running");
        let observer = manager.clone();

        let result: Result<u32, String> = manager
            .promise_with(
                move || {
                    let snapshot = observer.snapshot();
                    let kinds: Vec<Kind> = snapshot.iter().map(|n| n.kind()).collect();
                    async move {
                        assert_eq!(kinds, vec![Kind::Loading]);
                        Ok(1)
                    }
                },
                PromiseMessages::new("Working", "Done", "Failed"),
            )
            .await;

        assert_eq!(result, Ok(1));
        let snapshot = manager.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.iter().next().map(|n| n.kind()), Some(Kind::Success));
    }

    #[tokio::test]
    async fn explicit_id_is_kept_through_settlement() {
        let manager = Manager::new(Policy::default()).expect("runtime is running");
        let messages = PromiseMessages::new(
            "Uploading",
            "Uploaded",
            Outcome::computed(|err: &String| format!("Upload failed: {err}")),
        )
        .with_options(NotifyOptions::new().with_id("upload"));

        let result: Result<(), String> = manager
            .promise(async { Err("disk full".to_string()) }, messages)
            .await;

        assert_eq!(result, Err("disk full".to_string()));
        let snapshot = manager.snapshot();
        let upload = snapshot.get(&"upload".into()).expect("same id");
        assert_eq!(upload.kind(), Kind::Error);
        assert_eq!(upload.text(), "Upload failed: disk full");
    }
}
