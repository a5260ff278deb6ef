//! Operation poller
//!
//! Drives the start / status / perform protocol of a workflow-as-code
//! operation. Status queries back off exponentially and stop at a deadline.

use std::time::Duration;
use tether_client::ControlPlane;
use tether_core::domain::operation::{Operation, OperationStatus};
use tether_core::dto::operation::RepositoryStrategy;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{InitError, print_messages};
use crate::config::{Config, MAX_POLL_DELAY};

/// Timing policy for status queries
#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    /// Delay before the first re-query
    pub initial_delay: Duration,
    /// Upper bound of the delay between two queries
    pub max_delay: Duration,
    /// Total time allowed for the operation to reach a terminal status
    pub timeout: Duration,
}

impl From<&Config> for PollSettings {
    fn from(config: &Config) -> Self {
        Self {
            initial_delay: config.poll_interval,
            max_delay: MAX_POLL_DELAY.max(config.poll_interval),
            timeout: config.poll_timeout,
        }
    }
}

pub struct OperationPoller<'a> {
    client: &'a dyn ControlPlane,
    project_key: &'a str,
    settings: PollSettings,
}

impl<'a> OperationPoller<'a> {
    pub fn new(client: &'a dyn ControlPlane, project_key: &'a str, settings: PollSettings) -> Self {
        Self {
            client,
            project_key,
            settings,
        }
    }

    /// Runs an operation to completion and performs it
    ///
    /// # Returns
    /// The messages returned by the perform call
    pub async fn run(&self, repo_url: &str) -> Result<(Uuid, Vec<String>), InitError> {
        let operation = self.start(repo_url).await?;
        let operation = self.wait(operation).await?;
        let messages = self.perform(operation.uuid).await?;
        Ok((operation.uuid, messages))
    }

    pub async fn start(&self, repo_url: &str) -> Result<Operation, InitError> {
        let operation = self
            .client
            .start_workflow_as_code(self.project_key, repo_url, &RepositoryStrategy::default())
            .await
            .map_err(|e| InitError::OperationPollFailed {
                operation: repo_url.to_string(),
                reason: e.to_string(),
            })?;

        info!("Operation {} started ({})", operation.uuid, operation.status);
        Ok(operation)
    }

    /// Re-queries the operation until it reaches a terminal status
    ///
    /// Fails on transport error, on a status regression, on deadline, and when
    /// the operation ends in error (after printing its diagnostics).
    pub async fn wait(&self, mut operation: Operation) -> Result<Operation, InitError> {
        let uuid = operation.uuid;
        let deadline = Instant::now()
            .checked_add(self.settings.timeout)
            .ok_or_else(|| InitError::OperationPollFailed {
                operation: uuid.to_string(),
                reason: format!("poll timeout {:?} is out of range", self.settings.timeout),
            })?;
        let mut delay = self.settings.initial_delay;
        let mut queries = 0u32;

        while !operation.status.is_terminal() {
            let now = Instant::now();
            if now >= deadline {
                return Err(InitError::OperationPollFailed {
                    operation: uuid.to_string(),
                    reason: format!(
                        "still {} after {:?} ({} status queries)",
                        operation.status, self.settings.timeout, queries
                    ),
                });
            }

            if !delay.is_zero() {
                tokio::time::sleep(delay.min(deadline - now)).await;
            }

            let next = self
                .client
                .get_operation(self.project_key, uuid)
                .await
                .map_err(|e| InitError::OperationPollFailed {
                    operation: uuid.to_string(),
                    reason: e.to_string(),
                })?;
            queries += 1;

            if !operation.status.can_transition_to(next.status) {
                return Err(InitError::OperationPollFailed {
                    operation: uuid.to_string(),
                    reason: format!(
                        "status went back from {} to {}",
                        operation.status, next.status
                    ),
                });
            }

            debug!("Operation {} is {} (query {})", uuid, next.status, queries);
            operation = next;
            delay = (delay * 2).min(self.settings.max_delay);
        }

        if operation.status == OperationStatus::Error {
            let diagnostics = operation.diagnostics();
            print_messages(&diagnostics);
            warn!("Operation {} ended in error", uuid);
            return Err(InitError::OperationPollFailed {
                operation: uuid.to_string(),
                reason: diagnostics
                    .last()
                    .cloned()
                    .unwrap_or_else(|| "operation ended in error".to_string()),
            });
        }

        Ok(operation)
    }

    /// Asks the server to materialize a completed operation
    ///
    /// Server messages are printed whether or not the call succeeds.
    pub async fn perform(&self, uuid: Uuid) -> Result<Vec<String>, InitError> {
        match self.client.perform_operation(self.project_key, uuid).await {
            Ok(messages) => {
                print_messages(&messages);
                Ok(messages)
            }
            Err(e) => {
                print_messages(e.messages());
                Err(InitError::PushRejected { source: e })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeControlPlane, operation};
    use OperationStatus::*;

    fn settings() -> PollSettings {
        PollSettings {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
            timeout: Duration::from_secs(30),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_until_done_then_performs() {
        let uuid = Uuid::new_v4();
        let fake = FakeControlPlane {
            perform_messages: vec!["Workflow demo created".into(), "Application demo created".into()],
            ..Default::default()
        }
        .with_operations([
            operation(uuid, Pending),
            operation(uuid, Processing),
            operation(uuid, Done),
        ]);

        let poller = OperationPoller::new(&fake, "PRJ", settings());
        let (done, messages) = poller.run("git@github.com:org/demo.git").await.unwrap();

        assert_eq!(done, uuid);
        assert_eq!(messages.len(), 2);
        let calls = fake.calls();
        assert_eq!(calls.len(), 4);
        assert!(calls[0].starts_with("start_workflow_as_code"));
        assert!(calls[3].starts_with("perform_operation"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_error_fails_without_perform() {
        let uuid = Uuid::new_v4();
        let mut failed = operation(uuid, Error);
        failed.error = Some("unable to clone repository".into());
        let fake = FakeControlPlane::default().with_operations([operation(uuid, Pending), failed]);

        let poller = OperationPoller::new(&fake, "PRJ", settings());
        let err = poller.run("git@github.com:org/demo.git").await.unwrap_err();

        assert!(
            matches!(err, InitError::OperationPollFailed { ref reason, .. } if reason == "unable to clone repository")
        );
        assert!(!fake.calls().iter().any(|c| c.starts_with("perform_operation")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_stops_polling() {
        let uuid = Uuid::new_v4();
        let fake = FakeControlPlane {
            fail_status_query: true,
            ..Default::default()
        }
        .with_operations([operation(uuid, Pending)]);

        let poller = OperationPoller::new(&fake, "PRJ", settings());
        let err = poller.wait(operation(uuid, Pending)).await.unwrap_err();

        assert!(matches!(err, InitError::OperationPollFailed { .. }));
        assert_eq!(fake.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stuck_operation_hits_deadline() {
        let uuid = Uuid::new_v4();
        let fake = FakeControlPlane::default().with_operations([operation(uuid, Processing)]);

        let poller = OperationPoller::new(&fake, "PRJ", settings());
        let err = poller.wait(operation(uuid, Pending)).await.unwrap_err();

        match err {
            InitError::OperationPollFailed { reason, .. } => assert!(reason.starts_with("still processing")),
            other => panic!("unexpected error: {other}"),
        }
        // 100ms, 200ms, 400ms, 800ms, then 1s steps until 30s
        assert!(fake.calls().len() < 40);
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_range_timeout_fails_instead_of_panicking() {
        let uuid = Uuid::new_v4();
        let fake = FakeControlPlane::default().with_operations([operation(uuid, Done)]);
        let settings = PollSettings {
            timeout: Duration::from_secs(u64::MAX),
            ..settings()
        };

        let poller = OperationPoller::new(&fake, "PRJ", settings);
        let err = poller.wait(operation(uuid, Pending)).await.unwrap_err();

        assert!(matches!(err, InitError::OperationPollFailed { ref reason, .. } if reason.contains("out of range")));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_regression_is_rejected() {
        let uuid = Uuid::new_v4();
        let fake = FakeControlPlane::default().with_operations([operation(uuid, Pending)]);

        let poller = OperationPoller::new(&fake, "PRJ", settings());
        let err = poller.wait(operation(uuid, Processing)).await.unwrap_err();

        assert!(matches!(err, InitError::OperationPollFailed { ref reason, .. } if reason.contains("went back")));
    }

    #[tokio::test]
    async fn test_failed_perform_is_push_rejected() {
        let fake = FakeControlPlane {
            perform_fails: true,
            perform_messages: vec!["application demo already exists".into()],
            ..Default::default()
        };

        let poller = OperationPoller::new(&fake, "PRJ", settings());
        let err = poller.perform(Uuid::new_v4()).await.unwrap_err();

        match err {
            InitError::PushRejected { source } => assert_eq!(source.messages().len(), 1),
            other => panic!("unexpected error: {other}"),
        }
    }
}
