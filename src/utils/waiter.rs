//! Polling waiter for remote actions
//!
//! Backup actions run on the provider side for minutes. The waiter polls
//! at a fixed interval until the action settles or a deadline passes,
//! blocking the whole process; the workload is a sequential batch job.

use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::api::{ActionStatus, ApiError, ApiOperations};

/// Fixed delay between polls
const POLL_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum WaitError {
    #[error("Action {action_id} failed: {message}")]
    ActionFailed { action_id: i64, message: String },

    #[error("Action {action_id} did not finish within {timeout_secs}s")]
    TimedOut { action_id: i64, timeout_secs: u64 },

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Waits for remote actions to finish
pub struct ActionWaiter {
    poll_interval: Duration,
    timeout: Duration,
}

impl ActionWaiter {
    /// Production waiter: 30s polls with the configured timeout
    pub fn new(timeout: Duration) -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
            timeout,
        }
    }

    /// Waiter with a custom poll interval; tests use tiny intervals
    pub fn with_poll_interval(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            timeout,
        }
    }

    /// Block until the action completes. Fails if the action reports an
    /// error or stays pending past the timeout.
    pub fn wait(&self, api: &dyn ApiOperations, action_id: i64) -> Result<(), WaitError> {
        let started = Instant::now();
        info!(
            "Waiting for action {} (timeout {}s)",
            action_id,
            self.timeout.as_secs()
        );

        loop {
            let action = api.get_action(action_id)?;
            match action.status {
                ActionStatus::Completed => {
                    info!(
                        "Action {} completed after {}s",
                        action_id,
                        started.elapsed().as_secs()
                    );
                    return Ok(());
                }
                ActionStatus::Errored => {
                    let message = action
                        .error_message
                        .unwrap_or_else(|| "no error detail reported".to_string());
                    return Err(WaitError::ActionFailed { action_id, message });
                }
                ActionStatus::Pending => {
                    if started.elapsed() > self.timeout {
                        return Err(WaitError::TimedOut {
                            action_id,
                            timeout_secs: self.timeout.as_secs(),
                        });
                    }
                    debug!(
                        "Action {} still pending, next poll in {}s",
                        action_id,
                        self.poll_interval.as_secs()
                    );
                    std::thread::sleep(self.poll_interval);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ops::mock::MockApi;

    fn fast_waiter(timeout_ms: u64) -> ActionWaiter {
        ActionWaiter::with_poll_interval(
            Duration::from_millis(timeout_ms),
            Duration::from_millis(5),
        )
    }

    #[test]
    fn test_wait_returns_once_completed() {
        let mock = MockApi::new().with_action_sequence(&[
            ActionStatus::Pending,
            ActionStatus::Pending,
            ActionStatus::Completed,
        ]);

        fast_waiter(1000).wait(&mock, 42).unwrap();
        assert_eq!(mock.poll_count(), 3);
    }

    #[test]
    fn test_wait_fails_on_errored_action() {
        let mock = MockApi::new().with_errored_action("disk offline");

        let err = fast_waiter(1000).wait(&mock, 42).unwrap_err();
        match err {
            WaitError::ActionFailed { action_id, message } => {
                assert_eq!(action_id, 42);
                assert!(message.contains("disk offline"));
            }
            other => panic!("expected ActionFailed, got {:?}", other),
        }
        assert_eq!(mock.poll_count(), 1);
    }

    #[test]
    fn test_wait_reports_missing_error_detail() {
        let mock = MockApi::new().with_action_sequence(&[ActionStatus::Errored]);

        let err = fast_waiter(1000).wait(&mock, 7).unwrap_err();
        assert!(err.to_string().contains("no error detail reported"));
    }

    #[test]
    fn test_wait_times_out_while_pending() {
        let mock = MockApi::new().with_action_sequence(&[ActionStatus::Pending]);

        let err = fast_waiter(30).wait(&mock, 42).unwrap_err();
        match err {
            WaitError::TimedOut { action_id, .. } => assert_eq!(action_id, 42),
            other => panic!("expected TimedOut, got {:?}", other),
        }
        // Deadline is checked after a poll, so at least two polls happened
        assert!(mock.poll_count() >= 2);
    }

    #[test]
    fn test_wait_propagates_api_errors() {
        let mock = MockApi::new().with_failing_get_action();

        let err = fast_waiter(1000).wait(&mock, 42).unwrap_err();
        assert!(matches!(err, WaitError::Api(_)));
    }
}
