//! Health and version indicator of one outpost.
//!
//! A [`HealthWidget`] polls `health(pk)` on its own task and publishes every
//! [`HealthStatus`] on a channel. It stops when cancelled or dropped. The table
//! controller never reads what it produces.

use std::fmt::{Display, Formatter};
use std::time::Duration;

use log::{debug, warn};
use outposts_states::ApiError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use ustr::Ustr;

use crate::{OutpostHealth, OutpostsClient};

/// Identifies which outpost a health cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HealthKey(pub Ustr);

impl Display for HealthKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Loading,
    /// The outpost has never checked in.
    Unavailable,
    Reported(Vec<OutpostHealth>),
    Failed(ApiError),
}

impl HealthStatus {
    pub fn from_result(result: Result<Vec<OutpostHealth>, ApiError>) -> Self {
        match result {
            Ok(reports) if reports.is_empty() => Self::Unavailable,
            Ok(reports) => Self::Reported(reports),
            Err(err) => Self::Failed(err),
        }
    }

    /// Display lines, two per reported instance.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Loading => vec!["Loading...".to_owned()],
            Self::Unavailable => vec!["Not available".to_owned()],
            Self::Reported(reports) => reports.iter().flat_map(report_lines).collect(),
            Self::Failed(err) => vec![format!("Failed to fetch health: {err}")],
        }
    }
}

fn report_lines(report: &OutpostHealth) -> [String; 2] {
    let version = if report.version_outdated {
        format!("{}, should be {}", report.version, report.version_should)
    } else {
        format!("Version: {}", report.version)
    };
    [format!("Last seen: {}", report.last_seen.to_rfc3339()), version]
}

/// Fetches health once.
pub async fn check_health<C: OutpostsClient>(client: &C, key: HealthKey) -> HealthStatus {
    HealthStatus::from_result(client.health(key.0).await)
}

/// Background poller for one outpost's health.
#[derive(Debug)]
pub struct HealthWidget {
    key: HealthKey,
    updates: flume::Receiver<HealthStatus>,
    cancel_token: CancellationToken,
    task: JoinHandle<()>,
}

impl HealthWidget {
    /// Starts polling immediately, then every `interval`. Must be called inside a tokio runtime.
    pub fn spawn<C: OutpostsClient>(client: C, key: HealthKey, interval: Duration) -> Self {
        let (tx, updates) = flume::unbounded();
        let cancel_token = CancellationToken::new();
        let task = tokio::spawn(poll(client, key, interval, tx, cancel_token.clone()));
        Self {
            key,
            updates,
            cancel_token,
            task,
        }
    }

    pub fn key(&self) -> HealthKey {
        self.key
    }

    /// Every published status, oldest first.
    pub fn updates(&self) -> &flume::Receiver<HealthStatus> {
        &self.updates
    }

    /// Drains pending updates and returns the newest, if any.
    pub fn latest(&self) -> Option<HealthStatus> {
        self.updates.try_iter().last()
    }

    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for HealthWidget {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn poll<C: OutpostsClient>(
    client: C,
    key: HealthKey,
    interval: Duration,
    tx: flume::Sender<HealthStatus>,
    cancel_token: CancellationToken,
) {
    if tx.send(HealthStatus::Loading).is_err() {
        return;
    }
    loop {
        let status = tokio::select! {
            biased;
            () = cancel_token.cancelled() => break,
            status = check_health(&client, key) => status,
        };
        if let HealthStatus::Failed(err) = &status {
            warn!("Health check of outpost {key} failed: {err}");
        }
        if tx.send(status).is_err() {
            break;
        }
        tokio::select! {
            biased;
            () = cancel_token.cancelled() => break,
            () = tokio::time::sleep(interval) => {}
        }
    }
    debug!("Stopped health polling of outpost {key}");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_utils::{Call, MemoryOutposts, health};

    #[test]
    fn formats_reports() {
        let current = HealthStatus::Reported(vec![health("2021.3.1", "2021.3.1")]);
        assert_eq!(
            current.lines(),
            vec![
                "Last seen: 2021-03-01T12:00:00+00:00".to_owned(),
                "Version: 2021.3.1".to_owned(),
            ]
        );

        let outdated = HealthStatus::Reported(vec![health("2021.2.1", "2021.3.1")]);
        assert_eq!(outdated.lines()[1], "2021.2.1, should be 2021.3.1");
    }

    #[test]
    fn empty_reports_are_unavailable() {
        assert_eq!(HealthStatus::from_result(Ok(Vec::new())), HealthStatus::Unavailable);
        assert_eq!(HealthStatus::Unavailable.lines(), vec!["Not available".to_owned()]);
    }

    #[test]
    fn failure_keeps_typed_error() {
        let status = HealthStatus::from_result(Err(ApiError::NotFound));
        assert_eq!(status, HealthStatus::Failed(ApiError::NotFound));
        assert_eq!(status.lines(), vec!["Failed to fetch health: not found".to_owned()]);
    }

    #[tokio::test(start_paused = true)]
    async fn polls_until_cancelled() {
        let client = Arc::new(MemoryOutposts::default());
        client.set_health(vec![health("2021.3.1", "2021.3.1")]);
        let key = HealthKey(Ustr::from("a"));
        let widget = HealthWidget::spawn(client.clone(), key, Duration::from_secs(30));

        assert_eq!(widget.updates().recv_async().await, Ok(HealthStatus::Loading));
        assert!(matches!(
            widget.updates().recv_async().await,
            Ok(HealthStatus::Reported(_))
        ));

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(matches!(widget.latest(), Some(HealthStatus::Reported(_))));
        let polls = client
            .calls()
            .iter()
            .filter(|c| **c == Call::Health(key.0))
            .count();
        assert_eq!(polls, 2);

        widget.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(widget.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn failure_is_published_and_polling_continues() {
        let client = Arc::new(MemoryOutposts::default());
        client.fail_next(ApiError::network("connection refused"));
        let widget = HealthWidget::spawn(
            client.clone(),
            HealthKey(Ustr::from("a")),
            Duration::from_secs(5),
        );

        assert_eq!(widget.updates().recv_async().await, Ok(HealthStatus::Loading));
        assert!(matches!(
            widget.updates().recv_async().await,
            Ok(HealthStatus::Failed(ApiError::Network(_)))
        ));
        assert_eq!(
            widget.updates().recv_async().await,
            Ok(HealthStatus::Unavailable)
        );
    }
}
