// ABOUTME: Periodic background purge of idle conversations and stale stream tokens
// ABOUTME: Runs on its own interval and stops on an explicit shutdown signal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::LifetimeConfig;
use crate::stores::{ConversationStore, TokenStore};

/// Shortest accepted sweep interval
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// When to sweep and what counts as expired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepSchedule {
    /// Time between sweeps
    pub interval: Duration,
    /// Conversation TTL, measured from the last user message
    pub conversation_ttl: Duration,
    /// Token TTL, measured from issue time
    pub token_ttl: Duration,
}

impl From<&LifetimeConfig> for SweepSchedule {
    fn from(config: &LifetimeConfig) -> Self {
        Self {
            interval: config.purge_interval(),
            conversation_ttl: config.conversation_ttl(),
            token_ttl: config.token_ttl(),
        }
    }
}

/// Handle to the running sweep task
#[derive(Debug)]
pub struct Sweeper {
    shutdown_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl Sweeper {
    /// Spawn the sweep loop. The first sweep runs immediately.
    #[must_use]
    pub fn spawn(
        conversations: ConversationStore,
        tokens: TokenStore,
        schedule: SweepSchedule,
    ) -> Self {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        // tokio::time::interval panics on a zero period
        let period = schedule.interval.max(MIN_SWEEP_INTERVAL);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        sweep_once(&conversations, &tokens, &schedule).await;
                    }
                    _ = shutdown_rx.recv() => {
                        debug!("Sweeper received shutdown signal");
                        break;
                    }
                }
            }
        });

        info!(
            interval_secs = period.as_secs(),
            "Background sweeper started"
        );
        Self {
            shutdown_tx,
            handle,
        }
    }

    /// Signal the loop to stop and wait for it to exit.
    ///
    /// Does not wait for the next tick; a sweep already running finishes first.
    pub async fn shutdown(self) {
        if let Err(e) = self.shutdown_tx.try_send(()) {
            debug!(error = ?e, "Sweeper shutdown signal send failed (task likely finished)");
        }
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Sweeper task ended abnormally");
        }
        info!("Background sweeper stopped");
    }
}

/// Run both purges once
pub async fn sweep_once(
    conversations: &ConversationStore,
    tokens: &TokenStore,
    schedule: &SweepSchedule,
) {
    let removed_conversations = conversations.purge_expired(schedule.conversation_ttl).await;
    let removed_tokens = tokens.purge_expired(schedule.token_ttl);
    if removed_conversations > 0 || removed_tokens > 0 {
        info!(
            conversations = removed_conversations,
            tokens = removed_tokens,
            "Sweep removed expired entries"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(interval_ms: u64, token_ttl: Duration) -> SweepSchedule {
        SweepSchedule {
            interval: Duration::from_millis(interval_ms),
            conversation_ttl: Duration::from_secs(3600),
            token_ttl,
        }
    }

    #[tokio::test]
    async fn test_sweeper_purges_on_tick() {
        let conversations = ConversationStore::new();
        let tokens = TokenStore::new();
        let pending = tokens.issue(1, 1, "soon gone");
        conversations.get_or_create(1, 1).await;

        let sweeper = Sweeper::spawn(
            conversations.clone(),
            tokens.clone(),
            schedule(20, Duration::ZERO),
        );
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(tokens.redeem(&pending.token).is_none());
        assert_eq!(conversations.len().await, 1);

        sweeper.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_does_not_wait_for_next_tick() {
        let sweeper = Sweeper::spawn(
            ConversationStore::new(),
            TokenStore::new(),
            schedule(3_600_000, Duration::from_secs(300)),
        );
        // Let the immediate first tick run
        tokio::time::sleep(Duration::from_millis(20)).await;

        let stopped = tokio::time::timeout(Duration::from_secs(1), sweeper.shutdown()).await;
        assert!(stopped.is_ok());
    }

    #[tokio::test]
    async fn test_zero_interval_is_clamped() {
        let tokens = TokenStore::new();
        let pending = tokens.issue(1, 1, "stale");

        let sweeper = Sweeper::spawn(
            ConversationStore::new(),
            tokens.clone(),
            schedule(0, Duration::ZERO),
        );
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!sweeper.handle.is_finished());
        assert!(tokens.redeem(&pending.token).is_none());

        let stopped = tokio::time::timeout(Duration::from_secs(1), sweeper.shutdown()).await;
        assert!(stopped.is_ok());
    }

    #[test]
    fn test_schedule_from_lifetimes() {
        let schedule = SweepSchedule::from(&LifetimeConfig::default());
        assert_eq!(schedule.interval, Duration::from_secs(30));
        assert_eq!(schedule.token_ttl, Duration::from_secs(300));
        assert_eq!(schedule.conversation_ttl, Duration::from_secs(86_400));
    }
}
