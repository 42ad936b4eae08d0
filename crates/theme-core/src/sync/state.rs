//! Cooldown state for change-triggered syncs
//!
//! Writing a section fires the same watcher that triggered the write. The
//! engine therefore ignores targeted triggers until a short window after
//! each targeted sync has passed.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Observable phase of the sync state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    Idle,
    Syncing,
    Cooldown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Syncing,
    Cooldown { until: Instant },
}

/// Cooldown gate owned by a single engine instance.
#[derive(Debug, Clone)]
pub struct SyncState {
    phase: Phase,
    cooldown: Duration,
}

impl SyncState {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            phase: Phase::Idle,
            cooldown,
        }
    }

    /// The phase as seen at `now`; an expired cooldown reads as idle.
    pub fn phase(&self, now: Instant) -> SyncPhase {
        match self.phase {
            Phase::Idle => SyncPhase::Idle,
            Phase::Syncing => SyncPhase::Syncing,
            Phase::Cooldown { until } if now < until => SyncPhase::Cooldown,
            Phase::Cooldown { .. } => SyncPhase::Idle,
        }
    }

    /// Whether a trigger arriving at `now` must be ignored.
    pub fn is_throttled(&self, now: Instant) -> bool {
        self.phase(now) != SyncPhase::Idle
    }

    /// Enter `Syncing` unless throttled. Returns `false` if the trigger is ignored.
    pub fn try_begin(&mut self, now: Instant) -> bool {
        if self.is_throttled(now) {
            return false;
        }
        self.phase = Phase::Syncing;
        true
    }

    /// Leave `Syncing` and start the cooldown window at `now`.
    pub fn finish(&mut self, now: Instant) {
        self.phase = Phase::Cooldown {
            until: now + self.cooldown,
        };
    }
}
