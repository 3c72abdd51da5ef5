//! Timers on the simulated clock
//!
//! Every delayed action in a run (reloads, respawn, blink, banner decay, wave
//! spawn, elapsed-time refresh) is a handle registered here. The registry is
//! owned by `GameState`, so restarting a run is a single `cancel_all()`.

use serde::{Deserialize, Serialize};

/// Handle returned by `schedule`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    /// Give back one shot
    Reload,
    /// Clear the pickup banner
    MessageExpiry,
    /// Take the life after the respawn delay
    RespawnResolve,
    /// Next visibility toggle of the blink animation
    BlinkToggle,
    /// End of the post-respawn immunity window
    ImmunityEnd,
    /// Refresh the elapsed-time display
    ElapsedClock,
    /// Spawn the wave for the current level
    LevelSpawn,
}

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    kind: TimerKind,
    due_ms: u64,
}

#[derive(Debug, Clone, Default)]
pub struct TimerRegistry {
    timers: Vec<Timer>,
    next_id: u64,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, kind: TimerKind, due_ms: u64) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer { id, kind, due_ms });
        id
    }

    /// Returns false if the timer already fired or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Cancel every pending timer of one kind
    pub fn cancel_kind(&mut self, kind: TimerKind) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| t.kind != kind);
        before - self.timers.len()
    }

    /// Cancel everything. Returns how many timers were pending.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.timers.len();
        self.timers.clear();
        count
    }

    /// Remove and return the earliest timer due at or before `now_ms`.
    /// Ties fire in scheduling order.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(TimerId, TimerKind)> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= now_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.id))
            .map(|(i, _)| i)?;
        let timer = self.timers.remove(idx);
        Some((timer.id, timer.kind))
    }

    pub fn pending(&self, kind: TimerKind) -> usize {
        self.timers.iter().filter(|t| t.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_due_in_deadline_order() {
        let mut timers = TimerRegistry::new();
        timers.schedule(TimerKind::Reload, 300);
        timers.schedule(TimerKind::MessageExpiry, 100);
        timers.schedule(TimerKind::LevelSpawn, 100);

        assert_eq!(timers.pop_due(50), None);
        assert_eq!(timers.pop_due(300).map(|(_, k)| k), Some(TimerKind::MessageExpiry));
        assert_eq!(timers.pop_due(300).map(|(_, k)| k), Some(TimerKind::LevelSpawn));
        assert_eq!(timers.pop_due(300).map(|(_, k)| k), Some(TimerKind::Reload));
        assert!(timers.is_empty());
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut timers = TimerRegistry::new();
        let id = timers.schedule(TimerKind::RespawnResolve, 10);
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert_eq!(timers.pop_due(1_000), None);
    }

    #[test]
    fn test_cancel_all_clears_every_kind() {
        let mut timers = TimerRegistry::new();
        for kind in [TimerKind::Reload, TimerKind::Reload, TimerKind::BlinkToggle, TimerKind::ElapsedClock] {
            timers.schedule(kind, 10);
        }
        assert_eq!(timers.pending(TimerKind::Reload), 2);
        assert_eq!(timers.cancel_all(), 4);
        assert_eq!(timers.pop_due(u64::MAX), None);
    }

    #[test]
    fn test_cancel_kind_leaves_others() {
        let mut timers = TimerRegistry::new();
        timers.schedule(TimerKind::MessageExpiry, 10);
        timers.schedule(TimerKind::Reload, 10);
        assert_eq!(timers.cancel_kind(TimerKind::MessageExpiry), 1);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.pending(TimerKind::Reload), 1);
    }
}
