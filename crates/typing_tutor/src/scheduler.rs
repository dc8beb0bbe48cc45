//! Cancellable single-shot timers.

use std::collections::HashMap;
use std::time::Duration;

use strum::Display;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, trace};
use typing_tutor_core::ShakeTicket;

/// Independent timer lanes. Each slot holds at most one pending timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum TimerSlot {
    /// Clears the shake after a mistake.
    ShakeClear,
    /// Assigns the next word after a completed one.
    NextWord,
    /// Hides the level-change notice.
    LevelNotice,
    /// Speaks the new tier label.
    LevelSpeech,
    /// Cheers after the victory fanfare.
    VictoryCheer,
}

/// A fired timer, with the ticket the session checks for staleness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timer {
    /// Shake may clear if the ticket is still current.
    ShakeClear(ShakeTicket),
    /// Time for the word after `word_serial`.
    NextWord {
        /// Serial of the word that was completed.
        word_serial: u64,
    },
    /// Hide the notice raised for `notice_serial`.
    HideNotice {
        /// Serial of the notice to hide.
        notice_serial: u64,
    },
    /// Speak `label`, the tier reached at `notice_serial`.
    SpeakLevel {
        /// Serial of the tier change.
        notice_serial: u64,
        /// Tier label to speak.
        label: String,
    },
    /// Victory cheer for game `game_serial`.
    Cheer {
        /// Serial of the won game.
        game_serial: u64,
    },
}

impl Timer {
    /// Slot this timer occupies.
    pub fn slot(&self) -> TimerSlot {
        match self {
            Self::ShakeClear(_) => TimerSlot::ShakeClear,
            Self::NextWord { .. } => TimerSlot::NextWord,
            Self::HideNotice { .. } => TimerSlot::LevelNotice,
            Self::SpeakLevel { .. } => TimerSlot::LevelSpeech,
            Self::Cheer { .. } => TimerSlot::VictoryCheer,
        }
    }
}

/// Runs timers as tokio tasks and delivers them on a channel.
///
/// Scheduling into an occupied slot aborts the earlier task. Dropping the
/// scheduler aborts everything still pending.
#[derive(Debug)]
pub struct Scheduler {
    tx: mpsc::UnboundedSender<Timer>,
    pending: HashMap<TimerSlot, JoinHandle<()>>,
}

impl Scheduler {
    /// Creates a scheduler and the receiver its timers fire on.
    #[instrument]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Timer>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                pending: HashMap::new(),
            },
            rx,
        )
    }

    /// Fires `timer` after `delay`, replacing whatever its slot held.
    ///
    /// Must be called inside a tokio runtime.
    #[instrument(skip(self), fields(slot = %timer.slot()))]
    pub fn schedule(&mut self, delay: Duration, timer: Timer) {
        let slot = timer.slot();
        self.cancel(slot);

        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            trace!(?timer, "Timer fired");
            // Receiver gone means the loop is shutting down.
            let _ = tx.send(timer);
        });
        self.pending.insert(slot, handle);
        debug!(?delay, "Timer scheduled");
    }

    /// Aborts the timer in `slot`, if any.
    #[instrument(skip(self))]
    pub fn cancel(&mut self, slot: TimerSlot) {
        if let Some(handle) = self.pending.remove(&slot) {
            handle.abort();
            debug!("Timer cancelled");
        }
    }

    /// Aborts every pending timer.
    #[instrument(skip(self))]
    pub fn cancel_all(&mut self) {
        let count = self.pending.len();
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
        debug!(count, "All timers cancelled");
    }

    /// Whether `slot` holds a timer that has not fired yet.
    pub fn is_pending(&self, slot: TimerSlot) -> bool {
        self.pending
            .get(&slot)
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires_after_delay() {
        let (mut scheduler, mut rx) = Scheduler::new();
        scheduler.schedule(Duration::from_millis(1000), Timer::NextWord { word_serial: 1 });

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.recv().await, Some(Timer::NextWord { word_serial: 1 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rescheduling_slot_replaces_timer() {
        let (mut scheduler, mut rx) = Scheduler::new();
        scheduler.schedule(Duration::from_millis(300), Timer::HideNotice { notice_serial: 1 });
        scheduler.schedule(Duration::from_millis(300), Timer::HideNotice { notice_serial: 2 });

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(rx.recv().await, Some(Timer::HideNotice { notice_serial: 2 }));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_silences_timers() {
        let (mut scheduler, mut rx) = Scheduler::new();
        scheduler.schedule(Duration::from_millis(100), Timer::NextWord { word_serial: 3 });
        scheduler.schedule(Duration::from_millis(100), Timer::Cheer { game_serial: 1 });
        assert!(scheduler.is_pending(TimerSlot::NextWord));

        scheduler.cancel_all();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
        assert!(!scheduler.is_pending(TimerSlot::NextWord));
    }
}
