//! Countdown timer.
//!
//! `Countdown` is the deterministic state machine; `CountdownTimer` drives it once
//! per second on the tokio runtime and reports through a channel. The timer knows
//! nothing about quiz sessions: whoever owns it decides what expiry means.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Interval between two ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Notification emitted by a running countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimerEvent {
    /// One second elapsed; `remaining` is still above zero.
    Tick { remaining: u64 },
    /// The countdown reached zero by itself. Never sent for a manual stop.
    Expired,
}

/// Result of starting a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStatus {
    Running,
    /// Started with zero seconds: nothing to count, no tick loop.
    Expired,
}

//
// ─── STATE MACHINE ─────────────────────────────────────────────────────────────
//

/// Countdown state. `generation` changes on every lifecycle transition so a
/// driver can tell whether its ticks still apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining: u64,
    running: bool,
    generation: u64,
}

impl Countdown {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Nothing left to count down.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        !self.running && self.remaining == 0
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Restart from `seconds`, discarding any countdown in progress.
    pub fn start(&mut self, seconds: u64) -> TimerStatus {
        self.bump();
        self.remaining = seconds;
        self.running = seconds > 0;
        if self.running {
            TimerStatus::Running
        } else {
            TimerStatus::Expired
        }
    }

    /// Suspend ticking. Returns false if the countdown was not running.
    pub fn pause(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.bump();
        self.running = false;
        true
    }

    /// Continue from the retained value. Returns false if already running or
    /// there is nothing left.
    pub fn resume(&mut self) -> bool {
        if self.running || self.remaining == 0 {
            return false;
        }
        self.bump();
        self.running = true;
        true
    }

    /// Halt and reset to zero without an expiry notification.
    pub fn stop(&mut self) {
        self.bump();
        self.running = false;
        self.remaining = 0;
    }

    /// Advance by one second. Returns `None` while not running.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.running {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            Some(TimerEvent::Expired)
        } else {
            Some(TimerEvent::Tick {
                remaining: self.remaining,
            })
        }
    }

    fn bump(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

//
// ─── DRIVER ────────────────────────────────────────────────────────────────────
//

/// Countdown driven by a repeating one-second task on the tokio runtime.
///
/// Pausing or stopping aborts the task outright. Must be used from within a
/// tokio runtime.
#[derive(Debug)]
pub struct CountdownTimer {
    state: Arc<Mutex<Countdown>>,
    task: Option<JoinHandle<()>>,
    events: mpsc::UnboundedSender<TimerEvent>,
}

impl CountdownTimer {
    /// Create an idle timer and the receiver its notifications arrive on.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let timer = Self {
            state: Arc::new(Mutex::new(Countdown::new())),
            task: None,
            events,
        };
        (timer, rx)
    }

    #[must_use]
    pub fn remaining(&self) -> u64 {
        lock(&self.state).remaining()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        lock(&self.state).is_running()
    }

    /// Start counting down from `seconds`, restarting if already running.
    pub fn start(&mut self, seconds: u64) -> TimerStatus {
        self.cancel();
        let status = lock(&self.state).start(seconds);
        debug!(seconds, ?status, "timer started");
        if status == TimerStatus::Running {
            self.spawn_ticker();
        }
        status
    }

    pub fn pause(&mut self) {
        if lock(&self.state).pause() {
            self.cancel();
            debug!(remaining = self.remaining(), "timer paused");
        }
    }

    pub fn resume(&mut self) {
        if lock(&self.state).resume() {
            debug!(remaining = self.remaining(), "timer resumed");
            self.spawn_ticker();
        }
    }

    pub fn stop(&mut self) {
        self.cancel();
        lock(&self.state).stop();
        debug!("timer stopped");
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn spawn_ticker(&mut self) {
        let state = Arc::clone(&self.state);
        let events = self.events.clone();
        let generation = lock(&state).generation();

        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                let event = {
                    let mut countdown = lock(&state);
                    if countdown.generation() != generation {
                        break;
                    }
                    countdown.tick()
                };

                match event {
                    Some(TimerEvent::Expired) => {
                        info!("timer expired");
                        let _ = events.send(TimerEvent::Expired);
                        break;
                    }
                    Some(tick) => {
                        let _ = events.send(tick);
                    }
                    None => break,
                }
            }
        }));
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn lock(state: &Mutex<Countdown>) -> MutexGuard<'_, Countdown> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Render seconds as `MM:SS`; minutes are not capped at 59.
#[must_use]
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn run_ticks(countdown: &mut Countdown, n: usize) -> Vec<TimerEvent> {
        (0..n).filter_map(|_| countdown.tick()).collect()
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<TimerEvent>) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn five_ticks_expire_once() {
        let mut countdown = Countdown::new();
        assert_eq!(countdown.start(5), TimerStatus::Running);

        let events = run_ticks(&mut countdown, 5);
        let expiries = events.iter().filter(|e| **e == TimerEvent::Expired).count();

        assert_eq!(countdown.remaining(), 0);
        assert!(!countdown.is_running());
        assert_eq!(expiries, 1);
        assert_eq!(events.last(), Some(&TimerEvent::Expired));

        assert!(run_ticks(&mut countdown, 3).is_empty());
    }

    #[test]
    fn paused_ticks_have_no_effect() {
        let mut countdown = Countdown::new();
        countdown.start(5);

        run_ticks(&mut countdown, 1);
        assert!(countdown.pause());
        assert!(run_ticks(&mut countdown, 3).is_empty());
        assert_eq!(countdown.remaining(), 4);

        assert!(countdown.resume());
        let events = run_ticks(&mut countdown, 4);

        assert_eq!(countdown.remaining(), 0);
        assert_eq!(events.last(), Some(&TimerEvent::Expired));
    }

    #[test]
    fn start_zero_is_immediately_expired() {
        let mut countdown = Countdown::new();
        assert_eq!(countdown.start(0), TimerStatus::Expired);
        assert!(countdown.is_expired());
        assert_eq!(countdown.tick(), None);
    }

    #[test]
    fn stop_resets_without_expiry() {
        let mut countdown = Countdown::new();
        countdown.start(5);
        countdown.tick();
        countdown.stop();

        assert_eq!(countdown.remaining(), 0);
        assert!(!countdown.is_running());
        assert_eq!(countdown.tick(), None);
        assert!(!countdown.resume());
    }

    #[test]
    fn pause_and_resume_guards() {
        let mut countdown = Countdown::new();
        assert!(!countdown.pause());
        countdown.start(3);
        assert!(!countdown.resume());
        assert!(countdown.pause());
        assert!(!countdown.pause());
    }

    #[test]
    fn restart_replaces_remaining() {
        let mut countdown = Countdown::new();
        countdown.start(10);
        countdown.tick();
        let before = countdown.generation();
        countdown.start(3);
        assert_eq!(countdown.remaining(), 3);
        assert!(countdown.is_running());
        assert_ne!(countdown.generation(), before);
    }

    #[test]
    fn format_clock_pads() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(3600), "60:00");
    }

    #[tokio::test(start_paused = true)]
    async fn driver_counts_down_to_expiry() {
        let (mut timer, mut rx) = CountdownTimer::new();
        timer.start(3);

        tokio::time::sleep(Duration::from_millis(3_500)).await;

        assert_eq!(
            drain(&mut rx),
            vec![
                TimerEvent::Tick { remaining: 2 },
                TimerEvent::Tick { remaining: 1 },
                TimerEvent::Expired,
            ]
        );
        assert_eq!(timer.remaining(), 0);
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn driver_pause_cancels_pending_ticks() {
        let (mut timer, mut rx) = CountdownTimer::new();
        timer.start(5);

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        timer.pause();
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(drain(&mut rx), vec![TimerEvent::Tick { remaining: 4 }]);
        assert_eq!(timer.remaining(), 4);

        timer.resume();
        tokio::time::sleep(Duration::from_millis(4_500)).await;

        let events = drain(&mut rx);
        assert_eq!(events.len(), 4);
        assert_eq!(events.last(), Some(&TimerEvent::Expired));
        assert_eq!(timer.remaining(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn driver_stop_never_reports_expiry() {
        let (mut timer, mut rx) = CountdownTimer::new();
        timer.start(5);

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        timer.stop();
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(drain(&mut rx), vec![TimerEvent::Tick { remaining: 4 }]);
        assert_eq!(timer.remaining(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn driver_start_zero_spawns_nothing() {
        let (mut timer, mut rx) = CountdownTimer::new();
        assert_eq!(timer.start(0), TimerStatus::Expired);

        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(drain(&mut rx).is_empty());
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn driver_restart_discards_old_countdown() {
        let (mut timer, mut rx) = CountdownTimer::new();
        timer.start(10);
        tokio::time::sleep(Duration::from_millis(1_500)).await;

        timer.start(2);
        tokio::time::sleep(Duration::from_millis(2_500)).await;

        assert_eq!(
            drain(&mut rx),
            vec![
                TimerEvent::Tick { remaining: 9 },
                TimerEvent::Tick { remaining: 1 },
                TimerEvent::Expired,
            ]
        );
    }
}
