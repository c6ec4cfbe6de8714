//! Cancellable timers on the engine's virtual clock
//!
//! The engine never reads wall time. A front end feeds elapsed time through
//! [`PowerUpTimers::advance`], which reports how often each timer fired. A
//! timer is cancelled by dropping it from its slot, so a reset or a claim can
//! never leave a stale timer behind.

use std::time::Duration;

/// A scheduled timer, either one-shot or repeating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    remaining: Duration,
    period: Option<Duration>,
    spent: bool,
}

impl Timer {
    /// Fires once after `delay`
    pub fn once(delay: Duration) -> Self {
        Self {
            remaining: delay,
            period: None,
            spent: false,
        }
    }

    /// Fires every `period`; a zero period is bumped to one millisecond
    pub fn every(period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        Self {
            remaining: period,
            period: Some(period),
            spent: false,
        }
    }

    /// Time until the next firing
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn is_repeating(&self) -> bool {
        self.period.is_some()
    }

    /// Let `elapsed` pass and return how many times the timer fired
    ///
    /// A one-shot timer fires at most once and stays at zero afterwards.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.spent {
            return 0;
        }
        if elapsed < self.remaining {
            self.remaining -= elapsed;
            return 0;
        }

        match self.period {
            None => {
                self.remaining = Duration::ZERO;
                self.spent = true;
                1
            }
            Some(period) => {
                let overshoot = elapsed - self.remaining;
                let extra = overshoot.as_nanos() / period.as_nanos();
                let leftover = overshoot.as_nanos() % period.as_nanos();
                self.remaining = period - Duration::from_nanos(leftover as u64);
                (1 + extra).min(u32::MAX as u128) as u32
            }
        }
    }
}

/// Timers owned by the engine for the power-up lifecycle
///
/// `despawn` runs while a power-up sits unclaimed on the board. `countdown`
/// ticks down an active effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PowerUpTimers {
    despawn: Option<Timer>,
    countdown: Option<Timer>,
}

/// How often each power-up timer fired during one [`PowerUpTimers::advance`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerFirings {
    pub despawned: bool,
    pub countdown_steps: u32,
}

impl PowerUpTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the despawn timer
    pub fn schedule_despawn(&mut self, after: Duration) {
        self.despawn = Some(Timer::once(after));
    }

    pub fn cancel_despawn(&mut self) {
        self.despawn = None;
    }

    /// Start (or restart) the effect countdown
    pub fn schedule_countdown(&mut self, step: Duration) {
        self.countdown = Some(Timer::every(step));
    }

    pub fn cancel_countdown(&mut self) {
        self.countdown = None;
    }

    pub fn cancel_all(&mut self) {
        self.despawn = None;
        self.countdown = None;
    }

    pub fn despawn(&self) -> Option<&Timer> {
        self.despawn.as_ref()
    }

    pub fn countdown(&self) -> Option<&Timer> {
        self.countdown.as_ref()
    }

    /// Let `elapsed` pass on both timers
    ///
    /// A fired despawn timer is removed from its slot. The countdown keeps
    /// running until the owner cancels it.
    pub fn advance(&mut self, elapsed: Duration) -> TimerFirings {
        let mut firings = TimerFirings::default();

        if let Some(timer) = self.despawn.as_mut() {
            if timer.advance(elapsed) > 0 {
                firings.despawned = true;
                self.despawn = None;
            }
        }

        if let Some(timer) = self.countdown.as_mut() {
            firings.countdown_steps = timer.advance(elapsed);
        }

        firings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut timer = Timer::once(ms(1_500));
        assert_eq!(timer.advance(ms(1_000)), 0);
        assert_eq!(timer.remaining(), ms(500));
        assert_eq!(timer.advance(ms(600)), 1);
        assert_eq!(timer.advance(ms(10_000)), 0);
    }

    #[test]
    fn test_repeating_counts_every_period() {
        let mut timer = Timer::every(ms(1_000));
        assert_eq!(timer.advance(ms(999)), 0);
        assert_eq!(timer.advance(ms(1)), 1);
        assert_eq!(timer.remaining(), ms(1_000));

        // A long gap fires several times and keeps the phase
        assert_eq!(timer.advance(ms(3_250)), 3);
        assert_eq!(timer.remaining(), ms(750));
    }

    #[test]
    fn test_despawn_slot_clears_after_firing() {
        let mut timers = PowerUpTimers::new();
        timers.schedule_despawn(ms(15_000));

        assert!(!timers.advance(ms(14_900)).despawned);
        assert!(timers.advance(ms(100)).despawned);
        assert!(timers.despawn().is_none());
        assert!(!timers.advance(ms(15_000)).despawned);
    }

    #[test]
    fn test_cancelled_timers_never_fire() {
        let mut timers = PowerUpTimers::new();
        timers.schedule_despawn(ms(100));
        timers.schedule_countdown(ms(100));
        timers.cancel_all();

        assert_eq!(timers.advance(ms(1_000)), TimerFirings::default());
    }

    #[test]
    fn test_reschedule_replaces_previous_timer() {
        let mut timers = PowerUpTimers::new();
        timers.schedule_countdown(ms(1_000));
        timers.advance(ms(900));

        // Restarting resets the phase instead of stacking a second timer
        timers.schedule_countdown(ms(1_000));
        assert_eq!(timers.advance(ms(900)).countdown_steps, 0);
        assert_eq!(timers.advance(ms(100)).countdown_steps, 1);
    }
}
