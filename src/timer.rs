//! Idle timer for the FTP session
//!
//! A one-shot countdown runs on a background thread. The running flag and the
//! countdown generation live behind a single mutex shared by the foreground
//! operations and the countdown itself, so a reset can never be observed as
//! expired.

use log::debug;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct TimerState {
    running: bool,
    /// Bumped on every tick and stop; a countdown only acts on its own generation
    generation: u64,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<TimerState>,
    wakeup: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, TimerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Tracks whether the session has been idle longer than the timeout
#[derive(Debug)]
pub struct IdleTimer {
    timeout: Duration,
    shared: Arc<Shared>,
    countdown: Option<JoinHandle<()>>,
}

impl IdleTimer {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            shared: Arc::new(Shared::default()),
            countdown: None,
        }
    }

    #[cfg(test)]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Start a countdown of `timeout`
    pub fn tick(&mut self) {
        let handle = {
            let mut state = self.shared.lock();
            Self::start_locked(&self.shared, self.timeout, &mut state)
        };
        self.replace_countdown(handle);
    }

    /// True when no countdown is running
    pub fn expired(&self) -> bool {
        !self.shared.lock().running
    }

    /// Stop and restart the countdown under one lock acquisition
    pub fn reset(&mut self) {
        let handle = {
            let mut state = self.shared.lock();
            Self::cancel_locked(&mut state);
            Self::start_locked(&self.shared, self.timeout, &mut state)
        };
        self.replace_countdown(handle);
    }

    /// Cancel any running countdown; no-op when already stopped
    pub fn stop(&mut self) {
        {
            let mut state = self.shared.lock();
            if !state.running {
                return;
            }
            Self::cancel_locked(&mut state);
        }
        self.shared.wakeup.notify_all();
        Self::join(self.countdown.take());
        debug!("Idle timer stopped");
    }

    fn cancel_locked(state: &mut TimerState) {
        state.running = false;
        state.generation = state.generation.wrapping_add(1);
    }

    /// Mark running and spawn the countdown for the new generation
    fn start_locked(
        shared: &Arc<Shared>,
        timeout: Duration,
        state: &mut TimerState,
    ) -> JoinHandle<()> {
        state.running = true;
        state.generation = state.generation.wrapping_add(1);

        let generation = state.generation;
        let shared = Arc::clone(shared);
        // A timeout too large to represent never expires
        let deadline = Instant::now().checked_add(timeout);

        debug!("Idle timer started ({:?})", timeout);
        thread::spawn(move || countdown(shared, generation, deadline))
    }

    /// Install the new countdown, then wake and join the superseded one
    fn replace_countdown(&mut self, handle: JoinHandle<()>) {
        let previous = self.countdown.replace(handle);
        self.shared.wakeup.notify_all();
        Self::join(previous);
    }

    fn join(handle: Option<JoinHandle<()>>) {
        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }
}

fn countdown(shared: Arc<Shared>, generation: u64, deadline: Option<Instant>) {
    let mut state = shared.lock();
    loop {
        if state.generation != generation {
            return;
        }

        let Some(deadline) = deadline else {
            state = shared
                .wakeup
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
            continue;
        };

        let now = Instant::now();
        if now >= deadline {
            state.running = false;
            debug!("Idle timer expired");
            return;
        }

        state = shared
            .wakeup
            .wait_timeout(state, deadline - now)
            .unwrap_or_else(PoisonError::into_inner)
            .0;
    }
}

impl Drop for IdleTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_new_timer_is_expired() {
        let timer = IdleTimer::new(Duration::from_secs(60));
        assert!(timer.expired());
        assert_eq!(timer.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_tick_then_expire() {
        let mut timer = IdleTimer::new(Duration::from_millis(50));
        timer.tick();
        assert!(!timer.expired());

        thread::sleep(Duration::from_millis(200));
        assert!(timer.expired());
    }

    #[test]
    fn test_stop_expires_immediately() {
        let mut timer = IdleTimer::new(Duration::from_secs(60));
        timer.tick();
        assert!(!timer.expired());

        let started = Instant::now();
        timer.stop();
        assert!(timer.expired());
        assert!(started.elapsed() < Duration::from_secs(5));

        // idempotent
        timer.stop();
        assert!(timer.expired());
    }

    #[test]
    fn test_reset_restarts_after_expiry() {
        let mut timer = IdleTimer::new(Duration::from_millis(30));
        timer.tick();
        thread::sleep(Duration::from_millis(150));
        assert!(timer.expired());

        timer.reset();
        assert!(!timer.expired());
    }

    #[test]
    fn test_unrepresentable_timeout_never_expires() {
        let mut timer = IdleTimer::new(Duration::from_secs(u64::MAX));
        timer.reset();
        thread::sleep(Duration::from_millis(50));
        assert!(!timer.expired());

        timer.reset();
        assert!(!timer.expired());

        let started = Instant::now();
        timer.stop();
        assert!(timer.expired());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_double_tick_keeps_single_countdown() {
        let mut timer = IdleTimer::new(Duration::from_millis(300));
        timer.tick();
        thread::sleep(Duration::from_millis(200));
        timer.tick();

        // The first countdown would have fired by now
        thread::sleep(Duration::from_millis(200));
        assert!(!timer.expired());
    }

    #[test]
    fn test_repeated_resets_never_observe_expiry() {
        let timeout = Duration::from_millis(500);
        let mut timer = IdleTimer::new(timeout);
        let mut rng = rand::thread_rng();

        timer.tick();
        for _ in 0..20 {
            thread::sleep(Duration::from_millis(rng.gen_range(0..100)));
            assert!(!timer.expired());
            timer.reset();
            assert!(!timer.expired());
        }

        thread::sleep(timeout + Duration::from_millis(300));
        assert!(timer.expired());
    }

    #[test]
    fn test_concurrent_observer_never_sees_expiry_during_resets() {
        let timeout = Duration::from_millis(400);
        let mut timer = IdleTimer::new(timeout);
        let shared = Arc::clone(&timer.shared);
        let done = Arc::new(Mutex::new(false));

        timer.tick();
        let observer = {
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut seen_expired = false;
                while !*done.lock().unwrap() {
                    if !shared.lock().running {
                        seen_expired = true;
                    }
                    thread::sleep(Duration::from_millis(1));
                }
                seen_expired
            })
        };

        let mut rng = rand::thread_rng();
        for _ in 0..30 {
            thread::sleep(Duration::from_millis(rng.gen_range(0..50)));
            timer.reset();
        }
        *done.lock().unwrap() = true;

        assert!(!observer.join().unwrap());
    }
}
