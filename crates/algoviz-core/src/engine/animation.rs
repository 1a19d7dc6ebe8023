//! Playback engine
//!
//! Owns one step sequence and a cursor into it. Transport calls mutate the
//! cursor and broadcast a cloned [`AnimationState`] to every subscriber.
//!
//! The engine is single-threaded: it lives on one task, and playback ticks
//! run as a local task spawned on the caller's `LocalSet`. At most one tick
//! timer exists at a time; each one carries a generation number so a timer
//! that was cancelled can never advance the cursor.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use super::state::{AnimationState, MAX_SPEED, MIN_SPEED};
use super::timer::TickTimer;
use crate::config::PlaybackConfig;
use crate::engine::seek_fraction_to_step;
use crate::step::{DataState, Step};

/// Tick delay at speed 1.0
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Returns false once it no longer wants snapshots
type Listener = Rc<dyn Fn(AnimationState) -> bool>;

struct EngineInner {
    session: Uuid,
    state: AnimationState,
    base_delay: Duration,
    listeners: Vec<(u64, Listener)>,
    next_listener_id: u64,
    timer: Option<TickTimer>,
    timer_generation: u64,
    destroyed: bool,
}

impl EngineInner {
    fn tick_interval(&self) -> Duration {
        let nanos = self.base_delay.as_nanos() as f64 / self.state.speed;
        Duration::from_nanos(nanos.round() as u64)
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

impl Drop for EngineInner {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

/// Playback controller for one visualization session
///
/// Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct AnimationEngine {
    inner: Rc<RefCell<EngineInner>>,
}

/// Handle returned by [`AnimationEngine::subscribe`]
pub struct Subscription {
    id: u64,
    engine: Weak<RefCell<EngineInner>>,
}

impl Subscription {
    /// Stop receiving snapshots. Safe to call after the engine is gone.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.engine.upgrade() {
            inner.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

impl AnimationEngine {
    /// Create an engine over `steps`
    ///
    /// `initial_state` is only shown when `steps` is empty.
    pub fn new(steps: Vec<Step>, initial_state: DataState) -> Self {
        let steps: Arc<[Step]> = steps.into();
        let session = Uuid::new_v4();
        debug!(session = %session, total_steps = steps.len(), "Animation engine created");

        Self {
            inner: Rc::new(RefCell::new(EngineInner {
                session,
                state: AnimationState::new(steps, initial_state),
                base_delay: DEFAULT_BASE_DELAY,
                listeners: Vec::new(),
                next_listener_id: 0,
                timer: None,
                timer_generation: 0,
                destroyed: false,
            })),
        }
    }

    /// Create an engine using the configured base delay and initial speed
    pub fn from_config(steps: Vec<Step>, initial_state: DataState, config: &PlaybackConfig) -> Self {
        let engine = Self::new(steps, initial_state).with_base_delay(config.base_delay());
        engine.set_speed(config.initial_speed());
        engine
    }

    /// Override the tick delay used at speed 1.0
    pub fn with_base_delay(self, base_delay: Duration) -> Self {
        self.inner.borrow_mut().base_delay = base_delay.max(Duration::from_millis(1));
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.inner.borrow().session
    }

    /// Fresh copy of the current state
    pub fn state(&self) -> AnimationState {
        self.inner.borrow().state.clone()
    }

    /// Delay between ticks at the current speed
    pub fn tick_interval(&self) -> Duration {
        self.inner.borrow().tick_interval()
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.borrow().destroyed
    }

    /// Register a listener; it receives a new snapshot after every change
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(AnimationState) + 'static,
    {
        self.add_listener(Rc::new(move |state| {
            listener(state);
            true
        }))
    }

    /// Receive snapshots over a channel instead of a callback
    ///
    /// The listener is dropped on the first broadcast after the receiver
    /// goes away.
    pub fn subscribe_channel(&self) -> (Subscription, mpsc::UnboundedReceiver<AnimationState>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.add_listener(Rc::new(move |state| tx.send(state).is_ok()));
        (subscription, rx)
    }

    /// Number of registered listeners
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    fn add_listener(&self, listener: Listener) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_listener_id;
        inner.next_listener_id += 1;
        inner.listeners.push((id, listener));

        Subscription {
            id,
            engine: Rc::downgrade(&self.inner),
        }
    }

    /// Start automatic playback
    ///
    /// No-op when already playing, when there is nothing to play, or after
    /// [`destroy`](Self::destroy).
    ///
    /// # Panics
    ///
    /// Panics when it has to start a timer outside a `tokio::task::LocalSet`.
    pub fn play(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.destroyed || inner.state.is_playing || inner.state.total_steps == 0 {
                return;
            }

            inner.cancel_timer();
            inner.state.is_playing = true;
            inner.timer_generation += 1;

            let generation = inner.timer_generation;
            let period = inner.tick_interval();
            let weak = Rc::downgrade(&self.inner);
            let timer = TickTimer::start(period, move || match weak.upgrade() {
                Some(inner) => AnimationEngine { inner }.on_tick(generation),
                None => false,
            });

            info!(
                session = %inner.session,
                step = inner.state.current_step,
                interval_ms = timer.period().as_millis() as u64,
                "Playback started"
            );
            inner.timer = Some(timer);
        }
        self.notify();
    }

    /// Stop automatic playback. No-op when not playing.
    pub fn pause(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if !inner.state.is_playing {
                return;
            }
            inner.cancel_timer();
            inner.state.is_playing = false;
            debug!(session = %inner.session, step = inner.state.current_step, "Playback paused");
        }
        self.notify();
    }

    /// Pause and rewind to the first step
    pub fn reset(&self) {
        self.pause();
        {
            let mut inner = self.inner.borrow_mut();
            inner.state.move_to(0);
            debug!(session = %inner.session, "Playback reset");
        }
        self.notify();
    }

    /// Advance one step; no-op on the last step
    pub fn step_forward(&self) {
        let moved = {
            let mut inner = self.inner.borrow_mut();
            let next = inner.state.current_step + 1;
            inner.state.move_to(next)
        };
        if moved {
            self.notify();
        }
    }

    /// Go back one step; no-op on the first step
    pub fn step_backward(&self) {
        let moved = {
            let mut inner = self.inner.borrow_mut();
            match inner.state.current_step.checked_sub(1) {
                Some(previous) => inner.state.move_to(previous),
                None => false,
            }
        };
        if moved {
            self.notify();
        }
    }

    /// Jump straight to `index`; out-of-range requests are ignored
    pub fn jump_to_step(&self, index: usize) {
        let moved = self.inner.borrow_mut().state.move_to(index);
        if moved {
            self.notify();
        } else {
            debug!(index, "Ignoring jump outside the step range");
        }
    }

    /// Jump to the step under a seek-bar click at `fraction` (0.0 to 1.0)
    pub fn seek(&self, fraction: f64) {
        let total = self.inner.borrow().state.total_steps;
        if let Some(index) = seek_fraction_to_step(fraction, total) {
            self.jump_to_step(index);
        }
    }

    /// Change the playback multiplier, clamped to 0.1..=3.0
    ///
    /// While playing, the tick is rescheduled so the new speed applies now.
    pub fn set_speed(&self, speed: f64) {
        if speed.is_nan() {
            debug!("Ignoring NaN playback speed");
            return;
        }
        let speed = speed.clamp(MIN_SPEED, MAX_SPEED);

        let was_playing = self.inner.borrow().state.is_playing;
        if was_playing {
            self.pause();
        }
        self.inner.borrow_mut().state.speed = speed;
        self.notify();
        if was_playing {
            self.play();
        }
    }

    /// End the session: cancel the timer and drop every subscriber
    ///
    /// Idempotent. Later calls to [`play`](Self::play) do nothing.
    pub fn destroy(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.cancel_timer();
        inner.state.is_playing = false;
        inner.listeners.clear();
        if !inner.destroyed {
            inner.destroyed = true;
            debug!(session = %inner.session, "Animation engine destroyed");
        }
    }

    /// Timer callback; returns false once this timer should stop
    fn on_tick(&self, generation: u64) -> bool {
        let at_end = {
            let inner = self.inner.borrow();
            if inner.destroyed || !inner.state.is_playing || inner.timer_generation != generation {
                return false;
            }
            inner.state.is_at_end()
        };

        if at_end {
            debug!("Reached the last step, pausing");
            self.pause();
            false
        } else {
            self.step_forward();
            true
        }
    }

    /// Send a snapshot to every listener
    ///
    /// No borrow is held while listeners run, so they may call back in.
    fn notify(&self) {
        let (snapshot, listeners) = {
            let inner = self.inner.borrow();
            let listeners: Vec<(u64, Listener)> = inner
                .listeners
                .iter()
                .map(|(id, listener)| (*id, Rc::clone(listener)))
                .collect();
            (inner.state.clone(), listeners)
        };

        let closed: Vec<u64> = listeners
            .into_iter()
            .filter(|(_, listener)| !listener(snapshot.clone()))
            .map(|(id, _)| id)
            .collect();

        if !closed.is_empty() {
            debug!(count = closed.len(), "Removing closed snapshot listeners");
            self.inner
                .borrow_mut()
                .listeners
                .retain(|(id, _)| !closed.contains(id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PlaybackPhase;
    use crate::step::{ArrayState, Metrics};
    use std::cell::{Cell, RefCell};
    use tokio::task::LocalSet;
    use tokio::time::sleep;

    fn frames(n: usize) -> Vec<Step> {
        (0..n)
            .map(|i| Step {
                id: format!("{}-frame", i),
                description: format!("frame {}", i),
                state: ArrayState::new(vec![i as i64, 100]).into(),
                highlights: Vec::new(),
                comparisons: None,
                metrics: Metrics::default(),
            })
            .collect()
    }

    fn engine(n: usize) -> AnimationEngine {
        AnimationEngine::new(frames(n), DataState::default())
    }

    fn recorder(engine: &AnimationEngine) -> Rc<RefCell<Vec<AnimationState>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _ = engine.subscribe(move |state| sink.borrow_mut().push(state));
        seen
    }

    fn assert_in_sync(state: &AnimationState) {
        assert!(state.current_step < state.total_steps);
        assert_eq!(state.current_state, state.steps[state.current_step].state);
    }

    #[test]
    fn test_step_forward_and_backward_clamp() {
        let engine = engine(3);
        let seen = recorder(&engine);

        engine.step_backward();
        assert_eq!(engine.state().current_step, 0);
        assert!(seen.borrow().is_empty());

        engine.step_forward();
        engine.step_forward();
        engine.step_forward();
        let state = engine.state();
        assert_eq!(state.current_step, 2);
        assert_in_sync(&state);
        assert_eq!(seen.borrow().len(), 2);

        engine.step_backward();
        assert_eq!(engine.state().current_step, 1);
        assert_in_sync(&engine.state());
    }

    #[test]
    fn test_jump_to_step() {
        let engine = engine(10);
        for i in [7, 0, 9, 3] {
            engine.jump_to_step(i);
            assert_eq!(engine.state().current_step, i);
            assert_in_sync(&engine.state());
        }

        engine.jump_to_step(10);
        engine.jump_to_step(usize::MAX);
        assert_eq!(engine.state().current_step, 3);
    }

    #[test]
    fn test_seek_maps_fraction() {
        let engine = engine(5);
        engine.seek(1.0);
        assert_eq!(engine.state().current_step, 4);
        engine.seek(0.5);
        assert_eq!(engine.state().current_step, 2);
        engine.seek(-1.0);
        assert_eq!(engine.state().current_step, 0);
    }

    #[test]
    fn test_set_speed_clamps() {
        let engine = engine(3);
        engine.set_speed(10.0);
        assert_eq!(engine.state().speed, MAX_SPEED);
        engine.set_speed(0.0);
        assert_eq!(engine.state().speed, MIN_SPEED);
        engine.set_speed(-4.0);
        assert_eq!(engine.state().speed, MIN_SPEED);
        engine.set_speed(1.5);
        assert_eq!(engine.state().speed, 1.5);
        engine.set_speed(f64::NAN);
        assert_eq!(engine.state().speed, 1.5);
        engine.set_speed(f64::INFINITY);
        assert_eq!(engine.state().speed, MAX_SPEED);
    }

    #[test]
    fn test_tick_interval_follows_speed() {
        let engine = engine(3).with_base_delay(Duration::from_millis(1200));
        assert_eq!(engine.tick_interval(), Duration::from_millis(1200));
        engine.set_speed(2.0);
        assert_eq!(engine.tick_interval(), Duration::from_millis(600));
        engine.set_speed(0.5);
        assert_eq!(engine.tick_interval(), Duration::from_millis(2400));
    }

    #[test]
    fn test_from_config_applies_mood_once() {
        let config = PlaybackConfig {
            base_delay_ms: 400,
            speed: 1.0,
            mood: Some(crate::Mood::Grind),
        };
        let engine = AnimationEngine::from_config(frames(4), DataState::default(), &config);
        assert_eq!(engine.state().speed, 2.0);
        assert_eq!(engine.tick_interval(), Duration::from_millis(200));
    }

    #[test]
    fn test_empty_sequence_is_finished_and_play_is_noop() {
        let initial: DataState = ArrayState::new(vec![9, 9]).into();
        let engine = AnimationEngine::new(Vec::new(), initial.clone());
        let seen = recorder(&engine);

        // No LocalSet here: play must return before trying to start a timer
        engine.play();
        engine.step_forward();
        engine.step_backward();
        engine.jump_to_step(0);

        let state = engine.state();
        assert!(!state.is_playing);
        assert_eq!(state.total_steps, 0);
        assert_eq!(state.current_step, 0);
        assert_eq!(state.current_state, initial);
        assert_eq!(state.phase(), PlaybackPhase::Finished);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_pause_when_not_playing_is_noop() {
        let engine = engine(3);
        let seen = recorder(&engine);
        engine.pause();
        engine.pause();
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_reset_rewinds() {
        let engine = engine(4);
        engine.jump_to_step(3);
        engine.reset();
        let state = engine.state();
        assert_eq!(state.current_step, 0);
        assert_in_sync(&state);
    }

    #[test]
    fn test_snapshots_are_independent_copies() {
        let engine = engine(3);
        let seen = recorder(&engine);

        engine.step_forward();
        engine.set_speed(2.0);
        engine.step_forward();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].current_step, 1);
        assert_eq!(seen[0].speed, 1.0);
        // Speed-only change is still broadcast
        assert_eq!(seen[1].current_step, 1);
        assert_eq!(seen[1].speed, 2.0);
        assert_eq!(seen[2].current_step, 2);
        for state in seen.iter() {
            assert_in_sync(state);
        }
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let engine = engine(5);
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let subscription = engine.subscribe(move |_| counter.set(counter.get() + 1));

        engine.step_forward();
        subscription.unsubscribe();
        engine.step_forward();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_closed_channel_listener_is_removed() {
        let engine = engine(5);
        let _kept = recorder(&engine);
        let (_subscription, mut rx) = engine.subscribe_channel();
        assert_eq!(engine.subscriber_count(), 2);

        engine.step_forward();
        assert_eq!(rx.try_recv().unwrap().current_step, 1);
        assert_eq!(engine.subscriber_count(), 2);

        drop(rx);
        engine.step_forward();
        assert_eq!(engine.subscriber_count(), 1);
        engine.step_forward();
        assert_eq!(engine.subscriber_count(), 1);
    }

    #[test]
    fn test_listener_may_call_back_into_engine() {
        let engine = engine(5);
        let handle = engine.clone();
        let _ = engine.subscribe(move |state| {
            // Re-entrant call while a broadcast is in flight
            if state.current_step == 1 {
                handle.step_forward();
            }
        });

        engine.step_forward();
        assert_eq!(engine.state().current_step, 2);
    }

    #[test]
    fn test_destroy_is_idempotent_and_clears_listeners() {
        let engine = engine(3);
        let seen = recorder(&engine);

        engine.destroy();
        engine.destroy();
        assert!(engine.is_destroyed());

        engine.step_forward();
        engine.play();
        assert!(seen.borrow().is_empty());
        assert!(!engine.state().is_playing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_runs_to_end_and_auto_pauses() {
        LocalSet::new()
            .run_until(async {
                let engine = engine(5);
                let seen = recorder(&engine);

                engine.play();
                assert!(engine.state().is_playing);

                // Four ticks advance to the last step, the fifth pauses
                sleep(Duration::from_millis(5_500)).await;

                let state = engine.state();
                assert!(!state.is_playing);
                assert_eq!(state.current_step, 4);
                assert_eq!(state.phase(), PlaybackPhase::Finished);

                let steps: Vec<usize> = seen.borrow().iter().map(|s| s.current_step).collect();
                assert_eq!(steps, vec![0, 1, 2, 3, 4, 4]);
                let playing: Vec<bool> = seen.borrow().iter().map(|s| s.is_playing).collect();
                assert_eq!(playing, vec![true, true, true, true, true, false]);

                // No further ticks once paused
                sleep(Duration::from_millis(5_000)).await;
                assert_eq!(seen.borrow().len(), 6);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_twice_keeps_single_timer() {
        LocalSet::new()
            .run_until(async {
                let engine = engine(10);
                engine.play();
                engine.play();

                sleep(Duration::from_millis(2_500)).await;
                assert_eq!(engine.state().current_step, 2);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_cancels_ticks() {
        LocalSet::new()
            .run_until(async {
                let engine = engine(10);
                engine.play();
                sleep(Duration::from_millis(1_500)).await;
                engine.pause();
                assert_eq!(engine.state().current_step, 1);

                sleep(Duration::from_millis(5_000)).await;
                let state = engine.state();
                assert_eq!(state.current_step, 1);
                assert_eq!(state.phase(), PlaybackPhase::Paused);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_speed_change_while_playing_applies_immediately() {
        LocalSet::new()
            .run_until(async {
                let engine = engine(20);
                engine.play();
                sleep(Duration::from_millis(1_500)).await;
                assert_eq!(engine.state().current_step, 1);

                // Rescheduled at 500ms from now, not after the pending 1000ms tick
                engine.set_speed(2.0);
                assert!(engine.state().is_playing);
                sleep(Duration::from_millis(1_100)).await;
                assert_eq!(engine.state().current_step, 3);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_destroy_stops_playback() {
        LocalSet::new()
            .run_until(async {
                let engine = engine(10);
                let seen = recorder(&engine);
                engine.play();
                sleep(Duration::from_millis(1_500)).await;

                engine.destroy();
                let delivered = seen.borrow().len();
                sleep(Duration::from_millis(5_000)).await;

                assert_eq!(engine.state().current_step, 1);
                assert!(!engine.state().is_playing);
                assert_eq!(seen.borrow().len(), delivered);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_on_last_step_pauses_without_moving() {
        LocalSet::new()
            .run_until(async {
                let engine = engine(3);
                engine.jump_to_step(2);
                engine.play();
                sleep(Duration::from_millis(1_100)).await;

                let state = engine.state();
                assert!(!state.is_playing);
                assert_eq!(state.current_step, 2);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_listener_can_pause_during_playback() {
        LocalSet::new()
            .run_until(async {
                let engine = engine(10);
                let handle = engine.clone();
                let _ = engine.subscribe(move |state| {
                    if state.is_playing && state.current_step == 3 {
                        handle.pause();
                    }
                });

                engine.play();
                sleep(Duration::from_millis(10_000)).await;
                let state = engine.state();
                assert!(!state.is_playing);
                assert_eq!(state.current_step, 3);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_engine_stops_timer() {
        LocalSet::new()
            .run_until(async {
                let engine = engine(10);
                let (_subscription, mut rx) = engine.subscribe_channel();
                engine.play();
                sleep(Duration::from_millis(1_500)).await;
                drop(engine);

                sleep(Duration::from_millis(5_000)).await;
                let mut received = Vec::new();
                while let Ok(state) = rx.try_recv() {
                    received.push(state.current_step);
                }
                assert_eq!(received, vec![0, 1]);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_while_playing_pauses() {
        LocalSet::new()
            .run_until(async {
                let engine = engine(10);
                engine.play();
                sleep(Duration::from_millis(2_500)).await;
                engine.reset();

                let state = engine.state();
                assert!(!state.is_playing);
                assert_eq!(state.current_step, 0);
                assert_in_sync(&state);

                sleep(Duration::from_millis(3_000)).await;
                assert_eq!(engine.state().current_step, 0);
            })
            .await;
    }
}
