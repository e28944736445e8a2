use std::time::Duration;

use shared::{GeoPoint, PlaybackSpeed, TrackPeriod};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::period::history_window;

/// Base stepping cadence at 1x speed.
pub const BASE_TICK: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Position tracks the most recent snapped point; no stepping.
    Live,
    /// Scrubbing through a snapshotted history window.
    History,
}

/// Owns the snapped route, the active history window, and all playback
/// state. Every transition keeps `current_index` inside the window bounds;
/// the automatic stepping itself is driven externally by a [`PlaybackClock`].
pub struct PlaybackController {
    snapped: Vec<GeoPoint>,
    window: Vec<GeoPoint>,
    mode: Mode,
    current_index: usize,
    playing: bool,
    speed: PlaybackSpeed,
    period: TrackPeriod,
}

impl PlaybackController {
    pub fn new(snapped: Vec<GeoPoint>) -> Self {
        Self {
            snapped,
            window: Vec::new(),
            mode: Mode::Live,
            current_index: 0,
            playing: false,
            speed: PlaybackSpeed::Normal,
            period: TrackPeriod::Today,
        }
    }

    /// Enter history mode: snapshot the window for the selected period,
    /// rewind, and pause.
    pub fn show_history(&mut self) {
        self.window = history_window(&self.snapped, self.period);
        self.mode = Mode::History;
        self.current_index = 0;
        self.playing = false;
    }

    /// Leave history mode and revert to the live position.
    pub fn exit_history(&mut self) {
        self.mode = Mode::Live;
        self.window.clear();
        self.current_index = 0;
        self.playing = false;
    }

    pub fn toggle_play(&mut self) {
        if self.mode == Mode::History {
            self.playing = !self.playing;
        }
    }

    pub fn reset(&mut self) {
        self.current_index = 0;
        self.playing = false;
    }

    /// Jump to an explicit index, clamped to the window, and pause.
    pub fn seek(&mut self, index: usize) {
        self.current_index = index.min(self.window.len().saturating_sub(1));
        self.playing = false;
    }

    /// Takes effect on the next tick; the caller recreates its clock.
    pub fn set_speed(&mut self, speed: PlaybackSpeed) {
        self.speed = speed;
    }

    /// Changing the period while in history mode recomputes the window,
    /// rewinds, and pauses.
    pub fn set_period(&mut self, period: TrackPeriod) {
        self.period = period;
        if self.mode == Mode::History {
            self.window = history_window(&self.snapped, self.period);
            self.current_index = 0;
            self.playing = false;
        }
    }

    /// One clock tick. Steps forward only while playing and not yet at the
    /// final index; reaching the end leaves `playing` untouched, the guard
    /// simply stops movement. Returns whether the index moved.
    pub fn advance(&mut self) -> bool {
        if self.playing && self.current_index + 1 < self.window.len() {
            self.current_index += 1;
            true
        } else {
            false
        }
    }

    /// The point the marker should be heading toward right now.
    pub fn current_point(&self) -> Option<GeoPoint> {
        match self.mode {
            Mode::History => self
                .window
                .get(self.current_index)
                .or_else(|| self.window.first())
                .copied(),
            Mode::Live => self.snapped.last().copied(),
        }
    }

    pub fn at_end(&self) -> bool {
        self.window.is_empty() || self.current_index == self.window.len() - 1
    }

    pub fn snapped_route(&self) -> &[GeoPoint] {
        &self.snapped
    }

    pub fn window(&self) -> &[GeoPoint] {
        &self.window
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> PlaybackSpeed {
        self.speed
    }

    pub fn period(&self) -> TrackPeriod {
        self.period
    }
}

/// Stepping cadence for a speed preset: `2000 ms / multiplier`.
pub fn tick_interval(speed: PlaybackSpeed) -> Duration {
    BASE_TICK.div_f64(speed.multiplier())
}

/// Explicitly owned playback cadence. Exactly one clock drives a controller
/// at a time; a speed change replaces the whole clock, and dropping it
/// cancels the cadence outright.
pub struct PlaybackClock {
    interval: Interval,
}

impl PlaybackClock {
    pub fn new(speed: PlaybackSpeed) -> Self {
        let period = tick_interval(speed);
        // First tick one full period from now, not immediately.
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    pub fn set_speed(&mut self, speed: PlaybackSpeed) {
        *self = Self::new(speed);
    }

    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route_of(len: usize) -> Vec<GeoPoint> {
        (0..len).map(|i| GeoPoint::new(i as f64, 0.0)).collect()
    }

    fn history_controller(len: usize) -> PlaybackController {
        let mut controller = PlaybackController::new(route_of(len));
        controller.show_history();
        controller
    }

    #[test]
    fn show_history_rewinds_and_pauses() {
        let mut controller = history_controller(10);
        controller.toggle_play();
        controller.seek(5);
        controller.show_history();
        assert_eq!(controller.current_index(), 0);
        assert!(!controller.is_playing());
        assert_eq!(controller.mode(), Mode::History);
    }

    #[test]
    fn advance_requires_playing() {
        let mut controller = history_controller(5);
        assert!(!controller.advance());
        controller.toggle_play();
        assert!(controller.advance());
        assert_eq!(controller.current_index(), 1);
    }

    #[test]
    fn advance_stops_at_the_final_index_without_pausing() {
        let mut controller = history_controller(3);
        controller.toggle_play();
        assert!(controller.advance());
        assert!(controller.advance());
        assert!(controller.at_end());
        // Guard blocks further movement but playback stays "on".
        assert!(!controller.advance());
        assert!(controller.is_playing());
        assert_eq!(controller.current_index(), 2);
    }

    #[test]
    fn seek_clamps_and_pauses() {
        let mut controller = history_controller(5);
        controller.toggle_play();
        controller.seek(100);
        assert_eq!(controller.current_index(), 4);
        assert!(!controller.is_playing());
        controller.seek(2);
        assert_eq!(controller.current_index(), 2);
    }

    #[test]
    fn period_change_in_history_recomputes_the_window() {
        let mut controller = history_controller(10);
        controller.seek(9);
        controller.toggle_play();
        controller.set_period(TrackPeriod::Yesterday);
        assert_eq!(controller.window().len(), 5);
        assert_eq!(controller.current_index(), 0);
        assert!(!controller.is_playing());
        // Yesterday plays the first half backwards.
        assert_eq!(controller.current_point().map(|p| p.lat), Some(4.0));
    }

    #[test]
    fn exit_history_reverts_to_live() {
        let mut controller = history_controller(10);
        controller.seek(4);
        controller.exit_history();
        assert_eq!(controller.mode(), Mode::Live);
        assert_eq!(controller.current_index(), 0);
        // Live tracks the most recent snapped point.
        assert_eq!(controller.current_point().map(|p| p.lat), Some(9.0));
    }

    #[test]
    fn empty_route_has_no_current_point() {
        let mut controller = PlaybackController::new(Vec::new());
        assert!(controller.current_point().is_none());
        controller.show_history();
        assert!(controller.current_point().is_none());
        assert!(!controller.advance());
    }

    #[test]
    fn tick_interval_scales_with_speed() {
        assert_eq!(tick_interval(PlaybackSpeed::Half), Duration::from_millis(4000));
        assert_eq!(tick_interval(PlaybackSpeed::Normal), Duration::from_millis(2000));
        assert_eq!(tick_interval(PlaybackSpeed::Double), Duration::from_millis(1000));
        assert_eq!(tick_interval(PlaybackSpeed::Fast), Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn clock_ticks_on_the_scaled_cadence() {
        let mut clock = PlaybackClock::new(PlaybackSpeed::Double);
        let started = Instant::now();
        clock.tick().await;
        assert_eq!(started.elapsed(), Duration::from_millis(1000));
        clock.tick().await;
        assert_eq!(started.elapsed(), Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn speed_change_replaces_the_cadence() {
        let mut clock = PlaybackClock::new(PlaybackSpeed::Normal);
        clock.tick().await;
        let changed = Instant::now();
        clock.set_speed(PlaybackSpeed::Fast);
        clock.tick().await;
        assert_eq!(changed.elapsed(), Duration::from_millis(400));
    }

    // Property-based tests using proptest
    mod proptests {
        use proptest::prelude::*;

        use super::*;

        #[derive(Debug, Clone)]
        enum Op {
            Toggle,
            Reset,
            Seek(usize),
            Advance,
            SetPeriod(TrackPeriod),
            Show,
            Exit,
        }

        fn any_op() -> impl Strategy<Value = Op> {
            prop_oneof![
                Just(Op::Toggle),
                Just(Op::Reset),
                (0usize..128).prop_map(Op::Seek),
                Just(Op::Advance),
                prop::sample::select(TrackPeriod::ALL.to_vec()).prop_map(Op::SetPeriod),
                Just(Op::Show),
                Just(Op::Exit),
            ]
        }

        proptest! {
            #[test]
            fn prop_index_stays_in_bounds(
                len in 1usize..32,
                ops in prop::collection::vec(any_op(), 0..64)
            ) {
                let mut controller = history_controller(len);
                for op in ops {
                    match op {
                        Op::Toggle => controller.toggle_play(),
                        Op::Reset => controller.reset(),
                        Op::Seek(i) => controller.seek(i),
                        Op::Advance => { controller.advance(); }
                        Op::SetPeriod(p) => controller.set_period(p),
                        Op::Show => controller.show_history(),
                        Op::Exit => controller.exit_history(),
                    }
                    let bound = controller.window().len().max(1);
                    prop_assert!(controller.current_index() < bound);
                }
            }
        }
    }
}
