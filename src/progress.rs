// src/progress.rs
//! Client-side analysis progress simulation.
//!
//! The percentage advances by a fixed increment per tick and does not follow
//! real backend progress. When it reaches 100 the interval stops, a short
//! settle delay passes, and the completion callback receives the result.

use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};

use crate::error::{InsightError, InsightResult};

pub const DEFAULT_STATUS_MESSAGES: [&str; 9] = [
    "Initializing analysis engine...",
    "Loading video frames...",
    "Extracting key frames...",
    "Analyzing video content...",
    "Recognizing scenes...",
    "Generating text summary...",
    "Building mind map...",
    "Optimizing analysis results...",
    "Finishing analysis...",
];

#[derive(Debug, Clone)]
pub struct ProgressConfig {
    pub total_duration: Duration,
    pub tick: Duration,
    pub settle_delay: Duration,
    pub messages: Vec<String>,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            total_duration: Duration::from_millis(3000),
            tick: Duration::from_millis(100),
            settle_delay: Duration::from_millis(500),
            messages: DEFAULT_STATUS_MESSAGES.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl ProgressConfig {
    pub fn validate(&self) -> InsightResult<()> {
        if self.messages.is_empty() {
            return Err(InsightError::Config("progress needs at least one status message".into()));
        }
        if self.tick.is_zero() || self.total_duration.is_zero() {
            return Err(InsightError::Config("progress durations must be non-zero".into()));
        }
        Ok(())
    }

    /// Ticks the simulation is expected to take.
    pub fn steps(&self) -> f64 {
        self.total_duration.as_secs_f64() / self.tick.as_secs_f64()
    }

    /// Percentage added on every tick. A tick longer than the whole
    /// duration completes in one step.
    pub fn increment(&self) -> f64 {
        let steps = self.steps();
        if steps < 1.0 {
            100.0
        } else {
            100.0 / steps
        }
    }
}

/// What the view shows after each tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressTick {
    pub percent: u8,
    pub remaining_seconds: u64,
    pub message: String,
}

pub fn display_percent(progress: f64) -> u8 {
    progress.min(100.0).max(0.0).round() as u8
}

/// Estimate derived from the percentage alone, floored at zero.
pub fn remaining_seconds(percent: u8, total: Duration) -> u64 {
    let left = 100u8.saturating_sub(percent) as f64;
    (left * total.as_secs_f64() / 100.0).round().max(0.0) as u64
}

/// Splits 0..=100 into `count - 1` equal bands. The first message shows
/// at 0 and the last exactly at 100.
pub fn status_index(percent: u8, count: usize) -> usize {
    if count <= 1 {
        return 0;
    }
    let bands = count - 1;
    let index = usize::from(percent.min(100)) * bands / 100;
    index.min(bands)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorState {
    Idle,
    Running,
    Complete,
}

pub struct ProgressSimulator {
    config: ProgressConfig,
    state: SimulatorState,
}

impl ProgressSimulator {
    pub fn new(config: ProgressConfig) -> InsightResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: SimulatorState::Idle,
        })
    }

    pub fn state(&self) -> SimulatorState {
        self.state
    }

    pub fn config(&self) -> &ProgressConfig {
        &self.config
    }

    pub fn snapshot(&self, progress: f64) -> ProgressTick {
        let percent = display_percent(progress);
        let index = status_index(percent, self.config.messages.len());
        ProgressTick {
            percent,
            remaining_seconds: remaining_seconds(percent, self.config.total_duration),
            message: self.config.messages[index].clone(),
        }
    }

    /// Runs the animation to 100 %, then hands `result` to `on_complete`
    /// exactly once. A simulator can only run once.
    pub async fn run<T, R, F, C>(&mut self, result: T, mut on_tick: F, on_complete: C) -> InsightResult<R>
    where
        F: FnMut(&ProgressTick),
        C: FnOnce(T) -> R,
    {
        if self.state != SimulatorState::Idle {
            return Err(InsightError::Simulator("simulation already started".into()));
        }
        self.state = SimulatorState::Running;
        tracing::debug!(
            total_ms = self.config.total_duration.as_millis() as u64,
            tick_ms = self.config.tick.as_millis() as u64,
            "⏳ Starting simulated analysis progress"
        );

        on_tick(&self.snapshot(0.0));

        let increment = self.config.increment();
        let mut interval = tokio::time::interval_at(Instant::now() + self.config.tick, self.config.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut progress = 0.0;
        loop {
            interval.tick().await;
            progress += increment;
            let tick = self.snapshot(progress);
            on_tick(&tick);
            if tick.percent >= 100 {
                break;
            }
        }
        drop(interval);

        tokio::time::sleep(self.config.settle_delay).await;
        let output = on_complete(result);
        self.state = SimulatorState::Complete;
        tracing::debug!("✅ Simulated analysis complete");
        Ok(output)
    }

    /// Like [`run`](Self::run), substituting `fallback()` when no data was
    /// supplied.
    pub async fn run_with_fallback<T, R, F, C, D>(
        &mut self,
        data: Option<T>,
        fallback: D,
        on_tick: F,
        on_complete: C,
    ) -> InsightResult<R>
    where
        F: FnMut(&ProgressTick),
        C: FnOnce(T) -> R,
        D: FnOnce() -> T,
    {
        let result = match data {
            Some(data) => data,
            None => {
                tracing::info!("📦 No analysis data supplied, using embedded template");
                fallback()
            }
        };
        self.run(result, on_tick, on_complete).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_index_bounds() {
        for count in 1..=12 {
            for percent in 0..=100u8 {
                assert!(status_index(percent, count) < count);
            }
            assert_eq!(status_index(0, count), 0);
            assert_eq!(status_index(100, count), count.saturating_sub(1));
        }
    }

    #[test]
    fn test_status_index_bands_for_nine_messages() {
        assert_eq!(status_index(12, 9), 0);
        assert_eq!(status_index(13, 9), 1);
        assert_eq!(status_index(50, 9), 4);
        assert_eq!(status_index(99, 9), 7);
    }

    #[test]
    fn test_remaining_seconds_estimate() {
        let total = Duration::from_secs(3);
        assert_eq!(remaining_seconds(0, total), 3);
        assert_eq!(remaining_seconds(50, total), 2);
        assert_eq!(remaining_seconds(90, total), 0);
        assert_eq!(remaining_seconds(100, total), 0);
    }

    #[test]
    fn test_display_percent_clamps() {
        assert_eq!(display_percent(-1.0), 0);
        assert_eq!(display_percent(33.4), 33);
        assert_eq!(display_percent(99.6), 100);
        assert_eq!(display_percent(140.0), 100);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ProgressConfig {
            messages: vec![],
            ..Default::default()
        };
        assert!(matches!(ProgressSimulator::new(config), Err(InsightError::Config(_))));

        let config = ProgressConfig {
            tick: Duration::ZERO,
            ..Default::default()
        };
        assert!(ProgressSimulator::new(config).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_is_monotonic_and_completes_once() {
        let config = ProgressConfig::default();
        let steps = config.steps().ceil() as usize;
        let messages = config.messages.clone();
        let mut simulator = ProgressSimulator::new(config).unwrap();

        let mut ticks = Vec::new();
        let mut completions = 0;
        let output = simulator
            .run(
                "payload",
                |tick| ticks.push(tick.clone()),
                |result| {
                    completions += 1;
                    result.len()
                },
            )
            .await
            .unwrap();

        assert_eq!(output, 7);
        assert_eq!(completions, 1);
        assert_eq!(simulator.state(), SimulatorState::Complete);

        assert_eq!(ticks[0].percent, 0);
        assert_eq!(ticks[0].remaining_seconds, 3);
        assert_eq!(ticks[0].message, messages[0]);
        assert!(ticks.windows(2).all(|w| w[0].percent <= w[1].percent));

        let last = ticks.last().unwrap();
        assert_eq!(last.percent, 100);
        assert_eq!(last.remaining_seconds, 0);
        assert_eq!(&last.message, messages.last().unwrap());
        // initial snapshot plus one report per tick
        assert!(ticks.len() - 1 <= steps + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_takes_configured_duration_plus_settle() {
        let mut simulator = ProgressSimulator::new(ProgressConfig::default()).unwrap();
        let started = Instant::now();
        simulator.run((), |_| {}, |_| ()).await.unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(3500));
        assert!(elapsed < Duration::from_millis(3700));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_run_is_rejected() {
        let mut simulator = ProgressSimulator::new(ProgressConfig::default()).unwrap();
        simulator.run((), |_| {}, |_| ()).await.unwrap();
        let err = simulator.run((), |_| {}, |_| ()).await.unwrap_err();
        assert!(matches!(err, InsightError::Simulator(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_with_fallback_substitutes_missing_data() {
        let mut simulator = ProgressSimulator::new(ProgressConfig::default()).unwrap();
        let value = simulator
            .run_with_fallback(None, || "fallback".to_string(), |_| {}, |v| v)
            .await
            .unwrap();
        assert_eq!(value, "fallback");

        let mut simulator = ProgressSimulator::new(ProgressConfig::default()).unwrap();
        let value = simulator
            .run_with_fallback(Some("real".to_string()), || "fallback".to_string(), |_| {}, |v| v)
            .await
            .unwrap();
        assert_eq!(value, "real");
    }
}
