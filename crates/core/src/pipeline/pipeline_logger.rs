use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use crate::fare::domain::fare_policy::FareStatus;

use super::frame_report::{FaceOutcome, FrameReport, SkipReason};

const STATUS_ORDER: [FareStatus; 3] = [
    FareStatus::ChildDiscount,
    FareStatus::SeniorDiscount,
    FareStatus::NoDiscount,
];

const SKIP_ORDER: [(SkipReason, &str); 3] = [
    (SkipReason::BelowThreshold, "below threshold"),
    (SkipReason::DegenerateBox, "degenerate box"),
    (SkipReason::ClassificationFailed, "classification failed"),
];

/// Observer for validation loop events.
///
/// Keeps the loop independent of where its observations go (stdout,
/// log crate, nothing at all).
pub trait PipelineLogger: Send {
    /// Report frame-level progress. `total` is 0 for live sources.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named pipeline stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record the outcome of every detection in one frame.
    fn frame_report(&mut self, report: &FrameReport);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn frame_report(&mut self, _report: &FrameReport) {}
    fn info(&mut self, _message: &str) {}
}

/// Running count, sum and maximum of a series of samples.
///
/// Constant size however long the stream runs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunningStats {
    pub count: usize,
    pub sum: f64,
    pub max: f64,
}

impl RunningStats {
    pub fn record(&mut self, value: f64) {
        self.max = if self.count == 0 { value } else { self.max.max(value) };
        self.count += 1;
        self.sum += value;
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// CLI logger: per-stage timings, fare decision and skip tallies, and a
/// summary when the loop ends.
///
/// Progress lines are throttled to one every `throttle_frames` frames.
pub struct StdoutPipelineLogger {
    throttle_frames: usize,
    timings: BTreeMap<String, RunningStats>,
    faces_per_frame: RunningStats,
    statuses: HashMap<FareStatus, usize>,
    skips: HashMap<SkipReason, usize>,
    start_time: Instant,
    frames_seen: usize,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: BTreeMap::new(),
            faces_per_frame: RunningStats::default(),
            statuses: HashMap::new(),
            skips: HashMap::new(),
            start_time: Instant::now(),
            frames_seen: 0,
        }
    }

    pub fn timing_stats(&self, stage: &str) -> Option<RunningStats> {
        self.timings.get(stage).copied()
    }

    pub fn faces_per_frame(&self) -> RunningStats {
        self.faces_per_frame
    }

    pub fn status_count(&self, status: FareStatus) -> usize {
        self.statuses.get(&status).copied().unwrap_or(0)
    }

    pub fn skip_count(&self, reason: SkipReason) -> usize {
        self.skips.get(&reason).copied().unwrap_or(0)
    }

    /// Returns the formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.faces_per_frame.count == 0 {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let frames = self.frames_seen;
        let mut lines = vec![format!(
            "Validation summary ({frames} frames, {:.1}s total):",
            elapsed_ms / 1000.0
        )];

        for (stage, stats) in &self.timings {
            let pct = if elapsed_ms > 0.0 {
                stats.sum / elapsed_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!(
                "  {stage:10}: avg {:6.1}ms  max {:6.1}ms  ({pct:4.1}%)",
                stats.mean(),
                stats.max
            ));
        }

        if self.faces_per_frame.count > 0 {
            lines.push(format!(
                "  Faces per frame: avg {:.1}, max {}",
                self.faces_per_frame.mean(),
                self.faces_per_frame.max as usize
            ));
        }
        for status in STATUS_ORDER {
            lines.push(format!("  {status}: {}", self.status_count(status)));
        }
        for (reason, label) in SKIP_ORDER {
            let n = self.skip_count(reason);
            if n > 0 {
                lines.push(format!("  Skipped ({label}): {n}"));
            }
        }

        if frames > 0 && elapsed_ms > 0.0 {
            let fps = frames as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.frames_seen = self.frames_seen.max(current);
        if total == 0 {
            if current % self.throttle_frames == 0 {
                log::info!("Processing: {current} frames");
            }
        } else if current % self.throttle_frames == 0 || current == total {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Processing: {current}/{total} frames ({pct:.1}%)");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        match self.timings.get_mut(stage) {
            Some(stats) => stats.record(duration_ms),
            None => {
                let mut stats = RunningStats::default();
                stats.record(duration_ms);
                self.timings.insert(stage.to_string(), stats);
            }
        }
    }

    fn frame_report(&mut self, report: &FrameReport) {
        self.faces_per_frame.record(report.detection_count() as f64);
        for outcome in report.outcomes() {
            match outcome {
                FaceOutcome::Annotated(a) => {
                    *self.statuses.entry(a.decision.status).or_default() += 1;
                }
                FaceOutcome::Skipped { reason, .. } => {
                    *self.skips.entry(*reason).or_default() += 1;
                }
            }
        }
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
