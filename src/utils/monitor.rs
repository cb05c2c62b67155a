//! Process resource sampling for long headless simulation runs.

#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// One sample taken at the end of a simulation phase.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy)]
pub struct PhaseSample {
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed: Duration,
    pub frames: u64,
}

#[cfg(feature = "cli")]
impl PhaseSample {
    pub fn frames_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.frames as f64 / secs
        } else {
            0.0
        }
    }
}

#[cfg(feature = "cli")]
pub struct SystemMonitor {
    system: System,
    // None 代表監控關閉
    pid: Option<Pid>,
    started: Instant,
    peak_memory_mb: u64,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = if enabled {
            sysinfo::get_current_pid()
                .map_err(|e| tracing::warn!("⚠️ Cannot resolve own PID, monitoring off: {}", e))
                .ok()
        } else {
            None
        };

        Self {
            system: System::new(),
            pid,
            started: Instant::now(),
            peak_memory_mb: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.pid.is_some()
    }

    pub fn sample(&mut self, frames: u64) -> Option<PhaseSample> {
        let pid = self.pid?;
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_cpu().with_memory(),
        );
        let process = self.system.process(pid)?;

        let memory_mb = process.memory() / 1024 / 1024;
        self.peak_memory_mb = self.peak_memory_mb.max(memory_mb);

        Some(PhaseSample {
            cpu_usage: process.cpu_usage(),
            memory_mb,
            peak_memory_mb: self.peak_memory_mb,
            elapsed: self.started.elapsed(),
            frames,
        })
    }

    pub fn log_phase(&mut self, phase: &str, frames: u64) {
        if let Some(sample) = self.sample(frames) {
            tracing::info!(
                "📊 {} - CPU {:.1}%, memory {}MB (peak {}MB), {} frames at {:.0} fps",
                phase,
                sample.cpu_usage,
                sample.memory_mb,
                sample.peak_memory_mb,
                sample.frames,
                sample.frames_per_second()
            );
        }
    }

    pub fn log_summary(&mut self, frames: u64) {
        if let Some(sample) = self.sample(frames) {
            tracing::info!(
                "📊 Done in {:?}, peak memory {}MB, {:.0} fps",
                sample.elapsed,
                sample.peak_memory_mb,
                sample.frames_per_second()
            );
        }
    }
}

// 沒有 cli feature 時不取樣
#[cfg(not(feature = "cli"))]
#[derive(Debug, Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn is_enabled(&self) -> bool {
        false
    }

    pub fn log_phase(&mut self, _phase: &str, _frames: u64) {}

    pub fn log_summary(&mut self, _frames: u64) {}
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_monitor_never_samples() {
        let mut monitor = SystemMonitor::new(false);
        assert!(!monitor.is_enabled());
        assert!(monitor.sample(10).is_none());
    }

    #[test]
    fn test_fps_without_elapsed_time_is_zero() {
        let sample = PhaseSample {
            cpu_usage: 0.0,
            memory_mb: 1,
            peak_memory_mb: 1,
            elapsed: Duration::ZERO,
            frames: 60,
        };
        assert_eq!(sample.frames_per_second(), 0.0);

        let sample = PhaseSample {
            elapsed: Duration::from_secs(2),
            ..sample
        };
        assert_eq!(sample.frames_per_second(), 30.0);
    }
}
