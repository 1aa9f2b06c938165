//! Frame-rate feedback controller.
//!
//! Frames are counted over ~1 s windows; the count becomes the measured FPS.
//! Every frame whose cooldown has expired compares that measurement with the
//! target and nudges the quality level: down by 0.1 when below 80 % of target,
//! up by 0.05 when above 95 %. The cooldown is counted in frames.

pub const MIN_QUALITY: f32 = 0.3;
pub const MAX_QUALITY: f32 = 1.0;

const WINDOW_MS: f64 = 1000.0;
const DECREASE_STEP: f32 = 0.1;
const INCREASE_STEP: f32 = 0.05;
const DECREASE_COOLDOWN_FRAMES: i32 = 60;
const INCREASE_COOLDOWN_FRAMES: i32 = 120;

#[derive(Debug, Clone)]
pub struct QualityGovernor {
    frame_count: u32,
    window_start_ms: Option<f64>,
    measured_fps: f32,
    target_fps: f32,
    quality_level: f32,
    cooldown_frames: i32,
}

impl Default for QualityGovernor {
    fn default() -> Self {
        Self::new(60.0)
    }
}

impl QualityGovernor {
    pub fn new(target_fps: f32) -> Self {
        Self {
            frame_count: 0,
            window_start_ms: None,
            measured_fps: target_fps,
            target_fps,
            quality_level: MAX_QUALITY,
            cooldown_frames: 0,
        }
    }

    /// Records one rendered frame and returns the current quality level.
    pub fn update(&mut self, now_ms: f64) -> f32 {
        self.frame_count += 1;

        match self.window_start_ms {
            // The opening frame marks the window start; it is not counted.
            None => {
                self.window_start_ms = Some(now_ms);
                self.frame_count = 0;
            }
            Some(start) if now_ms - start >= WINDOW_MS => {
                self.measured_fps = self.frame_count as f32;
                self.frame_count = 0;
                self.window_start_ms = Some(now_ms);
            }
            Some(_) => {}
        }

        if self.cooldown_frames <= 0 {
            if self.measured_fps < self.target_fps * 0.8 {
                self.quality_level = (self.quality_level - DECREASE_STEP).max(MIN_QUALITY);
                self.cooldown_frames = DECREASE_COOLDOWN_FRAMES;
                tracing::debug!(
                    fps = self.measured_fps,
                    level = self.quality_level,
                    "Lowering render quality"
                );
            } else if self.measured_fps > self.target_fps * 0.95 && self.quality_level < MAX_QUALITY
            {
                self.quality_level = (self.quality_level + INCREASE_STEP).min(MAX_QUALITY);
                self.cooldown_frames = INCREASE_COOLDOWN_FRAMES;
                tracing::debug!(
                    fps = self.measured_fps,
                    level = self.quality_level,
                    "Raising render quality"
                );
            }
        } else {
            self.cooldown_frames -= 1;
        }

        self.quality_level
    }

    /// Back to full quality with clean counters, as on a fresh mount.
    pub fn reset(&mut self) {
        *self = Self::new(self.target_fps);
    }

    pub fn quality_level(&self) -> f32 {
        self.quality_level
    }

    pub fn measured_fps(&self) -> f32 {
        self.measured_fps
    }

    pub fn target_fps(&self) -> f32 {
        self.target_fps
    }

    pub fn bucket(&self) -> QualityBucket {
        QualityBucket::from_level(self.quality_level)
    }
}

/// Quality level quantised to tenths (3..=10).
///
/// The governor moves in 0.1/0.05 steps; consumers that rebuild expensive
/// state (the particle field) only react when the bucket changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualityBucket(u8);

impl QualityBucket {
    pub const FULL: QualityBucket = QualityBucket(10);

    pub fn from_level(level: f32) -> Self {
        let level = level.clamp(MIN_QUALITY, MAX_QUALITY);
        // Round away float noise (0.3 may arrive as 0.29999998) before flooring.
        let tenths = ((level * 100.0).round() / 10.0).floor() as u8;
        Self(tenths.clamp(3, 10))
    }

    pub fn tenths(self) -> u8 {
        self.0
    }

    /// Particle count this bucket asks for (`level · 1000`).
    pub fn particle_count(self) -> u32 {
        self.0 as u32 * 100
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feeds `seconds` worth of frames at `fps` and returns every level seen.
    fn run(gov: &mut QualityGovernor, clock_ms: &mut f64, fps: f64, seconds: f64) -> Vec<f32> {
        let frame_ms = 1000.0 / fps;
        let frames = (seconds * fps).round() as usize;
        (0..frames)
            .map(|_| {
                *clock_ms += frame_ms;
                gov.update(*clock_ms)
            })
            .collect()
    }

    fn changes(levels: &[f32], start: f32) -> Vec<f32> {
        let mut prev = start;
        let mut out = Vec::new();
        for &l in levels {
            if l != prev {
                out.push(l - prev);
                prev = l;
            }
        }
        out
    }

    #[test]
    fn holds_full_quality_at_target() {
        let mut gov = QualityGovernor::new(60.0);
        let mut clock = 0.0;
        let levels = run(&mut gov, &mut clock, 60.0, 5.0);
        assert!(levels.iter().all(|&l| l == 1.0));
        assert!((gov.measured_fps() - 60.0).abs() <= 1.0);
    }

    #[test]
    fn degrades_under_sustained_half_rate_then_recovers() {
        let mut gov = QualityGovernor::new(60.0);
        let mut clock = 0.0;

        let slow = run(&mut gov, &mut clock, 30.0, 3.0);
        let drops = changes(&slow, 1.0);
        assert!(!drops.is_empty());
        assert!(drops.iter().all(|d| (d + 0.1).abs() < 1e-5), "{drops:?}");
        assert!(slow.iter().all(|&l| l >= MIN_QUALITY));
        assert!(slow.windows(2).all(|w| w[1] <= w[0]));
        let after_slow = gov.quality_level();
        assert!(after_slow < 1.0);

        let fast = run(&mut gov, &mut clock, 60.0, 5.0);
        let lowest = fast.iter().copied().fold(after_slow, f32::min);
        // The stale slow-window measurement may still pull quality down at first.
        let bottom = fast.iter().rposition(|&l| l == lowest).unwrap();
        let rises = changes(&fast[bottom..], lowest);
        assert!(!rises.is_empty(), "quality never recovered");
        assert!(rises.iter().all(|d| (d - 0.05).abs() < 1e-5), "{rises:?}");
        assert!(fast.iter().all(|&l| l <= MAX_QUALITY));
        assert!(gov.quality_level() > lowest);
    }

    #[test]
    fn steady_rate_measures_exactly() {
        let mut gov = QualityGovernor::new(60.0);
        let mut clock = 0.0;
        let mut measured = Vec::new();
        // 20 ms frames land exactly on window boundaries.
        for _ in 0..250 {
            clock += 20.0;
            gov.update(clock);
            if measured.last() != Some(&gov.measured_fps()) {
                measured.push(gov.measured_fps());
            }
        }
        assert_eq!(measured, vec![60.0, 50.0]);
    }

    #[test]
    fn never_drops_below_floor() {
        let mut gov = QualityGovernor::new(60.0);
        let mut clock = 0.0;
        let levels = run(&mut gov, &mut clock, 10.0, 120.0);
        assert!(levels.iter().all(|&l| l >= MIN_QUALITY));
        assert!((gov.quality_level() - MIN_QUALITY).abs() < 1e-6);
    }

    #[test]
    fn reset_restores_full_quality() {
        let mut gov = QualityGovernor::new(60.0);
        let mut clock = 0.0;
        run(&mut gov, &mut clock, 20.0, 4.0);
        assert!(gov.quality_level() < 1.0);

        gov.reset();
        assert_eq!(gov.quality_level(), 1.0);
        assert_eq!(gov.measured_fps(), 60.0);
        assert_eq!(gov.update(clock + 1.0), 1.0);
    }

    #[test]
    fn bucket_quantises_to_tenths() {
        assert_eq!(QualityBucket::from_level(1.0), QualityBucket::FULL);
        assert_eq!(QualityBucket::from_level(0.95).tenths(), 9);
        assert_eq!(QualityBucket::from_level(0.29999998).tenths(), 3);
        assert_eq!(QualityBucket::from_level(0.7000001).particle_count(), 700);
        assert_eq!(QualityBucket::from_level(0.0).tenths(), 3);
    }
}
