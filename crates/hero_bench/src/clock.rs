use crate::config::Segment;
use hero_field::FrameTick;

/// Frame timestamps for a scripted schedule, one tick per simulated frame.
#[derive(Debug, Clone)]
pub struct SyntheticClock {
    segments: Vec<Segment>,
    segment: usize,
    frame_in_segment: u64,
    now_ms: f64,
}

impl SyntheticClock {
    pub fn new(segments: &[Segment]) -> Self {
        Self {
            segments: segments.to_vec(),
            segment: 0,
            frame_in_segment: 0,
            now_ms: 0.0,
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn frames_in(segment: &Segment) -> u64 {
        (segment.seconds * segment.fps).round() as u64
    }
}

impl Iterator for SyntheticClock {
    type Item = FrameTick;

    fn next(&mut self) -> Option<FrameTick> {
        loop {
            let segment = *self.segments.get(self.segment)?;
            if self.frame_in_segment < Self::frames_in(&segment) {
                let frame_ms = 1000.0 / segment.fps;
                let tick = FrameTick {
                    now_ms: self.now_ms,
                    delta_s: (frame_ms / 1000.0) as f32,
                };
                self.frame_in_segment += 1;
                self.now_ms += frame_ms;
                return Some(tick);
            }
            self.segment += 1;
            self.frame_in_segment = 0;
        }
    }
}
