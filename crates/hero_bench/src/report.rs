use hero_field::{HeroShell, HostPage, ShellState};
use serde::Serialize;

/// State of the scene at the end of one simulated second.
#[derive(Debug, Clone, Serialize)]
pub struct Sample {
    pub second: u32,
    pub frames: u64,
    pub measured_fps: f32,
    pub quality: f32,
    pub bucket: u8,
    pub particles: usize,
    pub epoch: u64,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub state: &'static str,
    pub tier: Option<&'static str>,
    pub particle_budget: Option<u32>,
    pub theme: &'static str,
    pub frames: u64,
    pub samples: Vec<Sample>,
}

impl Report {
    pub fn new<H: HostPage>(shell: &HeroShell<H>) -> Self {
        let profile = shell.profile();
        Self {
            state: shell.state().name(),
            tier: profile.map(|p| p.performance_tier.name()),
            particle_budget: profile.map(|p| p.particle_budget),
            theme: shell.config().theme.name(),
            frames: 0,
            samples: Vec::new(),
        }
    }

    /// Records a sample when the shell is showing a scene.
    pub fn sample<H: HostPage>(&mut self, shell: &HeroShell<H>, second: u32) {
        self.state = shell.state().name();
        if shell.state() != ShellState::Supported {
            return;
        }
        let Some(scene) = shell.scene() else {
            return;
        };
        let governor = scene.governor();
        self.samples.push(Sample {
            second,
            frames: self.frames,
            measured_fps: governor.measured_fps(),
            quality: governor.quality_level(),
            bucket: governor.bucket().tenths(),
            particles: scene.field().len(),
            epoch: scene.epoch(),
        });
    }
}
