//! Fallback / recovery shell.
//!
//! ```text
//! Probing ──► Supported ──(lost)──► ContextLost ──(restored)──► Supported
//!    └──────► Unsupported
//! ```
//!
//! The shell owns the scene while 3D is available and a static backdrop for
//! every other state. A restored context always gets a fresh scene (reset
//! governor, regenerated field), never the stale one.

use crate::{
    backdrop::StaticBackdrop,
    config::HeroConfig,
    device::{probe, CapabilitySource, DeviceProfile},
    kernel::PointerState,
    scene::{FrameTick, HeroScene},
    theme::Theme,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    PointerMove,
    ContextLost,
    ContextRestored,
}

const LISTENERS: [ListenerKind; 3] = [
    ListenerKind::PointerMove,
    ListenerKind::ContextLost,
    ListenerKind::ContextRestored,
];

/// The hosting page, as seen from the shell.
///
/// Listeners are registered on mount and released when the shell drops.
pub trait HostPage {
    fn listen(&mut self, _kind: ListenerKind) {}
    fn unlisten(&mut self, _kind: ListenerKind) {}
    fn context_lost(&mut self) {}
    fn context_restored(&mut self) {}
}

impl HostPage for () {}

/// A context-lost notification from the host.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ContextEvent {
    default_prevented: bool,
}

impl ContextEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals that the shell intends to recover the context.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    Probing,
    Supported,
    Unsupported,
    ContextLost,
}

impl ShellState {
    pub fn name(self) -> &'static str {
        match self {
            Self::Probing => "probing",
            Self::Supported => "supported",
            Self::Unsupported => "unsupported",
            Self::ContextLost => "context-lost",
        }
    }
}

/// What the host should draw this frame.
pub enum FrameOutput<'a> {
    Scene(&'a HeroScene),
    Backdrop(&'a StaticBackdrop),
}

pub struct HeroShell<H: HostPage> {
    host: H,
    config: HeroConfig,
    state: ShellState,
    profile: Option<DeviceProfile>,
    scene: Option<HeroScene>,
    backdrop: StaticBackdrop,
    generation: u64,
    seeds: StdRng,
    listening: Vec<ListenerKind>,
}

impl<H: HostPage> HeroShell<H> {
    pub fn mount(host: H, config: HeroConfig, source: &dyn CapabilitySource) -> Self {
        Self::mount_with_rng(host, config, source, StdRng::from_entropy())
    }

    /// Mount with reproducible field generation.
    pub fn mount_seeded(
        host: H,
        config: HeroConfig,
        source: &dyn CapabilitySource,
        seed: u64,
    ) -> Self {
        Self::mount_with_rng(host, config, source, StdRng::seed_from_u64(seed))
    }

    fn mount_with_rng(
        host: H,
        config: HeroConfig,
        source: &dyn CapabilitySource,
        seeds: StdRng,
    ) -> Self {
        let mut shell = Self {
            host,
            backdrop: StaticBackdrop::for_theme(config.theme),
            config,
            state: ShellState::Probing,
            profile: None,
            scene: None,
            generation: 0,
            seeds,
            listening: Vec::with_capacity(LISTENERS.len()),
        };
        for kind in LISTENERS {
            shell.host.listen(kind);
            shell.listening.push(kind);
        }
        shell.enter_probe(source);
        shell
    }

    fn enter_probe(&mut self, source: &dyn CapabilitySource) {
        self.state = ShellState::Probing;
        let profile = probe(source);
        if profile.has_context() {
            let seed = self.seeds.gen();
            self.scene = Some(HeroScene::new(self.config.clone(), profile, seed));
            self.state = ShellState::Supported;
        } else {
            self.scene = None;
            self.state = ShellState::Unsupported;
        }
        self.profile = Some(profile);
        tracing::info!(
            state = self.state.name(),
            generation = self.generation,
            "Hero shell mounted"
        );
    }

    /// Advances the scene if one is mounted and says what to draw.
    pub fn tick(&mut self, tick: FrameTick, pointer: PointerState) -> FrameOutput<'_> {
        if self.state == ShellState::Supported {
            if let Some(scene) = self.scene.as_mut() {
                scene.tick(tick, pointer);
                return FrameOutput::Scene(scene);
            }
        }
        FrameOutput::Backdrop(&self.backdrop)
    }

    /// Stops drawing immediately; the scene is dropped, not paused.
    pub fn handle_context_lost(&mut self, event: &mut ContextEvent) {
        event.prevent_default();
        if self.state != ShellState::Supported {
            return;
        }
        if let Some(scene) = self.scene.take() {
            self.config = scene.config().clone();
        }
        self.state = ShellState::ContextLost;
        tracing::warn!(generation = self.generation, "Rendering context lost");
        self.host.context_lost();
    }

    /// Re-probes and mounts a fresh scene.
    pub fn handle_context_restored(&mut self, source: &dyn CapabilitySource) {
        if self.state != ShellState::ContextLost {
            return;
        }
        self.generation += 1;
        self.enter_probe(source);
        if self.state == ShellState::Supported {
            self.host.context_restored();
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.config.theme = theme;
        self.backdrop = StaticBackdrop::for_theme(theme);
        if let Some(scene) = self.scene.as_mut() {
            scene.set_theme(theme);
        }
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.config.interactive = interactive;
        if let Some(scene) = self.scene.as_mut() {
            scene.set_interactive(interactive);
        }
    }

    pub fn set_requested_particles(&mut self, count: u32) {
        self.config.requested_particles = count;
        if let Some(scene) = self.scene.as_mut() {
            scene.set_requested_particles(count);
        }
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    pub fn profile(&self) -> Option<&DeviceProfile> {
        self.profile.as_ref()
    }

    pub fn scene(&self) -> Option<&HeroScene> {
        self.scene.as_ref()
    }

    pub fn backdrop(&self) -> &StaticBackdrop {
        &self.backdrop
    }

    pub fn config(&self) -> &HeroConfig {
        &self.config
    }

    /// Number of context restorations so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<H: HostPage> Drop for HeroShell<H> {
    fn drop(&mut self) {
        for kind in self.listening.drain(..) {
            self.host.unlisten(kind);
        }
    }
}
