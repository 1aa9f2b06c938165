use hero_field::{
    CapabilitySource, ContextEvent, FrameOutput, FrameTick, HeroConfig, HeroShell, HostPage,
    ListenerKind, PerformanceTier, PointerState, ProbeError, RenderCapabilities, ShellState, Theme,
};
use std::{cell::RefCell, rc::Rc};

#[derive(Debug, Clone, PartialEq)]
enum HostCall {
    Listen(ListenerKind),
    Unlisten(ListenerKind),
    Lost,
    Restored,
}

#[derive(Clone, Default)]
struct RecordingHost(Rc<RefCell<Vec<HostCall>>>);

impl RecordingHost {
    fn calls(&self) -> Vec<HostCall> {
        self.0.borrow().clone()
    }
}

impl HostPage for RecordingHost {
    fn listen(&mut self, kind: ListenerKind) {
        self.0.borrow_mut().push(HostCall::Listen(kind));
    }

    fn unlisten(&mut self, kind: ListenerKind) {
        self.0.borrow_mut().push(HostCall::Unlisten(kind));
    }

    fn context_lost(&mut self) {
        self.0.borrow_mut().push(HostCall::Lost);
    }

    fn context_restored(&mut self) {
        self.0.borrow_mut().push(HostCall::Restored);
    }
}

struct Gpu(Option<RenderCapabilities>);

impl Gpu {
    fn high() -> Self {
        Gpu(Some(RenderCapabilities {
            api_version: 2,
            max_texture_size: 8192,
            float_textures: true,
            instanced_arrays: true,
        }))
    }

    fn none() -> Self {
        Gpu(None)
    }
}

impl CapabilitySource for Gpu {
    fn user_agent(&self) -> Option<String> {
        None
    }

    fn query(&self) -> Result<RenderCapabilities, ProbeError> {
        self.0.ok_or(ProbeError::NoAdapter)
    }
}

fn frame(i: u32) -> FrameTick {
    FrameTick {
        now_ms: i as f64 * 16.0,
        delta_s: 0.016,
    }
}

#[test]
fn capable_device_mounts_a_scene() {
    let host = RecordingHost::default();
    let mut shell = HeroShell::mount_seeded(host.clone(), HeroConfig::default(), &Gpu::high(), 1);

    assert_eq!(shell.state(), ShellState::Supported);
    assert_eq!(
        shell.profile().map(|p| p.performance_tier),
        Some(PerformanceTier::High)
    );
    match shell.tick(frame(0), PointerState::CENTER) {
        FrameOutput::Scene(scene) => assert_eq!(scene.field().len(), 1000),
        FrameOutput::Backdrop(_) => panic!("expected a scene"),
    }
    assert_eq!(
        host.calls(),
        vec![
            HostCall::Listen(ListenerKind::PointerMove),
            HostCall::Listen(ListenerKind::ContextLost),
            HostCall::Listen(ListenerKind::ContextRestored),
        ]
    );
}

#[test]
fn missing_context_falls_back_to_backdrop() {
    let mut shell = HeroShell::mount_seeded((), HeroConfig::default(), &Gpu::none(), 1);
    assert_eq!(shell.state(), ShellState::Unsupported);
    assert!(shell.scene().is_none());
    assert!(matches!(
        shell.tick(frame(0), PointerState::CENTER),
        FrameOutput::Backdrop(_)
    ));

    // Restore events are ignored outside ContextLost.
    shell.handle_context_restored(&Gpu::high());
    assert_eq!(shell.state(), ShellState::Unsupported);
}

#[test]
fn context_loss_and_restore_remounts_fresh_state() {
    let host = RecordingHost::default();
    let mut shell = HeroShell::mount_seeded(host.clone(), HeroConfig::default(), &Gpu::high(), 7);

    // Run slowly long enough for the governor to back off.
    for i in 0..200 {
        shell.tick(
            FrameTick {
                now_ms: i as f64 * 50.0,
                delta_s: 0.05,
            },
            PointerState::new(0.7, 0.4),
        );
    }
    let degraded = shell.scene().map(|s| s.governor().quality_level()).unwrap();
    assert!(degraded < 1.0);

    let mut lost = ContextEvent::new();
    shell.handle_context_lost(&mut lost);
    assert!(lost.default_prevented());
    assert_eq!(shell.state(), ShellState::ContextLost);
    assert!(shell.scene().is_none());
    assert!(matches!(
        shell.tick(frame(1), PointerState::CENTER),
        FrameOutput::Backdrop(_)
    ));

    shell.handle_context_restored(&Gpu::high());
    assert_eq!(shell.state(), ShellState::Supported);
    assert_eq!(shell.generation(), 1);
    let scene = shell.scene().unwrap();
    assert_eq!(scene.governor().quality_level(), 1.0);
    assert_eq!(scene.epoch(), 1);
    assert_eq!(scene.field().len(), 1000);
    assert_eq!(scene.elapsed(), 0.0);

    let calls = host.calls();
    assert!(calls.ends_with(&[HostCall::Lost, HostCall::Restored]));
}

#[test]
fn repeated_loss_events_are_harmless() {
    let host = RecordingHost::default();
    let mut shell = HeroShell::mount_seeded(host.clone(), HeroConfig::default(), &Gpu::high(), 3);

    let mut first = ContextEvent::new();
    let mut second = ContextEvent::new();
    shell.handle_context_lost(&mut first);
    shell.handle_context_lost(&mut second);
    assert!(second.default_prevented());
    assert_eq!(
        host.calls().iter().filter(|c| **c == HostCall::Lost).count(),
        1
    );
}

#[test]
fn restore_without_a_context_stays_on_backdrop() {
    let mut shell = HeroShell::mount_seeded((), HeroConfig::default(), &Gpu::high(), 3);
    shell.handle_context_lost(&mut ContextEvent::new());
    shell.handle_context_restored(&Gpu::none());
    assert_eq!(shell.state(), ShellState::Unsupported);
}

#[test]
fn settings_survive_context_loss() {
    let mut shell = HeroShell::mount_seeded((), HeroConfig::default(), &Gpu::high(), 5);
    shell.set_theme(Theme::Neon);
    shell.set_interactive(false);
    shell.set_requested_particles(300);

    shell.handle_context_lost(&mut ContextEvent::new());
    shell.handle_context_restored(&Gpu::high());

    let scene = shell.scene().unwrap();
    assert_eq!(scene.config().theme, Theme::Neon);
    assert!(!scene.config().interactive);
    assert_eq!(scene.field().len(), 300);
    assert_eq!(shell.backdrop(), &hero_field::StaticBackdrop::for_theme(Theme::Neon));
}

#[test]
fn dropping_the_shell_releases_listeners() {
    let host = RecordingHost::default();
    {
        let _shell = HeroShell::mount_seeded(host.clone(), HeroConfig::default(), &Gpu::none(), 1);
    }
    let calls = host.calls();
    for kind in [
        ListenerKind::PointerMove,
        ListenerKind::ContextLost,
        ListenerKind::ContextRestored,
    ] {
        assert!(calls.contains(&HostCall::Unlisten(kind)));
    }
}
