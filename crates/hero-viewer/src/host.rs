//! The viewer window as seen by the hero shell.

use hero_field::{HostPage, ListenerKind};

/// Tracks which window callbacks the shell has asked for.
#[derive(Debug, Default)]
pub struct ViewerHost {
    listening: Vec<ListenerKind>,
    losses: u32,
    restores: u32,
}

impl ViewerHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer samples are only forwarded while the shell listens for them.
    pub fn tracks_pointer(&self) -> bool {
        self.listening.contains(&ListenerKind::PointerMove)
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    pub fn restores(&self) -> u32 {
        self.restores
    }
}

impl HostPage for ViewerHost {
    fn listen(&mut self, kind: ListenerKind) {
        if !self.listening.contains(&kind) {
            self.listening.push(kind);
        }
    }

    fn unlisten(&mut self, kind: ListenerKind) {
        self.listening.retain(|&k| k != kind);
    }

    fn context_lost(&mut self) {
        self.losses += 1;
        log::warn!("3D scene suspended; painting static backdrop");
    }

    fn context_restored(&mut self) {
        self.restores += 1;
        log::info!("3D scene restored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::context::NoContext;
    use hero_field::{HeroConfig, HeroShell};

    #[test]
    fn pointer_tracking_follows_shell_lifetime() {
        let shell =
            HeroShell::mount_seeded(ViewerHost::new(), HeroConfig::default(), &NoContext, 3);
        assert!(shell.host().tracks_pointer());
        drop(shell);

        let mut host = ViewerHost::new();
        host.listen(ListenerKind::PointerMove);
        host.unlisten(ListenerKind::PointerMove);
        assert!(!host.tracks_pointer());
    }
}
