//! egui overlay: HUD, scene controls and the static backdrop painter.

use hero_field::{HeroShell, HostPage, ShellState, StaticBackdrop, Theme};

/// Snapshot of what the HUD shows for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HudStats {
    pub state: &'static str,
    pub tier: Option<&'static str>,
    pub measured_fps: Option<f32>,
    pub quality: Option<f32>,
    pub particles: Option<usize>,
    pub generation: u64,
}

impl HudStats {
    pub fn from_shell<H: HostPage>(shell: &HeroShell<H>) -> Self {
        let scene = shell.scene();
        Self {
            state: shell.state().name(),
            tier: shell.profile().map(|p| p.performance_tier.name()),
            measured_fps: scene.map(|s| s.governor().measured_fps()),
            quality: scene.map(|s| s.governor().quality_level()),
            particles: scene.map(|s| s.field().len()),
            generation: shell.generation(),
        }
    }
}

/// Control changes requested through the UI this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UiActions {
    pub theme: Option<Theme>,
    pub interactive: Option<bool>,
    pub lose_context: bool,
    pub restore_context: bool,
}

pub fn draw_hud(ctx: &egui::Context, stats: &HudStats) {
    egui::Area::new(egui::Id::new("hero_hud"))
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(12.0, 12.0))
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.monospace(format!("state      {}", stats.state));
                ui.monospace(format!("tier       {}", stats.tier.unwrap_or("-")));
                match (stats.measured_fps, stats.quality, stats.particles) {
                    (Some(fps), Some(quality), Some(particles)) => {
                        ui.monospace(format!("fps        {fps:.1}"));
                        ui.monospace(format!("quality    {quality:.2}"));
                        ui.monospace(format!("particles  {particles}"));
                    }
                    _ => {
                        ui.monospace("no 3D scene");
                    }
                }
                if stats.generation > 0 {
                    ui.monospace(format!("restored   {}x", stats.generation));
                }
            });
        });
}

pub fn draw_controls(
    ctx: &egui::Context,
    theme: Theme,
    interactive: bool,
    state: ShellState,
) -> UiActions {
    let mut actions = UiActions::default();
    egui::Window::new("Hero")
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            let mut selected = theme;
            egui::ComboBox::from_label("Theme")
                .selected_text(selected.name())
                .show_ui(ui, |ui| {
                    for t in Theme::ALL {
                        ui.selectable_value(&mut selected, t, t.name());
                    }
                });
            if selected != theme {
                actions.theme = Some(selected);
            }

            let mut checked = interactive;
            if ui.checkbox(&mut checked, "Interactive").changed() {
                actions.interactive = Some(checked);
            }

            ui.separator();
            ui.horizontal(|ui| {
                let lose = ui.add_enabled(
                    state == ShellState::Supported,
                    egui::Button::new("Lose context"),
                );
                actions.lose_context = lose.clicked();
                let restore = ui.add_enabled(
                    state == ShellState::ContextLost,
                    egui::Button::new("Restore context"),
                );
                actions.restore_context = restore.clicked();
            });
        });
    actions
}

/// Paints the CSS-style floating shapes behind every other egui layer.
pub fn paint_backdrop(ctx: &egui::Context, backdrop: &StaticBackdrop, t: f32) {
    let painter = ctx.layer_painter(egui::LayerId::background());
    let screen = ctx.screen_rect();
    for shape in &backdrop.shapes {
        let [r, g, b] = shape.color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        let alpha = (shape.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        let radius = shape.size_px * 0.5;
        let center = egui::pos2(
            screen.left() + screen.width() * shape.left_pct / 100.0 + radius,
            screen.top() + screen.height() * shape.top_pct / 100.0 + radius + shape.offset_y(t),
        );
        painter.circle_filled(
            center,
            radius,
            egui::Color32::from_rgba_unmultiplied(r, g, b, alpha),
        );
    }
}
