//! Main application struct and eframe integration

use crate::session::VoiceSession;
use crate::ui::components::{DebugPanel, InputBar, MessageList, StatusBar};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel};
use std::time::{Duration, Instant};
use tracing::info;

/// How often to poll client events while nothing else forces a repaint
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Main voice chat application
pub struct VoiceChatApp {
    state: AppState,
    theme: Theme,
    last_frame_time: Instant,
    initialized: bool,
}

impl VoiceChatApp {
    pub fn new(cc: &eframe::CreationContext<'_>, session: VoiceSession) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        Self {
            state: AppState::new(session),
            theme,
            last_frame_time: Instant::now(),
            initialized: false,
        }
    }

    fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        info!("[UI] Voice chat UI initialized");
        self.initialized = true;
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(egui::Frame::none().fill(self.theme.bg_secondary).inner_margin(12.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Voice Chat")
                            .size(20.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );

                    ui.add_space(self.theme.spacing);

                    StatusBar::new(
                        self.state.session.model(),
                        self.state.session.permission().granted,
                        &self.theme,
                    )
                    .show(ui);

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("🔍").on_hover_text("Toggle Debug Panel").clicked() {
                            self.state.show_debug_panel = !self.state.show_debug_panel;
                        }
                    });
                });
            });
    }

    fn show_error_banner(&mut self, ctx: &egui::Context) {
        let Some(error) = self.state.session.model().error.clone() else {
            return;
        };

        TopBottomPanel::top("error_banner")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.error.gamma_multiply(0.25))
                    .inner_margin(egui::Margin::symmetric(12.0, 8.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("⚠").color(self.theme.error));
                    ui.label(RichText::new(error).color(self.theme.text_primary));
                });
            });
    }

    fn show_input_area(&mut self, ctx: &egui::Context) {
        TopBottomPanel::bottom("input_area")
            .frame(egui::Frame::none().fill(self.theme.bg_primary).inner_margin(self.theme.spacing))
            .show(ctx, |ui| {
                InputBar::new(&mut self.state, &self.theme).show(ui);
            });
    }

    fn show_debug_panel(&mut self, ctx: &egui::Context) {
        if !self.state.show_debug_panel {
            return;
        }

        SidePanel::right("debug_panel")
            .resizable(true)
            .default_width(300.0)
            .min_width(250.0)
            .max_width(500.0)
            .frame(egui::Frame::none().fill(self.theme.bg_primary).inner_margin(self.theme.spacing))
            .show(ctx, |ui| {
                DebugPanel::new(&self.state, &self.theme).show(ui);
            });
    }

    fn show_content(&mut self, ctx: &egui::Context) {
        CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.bg_primary))
            .show(ctx, |ui| {
                MessageList::new(&self.state, &self.theme).show(ui);
            });
    }

    /// Space toggles the session unless a text field has focus
    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let space_pressed = ctx.input(|i| i.key_pressed(egui::Key::Space));
        let any_widget_focused = ctx.memory(|m| m.focused().is_some());
        if space_pressed && !any_widget_focused {
            self.state.toggle_session();
        }
    }
}

impl eframe::App for VoiceChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame_time).as_secs_f64();
        self.last_frame_time = now;
        self.state.update_fps(delta);

        self.initialize();

        self.state.session.poll_events();
        self.handle_shortcuts(ctx);

        self.show_header(ctx);
        self.show_error_banner(ctx);
        self.show_debug_panel(ctx);
        self.show_input_area(ctx);
        self.show_content(ctx);

        // Client events arrive off-thread; keep polling
        ctx.request_repaint_after(EVENT_POLL_INTERVAL);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("[UI] Voice chat shutting down");
        self.state.session.shutdown();
    }
}
