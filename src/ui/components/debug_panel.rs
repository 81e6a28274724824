//! Debug panel component
//!
//! Displays session internals and the recent event log.

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText, ScrollArea};

/// Debug panel component
pub struct DebugPanel<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> DebugPanel<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let model = self.state.session.model();

        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new("Debug Panel")
                                .strong()
                                .color(self.theme.text_primary),
                        );

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(
                                RichText::new(format!("{:.1} FPS", self.state.fps))
                                    .size(12.0)
                                    .family(egui::FontFamily::Monospace)
                                    .color(self.fps_color()),
                            );
                        });
                    });

                    ui.separator();

                    let permission = if self.state.session.permission().granted {
                        "Granted"
                    } else {
                        "Not granted"
                    };

                    egui::Grid::new("debug_stats")
                        .num_columns(2)
                        .spacing([20.0, 4.0])
                        .show(ui, |ui| {
                            self.stat_row(ui, "Session", &model.session.to_string());
                            self.stat_row(ui, "Connection", &model.phase.to_string());
                            self.stat_row(ui, "Microphone", permission);
                            self.stat_row(ui, "Messages", &model.messages.len().to_string());
                            let last = model
                                .messages
                                .last()
                                .map(|m| format!("{}: {}", m.role, m.text))
                                .unwrap_or_default();
                            self.stat_row(ui, "Last message", &last);
                            self.stat_row(ui, "Audio chunks", &model.audio_chunks.to_string());
                            self.stat_row(ui, "Partial", &model.partial_transcript);
                        });

                    ui.add_space(self.theme.spacing_sm);
                    ui.separator();

                    ui.label(
                        RichText::new("Recent Events")
                            .size(12.0)
                            .strong()
                            .color(self.theme.text_secondary),
                    );

                    ScrollArea::vertical()
                        .id_salt("event_log")
                        .max_height(160.0)
                        .auto_shrink([false, false])
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            ui.vertical(|ui| {
                                for entry in model.log.entries() {
                                    ui.label(
                                        RichText::new(entry)
                                            .size(11.0)
                                            .family(egui::FontFamily::Monospace)
                                            .color(self.theme.text_muted),
                                    );
                                }

                                if model.log.is_empty() {
                                    ui.label(
                                        RichText::new("No events yet")
                                            .size(11.0)
                                            .color(self.theme.text_muted)
                                            .italics(),
                                    );
                                }
                            });
                        });
                });
            });
    }

    fn stat_row(&self, ui: &mut egui::Ui, label: &str, value: &str) {
        ui.label(RichText::new(label).size(12.0).color(self.theme.text_muted));

        let display_value = if value.is_empty() { "—" } else { value };

        ui.label(
            RichText::new(display_value)
                .size(12.0)
                .family(egui::FontFamily::Monospace)
                .color(self.theme.text_primary),
        );

        ui.end_row();
    }

    fn fps_color(&self) -> egui::Color32 {
        let fps = self.state.fps;
        if fps >= 55.0 {
            self.theme.success
        } else if fps >= 30.0 {
            self.theme.warning
        } else {
            self.theme.error
        }
    }
}
