//! Message list component
//!
//! Displays the finalized transcript and, while a session is live, the
//! in-progress partial transcript.

use crate::messages::{Message, Role};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Align, Color32, RichText, Vec2};

/// Accessibility label prefix of the in-progress transcript
pub const PARTIAL_LABEL_PREFIX: &str = "Partial transcript: ";

/// Message list component
pub struct MessageList<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let model = self.state.session.model();
        let messages = model.messages.get_all();
        let partial = if model.is_listening() {
            Some(model.partial_transcript.as_str()).filter(|p| !p.is_empty())
        } else {
            None
        };

        egui::ScrollArea::vertical()
            .id_salt("transcript")
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.add_space(self.theme.spacing);

                    if messages.is_empty() && partial.is_none() {
                        self.show_empty_state(ui);
                    } else {
                        for message in &messages {
                            ui.push_id(message.id, |ui| self.show_message(ui, message));
                            ui.add_space(self.theme.spacing_sm);
                        }

                        if let Some(partial) = partial {
                            self.show_partial(ui, partial);
                        }
                    }

                    ui.add_space(self.theme.spacing);
                });
            });
    }

    fn show_empty_state(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(100.0);

            ui.label(
                RichText::new("No conversation yet")
                    .size(22.0)
                    .color(self.theme.text_primary),
            );

            ui.add_space(self.theme.spacing_sm);

            ui.label(
                RichText::new("Press Start (or Space) and talk to the agent.")
                    .size(14.0)
                    .color(self.theme.text_muted),
            );
        });
    }

    fn show_message(&self, ui: &mut egui::Ui, message: &Message) {
        let is_user = message.role.is_user();
        let bubble_color = if is_user {
            self.theme.user_bubble
        } else {
            self.theme.agent_bubble
        };
        let text_color = if is_user {
            Color32::WHITE
        } else {
            self.theme.text_primary
        };
        let align = if is_user { Align::RIGHT } else { Align::LEFT };

        ui.with_layout(egui::Layout::top_down(align), |ui| {
            ui.label(
                RichText::new(sender_label(message.role))
                    .size(12.0)
                    .color(self.theme.text_muted),
            );

            ui.add_space(2.0);

            let max_width = ui.available_width() * 0.75;

            egui::Frame::none()
                .fill(bubble_color)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);
                    let response = ui.label(RichText::new(&message.text).color(text_color));
                    let accessible = accessible_label(message);
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &accessible)
                    });
                });

            let time_str = message.timestamp.format("%H:%M").to_string();
            ui.label(RichText::new(time_str).size(10.0).color(self.theme.text_muted));
        });
    }

    /// Unfinalized speech, rendered with less emphasis than real messages
    fn show_partial(&self, ui: &mut egui::Ui, partial: &str) {
        ui.with_layout(egui::Layout::top_down(Align::RIGHT), |ui| {
            let max_width = ui.available_width() * 0.75;

            egui::Frame::none()
                .stroke(egui::Stroke::new(1.0, self.theme.bg_tertiary))
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);
                    ui.spacing_mut().item_spacing = Vec2::splat(4.0);
                    let response = ui.label(
                        RichText::new(partial)
                            .italics()
                            .color(self.theme.text_muted),
                    );
                    let accessible = format!("{}{}", PARTIAL_LABEL_PREFIX, partial);
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &accessible)
                    });
                });
        });
    }
}

fn sender_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Agent => "Agent",
    }
}

fn accessible_label(message: &Message) -> String {
    match message.role {
        Role::User => format!("User message: {}", message.text),
        Role::Agent => format!("Agent response: {}", message.text),
    }
}
