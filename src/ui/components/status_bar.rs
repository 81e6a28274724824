//! Status bar component
//!
//! Color-coded indicators for microphone access, connection and session.

use crate::session::{ConnectionPhase, SessionModel};
use crate::ui::theme::Theme;
use crate::PERMISSION_DENIED_MESSAGE;
use egui::{self, Color32, RichText, Vec2};

/// Status of one indicator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndicatorStatus {
    /// Nothing happening (Orange)
    Waiting,
    /// Live (Green)
    Active,
    /// Failed (Red)
    Error,
}

/// A single status indicator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusIndicator {
    pub name: &'static str,
    pub status: IndicatorStatus,
    /// Hover text
    pub detail: String,
}

/// Compute indicator states from the session model
pub fn indicators(model: &SessionModel, mic_granted: bool) -> Vec<StatusIndicator> {
    let mic = if mic_granted {
        (IndicatorStatus::Active, "Microphone access granted".to_string())
    } else if model.error.as_deref() == Some(PERMISSION_DENIED_MESSAGE) {
        (IndicatorStatus::Error, "Microphone access denied".to_string())
    } else {
        (IndicatorStatus::Waiting, "Microphone not checked yet".to_string())
    };

    let connection = match model.phase {
        phase if phase.is_connected() => IndicatorStatus::Active,
        ConnectionPhase::Errored => IndicatorStatus::Error,
        ConnectionPhase::Closed if model.error.is_some() => IndicatorStatus::Error,
        _ => IndicatorStatus::Waiting,
    };

    let session = if model.is_listening() {
        IndicatorStatus::Active
    } else {
        IndicatorStatus::Waiting
    };

    vec![
        StatusIndicator {
            name: "Mic",
            status: mic.0,
            detail: mic.1,
        },
        StatusIndicator {
            name: "Connection",
            status: connection,
            detail: model.phase.to_string(),
        },
        StatusIndicator {
            name: "Session",
            status: session,
            detail: model.session.to_string(),
        },
    ]
}

/// Status bar displaying the indicators
pub struct StatusBar<'a> {
    model: &'a SessionModel,
    mic_granted: bool,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(model: &'a SessionModel, mic_granted: bool, theme: &'a Theme) -> Self {
        Self {
            model,
            mic_granted,
            theme,
        }
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let time = ui.ctx().input(|i| i.time);
        let pulse_phase = ((time * 2.0).sin() * 0.5 + 0.5) as f32;

        let indicators = indicators(self.model, self.mic_granted);
        let has_active = indicators
            .iter()
            .any(|i| i.status == IndicatorStatus::Active);

        let response = ui.horizontal(|ui| {
            for indicator in &indicators {
                self.draw_indicator(ui, indicator, pulse_phase);
                ui.add_space(8.0);
            }
        });

        if has_active && self.model.is_listening() {
            ui.ctx().request_repaint();
        }

        response.response
    }

    fn draw_indicator(&self, ui: &mut egui::Ui, indicator: &StatusIndicator, pulse_phase: f32) {
        let base_color = match indicator.status {
            IndicatorStatus::Waiting => self.theme.warning,
            IndicatorStatus::Active => self.theme.success,
            IndicatorStatus::Error => self.theme.error,
        };

        let color = if indicator.status == IndicatorStatus::Active {
            let alpha = 0.6 + 0.4 * pulse_phase;
            Color32::from_rgba_unmultiplied(
                base_color.r(),
                base_color.g(),
                base_color.b(),
                (255.0 * alpha) as u8,
            )
        } else {
            base_color
        };

        ui.horizontal(|ui| {
            let (rect, response) = ui.allocate_exact_size(Vec2::splat(10.0), egui::Sense::hover());
            ui.painter().circle_filled(rect.center(), 5.0, color);
            response.on_hover_text(indicator.detail.as_str());

            ui.label(
                RichText::new(indicator.name)
                    .size(12.0)
                    .color(self.theme.text_secondary),
            );
        });
    }
}
