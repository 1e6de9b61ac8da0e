// EventFiend - ui/theme.rs
//
// Colour scheme, event level colour mapping, and layout constants.
// No dependencies on app state or business logic.

use crate::core::model::EventLevel;
use egui::Color32;

/// Colour for a given event level.
pub fn level_colour(level: EventLevel, dark_mode: bool) -> Color32 {
    match level {
        EventLevel::Error => Color32::from_rgb(220, 38, 38), // Red 600
        EventLevel::Warning => Color32::from_rgb(217, 119, 6), // Amber 600
        EventLevel::FailureAudit => Color32::from_rgb(190, 24, 93), // Pink 700
        EventLevel::SuccessAudit => Color32::from_rgb(22, 163, 74), // Green 600
        EventLevel::Information => row_text_colour(dark_mode),
    }
}

/// Foreground colour for ordinary row text.
pub fn row_text_colour(dark_mode: bool) -> Color32 {
    if dark_mode {
        Color32::from_rgb(229, 231, 235) // Gray 200
    } else {
        Color32::from_rgb(17, 24, 39) // Gray 900
    }
}

/// Background of group header rows.
pub fn group_header_bg(dark_mode: bool) -> Color32 {
    if dark_mode {
        Color32::from_rgb(55, 65, 81) // Gray 700
    } else {
        Color32::from_rgb(229, 231, 235) // Gray 200
    }
}

/// Apply the dark or light egui visuals.
pub fn apply(ctx: &egui::Context, dark_mode: bool) {
    ctx.set_visuals(if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });
}

/// Layout constants.
pub const SIDEBAR_WIDTH: f32 = 260.0;
pub const DETAIL_PANE_HEIGHT: f32 = 200.0;
pub const ROW_HEIGHT: f32 = 20.0;
pub const LOG_LIST_FRACTION: f32 = 0.4;
