// EventFiend - ui/panels/detail.rs
//
// Entry detail pane showing the full message and record metadata.

use crate::app::state::AppState;
use crate::ui::theme;
use crate::util::constants::DISPLAY_TIME_FORMAT;

/// Render the detail pane (bottom panel).
pub fn render(ui: &mut egui::Ui, state: &AppState) {
    let Some(entry) = state.selected_entry() else {
        ui.centered_and_justified(|ui| {
            ui.label("Select an entry to view details.");
        });
        return;
    };
    let record = &entry.record;

    egui::Grid::new("detail_grid")
        .num_columns(4)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            ui.label("Level:");
            ui.label(
                egui::RichText::new(record.level.label())
                    .color(theme::level_colour(record.level, state.dark_mode)),
            );
            ui.label("Logged:");
            ui.label(
                record
                    .timestamp
                    .with_timezone(&chrono::Local)
                    .format(DISPLAY_TIME_FORMAT)
                    .to_string(),
            );
            ui.end_row();

            ui.label("Source:");
            ui.label(&record.source);
            ui.label("Event ID:");
            ui.label(record.event_id.to_string());
            ui.end_row();

            ui.label("Log:");
            ui.label(&entry.log);
            ui.label("Category:");
            ui.label(record.category.to_string());
            ui.end_row();

            ui.label("Computer:");
            ui.label(&record.machine);
            ui.label("Record:");
            ui.label(record.record_number.to_string());
            ui.end_row();
        });

    ui.separator();
    ui.label("Message:");
    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            ui.label(egui::RichText::new(&record.message).monospace());
        });
}
