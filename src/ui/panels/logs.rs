// EventFiend - ui/panels/logs.rs
//
// Sidebar section listing the event logs of the current host and any opened
// .evtx files. Ticking a log loads its entries; unticking removes them.

use crate::app::state::AppState;
use crate::core::model::LogOrigin;

/// Render the log list.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.heading("Event Logs");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .small_button("\u{21bb}")
                .on_hover_text("Refresh the log list")
                .clicked()
            {
                state.refresh_logs();
            }
        });
    });
    ui.label(
        egui::RichText::new(format!("Host: {}", state.scope.display_name()))
            .small()
            .weak(),
    );
    ui.separator();

    if state.catalog.logs().is_empty() {
        ui.label(
            egui::RichText::new("No event logs found.\nOpen an .evtx file via File \u{2192} Open.")
                .weak(),
        );
        return;
    }

    // Checkbox changes are collected and applied after the loop so the
    // catalog is not mutated while it is being iterated.
    let mut toggled: Option<(String, bool)> = None;
    for log in state.catalog.logs() {
        let mut checked = state.catalog.is_loaded(&log.name);
        let response = ui.checkbox(&mut checked, &log.name);
        let response = match &log.origin {
            LogOrigin::File(path) => response.on_hover_text(path.display().to_string()),
            LogOrigin::Host => response,
        };
        if response.changed() {
            toggled = Some((log.name.clone(), checked));
        }
    }

    if let Some((name, checked)) = toggled {
        state.toggle_log(&name, checked);
    }
}
