// EventFiend - ui/panels/message.rs
//
// Blocking error dialog. While a message is pending the modal covers the
// window and swallows input until it is acknowledged.

use crate::app::state::AppState;

/// Render the error dialog (if `state.pending_error` is set).
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    let Some(message) = state.pending_error.clone() else {
        return;
    };

    let mut acknowledged = false;
    let modal = egui::Modal::new(egui::Id::new("error_dialog")).show(ctx, |ui| {
        ui.set_width(360.0);
        ui.heading("Error");
        ui.add_space(8.0);
        ui.label(message);
        ui.add_space(12.0);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("OK").clicked() {
                acknowledged = true;
            }
        });
    });

    if acknowledged || modal.should_close() {
        state.dismiss_error();
    }
}
