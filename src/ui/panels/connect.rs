// EventFiend - ui/panels/connect.rs
//
// "Connect to remote system" dialog.

use crate::app::state::AppState;

/// Render the connect dialog (if `state.show_connect_dialog` is true).
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    if !state.show_connect_dialog || state.pending_error.is_some() {
        return;
    }

    let mut connect = false;
    let mut cancel = false;
    let modal = egui::Modal::new(egui::Id::new("connect_dialog")).show(ctx, |ui| {
        ui.set_width(320.0);
        ui.heading("Connect to Remote System");
        ui.add_space(8.0);
        ui.label("Computer name:");
        let response = ui.add(
            egui::TextEdit::singleline(&mut state.connect_input)
                .hint_text("e.g. FILESRV01")
                .desired_width(f32::INFINITY),
        );
        response.request_focus();
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            connect = true;
        }
        ui.add_space(12.0);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Cancel").clicked() {
                cancel = true;
            }
            if ui.button("Connect").clicked() {
                connect = true;
            }
        });
    });

    if connect {
        let host = state.connect_input.clone();
        // A rejected name keeps the dialog open behind the error message.
        if state.connect_remote(&host).is_ok() {
            state.show_connect_dialog = false;
        }
    } else if cancel || modal.should_close() {
        state.show_connect_dialog = false;
    }
}
