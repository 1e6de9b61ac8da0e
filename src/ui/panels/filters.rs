// EventFiend - ui/panels/filters.rs
//
// Filter and grouping controls sidebar.

use crate::app::state::AppState;
use crate::core::model::EventLevel;
use crate::core::view::GroupMode;

/// Render the filter controls.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    ui.horizontal(|ui| {
        if ui.button("Apply Filters").clicked() && state.apply_time_inputs().is_ok() {
            state.apply_filters();
        }
        if ui.button("Clear Filters").clicked() {
            state.clear_filters();
        }
    });

    ui.separator();

    // Group by
    ui.label("Group by:");
    let mut mode = state.group_mode;
    ui.horizontal_wrapped(|ui| {
        for m in GroupMode::all() {
            ui.radio_value(&mut mode, *m, m.label());
        }
    });
    state.set_group_mode(mode);

    ui.separator();

    // Level checkboxes
    ui.label("Level:");
    for level in EventLevel::all() {
        let mut checked = state.filter.levels.contains(level);
        if ui.checkbox(&mut checked, level.label()).changed() {
            state.toggle_level(*level, checked);
        }
    }

    ui.separator();

    // Event id and message text
    ui.label("Event ID:");
    let mut ids = state.filter.event_ids.clone();
    if ui
        .add(egui::TextEdit::singleline(&mut ids).hint_text("e.g. 4624,4625"))
        .changed()
    {
        state.set_event_ids(&ids);
    }

    ui.label("Message contains:");
    let mut keywords = state.filter.keywords.clone();
    if ui
        .add(egui::TextEdit::singleline(&mut keywords).hint_text("text, or word,word"))
        .changed()
    {
        state.set_keywords(&keywords);
    }

    ui.separator();

    // Time range
    ui.label("Time range:");
    egui::Grid::new("time_range_grid")
        .num_columns(2)
        .spacing([6.0, 4.0])
        .show(ui, |ui| {
            ui.checkbox(&mut state.time_from_enabled, "From");
            ui.add(
                egui::TextEdit::singleline(&mut state.time_from_input)
                    .hint_text("YYYY-MM-DD HH:MM:SS")
                    .desired_width(150.0),
            );
            ui.end_row();
            ui.checkbox(&mut state.time_to_enabled, "To");
            ui.add(
                egui::TextEdit::singleline(&mut state.time_to_input)
                    .hint_text("YYYY-MM-DD HH:MM:SS")
                    .desired_width(150.0),
            );
            ui.end_row();
        });
    if state.time_from_enabled != state.time_to_enabled {
        ui.label(
            egui::RichText::new("Both bounds are needed for the time filter to apply.")
                .small()
                .weak(),
        );
    }

    ui.separator();

    // Sources from loaded logs
    ui.label("Source:");
    let mut names: Vec<&str> = state.catalog.source_names().collect();
    names.sort_unstable();
    names.dedup();
    if names.is_empty() {
        ui.label(egui::RichText::new("Load a log to list its sources.").weak());
        return;
    }
    let mut toggled: Option<(String, bool)> = None;
    for name in names {
        let mut checked = state.filter.sources.contains(name);
        if ui.checkbox(&mut checked, name).changed() {
            toggled = Some((name.to_string(), checked));
        }
    }
    if let Some((name, checked)) = toggled {
        state.toggle_source(&name, checked);
    }
}
