// EventFiend - ui/panels/entries.rs
//
// Central entry table. Uses egui_extras::TableBuilder, which only lays out
// the rows inside the viewport. Group headers are interleaved with rows when
// a grouping mode is active.

use crate::app::state::AppState;
use crate::core::view::ViewLine;
use crate::ui::theme;
use crate::util::constants::DISPLAY_TIME_FORMAT;
use egui_extras::{Column, TableBuilder};

/// Render the entry table (central area).
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    if state.view.is_empty() {
        ui.centered_and_justified(|ui| {
            if state.catalog.entries().is_empty() {
                ui.label("No entries loaded.\nTick an event log in the sidebar to load it.");
            } else {
                ui.label("No entries match the current filters.");
            }
        });
        return;
    }

    let lines = state.view.lines();
    let dark_mode = state.dark_mode;
    let mut clicked_row: Option<usize> = None;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .sense(egui::Sense::click())
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(90.0)) // Level
        .column(Column::auto().at_least(140.0)) // Time
        .column(Column::auto().at_least(120.0)) // Source
        .column(Column::auto().at_least(60.0)) // Event ID
        .column(Column::auto().at_least(60.0)) // Category
        .column(Column::auto().at_least(90.0)) // Log
        .column(Column::remainder().at_least(200.0)) // Message
        .header(theme::ROW_HEIGHT, |mut header| {
            for title in ["Level", "Time", "Source", "Event ID", "Category", "Log", "Message"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(theme::ROW_HEIGHT, lines.len(), |mut row| {
                match lines[row.index()] {
                    ViewLine::Header(g) => {
                        let Some(span) = state.view.groups.get(g) else {
                            return;
                        };
                        row.col(|ui| {
                            let rect = ui.max_rect();
                            ui.painter()
                                .rect_filled(rect, 0.0, theme::group_header_bg(dark_mode));
                            ui.strong(format!("{} ({})", span.label, span.len));
                        });
                        for _ in 0..6 {
                            row.col(|ui| {
                                let rect = ui.max_rect();
                                ui.painter()
                                    .rect_filled(rect, 0.0, theme::group_header_bg(dark_mode));
                            });
                        }
                    }
                    ViewLine::Row(display_idx) => {
                        let Some(entry) = state.entry_at(display_idx) else {
                            return;
                        };
                        row.set_selected(state.selected_row() == Some(display_idx));
                        let level_colour = theme::level_colour(entry.record.level, dark_mode);
                        row.col(|ui| {
                            ui.label(egui::RichText::new(entry.record.level.label()).color(level_colour));
                        });
                        row.col(|ui| {
                            ui.label(
                                entry
                                    .record
                                    .timestamp
                                    .with_timezone(&chrono::Local)
                                    .format(DISPLAY_TIME_FORMAT)
                                    .to_string(),
                            );
                        });
                        row.col(|ui| {
                            ui.label(&entry.record.source);
                        });
                        row.col(|ui| {
                            ui.label(entry.record.event_id.to_string());
                        });
                        row.col(|ui| {
                            ui.label(entry.record.category.to_string());
                        });
                        row.col(|ui| {
                            ui.label(&entry.log);
                        });
                        row.col(|ui| {
                            let first_line =
                                entry.record.message.lines().next().unwrap_or_default();
                            ui.label(first_line).on_hover_text(&entry.record.message);
                        });
                        if row.response().clicked() {
                            clicked_row = Some(display_idx);
                        }
                    }
                }
            });
        });

    // Applied after the table releases its borrow of `state`.
    if let Some(idx) = clicked_row {
        state.select_row(Some(idx));
    }
}
