// EventFiend - gui.rs
//
// Top-level eframe::App implementation.
// Wires together the menu bar, status bar, sidebar, entry table, detail pane
// and the modal dialogs.

use crate::app::state::{AppState, ExportFormat};
use crate::ui;
use crate::util::constants::EVTX_EXTENSION;

/// The EventFiend application.
pub struct EventFiendApp {
    pub state: AppState,
}

impl EventFiendApp {
    /// Create a new application instance with the given state.
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState) -> Self {
        ui::theme::apply(&cc.egui_ctx, state.dark_mode);
        Self { state }
    }

    fn export(&mut self, format: ExportFormat) {
        let (label, ext) = match format {
            ExportFormat::Csv => ("CSV", "csv"),
            ExportFormat::Json => ("JSON", "json"),
        };
        if let Some(dest) = rfd::FileDialog::new()
            .add_filter(label, &[ext])
            .set_file_name(format!("events.{ext}"))
            .save_file()
        {
            self.state.export_visible(format, &dest);
        }
    }
}

impl eframe::App for EventFiendApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open .evtx File\u{2026}").clicked() {
                        if let Some(files) = rfd::FileDialog::new()
                            .add_filter("Event log files", &[EVTX_EXTENSION])
                            .pick_files()
                        {
                            for path in files {
                                self.state.add_evtx_file(path);
                            }
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    // Export sub-menu -- enabled only when there are visible entries
                    let has_entries = !self.state.view.is_empty();
                    ui.add_enabled_ui(has_entries, |ui| {
                        ui.menu_button("Export", |ui| {
                            if ui.button("Export CSV\u{2026}").clicked() {
                                self.export(ExportFormat::Csv);
                                ui.close_menu();
                            }
                            if ui.button("Export JSON\u{2026}").clicked() {
                                self.export(ExportFormat::Json);
                                ui.close_menu();
                            }
                        });
                    });
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Connect", |ui| {
                    if ui.button("Connect to\u{2026}").clicked() {
                        self.state.connect_input = self
                            .state
                            .scope
                            .host_name()
                            .unwrap_or_default()
                            .to_string();
                        self.state.show_connect_dialog = true;
                        ui.close_menu();
                    }
                    if ui.button("Local Machine").clicked() {
                        self.state.connect_local();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Refresh").clicked() {
                        self.state.refresh_logs();
                        ui.close_menu();
                    }
                });
                ui.menu_button("View", |ui| {
                    if ui.checkbox(&mut self.state.dark_mode, "Dark Mode").changed() {
                        ui::theme::apply(ctx, self.state.dark_mode);
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.state.show_about = true;
                        ui.close_menu();
                    }
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(self.state.scope.display_name()).strong());
                ui.separator();
                ui.label(&self.state.status_message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let total = self.state.catalog.entries().len();
                    let visible = self.state.view.len();
                    ui.label(format!("{visible}/{total} entries"));
                    if self.state.debug_mode {
                        ui.label(egui::RichText::new("DEBUG").small().weak());
                    }
                });
            });
        });

        // Detail pane (bottom)
        egui::TopBottomPanel::bottom("detail_pane")
            .resizable(true)
            .default_height(ui::theme::DETAIL_PANE_HEIGHT)
            .show(ctx, |ui| {
                ui::panels::detail::render(ui, &self.state);
            });

        // Left sidebar: log list on top, filters below, each scrolling on its own.
        egui::SidePanel::left("sidebar")
            .default_width(ui::theme::SIDEBAR_WIDTH)
            .resizable(true)
            .show(ctx, |ui| {
                let available = ui.available_height();
                egui::ScrollArea::vertical()
                    .id_salt("sidebar_logs")
                    .max_height(available * ui::theme::LOG_LIST_FRACTION)
                    .show(ui, |ui| {
                        ui::panels::logs::render(ui, &mut self.state);
                    });

                ui.separator();

                egui::ScrollArea::vertical()
                    .id_salt("sidebar_filters")
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        ui::panels::filters::render(ui, &mut self.state);
                    });
            });

        // Central panel (entry table)
        egui::CentralPanel::default().show(ctx, |ui| {
            ui::panels::entries::render(ui, &mut self.state);
        });

        // Dialogs. The error message is drawn last so it stacks above the rest.
        ui::panels::about::render(ctx, &mut self.state);
        ui::panels::connect::render(ctx, &mut self.state);
        ui::panels::message::render(ctx, &mut self.state);
    }
}
