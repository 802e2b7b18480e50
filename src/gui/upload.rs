use eframe::egui::{self, Color32, RichText, Stroke};

use crate::EframeApp;

const DROP_ZONE_BORDER: Color32 = Color32::from_rgb(0x90, 0xca, 0xf9);

pub fn show_upload_screen(app: &mut EframeApp, ctx: &egui::Context) {
    // only the first dropped file is used; files without a local path are ignored
    let dropped = ctx.input(|input| {
        input
            .raw
            .dropped_files
            .first()
            .and_then(|file| file.path.clone())
    });
    if let Some(path) = dropped {
        app.select_file(path);
    }

    let hovering_files = ctx.input(|input| !input.raw.hovered_files.is_empty());

    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical().auto_shrink(false).show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(48.0);

                drop_zone(ui, hovering_files);

                ui.add_space(16.0);

                if ui.button("Choose File").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Prescription scans", &["pdf", "png", "jpg", "jpeg"])
                        .pick_file()
                    {
                        app.select_file(path);
                    }
                }

                if app.state.is_loading() {
                    ui.add_space(24.0);
                    ui.add(egui::Spinner::new().size(32.0));
                }

                if let Some(text) = app.state.copyable_text().map(str::to_owned) {
                    ui.add_space(24.0);
                    result_card(ui, &text);
                }

                ui.add_space(16.0);
                action_row(app, ui);

                ui.add_space(32.0);
                if ui.link("Back to Instructions").clicked() {
                    app.state.screen = app.state.screen.back();
                }
            });
        });
    });
}

fn drop_zone(ui: &mut egui::Ui, hovering_files: bool) {
    let fill = if hovering_files {
        DROP_ZONE_BORDER.gamma_multiply(0.3)
    } else {
        ui.visuals().extreme_bg_color
    };

    egui::Frame::group(ui.style())
        .fill(fill)
        .stroke(Stroke::new(2.0, DROP_ZONE_BORDER))
        .inner_margin(egui::Margin::same(40))
        .show(ui, |ui| {
            ui.set_width(480.0);
            ui.label(RichText::new("📄  Drag & Drop Prescription Here").size(18.0));
        });
}

fn result_card(ui: &mut egui::Ui, text: &str) {
    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(24))
        .show(ui, |ui| {
            ui.set_width(480.0);
            ui.label(RichText::new("Extracted Prescription").size(16.0).strong());
            ui.separator();
            ui.label(text);
        });
}

fn action_row(app: &mut EframeApp, ui: &mut egui::Ui) {
    let has_text = app.state.copyable_text().is_some();

    ui.horizontal(|ui| {
        // keep the row centred under the card
        let row_width = if app.config.export_enabled { 200.0 } else { 100.0 };
        ui.add_space((ui.available_width() - row_width).max(0.0) / 2.0);

        if ui
            .add_enabled(has_text, egui::Button::new("Copy Text"))
            .clicked()
        {
            app.copy_result();
        }

        if app.config.export_enabled
            && ui
                .add_enabled(has_text, egui::Button::new("Export"))
                .clicked()
        {
            app.export_result();
        }
    });
}
