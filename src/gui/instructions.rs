use eframe::egui;

use crate::EframeApp;

pub fn show_instructions_screen(app: &mut EframeApp, ctx: &egui::Context) {
    super::hero_screen(
        ctx,
        "How it Works",
        "1. Drag a scanned prescription or click Choose File\n\
         2. The OCR script reads the scan\n\
         3. Review and copy the extracted text",
        |ui| {
            if ui.button("Proceed to Upload").clicked() {
                app.state.screen = app.state.screen.next();
            }
            ui.add_space(8.0);
            if ui.link("Back").clicked() {
                app.state.screen = app.state.screen.back();
            }
        },
    );
}
