use eframe::egui;

use crate::EframeApp;

pub fn show_welcome_screen(app: &mut EframeApp, ctx: &egui::Context) {
    super::hero_screen(
        ctx,
        "Welcome to RxScan",
        "AI-powered prescription intake in seconds.",
        |ui| {
            if ui.button("Start").clicked() {
                app.state.screen = app.state.screen.next();
            }
        },
    );
}
