use eframe::egui::{self, vec2};

/// A stack of popups which should be shown to the user (eg. for error
/// messages and transient notifications).
#[derive(Debug, Default)]
pub struct Popups {
    popups: Vec<Popup>,
    sequence: u64,
}

#[derive(Debug)]
struct Popup {
    id: u64,
    message: String,
    first_frame: bool,
}

impl Popups {
    /// Show an error and its chain of causes to the user.
    pub fn error(&mut self, e: anyhow::Error) {
        let mut s = format!("Error: {e}\n");

        for (idx, error) in e.chain().enumerate().skip(1) {
            s.push_str(&format!("\t{}. {}\n", idx, error));
        }

        self.push(s);
    }

    /// Show a plain notification to the user.
    pub fn notice(&mut self, message: impl Into<String>) {
        self.push(message.into());
    }

    fn push(&mut self, message: String) {
        self.popups.push(Popup {
            id: self.sequence,
            message,
            first_frame: true,
        });
        self.sequence += 1;
    }

    /// Show all currently held popups.
    pub fn show(&mut self, ctx: &egui::Context) {
        let mut close_popup = None;

        for (idx, popup) in self.popups.iter_mut().enumerate() {
            ctx.show_viewport_immediate(
                egui::ViewportId(egui::Id::new(("popup", popup.id))),
                egui::ViewportBuilder {
                    inner_size: Some(vec2(480.0, 320.0)),
                    ..Default::default()
                },
                |ctx, _| {
                    if popup.first_frame {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
                        popup.first_frame = false;
                    }

                    egui::CentralPanel::default().show(ctx, |ui| {
                        egui_extras::StripBuilder::new(ui)
                            .size(egui_extras::Size::remainder())
                            .size(egui_extras::Size::exact(22.0))
                            .vertical(|mut strip| {
                                strip.cell(|ui| {
                                    egui::ScrollArea::vertical().auto_shrink(false).show(
                                        ui,
                                        |ui| {
                                            ui.label(&popup.message);
                                        },
                                    );
                                });

                                strip.cell(|ui| {
                                    ui.centered_and_justified(|ui| {
                                        if ui.button("Close").clicked() {
                                            close_popup = Some(idx);
                                        }
                                    });
                                });
                            });
                    });

                    if ctx.input(|input| input.viewport().close_requested()) {
                        close_popup = Some(idx);
                    }
                },
            );
        }

        if let Some(idx) = close_popup {
            self.popups.remove(idx);
        }
    }
}
