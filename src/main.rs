use std::{path::PathBuf, time::Duration};

use anyhow::{anyhow, Context, Result};
use arboard::Clipboard;
use eframe::{
    egui::{self, vec2},
    CreationContext,
};

use crate::{
    config::{AppConfig, Config},
    gui::{popups::Popups, Screen, UiState},
    services::{ocr::OcrOutcome, Services},
};

pub mod config;
pub mod export;
pub mod gui;
pub mod services;

pub const WINDOW_TITLE: &str = "RxScan";

fn main() -> Result<()> {
    pretty_env_logger::init();

    eframe::run_native(
        WINDOW_TITLE,
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default().with_inner_size(vec2(900.0, 640.0)),
            ..Default::default()
        },
        Box::new(|cc| {
            EframeApp::new(cc)
                .map(|app| -> Box<dyn eframe::App> { Box::new(app) })
                .map_err(|e| panic!("{e:?}"))
        }),
    )
    .map_err(|e| anyhow!("{e}"))
}

pub struct EframeApp {
    pub config: AppConfig,
    pub services: Services,
    pub state: UiState,
    pub popups: Popups,
}

impl EframeApp {
    pub fn new(_cc: &CreationContext) -> Result<Self> {
        let config = AppConfig::load().context("Could not load main configuration file")?;
        // materialise the file on first run so users have something to edit
        config.save().context("Could not save main configuration file")?;

        let services = Services::new(&config)?;

        Ok(Self {
            config,
            services,
            state: UiState::default(),
            popups: Popups::default(),
        })
    }

    /// Start an OCR invocation for the given file, discarding any previous
    /// result. A still-running invocation is replaced; its child process is
    /// detached, not killed.
    pub fn select_file(&mut self, path: PathBuf) {
        log::info!("selected `{}`", path.display());
        self.state.begin_scan(self.services.ocr.scan(&path));
    }

    /// Copy the extracted text to the system clipboard. Does nothing if no
    /// text is held.
    pub fn copy_result(&mut self) {
        let Some(text) = self.state.copyable_text().map(str::to_owned) else {
            return;
        };

        match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(()) => self.popups.notice("Copied to clipboard."),
            Err(e) => self.popups.error(
                anyhow::Error::new(e).context("Failed to copy extracted text to the clipboard"),
            ),
        }
    }

    /// Append the scan payload to the configured export file. Does nothing if
    /// no text is held.
    pub fn export_result(&mut self) {
        let Some(scan) = self.state.scan_text().cloned() else {
            return;
        };

        match export::append_scan(&self.config.export_path, &scan) {
            Ok(()) => self.popups.notice("Exported!"),
            Err(e) => self.popups.error(e),
        }
    }
}

impl eframe::App for EframeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.state.poll_scan() {
            Ok(None) | Ok(Some(OcrOutcome::Text(_))) => {}
            Ok(Some(OcrOutcome::Failure { message })) => {
                let message = format!("OCR failed: {message}");
                self.popups.notice(message);
            }
            Ok(Some(OcrOutcome::Unparsable)) => {
                self.popups.notice("Could not parse OCR output.");
            }
            Err(e) => self.popups.error(e),
        }

        // job completion does not wake the event loop by itself
        if self.state.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        match self.state.screen {
            Screen::Welcome => gui::welcome::show_welcome_screen(self, ctx),
            Screen::Instructions => gui::instructions::show_instructions_screen(self, ctx),
            Screen::Upload => gui::upload::show_upload_screen(self, ctx),
        }

        self.popups.show(ctx);
    }
}
