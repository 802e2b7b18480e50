use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::ServiceJob;

pub mod script;

pub type OcrServiceJob = ServiceJob<Result<OcrOutcome>>;

pub trait OcrService {
    /// Initialise the service (ie. load its configuration file, etc).
    fn init(&mut self) -> Result<()>;
    /// Terminate the service (ie. save its configuration file, etc).
    fn terminate(&mut self) -> Result<()>;

    fn name(&self) -> &'static str;

    /// Run text extraction on the file at `path`. One call spawns exactly one
    /// invocation of the external collaborator.
    fn scan(&mut self, path: &Path) -> OcrServiceJob;
}

/// The success payload written by the OCR collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanText {
    pub text: String,
}

/// How one OCR invocation resolved. Produced exactly once per invocation.
#[derive(Debug, Clone)]
pub enum OcrOutcome {
    /// The collaborator returned extracted text.
    Text(ScanText),
    /// The collaborator reported a structured error.
    Failure { message: String },
    /// The collaborator's output was not a single valid JSON document.
    Unparsable,
}

impl OcrOutcome {
    /// The extracted text, if this outcome carries any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(scan) => Some(&scan.text),
            Self::Failure { .. } | Self::Unparsable => None,
        }
    }
}
