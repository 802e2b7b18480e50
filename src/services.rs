use std::thread::JoinHandle;

use anyhow::{anyhow, Context, Result};
use ocr::OcrService;

use crate::config::AppConfig;

pub mod ocr;

/// Holds the instantiated services.
pub struct Services {
    pub ocr: Box<dyn OcrService>,
}

impl Services {
    /// Create a new `Services` from the services specified in the given `AppConfig`.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut services = Self {
            ocr: config.ocr_service.create_service(),
        };

        services.ocr.init().with_context(|| {
            format!("Failed to initialise OCR Service `{}`", services.ocr.name())
        })?;

        Ok(services)
    }
}

impl Drop for Services {
    fn drop(&mut self) {
        self.ocr
            .terminate()
            .expect("Failed to terminate OCR Service");
    }
}

/// A job being performed by a service on its own worker thread. May or may
/// not be finished.
pub struct ServiceJob<T> {
    handle: Option<JoinHandle<T>>,
}

impl<T: Send + 'static> ServiceJob<T> {
    pub fn new<F: FnOnce() -> T + Send + 'static>(f: F) -> Self {
        std::thread::spawn(f).into()
    }
}

impl<T> ServiceJob<T> {
    /// Get the return value of this `ServiceJob` if it was finished.
    ///
    /// - Returns `Err` if the job has already finished and its return value was taken previously;
    /// - Returns `Ok(None)` if the job has not finished yet;
    /// - Returns `Ok(Some(T))` if the job has finished.
    pub fn try_wait(&mut self) -> Result<Option<T>> {
        match &self.handle {
            None => Err(anyhow!("job already finished")),
            Some(handle) if handle.is_finished() => {
                Ok(Some(self.handle.take().unwrap().join().unwrap()))
            }
            Some(handle) if !handle.is_finished() => Ok(None),
            _ => unreachable!(),
        }
    }

    /// Wait for the job to finish and return its return value.
    ///
    /// - Returns `Err` if the job has already finished (eg. by calling `try_wait()`) and its return value was taken previously;
    /// - Returns `Ok(T)` if the job has finished.
    pub fn wait(self) -> Result<T> {
        match self.handle {
            None => Err(anyhow!("job already finished")),
            Some(handle) => Ok(handle.join().unwrap()),
        }
    }
}

impl<T> From<JoinHandle<T>> for ServiceJob<T> {
    fn from(handle: JoinHandle<T>) -> Self {
        Self {
            handle: Some(handle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_returns_the_job_output() {
        let job = ServiceJob::new(|| 7);
        assert_eq!(job.wait().unwrap(), 7);
    }

    #[test]
    fn try_wait_hands_over_the_value_exactly_once() {
        let mut job = ServiceJob::new(|| "done");

        let value = loop {
            match job.try_wait().unwrap() {
                Some(value) => break value,
                None => std::thread::yield_now(),
            }
        };

        assert_eq!(value, "done");
        assert!(job.try_wait().is_err());
    }
}
