//! Off-thread case generation.
//!
//! Generation with CSG can take a noticeable fraction of a second, so an
//! interactive caller hands it to a worker thread and polls for the result
//! between frames.

use std::sync::mpsc::{sync_channel, Receiver, TryRecvError};
use std::thread;

use caseforge_core::{CaseParams, GeometryError, PhoneModelSpec};
use tracing::{debug, warn};

use crate::case::{generate_case_solid_with, CaseSolid};

pub type GenerationResult = Result<CaseSolid, GeometryError>;

/// A generation job running on its own thread.
///
/// Dropping the handle detaches the job; its result is discarded.
#[derive(Debug)]
pub struct GenerationHandle {
    model_id: String,
    result_rx: Receiver<GenerationResult>,
    finished: bool,
}

/// Start generating a case for `spec` on a worker thread.
pub fn spawn_generation(spec: PhoneModelSpec, params: CaseParams) -> GenerationHandle {
    let model_id = spec.id.clone();
    let (result_tx, result_rx) = sync_channel(1);

    thread::spawn(move || {
        debug!(model = %spec.id, "case generation started");
        let result = generate_case_solid_with(&spec, &params);
        if result_tx.send(result).is_err() {
            debug!(model = %spec.id, "case generation finished after its handle was dropped");
        }
    });

    GenerationHandle {
        model_id,
        result_rx,
        finished: false,
    }
}

impl GenerationHandle {
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Take the result if the job is done. Yields `Some` exactly once.
    pub fn try_take(&mut self) -> Option<GenerationResult> {
        if self.finished {
            return None;
        }
        match self.result_rx.try_recv() {
            Ok(result) => {
                self.finished = true;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.finished = true;
                warn!(model = %self.model_id, "case generation worker exited without a result");
                Some(Err(GeometryError::WorkerLost))
            }
        }
    }

    /// Block until the job is done.
    pub fn wait(self) -> GenerationResult {
        if self.finished {
            return Err(GeometryError::WorkerLost);
        }
        self.result_rx.recv().unwrap_or_else(|_| {
            warn!(model = %self.model_id, "case generation worker exited without a result");
            Err(GeometryError::WorkerLost)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseforge_core::{catalog, CutoutMode};
    use std::time::{Duration, Instant};

    fn overlay() -> CaseParams {
        CaseParams::default().with_cutout_mode(CutoutMode::Overlay)
    }

    #[test]
    fn test_wait_matches_direct_generation() {
        let spec = catalog().get("iphone-15-pro").unwrap().clone();
        let direct = generate_case_solid_with(&spec, &overlay()).unwrap();
        let handle = spawn_generation(spec, overlay());
        assert_eq!(handle.model_id(), "iphone-15-pro");
        assert_eq!(handle.wait().unwrap(), direct);
    }

    #[test]
    fn test_try_take_yields_once() {
        let spec = catalog().get("iphone-14-pro").unwrap().clone();
        let mut handle = spawn_generation(spec, overlay());

        let deadline = Instant::now() + Duration::from_secs(30);
        let result = loop {
            if let Some(result) = handle.try_take() {
                break result;
            }
            assert!(Instant::now() < deadline, "generation did not finish");
            thread::sleep(Duration::from_millis(5));
        };

        assert!(result.is_ok());
        assert!(handle.is_finished());
        assert!(handle.try_take().is_none());
    }

    #[test]
    fn test_errors_come_back_through_the_handle() {
        let mut spec = catalog().get("iphone-16-pro").unwrap().clone();
        spec.width = 0.0;
        let result = spawn_generation(spec, overlay()).wait();
        assert!(matches!(result, Err(GeometryError::InvalidSpec(_))));
    }
}
