//! Run transforms off the calling thread.
//!
//! The session stays in `Processing` for the whole time the worker runs, so a
//! UI thread can keep drawing its busy indicator and poll for completion.
//! Completion is signalled over a channel; the session is updated only when
//! the caller hands the outcome back to [`Session::finish`].

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::PipelineError;
use crate::host::RasterHost;
use crate::session::{JobId, Session, TransformJob, TransformOutcome};

/// A transform running on a worker thread.
#[derive(Debug)]
pub struct PendingTransform {
    id: JobId,
    receiver: Receiver<TransformOutcome>,
    handle: Option<JoinHandle<()>>,
}

impl PendingTransform {
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Block until the worker signals completion.
    ///
    /// A worker that dies without reporting yields a failed outcome, so the
    /// session can always leave `Processing`.
    pub fn wait(mut self) -> TransformOutcome {
        let outcome = self
            .receiver
            .recv()
            .unwrap_or_else(|_| TransformOutcome::failed(self.id, lost_worker()));
        self.join();
        outcome
    }

    /// Non-blocking poll. `None` while the job is still running.
    pub fn try_recv(&mut self) -> Option<TransformOutcome> {
        match self.receiver.try_recv() {
            Ok(outcome) => {
                self.join();
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.join();
                Some(TransformOutcome::failed(self.id, lost_worker()))
            }
        }
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("transform worker for job {:?} panicked", self.id);
            }
        }
    }
}

fn lost_worker() -> PipelineError {
    PipelineError::Worker("worker exited without a result".to_string())
}

/// Move `job` onto a new thread and run it against `host`.
pub fn spawn<H: RasterHost + 'static>(
    host: Arc<H>,
    job: TransformJob,
) -> Result<PendingTransform, PipelineError> {
    let id = job.id();
    let (sender, receiver) = mpsc::channel();

    let handle = thread::Builder::new()
        .name("pixpress-transform".to_string())
        .spawn(move || {
            let outcome = job.run(host.as_ref());
            // The receiver may have been dropped; nobody is waiting then.
            let _ = sender.send(outcome);
        })
        .map_err(|e| PipelineError::Worker(e.to_string()))?;

    Ok(PendingTransform {
        id,
        receiver,
        handle: Some(handle),
    })
}

impl<H: RasterHost + 'static> Session<H> {
    /// Begin a transform and run it on a worker thread.
    ///
    /// Returns `Ok(None)` when there is nothing to transform. If the thread
    /// cannot be started the session returns to `Loaded` without a result.
    pub fn spawn_transform(&mut self) -> Result<Option<PendingTransform>, PipelineError> {
        let Some(job) = self.begin_transform() else {
            return Ok(None);
        };
        let id = job.id();

        match spawn(Arc::clone(self.host()), job) {
            Ok(pending) => Ok(Some(pending)),
            Err(e) => {
                let message = e.to_string();
                let _ = self.finish(TransformOutcome::failed(id, e));
                Err(PipelineError::Worker(message))
            }
        }
    }
}
