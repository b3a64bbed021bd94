//! Asynchronous callback dispatch
//!
//! Host callbacks run on a dedicated worker thread, off the UI-mutation
//! path, so host-code latency never blocks gesture handling. Dispatch is
//! fire-and-forget: jobs from rapid successive gestures run FIFO on the
//! one worker, but nothing orders a callback relative to later UI state
//! (last-call-wins). There is no cancellation; jobs already queued when
//! the session is dismissed still run, and hosts must tolerate that.

use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use log::debug;

type Job = Box<dyn FnOnce() + Send>;

/// Single-worker fire-and-forget job queue
pub struct CallbackDispatcher {
    sender: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
}

impl CallbackDispatcher {
    /// Spawn the worker thread
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel::<Job>();
        let worker = thread::Builder::new()
            .name("photopick-callbacks".to_string())
            .spawn(move || {
                while let Ok(job) = receiver.recv() {
                    job();
                }
                debug!("callback dispatcher drained, worker exiting");
            })
            .ok();
        Self {
            sender: worker.is_some().then_some(sender),
            worker,
        }
    }

    /// Queue a job; never blocks beyond the channel send
    ///
    /// Silently dropped if the worker could not be spawned or has shut
    /// down — callbacks are best-effort by contract.
    pub fn dispatch(&self, job: impl FnOnce() + Send + 'static) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(Box::new(job));
        }
    }

    /// Block until every job queued so far has run
    ///
    /// Lets hosts (and tests) establish a happens-before edge with
    /// previously dispatched callbacks.
    pub fn flush(&self) {
        if let Some(sender) = &self.sender {
            let (done_tx, done_rx) = mpsc::channel();
            if sender.send(Box::new(move || {
                let _ = done_tx.send(());
            })).is_ok() {
                let _ = done_rx.recv();
            }
        }
    }
}

impl Default for CallbackDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CallbackDispatcher {
    fn drop(&mut self) {
        // Close the channel first so the worker drains and exits.
        drop(self.sender.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl std::fmt::Debug for CallbackDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackDispatcher")
            .field("running", &self.sender.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_jobs_run_in_dispatch_order() {
        let dispatcher = CallbackDispatcher::new();
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        for i in 0..5 {
            let log = Arc::clone(&log);
            dispatcher.dispatch(move || log.lock().unwrap().push(i));
        }
        dispatcher.flush();
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_drop_runs_queued_jobs() {
        let hits = Arc::new(AtomicUsize::new(0));
        {
            let dispatcher = CallbackDispatcher::new();
            for _ in 0..3 {
                let hits = Arc::clone(&hits);
                dispatcher.dispatch(move || {
                    hits.fetch_add(1, Ordering::SeqCst);
                });
            }
        }
        // Drop joins the worker after the queue drains.
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }
}
