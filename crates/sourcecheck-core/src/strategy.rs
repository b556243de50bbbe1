//! Checking strategies: how registered checkers are driven over a workspace.
//!
//! Checking is logically single-threaded and deterministic; ordering is
//! load-bearing for diagnostic correctness. [`SynchronousStrategy`] runs the
//! engine in the caller's thread. [`CheckQueue`] runs the *identical*
//! sequential algorithm on a worker thread, taking ownership of the
//! workspace for the duration - which is also what guarantees a workspace is
//! only ever mutated by the worker currently checking it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::anyhow;
use tracing::debug;

use crate::checks::Checker;
use crate::diagnostics::{CheckError, CheckResult};
use crate::workspace::Workspace;

/// Execution policy for running checkers over a workspace.
pub trait CheckingStrategy: Send + std::fmt::Debug {
    /// Run every checker registered on the workspace to completion.
    fn check(&self, workspace: &mut Workspace) -> CheckResult<()>;
}

/// Runs checks to completion in the caller's thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct SynchronousStrategy;

impl CheckingStrategy for SynchronousStrategy {
    fn check(&self, workspace: &mut Workspace) -> CheckResult<()> {
        run_checks(workspace)
    }
}

/// The sequential checking algorithm.
///
/// Round structure: for each checker in registration order, the workspace
/// hook first, then the checker's generic and typed hooks over an ordered
/// snapshot of unvisited files; after every checker's per-file hooks, the
/// finalization hooks run in a trailing phase. Files created mid-round are
/// picked up by the snapshots of the checkers still to run, and by the
/// finalization phase.
pub(crate) fn run_checks(workspace: &mut Workspace) -> CheckResult<()> {
    let checkers = workspace.take_checkers();
    let result = run_rounds(workspace, &checkers);
    workspace.restore_checkers(checkers);
    result
}

fn run_rounds(workspace: &mut Workspace, checkers: &[Box<dyn Checker>]) -> CheckResult<()> {
    loop {
        run_round(workspace, checkers)?;
        workspace.mark_all_checked();
        if !workspace.has_unchecked_files() {
            return Ok(());
        }
    }
}

fn run_round(workspace: &mut Workspace, checkers: &[Box<dyn Checker>]) -> CheckResult<()> {
    for checker in checkers {
        let capabilities = checker.capabilities();
        if capabilities.workspace {
            debug!(checker = checker.name(), "workspace check");
            checker.check_workspace(workspace)?;
        }
        if !capabilities.generic && !capabilities.typed {
            continue;
        }
        // Stable snapshot for this checker's pass; files removed mid-pass
        // are skipped, renamed files keep their handle.
        for key in workspace.snapshot_unchecked() {
            if !workspace.is_live(key) {
                continue;
            }
            let key = if capabilities.generic {
                let returned = checker.check(workspace, key)?;
                if !workspace.is_live(returned) {
                    continue;
                }
                returned
            } else {
                key
            };
            if capabilities.typed {
                let file_type = workspace.file_type_of(key)?;
                checker.check_typed(workspace, key, file_type)?;
            }
        }
    }
    for checker in checkers {
        if !checker.capabilities().finalize {
            continue;
        }
        for key in workspace.snapshot_unchecked() {
            if !workspace.is_live(key) {
                continue;
            }
            checker.check_finally(workspace, key)?;
        }
    }
    Ok(())
}

/// Outcome of a deferred checking job.
#[derive(Debug)]
pub struct JobResult {
    /// The workspace, returned to the caller.
    pub workspace: Workspace,
    /// Result of the pass; `Ok(())` when checking ran to completion.
    pub outcome: CheckResult<()>,
    /// True when the job was cancelled before it started; the workspace is
    /// returned unchecked.
    pub cancelled: bool,
}

struct Job {
    workspace: Workspace,
    cancelled: Arc<AtomicBool>,
    started: Arc<AtomicBool>,
    done: mpsc::Sender<JobResult>,
}

/// Handle to a deferred checking job.
pub struct CheckJob {
    receiver: mpsc::Receiver<JobResult>,
    cancelled: Arc<AtomicBool>,
    started: Arc<AtomicBool>,
    slot: Option<JobResult>,
}

impl CheckJob {
    /// Request cancellation. Best-effort: returns true when the request was
    /// recorded before a worker picked the job up; a pass already running is
    /// never interrupted.
    pub fn cancel(&self) -> bool {
        self.cancelled.store(true, Ordering::SeqCst);
        !self.started.load(Ordering::SeqCst)
    }

    /// Whether a worker has started executing this job.
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Non-blocking completion probe.
    pub fn poll(&mut self) -> bool {
        if self.slot.is_some() {
            return true;
        }
        match self.receiver.try_recv() {
            Ok(result) => {
                self.slot = Some(result);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => true,
        }
    }

    /// Block until the job finishes and take back the workspace.
    pub fn wait(mut self) -> CheckResult<JobResult> {
        if let Some(result) = self.slot.take() {
            return Ok(result);
        }
        self.receiver
            .recv()
            .map_err(|_| CheckError::Other(anyhow!("checking worker terminated unexpectedly")))
    }
}

/// Deferred execution of `perform_checks`.
///
/// Jobs are executed one at a time per worker, in submission order. The
/// queue owns each workspace from [`CheckQueue::submit`] until the caller
/// takes it back through [`CheckJob::wait`].
pub struct CheckQueue {
    sender: Option<mpsc::Sender<Job>>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl CheckQueue {
    /// Spawn `workers` worker threads (at least one).
    pub fn new(workers: usize) -> Self {
        let (sender, receiver) = mpsc::channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));
        let workers = (0..workers.max(1))
            .map(|i| {
                let receiver = Arc::clone(&receiver);
                thread::Builder::new()
                    .name(format!("sourcecheck-worker-{i}"))
                    .spawn(move || worker_loop(receiver))
                    .expect("spawn checking worker")
            })
            .collect();
        Self {
            sender: Some(sender),
            workers,
        }
    }

    /// Enqueue a workspace for checking and return a handle immediately.
    pub fn submit(&self, workspace: Workspace) -> CheckJob {
        let cancelled = Arc::new(AtomicBool::new(false));
        let started = Arc::new(AtomicBool::new(false));
        let (done, receiver) = mpsc::channel();
        let job = Job {
            workspace,
            cancelled: Arc::clone(&cancelled),
            started: Arc::clone(&started),
            done,
        };
        if let Some(sender) = &self.sender {
            // A failed send means every worker is gone; the job handle will
            // report the disconnect on wait().
            let _ = sender.send(job);
        }
        CheckJob {
            receiver,
            cancelled,
            started,
            slot: None,
        }
    }
}

impl Drop for CheckQueue {
    fn drop(&mut self) {
        // Closing the channel lets idle workers exit; then reap them.
        self.sender.take();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop(receiver: Arc<Mutex<mpsc::Receiver<Job>>>) {
    loop {
        let job = {
            let guard = match receiver.lock() {
                Ok(guard) => guard,
                Err(_) => return,
            };
            match guard.recv() {
                Ok(job) => job,
                Err(_) => return,
            }
        };
        let Job {
            mut workspace,
            cancelled,
            started,
            done,
        } = job;
        if cancelled.load(Ordering::SeqCst) {
            debug!("skipping cancelled job");
            let _ = done.send(JobResult {
                workspace,
                outcome: Ok(()),
                cancelled: true,
            });
            continue;
        }
        started.store(true, Ordering::SeqCst);
        let outcome = workspace.perform_checks();
        let _ = done.send(JobResult {
            workspace,
            outcome,
            cancelled: false,
        });
    }
}
