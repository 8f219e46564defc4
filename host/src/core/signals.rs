use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use signal_hook::consts::{SIGABRT, SIGHUP, SIGINT, SIGQUIT, SIGTERM, SIGUSR1, SIGUSR2};
use signal_hook::flag;
use tracing::info;

/// Loop control state derived from delivered signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopping,
}

/// Maps delivered OS signals to loop control.
///
/// The OS-level handlers registered here do nothing but store into shared
/// atomics; signal context is no place for allocation or I/O. Classification
/// of interrupt vs. terminate and busy-loop cancellation happens in `poll`,
/// which the event loop calls once per input-ready iteration and once after
/// every dispatch.
#[derive(Clone, Default)]
pub struct SignalController {
    stop: Arc<AtomicBool>,
    interrupt: Arc<AtomicBool>,
    busy: Arc<AtomicBool>,
    usr1: Arc<AtomicBool>,
    usr2: Arc<AtomicBool>,
}

impl SignalController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register OS signal handlers. Terminate-class signals set the stop
    /// flag directly; SIGINT sets its own flag and is classified at poll
    /// time; USR1/USR2 are recorded and logged, nothing more.
    pub fn install(&self) -> Result<()> {
        for sig in [SIGTERM, SIGHUP, SIGQUIT, SIGABRT] {
            flag::register(sig, Arc::clone(&self.stop))?;
        }
        flag::register(SIGINT, Arc::clone(&self.interrupt))?;
        flag::register(SIGUSR1, Arc::clone(&self.usr1))?;
        flag::register(SIGUSR2, Arc::clone(&self.usr2))?;
        Ok(())
    }

    /// Consume pending signal flags and report the loop state.
    pub fn poll(&self) -> LoopState {
        if self.usr1.swap(false, Ordering::SeqCst) {
            info!(signal = "SIGUSR1", "ignoring unhandled signal");
        }
        if self.usr2.swap(false, Ordering::SeqCst) {
            info!(signal = "SIGUSR2", "ignoring unhandled signal");
        }

        if self.interrupt.swap(false, Ordering::SeqCst) {
            if self.busy.swap(false, Ordering::SeqCst) {
                // Cooperative cancellation: the running operation sees its
                // busy flag cleared and stops; the session continues.
                println!("Interrupt: cancelled the running operation.");
            } else {
                println!("Interrupt: cleaning up and exiting.");
                self.stop.store(true, Ordering::SeqCst);
            }
        }

        if self.stop.load(Ordering::SeqCst) {
            LoopState::Stopping
        } else {
            LoopState::Running
        }
    }

    /// Request a graceful stop (the `exit` command, end of input).
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn is_stopping(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Record an interrupt observed outside signal delivery (Ctrl-C read as
    /// a key event while the terminal is in raw mode).
    pub fn notify_interrupt(&self) {
        self.interrupt.store(true, Ordering::SeqCst);
    }

    /// Mark a long-running cooperative operation as in progress.
    pub fn begin_busy(&self) {
        self.busy.store(true, Ordering::SeqCst);
    }

    pub fn end_busy(&self) {
        self.busy.store(false, Ordering::SeqCst);
    }

    /// Called by a busy operation between work units. Consumes a pending
    /// interrupt, clearing the busy flag, and reports whether the operation
    /// should stop. A busy flag cleared by anyone else also reads as
    /// cancelled.
    pub fn cancelled(&self) -> bool {
        if self.interrupt.swap(false, Ordering::SeqCst) {
            self.busy.store(false, Ordering::SeqCst);
            return true;
        }
        !self.busy.load(Ordering::SeqCst)
    }
}
