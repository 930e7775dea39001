//! Cancellable periodic task
//!
//! Runs a body on a dedicated thread, sleeping between iterations for
//! whatever interval the interval supplier returns at that moment. The stop
//! flag is polled once per iteration; an iteration in progress is never
//! interrupted.

use std::any::Any;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// What the loop should do after an iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Finish,
}

/// Handle to a running periodic task
///
/// Dropping the handle detaches the thread; it keeps running until its body
/// finishes or fails.
#[derive(Debug)]
pub struct TaskHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl TaskHandle {
    /// Ask the loop to exit before its next iteration
    pub fn cancel(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// True once the loop thread has exited
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(|t| t.is_finished())
    }

    /// Wait for the loop thread to exit
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("periodic task thread panicked outside its body");
            }
        }
    }
}

/// Spawn `body` on a named thread, sleeping `interval()` between iterations
///
/// The loop ends when the body returns [`Step::Finish`], returns an error,
/// panics, or the handle is cancelled. Errors and panics are logged, never
/// propagated.
pub fn spawn_periodic<I, F, E>(
    name: &str,
    mut interval: I,
    mut body: F,
) -> std::io::Result<TaskHandle>
where
    I: FnMut() -> Duration + Send + 'static,
    F: FnMut() -> Result<Step, E> + Send + 'static,
    E: Display + 'static,
{
    let stop = Arc::new(AtomicBool::new(false));
    let task_stop = Arc::clone(&stop);
    let task_name = name.to_string();

    let thread = thread::Builder::new().name(task_name.clone()).spawn(move || {
        log::info!("{task_name}: starting");
        let mut iterations: u64 = 0;
        while !task_stop.load(Ordering::Acquire) {
            match panic::catch_unwind(AssertUnwindSafe(&mut body)) {
                Ok(Ok(Step::Continue)) => {}
                Ok(Ok(Step::Finish)) => break,
                Ok(Err(err)) => {
                    log::error!("{task_name}: iteration {iterations} failed: {err}");
                    break;
                }
                Err(payload) => {
                    log::error!(
                        "{task_name}: iteration {iterations} panicked: {}",
                        panic_message(payload.as_ref())
                    );
                    break;
                }
            }
            iterations += 1;
            thread::sleep(interval());
        }
        log::info!("{task_name}: stopped after {iterations} iterations");
    })?;

    Ok(TaskHandle {
        stop,
        thread: Some(thread),
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
