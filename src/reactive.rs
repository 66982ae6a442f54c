//! Reactive binding - Drive an engine from a spark-signals signal.
//!
//! Hosts that track their environment in a `Signal` can wire it straight
//! to the engine: every `signal.set(env)` re-runs the update effect, so the
//! activation state follows the environment with no manual plumbing.
//!
//! # Example
//!
//! ```ignore
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use spark_signals::signal;
//! use trellis_layout::reactive::drive;
//!
//! let environment = signal(initial_environment);
//! let engine = Rc::new(RefCell::new(engine));
//! let handle = drive(engine.clone(), &environment);
//!
//! environment.set(next_environment); // engine.update runs automatically
//! handle.stop();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{effect, Signal};

use crate::engine::DynamicLayoutEngine;

// =============================================================================
// Drive Handle
// =============================================================================

/// Handle returned by [`drive`] that stops the update effect.
///
/// Dropping the handle stops the effect as well.
pub struct DriveHandle {
    stop_effect: Option<Box<dyn FnOnce()>>,
}

impl DriveHandle {
    /// Stop reacting to environment changes.
    pub fn stop(mut self) {
        if let Some(stop) = self.stop_effect.take() {
            stop();
        }
    }
}

impl Drop for DriveHandle {
    fn drop(&mut self) {
        if let Some(stop) = self.stop_effect.take() {
            stop();
        }
    }
}

// =============================================================================
// Drive
// =============================================================================

/// Bind `engine` to `environment`: run an update now and after every
/// signal change, until the returned handle is stopped or dropped.
///
/// The engine stays shared (`Rc<RefCell<_>>`) so the host can keep calling
/// `update` or the introspection methods itself; spark-signals is
/// single-threaded, matching the engine's threading model.
pub fn drive<E: Clone + 'static>(
    engine: Rc<RefCell<DynamicLayoutEngine<E>>>,
    environment: &Signal<E>,
) -> DriveHandle {
    let environment = environment.clone();
    let stop = effect(move || {
        // Read creates the reactive dependency.
        let env = environment.get();
        engine.borrow_mut().update(&env);
    });

    DriveHandle {
        stop_effect: Some(Box::new(stop)),
    }
}

// =============================================================================
// Tests
// =============================================================================
