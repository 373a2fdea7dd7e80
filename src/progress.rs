//! Step callbacks for builds and frame exports.
//!
//! [`build_with_progress`](crate::generate::build_with_progress) reports one
//! step for the head, one per tentacle and one for the vertex attributes.
//! The CLI's frame exporter reports one step per written file.
//!
//! ```
//! use medusa::config::MedusaConfig;
//! use medusa::generate::build_with_progress;
//! use medusa::progress::Progress;
//!
//! let progress = Progress::new(|step, steps, stage| {
//!     eprintln!("{}/{} {}", step, steps, stage);
//! });
//!
//! let buffers = build_with_progress(&MedusaConfig::default(), &progress).unwrap();
//! assert_eq!(buffers.tentacles.len(), 4);
//! ```

type StepFn = dyn Fn(usize, usize, &str) + Send + Sync;

/// Receives `(step, steps, stage)` as an operation advances.
///
/// `step` runs from 0 to `steps`; a report with `step == steps` is the last.
pub struct Progress {
    callback: Box<StepFn>,
}

impl Progress {
    /// Wrap `callback`.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Discards every report.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }

    /// Report reaching `step` of `steps` while in `stage`.
    #[inline]
    pub fn report(&self, step: usize, steps: usize, stage: &str) {
        (self.callback)(step, steps, stage);
    }

    /// Report the final step.
    #[inline]
    pub fn finish(&self, steps: usize) {
        self.report(steps, steps, "Done");
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}
