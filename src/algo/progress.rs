//! Progress reporting for long-running stages.
//!
//! Farthest-point sampling and the weight map can take a while on large
//! meshes; both accept a [`Progress`] so front-ends can show feedback
//! without the library committing to any output format.
//!
//! # Example
//!
//! ```ignore
//! use gravel::algo::Progress;
//!
//! let progress = Progress::new(|current, total, message| {
//!     eprintln!("[{}/{}] {}", current, total, message);
//! });
//!
//! let sampling = voronoi_fps_with_progress(&graph, 500, &progress)?;
//! ```

/// A progress callback that receives updates during long-running operations.
///
/// The callback receives the current step (1-based), the total number of
/// steps, and a short description of the running stage. It may be invoked
/// from worker threads, and steps from parallel stages can arrive out of
/// order; consumers that render a bar should clamp to the highest value
/// seen.
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
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
