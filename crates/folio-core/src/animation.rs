//! Easing and phase progress for time-based animations.
//!
//! Progress is always derived from elapsed wall-clock time against a
//! recorded start, never from a frame count, so durations hold under
//! frame-rate variance.

// =============================================================================
// Easing
// =============================================================================

/// `1 - (1 - t)^3`, decelerating towards `t = 1`. Input is clamped to `[0, 1]`.
#[must_use]
pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t.clamp(0.0, 1.0)).powi(3)
}

// =============================================================================
// Phase progress
// =============================================================================

/// Normalized progress of a phase that started at `start_ms`.
///
/// A zero-length phase is complete immediately. Clock readings earlier than
/// the start (non-monotonic hosts) count as no progress.
#[must_use]
pub fn phase_progress(start_ms: f64, now_ms: f64, duration_ms: u32) -> f64 {
    if duration_ms == 0 {
        return 1.0;
    }
    ((now_ms - start_ms) / f64::from(duration_ms)).clamp(0.0, 1.0)
}
