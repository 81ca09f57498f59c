//! Scroll offset clamping for the focused block.

/// Largest valid offset for a block of `height` rows shown through a
/// window of `window` rows.
pub fn max_offset(height: usize, window: usize) -> usize {
    height.saturating_sub(window)
}

/// Clamp a requested offset into `[0, max(0, height - window)]`.
///
/// The request is signed so relative scrolling past the top clamps to 0.
pub fn clamp_offset(requested: i64, height: usize, window: usize) -> usize {
    if requested <= 0 {
        return 0;
    }
    let requested = usize::try_from(requested).unwrap_or(usize::MAX);
    requested.min(max_offset(height, window))
}

/// Apply a signed delta to a stored offset, clamping the result.
pub fn scroll_by(offset: usize, delta: i64, height: usize, window: usize) -> usize {
    let base = i64::try_from(offset).unwrap_or(i64::MAX);
    clamp_offset(base.saturating_add(delta), height, window)
}
