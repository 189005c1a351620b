//! Progress reporting hook.

/// Receives progress updates from long-running operations.
///
/// Units are operation-specific: rows for most commands, files for merge.
pub trait Progress {
    fn advance(&self, delta: u64);

    fn finish(&self) {}
}

/// Discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn advance(&self, _delta: u64) {}
}
