//! # Snapshot Handoff
//!
//! Single-writer, many-reader handoff of immutable frame snapshots.
//!
//! ## Architecture
//!
//! ```text
//!   Simulation thread                Render thread(s)
//!   ─────────────────                ────────────────
//!   publish(snapshot) ──► SnapshotCell ──► latest() -> Arc<T>
//!                         (latest Arc)
//! ```
//!
//! The simulation thread publishes one snapshot per frame; render consumers
//! pick up whichever snapshot is newest when they run. A consumer holding an
//! old `Arc` keeps that snapshot alive but never blocks the next publish.
//!
//! ## Thread Safety
//!
//! The cell only ever swaps one `Arc` pointer under a mutex, so neither side
//! can hold the lock for longer than a pointer copy. A render pass can never
//! observe a snapshot mid-update.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Latest-value cell carrying immutable snapshots across the sim/render
/// boundary.
pub struct SnapshotCell<T> {
    /// The most recently published snapshot.
    latest: Mutex<Arc<T>>,
    /// Number of publishes so far (for staleness checks and stats).
    version: AtomicU64,
}

impl<T> SnapshotCell<T> {
    /// Creates a cell holding an initial snapshot.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            latest: Mutex::new(Arc::new(initial)),
            version: AtomicU64::new(0),
        }
    }

    /// Publishes a new snapshot, replacing the previous one.
    ///
    /// Readers that already hold the previous `Arc` are unaffected.
    pub fn publish(&self, snapshot: T) {
        let next = Arc::new(snapshot);
        *self.latest.lock() = next;
        self.version.fetch_add(1, Ordering::Release);
    }

    /// Returns the most recently published snapshot.
    #[must_use]
    pub fn latest(&self) -> Arc<T> {
        Arc::clone(&self.latest.lock())
    }

    /// Returns the number of publishes so far.
    ///
    /// Monotonically increasing; readers can compare versions to detect
    /// whether anything new arrived since their last pickup.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }
}
