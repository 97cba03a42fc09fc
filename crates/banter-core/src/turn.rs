//! Per-turn request lifecycle.
//!
//! One turn moves through `Idle -> Sending -> {Succeeded, Failed} -> Idle`.
//! The tracker is the authority for the pending flag: a submission may only
//! start when no turn is outstanding, and a completion only applies when its
//! token matches the outstanding generation. Stale completions (fast
//! re-entry, teardown races) are no-ops.

/// Token identifying one in-flight turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnToken(u64);

impl TurnToken {
    /// Generation number this token belongs to.
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Tracks whether a turn is outstanding and which generation it belongs to.
#[derive(Debug, Default)]
pub struct TurnTracker {
    generation: u64,
    pending: Option<u64>,
}

impl TurnTracker {
    /// Create a tracker with no turn outstanding.
    pub fn new() -> Self {
        Self::default()
    }

    /// True exactly while a turn is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a turn. Returns `None` while another turn is outstanding, which
    /// makes single-flight a property of the tracker rather than a UI
    /// convention.
    pub fn begin(&mut self) -> Option<TurnToken> {
        if self.pending.is_some() {
            return None;
        }
        self.generation += 1;
        self.pending = Some(self.generation);
        Some(TurnToken(self.generation))
    }

    /// Complete a turn. Returns true and clears the pending flag only if
    /// `token` belongs to the outstanding turn; a stale token leaves the
    /// tracker untouched.
    pub fn finish(&mut self, token: TurnToken) -> bool {
        if self.pending == Some(token.0) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}
