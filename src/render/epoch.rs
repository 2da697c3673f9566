//! Render epochs: tell a running pass whether it has been superseded.

use std::cell::Cell;
use std::rc::Rc;

/// Identifies one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EpochToken(u64);

impl EpochToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Shared counter of render passes. Clones observe the same counter.
#[derive(Debug, Clone, Default)]
pub struct RenderEpoch {
    current: Rc<Cell<u64>>,
}

impl RenderEpoch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new epoch, invalidating every token handed out before.
    pub fn advance(&self) -> EpochToken {
        let next = self.current.get().wrapping_add(1);
        self.current.set(next);
        EpochToken(next)
    }

    pub fn current(&self) -> EpochToken {
        EpochToken(self.current.get())
    }

    pub fn is_current(&self, token: EpochToken) -> bool {
        self.current.get() == token.0
    }
}
