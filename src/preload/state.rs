//! Preload progress as an explicit state machine.
//!
//! [`PreloadState::apply`] is a pure `(state, event) -> state'` transition. Counters only grow,
//! each frame settles exactly once, and the error message is sticky for the lifetime of the
//! state.

/// Message surfaced once more than half of the frames failed.
pub const MAJORITY_FAILURE_MESSAGE: &str = "Failed to load image sequence";

/// Settlement outcome of one frame slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotStatus {
    Pending,
    Loaded,
    Failed,
}

/// A single frame settling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreloadEvent {
    FrameLoaded(u32),
    FrameFailed(u32),
}

impl PreloadEvent {
    pub fn index(self) -> u32 {
        match self {
            Self::FrameLoaded(i) | Self::FrameFailed(i) => i,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreloadState {
    frame_count: u32,
    loaded_count: u32,
    failed_count: u32,
    slots: Vec<SlotStatus>,
    error_message: Option<String>,
}

impl PreloadState {
    /// Fresh state with every slot pending. `frame_count` must be >= 1.
    pub fn new(frame_count: u32) -> Self {
        Self {
            frame_count,
            loaded_count: 0,
            failed_count: 0,
            slots: vec![SlotStatus::Pending; frame_count as usize],
            error_message: None,
        }
    }

    /// Apply one settlement.
    ///
    /// Out-of-range indices and repeat settlements of an already-settled slot leave the state
    /// unchanged.
    #[must_use]
    pub fn apply(mut self, event: PreloadEvent) -> Self {
        let i = event.index() as usize;
        match self.slots.get(i) {
            Some(SlotStatus::Pending) => {}
            _ => return self,
        }

        match event {
            PreloadEvent::FrameLoaded(_) => {
                self.slots[i] = SlotStatus::Loaded;
                self.loaded_count += 1;
            }
            PreloadEvent::FrameFailed(_) => {
                self.slots[i] = SlotStatus::Failed;
                self.failed_count += 1;
                if self.error_message.is_none()
                    && f64::from(self.failed_count) > f64::from(self.frame_count) * 0.5
                {
                    self.error_message = Some(MAJORITY_FAILURE_MESSAGE.to_string());
                }
            }
        }
        self
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn loaded_count(&self) -> u32 {
        self.loaded_count
    }

    pub fn failed_count(&self) -> u32 {
        self.failed_count
    }

    pub fn settled_count(&self) -> u32 {
        self.loaded_count + self.failed_count
    }

    pub fn slot(&self, index: u32) -> Option<SlotStatus> {
        self.slots.get(index as usize).copied()
    }

    /// `floor(settled / frame_count * 100)`, in `0..=100`.
    pub fn progress_percent(&self) -> u8 {
        if self.frame_count == 0 {
            return 0;
        }
        let pct = u64::from(self.settled_count()) * 100 / u64::from(self.frame_count);
        pct.min(100) as u8
    }

    pub fn is_settled(&self) -> bool {
        self.settled_count() == self.frame_count
    }

    /// Ready once every frame loaded, or once every frame settled with at least one success.
    /// An empty state is never ready.
    pub fn is_ready(&self) -> bool {
        self.loaded_count > 0
            && (self.loaded_count == self.frame_count || self.is_settled())
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preload/state.rs"]
mod tests;
