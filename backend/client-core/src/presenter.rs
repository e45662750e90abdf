//! Seam between the chat runtime and whatever draws it.
//!
//! The runtime never formats output itself. It calls a [`Presenter`] for each
//! visible change, then calls [`Presenter::repaint`] once the event has been
//! fully handled. Work that must wait until the user has seen the new state
//! (the rejection notice) goes through [`Presenter::after_repaint`].

use crate::message_log::LogEntry;

use std::collections::VecDeque;

/// Work to run once the pending changes have been painted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deferred {
    Notice(String),
}

/// Front-end adapter driven by [`ChatRuntime`](crate::runtime::ChatRuntime).
pub trait Presenter {
    /// Hide name entry; show and focus chat input.
    fn show_chat(&mut self);

    /// Arm the "confirm before leaving" guard.
    fn guard_navigation(&mut self);

    /// Clear and refocus name entry.
    fn reset_entry(&mut self);

    fn render_entry(&mut self, entry: &LogEntry);

    fn scroll_to_latest(&mut self);

    /// Show a notice right away.
    fn show_notice(&mut self, notice: &str);

    /// Run `deferred` after the next repaint.
    fn after_repaint(&mut self, deferred: Deferred);

    /// Flush pending output, then run whatever was deferred until now.
    fn repaint(&mut self);
}

/// FIFO of deferred work, for presenters to embed.
#[derive(Debug, Default)]
pub struct RepaintQueue {
    pending: VecDeque<Deferred>,
}

impl RepaintQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, deferred: Deferred) {
        self.pending.push_back(deferred);
    }

    /// Take everything queued so far, oldest first.
    pub fn drain(&mut self) -> Vec<Deferred> {
        self.pending.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
