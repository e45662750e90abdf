//! Line-oriented terminal presenter.
//!
//! Output is queued with crossterm and flushed on [`Presenter::repaint`].
//! Sender names are drawn in their assigned color.

use crate::input::{InputMode, QUIT_COMMAND};

use client_core::color::{SENDER_LIGHTNESS, SENDER_SATURATION, hsl_to_rgb};
use client_core::message_log::LogEntry;
use client_core::presenter::{Deferred, Presenter, RepaintQueue};

use std::io::{self, Stdout, Write, stdout};

use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor,
};
use log::warn;

pub const NAME_PROMPT: &str = "Enter a name to join the chat:";

const NOTICE_COLOR: Color = Color::Yellow;

pub struct TerminalPresenter<W: Write = Stdout> {
    out: W,
    mode: InputMode,
    deferred: RepaintQueue,
}

impl TerminalPresenter<Stdout> {
    pub fn stdout(mode: InputMode) -> Self {
        Self::new(stdout(), mode)
    }
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, mode: InputMode) -> Self {
        Self {
            out,
            mode,
            deferred: RepaintQueue::new(),
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Ask for a name. Shown once at startup and after every refusal.
    pub fn prompt_name(&mut self) {
        let result = queue!(
            self.out,
            SetAttribute(Attribute::Bold),
            Print(NAME_PROMPT),
            SetAttribute(Attribute::Reset),
            Print("\n")
        );
        self.report(result);
    }

    fn write_notice(&mut self, notice: &str) {
        let result = queue!(
            self.out,
            SetForegroundColor(NOTICE_COLOR),
            Print(format!("* {notice}")),
            ResetColor,
            Print("\n")
        );
        self.report(result);
    }

    fn report(&self, result: io::Result<()>) {
        if let Err(e) = result {
            warn!("Terminal write failed: {e}");
        }
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn show_chat(&mut self) {
        self.mode.set_chatting(true);
        let result = queue!(
            self.out,
            SetAttribute(Attribute::Bold),
            Print(format!("You're in. Type to chat, {QUIT_COMMAND} to leave.")),
            SetAttribute(Attribute::Reset),
            Print("\n")
        );
        self.report(result);
    }

    fn guard_navigation(&mut self) {
        // Quit confirmation lives in the runtime; nothing to draw.
    }

    fn reset_entry(&mut self) {
        self.mode.set_chatting(false);
        self.prompt_name();
    }

    fn render_entry(&mut self, entry: &LogEntry) {
        let (r, g, b) = hsl_to_rgb(entry.hue(), SENDER_SATURATION, SENDER_LIGHTNESS);
        let result = queue!(
            self.out,
            SetForegroundColor(Color::Rgb { r, g, b }),
            Print(format!("@{}", entry.sender())),
            ResetColor,
            Print(format!(": {}\n", entry.text()))
        );
        self.report(result);
    }

    fn scroll_to_latest(&mut self) {
        // A line terminal is always scrolled to the latest line.
    }

    fn show_notice(&mut self, notice: &str) {
        self.write_notice(notice);
    }

    fn after_repaint(&mut self, deferred: Deferred) {
        self.deferred.push(deferred);
    }

    fn repaint(&mut self) {
        let flushed = self.out.flush();
        self.report(flushed);

        if self.deferred.is_empty() {
            return;
        }

        for deferred in self.deferred.drain() {
            match deferred {
                Deferred::Notice(notice) => self.write_notice(&notice),
            }
        }
        let flushed = self.out.flush();
        self.report(flushed);
    }
}
