// Unit tests for the terminal presenter

use crate::input::InputMode;
use crate::terminal::{NAME_PROMPT, TerminalPresenter};

use client_core::color::{SENDER_LIGHTNESS, SENDER_SATURATION, hsl_to_rgb, hue_of};
use client_core::message_log::LogEntry;
use client_core::presenter::{Deferred, Presenter};

fn output(presenter: &TerminalPresenter<Vec<u8>>) -> String {
    String::from_utf8(presenter.writer().clone()).unwrap()
}

/// **VALUE**: Verifies entries are drawn in the color stored on the entry.
///
/// **WHY THIS MATTERS**: The hue is fixed when the entry is logged. Drawing must use that
/// value so a line looks the same however often it is redrawn.
///
/// **BUG THIS CATCHES**: Would catch the presenter deriving its own color from the sender
/// name and ignoring `LogEntry::hue`.
#[test]
fn given_entry_when_rendered_then_sender_prefixed_and_colored_by_entry_hue() {
    // GIVEN: An entry for bob
    let mut presenter = TerminalPresenter::new(Vec::new(), InputMode::new());
    let entry = LogEntry::new("bob", "hi");
    assert_eq!(entry.hue(), hue_of("bob"));

    // WHEN: Rendering it
    presenter.render_entry(&entry);

    // THEN: `@bob: hi`, with the sender in the entry's color
    let text = output(&presenter);
    assert!(text.contains("@bob"));
    assert!(text.contains(": hi\n"));

    // crossterm drops color codes when NO_COLOR is set
    if std::env::var_os("NO_COLOR").is_none() {
        let (r, g, b) = hsl_to_rgb(entry.hue(), SENDER_SATURATION, SENDER_LIGHTNESS);
        assert!(text.contains(&format!("38;2;{r};{g};{b}")));
    }
}

#[test]
fn given_chat_shown_then_reset_when_mode_checked_then_follows_presenter() {
    let mode = InputMode::new();
    let mut presenter = TerminalPresenter::new(Vec::new(), mode.clone());

    presenter.show_chat();
    assert!(mode.is_chatting());

    presenter.reset_entry();
    assert!(!mode.is_chatting());
    assert!(output(&presenter).contains(NAME_PROMPT));
}

/// **VALUE**: Verifies deferred notices print only on repaint, after earlier output.
///
/// **WHY THIS MATTERS**: After a refusal the user must see the fresh name prompt before
/// the explanation, never the other way round.
///
/// **BUG THIS CATCHES**: Would catch `after_repaint` writing immediately, or a notice
/// printed twice because the queue was not drained.
#[test]
fn given_deferred_notice_when_repainted_then_printed_once_after_prompt() {
    // GIVEN: A reset followed by a deferred notice
    let mut presenter = TerminalPresenter::new(Vec::new(), InputMode::new());
    presenter.reset_entry();
    presenter.after_repaint(Deferred::Notice(String::from("name taken")));
    assert!(!output(&presenter).contains("name taken"));

    // WHEN: Repainting twice
    presenter.repaint();
    presenter.repaint();

    // THEN: The notice appears once, after the prompt
    let text = output(&presenter);
    assert_eq!(text.matches("name taken").count(), 1);
    assert!(text.find(NAME_PROMPT).unwrap() < text.find("name taken").unwrap());
}

#[test]
fn given_notice_when_shown_then_written_immediately() {
    let mut presenter = TerminalPresenter::new(Vec::new(), InputMode::new());

    presenter.show_notice("Disconnected");

    assert!(output(&presenter).contains("* Disconnected"));
}
