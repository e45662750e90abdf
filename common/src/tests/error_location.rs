use crate::ErrorLocation;
use std::panic::Location;

#[track_caller]
fn capture_at_call_site() -> ErrorLocation {
    ErrorLocation::caller()
}

/// **VALUE**: Verifies that `ErrorLocation::from()` captures file, line, and column.
///
/// **WHY THIS MATTERS**: Every error in the workspace prints its location. If capture
/// breaks, all error messages lose their debugging value.
///
/// **BUG THIS CATCHES**: Would catch if file path or line extraction stops working.
#[test]
fn given_location_caller_when_error_location_created_then_captures_file_line_column() {
    // GIVEN: The line right before the capture
    let expected_line = line!() + 3;

    // WHEN: Creating ErrorLocation from the current location
    let location = ErrorLocation::from(Location::caller());

    // THEN: Should capture file, line, and column
    assert!(
        location.file.contains("error_location.rs"),
        "Should capture file path"
    );
    assert_eq!(location.line, expected_line, "Should capture correct line number");
    assert!(location.column > 0, "Should capture column number");
}

/// **VALUE**: Verifies that `ErrorLocation::caller()` reports the caller of a
/// `#[track_caller]` function, not the function body.
///
/// **WHY THIS MATTERS**: Error constructors are `#[track_caller]` helpers. The location
/// must point at the code that asked for the error.
///
/// **BUG THIS CATCHES**: Would catch if `caller()` loses its `#[track_caller]` attribute.
#[test]
fn given_track_caller_helper_when_called_then_location_is_call_site() {
    // GIVEN: The line of the call below
    let expected_line = line!() + 3;

    // WHEN: Capturing through a helper
    let location = capture_at_call_site();

    // THEN: The line is the call site
    assert_eq!(location.line, expected_line);
}

/// **VALUE**: Verifies the Display format is `[file:line:column]`.
///
/// **WHY THIS MATTERS**: Every error message embeds this format; log scraping relies on it.
///
/// **BUG THIS CATCHES**: Would catch a changed bracket or separator layout.
#[test]
fn given_error_location_when_formatted_then_produces_bracketed_format() {
    // GIVEN: A fixed ErrorLocation
    let location = ErrorLocation {
        file: "src/lib.rs",
        line: 7,
        column: 3,
    };

    // WHEN: Formatting as string
    let formatted = location.to_string();

    // THEN: Bracketed file:line:column
    assert_eq!(formatted, "[src/lib.rs:7:3]");
}

/// **VALUE**: Verifies ErrorLocation serializes to JSON with its three fields.
///
/// **WHY THIS MATTERS**: Structured error reports carry the location as data.
///
/// **BUG THIS CATCHES**: Would catch removal of the `Serialize` derive or renamed fields.
#[test]
fn given_error_location_when_serialized_then_contains_fields() {
    let location = ErrorLocation {
        file: "a.rs",
        line: 1,
        column: 2,
    };

    let json = serde_json::to_string(&location).unwrap();

    assert_eq!(json, r#"{"file":"a.rs","line":1,"column":2}"#);
}
