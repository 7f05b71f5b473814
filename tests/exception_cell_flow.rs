//! End-to-end flow: format an exception record into region texts, bind a
//! cell model, and search/select across the message and detail regions as
//! one ordered sequence.

use chrono::{Local, TimeZone};
use logcell::{CellTextModel, EntryKind, LogRecord, Throwable};

fn exception_record() -> LogRecord {
    let outer = Throwable::with_frames(
        "java.lang.RuntimeException",
        Some("request failed"),
        &[
            "app/com.example.Handler.dispatch(Handler.java:88)",
            "app/com.example.Main.main(Main.java:12)",
        ],
    );
    let inner = Throwable::with_frames(
        "java.io.IOException",
        Some("connection reset"),
        &[
            "app/com.example.Socket.read(Socket.java:41)",
            "app/com.example.Main.main(Main.java:12)",
        ],
    );
    outer.set_cause(inner);

    let timestamp = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
    LogRecord::at(timestamp, EntryKind::Exception(outer))
}

#[test]
fn test_exception_regions_render_with_elision() {
    let regions = logcell::entry_regions(&exception_record());

    assert_eq!(regions.len(), 2);
    assert!(regions[0].starts_with("09:30:00.000 java.lang.RuntimeException"));
    assert!(regions[1].contains("Caused by: java.io.IOException: connection reset"));
    // The shared Main.main frame of the cause is elided.
    assert!(regions[1].contains("\t... 1 more"));
    assert_eq!(regions[1].matches("Main.main").count(), 1);
}

#[test]
fn test_search_spans_message_and_detail_regions() {
    let mut model = CellTextModel::new();
    model.bind(7, &logcell::entry_regions(&exception_record()));

    model.set_find_keyword(Some("java"));
    assert!(model.match_count() > 2);

    // Walk every match: keys must come out in strictly increasing order,
    // message region first, then the detail region.
    let mut keys = Vec::new();
    while let Some(key) = model.focus_next_match(true) {
        keys.push(key);
    }
    assert_eq!(keys.len(), model.match_count());
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(keys.first().unwrap().region, 0);
    assert_eq!(keys.last().unwrap().region, 1);

    // Every key resolves to an occurrence of the keyword.
    for key in keys {
        let (region, m) = model.match_range(key).unwrap();
        assert_eq!(&model.region_text(region)[m.start..m.end], "java");
    }
}

#[test]
fn test_selection_then_copy_whole_cell_fallback() {
    let mut model = CellTextModel::new();
    model.bind(7, &logcell::entry_regions(&exception_record()));

    // Drag over "request failed" in the summary region.
    let text = model.region_text(0).to_string();
    let start = text.find("request").unwrap();
    model.select_from_point(0, start);
    model.drag_to(0, start + "request failed".len());
    assert_eq!(model.selected_text(false), "request failed");

    // Clearing the selection falls back to the whole cell text on copy.
    model.clear_selection();
    let copied = model.selected_text(true);
    assert!(copied.contains("request failed"));
    assert!(copied.contains("Caused by:"));
    assert_eq!(model.selected_text(false), "");
}

#[test]
fn test_rebinding_another_record_resets_search_navigation() {
    let mut model = CellTextModel::new();
    model.bind(7, &logcell::entry_regions(&exception_record()));
    model.set_find_keyword(Some("example"));
    model.focus_next_match(true);
    model.focus_next_match(true);

    let message = LogRecord::at(
        Local.with_ymd_and_hms(2024, 5, 1, 9, 31, 0).unwrap(),
        EntryKind::Message("no example here either: example".to_string()),
    );
    model.bind(8, &logcell::entry_regions(&message));

    // Keyword persists across the rebind and matches the new text.
    assert_eq!(model.match_count(), 2);
    let key = model.focus_next_match(true).unwrap();
    assert_eq!((key.region, key.ordinal), (0, 0));
}
