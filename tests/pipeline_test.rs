//! End-to-end tests for the capture pipeline with a scripted device,
//! a scripted window context and a manual clock.

use chrono::{DateTime, Duration, Local, TimeZone};
use keysession::collector::codes::*;
use keysession::collector::{DeviceReader, EventClass, EventError, EventSource, KeyState, RawKeyEvent};
use keysession::context::{ContextFailure, ContextProber, WindowContext};
use keysession::core::{Clock, Pipeline, PipelineError};
use keysession::sink::LogSink;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::Cursor;
use std::rc::Rc;

type SharedTime = Rc<Cell<DateTime<Local>>>;

fn start_time() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2025, 12, 24, 18, 26, 2)
        .single()
        .unwrap()
}

struct ManualClock(SharedTime);

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        self.0.get()
    }
}

/// Yields events in order, advancing the clock by each event's delay first.
struct ScriptedSource {
    events: VecDeque<(i64, RawKeyEvent)>,
    time: SharedTime,
}

impl EventSource for ScriptedSource {
    fn next_event(&mut self) -> Result<Option<RawKeyEvent>, EventError> {
        Ok(self.events.pop_front().map(|(delay_ms, event)| {
            self.time
                .set(self.time.get() + Duration::milliseconds(delay_ms));
            event
        }))
    }
}

/// Hands out contexts in order, repeating the last one.
struct ScriptedProber {
    contexts: VecDeque<WindowContext>,
    calls: Rc<RefCell<usize>>,
}

impl ContextProber for ScriptedProber {
    fn probe(&mut self) -> WindowContext {
        *self.calls.borrow_mut() += 1;
        if self.contexts.len() > 1 {
            self.contexts.pop_front().unwrap()
        } else {
            self.contexts.front().cloned().unwrap()
        }
    }
}

struct Run {
    output: String,
    probes: usize,
    result: Result<(), PipelineError>,
}

fn run(events: Vec<(i64, RawKeyEvent)>, contexts: Vec<WindowContext>) -> Run {
    let time = Rc::new(Cell::new(start_time()));
    let calls = Rc::new(RefCell::new(0));
    let source = ScriptedSource {
        events: events.into(),
        time: time.clone(),
    };
    let prober = ScriptedProber {
        contexts: contexts.into(),
        calls: calls.clone(),
    };

    let mut pipeline = Pipeline::new(source, LogSink::new(Vec::new()), prober, ManualClock(time));
    let result = pipeline.run();
    let output = String::from_utf8(pipeline.into_sink().into_inner()).unwrap();
    let probes = *calls.borrow();

    Run {
        output,
        probes,
        result,
    }
}

fn tap(delay_ms: i64, code: u16) -> Vec<(i64, RawKeyEvent)> {
    vec![
        (delay_ms, RawKeyEvent::press(code)),
        (0, RawKeyEvent::release(code)),
    ]
}

fn editor() -> WindowContext {
    WindowContext::known("notes.txt", "gedit")
}

#[test]
fn test_first_key_opens_session() {
    let result = run(tap(0, KEY_A), vec![editor()]);

    assert!(result.result.is_ok());
    assert_eq!(result.output, "\r\n\n[12-24-2025 18:26:02] [gedit - notes.txt] a");
    assert_eq!(result.probes, 1);
}

#[test]
fn test_shifted_key_continues_session() {
    let mut events = tap(0, KEY_A);
    events.push((100, RawKeyEvent::press(KEY_LEFTSHIFT)));
    events.extend(tap(100, KEY_A));
    events.push((0, RawKeyEvent::release(KEY_LEFTSHIFT)));
    events.extend(tap(100, KEY_A));

    let result = run(events, vec![editor()]);

    assert!(result.result.is_ok());
    assert_eq!(
        result.output,
        "\r\n\n[12-24-2025 18:26:02] [gedit - notes.txt] aAa"
    );
}

#[test]
fn test_idle_gap_opens_new_session_with_fresh_context() {
    let mut events = tap(0, KEY_H);
    events.extend(tap(1_000, KEY_I));
    events.extend(tap(5_000, KEY_O));
    events.extend(tap(4_999, KEY_K));

    let result = run(
        events,
        vec![editor(), WindowContext::known("Inbox", "thunderbird")],
    );

    assert_eq!(
        result.output,
        "\r\n\n[12-24-2025 18:26:02] [gedit - notes.txt] hi\
         \r\n\n[12-24-2025 18:26:08] [thunderbird - Inbox] ok"
    );
    assert_eq!(result.probes, 2);
    assert_eq!(result.output.matches("\r\n\n").count(), 2);
}

#[test]
fn test_unrecognized_keys_do_not_touch_session_timer() {
    // Unmapped presses during the gap must not keep the session alive.
    let mut events = tap(0, KEY_A);
    events.extend(tap(3_000, KEY_MAX));
    events.extend(tap(3_000, KEY_MAX));
    events.extend(tap(0, KEY_B));

    let result = run(events, vec![editor(), WindowContext::known("b", "app")]);

    assert_eq!(
        result.output,
        "\r\n\n[12-24-2025 18:26:02] [gedit - notes.txt] a\
         \r\n\n[12-24-2025 18:26:08] [app - b] b"
    );
}

#[test]
fn test_unrecognized_first_key_writes_nothing() {
    let result = run(tap(0, KEY_MAX), vec![editor()]);

    assert!(result.result.is_ok());
    assert!(result.output.is_empty());
    assert_eq!(result.probes, 0);
}

#[test]
fn test_missing_display_uses_placeholders() {
    let mut events = tap(0, KEY_X);
    events.extend(tap(10, KEY_LEFT));

    let result = run(
        events,
        vec![WindowContext::unavailable(ContextFailure::NoDisplay)],
    );

    assert!(result.result.is_ok());
    assert_eq!(
        result.output,
        "\r\n\n[12-24-2025 18:26:02] [no display available - no display available] x[LEFT]"
    );
}

#[test]
fn test_desynchronized_shift_release_stops_pipeline() {
    let mut events = tap(0, KEY_A);
    events.push((0, RawKeyEvent::release(KEY_RIGHTSHIFT)));
    events.extend(tap(0, KEY_B));

    let result = run(events, vec![editor()]);

    assert!(matches!(result.result, Err(PipelineError::ModifierDesync(_))));
    assert_eq!(result.output, "\r\n\n[12-24-2025 18:26:02] [gedit - notes.txt] a");
}

#[test]
fn test_replay_is_byte_identical() {
    let script = || {
        let mut events = Vec::new();
        for (i, code) in [KEY_H, KEY_E, KEY_L, KEY_L, KEY_O, KEY_ENTER].into_iter().enumerate() {
            events.extend(tap(if i == 3 { 7_000 } else { 200 }, code));
        }
        events
    };

    let first = run(script(), vec![editor()]);
    let second = run(script(), vec![editor()]);

    assert_eq!(first.output, second.output);
    assert!(first.output.ends_with("lo\n"));
}

#[test]
fn test_device_bytes_through_pipeline() {
    let other = RawKeyEvent {
        class: EventClass::Other(0),
        code: 0,
        state: KeyState::Release,
    };
    let records = [
        RawKeyEvent::press(KEY_RIGHTSHIFT),
        other,
        RawKeyEvent::press(KEY_1),
        RawKeyEvent::key(KEY_1, KeyState::Repeat),
        RawKeyEvent::release(KEY_1),
        RawKeyEvent::release(KEY_RIGHTSHIFT),
        RawKeyEvent::press(KEY_1),
    ];
    let bytes: Vec<u8> = records.iter().flat_map(|r| r.to_bytes()).collect();

    let time = Rc::new(Cell::new(start_time()));
    let prober = ScriptedProber {
        contexts: vec![editor()].into(),
        calls: Rc::new(RefCell::new(0)),
    };
    let mut pipeline = Pipeline::new(
        DeviceReader::new(Cursor::new(bytes)),
        LogSink::new(Vec::new()),
        prober,
        ManualClock(time),
    );

    pipeline.run().unwrap();
    let stats = pipeline.stats().snapshot();
    assert_eq!(stats.events_read, 7);
    assert_eq!(stats.keys_logged, 2);
    assert_eq!(stats.unrecognized_keys, 1);

    let output = String::from_utf8(pipeline.into_sink().into_inner()).unwrap();
    assert!(output.ends_with("] !1"));
}

#[test]
fn test_truncated_device_record_is_fatal() {
    let mut bytes = RawKeyEvent::press(KEY_A).to_bytes().to_vec();
    bytes.extend_from_slice(&[1, 2]);

    let time = Rc::new(Cell::new(start_time()));
    let prober = ScriptedProber {
        contexts: vec![editor()].into(),
        calls: Rc::new(RefCell::new(0)),
    };
    let mut pipeline = Pipeline::new(
        DeviceReader::new(Cursor::new(bytes)),
        LogSink::new(Vec::new()),
        prober,
        ManualClock(time),
    );

    assert!(matches!(
        pipeline.run(),
        Err(PipelineError::Source(EventError::ShortRead { .. }))
    ));
    let output = String::from_utf8(pipeline.into_sink().into_inner()).unwrap();
    assert!(output.ends_with("] a"));
}
