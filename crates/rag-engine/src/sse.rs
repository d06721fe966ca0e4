//! Server-Sent Events wire formatting.
//!
//! This crate only formats individual events as SSE frames; mounting them
//! onto an actual HTTP response (setting `Cache-Control: no-cache` and an
//! upstream-buffer-disable hint, writing to the wire) is the HTTP layer's
//! job and stays out of scope for this crate.

use crate::stream::{event_payload_json, StreamEvent};

/// The SSE "event" name for a given [`StreamEvent`] variant.
fn event_kind(event: &StreamEvent) -> &'static str {
    match event {
        StreamEvent::Start(_) => "start",
        StreamEvent::WorkflowStep(_) => "workflow_step",
        StreamEvent::Documents(_) => "documents",
        StreamEvent::Chunk(_) => "chunk",
        StreamEvent::Done(_) => "done",
        StreamEvent::Error(_) => "error",
    }
}

/// Format one event as an SSE frame: `event: <kind>\ndata: <json>\n\n`.
/// The `data` payload is the event's own fields, not the `{event, data}`
/// envelope `StreamEvent`'s `Serialize` impl produces internally — the SSE
/// `event:` line already carries the kind.
pub fn format_sse(event: &StreamEvent) -> String {
    let payload = event_payload_json(event);
    let data = payload
        .get("data")
        .cloned()
        .unwrap_or(serde_json::Value::Null);
    format!("event: {}\ndata: {}\n\n", event_kind(event), data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{DonePayload, ErrorPayload};

    #[test]
    fn formats_done_event_with_expected_shape() {
        let event = StreamEvent::Done(DonePayload {
            final_answer: Some("hi".into()),
            status: "completed",
        });
        let frame = format_sse(&event);
        assert!(frame.starts_with("event: done\n"));
        assert!(frame.ends_with("\n\n"));
        assert!(frame.contains("\"final_answer\":\"hi\""));
    }

    #[test]
    fn formats_error_event() {
        let event = StreamEvent::Error(ErrorPayload {
            error: "RetrievalFailure".into(),
            message: "boom".into(),
        });
        let frame = format_sse(&event);
        assert!(frame.starts_with("event: error\n"));
    }
}
