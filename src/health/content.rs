//! Response text aggregation for content checks.
//!
//! Supported shapes:
//! - OpenAI JSON: `choices[0].message.content`
//! - Anthropic JSON: `content[0].text`
//! - SSE streams: `data:` lines from either provider, aggregated in order
//! - Anything else: the raw body, lossily decoded

use serde_json::Value;

const SSE_DATA_PREFIX: &str = "data:";
const SSE_DONE: &str = "[DONE]";

/// Extract the text a content check should match against.
pub fn extract_text(body: &[u8]) -> String {
    if let Ok(document) = serde_json::from_slice::<Value>(body) {
        if let Some(text) = json_document_text(&document) {
            return text.to_string();
        }
    }

    let raw = String::from_utf8_lossy(body);
    if raw.contains("event:") && raw.contains(SSE_DATA_PREFIX) {
        return extract_sse_text(&raw);
    }

    raw.into_owned()
}

fn json_document_text(document: &Value) -> Option<&str> {
    let first_choice = document
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first());
    if let Some(content) = first_choice
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
    {
        return Some(content);
    }

    document
        .get("content")
        .and_then(Value::as_array)
        .and_then(|blocks| blocks.first())
        .and_then(|block| block.get("text"))
        .and_then(Value::as_str)
}

/// Concatenate the text fragments carried by an SSE stream's `data:` lines.
///
/// Payloads that are not JSON are appended verbatim.
pub fn extract_sse_text(stream: &str) -> String {
    let mut aggregated = String::new();

    for line in stream.split('\n') {
        let Some(payload) = line.trim().strip_prefix(SSE_DATA_PREFIX) else {
            continue;
        };
        let payload = payload.trim();
        if payload.is_empty() || payload == SSE_DONE {
            continue;
        }

        match serde_json::from_str::<Value>(payload) {
            Ok(Value::Object(event)) => append_event_text(&event, &mut aggregated),
            Ok(_) => {}
            Err(_) => aggregated.push_str(payload),
        }
    }

    aggregated
}

fn append_event_text(event: &serde_json::Map<String, Value>, out: &mut String) {
    // Anthropic content_block_delta
    if let Some(text) = event
        .get("delta")
        .and_then(|delta| delta.get("text"))
        .and_then(Value::as_str)
    {
        out.push_str(text);
    }

    if let Some(choices) = event.get("choices").and_then(Value::as_array) {
        for choice in choices {
            if let Some(content) = choice
                .get("delta")
                .and_then(|delta| delta.get("content"))
                .and_then(Value::as_str)
            {
                out.push_str(content);
            }
        }
    }

    for key in ["content", "message"] {
        if let Some(text) = event.get(key).and_then(Value::as_str) {
            out.push_str(text);
        }
    }
}
