//! Recipient resolution: find who to email inside loosely-structured call webhook payloads.
//!
//! Payloads arrive with no schema guarantee, so every lookup here is optional-chaining
//! over `serde_json::Value`. Resolution is pure: no I/O, no mutation, and a payload
//! that yields no email resolves to absence rather than an error.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Message kind that marks a post-call report worth acting on.
pub const END_OF_CALL_REPORT: &str = "end-of-call-report";

const DEFAULT_NAME: &str = "there";
const DEFAULT_TOPIC: &str = "your request";

/// Where to send the email, plus display fields with safe defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecipient {
    pub email: String,
    /// Greeting name (default "there").
    pub name: String,
    /// What the caller asked about (default "your request").
    pub topic: String,
}

impl ResolvedRecipient {
    fn with_defaults(email: &str) -> Self {
        Self {
            email: email.to_string(),
            name: DEFAULT_NAME.to_string(),
            topic: DEFAULT_TOPIC.to_string(),
        }
    }
}

/// Outcome of post-call resolution. Irrelevant kinds are distinct from a relevant
/// report where no address could be found; the HTTP layer answers differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndOfCallResolution {
    /// Message kind is not an end-of-call report (kind kept for the reply text).
    Irrelevant { kind: Option<String> },
    /// Relevant report, but no strategy produced an email.
    NotFound,
    Found(ResolvedRecipient),
}

/// Walk `path` through nested objects. Missing keys and non-object intermediate
/// values yield `None`; never panics on any JSON shape.
fn get_path<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, key| v.get(*key))
}

/// Non-empty string at `path`, or `None`.
fn get_non_empty_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    get_path(value, path)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Pull the named-argument map out of a tool-call payload.
///
/// Tool calls live in a list under `message.toolCalls` or `message.toolCallList`
/// (first non-empty list wins). The first entry's `function.arguments` is either
/// already an object or a JSON-encoded string; a string that fails to parse (or
/// parses to a non-object) is logged and treated as no tool-call args. A tool
/// call without arguments yields an empty map.
pub fn extract_tool_call_args(payload: &Value) -> Option<Map<String, Value>> {
    let message = payload.get("message").unwrap_or(&Value::Null);
    let calls = ["toolCalls", "toolCallList"]
        .iter()
        .filter_map(|key| message.get(*key).and_then(Value::as_array))
        .find(|list| !list.is_empty())?;

    match get_path(&calls[0], &["function", "arguments"]) {
        None => Some(Map::new()),
        Some(Value::Object(map)) => Some(map.clone()),
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Some(map),
            Ok(other) => {
                log::debug!("tool call arguments parsed to non-object: {}", other);
                None
            }
            Err(e) => {
                log::debug!("tool call arguments are not valid JSON: {}", e);
                None
            }
        },
        Some(_) => Some(Map::new()),
    }
}

/// Email pattern: lenient on purpose, not RFC 5322. Local part allows letters,
/// digits and `._%+-`; domain allows letters, digits and `.-`; TLD needs two or
/// more letters. Callers rely on this exact matching behavior.
fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
            .expect("email pattern compiles")
    })
}

/// First email-looking substring in `text`, leftmost match wins. Heuristic scan,
/// not a validator: tolerates surrounding prose and JSON punctuation.
pub fn extract_email_from_text(text: &str) -> Option<&str> {
    if text.is_empty() {
        return None;
    }
    email_regex().find(text).map(|m| m.as_str())
}

/// Resolve the recipient for the mid-call "send specific email" tool.
///
/// Tries the tool-call shape first, then falls back to treating the payload
/// itself as the argument map (direct invocation). `user_email` is required;
/// `user_name` and `topic` get defaults. The address is passed through as-is,
/// transport failure is the only validation downstream.
pub fn resolve_mid_call_recipient(payload: &Value) -> Option<ResolvedRecipient> {
    let args = extract_tool_call_args(payload)
        .unwrap_or_else(|| payload.as_object().cloned().unwrap_or_default());

    let email = args
        .get("user_email")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())?;
    let name = args
        .get("user_name")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_NAME);
    let topic = args
        .get("topic")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_TOPIC);

    Some(ResolvedRecipient {
        email: email.to_string(),
        name: name.to_string(),
        topic: topic.to_string(),
    })
}

/// Customer objects the platform is known to place in reports, in priority order.
const CUSTOMER_EMAIL_PATHS: [&[&str]; 3] = [
    &["message", "customer", "email"],
    &["customer", "email"],
    &["message", "call", "customer", "email"],
];

/// Last-resort strategy: serialize the whole payload and scan the text for an
/// address. Deliberately broad; can match an email sitting in unrelated
/// metadata, not just the caller's.
fn scan_payload_for_email(payload: &Value) -> Option<String> {
    let serialized = payload.to_string();
    extract_email_from_text(&serialized).map(str::to_string)
}

/// Resolve the recipient for the post-call webhook.
///
/// Classifies the message kind first (`message.type`, falling back to top-level
/// `type`); anything but an end-of-call report short-circuits as irrelevant.
/// For relevant reports, strategies run in strict priority order until one
/// yields an address: the known customer objects, then a transcript scan, then
/// the whole-payload scan.
pub fn resolve_end_of_call_recipient(payload: &Value) -> EndOfCallResolution {
    let kind = get_non_empty_str(payload, &["message", "type"])
        .or_else(|| get_non_empty_str(payload, &["type"]));
    if kind != Some(END_OF_CALL_REPORT) {
        return EndOfCallResolution::Irrelevant {
            kind: kind.map(str::to_string),
        };
    }

    for path in CUSTOMER_EMAIL_PATHS {
        if let Some(email) = get_non_empty_str(payload, path) {
            return EndOfCallResolution::Found(ResolvedRecipient::with_defaults(email));
        }
    }

    let transcript = get_non_empty_str(payload, &["message", "transcript"])
        .or_else(|| get_non_empty_str(payload, &["transcript"]));
    if let Some(email) = transcript.and_then(extract_email_from_text) {
        return EndOfCallResolution::Found(ResolvedRecipient::with_defaults(email));
    }

    if let Some(email) = scan_payload_for_email(payload) {
        return EndOfCallResolution::Found(ResolvedRecipient::with_defaults(&email));
    }

    EndOfCallResolution::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_call_args_absent_for_unrecognized_payloads() {
        for payload in [
            json!({}),
            json!(null),
            json!([1, 2, 3]),
            json!("just a string"),
            json!({"message": {}}),
            json!({"message": {"toolCalls": []}}),
            json!({"message": "not an object"}),
            json!({"toolCalls": [{"function": {"arguments": {}}}]}),
        ] {
            assert_eq!(extract_tool_call_args(&payload), None, "payload: {payload}");
        }
    }

    #[test]
    fn tool_call_args_accepts_object_arguments() {
        let payload = json!({
            "message": {"toolCalls": [{"function": {"arguments": {"user_email": "a@b.co"}}}]}
        });
        let args = extract_tool_call_args(&payload).unwrap();
        assert_eq!(args.get("user_email"), Some(&json!("a@b.co")));
    }

    #[test]
    fn tool_call_args_parses_json_string_arguments() {
        let payload = json!({
            "message": {"toolCalls": [{"function": {"arguments": "{\"topic\":\"quote\"}"}}]}
        });
        let args = extract_tool_call_args(&payload).unwrap();
        assert_eq!(args.get("topic"), Some(&json!("quote")));
    }

    #[test]
    fn tool_call_args_falls_back_to_tool_call_list() {
        let payload = json!({
            "message": {
                "toolCalls": [],
                "toolCallList": [{"function": {"arguments": {"topic": "terms"}}}]
            }
        });
        let args = extract_tool_call_args(&payload).unwrap();
        assert_eq!(args.get("topic"), Some(&json!("terms")));
    }

    #[test]
    fn tool_call_args_unparseable_string_is_absent() {
        let payload = json!({
            "message": {"toolCalls": [{"function": {"arguments": "{not json"}}]}
        });
        assert_eq!(extract_tool_call_args(&payload), None);
    }

    #[test]
    fn tool_call_args_non_object_parse_is_absent() {
        let payload = json!({
            "message": {"toolCalls": [{"function": {"arguments": "[1,2]"}}]}
        });
        assert_eq!(extract_tool_call_args(&payload), None);
    }

    #[test]
    fn tool_call_without_arguments_is_empty_map() {
        let payload = json!({"message": {"toolCalls": [{"function": {}}]}});
        assert_eq!(extract_tool_call_args(&payload), Some(Map::new()));
        let payload = json!({"message": {"toolCalls": [{}]}});
        assert_eq!(extract_tool_call_args(&payload), Some(Map::new()));
    }

    #[test]
    fn email_extraction_requires_an_at_sign() {
        assert_eq!(extract_email_from_text(""), None);
        assert_eq!(extract_email_from_text("no address here"), None);
        assert_eq!(extract_email_from_text("user at example dot com"), None);
    }

    #[test]
    fn email_extraction_takes_first_match_with_full_charset() {
        assert_eq!(
            extract_email_from_text("contact me at a.b+c@sub.example.co or ignore"),
            Some("a.b+c@sub.example.co")
        );
        assert_eq!(
            extract_email_from_text("first@one.com then second@two.com"),
            Some("first@one.com")
        );
    }

    #[test]
    fn email_extraction_tolerates_json_punctuation() {
        assert_eq!(
            extract_email_from_text(r#"{"email":"jane_doe99@mail-host.io"}"#),
            Some("jane_doe99@mail-host.io")
        );
    }

    #[test]
    fn mid_call_resolves_tool_call_with_string_arguments() {
        let payload = json!({
            "message": {"toolCalls": [{"function": {
                "arguments": "{\"user_email\":\"x@y.com\",\"topic\":\"quote\"}"
            }}]}
        });
        let r = resolve_mid_call_recipient(&payload).unwrap();
        assert_eq!(r.email, "x@y.com");
        assert_eq!(r.topic, "quote");
        assert_eq!(r.name, "there");
    }

    #[test]
    fn mid_call_falls_back_to_direct_payload() {
        let payload = json!({"user_email": "direct@example.com", "user_name": "Sam"});
        let r = resolve_mid_call_recipient(&payload).unwrap();
        assert_eq!(r.email, "direct@example.com");
        assert_eq!(r.name, "Sam");
        assert_eq!(r.topic, "your request");
    }

    #[test]
    fn mid_call_without_email_is_absent() {
        assert_eq!(resolve_mid_call_recipient(&json!({})), None);
        assert_eq!(
            resolve_mid_call_recipient(&json!({"user_email": ""})),
            None
        );
        assert_eq!(
            resolve_mid_call_recipient(&json!({"user_email": 42})),
            None
        );
        // An empty tool-call argument map does not fall through to the payload.
        let payload = json!({
            "message": {"toolCalls": [{"function": {"arguments": {}}}]},
            "user_email": "top@example.com"
        });
        assert_eq!(resolve_mid_call_recipient(&payload), None);
    }

    #[test]
    fn end_of_call_irrelevant_kinds_short_circuit() {
        let r = resolve_end_of_call_recipient(&json!({"message": {"type": "status-update"}}));
        assert_eq!(
            r,
            EndOfCallResolution::Irrelevant {
                kind: Some("status-update".to_string())
            }
        );
        let r = resolve_end_of_call_recipient(&json!({}));
        assert_eq!(r, EndOfCallResolution::Irrelevant { kind: None });
    }

    #[test]
    fn end_of_call_kind_falls_back_to_top_level_type() {
        let payload = json!({"type": END_OF_CALL_REPORT, "customer": {"email": "c@d.com"}});
        let r = resolve_end_of_call_recipient(&payload);
        assert_eq!(
            r,
            EndOfCallResolution::Found(ResolvedRecipient::with_defaults("c@d.com"))
        );
    }

    #[test]
    fn end_of_call_prefers_message_customer() {
        // Customer object wins over a transcript that also carries an address.
        let payload = json!({
            "message": {
                "type": END_OF_CALL_REPORT,
                "customer": {"email": "c@d.com"},
                "transcript": "reach me at other@elsewhere.net"
            },
            "customer": {"email": "top@level.org"}
        });
        let r = resolve_end_of_call_recipient(&payload);
        assert_eq!(
            r,
            EndOfCallResolution::Found(ResolvedRecipient::with_defaults("c@d.com"))
        );
    }

    #[test]
    fn end_of_call_checks_call_customer() {
        let payload = json!({
            "message": {
                "type": END_OF_CALL_REPORT,
                "call": {"customer": {"email": "nested@call.example"}}
            }
        });
        let r = resolve_end_of_call_recipient(&payload);
        assert_eq!(
            r,
            EndOfCallResolution::Found(ResolvedRecipient::with_defaults("nested@call.example"))
        );
    }

    #[test]
    fn end_of_call_scans_transcript_when_no_customer() {
        let payload = json!({
            "message": {
                "type": END_OF_CALL_REPORT,
                "transcript": "Email me at jane_doe99@mail-host.io please"
            }
        });
        let r = resolve_end_of_call_recipient(&payload);
        assert_eq!(
            r,
            EndOfCallResolution::Found(ResolvedRecipient::with_defaults("jane_doe99@mail-host.io"))
        );
    }

    #[test]
    fn end_of_call_empty_customer_email_falls_through() {
        let payload = json!({
            "message": {
                "type": END_OF_CALL_REPORT,
                "customer": {"email": ""},
                "transcript": "use fallback@example.com"
            }
        });
        let r = resolve_end_of_call_recipient(&payload);
        assert_eq!(
            r,
            EndOfCallResolution::Found(ResolvedRecipient::with_defaults("fallback@example.com"))
        );
    }

    #[test]
    fn end_of_call_whole_payload_scan_is_last_resort() {
        // No customer object, no transcript, but an address buried in metadata.
        let payload = json!({
            "message": {
                "type": END_OF_CALL_REPORT,
                "analysis": {"summary": "caller mentioned buried@deep.example once"}
            }
        });
        let r = resolve_end_of_call_recipient(&payload);
        assert_eq!(
            r,
            EndOfCallResolution::Found(ResolvedRecipient::with_defaults("buried@deep.example"))
        );
    }

    #[test]
    fn end_of_call_without_any_email_is_not_found() {
        let payload = json!({
            "message": {"type": END_OF_CALL_REPORT, "transcript": "no address given"}
        });
        assert_eq!(
            resolve_end_of_call_recipient(&payload),
            EndOfCallResolution::NotFound
        );
    }

    #[test]
    fn resolution_is_idempotent() {
        let payload = json!({
            "message": {
                "type": END_OF_CALL_REPORT,
                "transcript": "Email me at jane_doe99@mail-host.io please"
            }
        });
        let before = payload.clone();
        let first = resolve_end_of_call_recipient(&payload);
        let second = resolve_end_of_call_recipient(&payload);
        assert_eq!(first, second);
        assert_eq!(payload, before);
    }
}
