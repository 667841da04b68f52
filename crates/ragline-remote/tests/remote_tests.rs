use ragline_remote::generate::{first_choice, ChatResponse};
use ragline_remote::wikipedia::parse_extract;

#[test]
fn wikipedia_extract_is_parsed_from_the_pages_object() {
    let body = serde_json::json!({
        "batchcomplete": "",
        "query": {
            "pages": {
                "25734": {
                    "pageid": 25734,
                    "ns": 0,
                    "title": "Rust (programming language)",
                    "extract": "Rust is a general-purpose programming language."
                }
            }
        }
    });
    let doc = parse_extract(&body, "Rust (programming language)").expect("parse");
    assert_eq!(doc.title.as_deref(), Some("Rust (programming language)"));
    assert_eq!(doc.content, "Rust is a general-purpose programming language.");
}

#[test]
fn missing_wikipedia_page_is_an_error() {
    let body = serde_json::json!({
        "query": {
            "pages": {
                "-1": { "ns": 0, "title": "Nonexistent page", "missing": "" }
            }
        }
    });
    let err = parse_extract(&body, "Nonexistent page").unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn unexpected_wikipedia_shape_is_an_error() {
    let body = serde_json::json!({ "error": { "code": "unknown_action" } });
    assert!(parse_extract(&body, "Anything").is_err());
}

#[test]
fn completion_answer_comes_from_the_first_choice() {
    let response: ChatResponse = serde_json::from_value(serde_json::json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": "Paris." }, "finish_reason": "stop" }
        ],
        "usage": { "prompt_tokens": 12, "completion_tokens": 2 }
    }))
    .expect("deserialize");
    assert_eq!(first_choice(response).expect("choice"), "Paris.");
}

#[test]
fn empty_choices_are_an_error() {
    let response: ChatResponse =
        serde_json::from_value(serde_json::json!({ "choices": [] })).expect("deserialize");
    assert!(first_choice(response).is_err());
}
