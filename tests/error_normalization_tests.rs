use playlist_plex_importer::errors::{message_from_error_body, ErrorDetail};
use serde_json::json;

#[test]
fn missing_detail_yields_unknown_error() {
    assert_eq!(message_from_error_body(&json!({})), "unknown error");
    assert_eq!(message_from_error_body(&json!(null)), "unknown error");
    assert_eq!(
        message_from_error_body(&json!({ "detail": null })),
        "unknown error"
    );
}

#[test]
fn string_detail_is_returned_verbatim() {
    assert_eq!(
        message_from_error_body(&json!({ "detail": "bad token" })),
        "bad token"
    );
}

#[test]
fn field_errors_drop_leading_scope_segment() {
    let body = json!({
        "detail": [
            { "loc": ["body", "url"], "msg": "field required" }
        ]
    });
    assert_eq!(message_from_error_body(&body), "url - field required");
}

#[test]
fn multiple_field_errors_are_joined_with_semicolons() {
    let body = json!({
        "detail": [
            { "loc": ["body", "plex_url"], "msg": "field required" },
            { "loc": ["body", "songs", 3, "title"], "msg": "str type expected" }
        ]
    });
    assert_eq!(
        message_from_error_body(&body),
        "plex_url - field required; songs.3.title - str type expected"
    );
}

#[test]
fn structured_detail_is_serialized() {
    let body = json!({ "detail": { "code": 42 } });
    assert_eq!(message_from_error_body(&body), r#"{"code":42}"#);
}

#[test]
fn scalar_detail_yields_unknown_format() {
    assert_eq!(
        message_from_error_body(&json!({ "detail": 7 })),
        "unknown error format"
    );
    assert_eq!(
        message_from_error_body(&json!({ "detail": true })),
        "unknown error format"
    );
}

#[test]
fn classification_is_shape_driven() {
    assert_eq!(ErrorDetail::classify(&json!({})), ErrorDetail::Missing);
    assert_eq!(
        ErrorDetail::classify(&json!({ "detail": "x" })),
        ErrorDetail::Text("x".into())
    );
    assert!(matches!(
        ErrorDetail::classify(&json!({ "detail": [{ "loc": ["body"], "msg": "m" }] })),
        ErrorDetail::Fields(_)
    ));
    // An array whose elements are not field errors still normalizes, as a
    // serialized structure rather than a panic.
    let weird = json!({ "detail": [1, 2, 3] });
    assert!(matches!(
        ErrorDetail::classify(&weird),
        ErrorDetail::Structured(_)
    ));
    assert_eq!(message_from_error_body(&weird), "[1,2,3]");
}
