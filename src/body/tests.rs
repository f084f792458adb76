use super::{Body, BodyError, DecodeError, FilePartRef, Kind, PayloadSource};
use crate::schema::{FieldError, FieldType, Schema};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct TextSource {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl PayloadSource for TextSource {
    fn kind_tag(&self) -> &str {
        "text"
    }

    fn read_text(&self) -> Result<String, DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(DecodeError::new("stream closed"))
        } else {
            Ok("hello".to_string())
        }
    }
}

struct JsonSource {
    calls: Arc<AtomicUsize>,
    payload: &'static str,
}

impl PayloadSource for JsonSource {
    fn kind_tag(&self) -> &str {
        "json"
    }

    fn read_json(&self) -> Result<Vec<u8>, DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.payload.as_bytes().to_vec())
    }
}

struct FieldsSource {
    file_calls: Arc<AtomicUsize>,
    payload: &'static str,
    file_bytes: Vec<u8>,
}

impl PayloadSource for FieldsSource {
    fn kind_tag(&self) -> &str {
        "fields"
    }

    fn read_fields(&self) -> Result<Vec<u8>, DecodeError> {
        Ok(self.payload.as_bytes().to_vec())
    }

    fn read_files(&self) -> Result<Vec<FilePartRef<'_>>, DecodeError> {
        self.file_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![FilePartRef {
            field: "avatar",
            name: "cat.png",
            content_type: "image/png",
            size: self.file_bytes.len() as u64,
            bytes: &self.file_bytes,
        }])
    }
}

struct BinarySource {
    calls: Arc<AtomicUsize>,
}

impl PayloadSource for BinarySource {
    fn kind_tag(&self) -> &str {
        "bin"
    }

    fn read_binary(&self) -> Result<(Vec<u8>, String), DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((vec![0xde, 0xad], "application/octet-stream".to_string()))
    }
}

fn json_body(payload: &'static str) -> (Body, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let body = Body::new(Box::new(JsonSource {
        calls: Arc::clone(&calls),
        payload,
    }));
    (body, calls)
}

#[test]
fn test_kind_from_tag() {
    assert_eq!(Kind::from_tag("text"), Kind::Text);
    assert_eq!(Kind::from_tag("json"), Kind::Json);
    assert_eq!(Kind::from_tag("fields"), Kind::Fields);
    assert_eq!(Kind::from_tag("bin"), Kind::Binary);
    assert_eq!(Kind::from_tag("octet"), Kind::None);
    assert_eq!(Kind::from_tag(""), Kind::None);
}

#[test]
fn test_kind_mismatch_never_decodes() {
    let (body, calls) = json_body("{}");

    assert!(matches!(
        body.text(),
        Err(BodyError::KindMismatch {
            expected: Kind::Text,
            actual: Kind::Json
        })
    ));
    assert!(matches!(
        body.fields(),
        Err(BodyError::KindMismatch {
            expected: Kind::Fields,
            ..
        })
    ));
    assert!(matches!(
        body.files(),
        Err(BodyError::KindMismatch {
            expected: Kind::Fields,
            ..
        })
    ));
    assert!(matches!(
        body.binary(),
        Err(BodyError::KindMismatch {
            expected: Kind::Binary,
            ..
        })
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_text_decodes_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let body = Body::new(Box::new(TextSource {
        calls: Arc::clone(&calls),
        fail: false,
    }));

    for _ in 0..3 {
        assert_eq!(body.text().unwrap(), "hello");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_text_decode_error_cached() {
    let calls = Arc::new(AtomicUsize::new(0));
    let body = Body::new(Box::new(TextSource {
        calls: Arc::clone(&calls),
        fail: true,
    }));

    let first = body.text().unwrap_err();
    let second = body.text().unwrap_err();
    assert_eq!(first, second);
    assert!(matches!(first, BodyError::Decode(ref e) if e.message() == "stream closed"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_json_bytes_fetched_once() {
    let (body, calls) = json_body(r#"{"name":"Fluffy"}"#);

    let first = body.json().unwrap();
    let second = body.json().unwrap();
    assert_eq!(first, second);
    assert_eq!(first["name"], "Fluffy");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_json_malformed_fails_every_call() {
    let (body, calls) = json_body("not json at all");

    assert!(matches!(body.json(), Err(BodyError::Malformed(_))));
    assert!(matches!(body.json(), Err(BodyError::Malformed(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_json_rejects_non_object_payload() {
    let (body, _) = json_body("[1, 2, 3]");
    assert!(matches!(body.json(), Err(BodyError::Malformed(_))));
}

#[test]
fn test_json_with_schema_coerces() {
    let (body, _) = json_body(r#"{"age":"3","name":"Fluffy"}"#);
    let schema = Schema::new([("age", FieldType::Int), ("name", FieldType::String)]);

    let data = body.json_with(&schema).unwrap();
    assert_eq!(data["age"], 3);
    assert_eq!(data["name"], "Fluffy");
}

#[test]
fn test_json_with_schema_names_failing_field() {
    let (body, _) = json_body(r#"{"age":"three"}"#);
    let schema = Schema::new([("age", FieldType::Int)]);

    match body.json_with(&schema) {
        Err(BodyError::Validation(err)) => {
            assert_eq!(err.field(), "age");
            assert!(matches!(err.cause(), FieldError::Parse { .. }));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_fields_decode_and_validate() {
    let body = Body::new(Box::new(FieldsSource {
        file_calls: Arc::new(AtomicUsize::new(0)),
        payload: r#"{"qty":"2","gift":"true"}"#,
        file_bytes: Vec::new(),
    }));
    let schema = Schema::new([("qty", FieldType::Int), ("gift", FieldType::Boolean)]);

    let data = body.fields_with(&schema).unwrap();
    assert_eq!(data["qty"], 2);
    assert_eq!(data["gift"], true);
}

#[test]
fn test_files_not_memoized_and_owned() {
    let file_calls = Arc::new(AtomicUsize::new(0));
    let body = Body::new(Box::new(FieldsSource {
        file_calls: Arc::clone(&file_calls),
        payload: "{}",
        file_bytes: vec![1, 2, 3],
    }));

    let first = body.files().unwrap();
    let second = body.files().unwrap();
    assert_eq!(file_calls.load(Ordering::SeqCst), 2);
    assert_eq!(first, second);
    assert_eq!(first[0].field, "avatar");
    assert_eq!(first[0].name, "cat.png");
    assert_eq!(first[0].content_type, "image/png");
    assert_eq!(first[0].size, 3);
    assert_eq!(first[0].bytes, vec![1, 2, 3]);
}

#[test]
fn test_files_default_is_empty() {
    struct BareFields;
    impl PayloadSource for BareFields {
        fn kind_tag(&self) -> &str {
            "fields"
        }

        fn read_fields(&self) -> Result<Vec<u8>, DecodeError> {
            Ok(b"{}".to_vec())
        }
    }

    let body = Body::new(Box::new(BareFields));
    assert!(body.files().unwrap().is_empty());
}

#[test]
fn test_binary_memoized_with_mime() {
    let calls = Arc::new(AtomicUsize::new(0));
    let body = Body::new(Box::new(BinarySource {
        calls: Arc::clone(&calls),
    }));

    let (bytes, mime) = body.binary().unwrap();
    assert_eq!(bytes, [0xde, 0xad]);
    assert_eq!(mime, "application/octet-stream");
    let _ = body.binary().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_empty_body_has_no_kind() {
    let body = Body::empty();
    assert_eq!(body.kind(), Kind::None);
    assert!(matches!(
        body.text(),
        Err(BodyError::KindMismatch {
            actual: Kind::None,
            ..
        })
    ));
}
