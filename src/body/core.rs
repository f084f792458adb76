use crate::schema::{Schema, SchemaError};
use crate::Dict;
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Payload kind, fixed at construction time from the raw payload's metadata
/// tag. Determines which single decode operation is legal for the payload's
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// No payload (or an unrecognized tag)
    None,
    /// Plain text payload
    Text,
    /// JSON payload
    Json,
    /// Form fields, possibly with attached files
    Fields,
    /// Raw bytes with a declared MIME type
    Binary,
}

impl Kind {
    /// Parse the bridge's metadata tag into a kind.
    ///
    /// Recognized tags are `"text"`, `"json"`, `"fields"`, and `"bin"`;
    /// anything else maps to [`Kind::None`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "text" => Kind::Text,
            "json" => Kind::Json,
            "fields" => Kind::Fields,
            "bin" => Kind::Binary,
            _ => Kind::None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::None => "none",
            Kind::Text => "text",
            Kind::Json => "json",
            Kind::Fields => "fields",
            Kind::Binary => "binary",
        })
    }
}

/// Failure reported by an injected decode operation.
///
/// Cloneable so a failed decode can be cached and replayed to every
/// subsequent caller without re-invoking the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    message: String,
}

impl DecodeError {
    /// Create a decode error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        DecodeError {
            message: message.into(),
        }
    }

    /// The underlying failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "payload decode failed: {}", self.message)
    }
}

impl std::error::Error for DecodeError {}

/// One file entry of a `fields` payload, borrowed from the decode source.
///
/// The byte slice is only guaranteed to live for the duration of the
/// `read_files` call that produced it; [`Body::files`] copies it into an
/// owned [`FilePart`] before returning.
#[derive(Debug, Clone, Copy)]
pub struct FilePartRef<'a> {
    /// Form field the file was submitted under
    pub field: &'a str,
    /// Original client-side filename
    pub name: &'a str,
    /// Declared content type
    pub content_type: &'a str,
    /// Declared byte length
    pub size: u64,
    /// Raw file bytes
    pub bytes: &'a [u8],
}

/// One uploaded file with an owned byte buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilePart {
    /// Form field the file was submitted under
    pub field: String,
    /// Original client-side filename
    pub name: String,
    /// Declared content type
    pub content_type: String,
    /// Declared byte length
    pub size: u64,
    /// File contents
    #[serde(skip_serializing)]
    pub bytes: Vec<u8>,
}

impl From<FilePartRef<'_>> for FilePart {
    fn from(part: FilePartRef<'_>) -> Self {
        FilePart {
            field: part.field.to_string(),
            name: part.name.to_string(),
            content_type: part.content_type.to_string(),
            size: part.size,
            bytes: part.bytes.to_vec(),
        }
    }
}

/// Decode capability the transport bridge injects for one raw payload.
///
/// Each method materializes the payload in one representation. [`Body`] calls
/// at most one of them (gated by [`Kind`]) and owns all memoization; sources
/// may assume a given method runs at most once per request, except
/// `read_files`, which runs once per [`Body::files`] call.
///
/// Default method bodies fail with a "decoder not provided" error so a
/// fixed-kind source only implements its own path.
pub trait PayloadSource: Send + Sync {
    /// Kind tag read from the payload metadata (`"text"`, `"json"`,
    /// `"fields"`, `"bin"`).
    fn kind_tag(&self) -> &str;

    /// Decode the payload as text.
    fn read_text(&self) -> Result<String, DecodeError> {
        Err(DecodeError::new("text decoder not provided"))
    }

    /// Fetch the JSON-encoded payload bytes.
    fn read_json(&self) -> Result<Vec<u8>, DecodeError> {
        Err(DecodeError::new("json decoder not provided"))
    }

    /// Fetch the JSON-encoded form-field bytes (a flat mapping).
    fn read_fields(&self) -> Result<Vec<u8>, DecodeError> {
        Err(DecodeError::new("fields decoder not provided"))
    }

    /// Decode the attached file list. Sources with no files report an empty
    /// list.
    fn read_files(&self) -> Result<Vec<FilePartRef<'_>>, DecodeError> {
        Ok(Vec::new())
    }

    /// Decode the payload as raw bytes plus its declared MIME type.
    fn read_binary(&self) -> Result<(Vec<u8>, String), DecodeError> {
        Err(DecodeError::new("binary decoder not provided"))
    }
}

/// Error returned by [`Body`] accessors.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyError {
    /// The accessor's required kind does not match the payload's fixed kind.
    /// Raised before any decode is attempted.
    KindMismatch {
        /// Kind the accessor requires
        expected: Kind,
        /// The payload's actual kind
        actual: Kind,
    },
    /// The injected decode operation failed. The failure is cached; every
    /// later access to the same path returns the same error.
    Decode(DecodeError),
    /// The cached payload bytes are not a valid JSON object.
    Malformed(String),
    /// Schema validation of the decoded mapping failed.
    Validation(SchemaError),
}

impl fmt::Display for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyError::KindMismatch { expected, actual } => {
                write!(f, "expected {expected} body, got {actual}")
            }
            BodyError::Decode(err) => err.fmt(f),
            BodyError::Malformed(message) => write!(f, "malformed payload: {message}"),
            BodyError::Validation(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for BodyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BodyError::Decode(err) => Some(err),
            BodyError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

type DecodeCell<T> = OnceCell<Result<T, DecodeError>>;

/// Lazy, kind-gated view over one raw request payload.
///
/// Wraps exactly one [`PayloadSource`] and its fixed [`Kind`]. Each decode
/// path owns an independent one-shot memoization cell; concurrent first
/// accesses to the same cell serialize through the cell's initialization
/// guard, so the bridge decode runs exactly once and every caller observes
/// the identical cached result. The cells are the only mutable state; all
/// other reads are safe for unsynchronized concurrent access.
pub struct Body {
    source: Box<dyn PayloadSource>,
    kind: Kind,
    text: DecodeCell<String>,
    json_raw: DecodeCell<Vec<u8>>,
    fields_raw: DecodeCell<Vec<u8>>,
    binary: DecodeCell<(Vec<u8>, String)>,
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl Body {
    /// Wrap a raw payload source, fixing the kind from its metadata tag.
    #[must_use]
    pub fn new(source: Box<dyn PayloadSource>) -> Self {
        let kind = Kind::from_tag(source.kind_tag());
        Body {
            source,
            kind,
            text: OnceCell::new(),
            json_raw: OnceCell::new(),
            fields_raw: OnceCell::new(),
            binary: OnceCell::new(),
        }
    }

    /// A body with no payload, for requests that carry none.
    #[must_use]
    pub fn empty() -> Self {
        struct NoPayload;
        impl PayloadSource for NoPayload {
            fn kind_tag(&self) -> &str {
                "none"
            }
        }
        Body::new(Box::new(NoPayload))
    }

    /// The payload's fixed kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    fn expect_kind(&self, expected: Kind) -> Result<(), BodyError> {
        if self.kind == expected {
            Ok(())
        } else {
            Err(BodyError::KindMismatch {
                expected,
                actual: self.kind,
            })
        }
    }

    /// The payload as text. Requires [`Kind::Text`].
    ///
    /// The first call invokes the bridge's text decode exactly once and
    /// caches the outcome; later calls return the cached value (or the
    /// cached error) without re-invoking it.
    pub fn text(&self) -> Result<&str, BodyError> {
        self.expect_kind(Kind::Text)?;
        let cached = self.text.get_or_init(|| {
            debug!(kind = %self.kind, "decoding text payload");
            self.source.read_text()
        });
        match cached {
            Ok(text) => Ok(text.as_str()),
            Err(err) => Err(BodyError::Decode(err.clone())),
        }
    }

    /// The payload as a decoded JSON mapping. Requires [`Kind::Json`].
    ///
    /// The raw encoded bytes are fetched once and memoized; every call
    /// re-parses the cached bytes, so a malformed payload fails on each
    /// access rather than poisoning the cache.
    pub fn json(&self) -> Result<Dict, BodyError> {
        let raw = self.raw_bytes(Kind::Json, &self.json_raw, |source| source.read_json())?;
        parse_mapping(raw)
    }

    /// The payload as a JSON mapping validated through `schema`, with
    /// coercion enabled. Requires [`Kind::Json`].
    pub fn json_with(&self, schema: &Schema) -> Result<Dict, BodyError> {
        let data = self.json()?;
        schema.parse(&data, true).map_err(BodyError::Validation)
    }

    /// The payload as a decoded form-field mapping. Requires
    /// [`Kind::Fields`]. Same caching contract as [`Body::json`].
    pub fn fields(&self) -> Result<Dict, BodyError> {
        let raw = self.raw_bytes(Kind::Fields, &self.fields_raw, |source| {
            source.read_fields()
        })?;
        parse_mapping(raw)
    }

    /// The form fields validated through `schema`, with coercion enabled.
    /// Requires [`Kind::Fields`].
    pub fn fields_with(&self, schema: &Schema) -> Result<Dict, BodyError> {
        let data = self.fields()?;
        schema.parse(&data, true).map_err(BodyError::Validation)
    }

    /// The attached file list. Requires [`Kind::Fields`].
    ///
    /// Not memoized: the list is decoded from the source on every call and
    /// each part's bytes are copied into an owned buffer, since the source
    /// buffer is not assumed to outlive the call.
    pub fn files(&self) -> Result<Vec<FilePart>, BodyError> {
        self.expect_kind(Kind::Fields)?;
        let parts = self.source.read_files().map_err(BodyError::Decode)?;
        Ok(parts.into_iter().map(FilePart::from).collect())
    }

    /// The payload as raw bytes plus its declared MIME type. Requires
    /// [`Kind::Binary`]. Memoized like [`Body::text`].
    pub fn binary(&self) -> Result<(&[u8], &str), BodyError> {
        self.expect_kind(Kind::Binary)?;
        let cached = self.binary.get_or_init(|| {
            debug!(kind = %self.kind, "decoding binary payload");
            self.source.read_binary()
        });
        match cached {
            Ok((bytes, mime)) => Ok((bytes.as_slice(), mime.as_str())),
            Err(err) => Err(BodyError::Decode(err.clone())),
        }
    }

    fn raw_bytes<'a>(
        &'a self,
        expected: Kind,
        cell: &'a DecodeCell<Vec<u8>>,
        read: impl FnOnce(&dyn PayloadSource) -> Result<Vec<u8>, DecodeError>,
    ) -> Result<&'a [u8], BodyError> {
        self.expect_kind(expected)?;
        let cached = cell.get_or_init(|| {
            debug!(kind = %self.kind, "fetching encoded payload bytes");
            read(self.source.as_ref())
        });
        match cached {
            Ok(bytes) => Ok(bytes.as_slice()),
            Err(err) => Err(BodyError::Decode(err.clone())),
        }
    }
}

fn parse_mapping(raw: &[u8]) -> Result<Dict, BodyError> {
    serde_json::from_slice(raw).map_err(|err| BodyError::Malformed(err.to_string()))
}
