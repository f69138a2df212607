//! Source key resolution for stored question images.
//!
//! A question's `image` field holds an absolute URL, a relative path
//! (possibly with Windows separators), or inline data. Inline data comes in
//! two shapes: `data:<mime>;base64,<payload>` URIs written by the web
//! editor, and bare base64 payloads written by the desktop editor.
//! Resolution turns the field into a fetchable source key; it is pure and
//! runs before the loader.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

/// Base64 characters decoded to sniff the image signature of a bare payload.
const SNIFF_CHARS: usize = 16;

/// Why an inline key could not be turned into bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InlineError {
    #[error("data URI has no payload")]
    MissingPayload,

    #[error("only base64 data URIs are supported")]
    NotBase64,

    #[error("invalid base64 payload: {0}")]
    Base64(String),
}

/// What a source key points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// `http://` or `https://` URL.
    Remote,
    /// Image bytes carried in the key: a `data:` URI or a bare base64
    /// payload.
    Inline,
    /// Anything else: a filesystem path.
    Local,
}

impl SourceKind {
    /// Classify a key by its prefix, or by its content for bare base64.
    pub fn of(key: &str) -> Self {
        if key.starts_with("http://") || key.starts_with("https://") {
            SourceKind::Remote
        } else if key.starts_with("data:") || is_bare_base64_image(key) {
            SourceKind::Inline
        } else {
            SourceKind::Local
        }
    }
}

/// Decode the image bytes carried by an inline key.
///
/// Accepts `data:<mime>;base64,<payload>` URIs and bare base64 payloads.
pub fn decode_inline(key: &str) -> Result<Vec<u8>, InlineError> {
    let payload = match key.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest.split_once(',').ok_or(InlineError::MissingPayload)?;
            if !header.ends_with(";base64") {
                return Err(InlineError::NotBase64);
            }
            payload
        }
        None => key,
    };

    let payload = payload.trim();
    if payload.is_empty() {
        return Err(InlineError::MissingPayload);
    }

    STANDARD
        .decode(payload)
        .map_err(|e| InlineError::Base64(e.to_string()))
}

// A bare payload is only taken for inline data when its first bytes carry a
// known image signature; otherwise extensionless relative paths such as
// `img/q1ab/cdef` would be misread.
fn is_bare_base64_image(key: &str) -> bool {
    if key.len() < SNIFF_CHARS || key.len() % 4 != 0 {
        return false;
    }
    if !key
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
    {
        return false;
    }

    STANDARD
        .decode(&key[..SNIFF_CHARS])
        .map(|head| image::guess_format(&head).is_ok())
        .unwrap_or(false)
}

/// Resolve a stored image field into a source key.
///
/// Returns `None` for an empty field. URLs and inline data (including bare
/// base64 payloads) pass through untouched. Paths get `\` normalized to
/// `/` and, when relative and a `base_dir` is given, are joined onto it.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use eoeguess::source::resolve_source;
///
/// assert_eq!(
///     resolve_source("images\\cat.png", None).as_deref(),
///     Some("images/cat.png")
/// );
/// assert_eq!(
///     resolve_source("cat.png", Some(Path::new("/banks"))).as_deref(),
///     Some("/banks/cat.png")
/// );
/// assert_eq!(resolve_source("", None), None);
/// ```
pub fn resolve_source(raw: &str, base_dir: Option<&Path>) -> Option<String> {
    if raw.is_empty() {
        return None;
    }

    match SourceKind::of(raw) {
        SourceKind::Remote | SourceKind::Inline => Some(raw.to_string()),
        SourceKind::Local => {
            let normalized = raw.replace('\\', "/");
            match base_dir {
                Some(base) if !Path::new(&normalized).is_absolute() => {
                    let joined = base.join(&normalized);
                    Some(joined.to_string_lossy().replace('\\', "/"))
                }
                _ => Some(normalized),
            }
        }
    }
}
