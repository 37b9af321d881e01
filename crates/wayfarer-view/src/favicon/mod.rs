//! Favicon handling: data URIs, remote fetch, dominant colour.
//!
//! Pages report favicons either inline (`data:` URIs) or as remote URLs.
//! Remote ones are fetched off the event context and come back through the
//! registry's [`EventQueue`] as [`ViewEvent::FaviconFetched`].

mod http;
mod palette;

pub use http::{fetch_data_uri, HttpFaviconFetcher};
pub use palette::vibrant_color;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use wayfarer_common::TabId;

use crate::error::ViewError;
use crate::events::{EventQueue, ViewEvent};

/// Favicons larger than this are refused.
pub const MAX_FAVICON_BYTES: usize = 512 * 1024;

pub fn is_remote(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://")
}

/// Decode the payload of a `data:<mime>;base64,<payload>` URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, ViewError> {
    let (_, payload) = uri
        .split_once("base64,")
        .ok_or_else(|| ViewError::Favicon("favicon is not a base64 data URI".into()))?;
    STANDARD
        .decode(payload.trim())
        .map_err(|e| ViewError::Favicon(format!("invalid base64 payload: {e}")))
}

pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Guess an image MIME type from a favicon URL's extension.
pub fn mime_from_url(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let ext = path.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "image/x-icon",
    }
}

/// Fetches remote favicons without blocking the caller.
pub trait FaviconFetcher: Send + Sync {
    /// Start fetching `url`. The result must be delivered through `reply`
    /// exactly once, from any thread.
    fn fetch(&self, url: String, reply: FaviconReply);
}

/// Completion handle for one favicon fetch.
#[derive(Debug)]
pub struct FaviconReply {
    tab_id: TabId,
    source: String,
    queue: EventQueue,
}

impl FaviconReply {
    pub(crate) fn new(tab_id: TabId, source: String, queue: EventQueue) -> Self {
        Self {
            tab_id,
            source,
            queue,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Deliver a data URI, or the reason the fetch failed.
    pub fn send(self, result: Result<String, ViewError>) {
        self.queue.push(
            self.tab_id,
            ViewEvent::FaviconFetched {
                source: self.source,
                result: result.map_err(|e| e.to_string()),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_detection() {
        assert!(is_remote("https://example.com/favicon.ico"));
        assert!(is_remote("http://example.com/favicon.ico"));
        assert!(!is_remote("data:image/png;base64,AAAA"));
        assert!(!is_remote("httpx"));
        assert!(!is_remote(""));
    }

    #[test]
    fn data_uri_decodes_payload() {
        let uri = encode_data_uri("image/png", b"\x89PNG");
        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(decode_data_uri(&uri).unwrap(), b"\x89PNG");
    }

    #[test]
    fn non_data_uri_is_an_error() {
        assert!(decode_data_uri("https://example.com/favicon.ico").is_err());
        assert!(decode_data_uri("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn mime_guessing() {
        assert_eq!(mime_from_url("https://a.test/icon.PNG"), "image/png");
        assert_eq!(mime_from_url("https://a.test/icon.svg?v=2"), "image/svg+xml");
        assert_eq!(mime_from_url("https://a.test/favicon.ico"), "image/x-icon");
        assert_eq!(mime_from_url("https://a.test/favicon"), "image/x-icon");
    }

    #[test]
    fn reply_posts_into_queue() {
        let queue = EventQueue::new();
        let reply = FaviconReply::new(TabId(5), "https://a.test/f.ico".into(), queue.clone());
        assert_eq!(reply.source(), "https://a.test/f.ico");
        reply.send(Err(ViewError::Favicon("404".into())));

        let drained = queue.drain();
        assert_eq!(drained.len(), 1);
        match &drained[0] {
            (TabId(5), ViewEvent::FaviconFetched { source, result }) => {
                assert_eq!(source, "https://a.test/f.ico");
                assert!(result.as_ref().unwrap_err().contains("404"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
