//! # Binary Payload Codec
//!
//! Audio and artwork payloads exist in exactly two representations:
//!
//! - **Stored** ([`StoredAudio`], [`StoredArtwork`]) - plain buffers the
//!   gateway persists as BLOB columns
//! - **Live** ([`PlayableAudio`], [`ArtworkImage`]) - payloads the
//!   playback/rendering surface consumes directly
//!
//! The two sides are connected only by the conversion functions in this
//! module; no single type ever serves both roles. Conversions are
//! lossless: `audio_to_playable(audio_to_storable(x))` reproduces the
//! bytes and content type of `x` exactly.
//!
//! ## Ephemeral media URLs
//!
//! Converting to the live side registers the payload in a process-wide
//! media registry and attaches a fresh `tune://media/<uuid>` URL for the
//! playback surface to resolve. The URL is never persisted and never
//! reused: every conversion mints a new one. [`MediaUrl`] is a scoped
//! handle; dropping it (or calling [`MediaUrl::release`]) revokes the URL
//! and frees the registry slot, so whoever owns the live payload must keep
//! the handle alive for as long as the URL may be dereferenced.

use bytes::Bytes;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, OnceLock, PoisonError};
use uuid::Uuid;

const MEDIA_URL_SCHEME: &str = "tune://media/";

/// Audio payload in its storable form: a plain buffer plus the MIME type
/// it must be rehydrated with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAudio {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Artwork payload in its storable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtwork {
    pub data: Vec<u8>,
    pub format: String,
}

/// Artwork payload in its live form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkImage {
    pub bytes: Bytes,
    pub format: String,
}

/// Audio payload in its live, directly playable form.
///
/// Owns the ephemeral [`MediaUrl`]; when this value is replaced or
/// discarded the URL is revoked with it.
#[derive(Debug)]
pub struct PlayableAudio {
    bytes: Bytes,
    content_type: String,
    url: MediaUrl,
}

impl PlayableAudio {
    /// Raw audio bytes
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// MIME type of the payload
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// The ephemeral URL the playback surface dereferences
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Revoke the media URL and discard the payload
    pub fn release(self) {}
}

/// Convert a live audio payload into its storable form.
pub fn audio_to_storable(bytes: Bytes, content_type: &str) -> StoredAudio {
    StoredAudio {
        data: bytes.to_vec(),
        content_type: content_type.to_string(),
    }
}

/// Convert a stored audio payload back into its playable form, minting a
/// fresh media URL.
pub fn audio_to_playable(stored: StoredAudio) -> PlayableAudio {
    let bytes = Bytes::from(stored.data);
    let url = MediaUrl::register(bytes.clone(), &stored.content_type);

    PlayableAudio {
        bytes,
        content_type: stored.content_type,
        url,
    }
}

/// Convert a live artwork image into its storable form.
pub fn artwork_to_storable(image: ArtworkImage) -> StoredArtwork {
    StoredArtwork {
        data: image.bytes.to_vec(),
        format: image.format,
    }
}

/// Convert stored artwork back into its live form.
pub fn artwork_to_playable(stored: StoredArtwork) -> ArtworkImage {
    ArtworkImage {
        bytes: Bytes::from(stored.data),
        format: stored.format,
    }
}

/// A payload resolved from the media registry.
#[derive(Debug, Clone)]
pub struct ResolvedMedia {
    pub bytes: Bytes,
    pub content_type: String,
}

struct MediaEntry {
    bytes: Bytes,
    content_type: String,
}

fn registry() -> &'static Mutex<HashMap<Uuid, MediaEntry>> {
    static REGISTRY: OnceLock<Mutex<HashMap<Uuid, MediaEntry>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

fn registry_lock() -> std::sync::MutexGuard<'static, HashMap<Uuid, MediaEntry>> {
    registry().lock().unwrap_or_else(PoisonError::into_inner)
}

/// Scoped handle to an entry in the media registry.
///
/// Minted by [`audio_to_playable`]; the URL stays resolvable exactly as
/// long as the handle is alive. Dropping the handle revokes it.
#[derive(Debug)]
pub struct MediaUrl {
    key: Uuid,
    url: String,
}

impl MediaUrl {
    fn register(bytes: Bytes, content_type: &str) -> Self {
        let key = Uuid::new_v4();
        registry_lock().insert(
            key,
            MediaEntry {
                bytes,
                content_type: content_type.to_string(),
            },
        );

        Self {
            key,
            url: format!("{MEDIA_URL_SCHEME}{key}"),
        }
    }

    /// The URL as handed to the playback surface
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Explicitly revoke the URL
    pub fn release(self) {}
}

impl Drop for MediaUrl {
    fn drop(&mut self) {
        registry_lock().remove(&self.key);
    }
}

impl fmt::Display for MediaUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Resolve a media URL minted by this process.
///
/// Returns `None` for malformed URLs and for URLs whose handle has been
/// released.
pub fn resolve(url: &str) -> Option<ResolvedMedia> {
    let key = url.strip_prefix(MEDIA_URL_SCHEME)?;
    let key = Uuid::parse_str(key).ok()?;

    registry_lock().get(&key).map(|entry| ResolvedMedia {
        bytes: entry.bytes.clone(),
        content_type: entry.content_type.clone(),
    })
}
