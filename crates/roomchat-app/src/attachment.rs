//! Attachment classification and staging.
//!
//! A file reference renders as exactly one [`AttachmentKind`], chosen by the
//! prefix of its MIME type. Anything that is not an image, video or audio
//! type falls through to a plain download link.

use std::path::Path;

use roomchat_proto::FileRef;

/// Rendering category of an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    /// `image/*`: shown inline, previewable.
    Image,
    /// `video/*`: shown inline, previewable.
    Video,
    /// `audio/*`: audio player widget.
    Audio,
    /// Anything else: named download link.
    Download,
}

impl AttachmentKind {
    /// Classify a MIME type. Total: every string maps to one kind.
    ///
    /// The prefix check is case-insensitive and ignores surrounding
    /// whitespace; MIME type names are case-insensitive (RFC 2045).
    pub fn classify(mime_type: &str) -> Self {
        let mime = mime_type.trim().to_ascii_lowercase();
        if mime.starts_with("image/") {
            Self::Image
        } else if mime.starts_with("video/") {
            Self::Video
        } else if mime.starts_with("audio/") {
            Self::Audio
        } else {
            Self::Download
        }
    }

    /// Classify a file reference.
    pub fn of(file: &FileRef) -> Self {
        Self::classify(&file.mime_type)
    }

    /// Short label for rendering.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Download => "file",
        }
    }

    /// Check if the preview modal can show this kind.
    pub const fn is_previewable(self) -> bool {
        matches!(self, Self::Image | Self::Video)
    }
}

/// MIME type used when the extension is unknown.
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Guess a MIME type from a file name's extension.
pub fn guess_mime(name: &str) -> &'static str {
    mime_guess::from_path(name).first_raw().unwrap_or(FALLBACK_MIME)
}

/// Build a file reference for a local path.
///
/// Only metadata is produced; the file is not read. The URL is a `file://`
/// reference to the path as given.
pub fn stage_file(path: &str) -> FileRef {
    let path = path.trim();
    let name = Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
        .to_string();

    FileRef { mime_type: guess_mime(&name).to_string(), url: format!("file://{path}"), name }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_prefix() {
        assert_eq!(AttachmentKind::classify("image/png"), AttachmentKind::Image);
        assert_eq!(AttachmentKind::classify("video/webm"), AttachmentKind::Video);
        assert_eq!(AttachmentKind::classify("audio/ogg"), AttachmentKind::Audio);
        assert_eq!(AttachmentKind::classify("application/pdf"), AttachmentKind::Download);
        assert_eq!(AttachmentKind::classify(""), AttachmentKind::Download);
        assert_eq!(AttachmentKind::classify("image"), AttachmentKind::Download);
    }

    #[test]
    fn classification_ignores_case() {
        assert_eq!(AttachmentKind::classify("IMAGE/PNG"), AttachmentKind::Image);
    }

    #[test]
    fn stages_local_file() {
        let file = stage_file(" /tmp/photos/Cat.JPG ");

        assert_eq!(file.name, "Cat.JPG");
        assert_eq!(file.mime_type, "image/jpeg");
        assert_eq!(file.url, "file:///tmp/photos/Cat.JPG");
    }

    #[test]
    fn classification_trims_whitespace() {
        assert_eq!(AttachmentKind::classify("  Audio/OGG "), AttachmentKind::Audio);
        assert_eq!(AttachmentKind::classify(" text/plain"), AttachmentKind::Download);
    }

    #[test]
    fn unknown_extension_downloads() {
        let file = stage_file("notes");

        assert_eq!(file.mime_type, FALLBACK_MIME);
        assert_eq!(AttachmentKind::of(&file), AttachmentKind::Download);
    }

    #[test]
    fn common_media_extensions_get_media_kinds() {
        for (path, kind) in [
            ("clip.mkv", AttachmentKind::Video),
            ("clip.mp4", AttachmentKind::Video),
            ("clip.webm", AttachmentKind::Video),
            ("song.aac", AttachmentKind::Audio),
            ("song.mp3", AttachmentKind::Audio),
            ("song.flac", AttachmentKind::Audio),
            ("shot.webp", AttachmentKind::Image),
            ("shot.bmp", AttachmentKind::Image),
            ("report.pdf", AttachmentKind::Download),
        ] {
            assert_eq!(AttachmentKind::of(&stage_file(path)), kind, "{path}");
        }
    }
}
