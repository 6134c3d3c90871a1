//! Resolving layer sources into drawable image references

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::warn;

use super::Layer;

/// A layer image the renderer can reference from SVG
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerImage {
    /// Value for the SVG `href` attribute (data URI or path)
    pub href: String,
    /// False while the image has no usable content
    pub ready: bool,
}

impl LayerImage {
    /// Reference an image by URL or path without loading it
    pub fn linked(href: impl Into<String>) -> Self {
        let href = href.into();
        let ready = !href.is_empty();
        Self { href, ready }
    }

    /// Embed raw image bytes as a base64 data URI
    pub fn embedded(mime: &str, bytes: &[u8]) -> Self {
        Self {
            href: format!("data:{};base64,{}", mime, STANDARD.encode(bytes)),
            ready: !bytes.is_empty(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }
}

/// Turns a layer's `src` into something drawable
pub trait ImageResolver {
    /// Returns `None` when the layer has no usable image
    fn resolve(&self, layer: &Layer) -> Option<LayerImage>;
}

/// Resolves layer sources relative to a project directory
#[derive(Debug, Clone)]
pub struct FsImageResolver {
    base: PathBuf,
    embed: bool,
}

impl FsImageResolver {
    /// Resolver that embeds image bytes into the frame
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            embed: true,
        }
    }

    /// Reference files by path instead of embedding them
    pub fn linking(mut self) -> Self {
        self.embed = false;
        self
    }
}

impl ImageResolver for FsImageResolver {
    fn resolve(&self, layer: &Layer) -> Option<LayerImage> {
        if layer.src.is_empty() {
            return None;
        }
        let path = self.base.join(&layer.src);

        if !self.embed {
            return match std::fs::metadata(&path) {
                Ok(meta) if meta.len() > 0 => Some(LayerImage::linked(path.display().to_string())),
                Ok(_) => Some(LayerImage {
                    href: path.display().to_string(),
                    ready: false,
                }),
                Err(e) => {
                    warn!(layer = %layer.id, path = %path.display(), error = %e, "layer image not found");
                    None
                }
            };
        }

        match std::fs::read(&path) {
            Ok(bytes) => Some(LayerImage::embedded(mime_for(&path), &bytes)),
            Err(e) => {
                warn!(layer = %layer.id, path = %path.display(), error = %e, "layer image not found");
                None
            }
        }
    }
}

/// MIME type guessed from the file extension
fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::LayerKind;

    fn layer(src: &str) -> Layer {
        Layer {
            id: "bg".into(),
            name: "Background".into(),
            kind: LayerKind::Image,
            src: src.into(),
            visible: true,
            opacity: None,
        }
    }

    #[test]
    fn test_embedded_data_uri() {
        let img = LayerImage::embedded("image/png", b"abc");
        assert_eq!(img.href, "data:image/png;base64,YWJj");
        assert!(img.is_ready());
    }

    #[test]
    fn test_empty_bytes_not_ready() {
        assert!(!LayerImage::embedded("image/png", b"").is_ready());
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for(Path::new("bg-blank.jpeg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("map.SVG")), "image/svg+xml");
        assert_eq!(mime_for(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn test_missing_file_resolves_to_none() {
        let resolver = FsImageResolver::new("/definitely/not/here");
        assert!(resolver.resolve(&layer("bg.png")).is_none());
        assert!(resolver.clone().linking().resolve(&layer("bg.png")).is_none());
    }

    #[test]
    fn test_empty_src_resolves_to_none() {
        let resolver = FsImageResolver::new(".");
        assert!(resolver.resolve(&layer("")).is_none());
    }

    #[test]
    fn test_reads_real_file() {
        let dir = std::env::temp_dir().join(format!("isocity-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("tile.png"), b"png-bytes").unwrap();

        let img = FsImageResolver::new(&dir).resolve(&layer("tile.png")).unwrap();
        assert!(img.href.starts_with("data:image/png;base64,"));
        assert!(img.is_ready());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
