// Source descriptors, container classification and stream resolution

use crate::cache::CacheConfig;
use crate::error::{Result, VideoError};
use std::collections::HashMap;

/// Scheme marker recorded for resolved bundled assets.
pub const ASSET_SCHEME: &str = "asset:///";

/// Where the media comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// Bundled application asset, optionally scoped to a package
    Asset {
        name: String,
        package: Option<String>,
    },
    /// Local file path
    File { path: String },
    /// Remote URI
    Remote { uri: String },
}

/// Logical source handed to the creation command. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub location: SourceLocation,
    /// Extra request headers applied to remote fetches
    pub headers: HashMap<String, String>,
    /// Explicit container override ("ss", "dash", "hls", "other"); an
    /// unrecognized hint fails the creation attempt
    pub format_hint: Option<String>,
}

impl SourceDescriptor {
    pub fn asset(name: impl Into<String>, package: Option<String>) -> Self {
        Self {
            location: SourceLocation::Asset {
                name: name.into(),
                package,
            },
            headers: HashMap::new(),
            format_hint: None,
        }
    }

    pub fn file(path: impl Into<String>) -> Self {
        Self {
            location: SourceLocation::File { path: path.into() },
            headers: HashMap::new(),
            format_hint: None,
        }
    }

    pub fn remote(uri: impl Into<String>) -> Self {
        Self {
            location: SourceLocation::Remote { uri: uri.into() },
            headers: HashMap::new(),
            format_hint: None,
        }
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_format_hint(mut self, hint: impl Into<String>) -> Self {
        self.format_hint = Some(hint.into());
        self
    }
}

/// Playback container classification, derived from the locator's trailing
/// path segment unless overridden by a format hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    SmoothStreaming,
    Dash,
    Hls,
    /// Plain progressive media; the fallback for anything unrecognized
    Progressive,
}

impl ContainerKind {
    /// Classify by file extension of the locator's last path segment.
    pub fn classify(locator: &str) -> ContainerKind {
        let segment = trailing_segment(locator).to_ascii_lowercase();
        if segment.ends_with(".mpd") {
            ContainerKind::Dash
        } else if segment.ends_with(".m3u8") {
            ContainerKind::Hls
        } else if segment.ends_with(".ism") || segment.ends_with(".isml") {
            ContainerKind::SmoothStreaming
        } else {
            ContainerKind::Progressive
        }
    }

    fn from_hint(hint: &str) -> Result<ContainerKind> {
        match hint {
            "ss" => Ok(ContainerKind::SmoothStreaming),
            "dash" => Ok(ContainerKind::Dash),
            "hls" => Ok(ContainerKind::Hls),
            "other" => Ok(ContainerKind::Progressive),
            other => Err(VideoError::UnsupportedContainer(format!(
                "unrecognized format hint '{}'",
                other
            ))),
        }
    }
}

fn trailing_segment(locator: &str) -> &str {
    let path = locator
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or(locator);
    path.rsplit('/').next().unwrap_or(path)
}

/// Concrete fetchable stream handed to the media engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDescriptor {
    pub url: String,
    pub headers: HashMap<String, String>,
    /// Local (asset/file) streams bypass caching
    pub local: bool,
    pub cache: Option<CacheConfig>,
}

/// Outcome of source resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub stream: StreamDescriptor,
    pub container: ContainerKind,
}

/// Translates bundled-asset locators into concrete loadable paths.
pub trait AssetResolver: Send + Sync {
    fn lookup(&self, asset: &str, package: Option<&str>) -> String;
}

/// Map a logical descriptor into a fetchable stream descriptor plus its
/// container classification.
pub fn resolve(
    descriptor: &SourceDescriptor,
    assets: &dyn AssetResolver,
    cache: Option<CacheConfig>,
) -> Result<ResolvedSource> {
    let url = match &descriptor.location {
        SourceLocation::Asset { name, package } => {
            let key = assets.lookup(name, package.as_deref());
            format!("{}{}", ASSET_SCHEME, key)
        }
        SourceLocation::File { path } => path.clone(),
        SourceLocation::Remote { uri } => uri.clone(),
    };

    let local = matches!(
        descriptor.location,
        SourceLocation::Asset { .. } | SourceLocation::File { .. }
    ) || url.starts_with("file://");

    let container = match &descriptor.format_hint {
        Some(hint) => ContainerKind::from_hint(hint)?,
        None => ContainerKind::classify(&url),
    };

    Ok(ResolvedSource {
        stream: StreamDescriptor {
            url,
            headers: descriptor.headers.clone(),
            local,
            cache: if local { None } else { cache },
        },
        container,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct PrefixAssets;

    impl AssetResolver for PrefixAssets {
        fn lookup(&self, asset: &str, package: Option<&str>) -> String {
            match package {
                Some(package) => format!("packages/{}/{}", package, asset),
                None => format!("flutter_assets/{}", asset),
            }
        }
    }

    fn cache_config() -> CacheConfig {
        CacheConfig {
            directory: PathBuf::from("/tmp/kinema-cache"),
            ignore_on_error: true,
        }
    }

    #[test]
    fn classifies_by_trailing_segment() {
        assert_eq!(
            ContainerKind::classify("https://cdn.example.com/v/stream.m3u8"),
            ContainerKind::Hls
        );
        assert_eq!(
            ContainerKind::classify("https://cdn.example.com/v/manifest.mpd"),
            ContainerKind::Dash
        );
        assert_eq!(
            ContainerKind::classify("https://cdn.example.com/v/clip.ism"),
            ContainerKind::SmoothStreaming
        );
        assert_eq!(
            ContainerKind::classify("https://cdn.example.com/v/movie.mp4"),
            ContainerKind::Progressive
        );
        assert_eq!(
            ContainerKind::classify("https://cdn.example.com/v/movie"),
            ContainerKind::Progressive
        );
    }

    #[test]
    fn classification_ignores_query_and_fragment() {
        assert_eq!(
            ContainerKind::classify("https://cdn.example.com/live.m3u8?token=abc#t=3"),
            ContainerKind::Hls
        );
    }

    #[test]
    fn asset_resolution_records_the_asset_scheme() {
        let descriptor = SourceDescriptor::asset("videos/intro.mp4", None);
        let resolved = resolve(&descriptor, &PrefixAssets, None).unwrap();
        assert_eq!(resolved.stream.url, "asset:///flutter_assets/videos/intro.mp4");
        assert!(resolved.stream.local);
        assert_eq!(resolved.container, ContainerKind::Progressive);
    }

    #[test]
    fn asset_resolution_honors_package_scope() {
        let descriptor = SourceDescriptor::asset("intro.mp4", Some("gallery".into()));
        let resolved = resolve(&descriptor, &PrefixAssets, None).unwrap();
        assert_eq!(resolved.stream.url, "asset:///packages/gallery/intro.mp4");
    }

    #[test]
    fn remote_sources_carry_cache_and_headers() {
        let mut headers = HashMap::new();
        headers.insert("Authorization".into(), "Bearer tok".into());
        let descriptor =
            SourceDescriptor::remote("https://cdn.example.com/movie.mp4").with_headers(headers);

        let resolved = resolve(&descriptor, &PrefixAssets, Some(cache_config())).unwrap();
        assert!(!resolved.stream.local);
        assert_eq!(resolved.stream.cache, Some(cache_config()));
        assert_eq!(
            resolved.stream.headers.get("Authorization").map(String::as_str),
            Some("Bearer tok")
        );
    }

    #[test]
    fn local_sources_bypass_the_cache() {
        let descriptor = SourceDescriptor::file("/sdcard/movie.mp4");
        let resolved = resolve(&descriptor, &PrefixAssets, Some(cache_config())).unwrap();
        assert!(resolved.stream.local);
        assert_eq!(resolved.stream.cache, None);

        let descriptor = SourceDescriptor::remote("file:///sdcard/movie.mp4");
        let resolved = resolve(&descriptor, &PrefixAssets, Some(cache_config())).unwrap();
        assert!(resolved.stream.local);
        assert_eq!(resolved.stream.cache, None);
    }

    #[test]
    fn format_hint_overrides_classification() {
        let descriptor =
            SourceDescriptor::remote("https://cdn.example.com/stream").with_format_hint("hls");
        let resolved = resolve(&descriptor, &PrefixAssets, None).unwrap();
        assert_eq!(resolved.container, ContainerKind::Hls);
    }

    #[test]
    fn unrecognized_format_hint_fails_the_creation_attempt() {
        let descriptor =
            SourceDescriptor::remote("https://cdn.example.com/stream").with_format_hint("rtsp");
        let err = resolve(&descriptor, &PrefixAssets, None).unwrap_err();
        assert_eq!(err.code(), "UnsupportedContainerKind");
    }
}
