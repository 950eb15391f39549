use std::{fmt, str::FromStr};

use url::Url;

use crate::{
    error::{TsumugiError, TsumugiResult},
    util::http::HttpClient,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFormat {
    Hls,
    Dash,
}

impl StreamFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hls => "hls",
            Self::Dash => "dash",
        }
    }

    /// Guess the manifest format of a URL the way the capture layer does:
    /// path extension first, then `Content-Type`, then a parse probe.
    pub async fn detect(client: &HttpClient, url: &Url) -> TsumugiResult<Self> {
        let path = url.path().to_ascii_lowercase();
        if path.ends_with(".m3u8") {
            return Ok(Self::Hls);
        } else if path.ends_with(".mpd") {
            return Ok(Self::Dash);
        }

        let response = client.get(url.clone()).send().await?;
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|value| value.trim().to_ascii_lowercase());
        let body = response.text().await.ok();

        match content_type.as_deref() {
            Some("application/x-mpegurl" | "application/vnd.apple.mpegurl") => {
                return Ok(Self::Hls)
            }
            Some("application/dash+xml") => return Ok(Self::Dash),
            _ => {}
        }

        if let Some(body) = body {
            if body.trim_start().starts_with("#EXTM3U") {
                return Ok(Self::Hls);
            }
            // The MPD deserializer ignores unknown root elements, so require
            // the tag to be present before trusting a successful parse.
            if body.contains("<MPD") && dash_mpd::parse(&body).is_ok() {
                return Ok(Self::Dash);
            }
        }

        Err(TsumugiError::UnknownFormat(url.to_string()))
    }
}

impl FromStr for StreamFormat {
    type Err = TsumugiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("hls") {
            Ok(Self::Hls)
        } else if s.eq_ignore_ascii_case("dash") {
            Ok(Self::Dash)
        } else {
            Err(TsumugiError::UnknownFormat(s.to_string()))
        }
    }
}

impl fmt::Display for StreamFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fetchable chunk of a media stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Fully resolved; no relative URL ever reaches the download stage.
    pub url: Url,
    /// Playback duration in seconds, 0 if the manifest declares none.
    pub duration: f64,
    /// Zero-based position assigned at parse time.
    pub sequence: u64,
}

impl Segment {
    pub fn new(url: Url, duration: f64, sequence: u64) -> Self {
        let duration = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            0.0
        };
        Self {
            url,
            duration,
            sequence,
        }
    }
}

/// An alternate-quality stream referenced from an HLS master playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantPlaylist {
    pub url: Url,
    pub stream_inf: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedManifest {
    pub format: StreamFormat,
    pub manifest_url: Url,
    /// Insertion order is playback order; never reordered after parsing.
    pub segments: Vec<Segment>,
    /// Total duration in seconds, 0 if unknown.
    pub total_duration: f64,
    /// Populated only when the fetched document is an HLS master playlist.
    pub variant_playlists: Vec<VariantPlaylist>,
}

impl ParsedManifest {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_format_from_str() {
        assert_eq!("hls".parse::<StreamFormat>().unwrap(), StreamFormat::Hls);
        assert_eq!("DASH".parse::<StreamFormat>().unwrap(), StreamFormat::Dash);
        assert!(matches!(
            "webm".parse::<StreamFormat>(),
            Err(TsumugiError::UnknownFormat(format)) if format == "webm"
        ));
    }

    #[test]
    fn test_segment_clamps_duration() {
        let url = Url::parse("https://cdn.example.com/seg0.ts").unwrap();
        assert_eq!(Segment::new(url.clone(), 5.0, 0).duration, 5.0);
        assert_eq!(Segment::new(url.clone(), f64::NAN, 0).duration, 0.0);
        assert_eq!(Segment::new(url.clone(), f64::INFINITY, 0).duration, 0.0);
        assert_eq!(Segment::new(url, -1.0, 0).duration, 0.0);
    }
}
