//! HLS playlist support.
//!
//! A media playlist maps directly to an ordered segment list. A master
//! playlist records every variant it lists, then adopts the segments of the
//! first listed variant; there is no quality selection.

use async_recursion::async_recursion;
use m3u8_rs::{Playlist, VariantStream};
use url::Url;

use crate::{
    error::{TsumugiError, TsumugiResult},
    manifest::{ParsedManifest, Segment, StreamFormat, VariantPlaylist},
    util::{http::HttpClient, url::resolve},
};

/// Nesting limit for master playlists referencing further master playlists.
/// A self-referential playlist would otherwise recurse forever.
const MAX_PLAYLIST_DEPTH: usize = 8;

pub struct HlsParser {
    client: HttpClient,
}

impl HlsParser {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Fetch and parse an M3U8 document into an ordered segment list.
    pub async fn parse(&self, manifest_url: Url) -> TsumugiResult<ParsedManifest> {
        self.parse_at_depth(manifest_url, 0).await
    }

    #[async_recursion]
    async fn parse_at_depth(
        &self,
        manifest_url: Url,
        depth: usize,
    ) -> TsumugiResult<ParsedManifest> {
        if depth >= MAX_PLAYLIST_DEPTH {
            return Err(TsumugiError::PlaylistTooDeep(MAX_PLAYLIST_DEPTH));
        }

        log::info!("Fetching M3U8 playlist: {manifest_url}");
        let response = self.client.get(manifest_url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(TsumugiError::HttpError(response.status()));
        }
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Err(TsumugiError::EmptyPlaylist);
        }

        match m3u8_rs::parse_playlist_res(text.as_bytes()) {
            Ok(Playlist::MediaPlaylist(playlist)) => {
                let mut segments = Vec::with_capacity(playlist.segments.len());
                let mut total_duration = 0.0;
                for (i, segment) in playlist.segments.iter().enumerate() {
                    let url = resolve(&manifest_url, &segment.uri)?;
                    let segment = Segment::new(url, segment.duration as f64, i as u64);
                    total_duration += segment.duration;
                    segments.push(segment);
                }

                Ok(ParsedManifest {
                    format: StreamFormat::Hls,
                    manifest_url,
                    segments,
                    total_duration,
                    variant_playlists: Vec::new(),
                })
            }
            Ok(Playlist::MasterPlaylist(playlist)) => {
                let mut variant_playlists = Vec::new();
                for variant in playlist.variants.iter().filter(|v| !v.is_i_frame) {
                    variant_playlists.push(VariantPlaylist {
                        url: resolve(&manifest_url, &variant.uri)?,
                        stream_inf: stream_inf_summary(variant),
                    });
                }

                log::info!(
                    "Master playlist detected with {} variant(s).",
                    variant_playlists.len()
                );

                // The first listed variant always wins.
                let (segments, total_duration) = match variant_playlists.first() {
                    Some(variant) => {
                        let variant = self
                            .parse_at_depth(variant.url.clone(), depth + 1)
                            .await?;
                        (variant.segments, variant.total_duration)
                    }
                    None => (Vec::new(), 0.0),
                };

                Ok(ParsedManifest {
                    format: StreamFormat::Hls,
                    manifest_url,
                    segments,
                    total_duration,
                    variant_playlists,
                })
            }
            Err(error) => Err(TsumugiError::PlaylistParseError(format!("{error:?}"))),
        }
    }
}

/// Attribute summary of an `#EXT-X-STREAM-INF` entry, kept for callers that
/// surface the available variants.
fn stream_inf_summary(variant: &VariantStream) -> String {
    let mut attributes = vec![format!("BANDWIDTH={}", variant.bandwidth)];
    if let Some(resolution) = &variant.resolution {
        attributes.push(format!(
            "RESOLUTION={}x{}",
            resolution.width, resolution.height
        ));
    }
    if let Some(frame_rate) = variant.frame_rate {
        attributes.push(format!("FRAME-RATE={frame_rate:.3}"));
    }
    if let Some(codecs) = &variant.codecs {
        attributes.push(format!("CODECS=\"{codecs}\""));
    }
    attributes.join(",")
}
