use bytes::Bytes;
use url::Url;

use crate::{
    dash::DashParser,
    error::{TsumugiError, TsumugiResult},
    hls::HlsParser,
    manifest::{ParsedManifest, Segment, StreamFormat},
    merge::{self, MergedMedia, DEFAULT_MIME_TYPE},
    util::{http::HttpClient, url::is_drm_url},
};

/// Sequentially fetches segments and merges whatever was retrievable.
///
/// Segment failures are skipped, not retried; a run in which every segment
/// fails still merges into an empty payload. Callers decide whether a
/// partial result is acceptable.
pub struct SegmentDownloader {
    client: HttpClient,
}

impl SegmentDownloader {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Fetch all segments in list order and concatenate the successful ones.
    ///
    /// `on_progress(completed, total)` fires after each segment resolves,
    /// whether it downloaded or was skipped.
    pub async fn download_and_merge<F>(
        &self,
        segments: &[Segment],
        mime_type: Option<&str>,
        mut on_progress: F,
    ) -> TsumugiResult<MergedMedia>
    where
        F: FnMut(usize, usize),
    {
        let total = segments.len();
        let mut parts = Vec::with_capacity(total);

        for (i, segment) in segments.iter().enumerate() {
            match self.fetch_segment(segment).await {
                Ok(bytes) => parts.push(bytes),
                Err(error) => {
                    log::warn!("Failed to download segment {url}: {error}", url = segment.url)
                }
            }
            on_progress(i + 1, total);
        }

        if parts.len() < total {
            log::warn!(
                "{failed} of {total} segment(s) failed; merging the rest.",
                failed = total - parts.len()
            );
        }

        Ok(merge::concat(parts, mime_type.unwrap_or(DEFAULT_MIME_TYPE)))
    }

    async fn fetch_segment(&self, segment: &Segment) -> TsumugiResult<Bytes> {
        let response = self.client.get(segment.url.clone()).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            if let Ok(body) = response.text().await {
                tracing::warn!("Error body: {body}");
            }
            return Err(TsumugiError::HttpError(status));
        }

        Ok(response.bytes().await?)
    }
}

/// Caller-facing entry point: declared format + manifest URL in, merged
/// payload out.
pub struct StreamDownloader {
    client: HttpClient,
}

impl StreamDownloader {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Parse a manifest with the parser matching the declared format.
    pub async fn parse(
        &self,
        format: StreamFormat,
        manifest_url: Url,
    ) -> TsumugiResult<ParsedManifest> {
        if is_drm_url(&manifest_url) {
            return Err(TsumugiError::DrmProtected(manifest_url));
        }

        match format {
            StreamFormat::Hls => HlsParser::new(self.client.clone()).parse(manifest_url).await,
            StreamFormat::Dash => DashParser::new(self.client.clone()).parse(manifest_url).await,
        }
    }

    /// Parse, download and merge in one call.
    pub async fn download<F>(
        &self,
        format: StreamFormat,
        manifest_url: Url,
        mime_type: Option<&str>,
        on_progress: F,
    ) -> TsumugiResult<MergedMedia>
    where
        F: FnMut(usize, usize),
    {
        let manifest = self.parse(format, manifest_url).await?;
        log::info!(
            "Parsed {format} manifest: {count} segment(s), {duration:.1}s total.",
            count = manifest.segments.len(),
            duration = manifest.total_duration
        );

        SegmentDownloader::new(self.client.clone())
            .download_and_merge(&manifest.segments, mime_type, on_progress)
            .await
    }
}
