//! MPEG-DASH manifest support.
//!
//! Static (VoD) MPDs only: the first video `AdaptationSet`'s first
//! `Representation` is expanded through its `SegmentTemplate` and
//! `SegmentTimeline` into an ordered segment list. Live manifests,
//! multi-track merging and quality negotiation are out of scope.

pub mod template;

use dash_mpd::{AdaptationSet, Representation, MPD};
use url::Url;

use crate::{
    error::{TsumugiError, TsumugiResult},
    manifest::{ParsedManifest, Segment, StreamFormat},
    util::{http::HttpClient, url::resolve},
};
use template::Template;

pub struct DashParser {
    client: HttpClient,
}

impl DashParser {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Fetch and parse an MPD document into an ordered segment list.
    pub async fn parse(&self, manifest_url: Url) -> TsumugiResult<ParsedManifest> {
        log::info!("Fetching MPD manifest: {manifest_url}");
        let response = self
            .client
            .get(manifest_url.clone())
            .header("Accept", "application/dash+xml,video/vnd.mpeg.dash.mpd")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(TsumugiError::HttpError(response.status()));
        }
        let text = response.text().await?;
        let mpd = dash_mpd::parse(&text)?;

        let total_duration = mpd
            .mediaPresentationDuration
            .map(|duration| duration.as_secs_f64())
            .unwrap_or(0.0);

        let mut base_url = manifest_url.clone();
        if let Some(mpd_base_url) = mpd.base_url.first() {
            base_url = resolve(&base_url, &mpd_base_url.base)?;
        }

        let segments = match select_video_representation(&mpd) {
            Some((adaptation, representation)) => {
                expand_timeline(adaptation, representation, &base_url)?
            }
            None => Vec::new(),
        };

        if segments.is_empty() {
            log::warn!("No video segments found in MPD: {manifest_url}");
        }

        Ok(ParsedManifest {
            format: StreamFormat::Dash,
            manifest_url,
            segments,
            total_duration,
            variant_playlists: Vec::new(),
        })
    }
}

/// First adaptation set whose declared MIME type contains "video" and that
/// carries at least one representation; first match wins, no quality
/// negotiation.
fn select_video_representation(mpd: &MPD) -> Option<(&AdaptationSet, &Representation)> {
    mpd.periods
        .iter()
        .flat_map(|period| period.adaptations.iter())
        .filter(|adaptation| {
            adaptation
                .contentType
                .as_deref()
                .or(adaptation.mimeType.as_deref())
                .is_some_and(|mime_type| mime_type.contains("video"))
        })
        .find_map(|adaptation| {
            adaptation
                .representations
                .first()
                .map(|representation| (adaptation, representation))
        })
}

fn expand_timeline(
    adaptation: &AdaptationSet,
    representation: &Representation,
    base_url: &Url,
) -> TsumugiResult<Vec<Segment>> {
    let segment_template = representation
        .SegmentTemplate
        .as_ref()
        .or(adaptation.SegmentTemplate.as_ref());
    let Some(segment_template) = segment_template else {
        return Ok(Vec::new());
    };
    let Some(ref media_template) = segment_template.media else {
        return Ok(Vec::new());
    };
    let Some(ref segment_timeline) = segment_template.SegmentTimeline else {
        return Ok(Vec::new());
    };

    let timescale = segment_template.timescale.unwrap_or(1);
    let mut segment_number = segment_template.startNumber.unwrap_or(1);

    let mut args = Template::new();
    if let Some(representation_id) = representation.id.clone() {
        args.insert(Template::REPRESENTATION_ID, representation_id);
    }
    if let Some(bandwidth) = representation.bandwidth {
        args.insert(Template::BANDWIDTH, bandwidth.to_string());
    }

    let mut segments = Vec::new();
    let mut current_time = 0;
    for timeline_segment in segment_timeline.segments.iter() {
        if let Some(t) = timeline_segment.t {
            current_time = t;
        }

        let duration = timeline_segment.d;
        let repeat = timeline_segment.r.unwrap_or(0);
        for _ in 0..(repeat + 1) {
            args.insert(Template::NUMBER, segment_number.to_string());
            args.insert(Template::TIME, current_time.to_string());

            let media = args.resolve(media_template);
            let url = resolve(base_url, &media)?;
            segments.push(Segment::new(
                url,
                duration as f64 / timescale as f64,
                segments.len() as u64,
            ));

            segment_number += 1;
            current_time += duration;
        }
    }

    Ok(segments)
}
