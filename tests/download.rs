use tsumugi::{
    HttpClient, Segment, SegmentDownloader, StreamDownloader, StreamFormat, TsumugiError,
};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

async fn mock_bytes(server: &MockServer, mock_path: &str, body: &'static [u8]) {
    Mock::given(method("GET"))
        .and(path(mock_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

fn segment(server: &MockServer, name: &str, sequence: u64) -> Segment {
    let url = format!("{}/{name}", server.uri()).parse().unwrap();
    Segment::new(url, 4.0, sequence)
}

#[tokio::test]
async fn failed_segment_is_skipped_and_progress_still_fires() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mock_bytes(&server, "/seg0.ts", b"AAAA").await;
    // seg1.ts is not mounted and 404s.
    mock_bytes(&server, "/seg2.ts", b"CCCC").await;

    let segments = vec![
        segment(&server, "seg0.ts", 0),
        segment(&server, "seg1.ts", 1),
        segment(&server, "seg2.ts", 2),
    ];

    let mut progress = Vec::new();
    let downloader = SegmentDownloader::new(HttpClient::default());
    let merged = downloader
        .download_and_merge(&segments, None, |completed, total| {
            progress.push((completed, total))
        })
        .await?;

    assert_eq!(&merged.data[..], b"AAAACCCC");
    assert_eq!(merged.segment_count, 2);
    assert_eq!(merged.mime_type, "video/mp4");
    assert_eq!(progress, vec![(1, 3), (2, 3), (3, 3)]);

    Ok(())
}

#[tokio::test]
async fn all_segments_failing_merges_to_an_empty_payload() -> anyhow::Result<()> {
    let server = MockServer::start().await;

    let segments = vec![
        segment(&server, "seg0.ts", 0),
        segment(&server, "seg1.ts", 1),
    ];

    let downloader = SegmentDownloader::new(HttpClient::default());
    let merged = downloader
        .download_and_merge(&segments, None, |_, _| {})
        .await?;

    assert!(merged.is_empty());
    assert_eq!(merged.len(), 0);
    assert_eq!(merged.segment_count, 0);

    Ok(())
}

#[tokio::test]
async fn declared_mime_type_is_kept() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mock_bytes(&server, "/seg0.ts", b"AAAA").await;

    let segments = vec![segment(&server, "seg0.ts", 0)];

    let downloader = SegmentDownloader::new(HttpClient::default());
    let merged = downloader
        .download_and_merge(&segments, Some("video/mp2t"), |_, _| {})
        .await?;

    assert_eq!(merged.mime_type, "video/mp2t");

    Ok(())
}

#[tokio::test]
async fn hls_stream_downloads_end_to_end() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vod/index.m3u8"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "#EXTM3U\n#EXTINF:5.0,\nseg0.ts\n#EXTINF:5.0,\nseg1.ts\n#EXT-X-ENDLIST\n",
        ))
        .mount(&server)
        .await;
    mock_bytes(&server, "/vod/seg0.ts", b"first-").await;
    mock_bytes(&server, "/vod/seg1.ts", b"second").await;

    let mut progress = Vec::new();
    let downloader = StreamDownloader::new(HttpClient::default());
    let merged = downloader
        .download(
            StreamFormat::Hls,
            format!("{}/vod/index.m3u8", server.uri()).parse()?,
            None,
            |completed, total| progress.push((completed, total)),
        )
        .await?;

    assert_eq!(&merged.data[..], b"first-second");
    assert_eq!(merged.segment_count, 2);
    assert_eq!(progress, vec![(1, 2), (2, 2)]);

    Ok(())
}

#[tokio::test]
async fn session_cookies_reach_the_segment_requests() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/seg0.ts"))
        .and(header("cookie", "session=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(&b"AAAA"[..]))
        .mount(&server)
        .await;

    let client = HttpClient::default();
    client.add_cookies(vec!["session=abc; Path=/".to_string()], server.uri());

    let segments = vec![segment(&server, "seg0.ts", 0)];
    let merged = SegmentDownloader::new(client)
        .download_and_merge(&segments, None, |_, _| {})
        .await?;

    assert_eq!(&merged.data[..], b"AAAA");

    Ok(())
}

#[tokio::test]
async fn drm_looking_manifest_is_rejected_before_any_fetch() -> anyhow::Result<()> {
    let downloader = StreamDownloader::new(HttpClient::default());
    let result = downloader
        .parse(
            StreamFormat::Hls,
            "https://cdn.example.com/widevine/master.m3u8".parse()?,
        )
        .await;

    assert!(matches!(result, Err(TsumugiError::DrmProtected(_))));

    Ok(())
}
