use url::Url;

/// Longest file name the downloads surface accepts.
const MAX_FILENAME_LENGTH: usize = 200;

fn is_invalid_char(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || c.is_control()
}

/// Replace characters the downloads surface refuses and truncate overlong
/// names, keeping the extension intact.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if is_invalid_char(c) { '_' } else { c })
        .collect();

    if sanitized.chars().count() <= MAX_FILENAME_LENGTH {
        return sanitized;
    }

    match sanitized.rsplit_once('.') {
        Some((stem, ext)) => {
            let keep = MAX_FILENAME_LENGTH.saturating_sub(ext.chars().count() + 1);
            let stem: String = stem.chars().take(keep).collect();
            format!("{stem}.{ext}")
        }
        None => sanitized.chars().take(MAX_FILENAME_LENGTH).collect(),
    }
}

/// Derive a save-to-disk file name from the last path segment of a URL.
pub fn suggested_filename(url: &Url, fallback: &str) -> String {
    let name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .unwrap_or(fallback);
    sanitize_filename(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_plain_names() {
        assert_eq!(sanitize_filename("video.mp4"), "video.mp4");
    }

    #[test]
    fn test_sanitize_replaces_invalid_characters() {
        assert_eq!(sanitize_filename("a/b\\c:d?.ts"), "a_b_c_d_.ts");
    }

    #[test]
    fn test_sanitize_truncates_keeping_extension() {
        let name = format!("{}.mp4", "a".repeat(300));
        let sanitized = sanitize_filename(&name);
        assert_eq!(sanitized.chars().count(), MAX_FILENAME_LENGTH);
        assert!(sanitized.ends_with(".mp4"));
    }

    #[test]
    fn test_suggested_filename() {
        let url = Url::parse("https://cdn.example.com/media/stream_hls.mp4?token=1").unwrap();
        assert_eq!(suggested_filename(&url, "video.mp4"), "stream_hls.mp4");

        let url = Url::parse("https://cdn.example.com/").unwrap();
        assert_eq!(suggested_filename(&url, "video.mp4"), "video.mp4");
    }
}
