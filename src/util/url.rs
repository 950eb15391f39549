use url::Url;

use crate::error::TsumugiResult;

fn is_absolute_url(s: &str) -> bool {
    s.starts_with("http://")
        || s.starts_with("https://")
        || s.starts_with("file://")
        || s.starts_with("ftp://")
}

/// Resolve a manifest reference against the document's base URL.
///
/// An already-absolute reference is returned unchanged. For relative
/// references, the query portion of the base URL (CDN auth tokens and the
/// like) is kept unless the reference carries its own query string.
pub fn resolve(base: &Url, reference: &str) -> TsumugiResult<Url> {
    if is_absolute_url(reference) {
        Ok(Url::parse(reference)?)
    } else {
        let mut resolved = base.join(reference)?;
        if resolved.query().is_none() {
            resolved.set_query(base.query());
        }
        Ok(resolved)
    }
}

/// Markers that identify a protected stream the pipeline must not touch.
const DRM_URL_MARKERS: &[&str] = &["drm", "widevine", "playready"];

pub fn is_drm_url(url: &Url) -> bool {
    let url = url.as_str().to_ascii_lowercase();
    DRM_URL_MARKERS.iter().any(|marker| url.contains(marker))
}
