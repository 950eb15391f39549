use bytes::{Bytes, BytesMut};

/// MIME type used when the caller declares none.
pub const DEFAULT_MIME_TYPE: &str = "video/mp4";

/// Output of a download-and-merge run. Zero-length `data` is the caller's
/// failure signal for a run in which every segment failed.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedMedia {
    pub data: Bytes,
    pub mime_type: String,
    /// Count of segments that contributed to `data`.
    pub segment_count: usize,
}

impl MergedMedia {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Concatenate downloaded payloads, in original order, into a single binary
/// object tagged with the declared MIME type.
pub fn concat<I>(parts: I, mime_type: &str) -> MergedMedia
where
    I: IntoIterator<Item = Bytes>,
{
    let mut data = BytesMut::new();
    let mut segment_count = 0;
    for part in parts {
        data.extend_from_slice(&part);
        segment_count += 1;
    }

    MergedMedia {
        data: data.freeze(),
        mime_type: mime_type.to_string(),
        segment_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_preserves_order() {
        let merged = concat(
            [Bytes::from_static(b"AA"), Bytes::from_static(b"BB")],
            DEFAULT_MIME_TYPE,
        );
        assert_eq!(&merged.data[..], b"AABB");
        assert_eq!(merged.mime_type, "video/mp4");
        assert_eq!(merged.segment_count, 2);
    }

    #[test]
    fn test_concat_of_nothing_is_empty() {
        let merged = concat([], "video/mp2t");
        assert!(merged.is_empty());
        assert_eq!(merged.len(), 0);
        assert_eq!(merged.segment_count, 0);
        assert_eq!(merged.mime_type, "video/mp2t");
    }
}
