use thiserror::Error;

#[derive(Error, Debug)]
pub enum TsumugiError {
    #[error("HTTP error: {0}")]
    HttpError(reqwest::StatusCode),

    #[error("Empty playlist: no usable lines")]
    EmptyPlaylist,

    #[error("Invalid m3u8 file: {0}")]
    PlaylistParseError(String),

    #[error("Variant playlists nested deeper than {0} levels")]
    PlaylistTooDeep(usize),

    #[error("Unknown stream format: {0}")]
    UnknownFormat(String),

    #[error("DRM-protected stream rejected: {0}")]
    DrmProtected(url::Url),

    #[error(transparent)]
    UrlParseError(#[from] url::ParseError),

    #[error(transparent)]
    RequestError(#[from] reqwest::Error),

    // MPEG-DASH errors
    #[error(transparent)]
    MpdParseError(#[from] dash_mpd::DashMpdError),
}

pub type TsumugiResult<T> = Result<T, TsumugiError>;
