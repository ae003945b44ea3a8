// Adapters layer: the HTTP transport and one module per remote API.

pub mod content_upload;
pub mod email;
pub mod http;
pub mod realtime_db;

use crate::utils::error::{Result, RunnerError};
use url::Url;

/// Appends the `/`-separated segments of `path` to `base`, keeping any path
/// prefix the base already has. Each segment is percent-encoded, so `#`, `?`
/// and spaces stay inside the path.
pub(crate) fn endpoint(base: &Url, path: &str) -> Result<Url> {
    let mut url = base.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| RunnerError::InvalidConfigValueError {
                field: "base_url".to_string(),
                value: base.to_string(),
                reason: "URL cannot carry a path".to_string(),
            })?;
        segments
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
    }
    Ok(url)
}
