//! Request URL construction

use crate::models::Params;
use crate::utils::error::{SparkError, SparkResult};
use url::Url;

/// Compose `base/resource[/id][?query]`.
///
/// The id is percent-encoded as a single path segment. Query values are
/// form-url-encoded in the parameters' insertion order. An empty parameter
/// set adds no `?`.
pub fn build_path(base: &str, resource: &str, id: Option<&str>, params: Option<&Params>) -> SparkResult<String> {
    let base = base.trim_end_matches('/');
    let mut url = Url::parse(base).map_err(|e| SparkError::Validation(format!("invalid base URL {}: {}", base, e)))?;

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| SparkError::Validation(format!("base URL {} cannot carry a path", base)))?;
        segments
            .pop_if_empty()
            .extend(resource.split('/').filter(|s| !s.is_empty()));
        if let Some(id) = id {
            segments.push(id);
        }
    }

    if let Some(params) = params.filter(|p| !p.is_empty()) {
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (k, v.to_text())));
    }

    Ok(url.into())
}
