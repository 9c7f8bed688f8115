use super::AllocationError;
use url::Url;

/// Parse and canonicalize a destination. Only absolute `http`/`https` URLs
/// are accepted.
pub fn normalize_destination(input: &str) -> Result<String, AllocationError> {
    let url = Url::parse(input.trim())
        .map_err(|e| AllocationError::InvalidDestination(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(AllocationError::InvalidDestination(format!(
                "unsupported scheme '{other}'"
            )))
        }
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(AllocationError::InvalidDestination("missing host".to_string()));
    }

    Ok(url.to_string())
}
