use crate::schema::ParleyConfig;

use super::helpers::validate_range;

/// Validate the API endpoint and timeouts.
pub(crate) fn validate_server(errors: &mut Vec<String>, config: &ParleyConfig) {
    let url = config.server.base_url.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') => {}
        _ => errors.push(format!(
            "server.base_url = {:?} must be an http:// or https:// URL",
            config.server.base_url
        )),
    }

    validate_range(
        errors,
        "server.connect_timeout_secs",
        config.server.connect_timeout_secs,
        1,
        120,
    );
    validate_range(
        errors,
        "server.request_timeout_secs",
        config.server.request_timeout_secs,
        1,
        600,
    );
}
