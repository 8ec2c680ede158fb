/// Reasons an assignment image reference is rejected.
#[derive(Debug, PartialEq, Eq)]
pub enum ImageUrlError {
    /// Only `https://` URLs are served.
    NotHttps,
    /// No host between the scheme and the path.
    MissingHost,
    /// Host or port holds characters a browser would reinterpret
    /// (a backslash, whitespace, control characters, percent escapes).
    MalformedHost,
    /// Credentials embedded in the authority (`user@host`).
    Userinfo,
    /// Host does not match the allow-listed pattern.
    HostNotAllowed,
}

impl ImageUrlError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotHttps => "Image URL must use https",
            Self::MissingHost => "Image URL must include a host",
            Self::MalformedHost => "Image URL host is malformed",
            Self::Userinfo => "Image URL must not contain credentials",
            Self::HostNotAllowed => "Image URL host is not allowed",
        }
    }
}

/// Extract the lowercase host from an `https://` URL.
fn host_of(url: &str) -> Result<String, ImageUrlError> {
    let rest = url
        .trim()
        .strip_prefix("https://")
        .ok_or(ImageUrlError::NotHttps)?;
    let authority = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    if authority.contains('@') {
        return Err(ImageUrlError::Userinfo);
    }
    let (host, port) = authority.split_once(':').unwrap_or((authority, ""));
    if host.is_empty() {
        return Err(ImageUrlError::MissingHost);
    }
    // Only plain DNS names. Anything else may resolve differently in the browser.
    let host_ok = host
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        && !host.split('.').any(str::is_empty);
    if !host_ok || !port.chars().all(|c| c.is_ascii_digit()) {
        return Err(ImageUrlError::MalformedHost);
    }
    Ok(host.to_ascii_lowercase())
}

/// Whether `host` matches `pattern`. `*.example.com` matches any subdomain
/// of `example.com` but not `example.com` itself.
pub fn host_matches(host: &str, pattern: &str) -> bool {
    let pattern = pattern.trim().to_ascii_lowercase();
    match pattern.strip_prefix("*.") {
        Some(suffix) => host
            .strip_suffix(suffix)
            .is_some_and(|prefix| prefix.len() > 1 && prefix.ends_with('.')),
        None => host == pattern,
    }
}

/// Validate an image URL against the allow-listed host pattern.
pub fn validate_image_url(url: &str, allowed: &str) -> Result<(), ImageUrlError> {
    let host = host_of(url)?;
    if host_matches(&host, allowed) {
        Ok(())
    } else {
        Err(ImageUrlError::HostNotAllowed)
    }
}
