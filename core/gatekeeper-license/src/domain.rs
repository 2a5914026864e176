//! Domain matching between a license and the page it protects.
//!
//! Matching is case-insensitive and ignores a leading `www.` on either side.
//! A license domain of the form `*.suffix` covers the bare suffix and every
//! subdomain beneath it, at any depth.

use url::Url;

const WWW_PREFIX: &str = "www.";
const WILDCARD_PREFIX: &str = "*.";
const MAX_HOSTNAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Returns true if `requested` is covered by the license domain `licensed`.
#[must_use]
pub fn domain_matches(licensed: &str, requested: &str) -> bool {
    let licensed = canonical(licensed);
    let requested = canonical(requested);
    if licensed.is_empty() || requested.is_empty() {
        return false;
    }

    if let Some(suffix) = licensed.strip_prefix(WILDCARD_PREFIX) {
        return !suffix.is_empty()
            && variants(&requested).any(|host| {
                host == suffix
                    || host
                        .strip_suffix(suffix)
                        .is_some_and(|head| head.len() > 1 && head.ends_with('.'))
            });
    }

    variants(&licensed).any(|l| variants(&requested).any(|r| l == r))
}

/// Extracts a hostname from a page URL or a bare hostname.
///
/// Full URLs yield their host. Input that is not a URL but has the shape of a
/// hostname, optionally followed by `:port`, yields the hostname. Anything
/// else yields `None`.
#[must_use]
pub fn extract_domain(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(url) = Url::parse(input) {
        if let Some(host) = url.host_str() {
            return Some(host.to_string());
        }
    }

    let host = strip_port(input);
    is_hostname(host).then(|| host.to_string())
}

/// Drops a trailing `:port` from `host:port` text.
fn strip_port(input: &str) -> &str {
    match input.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => host,
        _ => input,
    }
}

/// Returns true if `text` is shaped like a hostname, optionally with a
/// leading `*.` wildcard.
#[must_use]
pub fn is_hostname(text: &str) -> bool {
    let host = text.strip_prefix(WILDCARD_PREFIX).unwrap_or(text);
    let host = host.strip_suffix('.').unwrap_or(host);
    if host.is_empty() || host.len() > MAX_HOSTNAME_LEN {
        return false;
    }

    host.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    })
}

fn canonical(domain: &str) -> String {
    let lowered = domain.trim().to_ascii_lowercase();
    match lowered.strip_suffix('.') {
        Some(stripped) => stripped.to_string(),
        None => lowered,
    }
}

/// The host itself and, when it has one, the host without its `www.`.
fn variants(host: &str) -> impl Iterator<Item = &str> {
    std::iter::once(host).chain(host.strip_prefix(WWW_PREFIX).filter(|rest| !rest.is_empty()))
}
