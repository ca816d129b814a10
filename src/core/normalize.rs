use crate::models::{MatchRequest, NormalizedAttributes};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use url::Url;

/// Number of trailing digits kept when canonicalizing phone numbers.
/// Comparing on the local number makes matching independent of
/// country-code prefixes.
const PHONE_DIGITS: usize = 10;

/// Canonicalize a raw attribute bundle.
///
/// Total function: attributes that cannot be normalized come out as
/// empty strings rather than errors. Applying it to already-normalized
/// values yields the same values.
pub fn normalize(request: &MatchRequest) -> NormalizedAttributes {
    NormalizedAttributes {
        domain: request.website.as_deref().map(extract_domain).unwrap_or_default(),
        phone_digits: request.phone.as_deref().map(normalize_phone).unwrap_or_default(),
        facebook_id: request
            .facebook
            .as_deref()
            .map(normalize_facebook)
            .unwrap_or_default(),
        name_key: request.name.as_deref().map(name_key).unwrap_or_default(),
    }
}

/// Extract the lowercase host from a website value, stripping scheme,
/// `www.` prefix and any path/query/fragment. Returns empty when no
/// host-like token is found.
pub fn extract_domain(website: &str) -> String {
    let trimmed = website.trim().to_lowercase();
    if trimmed.is_empty() {
        return String::new();
    }

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.clone()
    } else {
        format!("http://{}", trimmed)
    };

    let host = match Url::parse(&with_scheme) {
        Ok(url) => url.host_str().map(|h| h.to_string()).unwrap_or_default(),
        Err(_) => {
            // Not parseable as a URL; take everything up to the first
            // path/query separator and hope it is a bare host.
            trimmed
                .trim_start_matches("https://")
                .trim_start_matches("http://")
                .split(['/', '?', '#'])
                .next()
                .unwrap_or("")
                .to_string()
        }
    };

    let host = host.strip_prefix("www.").unwrap_or(&host);

    // A host-like token has at least one label separator.
    if host.contains('.') {
        host.to_string()
    } else {
        String::new()
    }
}

/// Strip non-digits and keep the last 10 digits. Fewer than 10 digits
/// means the number cannot be compared reliably, so it comes out empty.
pub fn normalize_phone(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < PHONE_DIGITS {
        return String::new();
    }
    digits[digits.len() - PHONE_DIGITS..].iter().collect()
}

/// Extract the username or numeric page id from a Facebook URL.
///
/// Handles `facebook.com/<handle>`, `fb.com/<handle>` and
/// `facebook.com/profile.php?id=<N>` forms. A value with no Facebook
/// host is treated as a bare handle, which keeps the function
/// idempotent over its own output.
pub fn normalize_facebook(facebook: &str) -> String {
    let mut value = facebook.trim().to_lowercase();
    if value.is_empty() {
        return String::new();
    }

    for prefix in ["https://", "http://"] {
        if let Some(rest) = value.strip_prefix(prefix) {
            value = rest.to_string();
            break;
        }
    }
    if let Some(rest) = value.strip_prefix("www.") {
        value = rest.to_string();
    }

    let path = value
        .strip_prefix("facebook.com/")
        .or_else(|| value.strip_prefix("fb.com/"))
        .unwrap_or(&value);

    // profile.php?id=N URLs identify the page by numeric id.
    if let Some(query) = path.strip_prefix("profile.php?") {
        for pair in query.split('&') {
            if let Some(id) = pair.strip_prefix("id=") {
                let id: String = id.chars().take_while(|c| c.is_ascii_digit()).collect();
                return id;
            }
        }
        return String::new();
    }

    // First path segment, without query string or trailing slash.
    path.split(['/', '?', '#'])
        .next()
        .unwrap_or("")
        .to_string()
}

/// Build a fuzzy-comparable key from a company name: ASCII fold
/// (diacritics removed), lowercase, internal whitespace collapsed.
pub fn name_key(name: &str) -> String {
    let folded: String = name
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(|c| c.to_lowercase())
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_domain_strips_scheme_and_path() {
        assert_eq!(extract_domain("https://www.acme.com/about?x=1"), "acme.com");
        assert_eq!(extract_domain("http://acme.com"), "acme.com");
        assert_eq!(extract_domain("acme.com/contact"), "acme.com");
        assert_eq!(extract_domain("ACME.COM"), "acme.com");
    }

    #[test]
    fn test_extract_domain_no_host() {
        assert_eq!(extract_domain(""), "");
        assert_eq!(extract_domain("   "), "");
        assert_eq!(extract_domain("not a url"), "");
    }

    #[test]
    fn test_normalize_phone_keeps_last_ten_digits() {
        assert_eq!(normalize_phone("+1 (234) 567-8901"), "2345678901");
        assert_eq!(normalize_phone("0040 721 234 567"), "0721234567");
        assert_eq!(normalize_phone("2345678901"), "2345678901");
    }

    #[test]
    fn test_normalize_phone_too_short() {
        assert_eq!(normalize_phone("12345"), "");
        assert_eq!(normalize_phone(""), "");
        assert_eq!(normalize_phone("call us"), "");
    }

    #[test]
    fn test_normalize_facebook_variants() {
        assert_eq!(normalize_facebook("https://www.facebook.com/AcmeCorp/"), "acmecorp");
        assert_eq!(normalize_facebook("fb.com/acme.corp?ref=page"), "acme.corp");
        assert_eq!(
            normalize_facebook("facebook.com/profile.php?id=12345&ref=x"),
            "12345"
        );
        assert_eq!(normalize_facebook("acmecorp"), "acmecorp");
    }

    #[test]
    fn test_name_key_folds_and_collapses() {
        assert_eq!(name_key("  Açmé   Corporation "), "acme corporation");
        assert_eq!(name_key("ACME Corp"), "acme corp");
        assert_eq!(name_key(""), "");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let raw = MatchRequest {
            name: Some("Açmé  Corporation".to_string()),
            website: Some("https://www.Acme.com/about".to_string()),
            phone: Some("+1 (234) 567-8901".to_string()),
            facebook: Some("https://facebook.com/AcmeCorp/".to_string()),
        };
        let first = normalize(&raw);

        let again = MatchRequest {
            name: Some(first.name_key.clone()),
            website: Some(first.domain.clone()),
            phone: Some(first.phone_digits.clone()),
            facebook: Some(first.facebook_id.clone()),
        };
        let second = normalize(&again);

        assert_eq!(first, second);
    }

    #[test]
    fn test_normalize_all_empty() {
        let normalized = normalize(&MatchRequest::default());
        assert!(normalized.is_empty());
    }
}
