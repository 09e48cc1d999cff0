use axum::http::HeaderMap;

/// Throttle key used when the request carries no client address.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// Identify the submitting client: first hop of `X-Forwarded-For`, then
/// `X-Real-Ip`, then [`UNKNOWN_SOURCE`].
pub fn source_id(headers: &HeaderMap) -> String {
    forwarded_for(headers)
        .or_else(|| header_value(headers, "x-real-ip"))
        .unwrap_or_else(|| UNKNOWN_SOURCE.to_string())
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get("x-forwarded-for")?.to_str().ok()?;
    let first = raw.split(',').next()?.trim();
    if first.is_empty() {
        return None;
    }
    Some(first.to_string())
}

fn header_value(headers: &HeaderMap, key: &str) -> Option<String> {
    let raw = headers.get(key)?.to_str().ok()?.trim();
    if raw.is_empty() {
        return None;
    }
    Some(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_str(v).unwrap());
        }
        map
    }

    #[test]
    fn first_forwarded_hop_wins() {
        let h = headers(&[
            ("x-forwarded-for", "203.0.113.7, 10.0.0.1"),
            ("x-real-ip", "10.0.0.2"),
        ]);
        assert_eq!(source_id(&h), "203.0.113.7");
    }

    #[test]
    fn falls_back_to_real_ip() {
        let h = headers(&[("x-real-ip", " 198.51.100.4 ")]);
        assert_eq!(source_id(&h), "198.51.100.4");

        let h = headers(&[("x-forwarded-for", " , 10.0.0.1"), ("x-real-ip", "198.51.100.4")]);
        assert_eq!(source_id(&h), "198.51.100.4");
    }

    #[test]
    fn unknown_without_headers() {
        assert_eq!(source_id(&HeaderMap::new()), UNKNOWN_SOURCE);
        assert_eq!(source_id(&headers(&[("x-real-ip", "")])), UNKNOWN_SOURCE);
    }
}
