//! Keeps oversized API payloads out of the logs.

/// Maximum number of bytes of a response body included in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Truncate a response body for logging.
///
/// Bodies within the limit pass through unchanged; longer ones are cut at a
/// character boundary and suffixed with the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }
    let mut cut = TRUNCATE_LIMIT;
    while cut > 0 && !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}... [truncated, total {} bytes]", &s[..cut], s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_body_unchanged() {
        assert_eq!(truncate_for_log("{\"id\": 1}"), "{\"id\": 1}");
    }

    #[test]
    fn long_body_truncated() {
        let body = "x".repeat(TRUNCATE_LIMIT * 2);
        let out = truncate_for_log(&body);
        assert!(out.len() < body.len());
        assert!(out.ends_with(&format!("[truncated, total {} bytes]", body.len())));
    }

    #[test]
    fn cuts_on_char_boundary() {
        let body = "ü".repeat(TRUNCATE_LIMIT);
        let out = truncate_for_log(&body);
        assert!(out.contains("truncated"));
    }
}
