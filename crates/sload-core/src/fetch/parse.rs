//! Parse collected response header lines.

use std::collections::BTreeMap;

/// Fold raw header lines (as delivered by curl's header callback) into a map.
///
/// Curl reports the headers of every response in a redirect chain; a status
/// line starts a new block, so only the final response's headers survive.
pub(crate) fn parse_headers(lines: &[String]) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            headers.clear();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_headers_lowercases_names() {
        let lines = [
            "HTTP/1.1 200 OK".to_string(),
            "Content-Type: text/html; charset=utf-8".to_string(),
            "Content-Length: 12".to_string(),
        ];
        let h = parse_headers(&lines);
        assert_eq!(
            h.get("content-type").map(String::as_str),
            Some("text/html; charset=utf-8")
        );
        assert_eq!(h.get("content-length").map(String::as_str), Some("12"));
    }

    #[test]
    fn parse_headers_keeps_only_final_response() {
        let lines = [
            "HTTP/1.1 302 Found".to_string(),
            "Location: /real.css".to_string(),
            "".to_string(),
            "HTTP/1.1 200 OK".to_string(),
            "Content-Type: text/css".to_string(),
        ];
        let h = parse_headers(&lines);
        assert!(h.get("location").is_none());
        assert_eq!(h.get("content-type").map(String::as_str), Some("text/css"));
    }

    #[test]
    fn parse_headers_value_with_colon() {
        let lines = ["Date: Wed, 21 Oct 2015 07:28:00 GMT".to_string()];
        let h = parse_headers(&lines);
        assert_eq!(
            h.get("date").map(String::as_str),
            Some("Wed, 21 Oct 2015 07:28:00 GMT")
        );
    }
}
