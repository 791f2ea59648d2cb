//! HPACK static header table.
//!
//! Sixty predefined header fields, addressed zero-based after the
//! dynamic table in the combined index space. The table never changes.

/// Static table entry: (name, value).
pub type StaticEntry = (&'static [u8], &'static [u8]);

/// The 60 static entries, `:authority` first.
pub const STATIC_TABLE: &[StaticEntry; 60] = &[
    (b":authority", b""),
    (b":method", b"GET"),
    (b":method", b"POST"),
    (b":path", b"/"),
    (b":path", b"/index.html"),
    (b":scheme", b"http"),
    (b":scheme", b"https"),
    (b":status", b"200"),
    (b":status", b"204"),
    (b":status", b"206"),
    (b":status", b"304"),
    (b":status", b"400"),
    (b":status", b"404"),
    (b":status", b"500"),
    (b"accept-charset", b""),
    (b"accept-encoding", b""),
    (b"accept-language", b""),
    (b"accept-ranges", b""),
    (b"accept", b""),
    (b"access-control-allow-origin", b""),
    (b"age", b""),
    (b"allow", b""),
    (b"authorization", b""),
    (b"cache-control", b""),
    (b"content-disposition", b""),
    (b"content-encoding", b""),
    (b"content-language", b""),
    (b"content-length", b""),
    (b"content-location", b""),
    (b"content-range", b""),
    (b"content-type", b""),
    (b"cookie", b""),
    (b"date", b""),
    (b"etag", b""),
    (b"expect", b""),
    (b"expires", b""),
    (b"from", b""),
    (b"host", b""),
    (b"if-match", b""),
    (b"if-modified-since", b""),
    (b"if-none-match", b""),
    (b"if-range", b""),
    (b"if-unmodified-since", b""),
    (b"last-modified", b""),
    (b"link", b""),
    (b"location", b""),
    (b"max-forwards", b""),
    (b"proxy-authenticate", b""),
    (b"proxy-authorization", b""),
    (b"range", b""),
    (b"referer", b""),
    (b"retry-after", b""),
    (b"server", b""),
    (b"set-cookie", b""),
    (b"strict-transport-security", b""),
    (b"transfer-encoding", b""),
    (b"user-agent", b""),
    (b"vary", b""),
    (b"via", b""),
    (b"www-authenticate", b""),
];

/// Look up an entry by zero-based static index.
pub fn get(index: usize) -> Option<StaticEntry> {
    STATIC_TABLE.get(index).copied()
}

/// Zero-based index of an exact (name, value) match.
pub fn find(name: &[u8], value: &[u8]) -> Option<usize> {
    STATIC_TABLE
        .iter()
        .position(|(n, v)| *n == name && *v == value)
}

/// Zero-based index of the first entry with this name.
pub fn find_by_name(name: &[u8]) -> Option<usize> {
    STATIC_TABLE.iter().position(|(n, _)| *n == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_positions() {
        assert_eq!(get(0), Some((&b":authority"[..], &b""[..])));
        assert_eq!(get(1), Some((&b":method"[..], &b"GET"[..])));
        assert_eq!(get(3), Some((&b":path"[..], &b"/"[..])));
        assert_eq!(get(5), Some((&b":scheme"[..], &b"http"[..])));
        assert_eq!(get(23), Some((&b"cache-control"[..], &b""[..])));
        assert_eq!(get(32), Some((&b"date"[..], &b""[..])));
        assert_eq!(get(45), Some((&b"location"[..], &b""[..])));
        assert_eq!(get(59), Some((&b"www-authenticate"[..], &b""[..])));
        assert_eq!(get(60), None);
    }

    #[test]
    fn test_find_prefers_first_match() {
        assert_eq!(find(b":method", b"GET"), Some(1));
        assert_eq!(find(b":method", b"POST"), Some(2));
        assert_eq!(find_by_name(b":method"), Some(1));
        assert_eq!(find(b":method", b"PATCH"), None);
        assert_eq!(find_by_name(b"x-custom"), None);
    }
}
