/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Current UTC timestamp as an ISO-8601 / RFC 3339 string.
///
/// This is the format the spreadsheet endpoint stores for attendance
/// timestamps and registration dates.
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Generate a fresh entity id (branches, jobs, users, records, ...).
///
/// UUID v4 as a plain string; the endpoint treats ids as opaque text.
pub fn entity_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Encode a non-negative integer in lowercase base36.
///
/// Used for the time component of device tokens.
pub fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}
