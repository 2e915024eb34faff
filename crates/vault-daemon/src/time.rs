//! Wall-clock access.
//!
//! The daemon is the only place that reads the system clock; every core
//! operation takes the timestamp as an argument.

/// Current Unix time in seconds.
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_now_is_recent() {
        // Sanity: after 2023-11 (1_700_000_000) and monotone-ish.
        let a = unix_now();
        let b = unix_now();
        assert!(a > 1_700_000_000);
        assert!(b >= a);
    }
}
