/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Length of generated record / session IDs.
pub const SHORT_ID_LEN: usize = 9;

/// Generate a short opaque identifier (9 lowercase base-36 characters).
///
/// 36^9 ≈ 1.0e14 values, collision-free at the scale of one client's
/// report list. Uniqueness inside a store is still enforced by upsert.
pub fn short_id() -> String {
    use rand::Rng;
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..SHORT_ID_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
