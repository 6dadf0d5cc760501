/// Length of generated passwords.
pub const PASSWORD_LEN: usize = 12;

/// Unambiguous alphabet: no 0/O/1/I/l.
const PASSWORD_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789";

/// Normalize a plate input: strip non-alphanumerics and uppercase, keeping
/// the caret anchored to the characters that survive before it.
///
/// `cursor` is a character index into `value`; the returned cursor indexes
/// the normalized string.
pub fn normalize_plate(value: &str, cursor: usize) -> (String, usize) {
    let normalized: String = value
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    let next_cursor = value
        .chars()
        .take(cursor)
        .filter(char::is_ascii_alphanumeric)
        .count();
    (normalized, next_cursor)
}

/// Map random bytes onto the password alphabet. The caller supplies the
/// randomness; the mapping itself is deterministic.
pub fn password_from_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take(PASSWORD_LEN)
        .map(|byte| PASSWORD_ALPHABET[*byte as usize % PASSWORD_ALPHABET.len()] as char)
        .collect()
}
