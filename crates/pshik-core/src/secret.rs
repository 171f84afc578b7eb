/// Compare a presented shared secret with the configured one.
///
/// Runs in time proportional to the presented length regardless of where the
/// first mismatch is. An empty configured secret never matches.
pub fn secret_matches(presented: Option<&str>, expected: &str) -> bool {
    let Some(presented) = presented else {
        return false;
    };
    if expected.is_empty() {
        return false;
    }
    let (a, b) = (presented.as_bytes(), expected.as_bytes());
    let mut diff = a.len() ^ b.len();
    for (i, byte) in a.iter().enumerate() {
        diff |= usize::from(byte ^ b.get(i % b.len()).copied().unwrap_or(0));
    }
    diff == 0
}
