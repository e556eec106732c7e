use blake3::Hasher;

/// Hex-encoded blake3 hash of a manifest's contents.
///
/// Editors and `notify` frequently report several events for one save; the
/// directory source compares hashes to report each real change only once.
pub fn content_hash(contents: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(contents);
    hasher.finalize().to_hex().to_string()
}
