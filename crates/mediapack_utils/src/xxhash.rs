use xxhash_rust::xxh3::xxh3_128;

/// Lowercase hex of the xxh3-128 digest of `input`, cut to `len` characters.
pub fn xxhash_hex(input: &[u8], len: usize) -> String {
  let mut hex = format!("{:032x}", xxh3_128(input));
  hex.truncate(len);
  hex
}

#[test]
fn test_xxhash_hex() {
  assert_eq!(xxhash_hex(b"hello", 32).len(), 32);
  assert_eq!(xxhash_hex(b"hello", 8), xxhash_hex(b"hello", 8));
  assert_ne!(xxhash_hex(b"hello", 8), xxhash_hex(b"world", 8));
  assert_eq!(xxhash_hex(b"hello", 8).len(), 8);
}
