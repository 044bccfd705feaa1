use memchr::memmem;

/// Number of line breaks in `text`, so a single line counts as zero.
#[inline]
pub fn lines_count(text: &str) -> u32 {
  let breaks = memmem::find_iter(text.as_bytes(), b"\n").count();
  u32::try_from(breaks).unwrap_or(u32::MAX)
}

#[test]
fn counts_line_breaks() {
  assert_eq!(lines_count("define(a);\ndefine(b);"), 1);
  assert_eq!(lines_count("a\nb\nc\n"), 3);
  assert_eq!(lines_count(""), 0);
}
