//! Small utility helpers used across modules.

/// True if unicode char belongs to the Arabic-script ranges used by Urdu.
/// Covers the base block, the supplements, and the presentation forms that
/// show up in copy-pasted bank content.
pub fn is_arabic_script(ch: char) -> bool {
  (ch >= '\u{0600}' && ch <= '\u{06FF}')
    || (ch >= '\u{0750}' && ch <= '\u{077F}')
    || (ch >= '\u{08A0}' && ch <= '\u{08FF}')
    || (ch >= '\u{FB50}' && ch <= '\u{FDFF}')
    || (ch >= '\u{FE70}' && ch <= '\u{FEFF}')
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
#[allow(dead_code)]
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_string()
  } else {
    let prefix: String = s.chars().take(max).collect();
    format!("{}… ({} bytes total)", prefix, s.len())
  }
}
