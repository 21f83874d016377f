//! # Utility Functions Module
//!
//! Small helpers shared by the invoker and the orchestrator.

use std::ffi::{OsStr, OsString};

/// Builds an `OsString` from a flag prefix and a path-like value,
/// e.g. `-sOutputFile=` + `/out/a.tmp.pdf`.
pub fn flag_with_value(prefix: &str, value: impl AsRef<OsStr>) -> OsString {
    let mut flag = OsString::from(prefix);
    flag.push(value);
    flag
}

/// Trims whitespace and keeps at most `max_chars` characters.
pub fn truncate_diagnostic(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((cut, _)) => trimmed[..cut].to_string(),
        None => trimmed.to_string(),
    }
}

/// Macro for building an argument vector of `OsString`s.
///
/// ```rust
/// use pdf_compressor::os_args;
///
/// let args = os_args!["-dNOPAUSE", "-dQUIET"];
/// assert_eq!(args[1], "-dQUIET");
/// ```
#[macro_export]
macro_rules! os_args {
    [$($item:expr),* $(,)?] => {
        vec![$(::std::ffi::OsString::from($item)),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_flag_with_value() {
        let flag = flag_with_value("-sOutputFile=", Path::new("/out/x.tmp.pdf"));
        assert_eq!(flag, OsString::from("-sOutputFile=/out/x.tmp.pdf"));
    }

    #[test]
    fn test_truncate_diagnostic() {
        assert_eq!(truncate_diagnostic("  short  \n", 500), "short");
        assert_eq!(truncate_diagnostic("abcdef", 3), "abc");
        assert_eq!(truncate_diagnostic("èèèè", 2), "èè");
        assert_eq!(truncate_diagnostic("", 10), "");
    }

    #[test]
    fn test_os_args_macro() {
        let result = os_args!["-dBATCH", String::from("-dSAFER")];
        assert_eq!(result, vec![OsString::from("-dBATCH"), OsString::from("-dSAFER")]);
    }
}
