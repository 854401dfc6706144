use std::sync::LazyLock;
use regex::Regex;

/// The literal prefix of a remote include directive.
pub const INCLUDE_PREFIX: &str = "#include <gist/github/";

static INCLUDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{}([^>]+)>", regex::escape(INCLUDE_PREFIX)))
        .expect("include pattern is a valid regex")
});

/// Returns the gist identifier referenced by a single line, if any.
///
/// The line is trimmed first. Only the angle-bracket form
/// `#include <gist/github/NAME>` counts; quoted local includes and lines
/// missing the closing `>` are ignored.
pub fn extract_from_line(line: &str) -> Option<&str> {
    INCLUDE_RE
        .captures(line.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extracts every gist identifier referenced in `text`, in line order.
///
/// Duplicates are kept; the scanner de-duplicates across the whole tree.
pub fn extract_references(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(extract_from_line)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_include() {
        let refs = extract_references("#include <gist/github/foo.h>\n");
        assert_eq!(refs, vec!["foo.h"]);
    }

    #[test]
    fn test_local_include_is_ignored() {
        assert!(extract_references("#include \"foo.h\"").is_empty());
        assert!(extract_references("#include <foo.h>").is_empty());
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let refs = extract_references("   \t#include <gist/github/bar.hpp>   \r\n");
        assert_eq!(refs, vec!["bar.hpp"]);
    }

    #[test]
    fn test_trailing_comment_after_terminator() {
        assert_eq!(
            extract_from_line("#include <gist/github/util.h> // helpers"),
            Some("util.h")
        );
    }

    #[test]
    fn test_unterminated_or_empty_include() {
        assert_eq!(extract_from_line("#include <gist/github/oops.h"), None);
        assert_eq!(extract_from_line("#include <gist/github/>"), None);
    }

    #[test]
    fn test_commented_out_include_does_not_match() {
        assert_eq!(extract_from_line("// #include <gist/github/foo.h>"), None);
    }

    #[test]
    fn test_duplicates_within_file_are_kept() {
        let text = "#include <gist/github/a.h>\nint x;\n#include <gist/github/a.h>\n#include <gist/github/b.h>";
        assert_eq!(extract_references(text), vec!["a.h", "a.h", "b.h"]);
    }
}
