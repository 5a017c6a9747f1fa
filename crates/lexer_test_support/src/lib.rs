pub mod fixtures;

use std::fmt::Write;

/// Equal lines kept around the differing block.
const CONTEXT: usize = 2;

/// Render the difference between two line lists as a single `-`/`+` hunk.
///
/// The common prefix and suffix are trimmed; whatever is left in between is
/// shown as removed (`expected`) and added (`actual`) lines, numbered by their
/// position in each list. Returns an empty string when the lists are equal.
pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    let prefix = expected
        .iter()
        .zip(actual)
        .take_while(|(left, right)| left == right)
        .count();
    if prefix == expected.len() && prefix == actual.len() {
        return String::new();
    }
    let suffix = expected[prefix..]
        .iter()
        .rev()
        .zip(actual[prefix..].iter().rev())
        .take_while(|(left, right)| left == right)
        .count();
    let removed = &expected[prefix..expected.len() - suffix];
    let added = &actual[prefix..actual.len() - suffix];

    let mut out = String::new();
    let _ = writeln!(
        out,
        "@@ -{},{} +{},{} @@",
        prefix + 1,
        removed.len(),
        prefix + 1,
        added.len()
    );
    for (idx, line) in expected
        .iter()
        .enumerate()
        .take(prefix)
        .skip(prefix.saturating_sub(CONTEXT))
    {
        let _ = writeln!(out, "  {:>4} {line}", idx + 1);
    }
    for (offset, line) in removed.iter().enumerate() {
        let _ = writeln!(out, "- {:>4} {line}", prefix + offset + 1);
    }
    for (offset, line) in added.iter().enumerate() {
        let _ = writeln!(out, "+ {:>4} {line}", prefix + offset + 1);
    }
    let tail = expected.len() - suffix;
    for (idx, line) in expected.iter().enumerate().skip(tail).take(CONTEXT) {
        let _ = writeln!(out, "  {:>4} {line}", idx + 1);
    }
    let _ = writeln!(
        out,
        "({} expected, {} actual)",
        expected.len(),
        actual.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::diff_lines;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn equal_lists_render_nothing() {
        let same = lines(&["LT", "GT"]);
        assert_eq!(diff_lines(&same, &same), "");
    }

    #[test]
    fn changed_line_is_shown_between_context() {
        let report = diff_lines(
            &lines(&["LT", "ID", "EQ", "GT", "LT", "SLASH"]),
            &lines(&["LT", "ID", "EQ", "TEXT", "LT", "SLASH"]),
        );
        assert_eq!(
            report,
            "@@ -4,1 +4,1 @@\n\
             \x20    2 ID\n\
             \x20    3 EQ\n\
             -    4 GT\n\
             +    4 TEXT\n\
             \x20    5 LT\n\
             \x20    6 SLASH\n\
             (6 expected, 6 actual)\n"
        );
    }

    #[test]
    fn dropped_token_shows_only_removal() {
        let report = diff_lines(&lines(&["LT", "GT", "TEXT"]), &lines(&["LT", "TEXT"]));
        assert!(report.starts_with("@@ -2,1 +2,0 @@\n"), "{report}");
        assert!(report.contains("-    2 GT\n"), "{report}");
        assert!(!report.lines().any(|line| line.starts_with('+')), "{report}");
        assert!(report.ends_with("(3 expected, 2 actual)\n"), "{report}");
    }

    #[test]
    fn missing_tail_is_a_removal_at_the_end() {
        let report = diff_lines(&lines(&["LT", "GT"]), &lines(&["LT"]));
        assert!(report.contains("     1 LT\n-    2 GT\n("), "{report}");
    }
}
