//! Filename search with simple wildcards.

use crate::reports::error::ReportResult;
use regex::Regex;

/// Turn `*` and `%` into `(.*)`; a `*` that already follows `.` is left as regex.
fn expand_wildcards(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut prev = None;
    for c in pattern.chars() {
        match c {
            '*' if prev != Some('.') => out.push_str("(.*)"),
            '%' => out.push_str("(.*)"),
            _ => out.push(c),
        }
        prev = Some(c);
    }
    out
}

/// First match of `pattern` in `candidates`, trimmed. The matched text is
/// returned, which is the whole candidate only when the pattern spans it.
///
/// ```
/// use rxfer_reports::reports::find_pattern;
/// let names = ["nominativeList_03_2023.csv", "nominativeList_04_2023.csv"];
/// let hit = find_pattern("nominativeList_*_2023.csv", &names).unwrap();
/// assert_eq!(hit.as_deref(), Some("nominativeList_03_2023.csv"));
/// ```
pub fn find_pattern<S: AsRef<str>>(pattern: &str, candidates: &[S]) -> ReportResult<Option<String>> {
    let re = Regex::new(&expand_wildcards(pattern))?;
    Ok(candidates
        .iter()
        .find_map(|c| re.find(c.as_ref()).map(|m| m.as_str().trim().to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcards_expand() {
        assert_eq!(expand_wildcards("a*b%c"), "a(.*)b(.*)c");
        assert_eq!(expand_wildcards("a_(.*)_b"), "a_(.*)_b");
    }

    #[test]
    fn test_first_match_wins() {
        let names = vec!["report_05_2023.csv", "report_06_2023.csv"];
        assert_eq!(
            find_pattern("report_%_2023.csv", &names).unwrap().as_deref(),
            Some("report_05_2023.csv")
        );
        assert_eq!(
            find_pattern("report_(.*)_2023.csv", &names).unwrap().as_deref(),
            Some("report_05_2023.csv")
        );
    }

    #[test]
    fn test_no_match_is_none() {
        let names = vec!["a.csv".to_string()];
        assert_eq!(find_pattern("b*.csv", &names).unwrap(), None);
        let empty: Vec<String> = Vec::new();
        assert_eq!(find_pattern("*", &empty).unwrap(), None);
    }

    #[test]
    fn test_match_is_trimmed() {
        let names = vec!["  padded.csv  "];
        assert_eq!(find_pattern("*padded.csv*", &names).unwrap().as_deref(), Some("padded.csv"));
    }

    #[test]
    fn test_invalid_regex_is_an_error() {
        assert!(find_pattern("report_(", &["report_"]).is_err());
    }
}
