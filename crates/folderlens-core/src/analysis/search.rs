/// Name search over a scanned tree.
///
/// Three query modes, picked from the query text:
///
/// - `/pattern` is a case-insensitive regular expression,
/// - anything containing `*` or `?` is a case-insensitive glob,
/// - everything else is a case-insensitive substring match.
///
/// A pattern that fails to compile degrades to a substring match on the raw
/// query rather than an error. Both files and folders are searched; the size
/// and extension filters apply to files only.
use crate::model::size::format_size;
use crate::model::DirectoryTree;
use globset::{GlobBuilder, GlobMatcher};
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::path::PathBuf;

/// Results beyond this many are dropped after ranking.
pub const MAX_SEARCH_RESULTS: usize = 100;

/// A search request.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub text: String,
    /// Restrict files to these extensions (leading dot optional, any case).
    pub extensions: Vec<String>,
    pub min_size: Option<u64>,
    pub max_size: Option<u64>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// One ranked match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub is_folder: bool,
    pub score: f64,
}

impl SearchHit {
    pub fn size_display(&self) -> String {
        format_size(self.size)
    }
}

enum Matcher {
    Substring(String),
    Glob(GlobMatcher),
    Regex(Regex),
}

impl Matcher {
    fn compile(query: &str) -> Self {
        let substring = || Matcher::Substring(query.to_lowercase());

        if let Some(pattern) = query.strip_prefix('/').filter(|p| !p.is_empty()) {
            return match RegexBuilder::new(pattern).case_insensitive(true).build() {
                Ok(re) => Matcher::Regex(re),
                Err(err) => {
                    tracing::debug!("invalid regex {pattern:?}, using substring match: {err}");
                    substring()
                }
            };
        }
        if query.contains(&['*', '?'][..]) {
            return match GlobBuilder::new(query).case_insensitive(true).build() {
                Ok(glob) => Matcher::Glob(glob.compile_matcher()),
                Err(err) => {
                    tracing::debug!("invalid glob {query:?}, using substring match: {err}");
                    substring()
                }
            };
        }
        substring()
    }

    fn is_match(&self, name: &str) -> bool {
        match self {
            Self::Substring(needle) => name.to_lowercase().contains(needle.as_str()),
            Self::Glob(glob) => glob.is_match(name),
            Self::Regex(re) => re.is_match(name),
        }
    }
}

/// Rank a matching name: exact > prefix > word start > substring, plus a
/// bonus for short names.
pub fn match_score(name: &str, query: &str) -> f64 {
    let name_lower = name.to_lowercase();
    let query_lower = query.to_lowercase();

    let base = if name_lower == query_lower {
        1.0
    } else if name_lower.starts_with(&query_lower) {
        0.8
    } else if name_lower.contains(&format!(" {query_lower}"))
        || name_lower.contains(&format!("_{query_lower}"))
    {
        0.6
    } else if name_lower.contains(&query_lower) {
        0.4
    } else {
        0.0
    };

    let length = name.chars().count() as f64;
    base + ((50.0 - length) / 100.0).max(0.0)
}

/// Search file and folder names in `tree`.
///
/// Sorted by score descending, ties by path, capped at [`MAX_SEARCH_RESULTS`].
pub fn search(tree: &DirectoryTree, query: &SearchQuery) -> Vec<SearchHit> {
    if query.text.is_empty() {
        return Vec::new();
    }
    let matcher = Matcher::compile(&query.text);
    let wanted: Vec<String> = query
        .extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .collect();

    let mut hits = Vec::new();

    for file in tree.files() {
        if !wanted.is_empty() && !wanted.iter().any(|w| w == file.extension.as_str()) {
            continue;
        }
        if query.min_size.is_some_and(|min| file.size < min)
            || query.max_size.is_some_and(|max| file.size > max)
        {
            continue;
        }
        let name = file.name();
        if matcher.is_match(&name) {
            hits.push(SearchHit {
                score: match_score(&name, &query.text),
                name,
                path: file.path.clone(),
                size: file.size,
                is_folder: false,
            });
        }
    }

    for dir in &tree.nodes {
        if matcher.is_match(&dir.name) {
            hits.push(SearchHit {
                name: dir.name.to_string(),
                path: dir.path.clone(),
                size: dir.total_size,
                is_folder: true,
                score: match_score(&dir.name, &query.text),
            });
        }
    }

    hits.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.path.cmp(&b.path)));
    hits.truncate(MAX_SEARCH_RESULTS);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FileRecord;

    fn tree() -> DirectoryTree {
        let mut tree = DirectoryTree::new(PathBuf::from("/r"));
        let tests = tree.add_dir(tree.root, PathBuf::from("/r/tests"));
        for (dir, path, size) in [
            (tree.root, "/r/main.py", 100),
            (tree.root, "/r/Report_final.PDF", 5_000),
            (tests, "/r/tests/test_main.py", 40),
            (tests, "/r/tests/data.json", 900),
        ] {
            tree.add_file(dir, FileRecord::new(PathBuf::from(path), size, None));
        }
        tree.recompute_totals();
        tree
    }

    fn names(hits: &[SearchHit]) -> Vec<&str> {
        hits.iter().map(|h| h.name.as_str()).collect()
    }

    #[test]
    fn substring_is_case_insensitive_and_ranked() {
        let hits = search(&tree(), &SearchQuery::new("MAIN"));
        assert_eq!(names(&hits), vec!["main.py", "test_main.py"]);
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn glob_mode() {
        let hits = search(&tree(), &SearchQuery::new("*.PY"));
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.name.ends_with(".py")));
    }

    #[test]
    fn regex_mode() {
        let hits = search(&tree(), &SearchQuery::new("/^report_.*\\.pdf$"));
        assert_eq!(names(&hits), vec!["Report_final.PDF"]);
    }

    #[test]
    fn invalid_regex_falls_back_to_substring() {
        let hits = search(&tree(), &SearchQuery::new("/(unclosed"));
        assert!(hits.is_empty());
    }

    #[test]
    fn folders_are_searchable() {
        let hits = search(&tree(), &SearchQuery::new("tests"));
        assert_eq!(hits.len(), 1);
        assert!(hits[0].is_folder);
        assert_eq!(hits[0].size, 940);
    }

    #[test]
    fn filters_apply_to_files() {
        let query = SearchQuery {
            text: "*".into(),
            extensions: vec![".JSON".into(), "py".into()],
            min_size: Some(50),
            max_size: Some(1_000),
        };
        let hits = search(&tree(), &query);
        let files: Vec<&str> = hits.iter().filter(|h| !h.is_folder).map(|h| h.name.as_str()).collect();
        assert_eq!(files, vec!["main.py", "data.json"]);
    }

    #[test]
    fn empty_query_finds_nothing() {
        assert!(search(&tree(), &SearchQuery::new("")).is_empty());
    }

    #[test]
    fn score_tiers() {
        assert!(match_score("main", "main") > match_score("main.py", "main"));
        assert!(match_score("main.py", "main") > match_score("test_main.py", "main"));
        assert!(match_score("test_main.py", "main") > match_score("testmain.py", "main"));
    }
}
