use std::path::Path;

use crate::config::SortOptions;

const ARTICLES: [&str; 3] = ["the ", "an ", "a "];

/// Derives the ordering key for an image file.
///
/// The key is the file name without directory components or extension. With
/// `include_articles` off, one leading "a ", "an " or "the " (any case) is removed;
/// with `case_sensitive` off, the remainder is lower-cased. Keys compare by code point.
pub fn sort_key(path: &Path, opts: SortOptions) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let mut name: &str = &stem;
    if !opts.include_articles {
        name = strip_article(name);
    }
    if opts.case_sensitive {
        name.to_string()
    } else {
        name.to_lowercase()
    }
}

fn strip_article(name: &str) -> &str {
    for article in ARTICLES {
        if name
            .get(..article.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(article))
        {
            return &name[article.len()..];
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(case_sensitive: bool, include_articles: bool) -> SortOptions {
        SortOptions {
            case_sensitive,
            include_articles,
        }
    }

    #[test]
    fn strips_directory_and_extension() {
        let key = sort_key(Path::new("some/dir/Zebra.png"), opts(true, true));
        assert_eq!(key, "Zebra");
        let key = sort_key(Path::new("archive.tar.jpg"), opts(true, true));
        assert_eq!(key, "archive.tar");
    }

    #[test]
    fn case_folding_and_articles() {
        let p = Path::new("The Great Escape.jpg");
        assert_eq!(sort_key(p, opts(true, true)), "The Great Escape");
        assert_eq!(sort_key(p, opts(false, true)), "the great escape");
        assert_eq!(sort_key(p, opts(true, false)), "Great Escape");
        assert_eq!(sort_key(p, opts(false, false)), "great escape");
        assert_eq!(sort_key(Path::new("Alpha.png"), opts(false, false)), "alpha");
    }

    #[test]
    fn strips_only_one_leading_article_followed_by_space() {
        let o = opts(true, false);
        assert_eq!(sort_key(Path::new("A An Apple.png"), o), "An Apple");
        assert_eq!(sort_key(Path::new("AN owl.png"), o), "owl");
        assert_eq!(sort_key(Path::new("tHe end.png"), o), "end");
        assert_eq!(sort_key(Path::new("Anchor.png"), o), "Anchor");
        assert_eq!(sort_key(Path::new("Theory.png"), o), "Theory");
        assert_eq!(sort_key(Path::new("a.png"), o), "a");
    }

    #[test]
    fn case_sensitive_keys_order_uppercase_first() {
        let zebra = sort_key(Path::new("Zebra.png"), opts(true, true));
        let apple = sort_key(Path::new("apple.jpg"), opts(true, true));
        assert!(zebra < apple);
    }

    #[test]
    fn non_ascii_names_do_not_panic() {
        let o = opts(false, false);
        assert_eq!(sort_key(Path::new("é.png"), o), "é");
        assert_eq!(sort_key(Path::new("Ünïcode name.png"), o), "ünïcode name");
    }
}
