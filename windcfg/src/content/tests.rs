//! Unit tests for content pattern parsing.

use camino::Utf8Path;
use rstest::rstest;

use super::*;

#[rstest]
#[case("./rusic/**/*.{rs,html,css}", &["rusic/**/*.rs", "rusic/**/*.html", "rusic/**/*.css"])]
#[case("src//lib.rs", &["src/lib.rs"])]
#[case("./*.html", &["*.html"])]
#[case("{app,lib}/*.rs", &["app/*.rs", "lib/*.rs"])]
#[case("src/**", &["src/**"])]
fn normalises_expansions(#[case] raw: &str, #[case] expected: &[&str]) {
    let pattern = GlobPattern::parse(raw).expect("pattern parses");
    let expansions: Vec<String> = pattern.expansions().collect();
    assert_eq!(expansions, expected);
    assert_eq!(pattern.as_str(), raw);
}

#[rstest]
#[case("", PatternError::Empty)]
#[case("   ", PatternError::Empty)]
#[case("./", PatternError::Empty)]
#[case("/etc/**/*.rs", PatternError::Absolute)]
#[case("../shared/**/*.rs", PatternError::ParentSegment)]
#[case("src/**/*.{rs,html", PatternError::UnbalancedBrace { offset: 9 })]
#[case("src/a**/*.rs", PatternError::PartialRecursiveWildcard { segment: "a**".to_owned() })]
#[case("src/*.r?", PatternError::UnsupportedToken { token: '?', offset: 7 })]
#[case("src/[ab].rs", PatternError::UnsupportedToken { token: '[', offset: 4 })]
#[case("!src/*.rs", PatternError::UnsupportedToken { token: '!', offset: 0 })]
fn rejects_invalid_patterns(#[case] raw: &str, #[case] expected: PatternError) {
    assert_eq!(GlobPattern::parse(raw), Err(expected));
}

#[rstest]
#[case("dir/**/*.{rs,html}", "dir/a.rs", true)]
#[case("dir/**/*.{rs,html}", "dir/sub/b.html", true)]
#[case("dir/**/*.{rs,html}", "dir/c.txt", false)]
#[case("dir/**/*.{rs,html}", "other/a.rs", false)]
#[case("dir/*/*.rs", "dir/a.rs", false)]
#[case("dir/*/*.rs", "dir/x/a.rs", true)]
#[case("index.html", "index.html", true)]
#[case("index.html", "nested/index.html", false)]
#[case("./src/*.rs", "./src/main.rs", true)]
#[case("*.rs", ".rs", true)]
#[case("*.rs", "main.RS", false)]
#[case("*.rs", "main.rs.bak", false)]
#[case("mod*.rs", "module.rs", true)]
#[case("a*b*c", "axxbyyc", true)]
#[case("a*b*c", "acb", false)]
#[case("*", ".hidden", true)]
#[case("src/**", "src", false)]
#[case("src/**", "src/deep/file.txt", true)]
#[case("**/views/**/*.html", "a/views/b/c.html", true)]
#[case("**/views/**/*.html", "views/c.html", true)]
#[case("**/views/**/*.html", "a/b/c.html", false)]
fn matches_relative_paths(#[case] raw: &str, #[case] path: &str, #[case] expected: bool) {
    let pattern = GlobPattern::parse(raw).expect("pattern parses");
    assert_eq!(pattern.matches(Utf8Path::new(path)), expected);
}

#[test]
fn groups_share_prefix_walks() {
    let patterns: Vec<GlobPattern> = ["a/**/*.{rs,css}", "a/**/*.rs", "b/*.rs"]
        .into_iter()
        .map(|raw| GlobPattern::parse(raw).expect("pattern parses"))
        .collect();
    let groups = group_by_prefix(&patterns);
    assert_eq!(groups.len(), 2);
}

#[test]
fn strict_reports_pattern_errors() {
    let resolution = ContentResolution {
        pattern_errors: vec![Arc::new(WindError::invalid_pattern(
            "",
            PatternError::Empty,
        ))],
        ..ContentResolution::default()
    };
    let err = resolution.strict().expect_err("pattern error surfaces");
    assert!(matches!(*err, WindError::InvalidPattern { .. }));
}
