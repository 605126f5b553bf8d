//! Resolving content patterns against real directory trees.

use std::collections::BTreeSet;

use anyhow::{Result, anyhow, ensure};
use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use test_helpers::SourceTree;
use windcfg::{
    CancellationToken, ContentResolution, ContentResolver, ContentSpec, PatternError, WindError,
};

#[fixture]
fn project() -> SourceTree {
    let tree = SourceTree::new().expect("create source tree");
    tree.files([
        "rusic/app.rs",
        "rusic/components/button.rs",
        "rusic/components/button.html",
        "rusic/styles/site.css",
        "rusic/notes.md",
        "pages/index.html",
        "pages/blog/post.html",
        "pages/blog/post.rs",
        "README.md",
    ])
    .expect("populate source tree");
    tree
}

fn resolve(tree: &SourceTree, patterns: &[&str]) -> Result<ContentResolution> {
    ContentResolver::new(tree.root())
        .resolve(&ContentSpec::new(patterns.iter().copied()))
        .map_err(|err| anyhow!(err.to_string()))
}

fn paths(tree: &SourceTree, relatives: &[&str]) -> BTreeSet<Utf8PathBuf> {
    relatives.iter().map(|relative| tree.path(relative)).collect()
}

#[rstest]
fn expands_extension_lists(project: SourceTree) -> Result<()> {
    let resolution = resolve(&project, &["./rusic/**/*.{rs,html,css}"])?;
    ensure!(
        resolution.files
            == paths(
                &project,
                &[
                    "rusic/app.rs",
                    "rusic/components/button.rs",
                    "rusic/components/button.html",
                    "rusic/styles/site.css",
                ]
            )
    );
    ensure!(resolution.warnings.is_empty());
    ensure!(resolution.pattern_errors.is_empty());
    Ok(())
}

#[rstest]
fn missing_prefix_contributes_nothing(project: SourceTree) -> Result<()> {
    let resolution = resolve(&project, &["./does-not-exist/**/*.rs", "./pages/*.html"])?;
    ensure!(resolution.files == paths(&project, &["pages/index.html"]));
    ensure!(resolution.warnings.is_empty());
    Ok(())
}

#[rstest]
fn prefix_naming_a_file_contributes_nothing(project: SourceTree) -> Result<()> {
    let resolution = resolve(&project, &["./README.md/**/*.rs"])?;
    ensure!(resolution.files.is_empty());
    Ok(())
}

#[rstest]
fn resolution_is_idempotent(project: SourceTree) -> Result<()> {
    let patterns = ["./rusic/**/*.{rs,html,css}", "./pages/**/*.rs"];
    let first = resolve(&project, &patterns)?;
    let second = resolve(&project, &patterns)?;
    ensure!(first.files == second.files);
    Ok(())
}

#[rstest]
fn union_is_commutative(project: SourceTree) -> Result<()> {
    let a = "./rusic/**/*.rs";
    let b = "./pages/**/*.{html,rs}";
    let forward = resolve(&project, &[a, b])?;
    let backward = resolve(&project, &[b, a])?;
    ensure!(forward.files == backward.files);

    let mut union = resolve(&project, &[a])?.files;
    union.extend(resolve(&project, &[b])?.files);
    ensure!(forward.files == union);
    Ok(())
}

#[rstest]
fn overlapping_patterns_yield_each_file_once(project: SourceTree) -> Result<()> {
    let resolution = resolve(
        &project,
        &["./pages/**/*.html", "./pages/**/*.html", "pages/**/*.{html,html}", "./**/post.html"],
    )?;
    ensure!(resolution.files == paths(&project, &["pages/index.html", "pages/blog/post.html"]));
    Ok(())
}

#[rstest]
#[case::single_segment("./pages/*.html", &["pages/index.html"])]
#[case::fixed_depth("./pages/*/*.html", &["pages/blog/post.html"])]
#[case::recursive_tail("./pages/**", &["pages/index.html", "pages/blog/post.html", "pages/blog/post.rs"])]
#[case::root_wildcard("./*.md", &["README.md"])]
#[case::literal_file("./rusic/app.rs", &["rusic/app.rs"])]
#[case::named_anywhere("./**/button.*", &["rusic/components/button.rs", "rusic/components/button.html"])]
fn matches_pattern_shapes(
    project: SourceTree,
    #[case] pattern: &str,
    #[case] expected: &[&str],
) -> Result<()> {
    let resolution = resolve(&project, &[pattern])?;
    ensure!(
        resolution.files == paths(&project, expected),
        "{pattern} resolved to {:?}",
        resolution.files
    );
    Ok(())
}

#[rstest]
fn invalid_patterns_do_not_block_siblings(project: SourceTree) -> Result<()> {
    let resolution = resolve(&project, &["./pages/*.{html", "./rusic/*.rs", "/abs/**/*.rs"])?;
    ensure!(resolution.files == paths(&project, &["rusic/app.rs"]));
    ensure!(resolution.pattern_errors.len() == 2);
    let first = resolution
        .pattern_errors
        .first()
        .ok_or_else(|| anyhow!("missing pattern error"))?;
    match &**first {
        WindError::InvalidPattern { pattern, reason } => {
            ensure!(pattern == "./pages/*.{html");
            ensure!(matches!(reason, PatternError::UnbalancedBrace { .. }));
        }
        other => return Err(anyhow!("expected InvalidPattern, got {other:?}")),
    }
    let err = resolution.strict().expect_err("strict surfaces pattern errors");
    ensure!(matches!(&*err, WindError::Aggregate(errors) if errors.len() == 2));
    Ok(())
}

#[rstest]
fn empty_spec_resolves_to_nothing(project: SourceTree) -> Result<()> {
    let resolution = resolve(&project, &[])?;
    ensure!(resolution.files.is_empty());
    Ok(())
}

#[rstest]
fn cancelled_resolution_returns_no_files(project: SourceTree) {
    let token = CancellationToken::new();
    token.cancel();
    let err = ContentResolver::new(project.root())
        .with_cancellation(token)
        .resolve(&ContentSpec::new(["./**/*.rs"]))
        .expect_err("cancelled");
    assert!(err.is_cancelled());
}

#[test]
fn missing_root_is_an_error() {
    let tree = SourceTree::new().expect("create source tree");
    let missing = tree.path("absent");
    let err = ContentResolver::new(missing.clone())
        .resolve(&ContentSpec::new(["./**/*.rs"]))
        .expect_err("root must exist");
    assert!(matches!(&*err, WindError::File { path, .. } if path == missing.as_std_path()));
}

#[cfg(unix)]
#[rstest]
fn symlinked_files_are_reported_under_the_link(project: SourceTree) -> Result<()> {
    std::os::unix::fs::symlink("blog/post.rs", project.path("pages/linked.rs"))?;
    std::os::unix::fs::symlink("blog", project.path("pages/blog-link"))?;
    let resolution = resolve(&project, &["./pages/**/*.rs"])?;
    ensure!(resolution.files == paths(&project, &["pages/blog/post.rs", "pages/linked.rs"]));
    ensure!(resolution.warnings.is_empty());
    Ok(())
}

#[cfg(unix)]
#[rstest]
fn unreadable_subtrees_become_warnings(project: SourceTree) -> Result<()> {
    use std::os::unix::fs::PermissionsExt as _;

    let locked = project.dir("rusic/locked")?;
    project.file("rusic/locked/hidden.rs", "")?;
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000))?;
    let readable_anyway = std::fs::read_dir(&locked).is_ok();
    let outcome = resolve(&project, &["./rusic/**/*.rs"]);
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755))?;
    if readable_anyway {
        // Privileged users bypass directory permissions.
        return Ok(());
    }

    let resolution = outcome?;
    ensure!(
        resolution.files
            == paths(&project, &["rusic/app.rs", "rusic/components/button.rs"])
    );
    let warning = resolution
        .warnings
        .first()
        .ok_or_else(|| anyhow!("expected a warning"))?;
    ensure!(warning.path == locked);
    ensure!(warning.kind == windcfg::WarningKind::PermissionDenied);
    Ok(())
}

#[cfg(unix)]
#[rstest]
fn symlinks_into_sibling_directories_are_followed(project: SourceTree) -> Result<()> {
    std::os::unix::fs::symlink("../rusic/app.rs", project.path("pages/shared.rs"))?;
    let resolution = resolve(&project, &["./pages/*.rs"])?;
    ensure!(resolution.files == paths(&project, &["pages/shared.rs"]));
    ensure!(resolution.warnings.is_empty());
    Ok(())
}

#[cfg(unix)]
#[rstest]
fn symlinks_leaving_the_root_become_warnings(project: SourceTree) -> Result<()> {
    let outside = tempfile::NamedTempFile::new()?;
    let absolute = project.path("rusic/escape.rs");
    std::os::unix::fs::symlink(outside.path(), &absolute)?;
    std::os::unix::fs::symlink("../../outside.rs", project.path("rusic/climb.rs"))?;

    let resolution = resolve(&project, &["./rusic/*.rs"])?;
    ensure!(resolution.files == paths(&project, &["rusic/app.rs"]));
    let mut warned: Vec<_> = resolution
        .warnings
        .iter()
        .map(|warning| (warning.path.clone(), warning.kind.clone()))
        .collect();
    warned.sort_by(|left, right| left.0.cmp(&right.0));
    ensure!(
        warned
            == vec![
                (project.path("rusic/climb.rs"), windcfg::WarningKind::EscapesRoot),
                (absolute, windcfg::WarningKind::EscapesRoot),
            ],
        "unexpected warnings: {warned:?}"
    );
    Ok(())
}

#[cfg(unix)]
#[rstest]
fn non_utf8_names_are_reported_with_a_lossy_path(project: SourceTree) -> Result<()> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt as _;

    let raw = project.root().as_std_path().join("rusic").join(OsStr::from_bytes(b"bad\xff.rs"));
    if std::fs::write(&raw, "").is_err() {
        // Some filesystems only accept UTF-8 names.
        return Ok(());
    }

    let resolution = resolve(&project, &["./rusic/*.rs"])?;
    ensure!(resolution.files == paths(&project, &["rusic/app.rs"]));
    let warning = resolution
        .warnings
        .first()
        .ok_or_else(|| anyhow!("expected a warning"))?;
    ensure!(warning.kind == windcfg::WarningKind::NonUtf8Name);
    ensure!(warning.path == project.path("rusic/bad\u{fffd}.rs"), "got {}", warning.path);
    ensure!(resolution.warnings.len() == 1);
    Ok(())
}
