use super::*;
use tempfile::TempDir;

const START: &str = "<!-- TIPS:START -->";
const END: &str = "<!-- TIPS:END -->";

#[test]
fn test_whole_file_created_then_skipped() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("Dockerfile");

    assert_eq!(write_whole_file(&path, "FROM alpine\n", false).unwrap(), ArtifactOutcome::Created);

    fs::write(&path, "FROM user-edited\n").unwrap();
    assert_eq!(write_whole_file(&path, "FROM alpine\n", false).unwrap(), ArtifactOutcome::Skipped);
    assert_eq!(fs::read_to_string(&path).unwrap(), "FROM user-edited\n");
}

#[test]
fn test_whole_file_force_overwrites() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("docker-compose.yaml");
    fs::write(&path, "services: {}\n").unwrap();

    assert_eq!(write_whole_file(&path, "services:\n  app: {}", true).unwrap(), ArtifactOutcome::Updated);
    assert_eq!(fs::read_to_string(&path).unwrap(), "services:\n  app: {}\n");

}

#[test]
fn test_whole_file_force_rewrites_identical_content() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join(".deploy.env.test");

    assert_eq!(write_whole_file(&path, "A=1\n", true).unwrap(), ArtifactOutcome::Created);
    assert_eq!(write_whole_file(&path, "A=1\n\n", true).unwrap(), ArtifactOutcome::Updated);
    assert_eq!(fs::read_to_string(&path).unwrap(), "A=1\n");
}

#[test]
fn test_marked_block_created_updated_unchanged() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("AGENTS.md");
    fs::write(&path, "# Agents\n\nHand-written notes.\n").unwrap();

    let block = format!("{START}\n- tip\n{END}");
    assert_eq!(write_marked_block(&path, START, END, &block).unwrap(), ArtifactOutcome::Updated);
    assert_eq!(write_marked_block(&path, START, END, &block).unwrap(), ArtifactOutcome::Unchanged);

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("# Agents\n\nHand-written notes.\n"));
    assert!(content.ends_with(&format!("{END}\n")));
}

#[test]
fn test_marked_block_on_missing_file_creates_it() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("Makefile");

    let strategy = WriteStrategy::MarkedBlock { start: START, end: END };
    let block = format!("{START}\nX ?= 1\n{END}\n");
    assert_eq!(write_artifact(&path, &strategy, &block).unwrap(), ArtifactOutcome::Created);
    assert_eq!(fs::read_to_string(&path).unwrap(), block);
}

#[test]
fn test_unreadable_path_is_io_error_naming_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let err = write_whole_file(temp_dir.path(), "x", true).unwrap_err();
    match err {
        Error::Io { path, .. } => assert_eq!(path, temp_dir.path().display().to_string()),
        other => panic!("Expected Io error, got {other:?}"),
    }
}

#[test]
fn test_outcome_display() {
    assert_eq!(ArtifactOutcome::Unchanged.to_string(), "unchanged");
}
