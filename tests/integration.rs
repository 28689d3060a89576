use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use ugit::checkout::CheckoutTarget;
use ugit::commit::CommitOutcome;
use ugit::hash::hash_to_hex;
use ugit::refs::HeadState;
use ugit::repository::Repository;
use ugit::store::{FileStore, ObjectStore};
use ugit::{add, branch, checkout, commit, log, status};

fn setup() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path().to_path_buf();
    Repository::init(&root).unwrap();
    (dir, root)
}

fn open(root: &Path) -> Repository {
    Repository::open(root).unwrap()
}

fn write_file(root: &Path, rel: &str, content: &[u8]) {
    let abs = root.join(rel);
    if let Some(parent) = abs.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&abs, content).unwrap();
}

fn stage_all(root: &Path) -> FileStore {
    let repo = open(root);
    let mut store = repo.object_store().unwrap();
    add::add(&repo, &mut store, &[root.to_path_buf()]).unwrap();
    store
}

fn commit_with(root: &Path, store: &mut impl ObjectStore, message: &str) -> ugit::hash::Hash {
    let repo = open(root);
    match commit::commit(&repo, store, message, Some("Test Author <test@example.com>")).unwrap() {
        CommitOutcome::Committed { hash } => hash,
        CommitOutcome::NothingToCommit => panic!("expected a commit for {message:?}"),
    }
}

#[test]
fn init_creates_unborn_main_with_empty_object_store() {
    let (_dir, root) = setup();
    assert_eq!(
        fs::read_to_string(root.join(".ugit/HEAD")).unwrap().trim(),
        "ref: refs/heads/main"
    );
    assert!(!root.join(".ugit/refs/heads/main").exists());
    assert_eq!(fs::read_dir(root.join(".ugit/objects")).unwrap().count(), 0);
}

#[test]
fn add_hashes_known_blob_exactly() {
    let (_dir, root) = setup();
    write_file(&root, "a.txt", b"hello");
    let repo = open(&root);
    let mut store = repo.object_store().unwrap();
    let report = add::add(&repo, &mut store, &[root.join("a.txt")]).unwrap();
    assert_eq!(report.staged.len(), 1);
    assert_eq!(
        hash_to_hex(&report.staged[0].hash),
        "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed"
    );
}

#[test]
fn commit_advances_main_and_log_shows_it() {
    let (_dir, root) = setup();
    write_file(&root, "a.txt", b"hello");
    let mut store = stage_all(&root);
    let hash = commit_with(&root, &mut store, "first");

    let repo = open(&root);
    assert_eq!(repo.resolve_head().unwrap(), Some(hash));

    let entries = log::log(&repo, &store, None).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "first");
}

#[test]
fn status_walks_through_the_spec_scenario() {
    let (_dir, root) = setup();
    write_file(&root, "a.txt", b"hello");
    let mut store = stage_all(&root);
    commit_with(&root, &mut store, "first");

    let repo = open(&root);
    assert!(status::status(&repo, &store).unwrap().is_clean());

    // overwrite a.txt -> unstaged modified, marker M
    write_file(&root, "a.txt", b"world");
    let report = status::status(&repo, &store).unwrap();
    assert_eq!(report.unstaged_modified, vec!["a.txt".to_string()]);

    // add a.txt -> staged modified, marker M
    let _ = stage_all(&root);
    let report = status::status(&repo, &store).unwrap();
    assert_eq!(report.staged.len(), 1);
    assert_eq!(report.staged[0].path, "a.txt");
    assert_eq!(report.staged[0].marker, 'M');

    // untracked b.txt
    write_file(&root, "b.txt", b"new");
    let report = status::status(&repo, &store).unwrap();
    assert_eq!(report.untracked, vec!["b.txt".to_string()]);

    // delete a.txt from disk -> deleted, marker D
    fs::remove_file(root.join("a.txt")).unwrap();
    let report = status::status(&repo, &store).unwrap();
    assert_eq!(report.deleted, vec!["a.txt".to_string()]);
}

#[test]
fn checkout_round_trip_reproduces_commit_hash() {
    let (_dir, root) = setup();
    write_file(&root, "src/main.rs", b"fn main() {}");
    write_file(&root, "README.md", b"# hello");
    let mut store = stage_all(&root);
    let original = commit_with(&root, &mut store, "initial");

    // materialize into a clean directory
    let (_dir2, root2) = setup();
    let repo2 = open(&root2);
    checkout::checkout_commit(&repo2, &store, original).unwrap();

    assert_eq!(fs::read(root2.join("src/main.rs")).unwrap(), b"fn main() {}");
    assert_eq!(fs::read(root2.join("README.md")).unwrap(), b"# hello");

    // re-add the same paths and commit with the same author/timestamp/message
    let repo2 = open(&root2);
    let mut store2 = repo2.object_store().unwrap();
    add::add(&repo2, &mut store2, &[root2.to_path_buf()]).unwrap();
    let mut index = ugit::index::Index::load(&repo2.index_path()).unwrap();
    index.write(&repo2.index_path()).unwrap();

    let original_commit = ugit::store::read_object(&store, &original)
        .unwrap()
        .into_commit()
        .unwrap();

    let reproduced = commit::commit_at(
        &repo2,
        &mut store2,
        &original_commit.message,
        &original_commit.author,
        &original_commit.timestamp,
    )
    .unwrap();

    assert_eq!(reproduced, original);
}

#[test]
fn checkout_switches_between_branches_and_updates_head() {
    let (_dir, root) = setup();
    write_file(&root, "a.txt", b"main content");
    let mut store = stage_all(&root);
    let main_commit = commit_with(&root, &mut store, "on main");

    let repo = open(&root);
    branch::create(&repo, "feature", main_commit).unwrap();
    checkout::checkout(&repo, &store, CheckoutTarget::Branch("feature")).unwrap();
    assert_eq!(repo.read_head().unwrap(), HeadState::Symbolic("feature".to_string()));

    write_file(&root, "a.txt", b"feature content");
    let mut store = stage_all(&root);
    commit_with(&root, &mut store, "on feature");

    let repo = open(&root);
    checkout::checkout(&repo, &store, CheckoutTarget::Branch("main")).unwrap();
    assert_eq!(fs::read(root.join("a.txt")).unwrap(), b"main content");

    checkout::checkout(&repo, &store, CheckoutTarget::Commit(main_commit)).unwrap();
    assert_eq!(repo.read_head().unwrap(), HeadState::Detached(main_commit));
}

#[test]
fn full_dev_workflow() {
    let (_dir, root) = setup();

    write_file(&root, "src/main.rs", b"fn main() {}");
    write_file(&root, "README.md", b"# project");
    let mut store = stage_all(&root);
    commit_with(&root, &mut store, "initial commit");

    let repo = open(&root);
    let head = repo.resolve_head().unwrap().unwrap();
    branch::create(&repo, "feature", head).unwrap();
    checkout::checkout(&repo, &store, CheckoutTarget::Branch("feature")).unwrap();

    write_file(&root, "src/feature.rs", b"pub fn feature() {}");
    let mut store = stage_all(&root);
    commit_with(&root, &mut store, "add feature");

    let repo = open(&root);
    checkout::checkout(&repo, &store, CheckoutTarget::Branch("main")).unwrap();
    assert!(!root.join("src/feature.rs").exists());

    // checkout never touches the index, so it still holds the "feature"
    // branch's staged src/feature.rs entry even though main's tree doesn't
    // have it and the file was just deleted from disk: it shows up as both
    // staged (added relative to HEAD) and deleted (missing on disk).
    let repo = open(&root);
    let report = status::status(&repo, &store).unwrap();
    assert_eq!(
        report.staged,
        vec![ugit::status::StatusEntry {
            path: "src/feature.rs".to_string(),
            marker: 'A',
        }]
    );
    assert_eq!(report.deleted, vec!["src/feature.rs".to_string()]);
    assert!(report.unstaged_modified.is_empty());
    assert!(report.untracked.is_empty());

    let branches = branch::list(&repo).unwrap();
    let names: Vec<_> = branches.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["feature", "main"]);
}
