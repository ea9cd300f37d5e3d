use notepane_core::{FsNoteStore, NoteStore, StoreError};
use std::fs;
use tempfile::TempDir;

fn open_store() -> (TempDir, FsNoteStore) {
    let dir = TempDir::new().unwrap();
    let store = FsNoteStore::open(dir.path().join("notes")).unwrap();
    (dir, store)
}

#[test]
fn open_creates_missing_directory() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("nested").join("notes");
    let store = FsNoteStore::open(&root).unwrap();
    assert!(root.is_dir());
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn create_or_update_scenario_keeps_both_drafts() {
    let (_dir, mut store) = open_store();

    let first = store
        .create_or_update("draft", "draft\nbody", None)
        .unwrap();
    assert_eq!(first, "draft.txt");

    let second = store
        .create_or_update("draft", "draft\nother body", None)
        .unwrap();
    assert_eq!(second, "draft_1.txt");

    assert_eq!(store.read("draft.txt").unwrap(), "draft\nbody");
    assert_eq!(store.read("draft_1.txt").unwrap(), "draft\nother body");
    assert_eq!(store.list().unwrap(), vec!["draft.txt", "draft_1.txt"]);
}

#[test]
fn new_note_probes_suffixes_sequentially() {
    let (_dir, mut store) = open_store();
    for _ in 0..3 {
        store.create_or_update("x.txt", "x", None).unwrap();
    }
    assert_eq!(store.list().unwrap(), vec!["x.txt", "x_1.txt", "x_2.txt"]);
}

#[test]
fn update_with_changed_name_renames_existing_file() {
    let (_dir, mut store) = open_store();
    store.create_or_update("old", "old\nbody", None).unwrap();

    let name = store
        .create_or_update("new.txt", "new\nbody", Some("old.txt"))
        .unwrap();
    assert_eq!(name, "new.txt");
    assert_eq!(store.list().unwrap(), vec!["new.txt"]);
    assert_eq!(store.read("new.txt").unwrap(), "new\nbody");
}

#[test]
fn update_with_same_name_overwrites_in_place() {
    let (_dir, mut store) = open_store();
    store.create_or_update("a", "a\n1", None).unwrap();
    let name = store.create_or_update("a", "a\n2", Some("a.txt")).unwrap();
    assert_eq!(name, "a.txt");
    assert_eq!(store.read("a.txt").unwrap(), "a\n2");
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn update_onto_existing_name_collides_without_touching_files() {
    let (_dir, mut store) = open_store();
    store.create_or_update("a", "a\nkeep me", None).unwrap();
    store.create_or_update("b", "b\nand me", None).unwrap();

    let err = store
        .create_or_update("b.txt", "b\noverwrite attempt", Some("a.txt"))
        .unwrap_err();
    assert!(matches!(err, StoreError::NameCollision(ref name) if name == "b.txt"));
    assert_eq!(store.read("a.txt").unwrap(), "a\nkeep me");
    assert_eq!(store.read("b.txt").unwrap(), "b\nand me");
}

#[test]
fn rename_rejects_collision_and_missing_source() {
    let (_dir, mut store) = open_store();
    store.write("a.txt", "A").unwrap();
    store.write("b.txt", "B").unwrap();

    let err = store.rename("a.txt", "b.txt").unwrap_err();
    assert!(matches!(err, StoreError::NameCollision(_)));
    assert_eq!(store.read("a.txt").unwrap(), "A");
    assert_eq!(store.read("b.txt").unwrap(), "B");

    let err = store.rename("missing.txt", "c.txt").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));

    store.rename("a.txt", "c.txt").unwrap();
    assert_eq!(store.list().unwrap(), vec!["b.txt", "c.txt"]);
}

#[test]
fn delete_removes_file_and_reports_missing() {
    let (_dir, mut store) = open_store();
    store.write("a.txt", "A").unwrap();
    store.delete("a.txt").unwrap();
    assert!(store.list().unwrap().is_empty());

    let err = store.delete("a.txt").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn read_missing_note_is_not_found() {
    let (_dir, store) = open_store();
    let err = store.read("nope.txt").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn list_is_sorted_rereads_disk_and_skips_directories() {
    let (_dir, mut store) = open_store();
    store.write("b.txt", "b").unwrap();
    store.write("C.txt", "C").unwrap();
    store.write("a.txt", "a").unwrap();
    fs::create_dir(store.root().join("subdir")).unwrap();
    assert_eq!(store.list().unwrap(), vec!["C.txt", "a.txt", "b.txt"]);

    fs::write(store.root().join("external.txt"), "added outside").unwrap();
    assert!(store.list().unwrap().contains(&"external.txt".to_string()));
}

#[test]
fn write_recreates_deleted_directory() {
    let (_dir, mut store) = open_store();
    fs::remove_dir_all(store.root()).unwrap();
    assert!(store.list().unwrap().is_empty());
    let name = store.create_or_update("again", "again", None).unwrap();
    assert_eq!(name, "again.txt");
    assert!(store.root().join("again.txt").is_file());
}

#[test]
fn path_like_names_are_rejected() {
    let (_dir, mut store) = open_store();
    let err = store.write("../escape.txt", "x").unwrap_err();
    assert!(matches!(err, StoreError::InvalidName(_)));
    let err = store.rename("a.txt", "sub/b.txt").unwrap_err();
    assert!(matches!(err, StoreError::InvalidName(_)));
}

#[test]
fn listed_names_can_be_read_and_deleted() {
    let (_dir, mut store) = open_store();
    fs::write(store.root().join(" padded.txt"), "padded").unwrap();
    if cfg!(unix) {
        fs::write(store.root().join("back\\slash.txt"), "slash").unwrap();
    }

    let names = store.list().unwrap();
    for name in &names {
        store.read(name).unwrap();
    }
    assert!(names.contains(&" padded.txt".to_string()));
    assert_eq!(store.read(" padded.txt").unwrap(), "padded");

    for name in &names {
        store.delete(name).unwrap();
    }
    assert!(store.list().unwrap().is_empty());
    assert!(!store.root().join(" padded.txt").exists());
}

#[test]
fn locate_points_inside_root() {
    let (_dir, store) = open_store();
    let path = store.locate("a.txt").unwrap();
    assert_eq!(path, store.root().join("a.txt"));
    assert!(store.locate("../a.txt").is_none());
}
