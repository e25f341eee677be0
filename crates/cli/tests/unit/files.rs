//! # File Resolution Tests
//!
//! Single-file expansion of directories and project-mode collection around the
//! main file.

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rars_cli::files::resolve;
use tempfile::TempDir;

struct Tree {
    dir: TempDir,
}

impl Tree {
    /// `a.s`, `b.s`, `c.asm`, `notes.txt` and `sub/d.s`.
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.s", "b.s", "c.asm", "notes.txt"] {
            fs::write(dir.path().join(name), "nop\n").unwrap();
        }
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("d.s"), "nop\n").unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn arg(&self, name: &str) -> String {
        self.path(name).to_string_lossy().into_owned()
    }
}

#[test]
fn no_files_resolve_to_nothing() {
    assert!(resolve::<&str>(&[], false).unwrap().is_empty());
    assert!(resolve::<&str>(&[], true).unwrap().is_empty());
}

#[test]
fn files_keep_command_line_order() {
    let tree = Tree::new();
    let files = resolve(&[tree.arg("b.s"), tree.arg("a.s")], false).unwrap();
    assert_eq!(files, vec![tree.path("b.s"), tree.path("a.s")]);
}

#[test]
fn directory_expands_to_sorted_sources() {
    let tree = Tree::new();
    let files = resolve(&[tree.dir.path().to_string_lossy().into_owned()], false).unwrap();
    assert_eq!(files, vec![tree.path("a.s"), tree.path("b.s"), tree.path("c.asm")]);
}

#[test]
fn repeated_files_are_assembled_once() {
    let tree = Tree::new();
    let directory = tree.dir.path().join(".").to_string_lossy().into_owned();
    let files = resolve(&[tree.arg("b.s"), tree.arg("b.s"), directory], false).unwrap();
    assert_eq!(files, vec![tree.path("b.s"), tree.path("a.s"), tree.path("c.asm")]);
}

#[test]
fn project_mode_puts_main_first() {
    let tree = Tree::new();
    let files = resolve(&[tree.arg("b.s"), tree.arg("a.s")], true).unwrap();
    assert_eq!(files, vec![tree.path("b.s"), tree.path("a.s"), tree.path("c.asm")]);
}

#[test]
fn project_mode_appends_outside_files() {
    let tree = Tree::new();
    let files = resolve(&[tree.arg("a.s"), tree.arg("sub/d.s")], true).unwrap();
    assert_eq!(
        files,
        vec![tree.path("a.s"), tree.path("b.s"), tree.path("c.asm"), tree.path("sub/d.s")]
    );
}

#[test]
fn project_mode_without_directory_fails() {
    assert!(resolve(&["/definitely/not/here/main.s"], true).is_err());
}

#[test]
fn missing_file_passes_through() {
    let tree = Tree::new();
    let files = resolve(&[tree.arg("gone.s")], false).unwrap();
    assert_eq!(files, vec![tree.path("gone.s")]);
}
