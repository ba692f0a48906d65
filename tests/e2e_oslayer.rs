// osfab - tests/e2e_oslayer.rs
//
// End-to-end tests for the OS layer contract.
//
// These tests exercise the real filesystem and the real heap through the
// public API, the way the interpreter core calls it: no mocks, no stubs.

use osfab::os::{
    self, FileMode, FileTypeHint, HostOs, MemBlock, OpenMode, OsLayer, SeekOrigin,
};
use osfab::util::constants;
use osfab::util::error::OsFailure;
use std::cmp::Ordering;
use std::fs;
use std::path::PathBuf;

// =============================================================================
// Helpers
// =============================================================================

fn scratch() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().to_path_buf();
    (dir, path)
}

// =============================================================================
// File I/O
// =============================================================================

/// Bytes written in binary mode read back unchanged, for several sizes.
#[test]
fn e2e_binary_write_then_read_round_trips() {
    let (_guard, root) = scratch();
    for (i, len) in [0usize, 1, 511, 4096, 70_000].into_iter().enumerate() {
        let path = root.join(format!("blob{i}.bin"));
        let data: Vec<u8> = (0..len).map(|n| (n * 31 % 251) as u8).collect();

        let mut f = HostOs
            .open(&path, OpenMode::WriteBinary, FileTypeHint::Binary)
            .expect("open for write");
        assert!(f.write_block(&data), "write of {len} bytes");
        assert!(f.close());

        let mut f = HostOs
            .open(&path, OpenMode::ReadBinary, FileTypeHint::Binary)
            .expect("open for read");
        let mut back = vec![0u8; len];
        assert!(f.read_block(&mut back), "read of {len} bytes");
        assert_eq!(back, data);
    }
}

/// Every read-only mode yields no handle for a missing path.
#[test]
fn e2e_read_open_of_missing_path_yields_no_handle() {
    let (_guard, root) = scratch();
    let missing = root.join("nowhere").join("story.t3");
    for mode in OpenMode::all().iter().copied().filter(|m| !m.can_write()) {
        assert!(
            HostOs.open(&missing, mode, FileTypeHint::Game).is_none(),
            "{mode:?} should fail"
        );
    }
    // Write modes cannot create a file in a missing directory either.
    assert!(os::file::open_write_binary(&missing, FileTypeHint::Save).is_none());
}

/// A read/write handle can overwrite in place and read the result back.
#[test]
fn e2e_read_write_handle_updates_in_place() {
    let (_guard, root) = scratch();
    let path = root.join("state.sav");
    fs::write(&path, b"AAAAAAAAAA").unwrap();

    let mut f = os::file::open_rw_binary(&path, FileTypeHint::Save).unwrap();
    assert!(f.seek(3, SeekOrigin::Set));
    assert!(f.write_block(b"xyz"));
    assert!(f.seek(0, SeekOrigin::Set));
    let mut buf = [0u8; 10];
    assert!(f.read_block(&mut buf));
    assert_eq!(&buf, b"AAAxyzAAAA");
    assert_eq!(f.position(), Some(10));

    // Reading further is end-of-file, not a host error.
    assert!(!f.read_block(&mut buf[..1]));
    assert_eq!(f.last_failure(), Some(OsFailure::EndOfStream));
    assert!(f.close());
}

/// Text modes do no newline translation on this host.
#[test]
fn e2e_text_mode_writes_native_newlines() {
    let (_guard, root) = scratch();
    let path = root.join("transcript.log");

    let mut f = os::file::open_write_text(&path, FileTypeHint::Log).unwrap();
    assert!(f.write_str("line one"));
    assert!(f.write_str(constants::NEWLINE_SEQ));
    assert!(f.write_str("line two\n"));
    assert!(f.close());

    assert_eq!(fs::read(&path).unwrap(), b"line one\nline two\n");

    let mut f = os::file::open_read_text(&path, FileTypeHint::Log).unwrap();
    let mut line = [0u8; 128];
    let n = f.read_line(&mut line).unwrap();
    assert_eq!(&line[..n], b"line one\n");
}

/// Delete, rename and the existence check operate on paths.
#[test]
fn e2e_path_operations() {
    let (_guard, root) = scratch();
    let a = root.join("old.t3v");
    let b = root.join("new.t3v");
    fs::write(&a, b"save").unwrap();

    assert!(HostOs.exists(&a));
    assert!(HostOs.rename(&a, &b));
    assert!(!HostOs.exists(&a));
    assert_eq!(fs::read(&b).unwrap(), b"save");
    assert!(HostOs.delete(&b));
    assert!(!HostOs.exists(&b));
    assert!(!HostOs.delete(&b));
}

// =============================================================================
// Directories and status
// =============================================================================

/// Enumeration yields each name once, then end-of-stream forever.
#[test]
fn e2e_directory_enumeration_is_forward_only() {
    let (_guard, root) = scratch();
    for name in ["a", "b", "c"] {
        fs::write(root.join(name), name).unwrap();
    }

    let mut dir = HostOs.open_dir(&root).expect("open dir");
    let mut names = Vec::new();
    while let Some(name) = dir.read_next() {
        names.push(name);
    }
    names.sort();
    assert_eq!(names, ["a", "b", "c"]);
    assert_eq!(dir.read_next(), None);
    assert_eq!(dir.next(), None);
    dir.close();
}

/// Status classifies files and directories and reports sizes.
#[test]
fn e2e_stat_classifies_paths() {
    let (_guard, root) = scratch();
    let file = root.join("story.t3");
    fs::write(&file, vec![0u8; 1234]).unwrap();

    let st = HostOs.stat(&file, true).expect("stat");
    assert_eq!(st.mode, FileMode::File);
    assert_eq!(st.size, 1234);
    assert!(st.attrs.is_readable());

    let st = HostOs.stat(&root, true).expect("stat dir");
    assert_eq!(st.mode, FileMode::Dir);

    assert!(HostOs.stat(&root.join("missing"), true).is_none());
}

/// A newer write produces a later-or-equal modification time.
#[test]
fn e2e_timestamps_support_staleness_checks() {
    let (_guard, root) = scratch();
    let source = root.join("game.t");
    let image = root.join("game.t3");
    fs::write(&source, b"source").unwrap();
    let t_source = HostOs.modified_time(&source).unwrap();
    fs::write(&image, b"image").unwrap();
    let t_image = HostOs.modified_time(&image).unwrap();
    assert!(t_image >= t_source);
}

// =============================================================================
// Memory, strings, paths
// =============================================================================

/// Shrinking keeps the prefix; an impossible grow leaves the block intact.
#[test]
fn e2e_memory_resize_contract() {
    let mut block = MemBlock::alloc(32).expect("alloc");
    block.copy_from_slice(&[9u8; 32]);
    block[0] = 1;

    assert!(block.resize(4));
    assert_eq!(&block[..], &[1, 9, 9, 9]);

    let over_cap = constants::MAX_ALLOC.checked_add(1).unwrap_or(usize::MAX);
    assert!(!block.resize(over_cap));
    assert_eq!(&block[..], &[1, 9, 9, 9]);
    block.free();
}

/// Case-insensitive comparison bridges case-sensitive host filenames.
#[test]
fn e2e_case_insensitive_comparison() {
    assert_eq!(HostOs.stricmp("FILE.T3", "file.t3"), Ordering::Equal);
    assert_ne!(HostOs.stricmp("FILE.T3", "file.t4"), Ordering::Equal);
    assert_eq!(HostOs.strnicmp("FILE.T3", "file.t4", 6), Ordering::Equal);
}

/// Paths built with the layer's conventions open on the host.
#[test]
fn e2e_built_paths_resolve_on_host() {
    let (_guard, root) = scratch();
    let dir = root.to_string_lossy().into_owned();
    let name = os::path::default_extension("story", "t3");
    let full = os::path::build_full_path(&dir, &name);
    fs::write(&full, b"T3").unwrap();

    assert_eq!(os::path::root_name(&full), "story.t3");
    assert_eq!(os::path::path_name(&full), dir.trim_end_matches('/'));
    assert!(os::path::is_absolute(&full));
    assert!(os::file::open_source(&full).is_some());

    let formatted = osfab::os_asprintf!("{}{}{}", dir, constants::PATH_CHAR, "story.t3");
    assert_eq!(formatted, full);
}
