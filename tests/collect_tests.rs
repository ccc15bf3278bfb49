use codedump::{collect, CodeDumpError, Collector, ScanConfiguration};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn header(path: &Path) -> String {
    format!("File: {}\n", path.display())
}

fn file_record_count(dump: &str) -> usize {
    dump.lines().filter(|l| l.starts_with("File: ")).count()
}

#[test]
fn test_reference_tree_produces_single_record() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    fs::write(root.join("a.py"), "print(1)").unwrap();
    fs::create_dir_all(root.join("b/node_modules")).unwrap();
    fs::write(root.join("b/node_modules/c.js"), "module.exports = 1;").unwrap();
    fs::write(root.join(".env"), "TOKEN=abc").unwrap();
    fs::write(root.join("d.png"), [0x89, b'P', b'N', b'G', 0x0d, 0x0a]).unwrap();

    let output = root.join("all_code.txt");
    collect(root, &output, None, None, None).unwrap();

    let dump = fs::read_to_string(&output).unwrap();
    assert_eq!(dump, format!("File: {}\nprint(1)\n", root.join("a.py").display()));
}

#[test]
fn test_non_text_file_skipped_even_when_extension_included() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("a.py"), "print(1)").unwrap();
    fs::write(root.join("d.png"), [0x89, b'P', b'N', b'G']).unwrap();

    let output = root.join("all_code.txt");
    let report = collect(root, &output, Some(&[".py", ".png"][..]), None, None).unwrap();

    let dump = fs::read_to_string(&output).unwrap();
    assert!(!dump.contains("d.png"));
    assert_eq!(report.scan.non_text, 1);
}

#[test]
fn test_excluded_directory_is_pruned_at_any_depth() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    fs::create_dir_all(root.join("src/deep/build")).unwrap();
    fs::write(root.join("src/deep/build/gen.rs"), "// generated").unwrap();
    fs::write(root.join("src/deep/real.rs"), "fn real() {}").unwrap();
    fs::create_dir_all(root.join("venv/lib")).unwrap();
    fs::write(root.join("venv/lib/site.py"), "import os").unwrap();

    let output = root.join("all_code.txt");
    collect(root, &output, None, None, None).unwrap();

    let dump = fs::read_to_string(&output).unwrap();
    assert_eq!(file_record_count(&dump), 1);
    assert!(dump.contains(&header(&root.join("src/deep/real.rs"))));
    assert!(!dump.contains("gen.rs"));
    assert!(!dump.contains("site.py"));
}

#[test]
fn test_custom_lists_replace_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    fs::write(root.join("notes.md"), "# notes").unwrap();
    fs::write(root.join("main.rs"), "fn main() {}").unwrap();
    fs::create_dir(root.join("node_modules")).unwrap();
    fs::write(root.join("node_modules/pkg.md"), "# pkg").unwrap();
    fs::write(root.join(".env"), "# env").unwrap();

    let output = temp_dir.path().join("dump.txt");
    collect(root, &output, Some(&[".MD"][..]), Some(&[][..]), Some(&["*.rs"][..])).unwrap();

    let dump = fs::read_to_string(&output).unwrap();
    assert!(dump.contains(&header(&root.join("notes.md"))));
    // Directory and file exclusions were replaced, so node_modules is walked.
    assert!(dump.contains(&header(&root.join("node_modules/pkg.md"))));
    assert!(!dump.contains("main.rs"));
    assert_eq!(file_record_count(&dump), 2);
}

#[test]
fn test_directory_files_precede_subdirectories() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    fs::create_dir_all(root.join("a/b")).unwrap();
    fs::write(root.join("a/b/deep.go"), "package b").unwrap();
    fs::write(root.join("a/mid.go"), "package a").unwrap();
    fs::write(root.join("top.go"), "package main").unwrap();

    let output = root.join("all_code.txt");
    collect(root, &output, None, None, None).unwrap();

    let dump = fs::read_to_string(&output).unwrap();
    let top = dump.find(&header(&root.join("top.go"))).unwrap();
    let mid = dump.find(&header(&root.join("a/mid.go"))).unwrap();
    let deep = dump.find(&header(&root.join("a/b/deep.go"))).unwrap();
    assert!(top < mid && mid < deep);
}

#[test]
fn test_runs_are_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    fs::create_dir_all(root.join("pkg/inner")).unwrap();
    for (name, body) in [
        ("one.ts", "export const one = 1;"),
        ("two.tsx", "export const Two = () => null;"),
        ("pkg/three.java", "class Three {}"),
        ("pkg/inner/four.kt", "fun four() = 4"),
    ] {
        fs::write(root.join(name), body).unwrap();
    }

    let output = root.join("all_code.txt");
    collect(root, &output, None, None, None).unwrap();
    let first = fs::read(&output).unwrap();

    // The previous dump sits inside the root but is never picked up.
    collect(root, &output, None, None, None).unwrap();
    let second = fs::read(&output).unwrap();

    assert_eq!(first, second);
    assert_eq!(file_record_count(&String::from_utf8(first).unwrap()), 4);
}

#[test]
fn test_output_matching_extension_is_self_excluded() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("a.py"), "x = 1").unwrap();

    let output = root.join("combined.py");
    collect(root, &output, None, None, None).unwrap();
    collect(root, &output, None, None, None).unwrap();

    let dump = fs::read_to_string(&output).unwrap();
    assert_eq!(dump, format!("File: {}\nx = 1\n", root.join("a.py").display()));
}

#[test]
fn test_output_spelled_with_parent_component_is_self_excluded() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("a.py"), "x = 1").unwrap();

    collect(root, root.join("sub/../dump.py"), None, None, None).unwrap();

    let dump = fs::read_to_string(root.join("dump.py")).unwrap();
    assert_eq!(dump, format!("File: {}\nx = 1\n", root.join("a.py").display()));
}

#[cfg(unix)]
#[test]
fn test_output_spelled_through_symlinked_directory_is_self_excluded() {
    let temp_dir = TempDir::new().unwrap();
    let real = temp_dir.path().join("real");
    let link = temp_dir.path().join("link");
    fs::create_dir(&real).unwrap();
    fs::write(real.join("a.py"), "x = 1").unwrap();
    std::os::unix::fs::symlink(&real, &link).unwrap();

    let report = collect(&real, link.join("dump.py"), None, None, None).unwrap();

    let dump = fs::read_to_string(real.join("dump.py")).unwrap();
    assert!(!dump.contains("dump.py"));
    assert_eq!(dump, format!("File: {}\nx = 1\n", real.join("a.py").display()));
    assert_eq!(report.scan.always_excluded, 1);
}

#[test]
fn test_always_excluded_path() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("tool.py"), "# the tool itself").unwrap();
    fs::write(root.join("app.py"), "run()").unwrap();

    let config = ScanConfiguration::new(root, root.join("all_code.txt"))
        .with_always_excluded(root.join("tool.py"));
    let report = Collector::new(config).unwrap().collect(None).unwrap();

    let dump = fs::read_to_string(root.join("all_code.txt")).unwrap();
    assert!(!dump.contains("tool.py"));
    assert_eq!(report.files_written, 1);
}

#[test]
fn test_decode_failure_does_not_stop_the_run() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir(root.join("z")).unwrap();
    fs::write(root.join("latin1.c"), [b'/', b'*', 0xe9, b'*', b'/']).unwrap();
    fs::write(root.join("z/after.c"), "int after;").unwrap();

    let output = root.join("all_code.txt");
    let report = collect(root, &output, None, None, None).unwrap();

    let dump = fs::read_to_string(&output).unwrap();
    let bad = root.join("latin1.c");
    assert!(dump.contains(&format!("Error reading {}: ", bad.display())));
    assert!(!dump.contains(&header(&bad)));
    assert!(dump.contains(&header(&root.join("z/after.c"))));
    assert_eq!(report.read_errors.len(), 1);
    assert_eq!(report.files_written, 1);
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_yields_error_record() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let locked = root.join("a.py");
    fs::write(&locked, "print(1)").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can read the file anyway.
    if fs::read(&locked).is_ok() {
        return;
    }

    let output = root.join("all_code.txt");
    collect(root, &output, None, None, None).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    let dump = fs::read_to_string(&output).unwrap();
    assert!(dump.starts_with(&format!("Error reading {}: ", locked.display())));
    assert!(dump.ends_with('\n'));
    assert!(!dump.contains("File: "));
}

#[cfg(unix)]
#[test]
fn test_unlistable_directory_is_counted_and_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let locked = root.join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("hidden.py"), "secret()").unwrap();
    fs::create_dir(root.join("open")).unwrap();
    fs::write(root.join("open/b.py"), "visible()").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can list the directory anyway.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let output = root.join("all_code.txt");
    let result = collect(root, &output, None, None, None);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    let report = result.unwrap();

    let dump = fs::read_to_string(&output).unwrap();
    assert_eq!(report.scan.walk_errors, 1);
    assert!(dump.contains(&header(&root.join("open/b.py"))));
    assert!(!dump.contains("hidden.py"));
}

#[cfg(unix)]
#[test]
fn test_symlink_and_target_written_once() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir(root.join("lib")).unwrap();
    fs::write(root.join("lib/util.js"), "export {}").unwrap();
    std::os::unix::fs::symlink(root.join("lib/util.js"), root.join("util_link.js")).unwrap();

    let output = root.join("all_code.txt");
    let report = collect(root, &output, None, None, None).unwrap();

    let dump = fs::read_to_string(&output).unwrap();
    assert_eq!(file_record_count(&dump), 1);
    assert_eq!(dump.matches("export {}").count(), 1);
    assert_eq!(report.scan.duplicates, 1);
}

#[cfg(unix)]
#[test]
fn test_dangling_symlink_is_an_error_record() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    std::os::unix::fs::symlink(root.join("gone.rs"), root.join("dangling.rs")).unwrap();

    let output = root.join("all_code.txt");
    let report = collect(root, &output, None, None, None).unwrap();

    let dump = fs::read_to_string(&output).unwrap();
    assert!(dump.starts_with(&format!("Error reading {}: ", root.join("dangling.rs").display())));
    assert_eq!(report.read_errors.len(), 1);
}

#[test]
fn test_nonexistent_root_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("all_code.txt");

    let result = collect(temp_dir.path().join("missing"), &output, None, None, None);
    assert!(matches!(result, Err(CodeDumpError::InvalidRoot { .. })));
    assert!(!output.exists());
}

#[test]
fn test_empty_tree_truncates_previous_output() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let output = root.join("all_code.txt");
    fs::write(&output, "stale content").unwrap();

    let report = collect(root, &output, None, None, None).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "");
    assert_eq!(report.files_written, 0);
}
