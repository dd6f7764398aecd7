use assert_cmd::Command;
use assert_cmd::cargo;
use flate2::Compression;
use flate2::write::GzEncoder;
use predicates::prelude::*;
use std::fs;
use std::io::prelude::*;
use std::path::Path;
use tar::Builder;
use tempfile::tempdir;

fn create_tar_gz(files: &[(&str, &str)]) -> Vec<u8> {
    let mut tar_builder = Builder::new(Vec::new());
    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_path(name).unwrap();
        header.set_mode(0o644);
        header.set_cksum();
        tar_builder.append(&header, content.as_bytes()).unwrap();
    }
    let tar = tar_builder.into_inner().unwrap();

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar).unwrap();
    encoder.finish().unwrap()
}

/// Add `<cache>/<name>/<version>/` with a manifest and an npm-style tarball.
fn add_cache_entry(cache: &Path, name: &str, version: &str, dependencies: &str) {
    let entry = cache.join(name).join(version);
    fs::create_dir_all(entry.join("package")).unwrap();

    let manifest = format!(
        r#"{{"name": "{}", "version": "{}", "dependencies": {}}}"#,
        name, version, dependencies
    );
    fs::write(entry.join("package/package.json"), &manifest).unwrap();

    let index = format!("module.exports = '{}@{}';", name, version);
    let tgz = create_tar_gz(&[
        ("package/package.json", manifest.as_str()),
        ("package/index.js", index.as_str()),
    ]);
    fs::write(entry.join("package.tgz"), tgz).unwrap();
}

fn nmi(cache: &Path, prefix: &Path) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("nmi"));
    cmd.arg("--cache").arg(cache).arg("--prefix").arg(prefix);
    cmd
}

#[test]
fn test_end_to_end_install_with_dependency() {
    let cache = tempdir().unwrap();
    let project = tempdir().unwrap();
    let prefix = project.path().join("node_modules");

    add_cache_entry(cache.path(), "bar", "1.0.0", r#"{"baz": "^1.0.0"}"#);
    add_cache_entry(cache.path(), "baz", "1.2.0", "{}");

    nmi(cache.path(), &prefix)
        .arg("install")
        .arg("bar")
        .assert()
        .success()
        .stdout(predicates::str::contains("[bar@1.0.0] install"))
        .stdout(predicates::str::contains("  [baz@1.2.0] install"))
        .stdout(predicates::str::contains(":=>").not())
        .stdout(predicates::str::contains("installed 2 package(s), 0 failed"));

    let bar = prefix.join("bar");
    assert_eq!(
        fs::read_to_string(bar.join("index.js")).unwrap(),
        "module.exports = 'bar@1.0.0';"
    );
    assert!(!bar.join("package").exists());
    assert_eq!(
        fs::read_to_string(bar.join("node_modules/baz/index.js")).unwrap(),
        "module.exports = 'baz@1.2.0';"
    );
    assert!(!bar.join("node_modules/baz/node_modules").exists());

    // The list command shows the installed package
    Command::new(cargo::cargo_bin!("nmi"))
        .arg("list")
        .arg("--prefix")
        .arg(&prefix)
        .assert()
        .success()
        .stdout(predicates::str::contains(r#""bar": "^1.0.0","#));
}

#[test]
fn test_install_prompts_until_listed_version() {
    let cache = tempdir().unwrap();
    let project = tempdir().unwrap();
    let prefix = project.path().join("node_modules");

    add_cache_entry(cache.path(), "foo", "1.0.0", "{}");
    add_cache_entry(cache.path(), "foo", "2.0.0", "{}");

    nmi(cache.path(), &prefix)
        .arg("install")
        .arg("foo")
        .write_stdin("3.0.0\n2.0.0\n")
        .assert()
        .success()
        .stdout(predicates::str::contains("[foo] Requested: ..."))
        .stdout(predicates::str::contains("1.0.0; 2.0.0 :=> "))
        .stdout(predicates::str::contains("Not found!"))
        .stdout(predicates::str::contains("[foo@2.0.0] install"));

    assert_eq!(
        fs::read_to_string(prefix.join("foo/index.js")).unwrap(),
        "module.exports = 'foo@2.0.0';"
    );
}

#[test]
fn test_install_asks_for_module_name() {
    let cache = tempdir().unwrap();
    let project = tempdir().unwrap();
    let prefix = project.path().join("node_modules");

    add_cache_entry(cache.path(), "leaf", "0.1.0", "{}");

    nmi(cache.path(), &prefix)
        .arg("install")
        .write_stdin("leaf\n")
        .assert()
        .success()
        .stdout(predicates::str::contains("module name :=> "));

    assert!(prefix.join("leaf/index.js").exists());
}

#[test]
fn test_install_unknown_package_fails() {
    let cache = tempdir().unwrap();
    let project = tempdir().unwrap();
    let prefix = project.path().join("node_modules");

    nmi(cache.path(), &prefix)
        .arg("install")
        .arg("ghost")
        .assert()
        .failure()
        .stdout(predicates::str::contains(":=>").not())
        .stderr(predicates::str::contains("not found"));

    assert!(!prefix.join("ghost").exists());
}

#[test]
fn test_broken_dependency_does_not_fail_install() {
    let cache = tempdir().unwrap();
    let project = tempdir().unwrap();
    let prefix = project.path().join("node_modules");

    add_cache_entry(cache.path(), "bar", "1.0.0", r#"{"baz": "^1.0.0", "qux": "*"}"#);
    add_cache_entry(cache.path(), "baz", "1.0.0", "{}");
    add_cache_entry(cache.path(), "qux", "1.0.0", "{}");
    fs::remove_file(cache.path().join("baz/1.0.0/package.tgz")).unwrap();

    nmi(cache.path(), &prefix)
        .arg("install")
        .arg("bar")
        .assert()
        .success()
        .stdout(predicates::str::contains("Dependency failed: baz"))
        .stdout(predicates::str::contains("installed 2 package(s), 1 failed"))
        .stdout(predicates::str::contains("failed: baz@1.0.0"));

    assert!(prefix.join("bar/index.js").exists());
    assert!(prefix.join("bar/node_modules/qux/index.js").exists());
    assert!(!prefix.join("bar/node_modules/baz").exists());
}

#[test]
fn test_dependency_name_cannot_escape_prefix() {
    let tmp = tempdir().unwrap();
    let cache = tmp.path().join("a/b/c/d/cache");
    let prefix = tmp.path().join("project/node_modules");
    fs::create_dir_all(&cache).unwrap();

    add_cache_entry(&cache, "bar", "1.0.0", r#"{"../../../../evil": "*"}"#);
    // Reachable through the same relative path from the cache root
    add_cache_entry(&cache, "../../../../evil", "1.0.0", "{}");

    nmi(&cache, &prefix)
        .arg("install")
        .arg("bar")
        .assert()
        .success()
        .stdout(predicates::str::contains("[../../../../evil@").not())
        .stdout(predicates::str::contains("invalid package name"))
        .stdout(predicates::str::contains("Dependency failed: ../../../../evil"))
        .stdout(predicates::str::contains("installed 1 package(s), 1 failed"));

    assert!(prefix.join("bar/index.js").exists());
    assert!(!tmp.path().join("evil").exists());
}

#[test]
fn test_install_closed_input_fails() {
    let cache = tempdir().unwrap();
    let project = tempdir().unwrap();
    let prefix = project.path().join("node_modules");

    add_cache_entry(cache.path(), "foo", "1.0.0", "{}");
    add_cache_entry(cache.path(), "foo", "2.0.0", "{}");

    nmi(cache.path(), &prefix)
        .arg("install")
        .arg("foo")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicates::str::contains("input closed"));
}

#[test]
fn test_list_empty_prefix() {
    let project = tempdir().unwrap();

    Command::new(cargo::cargo_bin!("nmi"))
        .arg("list")
        .arg("--prefix")
        .arg(project.path().join("node_modules"))
        .assert()
        .success()
        .stdout(predicates::str::contains("No packages installed."));
}
