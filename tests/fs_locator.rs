use std::fs;
use std::path::Path;

use go125_sema::syntax::{FileBuilder, ParsedFile};
use go125_sema::{EnvConfig, Environment, Error, FsLocator, PackageLocator, Result};

fn write(dir: &Path, name: &str, text: &str) {
    fs::write(dir.join(name), text).unwrap();
}

fn go_tree() -> tempfile::TempDir {
    let root = tempfile::tempdir().unwrap();
    let pkg = root.path().join("example.com/models");
    fs::create_dir_all(pkg.join("nested")).unwrap();
    write(
        &pkg,
        "user.go",
        "// Copyright line\n/* block\npackage fake\n*/\npackage models\n\ntype User struct{}\n",
    );
    write(&pkg, "zeta.go", "package models\n");
    write(&pkg, "user_test.go", "package models\n");
    write(&pkg, "README.md", "package readme\n");
    write(&pkg.join("nested"), "deep.go", "package nested\n");
    root
}

#[test]
fn lists_sources_in_name_order() {
    let root = go_tree();
    let locator = FsLocator::new([root.path().to_path_buf()]);

    let meta = locator
        .locate("example.com/models", Path::new("."))
        .unwrap();
    assert_eq!(meta.name, "models");
    assert_eq!(meta.import_path, "example.com/models");
    assert_eq!(meta.dir, root.path().join("example.com/models"));
    let files: Vec<_> = meta
        .files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files, vec!["user.go", "zeta.go"]);
}

#[test]
fn relative_imports_start_from_the_given_directory() {
    let root = go_tree();
    let locator = FsLocator::default();

    let meta = locator
        .locate("./models", &root.path().join("example.com"))
        .unwrap();
    assert_eq!(meta.name, "models");
    assert_eq!(meta.files.len(), 2);
}

#[test]
fn locate_dir_derives_the_import_path_from_the_roots() {
    let root = go_tree();
    let locator = FsLocator::new([root.path().to_path_buf()]);

    let meta = locator
        .locate_dir(&root.path().join("example.com/models"))
        .unwrap();
    assert_eq!(meta.import_path, "example.com/models");
}

#[test]
fn missing_packages_are_reported() {
    let root = go_tree();
    let locator = FsLocator::new([root.path().to_path_buf()]);

    let err = locator.locate("example.com/missing", Path::new(".")).unwrap_err();
    assert!(matches!(err, Error::PackageLocate { .. }));
    assert!(err.to_string().contains("cannot find package"), "{err}");

    // a directory without Go sources is not a package
    fs::create_dir_all(root.path().join("example.com/empty")).unwrap();
    let err = locator.locate("example.com/empty", Path::new(".")).unwrap_err();
    assert!(err.to_string().contains("no Go files"), "{err}");
}

#[test]
fn parse_dir_runs_the_supplied_parser_on_each_file() {
    let root = go_tree();
    let locator = FsLocator::new([root.path().to_path_buf()]);
    // stands in for a real Go front-end: one struct per file, named after it
    let parser = |path: &Path| -> Result<ParsedFile> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        assert!(text.contains("package models"));
        let stem = path.file_stem().unwrap().to_string_lossy().to_uppercase();
        let mut b = FileBuilder::new("models");
        let st = b.struct_type(Vec::new());
        b.type_decl(&stem, st);
        Ok(b.finish())
    };
    let mut env = Environment::new(EnvConfig::default(), locator, parser).unwrap();

    let pkg = env
        .parse_dir(&root.path().join("example.com/models"))
        .unwrap();
    let package = env.package(pkg);
    assert_eq!(package.import_path, "example.com/models");
    assert!(package.is_explored());
    assert!(package.struct_by_name("USER").is_some());
    assert!(package.struct_by_name("ZETA").is_some());
    assert_eq!(package.structs.len(), 2);
}
