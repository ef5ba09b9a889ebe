use std::fs;

use kira_tlogqc::error::AnalysisError;
use kira_tlogqc::input::{self, InputKind};
use tempfile::TempDir;

#[test]
fn directory_lists_regular_files_sorted() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("b.bin"), "x").unwrap();
    fs::write(tmp.path().join("a.dlg"), "x").unwrap();
    fs::write(tmp.path().join("c.txt"), "x").unwrap();
    fs::create_dir(tmp.path().join("nested")).unwrap();
    fs::write(tmp.path().join("nested").join("d.bin"), "x").unwrap();

    let files = input::candidate_files(tmp.path()).unwrap();
    let names: Vec<String> = files.iter().map(|p| input::display_name(p)).collect();
    assert_eq!(names, vec!["a.dlg", "b.bin", "c.txt"]);
}

#[test]
fn resolves_file_directory_or_missing() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("plan.bin");
    fs::write(&file, "x").unwrap();

    assert_eq!(
        input::resolve_input(tmp.path()).unwrap(),
        InputKind::Directory(tmp.path().to_path_buf())
    );
    assert_eq!(input::resolve_input(&file).unwrap(), InputKind::File(file.clone()));
    assert!(matches!(
        input::resolve_input(&tmp.path().join("gone")),
        Err(AnalysisError::InputNotFound(_))
    ));
}
