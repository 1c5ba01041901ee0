use std::fs;
use tempfile::tempdir;
use bagkit::{HashError, HashRegistry, Manifest, ManifestError, StandardRegistry, file_checksum};

mod common;
use common::{create_dummy_file, create_dummy_files, fake_entries, read_text};

/// 测试：文件名中的算法无法识别时，读取只报告一个错误。
#[test]
fn test_load_rejects_unknown_algorithm_name() {
    let dir = tempdir().unwrap();
    let bad_path = create_dummy_file(&dir, "manifest-sha156.txt", "");

    let report = Manifest::load(&bad_path, &StandardRegistry);
    assert!(report.value.is_none());
    assert_eq!(report.errors.len(), 1);
    assert!(matches!(
        report.errors[0],
        ManifestError::Algorithm(HashError::UnknownAlgorithm(_))
    ));
}

#[test]
fn test_load_rejects_name_without_algorithm() {
    let dir = tempdir().unwrap();
    let path = create_dummy_file(&dir, "checksums.txt", "abc data/a.txt\n");

    let report = Manifest::load(&path, &StandardRegistry);
    assert!(report.value.is_none());
    assert!(matches!(report.errors[..], [ManifestError::UndeterminedAlgorithm(_)]));
}

#[test]
fn test_load_missing_file() {
    let dir = tempdir().unwrap();
    let report = Manifest::load(dir.path().join("manifest-md5.txt"), &StandardRegistry);
    assert!(report.value.is_none());
    assert!(matches!(report.errors[..], [ManifestError::Io { .. }]));
}

/// 测试：写入后再读取，条目保持一致。
#[test]
fn test_persist_then_load_round_trip() {
    let dir = tempdir().unwrap();
    let expected = fake_entries(40);

    // 1. 创建并写入清单
    let mut manifest = Manifest::for_directory(dir.path(), "md5", &StandardRegistry).unwrap();
    *manifest.entries_mut() = expected.clone();
    manifest.persist().unwrap();
    assert!(manifest.path().is_file());

    // 2. 读取并比较
    let report = Manifest::load(manifest.path(), &StandardRegistry);
    assert!(report.is_clean(), "{:?}", report.errors);
    let loaded = report.value.unwrap();
    assert_eq!(loaded.entries(), &expected);
    assert_eq!(loaded.algorithm().name(), "md5");
}

/// 测试：部分行格式错误时，仍然返回可用的清单。
#[test]
fn test_load_keeps_good_lines() {
    let dir = tempdir().unwrap();
    let path = create_dummy_file(
        &dir,
        "tagmanifest-sha256.txt",
        "aaaa bagit.txt\nonlyonetoken\nbbbb bag-info.txt\n",
    );

    let report = Manifest::load(&path, &StandardRegistry);
    assert_eq!(report.errors.len(), 1);
    assert!(matches!(report.errors[0], ManifestError::Parse { line_number: 2, .. }));

    let manifest = report.value.unwrap();
    assert_eq!(manifest.len(), 2);
    assert_eq!(manifest.get("bag-info.txt"), Some("bbbb"));
    assert_eq!(manifest.algorithm().name(), "sha256");
}

/// 测试：校验和匹配时没有错误，篡改记录后报告一个完整性错误。
#[test]
fn test_verify_all() {
    let dir = tempdir().unwrap();
    create_dummy_file(&dir, "data/test.txt", "Test the checksum");

    let mut manifest = Manifest::for_directory(dir.path(), "sha1", &StandardRegistry).unwrap();
    manifest.insert("data/test.txt", "da909ba395016f2a64b04d706520db6afa74fc95");
    assert!(manifest.verify_all().is_empty());

    manifest.insert("data/test.txt", "frodo lives!");
    let errors = manifest.verify_all();
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ManifestError::Fixity { expected, path, actual } => {
            assert_eq!(expected, "frodo lives!");
            assert_eq!(path, "data/test.txt");
            assert_eq!(actual, "da909ba395016f2a64b04d706520db6afa74fc95");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let message = errors[0].to_string();
    assert!(message.contains("frodo lives!"));
    assert!(message.contains("data/test.txt"));
    assert!(message.contains("da909ba395016f2a64b04d706520db6afa74fc95"));
}

/// 测试：校验不会在第一个错误处停止。
#[test]
fn test_verify_all_reports_every_failure() {
    let dir = tempdir().unwrap();
    let files = create_dummy_files(&dir, 5, "payload");
    let factory = StandardRegistry.lookup("sha256").unwrap();

    let mut manifest = Manifest::for_directory(dir.path(), "sha256", &StandardRegistry).unwrap();
    for (rel, _) in &files {
        let sum = file_checksum(&dir.path().join(rel), &factory).unwrap();
        manifest.insert(rel.as_str(), sum);
    }
    assert!(manifest.verify_all().is_empty());

    // 损坏两个文件，删除一个文件
    fs::write(dir.path().join(&files[0].0), "corrupted").unwrap();
    fs::write(dir.path().join(&files[3].0), "corrupted too").unwrap();
    fs::remove_file(dir.path().join(&files[4].0)).unwrap();

    let errors = manifest.verify_all();
    assert_eq!(errors.len(), 3);
    let fixity = errors.iter().filter(|e| matches!(e, ManifestError::Fixity { .. })).count();
    let io = errors.iter().filter(|e| matches!(e, ManifestError::Io { .. })).count();
    assert_eq!((fixity, io), (2, 1));
}

#[test]
fn test_update_checksums_then_persist() {
    let dir = tempdir().unwrap();
    let files = create_dummy_files(&dir, 3, "test");

    let mut manifest = Manifest::for_directory(dir.path(), "sha1", &StandardRegistry).unwrap();
    for (rel, _) in &files {
        manifest.insert(rel.as_str(), "");
    }
    assert!(manifest.update_checksums().is_empty());
    assert!(manifest.verify_all().is_empty());
    manifest.persist().unwrap();

    let text = read_text(manifest.path());
    assert_eq!(text.lines().count(), 3);
    assert!(text.lines().all(|l| l.split_once(' ').unwrap().0.len() == 40));
}

#[test]
fn test_manifest_name() {
    let dir = tempdir().unwrap();
    let manifest = Manifest::for_directory(dir.path(), "SHA1", &StandardRegistry).unwrap();
    assert_eq!(manifest.name(), dir.path().join("manifest-sha1.txt"));
}

#[test]
fn test_construct_in_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("not").join("here");
    let result = Manifest::for_directory(&missing, "sha1", &StandardRegistry);
    assert!(matches!(result, Err(ManifestError::PathNotFound(p)) if p.starts_with(&missing)));
}

#[test]
fn test_persist_creates_missing_directories() {
    let dir = tempdir().unwrap();
    let mut manifest = Manifest::for_directory(dir.path(), "md5", &StandardRegistry).unwrap();
    manifest.insert("data/a.txt", "0cc175b9c0f1b6a831c399e269772661");

    // 构造之后目录被移动，写入时应重新创建
    let nested = dir.path().join("later").join("manifest-md5.txt");
    fs::create_dir(dir.path().join("later")).unwrap();
    manifest.rename_to(&nested).unwrap();
    fs::remove_dir(dir.path().join("later")).unwrap();

    manifest.persist().unwrap();
    assert_eq!(read_text(&nested), "0cc175b9c0f1b6a831c399e269772661 data/a.txt\n");
}

#[test]
fn test_persist_empty_manifest_writes_empty_file() {
    let dir = tempdir().unwrap();
    let manifest = Manifest::for_directory(dir.path(), "md5", &StandardRegistry).unwrap();
    manifest.persist().unwrap();
    assert_eq!(fs::metadata(manifest.path()).unwrap().len(), 0);
}

#[test]
fn test_persist_truncates_previous_content() {
    let dir = tempdir().unwrap();
    create_dummy_file(&dir, "manifest-md5.txt", "old old old\nmore old\n");

    let mut manifest = Manifest::for_directory(dir.path(), "md5", &StandardRegistry).unwrap();
    manifest.insert("data/new.txt", "abcd");
    manifest.persist().unwrap();
    assert_eq!(read_text(manifest.path()), "abcd data/new.txt\n");
}
