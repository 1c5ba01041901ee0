#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 辅助函数：在临时目录中创建一个具有特定内容的文件。
///
/// `name` 可以包含子目录 (例如 "data/a.txt")，缺失的目录会被自动创建。
pub fn create_dummy_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let file_path = dir.path().join(name);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&file_path, content).unwrap();
    file_path
}

/// 辅助函数：在 `data/` 下批量创建文件。
///
/// 返回 `(相对路径, 文件内容)` 的列表，相对路径可直接作为清单条目。
pub fn create_dummy_files(dir: &TempDir, count: usize, prefix: &str) -> Vec<(String, String)> {
    let mut files = Vec::new();
    for i in 0..count {
        let rel = format!("data/{}_{:03}.txt", prefix, i);
        let content = format!("content for file {} {}!", prefix, i);
        create_dummy_file(dir, &rel, &content);
        files.push((rel, content));
    }
    files
}

/// 辅助函数：构造一组伪造的清单条目 (路径 -> 十六进制校验和)。
pub fn fake_entries(count: usize) -> BTreeMap<String, String> {
    (0..count)
        .map(|i| (format!("data/testfilename_{i}.txt"), format!("{:08x}", i * 2_654_435_761usize % 0xffff_ffff)))
        .collect()
}

/// 辅助函数：读取文件的全部文本。
pub fn read_text(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}
