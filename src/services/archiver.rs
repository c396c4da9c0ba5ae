//! 归档服务 - 业务能力层
//!
//! 把输出目录中的所有回执 PDF 打包为单个 ZIP

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info};
use zip::write::FileOptions;
use zip::ZipWriter;

use crate::config::Config;
use crate::error::{AppError, ArchiveError};

/// 回执 PDF 的文件名后缀，只有匹配的文件才会进入归档
const RECEIPT_SUFFIX: &str = "_receipt.pdf";

/// 归档服务
///
/// 职责：
/// - 扫描输出目录中的回执 PDF
/// - 写出单个 ZIP 归档
/// - 整个运行只执行一次，零份回执也产出（空）归档
pub struct Archiver {
    output_dir: PathBuf,
    archive_path: PathBuf,
}

impl Archiver {
    /// 创建新的归档服务
    pub fn new(config: &Config) -> Self {
        Self {
            output_dir: PathBuf::from(&config.output_dir),
            archive_path: PathBuf::from(&config.archive_path),
        }
    }

    /// 归档所有回执 PDF，返回归档的文件数量
    pub fn archive_receipts(&self) -> Result<usize> {
        info!("🗜️ 正在归档回执: {}", self.archive_path.display());
        let count = archive_receipts_to_zip(&self.output_dir, &self.archive_path)?;
        info!("✓ 已归档 {} 份回执", count);
        Ok(count)
    }
}

/// 把目录中所有以回执后缀结尾的文件写入 ZIP
pub fn archive_receipts_to_zip(output_dir: &Path, archive_path: &Path) -> Result<usize> {
    fs::create_dir_all(output_dir).map_err(|e| {
        AppError::Archive(ArchiveError::OutputDirUnreadable {
            path: output_dir.display().to_string(),
            source: Box::new(e),
        })
    })?;

    // 先收集再排序，归档内容与目录遍历顺序无关
    let mut receipt_paths = Vec::new();
    let entries = fs::read_dir(output_dir).map_err(|e| {
        AppError::Archive(ArchiveError::OutputDirUnreadable {
            path: output_dir.display().to_string(),
            source: Box::new(e),
        })
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| {
            AppError::Archive(ArchiveError::OutputDirUnreadable {
                path: output_dir.display().to_string(),
                source: Box::new(e),
            })
        })?;
        let path = entry.path();
        if path.is_file() && file_name_of(&path).ends_with(RECEIPT_SUFFIX) {
            receipt_paths.push(path);
        }
    }
    receipt_paths.sort();

    let file = File::create(archive_path).map_err(|e| zip_write_failed(archive_path, e))?;
    let mut zip = ZipWriter::new(file);
    let options: FileOptions<()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut count = 0;
    for path in &receipt_paths {
        let name = file_name_of(path);
        debug!("归档: {}", name);

        zip.start_file(name, options)
            .map_err(|e| zip_write_failed(archive_path, e))?;
        let mut f = File::open(path).map_err(|e| zip_write_failed(archive_path, e))?;
        let mut buffer = Vec::new();
        f.read_to_end(&mut buffer)
            .map_err(|e| zip_write_failed(archive_path, e))?;
        zip.write_all(&buffer)
            .map_err(|e| zip_write_failed(archive_path, e))?;
        count += 1;
    }

    zip.finish().map_err(|e| zip_write_failed(archive_path, e))?;
    Ok(count)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

fn zip_write_failed(
    archive_path: &Path,
    source: impl std::error::Error + Send + Sync + 'static,
) -> AppError {
    AppError::Archive(ArchiveError::ZipWriteFailed {
        path: archive_path.display().to_string(),
        source: Box::new(source),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use zip::ZipArchive;

    fn write_file(dir: &Path, name: &str, content: &[u8]) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn archives_exactly_the_receipt_pdfs() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "AAA111_receipt.pdf", b"%PDF-1.4 aaa");
        write_file(dir.path(), "BBB222_receipt.pdf", b"%PDF-1.4 bbb");
        write_file(dir.path(), "BBB222_robot.png", b"not a receipt");
        write_file(dir.path(), "notes.txt", b"not a receipt either");

        let archive_path = dir.path().join("orders.zip");
        let count = archive_receipts_to_zip(dir.path(), &archive_path).unwrap();
        assert_eq!(count, 2);

        let mut archive = ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);

        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert!(names.contains(&"AAA111_receipt.pdf".to_string()));
        assert!(names.contains(&"BBB222_receipt.pdf".to_string()));
    }

    #[test]
    fn empty_output_dir_yields_valid_empty_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("orders.zip");

        let count = archive_receipts_to_zip(dir.path(), &archive_path).unwrap();
        assert_eq!(count, 0);

        let archive = ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 0);
    }

    #[test]
    fn archived_content_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "CCC333_receipt.pdf", b"%PDF-1.4 ccc");

        let archive_path = dir.path().join("orders.zip");
        archive_receipts_to_zip(dir.path(), &archive_path).unwrap();

        let mut archive = ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        let mut entry = archive.by_name("CCC333_receipt.pdf").unwrap();
        let mut content = Vec::new();
        entry.read_to_end(&mut content).unwrap();
        assert_eq!(content, b"%PDF-1.4 ccc");
    }

    #[test]
    fn missing_output_dir_is_created_and_archived_empty() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("output");
        let archive_path = dir.path().join("orders.zip");

        let count = archive_receipts_to_zip(&output_dir, &archive_path).unwrap();
        assert_eq!(count, 0);
        assert!(output_dir.exists());
    }
}
