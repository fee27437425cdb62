use crate::utils::error::{ResizeError, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::io::{Cursor, Write};
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

pub const MANIFEST_NAME: &str = "manifest.json";

/// 在記憶體中組出 ZIP，完成後整包交給 Storage 寫出
pub struct ArchiveBuilder {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    names: HashSet<String>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            names: HashSet::new(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// 圖片本身已壓縮過，以 Stored 方式存放
    pub fn add_file(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        self.add_entry(name, data, options)
    }

    pub fn add_json<T: Serialize>(&mut self, name: &str, value: &T) -> Result<()> {
        let json = serde_json::to_vec_pretty(value)?;
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.add_entry(name, &json, options)
    }

    fn add_entry(&mut self, name: &str, data: &[u8], options: SimpleFileOptions) -> Result<()> {
        // 同名項目不自動改名，交由呼叫端決定如何回報
        if self.names.contains(name) {
            return Err(ResizeError::DuplicateEntry {
                name: name.to_string(),
            });
        }

        self.zip.start_file(name, options)?;
        self.zip.write_all(data)?;
        self.names.insert(name.to_string());
        Ok(())
    }

    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self.zip.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}
