// Integration test utilities and common code

#![allow(dead_code)]

pub mod fixtures;

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use encdetect::Encoding;

/// Test fixture helper for creating temporary directories of sample files
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self { temp_dir, root_path }
    }

    /// Write raw bytes to a file under the fixture root
    pub fn create_file<P: AsRef<Path>>(&self, relative_path: P, content: &[u8]) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    /// Write `text` in `encoding`, optionally preceded by its BOM
    pub fn create_encoded_file<P: AsRef<Path>>(
        &self,
        relative_path: P,
        encoding: Encoding,
        text: &str,
        with_bom: bool,
    ) -> PathBuf {
        self.create_file(relative_path, &encode(encoding, text, with_bom))
    }

    /// Write the full sample set used by the pipeline tests
    pub fn create_sample_set(&self) -> Vec<PathBuf> {
        fixtures::SAMPLES
            .iter()
            .map(|sample| self.create_file(sample.name, &sample.bytes()))
            .collect()
    }
}

/// Bytes of `text` in `encoding`, with the encoding's BOM if requested
pub fn encode(encoding: Encoding, text: &str, with_bom: bool) -> Vec<u8> {
    let mut bytes = if with_bom {
        encoding.bom().expect("encoding has no BOM").to_vec()
    } else {
        Vec::new()
    };
    bytes.extend(encoding.encode(text));
    bytes
}
