//! Library-level integration tests over real directory trees.

mod discovery;
mod patching;

use fourcc_fixer::{COMPRESSION_OFFSET, HANDLER_OFFSET};
use std::fs;
use std::path::{Path, PathBuf};

/// A minimal header: RIFF/AVI preamble with `fourcc` at both tag offsets,
/// padded to `len` bytes.
pub fn avi_bytes(fourcc: &[u8; 4], len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len];
    data[..4].copy_from_slice(b"RIFF");
    data[8..12].copy_from_slice(b"AVI ");
    let h = HANDLER_OFFSET as usize;
    let c = COMPRESSION_OFFSET as usize;
    if len >= h + 4 {
        data[h..h + 4].copy_from_slice(&fourcc.map(|b| b.to_ascii_lowercase()));
    }
    if len >= c + 4 {
        data[c..c + 4].copy_from_slice(&fourcc.map(|b| b.to_ascii_uppercase()));
    }
    data
}

pub fn write_avi(path: &Path, fourcc: &[u8; 4]) -> PathBuf {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, avi_bytes(fourcc, 1024)).unwrap();
    path.to_path_buf()
}

/// The tags at (handler offset, compression offset).
pub fn tags(path: &Path) -> (String, String) {
    let data = fs::read(path).unwrap();
    let h = HANDLER_OFFSET as usize;
    let c = COMPRESSION_OFFSET as usize;
    (
        String::from_utf8_lossy(&data[h..h + 4]).into_owned(),
        String::from_utf8_lossy(&data[c..c + 4]).into_owned(),
    )
}
