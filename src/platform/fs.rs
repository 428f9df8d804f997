// AlumnosAdmin - platform/fs.rs
//
// Filesystem helpers shared by the snapshot store and session persistence.

use std::io;
use std::path::Path;

/// Write `bytes` to `path` atomically (write sibling temp file, rename).
///
/// Creates parent directories as needed. A crash between write and rename
/// loses the new content but never corrupts the previous file. The temp
/// file is `<path>.tmp`-style (`alumnos.json` -> `alumnos.json.tmp`).
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp_name);

    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        e
    })
}
