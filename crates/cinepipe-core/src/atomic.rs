//! Crash-safe JSON files: write to `<name>.tmp`, then rename over the target

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Sibling temp path used while writing `path`
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Serialize `value` to `path` atomically.
///
/// A crash mid-write leaves the previous file intact; at worst a stale
/// `.tmp` sibling remains and is replaced by the next write.
pub fn write_json_atomic<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
    pretty: bool,
) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = tmp_path(path);
    if tmp.exists() {
        log::warn!("Removing stale tmp file: {}", tmp.display());
        fs::remove_file(&tmp)?;
    }

    let file = File::create(&tmp)?;
    let mut writer = BufWriter::new(file);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writer.write_all(b"\n")?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp, path)
}

/// Read a JSON file; `Ok(None)` when it does not exist
pub fn read_json<T: DeserializeOwned>(path: &Path) -> io::Result<Option<T>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let value = serde_json::from_reader(BufReader::new(file))?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tmp_path_appends_suffix() {
        assert_eq!(
            tmp_path(Path::new("out/checkpoint.json")),
            PathBuf::from("out/checkpoint.json.tmp")
        );
    }

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        write_json_atomic(&path, &json!({"last_page": 4}), false).unwrap();

        let back: serde_json::Value = read_json(&path).unwrap().unwrap();
        assert_eq!(back, json!({"last_page": 4}));
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn pretty_output_is_indented() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json_atomic(&path, &json!([{"id": 1}]), true).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  {"));
    }

    #[test]
    fn stale_tmp_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        fs::write(tmp_path(&path), b"garbage from a crash").unwrap();

        write_json_atomic(&path, &json!([1, 2]), false).unwrap();
        let back: Vec<u32> = read_json(&path).unwrap().unwrap();
        assert_eq!(back, vec![1, 2]);
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn read_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let out: Option<serde_json::Value> = read_json(&dir.path().join("nope.json")).unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn read_corrupt_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, b"{\"last_page\": ").unwrap();
        assert!(read_json::<serde_json::Value>(&path).is_err());
    }
}
