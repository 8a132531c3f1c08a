//! Plain-text channel dumps: one `time value` (or `psin value`) pair per
//! line, `#` starts a comment line.

use std::path::Path;

use anyhow::{Context, Result, bail};
use pcsfit_data::{ShotArchive, SignalRecord};

/// Parses two whitespace-separated columns. Extra columns are ignored.
pub fn parse_columns(content: &str) -> Result<(Vec<f64>, Vec<f64>)> {
    let mut first = Vec::new();
    let mut second = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.starts_with('#') || line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            bail!("line {}: expected two columns, got {:?}", lineno + 1, line);
        }
        first.push(
            parts[0]
                .parse()
                .with_context(|| format!("line {}: bad number {:?}", lineno + 1, parts[0]))?,
        );
        second.push(
            parts[1]
                .parse()
                .with_context(|| format!("line {}: bad number {:?}", lineno + 1, parts[1]))?,
        );
    }
    Ok((first, second))
}

pub fn parse_signal(path: &Path) -> Result<SignalRecord> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("no usable file name in {}", path.display()))?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let (times, data) =
        parse_columns(&content).with_context(|| format!("in {}", path.display()))?;
    Ok(SignalRecord::new(name, times, data))
}

/// Collects every `*.dat` file in `dir` into one archive, sorted by name.
pub fn parse_shot_dir(dir: &Path, shot: u32) -> Result<ShotArchive> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "dat"))
        .collect();
    paths.sort();

    let mut archive = ShotArchive::new(shot);
    for path in paths {
        let record = parse_signal(&path)?;
        log::debug!("  {}: {} samples", record.name, record.len());
        archive.insert(record);
    }
    Ok(archive)
}
