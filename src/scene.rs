use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::types::{PersonDetection, SceneReport};

/// Reads a scene file: a JSON array of person detections.
pub fn load_scene(path: &Path) -> Result<Vec<PersonDetection>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read scene {}", path.display()))?;
    let detections: Vec<PersonDetection> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse scene {}", path.display()))?;
    log::debug!(
        "loaded {} detections from {}",
        detections.len(),
        path.display()
    );
    Ok(detections)
}

pub fn write_report(path: &Path, report: &SceneReport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }
    let content = serde_json::to_string_pretty(report)?;
    fs::write(path, content)
        .with_context(|| format!("failed to write report {}", path.display()))?;
    Ok(())
}

/// `<dir>/<stem>.roles.json`, next to the scene file unless an output directory is given.
pub fn report_path(scene: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = scene
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scene".to_string());
    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| scene.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(format!("{stem}.roles.json"))
}
