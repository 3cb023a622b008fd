//! Configuration and state files.
//!
//! Both are JSON objects in [`ResourceDocument`] shape. A state file is the
//! document the controller returned last time, identity included.

use std::path::Path;

use kc_provider::ResourceDocument;

/// Reads a configuration document. The file must exist.
pub fn load_document(path: &Path) -> crate::CliResult<ResourceDocument> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| crate::CliError::file(path, e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| crate::CliError::file(path, e.to_string()))
}

/// Reads tracked state, or `None` if the file doesn't exist yet.
pub fn load_state(path: &Path) -> crate::CliResult<Option<ResourceDocument>> {
    if !path.exists() {
        return Ok(None);
    }
    load_document(path).map(Some)
}

/// Reads tracked state that must carry an identity.
pub fn load_tracked(path: &Path) -> crate::CliResult<(String, ResourceDocument)> {
    let state = load_state(path)?
        .ok_or_else(|| crate::CliError::file(path, "no tracked state"))?;
    let id = state
        .id()
        .map(str::to_string)
        .ok_or_else(|| crate::CliError::file(path, "state has no realm id"))?;
    Ok((id, state))
}

/// Writes tracked state, replacing any previous file.
pub fn save_state(path: &Path, state: &ResourceDocument) -> crate::CliResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut content = serde_json::to_string_pretty(state)?;
    content.push('\n');
    std::fs::write(path, content)?;
    tracing::debug!(path = %path.display(), "state written");
    Ok(())
}

/// Removes tracked state. A missing file is fine.
pub fn remove_state(path: &Path) -> crate::CliResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn state_survives_a_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("acme.json");
        let state = ResourceDocument::new()
            .with_id("r-1")
            .with("realm", "acme")
            .with("failure_factor", 0);

        save_state(&path, &state).unwrap();
        let (id, loaded) = load_tracked(&path).unwrap();

        assert_eq!(id, "r-1");
        assert_eq!(loaded, state);
    }

    #[test]
    fn missing_state_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_state(&dir.path().join("none.json")).unwrap().is_none());
        remove_state(&dir.path().join("none.json")).unwrap();
    }

    #[test]
    fn state_without_identity_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("acme.json");
        std::fs::write(&path, json!({"realm": "acme"}).to_string()).unwrap();

        let err = load_tracked(&path).unwrap_err();
        assert!(err.to_string().contains("no realm id"));
    }

    #[test]
    fn non_object_document_is_a_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[1, 2]").unwrap();

        assert!(matches!(load_document(&path), Err(crate::CliError::File { .. })));
    }
}
