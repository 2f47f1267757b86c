//! Declared-configuration and state-file I/O.
//!
//! The declaration is TOML, the persisted state JSON. The state file is not
//! a cache: the SSL key and certificate live only there, because no server
//! response ever returns them.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use l7sync_core::{ResourceSpec, ResourceState};

/// Load the declared configuration from a TOML file.
pub fn load_spec(path: &Path) -> Result<ResourceSpec> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    let spec = toml::from_str(&content)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(spec)
}

/// Load the last-known state, if a previous pass wrote one.
pub fn load_state(path: &Path) -> Result<Option<ResourceState>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("cannot read state {}", path.display()))?;
    let state = serde_json::from_str(&content)
        .with_context(|| format!("invalid state {}", path.display()))?;
    Ok(Some(state))
}

/// Persist the converged state for the next pass.
pub fn save_state(path: &Path, state: &ResourceState) -> Result<()> {
    let content = serde_json::to_string_pretty(state)?;
    fs::write(path, content).with_context(|| format!("cannot write state {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use l7sync_core::OriginSpec;

    #[test]
    fn spec_loads_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edge1.toml");
        fs::write(
            &path,
            r#"
name = "edge1"
is_active = 0
service_http2 = 1

[[origins]]
ip = "10.0.0.1"
weight = 10

[[origins]]
ip = "10.0.0.2"
"#,
        )
        .unwrap();

        let spec = load_spec(&path).unwrap();
        assert_eq!(spec.name, "edge1");
        assert_eq!(spec.is_active, Some(0));
        assert_eq!(spec.service_http2, Some(1));
        assert_eq!(spec.cdn, None);
        assert_eq!(
            spec.origins,
            vec![
                OriginSpec {
                    ip: "10.0.0.1".into(),
                    weight: Some(10),
                    mode: None,
                },
                OriginSpec {
                    ip: "10.0.0.2".into(),
                    weight: None,
                    mode: None,
                },
            ]
        );
    }

    #[test]
    fn state_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edge1.state.json");

        let mut state = ResourceState::default();
        state.resource.l7_resource_id = 1234;
        state.resource.custom_ssl_key = "-----KEY-----".into();

        save_state(&path, &state).unwrap();
        let loaded = load_state(&path).unwrap().unwrap();
        assert_eq!(loaded, state);
        assert_eq!(loaded.resource.custom_ssl_key, "-----KEY-----");
    }

    #[test]
    fn missing_state_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_state(&dir.path().join("absent.json"))
            .unwrap()
            .is_none());
    }
}
