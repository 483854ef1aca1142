use std::{fs, path::Path};

use crate::{CompiledDuel, DuelError, DuelSpec};

/// Load a duel spec from YAML on disk.
pub fn load_yaml(path: impl AsRef<Path>) -> Result<DuelSpec, DuelError> {
    let yaml = fs::read_to_string(path)?;
    let spec: DuelSpec = serde_yaml::from_str(&yaml)?;
    Ok(spec)
}

/// Load and compile a duel ruleset from a YAML file.
pub fn compile_yaml(path: impl AsRef<Path>) -> Result<CompiledDuel, DuelError> {
    let spec = load_yaml(path)?;
    spec.compile()
}

/// Serialize and write a duel spec to YAML.
pub fn save_yaml(path: impl AsRef<Path>, spec: &DuelSpec) -> Result<(), DuelError> {
    let yaml = serde_yaml::to_string(spec)?;
    fs::write(path, yaml)?;
    Ok(())
}
