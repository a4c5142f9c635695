//! Load `.capsflow.toml` from a directory (CLI only). Library callers pass paths directly.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct CapsflowToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsSection {
    input: Option<String>,
    output: Option<String>,
    verbose: Option<bool>,
    atomic: Option<bool>,
    json: Option<bool>,
}

/// Load the config file from `dir`. `Ok(None)` when there is no file. Runs before logging is
/// set up, so parse errors are returned for the caller to report.
pub fn load_capsflow_toml(dir: &Path) -> Result<Option<CapsflowToml>> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("read {}", path.display())),
    };
    let file = parse_capsflow_toml(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(file))
}

pub fn parse_capsflow_toml(s: &str) -> std::result::Result<CapsflowToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($settings:expr, $opts:expr, $field:ident) => {
        if let Some(v) = $settings.$field {
            $opts.$field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI flags.
pub fn apply_file_to_opts(file: &CapsflowToml, opts: &mut Opts) {
    let settings = &file.settings;
    if let Some(ref p) = settings.input {
        opts.input = PathBuf::from(p);
    }
    if let Some(ref p) = settings.output {
        opts.output = PathBuf::from(p);
    }
    apply_file_opt!(settings, opts, verbose);
    apply_file_opt!(settings, opts, atomic);
    apply_file_opt!(settings, opts, json);
}
