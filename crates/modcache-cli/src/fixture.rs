use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use modcache_fetch::FakeDriver;
use serde::Deserialize;

/// On-disk shape for `--offline --fixture <file>`. Artifact bytes are plain
/// UTF-8 strings rather than real module archives — this is a harness for
/// exercising the classify/cache/driver pipeline offline, not a zip builder.
#[derive(Debug, Deserialize, Default)]
struct FixtureFile {
    #[serde(default)]
    resolves: HashMap<String, FixtureResolve>,
    #[serde(default)]
    lists: HashMap<String, Vec<String>>,
    #[serde(default)]
    artifacts: HashMap<String, FixtureArtifact>,
}

#[derive(Debug, Deserialize)]
struct FixtureResolve {
    version: String,
    time: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Default)]
struct FixtureArtifact {
    #[serde(default)]
    info: String,
    #[serde(default)]
    go_mod: String,
    #[serde(default)]
    zip: String,
}

pub fn load_fake_driver(path: Option<&Path>) -> Result<FakeDriver> {
    let fixture = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path).with_context(|| format!("reading fixture file {}", path.display()))?;
            serde_json::from_str::<FixtureFile>(&raw).with_context(|| format!("parsing fixture file {}", path.display()))?
        }
        None => FixtureFile::default(),
    };

    let mut builder = FakeDriver::builder();
    for (mod_at_ver, resolve) in fixture.resolves {
        builder = builder.with_resolve(mod_at_ver, resolve.version, resolve.time);
    }
    for (module_path, versions) in fixture.lists {
        builder = builder.with_list(module_path, versions);
    }
    for (mod_at_ver, artifact) in fixture.artifacts {
        builder = builder.with_artifact(mod_at_ver, artifact.info.into_bytes(), artifact.go_mod.into_bytes(), artifact.zip.into_bytes());
    }
    Ok(builder.build())
}
