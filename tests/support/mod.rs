use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn build_registry_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_build-registry"))
}

/// A throwaway repository with `registry.json` and `registry/` sources.
pub struct FixtureRepo {
    temp: TempDir,
}

impl FixtureRepo {
    pub fn new(registry: &Value) -> Result<Self> {
        let temp = TempDir::new().context("failed to allocate fixture repo")?;
        fs::create_dir_all(temp.path().join("registry"))?;
        let repo = Self { temp };
        repo.write_registry(registry)?;
        Ok(repo)
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn write_registry(&self, registry: &Value) -> Result<()> {
        fs::write(
            self.root().join("registry.json"),
            serde_json::to_string_pretty(registry)?,
        )
        .context("failed to write registry.json")
    }

    pub fn write_source(&self, relative: &str, contents: &str) -> Result<()> {
        let path = self.root().join("registry").join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))
    }

    pub fn public(&self, relative: &str) -> PathBuf {
        self.root().join("public/r").join(relative)
    }

    pub fn module(&self) -> PathBuf {
        self.root().join("__registry__/index.tsx")
    }

    pub fn read_json(&self, path: &Path) -> Result<Value> {
        let text =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
    }

    /// `build-registry --root <fixture>` with extra args; RUST_LOG is cleared
    /// so the caller's environment cannot change the output.
    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(build_registry_binary());
        cmd.arg("--root").arg(self.root()).args(args);
        cmd.env_remove("RUST_LOG")
            .env_remove("REGISTRY_PUBLIC_DIR")
            .env_remove("REGISTRY_MODULE_DIR")
            .env_remove("REGISTRY_MODULE_EXT");
        cmd
    }
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

/// Every file under `dir`, keyed by relative path, for byte comparisons.
pub fn snapshot(dir: &Path) -> Result<Vec<(String, Vec<u8>)>> {
    let mut files = Vec::new();
    collect(dir, dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect(base: &Path, dir: &Path, files: &mut Vec<(String, Vec<u8>)>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect(base, &path, files)?;
        } else {
            let relative = path.strip_prefix(base)?.display().to_string();
            files.push((relative, fs::read(&path)?));
        }
    }
    Ok(())
}
