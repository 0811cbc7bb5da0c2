//! 测试用的内存 SDK：记录每次调用，把模型"转换"成 SDK 自己的版本。

use super::Sdk;
use crate::error::{OsmUpgradeError, Result};
use crate::models::SdkVersion;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkCall {
    Load(PathBuf),
    Save(PathBuf, bool),
}

pub struct FakeSdk {
    version: String,
    failing: HashSet<PathBuf>,
    refuse_save: bool,
    calls: Mutex<Vec<SdkCall>>,
}

pub struct FakeModel {
    content: String,
}

impl FakeSdk {
    pub fn new(version: &str) -> Self {
        FakeSdk {
            version: version.to_string(),
            failing: HashSet::new(),
            refuse_save: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_load(mut self, path: &Path) -> Self {
        self.failing.insert(path.to_path_buf());
        self
    }

    pub fn refusing_save(mut self) -> Self {
        self.refuse_save = true;
        self
    }

    pub fn calls(&self) -> Vec<SdkCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn loads(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SdkCall::Load(_)))
            .count()
    }

    /// 最小的 OSM 内容
    pub fn osm(version: &str) -> String {
        format!(
            "OS:Version,\n  {{00000000-0000-0000-0000-000000000000}}, !- Handle\n  {};  !- Version Identifier\n",
            version
        )
    }
}

impl Sdk for FakeSdk {
    type Model = FakeModel;

    fn version(&self) -> Result<SdkVersion> {
        SdkVersion::parse(&self.version)
    }

    fn load_model(&self, path: &Path) -> Result<Option<FakeModel>> {
        self.calls
            .lock()
            .unwrap()
            .push(SdkCall::Load(path.to_path_buf()));

        if self.failing.contains(path) {
            return Ok(None);
        }

        fs::read_to_string(path).map_err(|e| OsmUpgradeError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        let core = SdkVersion::parse(&self.version)?.core();
        Ok(Some(FakeModel {
            content: FakeSdk::osm(&core.to_string()),
        }))
    }

    fn save_model(&self, model: FakeModel, path: &Path, overwrite: bool) -> Result<bool> {
        self.calls
            .lock()
            .unwrap()
            .push(SdkCall::Save(path.to_path_buf(), overwrite));

        if self.refuse_save || (!overwrite && path.exists()) {
            return Ok(false);
        }

        fs::write(path, model.content).map_err(|e| OsmUpgradeError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(true)
    }
}
