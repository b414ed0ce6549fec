use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io::Write;
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::{debug, warn};

use crate::config::ConfigManager;

const LAYOUTS_SUBDIR: &str = "layouts";
const FILE_PREFIX: &str = "layout_";

/// A named, saved list of charts to render together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLayout {
    pub id: String,
    pub name: String,
    /// Chart ids or column names, in display order.
    pub charts: Vec<String>,
}

pub struct ReportLayoutStore {
    config: ConfigManager,
    layouts: Vec<ReportLayout>,
    pub(crate) layouts_dir: PathBuf,
}

impl ReportLayoutStore {
    pub fn new(config: &ConfigManager) -> Result<Self> {
        // The directory is only created when a layout is saved
        let layouts_dir = config.config_dir().join(LAYOUTS_SUBDIR);

        let mut store = Self {
            config: config.clone(),
            layouts: Vec::new(),
            layouts_dir,
        };
        store.load_layouts()?;
        Ok(store)
    }

    pub fn load_layouts(&mut self) -> Result<()> {
        self.layouts.clear();

        if !self.layouts_dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(&self.layouts_dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not read layout file");
                    continue;
                }
            };
            match serde_json::from_str::<ReportLayout>(&content) {
                Ok(layout) => self.layouts.push(layout),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not parse layout file");
                }
            }
        }

        // read_dir order is platform dependent
        self.layouts.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(count = self.layouts.len(), "loaded report layouts");
        Ok(())
    }

    fn layout_path(&self, id: &str) -> PathBuf {
        self.layouts_dir.join(format!("{FILE_PREFIX}{id}.json"))
    }

    pub fn save_layout(&self, layout: &ReportLayout) -> Result<()> {
        self.config.ensure_subdir(LAYOUTS_SUBDIR)?;

        let json = serde_json::to_string_pretty(layout)?;

        use fs2::FileExt;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(self.layout_path(&layout.id))?;

        file.lock_exclusive()?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        file.unlock()?;

        Ok(())
    }

    /// Save a new layout, replacing any existing layout with the same name.
    pub fn create_layout(&mut self, name: String, charts: Vec<String>) -> Result<ReportLayout> {
        if name.trim().is_empty() {
            return Err(eyre!("Layout name cannot be empty"));
        }
        if charts.is_empty() {
            return Err(eyre!("Layout '{}' must name at least one chart", name));
        }

        if let Some(existing) = self.layout_by_name(&name).map(|l| l.id.clone()) {
            self.delete_layout(&existing)?;
        }

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
            .hash(&mut hasher);
        let id = format!("{:016x}", hasher.finish());

        let layout = ReportLayout { id, name, charts };
        self.save_layout(&layout)?;
        self.load_layouts()?;

        Ok(layout)
    }

    pub fn delete_layout(&mut self, id: &str) -> Result<()> {
        let file_path = self.layout_path(id);
        if file_path.exists() {
            fs::remove_file(&file_path)?;
        }
        self.layouts.retain(|l| l.id != id);
        Ok(())
    }

    pub fn layout_by_name(&self, name: &str) -> Option<&ReportLayout> {
        self.layouts.iter().find(|l| l.name == name)
    }

    pub fn all_layouts(&self) -> &[ReportLayout] {
        &self.layouts
    }

    /// Delete every saved layout file and return how many were removed.
    pub fn remove_all_layouts(&mut self) -> Result<usize> {
        let mut removed = 0;
        if self.layouts_dir.exists() {
            for entry in fs::read_dir(&self.layouts_dir)? {
                let path = entry?.path();
                let is_layout = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|s| s.starts_with(FILE_PREFIX) && s.ends_with(".json"))
                    .unwrap_or(false);
                if path.is_file() && is_layout {
                    fs::remove_file(&path)?;
                    removed += 1;
                }
            }
        }
        self.layouts.clear();
        Ok(removed)
    }
}
