use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::table::ColumnMapping;
use crate::visual::{Palette, ViewerConfig};
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub chemicals: Option<PathBuf>,
    pub genes: Option<PathBuf>,
    pub interactions: Option<PathBuf>,
    pub limit: Option<usize>,
    pub columns: Option<ColumnMapping>,
    pub palette: Option<Palette>,
    pub viewer: Option<ViewerConfig>,
}

impl Config {
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&data)?;
        Ok(cfg)
    }
}
