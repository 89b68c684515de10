//! Viewer configuration, loaded from YAML.
//!
//! ```yaml
//! spreadsheet_id: 1AbC...
//! default_rows_per_page: 50
//! cache:
//!   page_ttl_ms: 60000
//! worksheets:
//!   - title: Alunos
//!     gid: 0
//!   - title: Notas
//!     gid: 1538400201
//!     label: Notas finais
//! columns:
//!   Notas:
//!     hide: [id]
//!     rename: { nota: Nota }
//!     default_sort: { column: Nota, direction: desc }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sheetview_cache::Cache;
use sheetview_core::{ViewError, ViewResult, Worksheet, WorksheetId};
use sheetview_http::{DEFAULT_BASE_URL, DEFAULT_DISCOVERY_URL};
use sheetview_sheet::{ColumnConfig, Locale};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Key prefix, shared by every entry of this viewer.
    pub prefix: String,
    /// Directory for file-backed entries. In-memory when unset.
    pub dir: Option<PathBuf>,
    pub page_ttl_ms: u64,
    pub count_ttl_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prefix: "sv".to_string(),
            dir: None,
            page_ttl_ms: 5 * 60 * 1000,
            count_ttl_ms: 30 * 60 * 1000,
        }
    }
}

/// A statically configured worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorksheetEntry {
    pub title: String,
    #[serde(default)]
    pub gid: Option<u64>,
    /// Worksheet name used for `sheet=` addressing. Defaults to the title.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

fn enabled_default() -> bool {
    true
}

impl WorksheetEntry {
    pub fn to_worksheet(&self) -> Worksheet {
        let id = match (self.gid, &self.name) {
            (Some(gid), _) => WorksheetId::Gid(gid),
            (None, Some(name)) => WorksheetId::Name(name.clone()),
            (None, None) => WorksheetId::Name(self.title.clone()),
        };
        let worksheet = Worksheet::new(self.title.clone(), id);
        match &self.label {
            Some(label) => worksheet.with_label(label.clone()),
            None => worksheet,
        }
    }
}

/// Everything a viewer needs to know about one spreadsheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub spreadsheet_id: String,
    pub base_url: String,
    /// Discovery URL template; `{base}` and `{id}` are substituted.
    pub discovery_url: String,
    pub request_timeout_ms: u64,
    pub default_rows_per_page: usize,
    pub max_rows_per_page: usize,
    pub header_rows: u32,
    /// Column counted by the row-count query.
    pub count_column: String,
    pub cache: CacheConfig,
    pub locale: Locale,
    /// When non-empty, discovery is skipped and the enabled entries are used.
    pub worksheets: Vec<WorksheetEntry>,
    /// Column settings keyed by worksheet title, label or id.
    pub columns: IndexMap<String, ColumnConfig>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            discovery_url: DEFAULT_DISCOVERY_URL.to_string(),
            request_timeout_ms: 30_000,
            default_rows_per_page: 25,
            max_rows_per_page: 1000,
            header_rows: 1,
            count_column: "A".to_string(),
            cache: CacheConfig::default(),
            locale: Locale::default(),
            worksheets: Vec::new(),
            columns: IndexMap::new(),
        }
    }
}

impl ViewerConfig {
    pub fn new(spreadsheet_id: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            ..Self::default()
        }
    }

    /// Read a YAML file. The result is not validated yet so that command-line
    /// overrides can be applied first.
    pub fn load(path: &Path) -> ViewResult<Self> {
        let file = File::open(path)
            .map_err(|e| ViewError::Config(format!("cannot open {}: {e}", path.display())))?;
        serde_yaml::from_reader(BufReader::new(file))
            .map_err(|e| ViewError::Yaml(format!("{}: {e}", path.display())))
    }

    pub fn from_yaml_str(yaml: &str) -> ViewResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| ViewError::Yaml(e.to_string()))
    }

    pub fn validate(&self) -> ViewResult<()> {
        if self.spreadsheet_id.trim().is_empty() {
            return Err(ViewError::Config("spreadsheet_id is required".into()));
        }
        if self.default_rows_per_page == 0 || self.max_rows_per_page == 0 {
            return Err(ViewError::Config("rows per page must be at least 1".into()));
        }
        if self.request_timeout_ms == 0 {
            return Err(ViewError::Config("request_timeout_ms must be positive".into()));
        }
        if self.locale.decimal_separator == self.locale.thousands_separator {
            return Err(ViewError::Config(format!(
                "decimal and thousands separators are both '{}'",
                self.locale.decimal_separator
            )));
        }
        if let Some(entry) = self.worksheets.iter().find(|w| w.title.trim().is_empty()) {
            return Err(ViewError::Config(format!(
                "worksheet entry without a title (gid {:?})",
                entry.gid
            )));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn page_ttl(&self) -> Duration {
        Duration::from_millis(self.cache.page_ttl_ms)
    }

    pub fn count_ttl(&self) -> Duration {
        Duration::from_millis(self.cache.count_ttl_ms)
    }

    /// Page size actually used: the default when unset, clamped to `1..=max`.
    pub fn clamp_page_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_rows_per_page)
            .clamp(1, self.max_rows_per_page.max(1))
    }

    /// Enabled statically configured worksheets, if any are configured.
    pub fn static_worksheets(&self) -> Option<Vec<Worksheet>> {
        if self.worksheets.is_empty() {
            return None;
        }
        Some(
            self.worksheets
                .iter()
                .filter(|w| w.enabled)
                .map(WorksheetEntry::to_worksheet)
                .collect(),
        )
    }

    /// Column settings for a worksheet, looked up by title, then label, then id.
    pub fn columns_for(&self, worksheet: &Worksheet) -> Option<&ColumnConfig> {
        self.columns
            .get(&worksheet.title)
            .or_else(|| worksheet.label.as_ref().and_then(|l| self.columns.get(l)))
            .or_else(|| self.columns.get(&worksheet.id.to_string()))
    }

    /// Cache described by the `cache` section.
    pub fn build_cache(&self) -> Cache {
        match (self.cache.enabled, &self.cache.dir) {
            (false, _) => Cache::disabled(),
            (true, Some(dir)) => Cache::file(dir.clone()),
            (true, None) => Cache::memory(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetview_core::SortDirection;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::new("abc");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.page_ttl(), Duration::from_secs(300));
        assert_eq!(config.count_ttl(), Duration::from_secs(1800));
        assert_eq!(config.clamp_page_size(None), 25);
        assert_eq!(config.clamp_page_size(Some(0)), 1);
        assert_eq!(config.clamp_page_size(Some(5000)), 1000);
        assert!(config.validate().is_ok());
        assert!(config.static_worksheets().is_none());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r"
spreadsheet_id: abc
default_rows_per_page: 50
cache:
  enabled: false
locale:
  decimal_separator: '.'
  thousands_separator: ','
worksheets:
  - title: Alunos
    gid: 0
  - title: Notas
    gid: 1538400201
    label: Notas finais
  - title: Rascunho
    enabled: false
  - title: Extra
    name: Aba Extra
columns:
  Notas finais:
    hide: [id]
    rename: { nota: Nota }
    default_sort: { column: Nota, direction: desc }
";
        let config = ViewerConfig::from_yaml_str(yaml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.default_rows_per_page, 50);
        assert_eq!(config.max_rows_per_page, 1000);
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.prefix, "sv");
        assert_eq!(config.locale.decimal_separator, '.');
        // Unset locale fields keep their defaults
        assert_eq!(config.locale.yes, "SIM");

        let sheets = config.static_worksheets().unwrap();
        assert_eq!(sheets.len(), 3);
        assert_eq!(sheets[1].id, WorksheetId::Gid(1_538_400_201));
        assert_eq!(sheets[1].display_name(), "Notas finais");
        assert_eq!(sheets[2].id, WorksheetId::Name("Aba Extra".into()));

        let columns = config.columns_for(&sheets[1]).unwrap();
        assert_eq!(columns.hide, vec!["id"]);
        let sort = columns.default_sort.as_ref().unwrap();
        assert_eq!(sort.direction, SortDirection::Desc);
        assert!(config.columns_for(&sheets[0]).is_none());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = ViewerConfig::default();
        assert!(config.validate().is_err());

        config.spreadsheet_id = "abc".into();
        config.max_rows_per_page = 0;
        assert!(config.validate().is_err());

        config.max_rows_per_page = 10;
        config.locale = Locale::default().with_separators(',', ',');
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("separators"));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = ViewerConfig::from_yaml_str("default_rows_per_page: [1, 2]").unwrap_err();
        assert!(matches!(err, ViewError::Yaml(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ViewerConfig::load(Path::new("/nonexistent/sheetview.yaml")).unwrap_err();
        assert!(matches!(err, ViewError::Config(_)));
    }
}
