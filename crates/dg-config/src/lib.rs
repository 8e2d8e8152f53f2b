//! Configuration management for docsgraph.
//!
//! Parses `docsgraph.toml` with serde and provides auto-discovery of the
//! config file in parent directories. CLI settings are applied during load
//! via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.url`
//! - `docs.edit_base_url`
//! - `server.host`
//!
//! ## Example
//!
//! ```toml
//! [site]
//! name = "Documentation"
//! org = "Acme"
//! url = "${SITE_URL:-https://docs.acme.dev}"
//!
//! [docs]
//! source_dir = "docs"
//! edit_base_url = "https://github.com/acme"
//!
//! [[sections]]
//! id = "_root"
//! label = "General"
//! icon = "home"
//! repo = { name = "acme-docs", branch = "main", docs_path = "docs" }
//! ```

mod expand;

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docsgraph.toml";

/// Id of the section that owns top-level pages.
const ROOT_SECTION_ID: &str = "_root";

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub source_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub site_url: Option<String>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    /// Paths are relative strings until resolved.
    docs: DocsConfigRaw,
    pub sections: Vec<SectionConfig>,
    pub search: SearchConfig,
    pub server: ServerConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site metadata shown in page chrome.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub org: String,
    /// Defaults to `"{org} {name}"`.
    pub title: Option<String>,
    pub description: String,
    /// Public base URL; normalized to origin plus path without trailing slash.
    pub url: String,
    pub logo_asset_path: String,
    pub theme_color: String,
    pub header_buttons: Vec<HeaderButton>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Documentation".to_owned(),
            org: String::new(),
            title: None,
            description: String::new(),
            url: "http://localhost".to_owned(),
            logo_asset_path: "/logo.svg".to_owned(),
            theme_color: "#1a191f".to_owned(),
            header_buttons: Vec::new(),
        }
    }
}

impl SiteConfig {
    /// Title of the site, falling back to org and name.
    #[must_use]
    pub fn title(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => format!("{} {}", self.org, self.name).trim().to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderButton {
    pub href: String,
    pub label: String,
    pub icon: String,
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
    assets_public_path: Option<String>,
    edit_base_url: Option<String>,
}

/// Resolved docs configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Markdown sources.
    pub source_dir: PathBuf,
    /// Where generated artifacts are written.
    pub output_dir: PathBuf,
    /// URL prefix under which docs assets are served.
    pub assets_public_path: String,
    /// Base URL for "edit this page" links (e.g., `https://github.com/org`).
    pub edit_base_url: String,
}

/// One `[[sections]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SectionConfig {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub icon: String,
    pub repo: RepoConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoConfig {
    pub name: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default = "default_docs_path")]
    pub docs_path: String,
}

fn default_branch() -> String {
    "main".to_owned()
}

fn default_docs_path() -> String {
    "docs".to_owned()
}

/// Search index settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub fuzzy: f64,
    pub prefix: bool,
    /// `"AND"` or `"OR"`.
    pub combine_with: String,
    pub max_index_text_length: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fuzzy: 0.15,
            prefix: true,
            combine_with: "AND".to_owned(),
            max_index_text_length: 600,
        }
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

/// Public site settings written to `site-public.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePublicConfig {
    pub site: SitePublic,
    pub sections: BTreeMap<String, SectionIcon>,
    pub site_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePublic {
    pub name: String,
    pub org: String,
    pub title: String,
    pub description: String,
    pub logo_asset_path: String,
    pub header_buttons: Vec<HeaderButton>,
    pub theme_color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionIcon {
    pub icon: String,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.url`").
        field: String,
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Normalize a site URL to origin plus path, without trailing slash.
///
/// # Errors
///
/// Returns `ConfigError::Validation` unless the URL uses http or https and
/// has a host.
pub fn normalize_site_url(raw: &str) -> Result<String, ConfigError> {
    let raw = raw.trim();
    let (scheme, rest) = raw
        .split_once("://")
        .ok_or_else(|| ConfigError::Validation(format!("Invalid site.url value '{raw}'")))?;
    let scheme = scheme.to_ascii_lowercase();
    if scheme != "http" && scheme != "https" {
        return Err(ConfigError::Validation(format!(
            "site.url must use http or https, got '{scheme}:'"
        )));
    }

    let rest = rest.split(['?', '#']).next().unwrap_or_default();
    let (authority, path) = rest.find('/').map_or((rest, ""), |idx| rest.split_at(idx));
    if authority.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid site.url value '{raw}'"
        )));
    }

    Ok(format!(
        "{scheme}://{}{}",
        authority.to_ascii_lowercase(),
        path.trim_end_matches('/')
    ))
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise, searches
    /// for `docsgraph.toml` in the current directory and its parents, falling
    /// back to defaults.
    ///
    /// CLI settings are applied after path resolution and take precedence.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the result does not validate.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.site.url = normalize_site_url(&config.site.url)?;
        config.validate()?;

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.docs_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(site_url) = &settings.site_url {
            self.site.url.clone_from(site_url);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Defaults with paths relative to `base` and a single root section.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfig::default(),
            docs: DocsConfigRaw::default(),
            sections: vec![SectionConfig {
                id: ROOT_SECTION_ID.to_owned(),
                label: "General".to_owned(),
                order: 0,
                icon: "home".to_owned(),
                repo: RepoConfig {
                    name: "docs".to_owned(),
                    branch: default_branch(),
                    docs_path: default_docs_path(),
                },
            }],
            search: SearchConfig::default(),
            server: ServerConfig::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                output_dir: base.join("build"),
                assets_public_path: "/docs-assets".to_owned(),
                edit_base_url: String::new(),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.name, "site.name")?;
        self.validate_sections()?;
        self.validate_search()?;
        self.validate_server()?;
        Ok(())
    }

    fn validate_sections(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for section in &self.sections {
            require_non_empty(&section.id, "sections.id")?;
            if !seen.insert(section.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "Duplicate section id '{}'",
                    section.id
                )));
            }
            let field = |name: &str| format!("sections.{}.{name}", section.id);
            require_non_empty(&section.label, &field("label"))?;
            require_non_empty(&section.repo.name, &field("repo.name"))?;
            require_non_empty(&section.repo.branch, &field("repo.branch"))?;
            require_non_empty(&section.repo.docs_path, &field("repo.docs_path"))?;
        }
        if !seen.contains(ROOT_SECTION_ID) {
            return Err(ConfigError::Validation(format!(
                "Missing section definition for '{ROOT_SECTION_ID}'"
            )));
        }
        Ok(())
    }

    fn validate_search(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.search.fuzzy) {
            return Err(ConfigError::Validation(
                "search.fuzzy must be in [0, 1)".to_owned(),
            ));
        }
        if self.search.max_index_text_length == 0 {
            return Err(ConfigError::Validation(
                "search.max_index_text_length must be greater than 0".to_owned(),
            ));
        }
        if !matches!(self.search.combine_with.as_str(), "AND" | "OR") {
            return Err(ConfigError::Validation(format!(
                "search.combine_with must be \"AND\" or \"OR\", got '{}'",
                self.search.combine_with
            )));
        }
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site.url = expand::expand_env(&self.site.url, "site.url")?;
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        if let Some(ref url) = self.docs.edit_base_url {
            self.docs.edit_base_url = Some(expand::expand_env(url, "docs.edit_base_url")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
            output_dir: resolve(self.docs.output_dir.as_deref(), "build"),
            assets_public_path: self
                .docs
                .assets_public_path
                .clone()
                .unwrap_or_else(|| "/docs-assets".to_owned()),
            edit_base_url: self.docs.edit_base_url.clone().unwrap_or_default(),
        };
    }

    /// Sections sorted by `order`, ties in declaration order.
    #[must_use]
    pub fn ordered_sections(&self) -> Vec<&SectionConfig> {
        let mut sections: Vec<&SectionConfig> = self.sections.iter().collect();
        sections.sort_by_key(|s| s.order);
        sections
    }

    /// Public site settings for the browser.
    #[must_use]
    pub fn site_public(&self) -> SitePublicConfig {
        SitePublicConfig {
            site: SitePublic {
                name: self.site.name.clone(),
                org: self.site.org.clone(),
                title: self.site.title(),
                description: self.site.description.clone(),
                logo_asset_path: self.site.logo_asset_path.clone(),
                header_buttons: self.site.header_buttons.clone(),
                theme_color: self.site.theme_color.clone(),
            },
            sections: self
                .sections
                .iter()
                .map(|s| {
                    (
                        s.id.clone(),
                        SectionIcon {
                            icon: s.icon.clone(),
                        },
                    )
                })
                .collect(),
            site_url: self.site.url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    const FULL_CONFIG: &str = r##"
[site]
name = "Documentation"
org = "Acme"
description = "Acme tools."
url = "https://Docs.Acme.dev/guide/"
theme_color = "#000000"

[[site.header_buttons]]
href = "https://github.com/acme"
label = "GitHub"
icon = "github"

[docs]
source_dir = "content"
output_dir = "out"
edit_base_url = "https://github.com/acme"

[[sections]]
id = "_root"
label = "General"
icon = "home"
repo = { name = "acme-docs" }

[[sections]]
id = "cli"
label = "CLI"
order = 2
icon = "console"
repo = { name = "acme-cli", branch = "develop", docs_path = "documentation" }

[search]
fuzzy = 0.2
combine_with = "OR"

[server]
port = 9000
"##;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7979);
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert_eq!(config.docs_resolved.output_dir, PathBuf::from("/test/build"));
        assert_eq!(config.sections.len(), 1);
        assert_eq!(config.sections[0].id, "_root");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config.site.name, "Documentation");
        assert_eq!(config.search.max_index_text_length, 600);
        assert_eq!(config.sections.len(), 1);
        assert_eq!(config.sections[0].id, "_root");
    }

    #[test]
    fn test_load_full_config() {
        let (dir, path) = write_config(FULL_CONFIG);

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.site.url, "https://docs.acme.dev/guide");
        assert_eq!(config.site.title(), "Acme Documentation");
        assert_eq!(config.docs_resolved.source_dir, dir.path().join("content"));
        assert_eq!(config.docs_resolved.output_dir, dir.path().join("out"));
        assert_eq!(config.docs_resolved.edit_base_url, "https://github.com/acme");
        assert_eq!(config.docs_resolved.assets_public_path, "/docs-assets");
        assert_eq!(config.sections[0].repo.branch, "main");
        assert_eq!(config.sections[0].repo.docs_path, "docs");
        assert_eq!(config.sections[1].repo.branch, "develop");
        assert_eq!(config.search.combine_with, "OR");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/docsgraph.toml")), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_cli_settings_override() {
        let (_dir, path) = write_config(FULL_CONFIG);
        let settings = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(8080),
            source_dir: Some(PathBuf::from("/elsewhere")),
            output_dir: None,
            site_url: Some("http://localhost:5173/".to_owned()),
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/elsewhere"));
        assert_eq!(config.site.url, "http://localhost:5173");
    }

    #[test]
    fn test_missing_root_section() {
        let (_dir, path) = write_config(
            "[[sections]]\nid = \"cli\"\nlabel = \"CLI\"\nrepo = { name = \"cli\" }\n",
        );

        let err = Config::load(Some(&path), None).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Configuration error: Missing section definition for '_root'"
        );
    }

    #[test]
    fn test_duplicate_section() {
        let (_dir, path) = write_config(
            "[[sections]]\nid = \"_root\"\nlabel = \"A\"\nrepo = { name = \"a\" }\n\
             [[sections]]\nid = \"_root\"\nlabel = \"B\"\nrepo = { name = \"b\" }\n",
        );

        let err = Config::load(Some(&path), None).unwrap_err();

        assert_eq!(err.to_string(), "Configuration error: Duplicate section id '_root'");
    }

    #[test]
    fn test_empty_repo_name() {
        let mut config = Config::default_with_base(Path::new("/p"));
        config.sections[0].repo.name = String::new();

        let err = config.validate().unwrap_err();

        assert_eq!(
            err.to_string(),
            "Configuration error: sections._root.repo.name cannot be empty"
        );
    }

    #[test]
    fn test_invalid_search_settings() {
        let mut config = Config::default_with_base(Path::new("/p"));
        config.search.fuzzy = 1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default_with_base(Path::new("/p"));
        config.search.max_index_text_length = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default_with_base(Path::new("/p"));
        config.search.combine_with = "XOR".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_server_port_zero() {
        let mut config = Config::default_with_base(Path::new("/p"));
        config.server.port = 0;

        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "Configuration error: server.port cannot be 0"
        );
    }

    #[test]
    fn test_normalize_site_url() {
        assert_eq!(
            normalize_site_url("https://docs.example.com").unwrap(),
            "https://docs.example.com"
        );
        assert_eq!(
            normalize_site_url("https://docs.example.com/").unwrap(),
            "https://docs.example.com"
        );
        assert_eq!(
            normalize_site_url("HTTP://Example.com/a/b//?q=1#x").unwrap(),
            "http://example.com/a/b"
        );
        assert!(normalize_site_url("ftp://example.com").is_err());
        assert!(normalize_site_url("example.com").is_err());
        assert!(normalize_site_url("https:///path").is_err());
    }

    #[test]
    fn test_ordered_sections() {
        let (_dir, path) = write_config(FULL_CONFIG);
        let config = Config::load(Some(&path), None).unwrap();

        let ids: Vec<&str> = config.ordered_sections().iter().map(|s| s.id.as_str()).collect();

        assert_eq!(ids, vec!["_root", "cli"]);
    }

    #[test]
    fn test_site_public() {
        let (_dir, path) = write_config(FULL_CONFIG);
        let config = Config::load(Some(&path), None).unwrap();

        let value = serde_json::to_value(config.site_public()).unwrap();

        assert_eq!(
            value,
            json!({
                "site": {
                    "name": "Documentation",
                    "org": "Acme",
                    "title": "Acme Documentation",
                    "description": "Acme tools.",
                    "logoAssetPath": "/logo.svg",
                    "headerButtons": [
                        {"href": "https://github.com/acme", "label": "GitHub", "icon": "github"}
                    ],
                    "themeColor": "#000000"
                },
                "sections": {
                    "_root": {"icon": "home"},
                    "cli": {"icon": "console"}
                },
                "siteUrl": "https://docs.acme.dev/guide"
            })
        );
    }
}
