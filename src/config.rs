//! Configuration handling for course-lint

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[from] std::io::Error),
    #[error("Failed to parse JSON config: {0}")]
    ParseJson(#[from] serde_json::Error),
    #[error("Failed to parse YAML config: {0}")]
    ParseYaml(#[from] serde_yaml::Error),
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(#[from] globset::Error),
}

/// Config file names, searched from the scan root upwards
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".courselintrc.json",
    ".courselintrc.yaml",
    ".courselintrc.yml",
    "courselint.json",
    "courselint.yaml",
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Selectors, class names and URL fragments the rules check against.
///
/// All of these are institution-specific data; the rules read them from here only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleConfig {
    /// File paths containing this (case-insensitive) need no page header
    pub syllabus_marker: String,
    /// Legacy jQuery CDN script that must not be loaded
    pub jquery_script_src: String,
    /// Class of the page header element
    pub header_class: String,
    /// Ids of the `div` that must hold the page content
    pub content_wrapper_ids: Vec<String>,
    /// Class of the main content container
    pub content_body_class: String,
    /// Wrapper ids a `.content-body` may sit under
    pub content_body_parents: Vec<String>,
    /// Selectors that must not appear inside a `.content-body`
    pub content_body_forbidden_nested: Vec<String>,
    /// Class names and ids from retired templates
    pub deprecated_names: Vec<String>,
    /// Class every regular table carries
    pub display_lg_class: String,
    /// Classes marking a vertical (row-wise) table
    pub vert_table_classes: Vec<String>,
    /// Iframe title fragments left over from copy-pasted embed codes
    pub titles_to_check: Vec<String>,
    /// Iframe URLs exempt from the title check
    pub iframes_to_exclude: Vec<String>,
    /// `src` fragments identifying an H5P activity
    pub h5p_url_patterns: Vec<String>,
    /// `src` fragments identifying a video that needs the media wrappers
    pub media_url_patterns: Vec<String>,
    /// `src` fragments identifying a Panopto player
    pub panopto_url_patterns: Vec<String>,
    /// `aria-label` of the Panopto player, compared case-insensitively
    pub panopto_aria_label: String,
    /// Class of the `div` directly wrapping a video iframe
    pub media_object_class: String,
    /// Class of the `div` around the media object
    pub media_container_class: String,
    /// Class of the caption block next to the media object
    pub media_info_class: String,
    /// Attributes that should not be left on `<img>`
    pub image_attributes_to_remove: Vec<String>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            syllabus_marker: "syllabus".to_string(),
            jquery_script_src: "https://cdn.jsdelivr.net/npm/jquery/dist/jquery.min.js".to_string(),
            header_class: "header".to_string(),
            content_wrapper_ids: strings(&["content-wrapper", "first-column"]),
            content_body_class: "content-body".to_string(),
            content_body_parents: strings(&[
                "content-wrapper",
                "first-column",
                "second-column",
                "third-column",
            ]),
            content_body_forbidden_nested: strings(&[".content-body", "header"]),
            deprecated_names: strings(&["main", "main-two-column", "sidebar", "video-container"]),
            display_lg_class: "display-lg".to_string(),
            vert_table_classes: strings(&["vert-table", "display-vertical", "display-vert"]),
            titles_to_check: strings(&["YouTube video player"]),
            iframes_to_exclude: strings(&[
                "https://www.youtube.com/embed/NpEaa2P7qZI?si=DFcFec4auMcyTLXX",
            ]),
            h5p_url_patterns: strings(&["h5p", "/d2l/common/dialogs/quickLink"]),
            media_url_patterns: strings(&[
                "https://www.youtube.com",
                "https://pima-cc.hosted.panopto.com",
            ]),
            panopto_url_patterns: strings(&["https://pima-cc.hosted.panopto.com"]),
            panopto_aria_label: "Panopto Embedded Video Player".to_string(),
            media_object_class: "media-object".to_string(),
            media_container_class: "media-container".to_string(),
            media_info_class: "media-info".to_string(),
            image_attributes_to_remove: strings(&[
                "decoding",
                "fetchpriority",
                "height",
                "loading",
                "srcset",
                "style",
                "sizes",
                "width",
            ]),
        }
    }
}

impl RuleConfig {
    pub fn is_h5p_src(&self, src: &str) -> bool {
        self.h5p_url_patterns.iter().any(|p| src.contains(p.as_str()))
    }

    pub fn is_panopto(&self, src: &str, aria_label: &str) -> bool {
        self.panopto_url_patterns.iter().any(|p| src.contains(p.as_str()))
            || aria_label.trim().eq_ignore_ascii_case(&self.panopto_aria_label)
    }

    /// Videos that must sit in `div.media-object` inside `div.media-container`
    pub fn is_media_embed(&self, src: &str, aria_label: &str) -> bool {
        self.media_url_patterns.iter().any(|p| src.contains(p.as_str()))
            || self.is_panopto(src, aria_label)
    }

    pub fn is_vertical_table_class(&self, class: &str) -> bool {
        self.vert_table_classes.iter().any(|c| c == class)
    }
}

/// Runtime lint configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Skip these rules
    pub disabled_rules: Vec<String>,
    /// Exclude patterns as written
    pub exclude: Vec<String>,
    /// Compiled exclude patterns, matched relative to the scan root
    pub exclude_patterns: GlobSet,
    /// Number of parallel jobs (0 = auto, 1 = sequential)
    pub jobs: usize,
    /// Rule data table
    pub rules: RuleConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            disabled_rules: Vec::new(),
            exclude: Vec::new(),
            exclude_patterns: GlobSet::empty(),
            jobs: 0,
            rules: RuleConfig::default(),
        }
    }
}

/// CLI options to merge into config
#[derive(Debug, Default)]
pub struct CliOptions {
    /// Rules to disable (adds to config)
    pub disabled_rules: Vec<String>,
    /// Additional exclude patterns
    pub exclude: Vec<String>,
    /// Number of parallel jobs
    pub jobs: Option<usize>,
}

/// Configuration file format (.courselintrc.json or .courselintrc.yaml)
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    /// Rules to ignore/disable
    #[serde(default)]
    pub ignore: Vec<String>,

    /// File/folder patterns to exclude
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Number of parallel jobs (0 = auto)
    #[serde(default)]
    pub jobs: usize,

    /// Rule data overrides; missing keys keep their defaults
    #[serde(default)]
    pub rules: RuleConfig,
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_str_with_format(&content, Self::is_yaml(path))
    }

    fn is_yaml(path: &Path) -> bool {
        path.extension().is_some_and(|e| e == "yaml" || e == "yml")
    }

    /// Parse configuration text as YAML or JSON
    pub fn from_str_with_format(content: &str, yaml: bool) -> Result<Self, ConfigError> {
        let config_file: ConfigFile = if yaml {
            serde_yaml::from_str(content)?
        } else {
            serde_json::from_str(content)?
        };

        Self::from_config_file(config_file)
    }

    /// Try to find and load config from the start directory or any parent
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        let mut current = start_dir.to_path_buf();
        loop {
            for name in CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.is_file() {
                    let config = Self::from_file(&config_path)?;
                    return Ok(Some((config_path, config)));
                }
            }

            if !current.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Build config from a ConfigFile
    fn from_config_file(file: ConfigFile) -> Result<Self, ConfigError> {
        Ok(Self {
            disabled_rules: file.ignore,
            exclude_patterns: build_globset(&file.exclude)?,
            exclude: file.exclude,
            jobs: file.jobs,
            rules: file.rules,
        })
    }

    /// Merge CLI options; CLI settings take precedence
    pub fn merge_cli(&mut self, options: CliOptions) -> Result<(), ConfigError> {
        for rule in options.disabled_rules {
            if !self.disabled_rules.contains(&rule) {
                self.disabled_rules.push(rule);
            }
        }

        if !options.exclude.is_empty() {
            self.exclude.extend(options.exclude);
            self.exclude_patterns = build_globset(&self.exclude)?;
        }

        if let Some(jobs) = options.jobs {
            self.jobs = jobs;
        }

        Ok(())
    }

    /// Check if a rule is enabled
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        !self.disabled_rules.iter().any(|r| r == rule_id)
    }

    /// Check if a path (relative to the scan root) is excluded
    pub fn is_file_excluded(&self, relative: &Path) -> bool {
        self.exclude_patterns.is_match(relative)
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_rule_table() {
        let rules = RuleConfig::default();
        assert_eq!(rules.deprecated_names.len(), 4);
        assert!(rules.deprecated_names.contains(&"sidebar".to_string()));
        assert_eq!(rules.image_attributes_to_remove.len(), 8);
        assert_eq!(rules.display_lg_class, "display-lg");
        assert_eq!(rules.content_body_parents[1], "first-column");
        assert_eq!(rules.content_wrapper_ids, vec!["content-wrapper", "first-column"]);
        assert_eq!(rules.media_object_class, "media-object");
        assert_eq!(rules.media_container_class, "media-container");
        assert_eq!(rules.media_info_class, "media-info");
    }

    #[test]
    fn test_layout_names_from_yaml() {
        let yaml = "rules:\n  contentWrapperIds: [page-main]\n  mediaObjectClass: video-frame\n";
        let config = Config::from_str_with_format(yaml, true).unwrap();
        assert_eq!(config.rules.content_wrapper_ids, vec!["page-main".to_string()]);
        assert_eq!(config.rules.media_object_class, "video-frame");
        assert_eq!(config.rules.media_container_class, "media-container");
    }

    #[test]
    fn test_iframe_classification() {
        let rules = RuleConfig::default();
        assert!(rules.is_h5p_src("https://pima.h5p.com/content/123/embed"));
        assert!(rules.is_h5p_src("/d2l/common/dialogs/quickLink/quickLink.d2l?ou=1"));
        assert!(!rules.is_h5p_src("https://www.youtube.com/embed/abc"));

        assert!(rules.is_panopto("https://pima-cc.hosted.panopto.com/Panopto/Embed.aspx", ""));
        assert!(rules.is_panopto("", " panopto embedded video player "));
        assert!(!rules.is_panopto("https://www.youtube.com/embed/abc", ""));

        assert!(rules.is_media_embed("https://www.youtube.com/embed/abc", ""));
        assert!(!rules.is_media_embed("https://example.com/widget", "Map"));
    }

    #[test]
    fn test_parse_json_config() {
        let json = r#"{
            "ignore": ["img-unwanted-attributes"],
            "exclude": ["archive/**"],
            "jobs": 1,
            "rules": { "deprecatedNames": ["legacy"] }
        }"#;
        let config = Config::from_str_with_format(json, false).unwrap();

        assert!(!config.is_rule_enabled("img-unwanted-attributes"));
        assert!(config.is_rule_enabled("doctype"));
        assert_eq!(config.jobs, 1);
        assert_eq!(config.rules.deprecated_names, vec!["legacy".to_string()]);
        // Untouched keys keep their defaults
        assert_eq!(config.rules.display_lg_class, "display-lg");
        assert!(config.is_file_excluded(Path::new("archive/old/page.html")));
        assert!(!config.is_file_excluded(Path::new("week1/page.html")));
    }

    #[test]
    fn test_parse_yaml_config() {
        let yaml = "ignore:\n  - script-placement\nrules:\n  titlesToCheck:\n    - Vimeo player\n";
        let config = Config::from_str_with_format(yaml, true).unwrap();

        assert!(!config.is_rule_enabled("script-placement"));
        assert_eq!(config.rules.titles_to_check, vec!["Vimeo player".to_string()]);
    }

    #[test]
    fn test_invalid_glob() {
        let json = r#"{ "exclude": ["a/[b"] }"#;
        let err = Config::from_str_with_format(json, false).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGlob(_)));
    }

    #[test]
    fn test_find_and_load_walks_up() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("course/week1");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(".courselintrc.json"), r#"{ "jobs": 3 }"#).unwrap();

        let (path, config) = Config::find_and_load(&nested).unwrap().unwrap();
        assert_eq!(path, dir.path().join(".courselintrc.json"));
        assert_eq!(config.jobs, 3);
    }

    #[test]
    fn test_merge_cli() {
        let mut config = Config::from_str_with_format(r#"{ "ignore": ["a"], "exclude": ["x/**"] }"#, false).unwrap();
        config
            .merge_cli(
                CliOptions {
                    disabled_rules: vec!["a".to_string(), "b".to_string()],
                    exclude: vec!["y/**".to_string()],
                    jobs: Some(1),
                },
            )
            .unwrap();

        assert_eq!(config.disabled_rules, vec!["a".to_string(), "b".to_string()]);
        assert!(config.is_file_excluded(Path::new("x/p.html")));
        assert!(config.is_file_excluded(Path::new("y/p.html")));
        assert_eq!(config.jobs, 1);
    }
}
