//! Recipe file loading.
//!
//! This module provides:
//! - Loading recipes from a single JSON or TOML file, or every such file in a directory
//! - Schema version checks on load
//! - Reload support that rebuilds the catalog when a tracked file changes

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use larder_common::{SchemaVersion, VersionError};
use larder_core::{Catalog, Recipe};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default location of recipe files.
pub const DEFAULT_RECIPE_PATH: &str = "assets/recipes";

/// Errors that can occur during recipe loading.
#[derive(Debug, Error)]
pub enum RecipeLoadError {
    /// File or directory not found.
    #[error("Recipe path not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read file.
    #[error("Failed to read recipe file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse JSON.
    #[error("Failed to parse recipe JSON in {path}: {source}")]
    JsonParse {
        /// Offending file.
        path: PathBuf,
        /// Parser error.
        source: serde_json::Error,
    },

    /// Failed to parse TOML.
    #[error("Failed to parse recipe TOML in {path}: {source}")]
    TomlParse {
        /// Offending file.
        path: PathBuf,
        /// Parser error.
        source: toml::de::Error,
    },

    /// File extension is neither `json` nor `toml`.
    #[error("Unsupported recipe file format: {0}")]
    UnsupportedFormat(PathBuf),

    /// The file's schema version cannot be read by this build.
    #[error("Recipe file {path} has schema version {found}, expected {expected}.x")]
    IncompatibleVersion {
        /// Offending file.
        path: PathBuf,
        /// Version declared by the file.
        found: SchemaVersion,
        /// Major version this build reads.
        expected: u16,
    },

    /// The file's schema version is malformed.
    #[error("Recipe file {path} has an invalid version: {source}")]
    InvalidVersion {
        /// Offending file.
        path: PathBuf,
        /// Version parse error.
        source: VersionError,
    },
}

/// Result type for recipe loading operations.
pub type RecipeLoadResult<T> = Result<T, RecipeLoadError>;

// ============================================================================
// File formats
// ============================================================================

/// Supported recipe file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeFormat {
    /// `.json`: a recipe array, or an object with `version` and `recipes`.
    Json,
    /// `.toml`: `version` plus `[[recipes]]` tables.
    Toml,
}

impl RecipeFormat {
    /// Detect the format from a file extension (case-insensitive).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// A versioned collection of recipes from a single file.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeFile {
    /// Schema version; absent means the current recipe schema.
    #[serde(default)]
    pub version: Option<String>,
    /// Recipes in this file. Required, so an object of any other shape is rejected.
    pub recipes: Vec<Recipe>,
}

impl RecipeFile {
    /// Parse recipe file contents in the given format.
    ///
    /// `path` is only used to label errors.
    pub fn parse(contents: &str, format: RecipeFormat, path: &Path) -> RecipeLoadResult<Self> {
        match format {
            RecipeFormat::Json => Self::parse_json(contents, path),
            RecipeFormat::Toml => {
                toml::from_str(contents).map_err(|source| RecipeLoadError::TomlParse {
                    path: path.to_path_buf(),
                    source,
                })
            },
        }
    }

    fn parse_json(contents: &str, path: &Path) -> RecipeLoadResult<Self> {
        let json_error = |source| RecipeLoadError::JsonParse {
            path: path.to_path_buf(),
            source,
        };

        let value: serde_json::Value = serde_json::from_str(contents).map_err(json_error)?;
        if value.is_array() {
            let recipes = serde_json::from_value(value).map_err(json_error)?;
            Ok(Self {
                version: None,
                recipes,
            })
        } else {
            serde_json::from_value(value).map_err(json_error)
        }
    }

    /// Declared schema version, defaulting to the current recipe schema.
    pub fn schema_version(&self, path: &Path) -> RecipeLoadResult<SchemaVersion> {
        match &self.version {
            None => Ok(SchemaVersion::RECIPE_FILE),
            Some(raw) => raw
                .parse()
                .map_err(|source| RecipeLoadError::InvalidVersion {
                    path: path.to_path_buf(),
                    source,
                }),
        }
    }

    /// Check that this build can read the file's schema version.
    pub fn check_version(&self, path: &Path) -> RecipeLoadResult<()> {
        let found = self.schema_version(path)?;
        if SchemaVersion::RECIPE_FILE.can_read(&found) {
            Ok(())
        } else {
            Err(RecipeLoadError::IncompatibleVersion {
                path: path.to_path_buf(),
                found,
                expected: SchemaVersion::RECIPE_FILE.major,
            })
        }
    }
}

// ============================================================================
// Loader
// ============================================================================

/// Statistics for the recipe loader.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecipeLoaderStats {
    /// Number of files loaded.
    pub files_loaded: u32,
    /// Number of recipes loaded.
    pub recipes_loaded: u32,
    /// Number of files skipped because they failed to load.
    pub files_failed: u32,
    /// Number of reloads performed.
    pub reloads: u32,
}

/// Recipe loader with reload support.
///
/// Every successful load replaces the catalog with a fresh one; a catalog
/// already handed out is never mutated.
#[derive(Debug)]
pub struct RecipeLoader {
    /// Recipe file or directory.
    path: PathBuf,
    /// Catalog from the last successful load.
    catalog: Catalog,
    /// Modification times for reload detection.
    mod_times: HashMap<PathBuf, SystemTime>,
    /// Statistics.
    stats: RecipeLoaderStats,
}

impl RecipeLoader {
    /// Creates a new recipe loader.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!("Initializing recipe loader at: {:?}", path);

        Self {
            path,
            catalog: Catalog::default(),
            mod_times: HashMap::new(),
            stats: RecipeLoaderStats::default(),
        }
    }

    /// Returns the recipe path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the catalog from the last successful load.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns loader statistics.
    #[must_use]
    pub fn stats(&self) -> &RecipeLoaderStats {
        &self.stats
    }

    /// Loads every recipe under the configured path and rebuilds the catalog.
    ///
    /// A single file must load cleanly. In a directory, `.json` and `.toml`
    /// files load in file-name order; a failing file is logged and skipped.
    pub fn load(&mut self) -> RecipeLoadResult<&Catalog> {
        if !self.path.exists() {
            return Err(RecipeLoadError::NotFound(self.path.clone()));
        }

        let mut stats = RecipeLoaderStats {
            reloads: self.stats.reloads,
            ..RecipeLoaderStats::default()
        };
        let mut mod_times = HashMap::new();
        let mut recipes = Vec::new();

        if self.path.is_dir() {
            for file in recipe_files(&self.path)? {
                match load_file(&file, &mut mod_times) {
                    Ok(loaded) => {
                        stats.files_loaded += 1;
                        stats.recipes_loaded += loaded.len() as u32;
                        recipes.extend(loaded);
                    },
                    Err(e) => {
                        warn!("Failed to load recipe file {:?}: {}", file, e);
                        stats.files_failed += 1;
                    },
                }
            }
        } else {
            let loaded = load_file(&self.path, &mut mod_times)?;
            stats.files_loaded = 1;
            stats.recipes_loaded = loaded.len() as u32;
            recipes = loaded;
        }

        info!(
            "Loaded {} recipes from {} files ({} failed)",
            stats.recipes_loaded, stats.files_loaded, stats.files_failed
        );

        self.catalog = Catalog::new(recipes);
        self.mod_times = mod_times;
        self.stats = stats;
        Ok(&self.catalog)
    }

    /// Checks tracked files for changes and reloads if any changed.
    ///
    /// A change is a newer modification time, a removed file, or (for a
    /// directory) a recipe file appearing. Returns true if the catalog was
    /// rebuilt.
    pub fn check_reload(&mut self) -> RecipeLoadResult<bool> {
        if !self.has_changes() {
            return Ok(false);
        }

        info!("Recipe files changed, reloading from {:?}", self.path);
        self.load()?;
        self.stats.reloads += 1;
        Ok(true)
    }

    fn has_changes(&self) -> bool {
        let modified = self.mod_times.iter().any(|(path, previous)| {
            match fs::metadata(path).and_then(|m| m.modified()) {
                Ok(current) => current > *previous,
                Err(_) => true,
            }
        });
        if modified {
            return true;
        }

        if self.path.is_dir() {
            match recipe_files(&self.path) {
                Ok(files) => files.iter().any(|f| !self.mod_times.contains_key(f)),
                Err(_) => true,
            }
        } else {
            !self.path.exists()
        }
    }
}

/// Recipe files directly inside `dir`, sorted by file name.
fn recipe_files(dir: &Path) -> RecipeLoadResult<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && RecipeFormat::from_path(path).is_some())
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Loads recipes from a single file, recording its modification time.
fn load_file(
    path: &Path,
    mod_times: &mut HashMap<PathBuf, SystemTime>,
) -> RecipeLoadResult<Vec<Recipe>> {
    debug!("Loading recipe file: {:?}", path);

    let format = RecipeFormat::from_path(path)
        .ok_or_else(|| RecipeLoadError::UnsupportedFormat(path.to_path_buf()))?;

    if let Ok(modified) = fs::metadata(path).and_then(|m| m.modified()) {
        mod_times.insert(path.to_path_buf(), modified);
    }

    let contents = fs::read_to_string(path)?;
    let file = RecipeFile::parse(&contents, format, path)?;
    file.check_version(path)?;

    debug!("Loaded {} recipes from {:?}", file.recipes.len(), path);
    Ok(file.recipes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    const BREAD_JSON: &str = r#"[
        {"name": "Dough", "result": "Dough", "trivial": 1, "materials": ["Flour x2"]},
        {"name": "Bread", "trivial": 5, "materials": ["Dough x1"], "mealSize": "Meal",
         "stats": {"VIT": 2}, "expansion": "Base", "yield": "lots"}
    ]"#;

    const STEW_TOML: &str = r#"
version = "1.2.0"

[[recipes]]
name = "Stew"
difficulty = 3
components = ["Bread", "Carrot x2"]
tags = ["hot"]

[recipes.stat_bonuses]
str = 1.5
"#;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).expect("write recipe file");
        path
    }

    #[test]
    fn test_parse_json_array_with_source_names() {
        let file = RecipeFile::parse(BREAD_JSON, RecipeFormat::Json, Path::new("bread.json"))
            .expect("parse");
        assert!(file.version.is_none());
        assert_eq!(file.recipes.len(), 2);

        let bread = &file.recipes[1];
        assert_eq!(bread.difficulty, Some(5.0));
        assert_eq!(bread.components, vec!["Dough x1"]);
        assert_eq!(bread.category.as_deref(), Some("Meal"));
        assert_eq!(bread.stat_bonuses.get("VIT"), Some(&2.0));
        assert_eq!(bread.source_pack.as_deref(), Some("Base"));
        assert_eq!(bread.yield_quantity, 1);
        assert_eq!(file.recipes[0].result_name(), "Dough");
    }

    #[test]
    fn test_parse_json_object_with_version() {
        let json = r#"{"version": "1.0", "recipes": [{"name": "Tea"}]}"#;
        let file =
            RecipeFile::parse(json, RecipeFormat::Json, Path::new("tea.json")).expect("parse");
        assert_eq!(file.version.as_deref(), Some("1.0"));
        assert_eq!(file.recipes[0].name, "Tea");
        assert!(file.check_version(Path::new("tea.json")).is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let file = RecipeFile::parse(STEW_TOML, RecipeFormat::Toml, Path::new("stew.toml"))
            .expect("parse");
        assert_eq!(file.recipes.len(), 1);

        let stew = &file.recipes[0];
        assert_eq!(stew.name, "Stew");
        assert_eq!(stew.difficulty, Some(3.0));
        assert_eq!(stew.tags, vec!["hot"]);
        assert_eq!(stew.stat_bonuses.get("str"), Some(&1.5));
    }

    #[test]
    fn test_shape_violation_is_parse_error() {
        let json = r#"[{"name": "Bad", "components": "Flour"}]"#;
        let result = RecipeFile::parse(json, RecipeFormat::Json, Path::new("bad.json"));
        assert!(matches!(result, Err(RecipeLoadError::JsonParse { .. })));

        let toml_src = "[[recipes]]\nname = \"Bad\"\ntags = \"hot\"\n";
        let result = RecipeFile::parse(toml_src, RecipeFormat::Toml, Path::new("bad.toml"));
        assert!(matches!(result, Err(RecipeLoadError::TomlParse { .. })));
    }

    #[test]
    fn test_object_without_recipes_is_parse_error() {
        let path = Path::new("bread.json");
        let single = r#"{"name": "Bread", "components": ["Flour"]}"#;
        assert!(matches!(
            RecipeFile::parse(single, RecipeFormat::Json, path),
            Err(RecipeLoadError::JsonParse { .. })
        ));

        let misspelled = r#"{"version": "1.0.0", "recipe": [{"name": "Bread"}]}"#;
        assert!(matches!(
            RecipeFile::parse(misspelled, RecipeFormat::Json, path),
            Err(RecipeLoadError::JsonParse { .. })
        ));

        let empty = r#"{"recipes": []}"#;
        let file = RecipeFile::parse(empty, RecipeFormat::Json, path).expect("parse");
        assert!(file.recipes.is_empty());
    }

    #[test]
    fn test_version_checks() {
        let path = Path::new("v.json");
        let newer = r#"{"version": "2.0.0", "recipes": []}"#;
        let file = RecipeFile::parse(newer, RecipeFormat::Json, path).expect("parse");
        assert!(matches!(
            file.check_version(path),
            Err(RecipeLoadError::IncompatibleVersion { expected: 1, .. })
        ));

        let garbage = r#"{"version": "one", "recipes": []}"#;
        let file = RecipeFile::parse(garbage, RecipeFormat::Json, path).expect("parse");
        assert!(matches!(
            file.check_version(path),
            Err(RecipeLoadError::InvalidVersion { .. })
        ));
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(RecipeFormat::from_path(Path::new("a.json")), Some(RecipeFormat::Json));
        assert_eq!(RecipeFormat::from_path(Path::new("a.TOML")), Some(RecipeFormat::Toml));
        assert_eq!(RecipeFormat::from_path(Path::new("a.ron")), None);
        assert_eq!(RecipeFormat::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_load_single_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = write(&dir, "bread.json", BREAD_JSON);

        let mut loader = RecipeLoader::new(&path);
        let catalog = loader.load().expect("load");
        assert_eq!(catalog.len(), 2);
        assert_eq!(loader.stats().files_loaded, 1);
        assert_eq!(loader.stats().recipes_loaded, 2);
    }

    #[test]
    fn test_load_single_bad_file_fails() {
        let dir = TempDir::new().expect("temp dir");
        let path = write(&dir, "bad.json", "{ not json");

        let mut loader = RecipeLoader::new(&path);
        assert!(matches!(loader.load(), Err(RecipeLoadError::JsonParse { .. })));
    }

    #[test]
    fn test_load_unsupported_single_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = write(&dir, "recipes.yaml", "- name: Tea");

        let mut loader = RecipeLoader::new(&path);
        assert!(matches!(loader.load(), Err(RecipeLoadError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_load_directory_in_name_order_skipping_failures() {
        let dir = TempDir::new().expect("temp dir");
        write(&dir, "b_stew.toml", STEW_TOML);
        write(&dir, "a_bread.json", BREAD_JSON);
        write(&dir, "c_broken.json", r#"[{"name": "X", "tags": 3}]"#);
        write(&dir, "notes.txt", "ignored");

        let mut loader = RecipeLoader::new(dir.path());
        let names: Vec<String> = loader
            .load()
            .expect("load")
            .recipes()
            .iter()
            .map(|r| r.name.clone())
            .collect();

        assert_eq!(names, vec!["Dough", "Bread", "Stew"]);
        assert_eq!(
            *loader.stats(),
            RecipeLoaderStats {
                files_loaded: 2,
                recipes_loaded: 3,
                files_failed: 1,
                reloads: 0,
            }
        );
    }

    #[test]
    fn test_load_missing_path() {
        let mut loader = RecipeLoader::new("/nonexistent/larder/recipes");
        assert!(matches!(loader.load(), Err(RecipeLoadError::NotFound(_))));
    }

    #[test]
    fn test_check_reload_without_changes() {
        let dir = TempDir::new().expect("temp dir");
        write(&dir, "bread.json", BREAD_JSON);

        let mut loader = RecipeLoader::new(dir.path());
        loader.load().expect("load");
        assert!(!loader.check_reload().expect("check"));
        assert_eq!(loader.stats().reloads, 0);
    }

    #[test]
    fn test_check_reload_picks_up_new_file() {
        let dir = TempDir::new().expect("temp dir");
        write(&dir, "bread.json", BREAD_JSON);

        let mut loader = RecipeLoader::new(dir.path());
        loader.load().expect("load");
        let before = loader.catalog().clone();

        write(&dir, "stew.toml", STEW_TOML);
        assert!(loader.check_reload().expect("check"));

        assert_eq!(before.len(), 2);
        assert_eq!(loader.catalog().len(), 3);
        assert_eq!(loader.stats().reloads, 1);
    }

    #[test]
    fn test_check_reload_after_rewrite() {
        let dir = TempDir::new().expect("temp dir");
        let path = write(&dir, "bread.json", r#"[{"name": "Bread"}]"#);

        let mut loader = RecipeLoader::new(dir.path());
        assert_eq!(loader.load().expect("load").len(), 1);

        write(&dir, "bread.json", BREAD_JSON);
        // Push the mtime forward so coarse filesystem clocks still see a change.
        let later = SystemTime::now() + Duration::from_secs(5);
        fs::File::options()
            .write(true)
            .open(&path)
            .and_then(|file| file.set_modified(later))
            .expect("set mtime");

        assert!(loader.check_reload().expect("check"));
        assert_eq!(loader.catalog().len(), 2);
        assert_eq!(loader.stats().reloads, 1);
        assert!(!loader.check_reload().expect("check again"));
    }

    #[test]
    fn test_check_reload_after_removal() {
        let dir = TempDir::new().expect("temp dir");
        let stew = write(&dir, "stew.toml", STEW_TOML);
        write(&dir, "bread.json", BREAD_JSON);

        let mut loader = RecipeLoader::new(dir.path());
        loader.load().expect("load");
        fs::remove_file(stew).expect("remove");

        assert!(loader.check_reload().expect("check"));
        assert_eq!(loader.catalog().len(), 2);
    }
}
