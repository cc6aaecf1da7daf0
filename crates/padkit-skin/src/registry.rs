//! Skin registry: discovers, loads and shares skin descriptors.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use padkit_types::error::{Result, SkinError};

use crate::descriptor::{INFO_FILE, SkinDescriptor};

/// Loaded skins keyed by identifier.
#[derive(Debug, Default)]
pub struct SkinRegistry {
    skins: BTreeMap<String, Arc<SkinDescriptor>>,
}

impl SkinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan a directory for skins: `*.json` files and subdirectories
    /// containing `info.json`. Returns paths sorted by file name.
    pub fn discover(dir: &Path) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.join(INFO_FILE).is_file()
                    || (p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
            })
            .collect();
        paths.sort();
        paths
    }

    /// Load every skin found in `dir`. Malformed skins are logged and
    /// skipped. Returns the number of skins added.
    pub fn load_directory(&mut self, dir: &Path) -> usize {
        let mut loaded = 0;
        for path in Self::discover(dir) {
            match SkinDescriptor::from_path(&path) {
                Ok(skin) => {
                    self.insert(skin);
                    loaded += 1;
                },
                Err(e) => log::warn!("Skipping skin at {}: {e}", path.display()),
            }
        }
        log::info!("Loaded {loaded} skins from {}", dir.display());
        loaded
    }

    /// Add a skin, replacing any skin with the same identifier.
    pub fn insert(&mut self, skin: SkinDescriptor) -> Arc<SkinDescriptor> {
        let skin = Arc::new(skin);
        if self
            .skins
            .insert(skin.identifier().to_string(), Arc::clone(&skin))
            .is_some()
        {
            log::debug!("Replaced skin '{}'", skin.identifier());
        }
        skin
    }

    pub fn get(&self, identifier: &str) -> Option<Arc<SkinDescriptor>> {
        self.skins.get(identifier).map(Arc::clone)
    }

    /// Skins targeting a game system, by full identifier or short name
    /// (`gba`).
    pub fn for_game_type(&self, game_type: &str) -> Vec<Arc<SkinDescriptor>> {
        self.skins
            .values()
            .filter(|s| {
                s.game_type().as_str() == game_type || s.game_type().short_name() == game_type
            })
            .map(Arc::clone)
            .collect()
    }

    /// Identifiers in sorted order.
    pub fn ids(&self) -> Vec<&str> {
        self.skins.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.skins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skins.is_empty()
    }

    /// Find a skin by identifier, falling back to loading `id_or_path` from
    /// the filesystem.
    pub fn resolve(&self, id_or_path: &str) -> Result<Arc<SkinDescriptor>> {
        if let Some(skin) = self.get(id_or_path) {
            return Ok(skin);
        }
        let path = Path::new(id_or_path);
        if path.exists() {
            return SkinDescriptor::from_path(path).map(Arc::new);
        }
        Err(SkinError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no skin with id or path '{id_or_path}'"),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skin_json(identifier: &str, game_type: &str) -> String {
        format!(
            r#"{{
                "name": "{identifier}",
                "identifier": "{identifier}",
                "gameTypeIdentifier": "{game_type}",
                "representations": {{
                    "iphone": {{ "edgeToEdge": {{ "portrait": {{
                        "mappingSize": {{ "width": 414, "height": 896 }}
                    }} }} }}
                }}
            }}"#
        )
    }

    fn populate(dir: &Path) {
        let nes = dir.join("nes-skin");
        std::fs::create_dir(&nes).unwrap();
        std::fs::write(nes.join(INFO_FILE), skin_json("skin.nes", "com.example.game.nes")).unwrap();
        std::fs::write(
            dir.join("gba.json"),
            skin_json("skin.gba", "com.example.game.gba"),
        )
        .unwrap();
        std::fs::write(dir.join("broken.json"), "{ nope").unwrap();
        std::fs::write(dir.join("notes.txt"), "not a skin").unwrap();
        std::fs::create_dir(dir.join("empty-dir")).unwrap();
    }

    #[test]
    fn discover_finds_files_and_dirs() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path());
        let names: Vec<String> = SkinRegistry::discover(dir.path())
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["broken.json", "gba.json", "nes-skin"]);
    }

    #[test]
    fn discover_nonexistent_dir() {
        assert!(SkinRegistry::discover(Path::new("/nonexistent/skins")).is_empty());
    }

    #[test]
    fn load_directory_skips_malformed() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path());
        let mut registry = SkinRegistry::new();
        assert_eq!(registry.load_directory(dir.path()), 2);
        assert_eq!(registry.ids(), vec!["skin.gba", "skin.nes"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn lookup_by_game_type() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path());
        let mut registry = SkinRegistry::new();
        registry.load_directory(dir.path());
        assert_eq!(registry.for_game_type("gba").len(), 1);
        assert_eq!(registry.for_game_type("com.example.game.nes").len(), 1);
        assert!(registry.for_game_type("snes").is_empty());
    }

    #[test]
    fn insert_replaces_same_identifier() {
        let mut registry = SkinRegistry::new();
        let a = SkinDescriptor::from_json(
            &skin_json("dup", "g.a"),
            crate::descriptor::SkinSource::Memory("a".into()),
        )
        .unwrap();
        let b = SkinDescriptor::from_json(
            &skin_json("dup", "g.b"),
            crate::descriptor::SkinSource::Memory("b".into()),
        )
        .unwrap();
        registry.insert(a);
        registry.insert(b);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("dup").unwrap().game_type().short_name(), "b");
    }

    #[test]
    fn resolve_by_id_then_path() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path());
        let mut registry = SkinRegistry::new();
        registry.load_directory(dir.path());

        assert_eq!(registry.resolve("skin.nes").unwrap().identifier(), "skin.nes");

        let empty = SkinRegistry::new();
        let path = dir.path().join("gba.json");
        let skin = empty.resolve(path.to_str().unwrap()).unwrap();
        assert_eq!(skin.identifier(), "skin.gba");

        let err = empty.resolve("does-not-exist").unwrap_err();
        assert!(format!("{err}").contains("does-not-exist"));
    }

    #[test]
    fn bundled_skins_load() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../skins");
        let mut registry = SkinRegistry::new();
        assert_eq!(registry.load_directory(&dir), 1);
        let skin = registry.get("padkit.sample.gba").unwrap();
        assert_eq!(skin.supported_traits().len(), 2);
        assert_eq!(registry.for_game_type("gba").len(), 1);
    }

    #[test]
    fn resolve_malformed_path_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path());
        let path = dir.path().join("broken.json");
        let err = SkinRegistry::new().resolve(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, SkinError::MalformedSkinDescriptor(_)));
    }
}
