use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use derive_more::*;
use rayon::prelude::*;
use tracing::instrument;
use crate::{AssetLoader, AssetPath, HashMap, PathHash, Protocol};

/// Reads files through registered protocols, turns them into assets with a loader,
/// and keeps loaded assets around until evicted.
pub struct AssetManager<L: AssetLoader> {
    path_prefix: Option<String>,
    protocols: HashMap<String, Arc<dyn Protocol>>,
    default_protocol: Option<String>,
    loader: L,
    cache: Mutex<HashMap<PathHash, Arc<L::AssetType>>>,
}

impl<L: AssetLoader> AssetManager<L> {

    pub fn new(loader: L) -> Self {
        Self {
            path_prefix: None,
            protocols: HashMap::default(),
            default_protocol: None,
            loader,
            cache: Mutex::new(HashMap::default()),
        }
    }

    pub fn set_path_prefix<S: Into<String>>(&mut self, prefix: Option<S>) {
        self.path_prefix = prefix.map(|s| s.into());
    }

    /// Adds a protocol for use in loading bytes for the loader.
    pub fn add_protocol(&mut self, protocol: impl Protocol, is_default: bool) {
        let name = String::from(protocol.name());
        self.protocols.insert(name.clone(), Arc::new(protocol));
        if is_default {
            self.default_protocol = Some(name);
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Loads an asset, or returns the cached one if the same path was loaded before.
    pub fn load(&self, path: impl AsRef<str>) -> anyhow::Result<Arc<L::AssetType>> {
        let path = path.as_ref();
        let path_hash = PathHash::of(path);
        if let Some(asset) = self.lock_cache().get(&path_hash) {
            return Ok(asset.clone());
        }

        // Parses path, and uses it to fetch protocol.
        let mut asset_path = AssetPath::parse(path, self.default_protocol.as_deref())?;
        asset_path.prefix = self.path_prefix.clone();
        let protocol = match self.protocols.get(&asset_path.protocol) {
            Some(protocol) => protocol.clone(),
            None => return Err(LoadError::NoSuchProtocol { protocol: asset_path.protocol }.into()),
        };
        if !self.loader.supports(&asset_path.extension) {
            return Err(LoadError::NoSuchLoader { extension: asset_path.extension }.into());
        }

        // Reads and loads without holding the cache, so other paths can load in parallel.
        let bytes = protocol.read(&asset_path)?;
        let asset = Arc::new(self.loader.load(&bytes, &asset_path)?);
        log::info!("Loaded {asset_path}");
        let mut cache = self.lock_cache();
        let asset = cache.entry(path_hash).or_insert(asset);
        Ok(asset.clone())
    }

    /// Loads every path in parallel.
    /// Results are in the same order as the paths.
    #[instrument(skip_all)]
    pub fn load_all<P>(&self, paths: &[P]) -> Vec<anyhow::Result<Arc<L::AssetType>>>
    where
        P: AsRef<str> + Sync,
    {
        paths
            .par_iter()
            .map(|path| {
                let result = self.load(path);
                if let Err(err) = &result {
                    log::error!("{}: {err:#}", path.as_ref());
                }
                result
            })
            .collect()
    }

    /// Gets an asset previously loaded from the path given.
    pub fn get(&self, path: impl AsRef<str>) -> Option<Arc<L::AssetType>> {
        let path_hash = PathHash::of(path.as_ref());
        self.lock_cache().get(&path_hash).cloned()
    }

    /// Forgets an asset so the next load reads it again.
    /// Returns the asset if it was cached.
    pub fn evict(&self, path: impl AsRef<str>) -> Option<Arc<L::AssetType>> {
        let path_hash = PathHash::of(path.as_ref());
        self.lock_cache().remove(&path_hash)
    }

    pub fn len(&self) -> usize {
        self.lock_cache().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_cache().is_empty()
    }

    fn lock_cache(&self) -> MutexGuard<'_, HashMap<PathHash, Arc<L::AssetType>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Error, Debug, Display, Clone, Eq, PartialEq)]
pub enum LoadError {
    #[display(fmt="No default protocol")]
    NoDefaultProtocol,
    #[display(fmt="No such protocol '{protocol}'")]
    NoSuchProtocol { protocol: String },
    #[display(fmt="No loader matching extension '{extension}'")]
    NoSuchLoader { extension: String },
    #[display(fmt="Path missing extension")]
    PathMissingExtension,
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use crate::config::LoaderConfig;
    use crate::{FileProtocol, LoadError, MemoryProtocol, TsxLoader};
    use super::AssetManager;

    const ATLAS: &str = r#"
        <tileset name="atlas" tilewidth="16" tileheight="16" tilecount="4" columns="2">
            <image source="atlas.png" width="32" height="32"/>
        </tileset>
    "#;

    fn file_manager() -> AssetManager<TsxLoader> {
        let mut manager = AssetManager::new(TsxLoader::new(LoaderConfig::default()));
        manager.add_protocol(FileProtocol, true);
        manager.set_path_prefix(Some(env!("CARGO_MANIFEST_DIR")));
        manager
    }

    #[test]
    fn memory_tilesets() {
        let mut manager = AssetManager::new(TsxLoader::default());
        let files = MemoryProtocol::new()
            .with_file("tilesets/atlas.tsx", ATLAS)
            .with_file("tilesets/objects.tsx", include_str!("../../assets/tilesets/debug_tileset_objects.tsx"));
        manager.add_protocol(files, false);

        let results = manager.load_all(&[
            "mem://tilesets/atlas.tsx",
            "mem://tilesets/objects.tsx",
            "mem://tilesets/gone.tsx",
        ]);
        let atlas = results[0].as_ref().unwrap();
        assert_eq!("atlas", atlas.name);
        assert_eq!("tilesets/atlas.png", atlas.image.as_ref().unwrap().path);
        assert_eq!(6, results[1].as_ref().unwrap().tiles.len());
        assert!(results[2].is_err());
        assert_eq!(2, manager.len());
    }

    #[test]
    fn loads_are_cached() {
        let manager = file_manager();
        let first = manager.load("assets/tilesets/debug_tileset.tsx").unwrap();
        let second = manager.load("assets/tilesets/debug_tileset.tsx").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(1, manager.len());

        let evicted = manager.evict("assets/tilesets/debug_tileset.tsx").unwrap();
        assert!(Arc::ptr_eq(&first, &evicted));
        assert!(manager.get("assets/tilesets/debug_tileset.tsx").is_none());
        assert!(manager.is_empty());
    }

    #[test]
    fn load_all_keeps_order() {
        let manager = file_manager();
        let results = manager.load_all(&[
            "assets/tilesets/debug_tileset_objects.tsx",
            "assets/tilesets/missing.tsx",
            "assets/tilesets/debug_tileset.tsx",
        ]);
        assert_eq!(3, results.len());
        assert_eq!("debug_tileset_objects", results[0].as_ref().unwrap().name);
        assert!(results[1].is_err());
        assert_eq!("debug_tileset", results[2].as_ref().unwrap().name);
        assert_eq!(2, manager.len());
    }

    #[test]
    fn load_errors() {
        let manager = file_manager();
        let err = manager.load("assets/tilesets/debug_tileset.tmx").unwrap_err();
        assert_eq!(Some(&LoadError::NoSuchLoader { extension: String::from("tmx") }), err.downcast_ref());
        let err = manager.load("http://example.com/tileset.tsx").unwrap_err();
        assert_eq!(Some(&LoadError::NoSuchProtocol { protocol: String::from("http") }), err.downcast_ref());

        let manager = AssetManager::new(TsxLoader::default());
        let err = manager.load("tileset.tsx").unwrap_err();
        assert_eq!(Some(&LoadError::NoDefaultProtocol), err.downcast_ref());
    }
}
