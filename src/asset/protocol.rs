use anyhow::Context;
use crate::{AssetPath, HashMap};

/// Where tileset bytes come from, selected by the `name://` part of a path.
pub trait Protocol: Send + Sync + 'static {
    fn name(&self) -> &str;
    fn read(&self, path: &AssetPath) -> anyhow::Result<Vec<u8>>;
}

/// Reads from disk. The manager's path prefix is honoured.
#[derive(Copy, Clone, Debug)]
pub struct FileProtocol;

impl Protocol for FileProtocol {
    fn name(&self) -> &str { "file" }

    fn read(&self, path: &AssetPath) -> anyhow::Result<Vec<u8>> {
        let file_path = path.without_protocol();
        log::trace!("Reading {file_path}");
        std::fs::read(&file_path).with_context(|| format!("Failed to read {file_path}"))
    }
}

/// Serves tilesets kept in memory, keyed by `body.extension`.
/// The path prefix is ignored, so the same files resolve whatever the asset root.
#[derive(Clone, Default, Debug)]
pub struct MemoryProtocol {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryProtocol {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Adds or replaces a file. Returns the previous contents.
    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Option<Vec<u8>> {
        self.files.insert(path.into(), contents.into())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Protocol for MemoryProtocol {
    fn name(&self) -> &str { "mem" }

    fn read(&self, path: &AssetPath) -> anyhow::Result<Vec<u8>> {
        let key = format!("{}.{}", path.body, path.extension);
        match self.files.get(&key) {
            Some(bytes) => Ok(bytes.clone()),
            None => anyhow::bail!("No in-memory file {key}"),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::AssetPath;
    use super::{FileProtocol, MemoryProtocol, Protocol};

    #[test]
    fn memory_files_by_path() {
        let protocol = MemoryProtocol::new()
            .with_file("tilesets/a.tsx", "first")
            .with_file("tilesets/b.tsx", "second");
        assert_eq!(2, protocol.len());

        let mut path = AssetPath::parse("mem://tilesets/b.tsx", None).unwrap();
        path.prefix = Some(String::from("ignored/root"));
        assert_eq!(b"second".to_vec(), protocol.read(&path).unwrap());

        let missing = AssetPath::parse("mem://tilesets/c.tsx", None).unwrap();
        let err = protocol.read(&missing).unwrap_err();
        assert_eq!("No in-memory file tilesets/c.tsx", err.to_string());
    }

    #[test]
    fn insert_replaces() {
        let mut protocol = MemoryProtocol::default();
        assert_eq!(None, protocol.insert("a.tsx", "old"));
        assert_eq!(Some(b"old".to_vec()), protocol.insert("a.tsx", "new"));
        assert_eq!(1, protocol.len());
    }

    #[test]
    fn missing_file_names_path() {
        let path = AssetPath::parse("file://assets/tilesets/nowhere.tsx", None).unwrap();
        let err = FileProtocol.read(&path).unwrap_err();
        assert!(err.to_string().contains("assets/tilesets/nowhere.tsx"), "{err}");
    }
}
