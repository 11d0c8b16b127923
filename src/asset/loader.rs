use crate::AssetPath;

/// Takes the contents of a file, and converts them into an asset.
pub trait AssetLoader: Send + Sync + 'static {
    type AssetType: Send + Sync + 'static;
    fn load(&self, bytes: &[u8], path: &AssetPath) -> anyhow::Result<Self::AssetType>;
    fn extensions(&self) -> &[&str];

    /// True if this loader handles files with the extension given.
    fn supports(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|supported| supported.eq_ignore_ascii_case(extension))
    }
}
