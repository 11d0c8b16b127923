use std::fmt;
use crate::LoadError;

/**
 * Deconstructed path to a file.
 */
#[derive(Clone, Eq, PartialEq, Default, Debug, Hash)]
pub struct AssetPath {
    pub protocol: String,
    pub prefix: Option<String>,
    pub body: String,
    pub extension: String,
}

impl AssetPath {

    pub fn parse(path: &str, default_protocol: Option<&str>) -> Result<Self, LoadError> {
        let protocol: Option<&str>;
        let mut remainder = path;

        // Reads protocol
        match remainder.split_once("://") {
            Some((left, right)) => {
                protocol = Some(left);
                remainder = right;
            },
            None => protocol = None,
        };
        let Some(protocol) = protocol.or(default_protocol) else {
            return Err(LoadError::NoDefaultProtocol)
        };

        // Reads body and extension from the last segment, so dotted directories stay in the body.
        let segment_start = remainder.rfind('/').map(|idx| idx + 1).unwrap_or(0);
        let file_name = &remainder[segment_start..];
        let (body, extension) = match file_name.rsplit_once('.') {
            Some((stem, extension)) if !stem.is_empty() && !extension.is_empty() => {
                (&remainder[..segment_start + stem.len()], extension)
            },
            _ => return Err(LoadError::PathMissingExtension),
        };

        Ok(Self {
            protocol: protocol.into(),
            prefix: None,
            body: body.into(),
            extension: extension.into()
        })
    }

    /// Body and extension. No protocol.
    pub fn without_protocol(&self) -> String {
        match self.prefix.as_deref() {
            Some(prefix) => format!("{}/{}.{}", prefix.trim_end_matches('/'), self.body, self.extension),
            None => format!("{}.{}", self.body, self.extension),
        }
    }

    /// Parent directory of this file, relative to the prefix.
    /// None if it's at the root.
    pub fn parent(&self) -> Option<String> {
        let (parent, _) = self.body.rsplit_once('/')?;
        if parent.is_empty() { return None }
        Some(String::from(parent))
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.protocol, self.without_protocol())
    }
}

/**
 * Wrapper for the hash of a path.
 */
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct PathHash(pub u64);
impl PathHash {
    pub fn of(path: &str) -> Self {
        Self(fxhash::hash64(path))
    }
}
