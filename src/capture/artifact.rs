use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

/// Revocable reference to a recorded artifact (`blob:molcap/<n>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactUrl(String);

impl ArtifactUrl {
    /// The URL string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Finished recording data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// MIME type reported by the encoder.
    pub mime_type: String,
    /// Assembled encoded bytes.
    pub data: Vec<u8>,
}

/// Registry of live artifact references.
///
/// Minting hands out a URL that resolves until it is revoked. Owners must
/// revoke what they mint or the data stays resident.
#[derive(Debug, Default)]
pub struct ArtifactRegistry {
    next_id: u64,
    entries: FxHashMap<ArtifactUrl, Rc<Artifact>>,
}

/// Registry shared between the recorder and whoever plays artifacts back.
pub type SharedArtifacts = Rc<RefCell<ArtifactRegistry>>;

impl ArtifactRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty registry wrapped for sharing.
    #[must_use]
    pub fn shared() -> SharedArtifacts {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Store `artifact` and return a fresh reference to it.
    pub fn mint(&mut self, artifact: Artifact) -> ArtifactUrl {
        self.next_id += 1;
        let url = ArtifactUrl(format!("blob:molcap/{}", self.next_id));
        let _ = self.entries.insert(url.clone(), Rc::new(artifact));
        url
    }

    /// Look up a reference. `None` once revoked.
    #[must_use]
    pub fn resolve(&self, url: &ArtifactUrl) -> Option<Rc<Artifact>> {
        self.entries.get(url).cloned()
    }

    /// Drop a reference. Returns `false` if it was not live.
    pub fn revoke(&mut self, url: &ArtifactUrl) -> bool {
        self.entries.remove(url).is_some()
    }

    /// Number of live references.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no reference is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
