use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Environment variable overriding [`FontCache::DEFAULT_CAPACITY`].
pub const FONT_CACHE_CAPACITY_ENV: &str = "KINEMA_FONT_CACHE_CAPACITY";

/// A loaded font file.
#[derive(Clone)]
pub struct FontEntry {
    /// Raw file contents.
    pub bytes: Arc<Vec<u8>>,
    /// Primary family name as registered with the layout engine.
    pub family: String,
    /// Handle used by the rasterizer to draw glyphs from this font.
    pub font: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for FontEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontEntry")
            .field("family", &self.family)
            .field("bytes_len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

/// Bounded font cache keyed by file path, evicting the least recently used entry.
#[derive(Debug)]
pub struct FontCache {
    capacity: usize,
    entries: HashMap<PathBuf, Arc<FontEntry>>,
    lru: VecDeque<PathBuf>,
}

impl Default for FontCache {
    fn default() -> Self {
        Self::new()
    }
}

impl FontCache {
    pub const DEFAULT_CAPACITY: usize = 8;

    /// Cache sized from `KINEMA_FONT_CACHE_CAPACITY`, else [`Self::DEFAULT_CAPACITY`].
    pub fn new() -> Self {
        let capacity = std::env::var(FONT_CACHE_CAPACITY_ENV)
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(Self::DEFAULT_CAPACITY);
        Self::with_capacity(capacity)
    }

    /// Cache holding at most `capacity` fonts (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            lru: VecDeque::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Look up a font, marking it most recently used.
    pub fn get(&mut self, path: &Path) -> Option<Arc<FontEntry>> {
        let entry = self.entries.get(path).cloned()?;
        self.touch(path);
        Some(entry)
    }

    /// Store a font, evicting the least recently used entries beyond capacity.
    pub fn insert(&mut self, path: PathBuf, entry: FontEntry) -> Arc<FontEntry> {
        let entry = Arc::new(entry);
        self.entries.insert(path.clone(), Arc::clone(&entry));
        self.touch(&path);
        while self.lru.len() > self.capacity {
            if let Some(old) = self.lru.pop_front() {
                tracing::debug!(path = %old.display(), "evicting font from cache");
                self.entries.remove(&old);
            }
        }
        entry
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    fn touch(&mut self, path: &Path) {
        if let Some(pos) = self.lru.iter().position(|p| p == path) {
            self.lru.remove(pos);
        }
        self.lru.push_back(path.to_path_buf());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/cache.rs"]
mod tests;
