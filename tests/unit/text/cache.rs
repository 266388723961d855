use super::*;

fn entry(family: &str) -> FontEntry {
    let bytes = vec![0u8; 4];
    FontEntry {
        bytes: Arc::new(bytes.clone()),
        family: family.to_string(),
        font: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0),
    }
}

#[test]
fn least_recently_used_entry_is_evicted() {
    let mut cache = FontCache::with_capacity(2);
    cache.insert(PathBuf::from("a.ttf"), entry("A"));
    cache.insert(PathBuf::from("b.ttf"), entry("B"));
    assert!(cache.get(Path::new("a.ttf")).is_some());
    cache.insert(PathBuf::from("c.ttf"), entry("C"));

    assert_eq!(cache.len(), 2);
    assert!(cache.contains(Path::new("a.ttf")));
    assert!(!cache.contains(Path::new("b.ttf")));
    assert!(cache.contains(Path::new("c.ttf")));
}

#[test]
fn reinserting_refreshes_without_growing() {
    let mut cache = FontCache::with_capacity(2);
    cache.insert(PathBuf::from("a.ttf"), entry("A"));
    cache.insert(PathBuf::from("a.ttf"), entry("A2"));
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(Path::new("a.ttf")).unwrap().family, "A2");
}

#[test]
fn capacity_is_at_least_one() {
    let mut cache = FontCache::with_capacity(0);
    assert_eq!(cache.capacity(), 1);
    cache.insert(PathBuf::from("a.ttf"), entry("A"));
    cache.insert(PathBuf::from("b.ttf"), entry("B"));
    assert_eq!(cache.len(), 1);
    assert!(cache.contains(Path::new("b.ttf")));
}

#[test]
fn clear_empties_the_cache() {
    let mut cache = FontCache::with_capacity(4);
    cache.insert(PathBuf::from("a.ttf"), entry("A"));
    cache.clear();
    assert!(cache.is_empty());
    assert!(cache.get(Path::new("a.ttf")).is_none());
}

#[test]
fn default_capacity_without_override() {
    if std::env::var_os(FONT_CACHE_CAPACITY_ENV).is_some() {
        return;
    }
    assert_eq!(FontCache::new().capacity(), FontCache::DEFAULT_CAPACITY);
}
