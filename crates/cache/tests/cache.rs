use sheetview_cache::{
    Cache, CacheError, CacheKey, CacheStore, FileStore, ManualClock, MemoryStore,
};
use sheetview_core::{Page, Scalar, WorksheetId};
use std::sync::Arc;
use std::time::Duration;

const T0: i64 = 1_700_000_000_000;

fn clocked(store: Arc<dyn CacheStore>) -> (Cache, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(T0));
    (Cache::new(store).with_clock(clock.clone()), clock)
}

fn sample_page() -> Page {
    Page::new(
        vec!["Nome".into(), "Nota".into()],
        vec![
            vec![Scalar::text("Ana"), Scalar::Number(9.0)],
            vec![Scalar::text("Beto"), Scalar::Bool(false)],
        ],
    )
}

#[test]
fn test_ttl_boundary() {
    let ttl = Duration::from_secs(300);
    let (cache, clock) = clocked(Arc::new(MemoryStore::new()));
    cache.set("k", &7_usize);

    clock.set(T0 + 300_000 - 1);
    assert_eq!(cache.get::<usize>("k", ttl), Some(7));

    clock.set(T0 + 300_000);
    assert_eq!(cache.get::<usize>("k", ttl), None);

    clock.set(T0 + 300_000 + 1);
    assert_eq!(cache.get::<usize>("k", ttl), None);
}

#[test]
fn test_expired_entry_is_overwritten_by_next_set() {
    let ttl = Duration::from_millis(100);
    let store = Arc::new(MemoryStore::new());
    let (cache, clock) = clocked(store.clone());

    cache.set("k", &1_u32);
    clock.advance(500);
    assert_eq!(cache.get::<u32>("k", ttl), None);
    // Lazy eviction: the stale entry is still in the store
    assert_eq!(store.len(), 1);

    cache.set("k", &2_u32);
    assert_eq!(cache.get::<u32>("k", ttl), Some(2));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_entry_from_the_future_is_stale() {
    let (cache, clock) = clocked(Arc::new(MemoryStore::new()));
    cache.set("k", &1_usize);

    clock.set(T0 - 1);
    assert_eq!(cache.get::<usize>("k", Duration::from_secs(300)), None);

    clock.set(T0);
    assert_eq!(cache.get::<usize>("k", Duration::from_secs(300)), Some(1));
}

#[test]
fn test_distinct_ttls_per_read() {
    let (cache, clock) = clocked(Arc::new(MemoryStore::new()));
    let key = CacheKey::count("sv", "abc", &WorksheetId::Gid(0), 1).to_string();
    cache.set(&key, &120_usize);

    clock.advance(10 * 60 * 1000);
    assert_eq!(cache.get::<usize>(&key, Duration::from_secs(5 * 60)), None);
    assert_eq!(cache.get::<usize>(&key, Duration::from_secs(30 * 60)), Some(120));
}

#[test]
fn test_page_roundtrip_through_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let key = CacheKey::page("sv", "abc", &WorksheetId::Gid(3), 1, 2, 25).to_string();
    let page = sample_page();

    let (writer, _) = clocked(Arc::new(FileStore::new(dir.path().join("cache"))));
    writer.set(&key, &page);

    // A fresh cache over the same directory sees the entry
    let (reader, _) = clocked(Arc::new(FileStore::new(dir.path().join("cache"))));
    let cached: Page = reader.get(&key, Duration::from_secs(60)).unwrap();
    assert_eq!(cached, page);

    let raw = std::fs::read_dir(dir.path().join("cache")).unwrap().count();
    assert_eq!(raw, 1);
}

#[test]
fn test_corrupt_file_is_a_miss() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    store.write("k", "{not json".to_string()).unwrap();

    let (cache, _) = clocked(Arc::new(store));
    assert_eq!(cache.get::<u32>("k", Duration::from_secs(60)), None);

    // Wrong value type is also a miss
    cache.set("k", &"text");
    assert_eq!(cache.get::<u32>("k", Duration::from_secs(60)), None);
}

#[test]
fn test_unwritable_directory_degrades_to_miss() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();

    let (cache, _) = clocked(Arc::new(FileStore::new(blocker.join("cache"))));
    cache.set("k", &1_u32);
    assert_eq!(cache.get::<u32>("k", Duration::from_secs(60)), None);
}

struct BrokenStore;

impl CacheStore for BrokenStore {
    fn read(&self, _key: &str) -> sheetview_cache::Result<Option<String>> {
        Err(CacheError::Poisoned)
    }

    fn write(&self, _key: &str, _value: String) -> sheetview_cache::Result<()> {
        Err(std::io::Error::other("quota exceeded").into())
    }
}

#[test]
fn test_storage_failures_are_swallowed() {
    let (cache, _) = clocked(Arc::new(BrokenStore));
    cache.set("k", &sample_page());
    assert_eq!(cache.get::<Page>("k", Duration::from_secs(60)), None);
}
