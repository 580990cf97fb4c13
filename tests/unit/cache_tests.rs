/*!
 * Tests for the persistent translation cache
 */

use overlay_translator::TranslationCache;
use overlay_translator::translation::PutOutcome;

use crate::common;

#[tokio::test]
async fn test_cache_afterReopen_shouldStillHoldEntries() {
    let temp_dir = common::create_temp_dir().unwrap();
    let ns = common::namespace("persist", "eng", "rus", "google");

    {
        let cache = TranslationCache::new(temp_dir.path());
        cache.put(&ns, "Hello.", "Привет.").await.unwrap();
    }

    let reopened = TranslationCache::new(temp_dir.path());
    assert_eq!(reopened.get(&ns, "Hello.").await.unwrap().as_deref(), Some("Привет."));
    assert_eq!(reopened.len(&ns).unwrap(), 1);

    let file = temp_dir.path().join("persist").join("cache").join("eng_rus_google.sqlite3");
    assert!(file.is_file());
}

#[tokio::test]
async fn test_cache_withDifferentNamespaces_shouldNotShareEntries() {
    let temp_dir = common::create_temp_dir().unwrap();
    let cache = TranslationCache::new(temp_dir.path());

    let google = common::namespace("iso", "eng", "rus", "google");
    let ollama = common::namespace("iso", "eng", "rus", "ollama");
    let ukrainian = common::namespace("iso", "eng", "ukr", "google");
    let other_session = common::namespace("other", "eng", "rus", "google");

    cache.put(&google, "Hello.", "Привет.").await.unwrap();

    assert!(cache.get(&ollama, "Hello.").await.unwrap().is_none());
    assert!(cache.get(&ukrainian, "Hello.").await.unwrap().is_none());
    assert!(cache.get(&other_session, "Hello.").await.unwrap().is_none());
    assert!(cache.get(&google, "Hello.").await.unwrap().is_some());
}

#[tokio::test]
async fn test_put_withExistingEntry_shouldKeepFirstTranslation() {
    let cache = TranslationCache::in_memory();
    let ns = common::namespace("fww", "eng", "rus", "mock");

    assert_eq!(cache.put(&ns, "Good night.", "Спокойной ночи.").await.unwrap(), PutOutcome::Inserted);
    assert_eq!(cache.put(&ns, "Good night.", "Доброй ночи.").await.unwrap(), PutOutcome::AlreadyPresent);

    assert_eq!(cache.get(&ns, "Good night.").await.unwrap().as_deref(), Some("Спокойной ночи."));
    assert_eq!(cache.len(&ns).unwrap(), 1);
}

#[tokio::test]
async fn test_get_shouldMatchTrimmedSentence() {
    let cache = TranslationCache::in_memory();
    let ns = common::namespace("trim", "eng", "rus", "mock");

    cache.put(&ns, "  Yes.  ", "Да.").await.unwrap();
    assert_eq!(cache.get(&ns, "Yes.").await.unwrap().as_deref(), Some("Да."));
}

#[tokio::test]
async fn test_init_calledTwice_shouldNotTruncate() {
    let temp_dir = common::create_temp_dir().unwrap();
    let ns = common::namespace("init", "jpn", "eng", "ollama");

    let cache = TranslationCache::new(temp_dir.path());
    cache.init(&ns).unwrap();
    cache.put(&ns, "こんにちは。", "Hello.").await.unwrap();
    cache.init(&ns).unwrap();

    let fresh = TranslationCache::new(temp_dir.path());
    fresh.init(&ns).unwrap();
    assert_eq!(fresh.len(&ns).unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_put_fromConcurrentWriters_shouldStoreOneEntry() {
    let temp_dir = common::create_temp_dir().unwrap();
    let cache = TranslationCache::new(temp_dir.path());
    let ns = common::namespace("race", "eng", "rus", "mock");

    let mut handles = Vec::new();
    for i in 0..8 {
        let cache = cache.clone();
        let ns = ns.clone();
        handles.push(tokio::spawn(async move {
            cache.put(&ns, "Same sentence.", &format!("Перевод {}", i)).await
        }));
    }

    let mut inserted = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap() == PutOutcome::Inserted {
            inserted += 1;
        }
    }

    assert_eq!(inserted, 1);
    assert_eq!(cache.len(&ns).unwrap(), 1);
}

#[tokio::test]
async fn test_listSessionStores_shouldReportEveryNamespaceFile() {
    let temp_dir = common::create_temp_dir().unwrap();
    let cache = TranslationCache::new(temp_dir.path());
    let session = common::session("listed");

    assert!(cache.list_session_stores(&session).unwrap().is_empty());

    let rus = common::namespace("listed", "eng", "rus", "google");
    let ukr = common::namespace("listed", "eng", "ukr", "google");
    cache.put(&rus, "One.", "Один.").await.unwrap();
    cache.put(&rus, "Two.", "Два.").await.unwrap();
    cache.put(&ukr, "One.", "Один.").await.unwrap();

    let stores = cache.list_session_stores(&session).unwrap();
    let summary: Vec<(&str, i64)> = stores.iter().map(|(name, stats)| (name.as_str(), stats.entry_count)).collect();
    assert_eq!(summary, vec![("eng_rus_google", 2), ("eng_ukr_google", 1)]);
}

#[test]
fn test_inMemoryCache_shouldHaveNoStorePath() {
    let cache = TranslationCache::in_memory();
    let ns = common::namespace("mem", "eng", "rus", "mock");
    assert!(cache.store_path(&ns).is_none());
    assert!(cache.session_dir(&ns.session).is_none());
}
