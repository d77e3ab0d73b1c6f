use super::*;

#[test]
fn missing_keys_read_as_none() {
    let session = SessionStore::in_memory();
    assert_eq!(session.get_token(), None);
    assert_eq!(session.get_display_name(), None);
    assert!(!session.has_token());
}

#[test]
fn stores_token_and_display_name() {
    let session = SessionStore::in_memory();
    session.set_token("tok1");
    session.set_display_name("Ann");
    assert_eq!(session.get_token().as_deref(), Some("tok1"));
    assert_eq!(session.get_display_name().as_deref(), Some("Ann"));
}

#[test]
fn clear_token_keeps_display_name() {
    let session = SessionStore::in_memory();
    session.set_token("tok1");
    session.set_display_name("Ann");
    session.clear_token();
    assert_eq!(session.get_token(), None);
    assert_eq!(session.get_display_name().as_deref(), Some("Ann"));
}

#[test]
fn clear_drops_both_keys() {
    let session = SessionStore::in_memory();
    session.set_token("abc");
    session.set_display_name("Ann");
    session.clear();
    assert_eq!(session.get_token(), None);
    assert_eq!(session.get_display_name(), None);
}

#[test]
fn display_name_falls_back_to_default() {
    let session = SessionStore::in_memory();
    assert_eq!(session.display_name_or_default(), "User");
    session.set_display_name("Ann");
    assert_eq!(session.display_name_or_default(), "Ann");
}

#[test]
fn memory_store_uses_browser_key_names() {
    let store = Arc::new(MemoryStore::with_entries([("token", "abc"), ("user_name", "Bo")]));
    let session = SessionStore::new(store.clone());
    assert_eq!(session.get_token().as_deref(), Some("abc"));
    session.clear();
    assert_eq!(store.get(TOKEN_KEY), None);
    assert_eq!(store.get(USER_NAME_KEY), None);
}

#[test]
fn file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("session.json");

    {
        let session = SessionStore::open_file(&path).expect("open");
        session.set_token("tok1");
        session.set_display_name("Ann");
    }

    let reopened = SessionStore::open_file(&path).expect("reopen");
    assert_eq!(reopened.get_token().as_deref(), Some("tok1"));
    assert_eq!(reopened.get_display_name().as_deref(), Some("Ann"));

    reopened.clear();
    let cleared = SessionStore::open_file(&path).expect("reopen after clear");
    assert!(!cleared.has_token());
}

#[test]
fn corrupt_file_opens_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.json");
    fs::write(&path, b"not json").expect("write");

    let store = JsonFileStore::open(&path).expect("open");
    assert_eq!(store.get(TOKEN_KEY), None);

    store.set(TOKEN_KEY, "fresh");
    let raw = fs::read_to_string(&path).expect("read back");
    assert!(raw.contains("fresh"));
}
