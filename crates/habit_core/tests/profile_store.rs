use habit_core::{
    FileSlotStore, Profile, ProfileStore, SlotStore, SqliteSlotStore, StorageError,
    StorageResult, PROFILE_SLOT,
};

struct BrokenSlots;

impl SlotStore for BrokenSlots {
    fn backend(&self) -> &'static str {
        "broken"
    }

    fn read_slot(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::InvalidDocument("unreadable".to_string()))
    }

    fn write_slot(&self, _key: &str, _document: &str) -> StorageResult<()> {
        Err(StorageError::InvalidDocument("unwritable".to_string()))
    }
}

fn sample_profile() -> Profile {
    Profile {
        name: "Sam".to_string(),
        email: "sam@example.com".to_string(),
        bio: "early riser".to_string(),
        profile_picture: Some("file:///avatar.jpg".to_string()),
    }
}

#[test]
fn missing_profile_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProfileStore::load(Box::new(FileSlotStore::new(dir.path())));
    assert_eq!(store.profile(), &Profile::default());
    assert_eq!(store.profile().name, "User");
}

#[test]
fn saved_profile_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = ProfileStore::load(Box::new(FileSlotStore::new(dir.path())));
    store.save(sample_profile()).unwrap();

    let reloaded = ProfileStore::load(Box::new(FileSlotStore::new(dir.path())));
    assert_eq!(reloaded.profile(), &sample_profile());

    let document = std::fs::read_to_string(dir.path().join("profile.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&document).unwrap();
    assert_eq!(json["profilePicture"], "file:///avatar.jpg");
}

#[test]
fn malformed_profile_falls_back_to_defaults() {
    let slots = SqliteSlotStore::open_in_memory().unwrap();
    slots.write_slot(PROFILE_SLOT, "[1, 2]").unwrap();
    let store = ProfileStore::load(Box::new(slots));
    assert_eq!(store.profile(), &Profile::default());
}

#[test]
fn failed_save_reports_error_but_keeps_new_value() {
    let mut store = ProfileStore::load(Box::new(BrokenSlots));
    assert_eq!(store.profile(), &Profile::default());

    assert!(store.save(sample_profile()).is_err());
    assert_eq!(store.profile(), &sample_profile());
}
