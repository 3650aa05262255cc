use super::page::{slugify, Page, PageMeta};
use super::tag::Tag;
use super::user::{hash_password, verify_password, User, UserProfile};

#[test]
fn slugify_normalizes_case_whitespace_and_separators() {
    assert_eq!(slugify("Lobby Welcome Page"), "lobby-welcome-page");
    assert_eq!(slugify("  Mixed_CASE -- page  "), "mixed-case-page");
    assert_eq!(slugify("café & crème"), "caf-crme");
    assert_eq!(slugify("---"), "");
}

#[test]
fn new_page_starts_unpublished_with_matching_timestamps() {
    let page = Page::new(
        "Lobby".to_string(),
        "Lobby Page",
        String::new(),
        Some("author-1".to_string()),
    );
    assert_eq!(page.slug, "lobby-page");
    assert!(!page.published);
    assert_eq!(page.created_at, page.updated_at);
}

#[test]
fn page_meta_counts_decodable_blocks_and_tolerates_broken_content() {
    let good = Page::new(
        "Lobby".to_string(),
        "lobby",
        r#"{"components":[{"type":"Spacer","height":8},{"type":"TextBlock","content":"hi"}]}"#
            .to_string(),
        None,
    );
    assert_eq!(PageMeta::from(&good).component_count, 2);

    let broken = Page::new("Bad".to_string(), "bad", "{corrupted".to_string(), None);
    assert_eq!(PageMeta::from(&broken).component_count, 0);
}

#[test]
fn new_tag_is_neither_registered_nor_assigned() {
    let tag = Tag::new("Lobby Door".to_string());
    assert!(!tag.is_registered());
    assert!(!tag.is_assigned());
}

#[test]
fn password_hashes_are_salted_and_verify_round_trip() {
    let first = hash_password("hunter2");
    let second = hash_password("hunter2");
    assert_ne!(first, second, "salts must differ");
    assert!(verify_password(&first, "hunter2"));
    assert!(verify_password(&second, "hunter2"));
    assert!(!verify_password(&first, "hunter3"));
}

#[test]
fn malformed_hashes_never_verify() {
    // "€0" is four bytes of non-hex UTF-8; rejecting it must not panic on a
    // char boundary.
    for encoded in [
        "",
        "b3v1$xx",
        "b3v1$zz$zz",
        "other$00$00",
        "b3v1$00$00$00",
        "b3v1$€0$00",
    ] {
        assert!(!verify_password(encoded, "hunter2"), "encoded {:?}", encoded);
    }
}

#[test]
fn user_normalizes_email_and_the_profile_omits_the_hash() {
    let user = User::new("Ada".to_string(), "  Ada@Example.COM ", "hunter2");
    assert_eq!(user.email, "ada@example.com");
    assert!(user.verify_password("hunter2"));

    let profile = UserProfile::from(&user);
    assert_eq!(profile.email, "ada@example.com");
    let json = serde_json::to_value(&profile).expect("serialize");
    assert!(json.get("password_hash").is_none());
    assert_eq!(json.get("name").and_then(|v| v.as_str()), Some("Ada"));
}

#[test]
fn user_rows_round_trip_through_serde_with_the_hash_intact() {
    // The stored row must carry the hash or logins break after a restart.
    let user = User::new("Ada".to_string(), "ada@example.com", "hunter2");
    let bytes = serde_json::to_vec(&user).expect("serialize");
    let loaded: User = serde_json::from_slice(&bytes).expect("deserialize");
    assert_eq!(loaded.password_hash, user.password_hash);
    assert!(loaded.verify_password("hunter2"));
}
