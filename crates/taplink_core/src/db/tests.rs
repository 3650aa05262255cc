use super::TransactionOps;
use crate::content::TagLookup;
use crate::models::page::{Page, UpdatePageRequest};
use crate::models::tag::Tag;
use crate::models::tap::TapRecord;
use crate::models::user::User;
use crate::test_support::setup_temp_db;

fn insert_page(db: &crate::Database, name: &str, slug: &str) -> Page {
    let page = Page::new(name.to_string(), slug, String::new(), None);
    db.pages.create(&page).expect("create page");
    page
}

fn insert_tag(db: &crate::Database, name: &str) -> Tag {
    let tag = Tag::new(name.to_string());
    db.tags.create(&tag).expect("create tag");
    tag
}

#[test]
fn page_create_get_and_slug_lookup() {
    let (db, _tmp) = setup_temp_db();
    let page = insert_page(&db, "Lobby", "Lobby Page");

    let by_id = db.pages.get(&page.id).expect("get").expect("found");
    assert_eq!(by_id.name, "Lobby");
    let by_slug = db
        .pages
        .get_by_slug("lobby-page")
        .expect("get_by_slug")
        .expect("found");
    assert_eq!(by_slug.id, page.id);
    assert!(db.pages.get("missing").expect("get").is_none());
}

#[test]
fn duplicate_page_slug_is_a_conflict() {
    let (db, _tmp) = setup_temp_db();
    insert_page(&db, "Lobby", "lobby");

    let dup = Page::new("Other".to_string(), "lobby", String::new(), None);
    let err = db.pages.create(&dup).expect_err("must fail");
    assert!(matches!(err, crate::AppError::Conflict(_)), "got {:?}", err);
    assert_eq!(db.pages.count().expect("count"), 1);
}

#[test]
fn page_update_is_partial_and_keeps_the_slug() {
    let (db, _tmp) = setup_temp_db();
    let page = insert_page(&db, "Lobby", "lobby");

    let updated = db
        .pages
        .update(
            &page.id,
            &UpdatePageRequest {
                name: Some("Lobby v2".to_string()),
                content: None,
                published: Some(true),
            },
        )
        .expect("update")
        .expect("found");
    assert_eq!(updated.name, "Lobby v2");
    assert_eq!(updated.slug, "lobby");
    assert_eq!(updated.content, page.content);
    assert!(updated.published);
    assert!(updated.updated_at >= page.updated_at);
}

#[test]
fn save_content_overwrites_only_the_content_string() {
    let (db, _tmp) = setup_temp_db();
    let page = insert_page(&db, "Lobby", "lobby");
    let content = r#"{"components":[{"type":"Spacer","height":8}]}"#;

    let updated = db
        .pages
        .save_content(&page.id, content)
        .expect("save")
        .expect("found");
    assert_eq!(updated.content, content);
    assert_eq!(updated.name, "Lobby");

    let metas = db.pages.list_meta().expect("list");
    assert_eq!(metas.len(), 1);
    assert_eq!(metas[0].component_count, 1);
}

#[test]
fn list_meta_orders_by_most_recent_update() {
    let (db, _tmp) = setup_temp_db();
    let first = insert_page(&db, "First", "first");
    let second = insert_page(&db, "Second", "second");
    db.pages
        .save_content(&first.id, r#"{"components":[]}"#)
        .expect("touch");

    let metas = db.pages.list_meta().expect("list");
    let ids: Vec<_> = metas.iter().map(|meta| meta.id.as_str()).collect();
    assert_eq!(ids, vec![first.id.as_str(), second.id.as_str()]);
}

#[test]
fn register_uid_is_idempotent_for_the_same_record() {
    let (db, _tmp) = setup_temp_db();
    let tag = insert_tag(&db, "Lobby Door");

    let registered = db
        .tags
        .register_uid(&tag.id, "04:a2:ff")
        .expect("register")
        .expect("found");
    assert_eq!(registered.tag_uid.as_deref(), Some("04:a2:ff"));

    let again = db
        .tags
        .register_uid(&tag.id, "04:a2:ff")
        .expect("re-register")
        .expect("found");
    assert_eq!(again.tag_uid.as_deref(), Some("04:a2:ff"));
}

#[test]
fn register_uid_held_by_another_record_is_a_conflict() {
    let (db, _tmp) = setup_temp_db();
    let first = insert_tag(&db, "First");
    let second = insert_tag(&db, "Second");
    db.tags
        .register_uid(&first.id, "04:a2:ff")
        .expect("register");

    let err = db
        .tags
        .register_uid(&second.id, "04:a2:ff")
        .expect_err("must fail");
    assert!(matches!(err, crate::AppError::Conflict(_)), "got {:?}", err);
    let unchanged = db.tags.get(&second.id).expect("get").expect("found");
    assert!(unchanged.tag_uid.is_none());
}

#[test]
fn re_registering_a_new_uid_releases_the_old_one() {
    let (db, _tmp) = setup_temp_db();
    let tag = insert_tag(&db, "Lobby Door");
    db.tags.register_uid(&tag.id, "04:a2:ff").expect("register");
    db.tags.register_uid(&tag.id, "04:b3:00").expect("re-register");

    assert!(db.tags.get_by_uid("04:a2:ff").expect("lookup").is_none());
    let by_new = db
        .tags
        .get_by_uid("04:b3:00")
        .expect("lookup")
        .expect("found");
    assert_eq!(by_new.id, tag.id);
}

#[test]
fn assign_page_sets_and_clears_the_reference() {
    let (db, _tmp) = setup_temp_db();
    let page = insert_page(&db, "Lobby", "lobby");
    let tag = insert_tag(&db, "Lobby Door");

    let assigned = db
        .tags
        .assign_page(&tag.id, Some(&page.id))
        .expect("assign")
        .expect("found");
    assert_eq!(assigned.page_id.as_deref(), Some(page.id.as_str()));

    let cleared = db
        .tags
        .assign_page(&tag.id, None)
        .expect("unassign")
        .expect("found");
    assert!(cleared.page_id.is_none());
}

#[test]
fn tag_counts_track_lifecycle_states() {
    let (db, _tmp) = setup_temp_db();
    let page = insert_page(&db, "Lobby", "lobby");
    let registered = insert_tag(&db, "Registered");
    let assigned = insert_tag(&db, "Assigned");
    insert_tag(&db, "Blank");

    db.tags
        .register_uid(&registered.id, "04:a2:ff")
        .expect("register");
    db.tags
        .register_uid(&assigned.id, "04:b3:00")
        .expect("register");
    db.tags
        .assign_page(&assigned.id, Some(&page.id))
        .expect("assign");

    let counts = db.tags.counts().expect("counts");
    assert_eq!(counts.total, 3);
    assert_eq!(counts.registered, 2);
    assert_eq!(counts.assigned, 1);
}

#[test]
fn deleting_a_tag_removes_its_uid_index_but_keeps_taps() {
    let (db, _tmp) = setup_temp_db();
    let page = insert_page(&db, "Lobby", "lobby");
    let tag = insert_tag(&db, "Lobby Door");
    db.tags.register_uid(&tag.id, "04:a2:ff").expect("register");
    db.taps
        .record(&TapRecord::new(tag.id.clone(), page.id.clone(), None))
        .expect("record");

    assert!(db.tags.delete(&tag.id).expect("delete"));
    assert!(db.tags.get_by_uid("04:a2:ff").expect("lookup").is_none());
    assert_eq!(db.taps.count_total().expect("count"), 1);
    assert!(!db.tags.delete(&tag.id).expect("second delete"));
}

#[test]
fn deleting_a_page_unassigns_every_referencing_tag() {
    let (db, _tmp) = setup_temp_db();
    let page = insert_page(&db, "Lobby", "lobby");
    let first = insert_tag(&db, "First");
    let second = insert_tag(&db, "Second");
    let other = insert_tag(&db, "Other");
    let other_page = insert_page(&db, "Other", "other");

    db.tags
        .assign_page(&first.id, Some(&page.id))
        .expect("assign");
    db.tags
        .assign_page(&second.id, Some(&page.id))
        .expect("assign");
    db.tags
        .assign_page(&other.id, Some(&other_page.id))
        .expect("assign");

    assert!(TransactionOps::delete_page_with_unassign(&db, &page.id).expect("delete"));

    assert!(db.pages.get(&page.id).expect("get").is_none());
    assert!(db.pages.get_by_slug("lobby").expect("get").is_none());
    for id in [&first.id, &second.id] {
        let tag = db.tags.get(id).expect("get").expect("found");
        assert!(tag.page_id.is_none(), "tag {} still assigned", tag.name);
    }
    let untouched = db.tags.get(&other.id).expect("get").expect("found");
    assert_eq!(untouched.page_id.as_deref(), Some(other_page.id.as_str()));

    assert!(!TransactionOps::delete_page_with_unassign(&db, &page.id).expect("second delete"));
}

#[test]
fn user_emails_are_unique_and_lookup_is_case_insensitive() {
    let (db, _tmp) = setup_temp_db();
    let user = User::new("Ada".to_string(), "ada@example.com", "hunter2");
    db.users.create(&user).expect("create");

    let dup = User::new("Ada Again".to_string(), "ADA@example.com", "other");
    let err = db.users.create(&dup).expect_err("must fail");
    assert!(matches!(err, crate::AppError::Conflict(_)), "got {:?}", err);

    let found = db
        .users
        .get_by_email(" Ada@Example.COM ")
        .expect("lookup")
        .expect("found");
    assert_eq!(found.id, user.id);
    assert_eq!(db.users.count().expect("count"), 1);
}

#[test]
fn stored_users_load_back_with_a_verifiable_password_hash() {
    let (db, _tmp) = setup_temp_db();
    let user = User::new("Ada".to_string(), "ada@example.com", "hunter2");
    db.users.create(&user).expect("create");

    let by_email = db
        .users
        .get_by_email("ada@example.com")
        .expect("lookup")
        .expect("found");
    assert_eq!(by_email.password_hash, user.password_hash);
    assert!(by_email.verify_password("hunter2"));

    let by_id = db.users.get(&user.id).expect("lookup").expect("found");
    assert!(by_id.verify_password("hunter2"));
}

#[test]
fn tap_counts_per_tag_use_the_secondary_index() {
    let (db, _tmp) = setup_temp_db();
    let page = insert_page(&db, "Lobby", "lobby");
    let busy = insert_tag(&db, "Busy");
    let quiet = insert_tag(&db, "Quiet");

    for _ in 0..3 {
        db.taps
            .record(&TapRecord::new(busy.id.clone(), page.id.clone(), None))
            .expect("record");
    }
    db.taps
        .record(&TapRecord::new(quiet.id.clone(), page.id.clone(), None))
        .expect("record");

    assert_eq!(db.taps.count_for_tag(&busy.id).expect("count"), 3);
    assert_eq!(db.taps.count_for_tag(&quiet.id).expect("count"), 1);
    assert_eq!(db.taps.count_total().expect("count"), 4);
}

#[test]
fn tap_summary_orders_by_count_and_includes_zero_count_tags() {
    let (db, _tmp) = setup_temp_db();
    let page = insert_page(&db, "Lobby", "lobby");
    let busy = insert_tag(&db, "Busy");
    let idle = insert_tag(&db, "Idle");

    for _ in 0..2 {
        db.taps
            .record(&TapRecord::new(busy.id.clone(), page.id.clone(), None))
            .expect("record");
    }

    let tags = db.tags.list().expect("list");
    let summary = db.taps.summary(&tags).expect("summary");
    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].tag_name, "Busy");
    assert_eq!(summary[0].tap_count, 2);
    assert_eq!(summary[1].tag_name, "Idle");
    assert_eq!(summary[1].tap_count, 0);
}

#[test]
fn database_implements_the_resolver_lookup() {
    let (db, _tmp) = setup_temp_db();
    let page = insert_page(&db, "Lobby", "lobby");
    let tag = insert_tag(&db, "Lobby Door");
    db.tags.register_uid(&tag.id, "04:a2:ff").expect("register");
    db.tags
        .assign_page(&tag.id, Some(&page.id))
        .expect("assign");

    let loaded = db
        .load_tag_by_uid("04:a2:ff")
        .expect("lookup")
        .expect("found");
    assert_eq!(loaded.page_id.as_deref(), Some(page.id.as_str()));
    let loaded_page = db.load_page(&page.id).expect("load").expect("found");
    assert_eq!(loaded_page.slug, "lobby");
    assert!(db.load_tag_by_uid("unknown").expect("lookup").is_none());
}
