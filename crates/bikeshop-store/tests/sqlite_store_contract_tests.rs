#![allow(clippy::unwrap_used, clippy::expect_used)]

use bikeshop_core::{Bike, DeletePolicy, ExErrorKind, Owner, Repository, Revision};
use bikeshop_store::SqliteStore;

mod common;

use common::{sample_bike, sample_owner, sample_revision, seeded_store};

fn empty_store() -> SqliteStore {
    SqliteStore::open_in_memory(DeletePolicy::Restrict).unwrap()
}

// ===== SAVE / GET =====

#[test]
fn test_save_assigns_id_and_get_returns_equal_entity() {
    let mut store = empty_store();
    let mut owner = sample_owner();

    let id = store.save(&mut owner).unwrap();

    assert_eq!(owner.id, Some(id));
    let read: Owner = store.get(id).unwrap();
    assert_eq!(read, owner);
}

#[test]
fn test_bike_and_revision_round_trip_with_parents() {
    let (store, seeded) = seeded_store(DeletePolicy::Restrict);

    let bike: Bike = store.get(seeded.bike_id).unwrap();
    assert_eq!(bike, {
        let mut expected = sample_bike(store.get(seeded.owner_id).unwrap());
        expected.id = Some(seeded.bike_id);
        expected
    });

    let revision: Revision = store.get(seeded.revision_id).unwrap();
    assert_eq!(revision.bike, bike);
    assert_eq!(revision.bike.owner.id, Some(seeded.owner_id));
    assert_eq!(revision.date.to_string(), "2024-03-15");
}

#[test]
fn test_get_all_is_ordered_by_id() {
    let mut store = empty_store();
    for name in ["Anna", "Berta", "Carles"] {
        let mut owner = sample_owner();
        owner.name = name.to_string();
        store.save(&mut owner).unwrap();
    }

    let all: Vec<Owner> = store.get_all().unwrap();
    let names: Vec<_> = all.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["Anna", "Berta", "Carles"]);
}

#[test]
fn test_get_unknown_id_is_not_found() {
    let store = empty_store();
    for err in [
        Repository::<Owner>::get(&store, 42).unwrap_err(),
        Repository::<Bike>::get(&store, 42).unwrap_err(),
        Repository::<Revision>::get(&store, 42).unwrap_err(),
    ] {
        assert_eq!(err.kind(), ExErrorKind::NotFound);
        assert_eq!(err.entity_id(), Some(42));
    }
}

#[test]
fn test_save_with_taken_id_is_duplicate_key() {
    let (mut store, seeded) = seeded_store(DeletePolicy::Restrict);
    let mut clash = sample_owner();
    clash.id = Some(seeded.owner_id);

    let err = store.save(&mut clash).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::DuplicateKey);
    assert_eq!(Repository::<Owner>::get_all(&store).unwrap().len(), 1);
}

#[test]
fn test_save_with_free_explicit_id_uses_it() {
    let mut store = empty_store();
    let mut owner = sample_owner();
    owner.id = Some(40);
    assert_eq!(store.save(&mut owner).unwrap(), 40);

    let mut next = sample_owner();
    assert_eq!(store.save(&mut next).unwrap(), 41);
}

// ===== PARENT REFERENCES =====

#[test]
fn test_bike_with_unsaved_owner_is_missing_field() {
    let mut store = empty_store();
    let mut bike = sample_bike(sample_owner());

    let err = store.save(&mut bike).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::MissingField);
}

#[test]
fn test_bike_with_unknown_owner_is_parent_not_found() {
    let mut store = empty_store();
    let mut owner = sample_owner();
    owner.id = Some(99);
    let mut bike = sample_bike(owner);

    let err = store.save(&mut bike).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ParentNotFound);
    assert!(bike.id.is_none());
    assert!(Repository::<Bike>::get_all(&store).unwrap().is_empty());
}

#[test]
fn test_revision_with_unknown_bike_is_parent_not_found() {
    let (mut store, _) = seeded_store(DeletePolicy::Restrict);
    let mut bike = sample_bike(sample_owner());
    bike.id = Some(1234);
    let mut revision = sample_revision(bike);

    let err = store.save(&mut revision).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ParentNotFound);
}

// ===== UPDATE =====

#[test]
fn test_update_then_get_reflects_change() {
    let (mut store, seeded) = seeded_store(DeletePolicy::Restrict);
    let mut revision: Revision = store.get(seeded.revision_id).unwrap();
    revision.price = 80.25;
    revision.description = "Frenos Nuevos".to_string();

    store.update(&revision).unwrap();

    let read: Revision = store.get(seeded.revision_id).unwrap();
    assert_eq!(read, revision);
}

#[test]
fn test_owner_update_visible_through_bike() {
    let (mut store, seeded) = seeded_store(DeletePolicy::Restrict);
    let mut owner: Owner = store.get(seeded.owner_id).unwrap();
    owner.phone = "699000111".to_string();
    store.update(&owner).unwrap();

    let bike: Bike = store.get(seeded.bike_id).unwrap();
    assert_eq!(bike.owner.phone, "699000111");
}

#[test]
fn test_update_repoint_to_unknown_parent_fails() {
    let (mut store, seeded) = seeded_store(DeletePolicy::Restrict);
    let mut bike: Bike = store.get(seeded.bike_id).unwrap();
    bike.owner.id = Some(500);

    let err = store.update(&bike).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ParentNotFound);
    let read: Bike = store.get(seeded.bike_id).unwrap();
    assert_eq!(read.owner_id(), Some(seeded.owner_id));
}

#[test]
fn test_update_without_id_or_row() {
    let mut store = empty_store();
    let err = store.update(&sample_owner()).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::MissingField);

    let mut ghost = sample_owner();
    ghost.id = Some(9);
    let err = store.update(&ghost).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

// ===== DELETE =====

#[test]
fn test_deleted_entity_is_gone_for_good() {
    let (mut store, seeded) = seeded_store(DeletePolicy::Restrict);
    let revision: Revision = store.get(seeded.revision_id).unwrap();

    Repository::<Revision>::delete(&mut store, seeded.revision_id).unwrap();

    let get = Repository::<Revision>::get(&store, seeded.revision_id).unwrap_err();
    let update = store.update(&revision).unwrap_err();
    let delete = Repository::<Revision>::delete(&mut store, seeded.revision_id).unwrap_err();
    for err in [get, update, delete] {
        assert_eq!(err.kind(), ExErrorKind::NotFound);
    }
}

#[test]
fn test_restrict_blocks_referenced_parents() {
    let (mut store, seeded) = seeded_store(DeletePolicy::Restrict);

    let err = Repository::<Owner>::delete(&mut store, seeded.owner_id).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ReferentialConflict);

    let err = Repository::<Bike>::delete(&mut store, seeded.bike_id).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ReferentialConflict);
    assert_eq!(err.code(), 2292);

    assert_eq!(Repository::<Owner>::get_all(&store).unwrap().len(), 1);
    assert_eq!(Repository::<Bike>::get_all(&store).unwrap().len(), 1);
    assert_eq!(Repository::<Revision>::get_all(&store).unwrap().len(), 1);
}

#[test]
fn test_cascade_removes_revisions_in_one_step() {
    let (mut store, seeded) = seeded_store(DeletePolicy::Cascade);
    let mut second = sample_revision(store.get(seeded.bike_id).unwrap());
    store.save(&mut second).unwrap();

    Repository::<Bike>::delete(&mut store, seeded.bike_id).unwrap();

    assert!(Repository::<Revision>::get_all(&store).unwrap().is_empty());
    assert!(Repository::<Bike>::get_all(&store).unwrap().is_empty());
    assert_eq!(Repository::<Owner>::get_all(&store).unwrap().len(), 1);
}

#[test]
fn test_cascade_never_applies_to_owners() {
    let (mut store, seeded) = seeded_store(DeletePolicy::Cascade);

    let err = Repository::<Owner>::delete(&mut store, seeded.owner_id).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ReferentialConflict);
    assert_eq!(Repository::<Bike>::get_all(&store).unwrap().len(), 1);
}

#[test]
fn test_cascade_delete_of_unknown_bike_is_not_found() {
    let mut store = SqliteStore::open_in_memory(DeletePolicy::Cascade).unwrap();
    let err = Repository::<Bike>::delete(&mut store, 5).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}
