#![allow(clippy::unwrap_used, clippy::expect_used)]

use bikeshop_core::{
    Bike, DeletePolicy, ExErrorKind, MemoryStore, Owner, Repository, Revision,
};

mod common;

use common::{sample_bike, sample_owner, sample_revision, seeded_store};

// ===== SAVE / GET =====

#[test]
fn test_save_assigns_id_and_get_returns_equal_entity() {
    let mut store = MemoryStore::new();
    let mut owner = sample_owner();

    let id = store.save(&mut owner).unwrap();

    assert_eq!(owner.id, Some(id));
    let read: Owner = store.get(id).unwrap();
    assert_eq!(read, owner);
}

#[test]
fn test_get_all_is_ordered_by_id() {
    let mut store = MemoryStore::new();
    for name in ["Anna", "Berta", "Carles"] {
        let mut owner = sample_owner();
        owner.name = name.to_string();
        store.save(&mut owner).unwrap();
    }

    let all: Vec<Owner> = store.get_all().unwrap();
    let names: Vec<_> = all.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["Anna", "Berta", "Carles"]);
    assert!(all.windows(2).all(|w| w[0].id < w[1].id));
}

#[test]
fn test_get_unknown_id_is_not_found() {
    let store = MemoryStore::new();
    let err = Repository::<Bike>::get(&store, 42).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.code(), 1403);
}

#[test]
fn test_save_with_taken_id_is_duplicate_key() {
    let (mut store, seeded) = seeded_store(DeletePolicy::Restrict);
    let mut clash = sample_owner();
    clash.id = Some(seeded.owner_id);

    let err = store.save(&mut clash).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::DuplicateKey);
    assert_eq!(err.code(), 1);
    assert_eq!(Repository::<Owner>::get_all(&store).unwrap().len(), 1);
}

// ===== PARENT REFERENCES =====

#[test]
fn test_save_with_last_representable_id_is_rejected() {
    let mut store = MemoryStore::new();
    let mut owner = sample_owner();
    owner.id = Some(i64::MAX);

    let err = store.save(&mut owner).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Persistence);
    assert_eq!(err.code(), 942);
    let all: Vec<Owner> = store.get_all().unwrap();
    assert!(all.is_empty());

    let mut next = sample_owner();
    assert_eq!(store.save(&mut next).unwrap(), 1);
}

#[test]
fn test_bike_with_unsaved_owner_is_missing_field() {
    let mut store = MemoryStore::new();
    let mut bike = sample_bike(sample_owner());

    let err = store.save(&mut bike).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::MissingField);
    assert!(bike.id.is_none());
}

#[test]
fn test_bike_with_unknown_owner_is_parent_not_found() {
    let mut store = MemoryStore::new();
    let mut owner = sample_owner();
    owner.id = Some(99);
    let mut bike = sample_bike(owner);

    let err = store.save(&mut bike).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ParentNotFound);
    assert_eq!(err.code(), 2291);
    assert!(Repository::<Bike>::get_all(&store).unwrap().is_empty());
}

#[test]
fn test_revision_reads_are_fully_hydrated() {
    let (store, seeded) = seeded_store(DeletePolicy::Restrict);

    let revisions: Vec<Revision> = store.get_all().unwrap();
    assert_eq!(revisions.len(), 1);
    let revision = &revisions[0];
    assert_eq!(revision.id, Some(seeded.revision_id));
    assert_eq!(revision.bike.id, Some(seeded.bike_id));
    assert_eq!(revision.bike.owner.id, Some(seeded.owner_id));
    assert_eq!(revision.bike.owner.name, "Joan");
}

// ===== UPDATE =====

#[test]
fn test_update_then_get_reflects_change() {
    let (mut store, seeded) = seeded_store(DeletePolicy::Restrict);
    let mut bike: Bike = store.get(seeded.bike_id).unwrap();
    bike.weight = 8.1;
    bike.model = "Orca Aero".to_string();

    store.update(&bike).unwrap();

    let read: Bike = store.get(seeded.bike_id).unwrap();
    assert_eq!(read, bike);
}

#[test]
fn test_update_repoints_parent() {
    let (mut store, seeded) = seeded_store(DeletePolicy::Restrict);
    let mut other = sample_owner();
    other.name = "Marta".to_string();
    let other_id = store.save(&mut other).unwrap();

    let mut bike: Bike = store.get(seeded.bike_id).unwrap();
    bike.owner = other;
    store.update(&bike).unwrap();

    let read: Bike = store.get(seeded.bike_id).unwrap();
    assert_eq!(read.owner_id(), Some(other_id));

    let mut ghost = sample_owner();
    ghost.id = Some(500);
    bike.owner = ghost;
    let err = store.update(&bike).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ParentNotFound);
}

#[test]
fn test_update_without_id_is_missing_field() {
    let mut store = MemoryStore::new();
    let err = store.update(&sample_owner()).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::MissingField);
    assert_eq!(err.code(), 1400);
}

#[test]
fn test_update_unknown_id_is_not_found() {
    let mut store = MemoryStore::new();
    let mut owner = sample_owner();
    owner.id = Some(3);
    let err = store.update(&owner).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

// ===== DELETE =====

#[test]
fn test_delete_then_get_is_not_found() {
    let (mut store, seeded) = seeded_store(DeletePolicy::Restrict);

    Repository::<Revision>::delete(&mut store, seeded.revision_id).unwrap();

    let err = Repository::<Revision>::get(&store, seeded.revision_id).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_deleted_entity_cannot_be_updated_or_deleted_again() {
    let (mut store, seeded) = seeded_store(DeletePolicy::Restrict);
    let revision: Revision = store.get(seeded.revision_id).unwrap();
    Repository::<Revision>::delete(&mut store, seeded.revision_id).unwrap();

    assert_eq!(store.update(&revision).unwrap_err().kind(), ExErrorKind::NotFound);
    let err = Repository::<Revision>::delete(&mut store, seeded.revision_id).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_restrict_blocks_owner_with_bikes() {
    let (mut store, seeded) = seeded_store(DeletePolicy::Restrict);

    let err = Repository::<Owner>::delete(&mut store, seeded.owner_id).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ReferentialConflict);
    assert_eq!(err.code(), 2292);
    assert!(Repository::<Owner>::get(&store, seeded.owner_id).is_ok());
    assert!(Repository::<Bike>::get(&store, seeded.bike_id).is_ok());
}

#[test]
fn test_restrict_blocks_bike_with_revisions() {
    let (mut store, seeded) = seeded_store(DeletePolicy::Restrict);

    let err = Repository::<Bike>::delete(&mut store, seeded.bike_id).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ReferentialConflict);
    assert!(Repository::<Revision>::get(&store, seeded.revision_id).is_ok());
}

#[test]
fn test_cascade_removes_bike_revisions() {
    let (mut store, seeded) = seeded_store(DeletePolicy::Cascade);
    let mut second = sample_revision(store.get(seeded.bike_id).unwrap());
    store.save(&mut second).unwrap();

    Repository::<Bike>::delete(&mut store, seeded.bike_id).unwrap();

    assert!(Repository::<Revision>::get_all(&store).unwrap().is_empty());
    assert_eq!(
        Repository::<Bike>::get(&store, seeded.bike_id).unwrap_err().kind(),
        ExErrorKind::NotFound
    );
}

#[test]
fn test_cascade_never_applies_to_owners() {
    let (mut store, seeded) = seeded_store(DeletePolicy::Cascade);

    let err = Repository::<Owner>::delete(&mut store, seeded.owner_id).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ReferentialConflict);
    assert_eq!(Repository::<Bike>::get_all(&store).unwrap().len(), 1);
}

#[test]
fn test_owner_deletable_once_children_are_gone() {
    let (mut store, seeded) = seeded_store(DeletePolicy::Restrict);

    Repository::<Revision>::delete(&mut store, seeded.revision_id).unwrap();
    Repository::<Bike>::delete(&mut store, seeded.bike_id).unwrap();
    Repository::<Owner>::delete(&mut store, seeded.owner_id).unwrap();

    assert!(Repository::<Owner>::get_all(&store).unwrap().is_empty());
}
