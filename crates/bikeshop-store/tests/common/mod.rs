use bikeshop_core::{Bike, BikeType, Carbon, DeletePolicy, EntityId, Owner, Repository, Revision};
use bikeshop_store::{SqliteStore, StoreConfig};
use chrono::NaiveDate;
use tempfile::TempDir;

/// A store backed by a file in a temp directory that lives as long as it
#[allow(dead_code)]
pub struct TempStore {
    pub dir: TempDir,
    pub config: StoreConfig,
    pub store: SqliteStore,
}

#[allow(dead_code)]
pub fn temp_store(policy: DeletePolicy) -> TempStore {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = StoreConfig::at_path(dir.path().join("bikeshop.db")).with_delete_policy(policy);
    let store = SqliteStore::open(&config).expect("Failed to open store");
    TempStore { dir, config, store }
}

#[allow(dead_code)]
pub fn sample_owner() -> Owner {
    Owner::new("Joan", "Puig", "612345678", "joan@example.com")
}

#[allow(dead_code)]
pub fn sample_bike(owner: Owner) -> Bike {
    Bike::new("Orbea", "Orca", 2020, 7.8, BikeType::Road, Carbon::Yes, owner)
}

#[allow(dead_code)]
pub fn sample_revision(bike: Bike) -> Revision {
    let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    Revision::new(date, "Cambio Cadena", 35.5, bike)
}

#[allow(dead_code)]
pub struct Seeded {
    pub owner_id: EntityId,
    pub bike_id: EntityId,
    pub revision_id: EntityId,
}

/// Save an owner, one bike and one revision
#[allow(dead_code)]
pub fn seed(store: &mut SqliteStore) -> Seeded {
    let mut owner = sample_owner();
    let owner_id = Repository::<Owner>::save(store, &mut owner).unwrap();
    let mut bike = sample_bike(owner);
    let bike_id = Repository::<Bike>::save(store, &mut bike).unwrap();
    let mut revision = sample_revision(bike);
    let revision_id = Repository::<Revision>::save(store, &mut revision).unwrap();
    Seeded {
        owner_id,
        bike_id,
        revision_id,
    }
}

#[allow(dead_code)]
pub fn seeded_store(policy: DeletePolicy) -> (SqliteStore, Seeded) {
    let mut store = SqliteStore::open_in_memory(policy).expect("Failed to open store");
    let seeded = seed(&mut store);
    (store, seeded)
}
