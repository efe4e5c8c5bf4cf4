use bikeshop_core::{
    Bike, BikeForm, BikeType, Carbon, DeletePolicy, EntityId, MemoryStore, Owner, OwnerForm,
    Repository, Revision, RevisionForm,
};
use chrono::NaiveDate;

/// A valid, transient owner
#[allow(dead_code)]
pub fn sample_owner() -> Owner {
    Owner::new("Joan", "Puig", "612345678", "joan@example.com")
}

/// A valid, transient bike for `owner`
#[allow(dead_code)]
pub fn sample_bike(owner: Owner) -> Bike {
    Bike::new("Orbea", "Orca", 2020, 7.8, BikeType::Road, Carbon::Yes, owner)
}

/// A valid, transient revision for `bike`
#[allow(dead_code)]
pub fn sample_revision(bike: Bike) -> Revision {
    let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    Revision::new(date, "Cambio Cadena", 35.5, bike)
}

#[allow(dead_code)]
pub fn owner_form() -> OwnerForm {
    OwnerForm::new()
        .name("Núria")
        .surname("Vidal Soler")
        .phone("699111222")
        .email("nuria@example.com")
}

#[allow(dead_code)]
pub fn bike_form(owner_id: EntityId) -> BikeForm {
    BikeForm::new()
        .brand("Cannondale")
        .model("Topstone")
        .year("2022")
        .weight("9.4")
        .bike_type("gravel")
        .carbon("no")
        .owner_id(owner_id)
}

#[allow(dead_code)]
pub fn revision_form(bike_id: EntityId) -> RevisionForm {
    RevisionForm::new()
        .date("2024-05-02")
        .description("Revisión General")
        .price("60")
        .bike_id(bike_id)
}

/// Ids of one owner, one of their bikes and one revision of that bike
#[allow(dead_code)]
pub struct Seeded {
    pub owner_id: EntityId,
    pub bike_id: EntityId,
    pub revision_id: EntityId,
}

/// Save an owner, a bike and a revision through the repository contract
#[allow(dead_code)]
pub fn seed<R>(repo: &mut R) -> Seeded
where
    R: Repository<Owner> + Repository<Bike> + Repository<Revision>,
{
    let mut owner = sample_owner();
    let owner_id = Repository::<Owner>::save(repo, &mut owner).unwrap();
    let mut bike = sample_bike(owner);
    let bike_id = Repository::<Bike>::save(repo, &mut bike).unwrap();
    let mut revision = sample_revision(bike);
    let revision_id = Repository::<Revision>::save(repo, &mut revision).unwrap();
    Seeded {
        owner_id,
        bike_id,
        revision_id,
    }
}

/// Memory store holding one seeded owner/bike/revision chain
#[allow(dead_code)]
pub fn seeded_store(policy: DeletePolicy) -> (MemoryStore, Seeded) {
    let mut store = MemoryStore::with_policy(policy);
    let seeded = seed(&mut store);
    (store, seeded)
}
