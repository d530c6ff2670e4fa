//! Integration tests for the demo directory seed.

use std::sync::Arc;

use csa_loop::models::{base, farmer, farmer_base, seasonal_product};
use csa_loop::repositories::{ALL_AREAS, BaseRef, FarmerInput, FarmerRepository, NewBase};
use csa_loop::seeds::{SeedOutcome, seed_directory};
use sea_orm::{EntityTrait, PaginatorTrait};

#[path = "test_utils/mod.rs"]
mod test_utils;

#[tokio::test]
async fn seeds_directory_once() {
    let db = test_utils::setup_test_db().await.unwrap();

    let first = seed_directory(&db).await.unwrap();
    assert_eq!(
        first,
        SeedOutcome::Seeded {
            bases: 4,
            farmers: 4,
            seasonal_products: 16
        }
    );

    let second = seed_directory(&db).await.unwrap();
    assert_eq!(second, SeedOutcome::AlreadySeeded);

    assert_eq!(base::Entity::find().count(&db).await.unwrap(), 4);
    assert_eq!(farmer::Entity::find().count(&db).await.unwrap(), 4);
    assert_eq!(farmer_base::Entity::find().count(&db).await.unwrap(), 4);
    assert_eq!(seasonal_product::Entity::find().count(&db).await.unwrap(), 16);
}

#[tokio::test]
async fn seeded_directory_is_readable() {
    let db = test_utils::setup_test_db().await.unwrap();
    seed_directory(&db).await.unwrap();
    let repo = FarmerRepository::new(Arc::new(db.clone()));

    let detail = repo.get_farmer_by_id(1).await.unwrap().unwrap();
    assert_eq!(detail.name, "まぁずファーム");
    assert_eq!(detail.base_name, "Nui. HOSTEL & BAR LOUNGE");
    assert_eq!(detail.seasonal_products.len(), 4);

    let page = repo
        .get_farmers_with_pagination(ALL_AREAS, 1, 9)
        .await
        .unwrap();
    assert_eq!(page.total, 4);
    assert_eq!(page.farmers.iter().map(|f| f.id).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn creates_after_seeding_get_fresh_ids() {
    let db = test_utils::setup_test_db().await.unwrap();
    seed_directory(&db).await.unwrap();
    let owner = test_utils::insert_user(&db, "owner@example.com").await.unwrap();
    let repo = FarmerRepository::new(Arc::new(db.clone()));

    let farmer_id = repo
        .create_farmer(test_utils::farmer_input("New Farm", 2), owner)
        .await
        .unwrap();
    assert_eq!(farmer_id, 5);

    let custom = FarmerInput::new(
        "Another Farm",
        "Tokyo",
        BaseRef::Custom(NewBase {
            name: "LOOP新拠点".to_string(),
            area: "墨田区エリア".to_string(),
            station: "両国駅".to_string(),
            address: None,
            description: None,
        }),
    );
    let second = repo.create_farmer(custom, owner).await.unwrap();
    let detail = repo.get_farmer_by_id(second).await.unwrap().unwrap();
    assert_eq!(second, 6);
    assert_eq!(detail.base_id, 5);
}
