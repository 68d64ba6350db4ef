//! MongoDB integration tests using testcontainers
//!
//! Runs the shared backend checks against a real `mongo:7` container.
//!
//! Run tests with:
//! ```bash
//! cargo test -p botkeeper-storage --features mongo-tests --test mongo_integration
//! ```

#![cfg(feature = "mongo-tests")]

mod common;

use botkeeper_core::{NewUser, RecordStore, UserFilter, UserId};
use botkeeper_storage::MongoStore;
use bson::Document;
use common::at;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage,
};

async fn start_mongo() -> (String, ContainerAsync<GenericImage>) {
    let container = GenericImage::new("mongo", "7")
        .with_exposed_port(27017.tcp())
        .with_wait_for(WaitFor::message_on_stdout("Waiting for connections"))
        .start()
        .await
        .expect("Failed to start MongoDB container");

    let port = container
        .get_host_port_ipv4(27017.tcp())
        .await
        .expect("Failed to get mapped port");

    (format!("mongodb://127.0.0.1:{port}"), container)
}

/// Start a container and return a store on a fresh database
async fn create_test_store() -> (MongoStore, ContainerAsync<GenericImage>) {
    let (uri, container) = start_mongo().await;
    let store = botkeeper_storage::connect(&uri, "botkeeper_test")
        .await
        .expect("Failed to create client");
    botkeeper_storage::ensure_indexes(&store)
        .await
        .expect("Failed to create indexes");

    (store, container)
}

#[tokio::test]
async fn test_ping() {
    let (store, _container) = create_test_store().await;
    store.ping().await.unwrap();
    assert_eq!(store.database_name(), "botkeeper_test");
}

#[tokio::test]
async fn test_create_then_touch() {
    let (store, _container) = create_test_store().await;
    common::create_then_touch_keeps_joined_at(&store).await;
}

#[tokio::test]
async fn test_exists_and_touch() {
    let (store, _container) = create_test_store().await;
    common::exists_and_touch(&store).await;
}

#[tokio::test]
async fn test_counts_and_ids() {
    let (store, _container) = create_test_store().await;
    common::counts_and_ids(&store).await;
}

#[tokio::test]
async fn test_interactions_newest_first() {
    let (store, _container) = create_test_store().await;
    common::interactions_newest_first_and_limited(&store).await;
}

#[tokio::test]
async fn test_concurrent_upserts_never_duplicate() {
    let (store, _container) = create_test_store().await;

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .upsert_user(NewUser::new(UserId::new("race")), at(10, 0))
                    .await
            })
        })
        .collect();

    let mut inserted = 0;
    for task in tasks {
        // Losing a race on the unique index may surface as an error; never as a duplicate
        if let Ok(outcome) = task.await.unwrap() {
            if outcome.is_new {
                inserted += 1;
            }
        }
    }

    assert_eq!(inserted, 1);
    assert_eq!(store.count_users(UserFilter::All).await.unwrap(), 1);
    store.close().await;
}

async fn user_index_names(store: &MongoStore) -> Vec<String> {
    store
        .database()
        .collection::<Document>("users")
        .list_index_names()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_first_upsert_creates_unique_index() {
    let (uri, _container) = start_mongo().await;
    // No ensure_indexes call, as when the server was down at startup
    let store = botkeeper_storage::connect(&uri, "botkeeper_test")
        .await
        .unwrap();
    assert!(!store.indexes_ready());

    store
        .upsert_user(NewUser::new(UserId::new("42")), at(10, 0))
        .await
        .unwrap();

    assert!(store.indexes_ready());
    assert!(user_index_names(&store)
        .await
        .contains(&"userId_1".to_string()));
}

#[tokio::test]
async fn test_ping_after_recovery_creates_indexes() {
    let (uri, _container) = start_mongo().await;
    let store = botkeeper_storage::connect(&uri, "botkeeper_test")
        .await
        .unwrap();

    store.ping().await.unwrap();

    assert!(store.indexes_ready());
    assert!(user_index_names(&store)
        .await
        .contains(&"userId_1".to_string()));
}
