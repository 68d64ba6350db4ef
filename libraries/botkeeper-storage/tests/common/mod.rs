//! Behaviour checks shared by every `RecordStore` backend

use botkeeper_core::{NewInteraction, NewUser, RecordStore, UserFilter, UserId};
use chrono::{DateTime, Duration, TimeZone, Utc};

pub fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, h, m, 0).unwrap()
}

pub async fn create_then_touch_keeps_joined_at(store: &dyn RecordStore) {
    let user = NewUser::new(UserId::new("42")).with_first_name("Ann");

    let first = store.upsert_user(user.clone(), at(10, 0)).await.unwrap();
    assert!(first.is_new);
    assert!(first.inserted_id.is_some());

    let second = store
        .upsert_user(user.with_first_name("Changed"), at(11, 0))
        .await
        .unwrap();
    assert!(!second.is_new);
    assert!(second.inserted_id.is_none());

    let users = store.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].joined_at, at(10, 0));
    assert_eq!(users[0].last_active, at(11, 0));
    assert_eq!(users[0].first_name.as_deref(), Some("Ann"));
}

pub async fn exists_and_touch(store: &dyn RecordStore) {
    let id = UserId::new("7");

    assert!(!store.user_exists(&id).await.unwrap());
    assert!(!store.touch_user(&id, at(9, 0)).await.unwrap());

    store.upsert_user(NewUser::new(id.clone()), at(9, 0)).await.unwrap();
    assert!(store.user_exists(&id).await.unwrap());
    assert!(store.touch_user(&id, at(9, 30)).await.unwrap());

    // Touching a missing user must not create it
    assert!(!store.user_exists(&UserId::new("8")).await.unwrap());
}

pub async fn counts_and_ids(store: &dyn RecordStore) {
    store.upsert_user(NewUser::new("a".into()), at(0, 5)).await.unwrap();
    store.upsert_user(NewUser::new("b".into()), at(0, 5) - Duration::minutes(15)).await.unwrap();
    store.touch_user(&"b".into(), at(1, 0)).await.unwrap();

    let midnight = at(0, 0);
    assert_eq!(store.count_users(UserFilter::All).await.unwrap(), 2);
    assert_eq!(store.count_users(UserFilter::JoinedSince(midnight)).await.unwrap(), 1);
    assert_eq!(store.count_users(UserFilter::ActiveSince(midnight)).await.unwrap(), 2);

    let mut ids = store.user_ids().await.unwrap();
    ids.sort();
    assert_eq!(ids, vec![UserId::new("a"), UserId::new("b")]);
}

pub async fn interactions_newest_first_and_limited(store: &dyn RecordStore) {
    let id = UserId::new("42");
    for minute in 0..60 {
        let interaction =
            NewInteraction::new(id.clone(), "command").with_command(format!("/c{minute}"));
        store.insert_interaction(interaction, at(12, minute)).await.unwrap();
    }
    store
        .insert_interaction(NewInteraction::new("other".into(), "start"), at(13, 0))
        .await
        .unwrap();

    let recent = store.recent_interactions(&id, 50).await.unwrap();
    assert_eq!(recent.len(), 50);
    assert_eq!(recent[0].command.as_deref(), Some("/c59"));
    assert!(recent.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
    assert!(recent.iter().all(|i| i.user_id == id));

    assert_eq!(store.count_interactions().await.unwrap(), 61);
    assert!(store.recent_interactions(&"nobody".into(), 50).await.unwrap().is_empty());
}
