//! `users` collection queries

use crate::error::Result;
use botkeeper_core::{NewUser, User, UserFilter, UserId, UserUpsert};
use bson::{doc, serde_helpers::chrono_datetime_as_bson_datetime, Bson, Document};
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::{options::IndexOptions, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};

pub const COLLECTION: &str = "users";

/// Stored form of a [`User`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub language_code: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub joined_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub last_active: DateTime<Utc>,
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self {
            user_id: UserId::new(doc.user_id),
            first_name: doc.first_name,
            last_name: doc.last_name,
            username: doc.username,
            language_code: doc.language_code,
            joined_at: doc.joined_at,
            last_active: doc.last_active,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserIdDocument {
    user_id: String,
}

fn collection<T: Send + Sync>(db: &Database) -> Collection<T> {
    db.collection::<T>(COLLECTION)
}

fn by_id(user_id: &UserId) -> Document {
    doc! { "userId": user_id.as_str() }
}

/// Render an inserted `_id` the way clients expect to see it
pub(crate) fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Create the unique `userId` index
pub async fn create_indexes(db: &Database) -> Result<()> {
    let index = IndexModel::builder()
        .keys(doc! { "userId": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();

    collection::<Document>(db).create_index(index).await?;
    Ok(())
}

/// Insert the user or bump `lastActive` on the existing document
///
/// A single upsert: profile fields and `joinedAt` are only written when the
/// document is created, so a repeat call never rewrites them.
pub async fn upsert(db: &Database, user: NewUser, now: DateTime<Utc>) -> Result<UserUpsert> {
    let now = bson::DateTime::from_chrono(now);
    let update = doc! {
        "$set": { "lastActive": now },
        "$setOnInsert": {
            "firstName": user.first_name,
            "lastName": user.last_name,
            "username": user.username,
            "languageCode": user.language_code,
            "joinedAt": now,
        },
    };

    let result = collection::<Document>(db)
        .update_one(by_id(&user.user_id), update)
        .upsert(true)
        .await?;

    Ok(match result.upserted_id {
        Some(id) => UserUpsert::inserted(id_to_string(&id)),
        None => UserUpsert::touched(),
    })
}

/// Check if a user document exists
pub async fn exists(db: &Database, user_id: &UserId) -> Result<bool> {
    let found = collection::<Document>(db)
        .find_one(by_id(user_id))
        .projection(doc! { "_id": 1 })
        .await?;

    Ok(found.is_some())
}

/// Set `lastActive` to `now`
pub async fn touch(db: &Database, user_id: &UserId, now: DateTime<Utc>) -> Result<bool> {
    let result = collection::<Document>(db)
        .update_one(
            by_id(user_id),
            doc! { "$set": { "lastActive": bson::DateTime::from_chrono(now) } },
        )
        .await?;

    Ok(result.modified_count > 0)
}

/// Get all users without their `_id`
pub async fn get_all(db: &Database) -> Result<Vec<User>> {
    let docs: Vec<UserDocument> = collection::<UserDocument>(db)
        .find(doc! {})
        .projection(doc! { "_id": 0 })
        .await?
        .try_collect()
        .await?;

    Ok(docs.into_iter().map(User::from).collect())
}

/// Count users matching `filter`
pub async fn count(db: &Database, filter: UserFilter) -> Result<u64> {
    let query = match filter {
        UserFilter::All => doc! {},
        UserFilter::JoinedSince(since) => {
            doc! { "joinedAt": { "$gte": bson::DateTime::from_chrono(since) } }
        }
        UserFilter::ActiveSince(since) => {
            doc! { "lastActive": { "$gte": bson::DateTime::from_chrono(since) } }
        }
    };

    Ok(collection::<Document>(db).count_documents(query).await?)
}

/// Get every `userId`
pub async fn get_ids(db: &Database) -> Result<Vec<UserId>> {
    let docs: Vec<UserIdDocument> = collection::<UserIdDocument>(db)
        .find(doc! {})
        .projection(doc! { "userId": 1, "_id": 0 })
        .await?
        .try_collect()
        .await?;

    Ok(docs.into_iter().map(|d| UserId::new(d.user_id)).collect())
}
