//! `interactions` collection queries

use crate::{error::Result, users::id_to_string};
use botkeeper_core::{Interaction, NewInteraction, UserId};
use bson::{doc, serde_helpers::chrono_datetime_as_bson_datetime, Bson, Document};
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const COLLECTION: &str = "interactions";

/// Stored form of an [`Interaction`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionDocument {
    pub user_id: String,
    pub action: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub timestamp: DateTime<Utc>,
    pub command: Option<String>,
    pub channel_key: Option<String>,
    #[serde(default)]
    pub details: Document,
}

impl InteractionDocument {
    fn from_new(interaction: NewInteraction, now: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            user_id: interaction.user_id.into_inner(),
            action: interaction.action,
            timestamp: now,
            command: interaction.command,
            channel_key: interaction.channel_key,
            details: bson::to_document(&interaction.details)?,
        })
    }

    fn into_interaction(self) -> Interaction {
        Interaction {
            user_id: UserId::new(self.user_id),
            action: self.action,
            timestamp: self.timestamp,
            command: self.command,
            channel_key: self.channel_key,
            details: details_to_json(self.details),
        }
    }
}

fn details_to_json(details: Document) -> Map<String, Value> {
    match Bson::Document(details).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn collection<T: Send + Sync>(db: &Database) -> Collection<T> {
    db.collection::<T>(COLLECTION)
}

/// Create the `(userId, timestamp desc)` index used by history lookups
pub async fn create_indexes(db: &Database) -> Result<()> {
    let index = IndexModel::builder()
        .keys(doc! { "userId": 1, "timestamp": -1 })
        .build();

    collection::<Document>(db).create_index(index).await?;
    Ok(())
}

/// Append one interaction, returning the generated `_id`
pub async fn insert(
    db: &Database,
    interaction: NewInteraction,
    now: DateTime<Utc>,
) -> Result<String> {
    let doc = InteractionDocument::from_new(interaction, now)?;
    let result = collection::<InteractionDocument>(db).insert_one(doc).await?;

    Ok(id_to_string(&result.inserted_id))
}

/// Get at most `limit` interactions for a user, newest first
///
/// `_id` breaks ties between interactions stamped in the same millisecond.
pub async fn get_recent(
    db: &Database,
    user_id: &UserId,
    limit: usize,
) -> Result<Vec<Interaction>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let docs: Vec<InteractionDocument> = collection::<InteractionDocument>(db)
        .find(doc! { "userId": user_id.as_str() })
        .sort(doc! { "timestamp": -1, "_id": -1 })
        .limit(limit)
        .projection(doc! { "_id": 0 })
        .await?
        .try_collect()
        .await?;

    Ok(docs
        .into_iter()
        .map(InteractionDocument::into_interaction)
        .collect())
}

/// Count all interactions
pub async fn count(db: &Database) -> Result<u64> {
    Ok(collection::<Document>(db).count_documents(doc! {}).await?)
}
