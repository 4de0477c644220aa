use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comic")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    #[sea_orm(unique)]
    pub alternative_name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub rating: f32,

    // Closed enums, stored as their canonical labels.
    pub comic_type: String,
    pub pegi: String,
    pub status: String,
    pub transfer_status: String,

    pub author: String,
    pub artist: String,
    pub year: i32,

    pub tags: Vec<String>,
    pub genres: Vec<String>,

    pub views: i64,
    pub likes: i64,
    pub bookmark: i64,
    pub hidden: bool,
    pub is_finished: bool,

    pub image_path: String,
    pub banner_path: String,

    pub published_on: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
