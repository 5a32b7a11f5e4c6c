use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "roasts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub birthdate: Date,
    pub hobbies: String,
    pub nationality: String,
    pub zodiac_sign: String,
    #[sea_orm(column_type = "Text")]
    pub roast_text: String,
    pub status: String,
    pub image_url: Option<String>,
    pub image_storage_ref: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
