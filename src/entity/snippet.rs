use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "snippet")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub code: String,
    pub linenos: bool,
    /// Member of `models::snippet::LANGUAGE_CHOICES`; enforced at validation.
    pub language: String,
    /// Member of `models::snippet::STYLE_CHOICES`; enforced at validation.
    pub style: String,

    /// NULL only for records created outside the API surface.
    /// Set once at creation; never altered by an update.
    pub owner_id: Option<i32>,
    #[sea_orm(belongs_to, from = "owner_id", to = "id")]
    pub owner: BelongsTo<Option<super::user::Entity>>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
