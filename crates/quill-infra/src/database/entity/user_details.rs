//! Profile entity, 1:1 with users.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use quill_core::domain::UserDetails;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub display_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for UserDetails {
    fn from(model: Model) -> Self {
        Self {
            user_id: model.user_id,
            display_name: model.display_name,
            bio: model.bio,
            avatar_url: model.avatar_url,
            website: model.website,
            location: model.location,
        }
    }
}

impl From<UserDetails> for ActiveModel {
    fn from(details: UserDetails) -> Self {
        Self {
            user_id: Set(details.user_id),
            display_name: Set(details.display_name),
            bio: Set(details.bio),
            avatar_url: Set(details.avatar_url),
            website: Set(details.website),
            location: Set(details.location),
            updated_at: Set(chrono::Utc::now().into()),
        }
    }
}
