//! Profile: one row per external user identity, referencing a school.
//!
//! Unlike the reference entities, profiles are owned per-user: when the
//! owning identity is destroyed the row is deleted, never redirected to
//! a sentinel.
use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set, SqlErr};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::school;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub school_code: i32,
    pub year_of_graduation: i16,
    pub phone: String,
    pub parent_phone: String,
    pub gdpr: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    School,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::School => Entity::belongs_to(school::Entity)
                .from(Column::SchoolCode)
                .to(school::Column::Code)
                .into(),
        }
    }
}

impl Related<school::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields for a new profile row. Owner names come from the identity
/// provider, not from caller-supplied payloads.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub school_code: i32,
    pub year_of_graduation: i16,
    pub phone: String,
    pub parent_phone: String,
    pub gdpr: bool,
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewProfile) -> Result<Model, ModelError> {
    let now = Utc::now().into();
    let am = ActiveModel {
        user_id: Set(new.user_id),
        first_name: Set(new.first_name),
        last_name: Set(new.last_name),
        nickname: Set(new.nickname),
        school_code: Set(new.school_code),
        year_of_graduation: Set(new.year_of_graduation),
        phone: Set(new.phone),
        parent_phone: Set(new.parent_phone),
        gdpr: Set(new.gdpr),
        created_at: Set(now),
        updated_at: Set(now),
    };
    // Two concurrent registrations can both pass the pre-insert lookup;
    // the loser's key violation is still a caller error, not a fault.
    am.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            ModelError::Validation("profile already exists for this user".into())
        }
        _ => ModelError::Db(e.to_string()),
    })
}

pub async fn find_by_user<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> Result<Option<Model>, ModelError> {
    Entity::find_by_id(user_id)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// Remove a profile row (cascade side of the identity relationship).
pub async fn hard_delete<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<(), ModelError> {
    let res = Entity::delete_by_id(user_id)
        .exec(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    if res.rows_affected == 0 {
        return Err(ModelError::NotFound(format!("profile {} not found", user_id)));
    }
    Ok(())
}
