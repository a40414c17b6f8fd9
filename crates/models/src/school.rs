//! School: belongs to a district, referenced by profiles.
use std::fmt;

use sea_orm::sea_query::Expr;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set, TransactionTrait};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{district, profile};

pub const UNSPECIFIED_CODE: i32 = 0;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "school")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub code: i32,
    pub name: String,
    pub abbreviation: String,
    pub street: String,
    pub city: String,
    pub zip_code: String,
    pub email: String,
    pub district_code: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    District,
    Profile,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::District => Entity::belongs_to(district::Entity)
                .from(Column::DistrictCode)
                .to(district::Column::Code)
                .into(),
            Relation::Profile => Entity::has_many(profile::Entity).into(),
        }
    }
}

impl Related<district::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::District.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Zip code in the printable `"842 15"` form. Values with
    /// non-ASCII characters are returned unchanged rather than split at
    /// a byte offset.
    pub fn printable_zip_code(&self) -> String {
        if self.zip_code.len() > 3 && self.zip_code.is_ascii() {
            format!("{} {}", &self.zip_code[..3], &self.zip_code[3..])
        } else {
            self.zip_code.clone()
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.street.is_empty() && !self.city.is_empty() {
            write!(f, "{}, {}, {}", self.name, self.street, self.city)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// Fields for a new school row; the code is assigned by the database.
#[derive(Debug, Clone, Default)]
pub struct NewSchool {
    pub name: String,
    pub abbreviation: String,
    pub street: String,
    pub city: String,
    pub zip_code: String,
    pub email: String,
    pub district_code: i32,
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewSchool) -> Result<Model, ModelError> {
    if new.name.trim().is_empty() {
        return Err(ModelError::Validation("school name required".into()));
    }
    let am = ActiveModel {
        code: sea_orm::NotSet,
        name: Set(new.name),
        abbreviation: Set(new.abbreviation),
        street: Set(new.street),
        city: Set(new.city),
        zip_code: Set(new.zip_code),
        email: Set(new.email),
        district_code: Set(new.district_code),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

/// Whether a school with this code exists; used by profile validation.
pub async fn exists<C: ConnectionTrait>(db: &C, code: i32) -> Result<bool, ModelError> {
    let found = Entity::find_by_id(code)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(found.is_some())
}

/// Primary key of the sentinel row, verified to exist in storage.
pub async fn get_unspecified_value<C: ConnectionTrait>(db: &C) -> Result<i32, ModelError> {
    Entity::find_by_id(UNSPECIFIED_CODE)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?
        .map(|m| m.code)
        .ok_or_else(|| {
            ModelError::Configuration("unspecified school row (code 0) is missing".into())
        })
}

/// Delete a school, rewriting every dependent profile to the
/// unspecified school first. Atomic with respect to readers.
pub async fn delete_with_fallback<C>(db: &C, code: i32) -> Result<(), ModelError>
where
    C: ConnectionTrait + TransactionTrait,
{
    if code == UNSPECIFIED_CODE {
        return Err(ModelError::Validation(
            "the unspecified school cannot be deleted".into(),
        ));
    }
    let txn = db.begin().await.map_err(|e| ModelError::Db(e.to_string()))?;
    let fallback = get_unspecified_value(&txn).await?;
    profile::Entity::update_many()
        .col_expr(profile::Column::SchoolCode, Expr::value(fallback))
        .filter(profile::Column::SchoolCode.eq(code))
        .exec(&txn)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    let res = Entity::delete_by_id(code)
        .exec(&txn)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    if res.rows_affected == 0 {
        txn.rollback().await.map_err(|e| ModelError::Db(e.to_string()))?;
        return Err(ModelError::NotFound(format!("school {} not found", code)));
    }
    txn.commit().await.map_err(|e| ModelError::Db(e.to_string()))?;
    tracing::info!(code, fallback, "school deleted, dependent profiles redirected");
    Ok(())
}
