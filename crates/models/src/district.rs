//! District: belongs to a county, referenced by schools.
use sea_orm::sea_query::Expr;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set, TransactionTrait};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{county, school};

pub const UNSPECIFIED_CODE: i32 = 0;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "district")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub code: i32,
    pub name: String,
    pub abbreviation: String,
    pub county_code: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    County,
    School,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::County => Entity::belongs_to(county::Entity)
                .from(Column::CountyCode)
                .to(county::Column::Code)
                .into(),
            Relation::School => Entity::has_many(school::Entity).into(),
        }
    }
}

impl Related<county::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::County.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    name: &str,
    abbreviation: &str,
    county_code: i32,
) -> Result<Model, ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("district name required".into()));
    }
    if abbreviation.len() > 2 {
        return Err(ModelError::Validation("district abbreviation longer than 2 characters".into()));
    }
    let am = ActiveModel {
        code: sea_orm::NotSet,
        name: Set(name.to_string()),
        abbreviation: Set(abbreviation.to_string()),
        county_code: Set(county_code),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

/// Primary key of the sentinel row, verified to exist in storage.
pub async fn get_unspecified_value<C: ConnectionTrait>(db: &C) -> Result<i32, ModelError> {
    Entity::find_by_id(UNSPECIFIED_CODE)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?
        .map(|m| m.code)
        .ok_or_else(|| {
            ModelError::Configuration("unspecified district row (code 0) is missing".into())
        })
}

/// Delete a district, rewriting every dependent school to the
/// unspecified district first. Atomic with respect to readers.
pub async fn delete_with_fallback<C>(db: &C, code: i32) -> Result<(), ModelError>
where
    C: ConnectionTrait + TransactionTrait,
{
    if code == UNSPECIFIED_CODE {
        return Err(ModelError::Validation(
            "the unspecified district cannot be deleted".into(),
        ));
    }
    let txn = db.begin().await.map_err(|e| ModelError::Db(e.to_string()))?;
    let fallback = get_unspecified_value(&txn).await?;
    school::Entity::update_many()
        .col_expr(school::Column::DistrictCode, Expr::value(fallback))
        .filter(school::Column::DistrictCode.eq(code))
        .exec(&txn)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    let res = Entity::delete_by_id(code)
        .exec(&txn)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    if res.rows_affected == 0 {
        txn.rollback().await.map_err(|e| ModelError::Db(e.to_string()))?;
        return Err(ModelError::NotFound(format!("district {} not found", code)));
    }
    txn.commit().await.map_err(|e| ModelError::Db(e.to_string()))?;
    tracing::info!(code, fallback, "district deleted, dependent schools redirected");
    Ok(())
}
