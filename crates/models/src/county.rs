//! County: root of the reference hierarchy, referenced by districts.
use sea_orm::sea_query::Expr;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set, TransactionTrait};
use serde::{Deserialize, Serialize};

use crate::district;
use crate::errors::ModelError;

/// Code of the per-entity "unspecified" sentinel row. Dependents of a
/// deleted county are rewritten to this code.
pub const UNSPECIFIED_CODE: i32 = 0;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "county")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub code: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    District,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::District => Entity::has_many(district::Entity).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(db: &C, name: &str) -> Result<Model, ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("county name required".into()));
    }
    let am = ActiveModel {
        code: sea_orm::NotSet,
        name: Set(name.to_string()),
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
            ModelError::Configuration("unspecified county row (code 0) is missing".into())
        })
}

/// Delete a county, rewriting every dependent district to the
/// unspecified county first. Rewrite and delete commit atomically, so
/// readers never observe a district referencing an absent county.
pub async fn delete_with_fallback<C>(db: &C, code: i32) -> Result<(), ModelError>
where
    C: ConnectionTrait + TransactionTrait,
{
    if code == UNSPECIFIED_CODE {
        return Err(ModelError::Validation(
            "the unspecified county cannot be deleted".into(),
        ));
    }
    let txn = db.begin().await.map_err(|e| ModelError::Db(e.to_string()))?;
    let fallback = get_unspecified_value(&txn).await?;
    district::Entity::update_many()
        .col_expr(district::Column::CountyCode, Expr::value(fallback))
        .filter(district::Column::CountyCode.eq(code))
        .exec(&txn)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    let res = Entity::delete_by_id(code)
        .exec(&txn)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    if res.rows_affected == 0 {
        txn.rollback().await.map_err(|e| ModelError::Db(e.to_string()))?;
        return Err(ModelError::NotFound(format!("county {} not found", code)));
    }
    txn.commit().await.map_err(|e| ModelError::Db(e.to_string()))?;
    tracing::info!(code, fallback, "county deleted, dependent districts redirected");
    Ok(())
}
