//! Read-only listing over the reference hierarchy.
//!
//! Results are ordered by code; an exact-match filter and the text
//! search are independent predicates applied together.
use models::{county, district, school};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Condition, Expr};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::errors::ServiceError;
use crate::pagination::Pagination;

/// List counties, no filters.
pub async fn list_counties(
    db: &DatabaseConnection,
    opts: Pagination,
) -> Result<Vec<county::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    county::Entity::find()
        .order_by_asc(county::Column::Code)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// List districts, optionally restricted to one county.
pub async fn list_districts(
    db: &DatabaseConnection,
    county_filter: Option<i32>,
    opts: Pagination,
) -> Result<Vec<district::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let mut query = district::Entity::find();
    if let Some(code) = county_filter {
        query = query.filter(district::Column::CountyCode.eq(code));
    }
    query
        .order_by_asc(district::Column::Code)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// List schools, optionally restricted to one district, optionally
/// matched case-insensitively against name or street.
pub async fn list_schools(
    db: &DatabaseConnection,
    district_filter: Option<i32>,
    search: Option<&str>,
    opts: Pagination,
) -> Result<Vec<school::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let mut query = school::Entity::find();
    if let Some(code) = district_filter {
        query = query.filter(school::Column::DistrictCode.eq(code));
    }
    if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = like_pattern(term);
        query = query.filter(
            Condition::any()
                .add(Expr::col(school::Column::Name).ilike(pattern.clone()))
                .add(Expr::col(school::Column::Street).ilike(pattern)),
        );
    }
    query
        .order_by_asc(school::Column::Code)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Substring pattern with LIKE metacharacters escaped, so a literal `%`
/// in the term never widens the match.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
