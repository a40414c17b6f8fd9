//! Profile operations: administrative CRUD plus the self-service
//! surface scoped to the authenticated caller.
//!
//! Both surfaces run the same row operations; they differ only in the
//! authorization predicate and in where the owner identity comes from.
use chrono::Utc;
use models::errors::ModelError;
use models::{profile, school, validators};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Condition, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthIdentity;
use crate::errors::{FieldErrors, ServiceError};
use crate::pagination::Pagination;
use crate::query_service::like_pattern;

const YEAR_OF_GRADUATION_MIN: i16 = 1900;
const YEAR_OF_GRADUATION_MAX: i16 = 2100;
const NICKNAME_MAX_LEN: usize = 32;

/// Admin listing filters; all predicates are intersected.
#[derive(Debug, Clone, Default)]
pub struct ProfileFilter {
    pub school: Option<i32>,
    pub year_of_graduation: Option<i16>,
    pub search: Option<String>,
}

/// Owner identity for a profile row, as reported by the identity
/// provider. Never taken from a request payload.
#[derive(Debug, Clone)]
pub struct ProfileOwner {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

impl From<&AuthIdentity> for ProfileOwner {
    fn from(identity: &AuthIdentity) -> Self {
        Self {
            user_id: identity.user_id,
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
        }
    }
}

/// Full field set for creating a profile.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileInput {
    #[serde(default)]
    pub nickname: String,
    pub school: i32,
    pub year_of_graduation: i16,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub parent_phone: String,
    #[serde(default)]
    pub gdpr: bool,
}

/// Partial update; only supplied fields are validated and applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub nickname: Option<String>,
    pub school: Option<i32>,
    pub year_of_graduation: Option<i16>,
    pub phone: Option<String>,
    pub parent_phone: Option<String>,
    pub gdpr: Option<bool>,
}

fn phone_message(err: ModelError) -> String {
    match err {
        ModelError::Validation(msg) => msg,
        other => other.to_string(),
    }
}

fn check_nickname(errors: &mut FieldErrors, nickname: &str) {
    if nickname.chars().count() > NICKNAME_MAX_LEN {
        errors.push("nickname", format!("nickname longer than {} characters", NICKNAME_MAX_LEN));
    }
}

fn check_year(errors: &mut FieldErrors, year: i16) {
    if !(YEAR_OF_GRADUATION_MIN..=YEAR_OF_GRADUATION_MAX).contains(&year) {
        errors.push(
            "year_of_graduation",
            format!("year of graduation must be between {} and {}", YEAR_OF_GRADUATION_MIN, YEAR_OF_GRADUATION_MAX),
        );
    }
}

fn check_phone(errors: &mut FieldErrors, field: &str, value: &str) {
    if let Err(err) = validators::validate_phone_number(value) {
        errors.push(field, phone_message(err));
    }
}

async fn check_school(
    db: &DatabaseConnection,
    errors: &mut FieldErrors,
    code: i32,
) -> Result<(), ServiceError> {
    if !school::exists(db, code).await? {
        errors.push("school", format!("school {} does not exist", code));
    }
    Ok(())
}

async fn validate_input(
    db: &DatabaseConnection,
    input: &ProfileInput,
) -> Result<(), ServiceError> {
    let mut errors = FieldErrors::new();
    check_nickname(&mut errors, &input.nickname);
    check_year(&mut errors, input.year_of_graduation);
    check_phone(&mut errors, "phone", &input.phone);
    check_phone(&mut errors, "parent_phone", &input.parent_phone);
    check_school(db, &mut errors, input.school).await?;
    errors.into_result()
}

async fn validate_update(
    db: &DatabaseConnection,
    update: &ProfileUpdate,
) -> Result<(), ServiceError> {
    let mut errors = FieldErrors::new();
    if let Some(nickname) = &update.nickname {
        check_nickname(&mut errors, nickname);
    }
    if let Some(year) = update.year_of_graduation {
        check_year(&mut errors, year);
    }
    if let Some(phone) = &update.phone {
        check_phone(&mut errors, "phone", phone);
    }
    if let Some(parent_phone) = &update.parent_phone {
        check_phone(&mut errors, "parent_phone", parent_phone);
    }
    if let Some(code) = update.school {
        check_school(db, &mut errors, code).await?;
    }
    errors.into_result()
}

/// Validate, then apply only the supplied fields to one row. Validation
/// failures return before any fetch or write, so the stored row is
/// untouched; the write itself is a single UPDATE.
async fn apply_update(
    db: &DatabaseConnection,
    user_id: Uuid,
    update: ProfileUpdate,
) -> Result<profile::Model, ServiceError> {
    validate_update(db, &update).await?;
    let mut am: profile::ActiveModel = profile::find_by_user(db, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("profile"))?
        .into();
    if let Some(nickname) = update.nickname {
        am.nickname = Set(nickname);
    }
    if let Some(code) = update.school {
        am.school_code = Set(code);
    }
    if let Some(year) = update.year_of_graduation {
        am.year_of_graduation = Set(year);
    }
    if let Some(phone) = update.phone {
        am.phone = Set(phone);
    }
    if let Some(parent_phone) = update.parent_phone {
        am.parent_phone = Set(parent_phone);
    }
    if let Some(gdpr) = update.gdpr {
        am.gdpr = Set(gdpr);
    }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

async fn create_row(
    db: &DatabaseConnection,
    owner: ProfileOwner,
    input: ProfileInput,
) -> Result<profile::Model, ServiceError> {
    validate_input(db, &input).await?;
    if profile::find_by_user(db, owner.user_id).await?.is_some() {
        return Err(ServiceError::Validation(FieldErrors::single(
            "user_id",
            "profile already exists for this user",
        )));
    }
    profile::create(
        db,
        profile::NewProfile {
            user_id: owner.user_id,
            first_name: owner.first_name,
            last_name: owner.last_name,
            nickname: input.nickname,
            school_code: input.school,
            year_of_graduation: input.year_of_graduation,
            phone: input.phone,
            parent_phone: input.parent_phone,
            gdpr: input.gdpr,
        },
    )
    .await
    // A racing registration can slip past the lookup above; the insert
    // then reports the duplicate, keyed like the pre-checked case
    .map_err(|err| match err {
        ModelError::Validation(msg) => {
            ServiceError::Validation(FieldErrors::single("user_id", msg))
        }
        other => other.into(),
    })
}

// ---- administrative surface ----

/// List profiles with filters and owner-name search. Admin only.
pub async fn list_profiles(
    db: &DatabaseConnection,
    caller: &AuthIdentity,
    filter: ProfileFilter,
    opts: Pagination,
) -> Result<Vec<profile::Model>, ServiceError> {
    caller.require_admin()?;
    let (page_idx, per_page) = opts.normalize();
    let mut query = profile::Entity::find();
    if let Some(code) = filter.school {
        query = query.filter(profile::Column::SchoolCode.eq(code));
    }
    if let Some(year) = filter.year_of_graduation {
        query = query.filter(profile::Column::YearOfGraduation.eq(year));
    }
    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = like_pattern(term);
        query = query.filter(
            Condition::any()
                .add(Expr::col(profile::Column::FirstName).ilike(pattern.clone()))
                .add(Expr::col(profile::Column::LastName).ilike(pattern.clone()))
                .add(Expr::col(profile::Column::Nickname).ilike(pattern)),
        );
    }
    query
        .order_by_asc(profile::Column::UserId)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Create a profile on behalf of a user. Admin only.
pub async fn create_profile(
    db: &DatabaseConnection,
    caller: &AuthIdentity,
    owner: ProfileOwner,
    input: ProfileInput,
) -> Result<profile::Model, ServiceError> {
    caller.require_admin()?;
    create_row(db, owner, input).await
}

/// Fetch any profile by its owner id. Admin only.
pub async fn get_profile(
    db: &DatabaseConnection,
    caller: &AuthIdentity,
    user_id: Uuid,
) -> Result<profile::Model, ServiceError> {
    caller.require_admin()?;
    profile::find_by_user(db, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("profile"))
}

/// Partially update any profile. Admin only.
pub async fn update_profile(
    db: &DatabaseConnection,
    caller: &AuthIdentity,
    user_id: Uuid,
    update: ProfileUpdate,
) -> Result<profile::Model, ServiceError> {
    caller.require_admin()?;
    apply_update(db, user_id, update).await
}

/// Delete any profile. Admin only.
pub async fn delete_profile(
    db: &DatabaseConnection,
    caller: &AuthIdentity,
    user_id: Uuid,
) -> Result<(), ServiceError> {
    caller.require_admin()?;
    profile::hard_delete(db, user_id).await?;
    Ok(())
}

// ---- self-service surface ----

/// First-time profile registration for the caller.
pub async fn register_my_profile(
    db: &DatabaseConnection,
    caller: &AuthIdentity,
    input: ProfileInput,
) -> Result<profile::Model, ServiceError> {
    create_row(db, ProfileOwner::from(caller), input).await
}

/// The caller's own profile. `NotFound` until one has been registered.
pub async fn get_my_profile(
    db: &DatabaseConnection,
    caller: &AuthIdentity,
) -> Result<profile::Model, ServiceError> {
    profile::find_by_user(db, caller.user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("profile"))
}

/// Partially update the caller's own profile. The row is selected by the
/// session identity, so a caller can never reach another user's row.
pub async fn update_my_profile(
    db: &DatabaseConnection,
    caller: &AuthIdentity,
    update: ProfileUpdate,
) -> Result<profile::Model, ServiceError> {
    apply_update(db, caller.user_id, update).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ServiceError;
    use crate::test_support::get_db;
    use anyhow::Result;
    use models::{county, district};

    fn admin() -> AuthIdentity {
        AuthIdentity {
            user_id: Uuid::new_v4(),
            first_name: "Admin".into(),
            last_name: "Správca".into(),
            is_admin: true,
        }
    }

    fn student(first: &str, last: &str) -> AuthIdentity {
        AuthIdentity {
            user_id: Uuid::new_v4(),
            first_name: first.into(),
            last_name: last.into(),
            is_admin: false,
        }
    }

    fn input(school: i32) -> ProfileInput {
        ProfileInput {
            nickname: "jn".into(),
            school,
            year_of_graduation: 2027,
            phone: "+421 123 456 789".into(),
            parent_phone: "".into(),
            gdpr: true,
        }
    }

    async fn make_school(db: &DatabaseConnection) -> Result<(i32, i32, i32)> {
        let c = county::create(db, &format!("ps_county_{}", Uuid::new_v4())).await?;
        let d = district::create(db, "Košice I", "KI", c.code).await?;
        let s = school::create(
            db,
            school::NewSchool {
                name: format!("ps_school_{}", Uuid::new_v4()),
                abbreviation: "GX".into(),
                street: "Alejová 1".into(),
                city: "Košice".into(),
                zip_code: "04149".into(),
                email: "".into(),
                district_code: d.code,
            },
        )
        .await?;
        Ok((c.code, d.code, s.code))
    }

    async fn cleanup(db: &DatabaseConnection, county: i32, dist: i32, sch: i32) -> Result<()> {
        school::Entity::delete_by_id(sch).exec(db).await?;
        district::Entity::delete_by_id(dist).exec(db).await?;
        county::Entity::delete_by_id(county).exec(db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn my_profile_missing_is_not_found() -> Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let caller = student("Jana", "Nováková");
        let err = get_my_profile(&db, &caller).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }

    #[tokio::test]
    async fn register_then_get_and_update_own_profile() -> Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let (c, d, s) = make_school(&db).await?;
        let caller = student("Jana", "Nováková");

        let created = register_my_profile(&db, &caller, input(s)).await?;
        assert_eq!(created.user_id, caller.user_id);
        assert_eq!(created.first_name, "Jana");

        // Second registration is rejected, keyed on the owner id
        match register_my_profile(&db, &caller, input(s)).await {
            Err(ServiceError::Validation(errors)) => assert!(errors.contains("user_id")),
            other => panic!("expected validation error, got {:?}", other),
        }

        let fetched = get_my_profile(&db, &caller).await?;
        assert_eq!(fetched.school_code, s);

        let updated = update_my_profile(
            &db,
            &caller,
            ProfileUpdate { nickname: Some("janka".into()), ..ProfileUpdate::default() },
        )
        .await?;
        assert_eq!(updated.nickname, "janka");
        // Untouched fields survive the partial update
        assert_eq!(updated.phone, "+421 123 456 789");

        profile::hard_delete(&db, caller.user_id).await?;
        cleanup(&db, c, d, s).await?;
        Ok(())
    }

    #[tokio::test]
    async fn invalid_phone_rejects_whole_update() -> Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let (c, d, s) = make_school(&db).await?;
        let caller = student("Peter", "Kováč");
        register_my_profile(&db, &caller, input(s)).await?;

        let before = get_my_profile(&db, &caller).await?;
        let err = update_my_profile(
            &db,
            &caller,
            ProfileUpdate {
                nickname: Some("different".into()),
                phone: Some("12345".into()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap_err();
        match err {
            ServiceError::Validation(errors) => assert!(errors.contains("phone")),
            other => panic!("expected validation error, got {:?}", other),
        }

        // The stored row is unchanged, including the other supplied field
        let after = get_my_profile(&db, &caller).await?;
        assert_eq!(before, after);

        profile::hard_delete(&db, caller.user_id).await?;
        cleanup(&db, c, d, s).await?;
        Ok(())
    }

    #[tokio::test]
    async fn self_service_never_touches_other_rows() -> Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let (c, d, s) = make_school(&db).await?;
        let alice = student("Alica", "Malá");
        let bob = student("Boris", "Veľký");
        register_my_profile(&db, &alice, input(s)).await?;
        register_my_profile(&db, &bob, input(s)).await?;

        let updated = update_my_profile(
            &db,
            &alice,
            ProfileUpdate { nickname: Some("alica!".into()), ..ProfileUpdate::default() },
        )
        .await?;
        assert_eq!(updated.user_id, alice.user_id);

        let bobs = get_my_profile(&db, &bob).await?;
        assert_eq!(bobs.nickname, "jn");

        for id in [alice.user_id, bob.user_id] {
            profile::hard_delete(&db, id).await?;
        }
        cleanup(&db, c, d, s).await?;
        Ok(())
    }

    #[tokio::test]
    async fn admin_surface_requires_capability() -> Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let caller = student("Jana", "Nováková");

        let listed = list_profiles(&db, &caller, ProfileFilter::default(), Pagination::default()).await;
        assert!(matches!(listed, Err(ServiceError::Forbidden(_))));

        let deleted = delete_profile(&db, &caller, Uuid::new_v4()).await;
        assert!(matches!(deleted, Err(ServiceError::Forbidden(_))));
        Ok(())
    }

    #[tokio::test]
    async fn admin_list_filters_and_search() -> Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let (c, d, s) = make_school(&db).await?;
        let admin = admin();

        let marker = format!("zx{}", Uuid::new_v4().simple());
        let owner = student(&marker, "Hľadaná");
        let mut first = input(s);
        first.year_of_graduation = 2031;
        create_profile(&db, &admin, ProfileOwner::from(&owner), first).await?;

        let by_school = list_profiles(
            &db,
            &admin,
            ProfileFilter { school: Some(s), ..ProfileFilter::default() },
            Pagination::default(),
        )
        .await?;
        assert!(by_school.iter().any(|p| p.user_id == owner.user_id));

        let by_year = list_profiles(
            &db,
            &admin,
            ProfileFilter {
                school: Some(s),
                year_of_graduation: Some(2031),
                ..ProfileFilter::default()
            },
            Pagination::default(),
        )
        .await?;
        assert!(by_year.iter().all(|p| p.year_of_graduation == 2031));

        // Case-insensitive search over the owner's first name
        let searched = list_profiles(
            &db,
            &admin,
            ProfileFilter { search: Some(marker.to_uppercase()), ..ProfileFilter::default() },
            Pagination::default(),
        )
        .await?;
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].user_id, owner.user_id);

        delete_profile(&db, &admin, owner.user_id).await?;
        cleanup(&db, c, d, s).await?;
        Ok(())
    }
}
