use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(utoipa::ToSchema)]
pub struct ProfileInputDoc {
    pub nickname: String,
    pub school: i32,
    pub year_of_graduation: i16,
    pub phone: String,
    pub parent_phone: String,
    pub gdpr: bool,
}

#[derive(utoipa::ToSchema)]
pub struct ProfileUpdateDoc {
    pub nickname: Option<String>,
    pub school: Option<i32>,
    pub year_of_graduation: Option<i16>,
    pub phone: Option<String>,
    pub parent_phone: Option<String>,
    pub gdpr: Option<bool>,
}

#[derive(utoipa::ToSchema)]
pub struct CreateProfileRequestDoc {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub school: i32,
    pub year_of_graduation: i16,
    pub phone: String,
    pub parent_phone: String,
    pub gdpr: bool,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::reference::list_counties,
        crate::routes::reference::list_districts,
        crate::routes::reference::list_schools,
        crate::routes::profiles::list_profiles,
        crate::routes::profiles::create_profile,
        crate::routes::profiles::get_profile,
        crate::routes::profiles::update_profile,
        crate::routes::profiles::delete_profile,
        crate::routes::profiles::get_my_profile,
        crate::routes::profiles::register_my_profile,
        crate::routes::profiles::update_my_profile,
    ),
    components(
        schemas(
            HealthResponse,
            ProfileInputDoc,
            ProfileUpdateDoc,
            CreateProfileRequestDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "reference"),
        (name = "profiles")
    )
)]
pub struct ApiDoc;
