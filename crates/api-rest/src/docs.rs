use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use api_shared::HealthRes;

use crate::error::{ErrorBody, ErrorDetail};
use crate::routes::{attachments, conditions, health, patients, users};
use crate::schemas::{
    AttachmentForm, AttachmentRes, CreateUserReq, DiagnosedConditionReq, DiagnosedConditionRes,
    LoginReq, LoginRes, PatientRecordRes, PatientReq, PatientRes,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        users::create_user,
        users::login,
        patients::create_patient,
        patients::update_patient,
        patients::delete_patient,
        patients::search_patients,
        attachments::add_attachment,
        attachments::delete_attachment,
        conditions::add_diagnosed_condition,
        conditions::delete_diagnosed_condition,
    ),
    components(schemas(
        HealthRes,
        ErrorBody,
        ErrorDetail,
        CreateUserReq,
        LoginReq,
        LoginRes,
        PatientReq,
        PatientRes,
        PatientRecordRes,
        AttachmentForm,
        AttachmentRes,
        DiagnosedConditionReq,
        DiagnosedConditionRes,
    )),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
