use crate::models::{CreateOrganization, OrganizationType};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 1, max = 200, message = "Organization name is required"))]
    pub name: String,
    pub organization_type: OrganizationType,
}

impl From<CreateOrganizationRequest> for CreateOrganization {
    fn from(req: CreateOrganizationRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            organization_type: req.organization_type,
        }
    }
}
