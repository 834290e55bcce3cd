use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Category, Design};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    #[schema(value_type = Vec<Category>)]
    pub items: Vec<Category>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDesignRequest {
    pub name: String,
    pub description: Option<String>,
    /// Where the rendered design is hosted; uploading is done by the client.
    pub design_url: Option<String>,
    #[serde(default)]
    pub elements: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DesignList {
    pub items: Vec<Design>,
}
