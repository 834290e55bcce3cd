use sea_orm::entity::prelude::*;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "designs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub partner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub design_url: Option<String>,
    /// JSON array of element URLs.
    #[sea_orm(column_type = "JsonBinary")]
    pub elements: Value,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::PartnerId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Partner,
    #[sea_orm(has_many = "super::product_designs::Entity")]
    ProductDesigns,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Partner.def()
    }
}

impl Related<super::product_designs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductDesigns.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
