use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "produit")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub produit_id: i64,
    pub categorie_id: Option<i64>,
    #[sea_orm(column_type = "Double")]
    pub prix: f64,
    pub stock: i32,
    pub date_ajout: Date,
    pub nom: String,
    pub image_path: String,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
