use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "client")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub client_id: i64,
    pub nom_complet: Option<String>,
    pub genre: Option<String>,
    pub age: Option<i32>,
    pub localisation: Option<String>,
    pub date_inscription: Date,
    pub email: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
