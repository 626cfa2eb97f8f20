//! User entity for the `usuarios` table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "usuarios")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_name = "usuario", unique)]
    pub username: String,
    pub password_hash: Option<String>,
    #[sea_orm(column_name = "rol")]
    pub role: Option<String>,
    #[sea_orm(column_name = "activo")]
    pub active: Option<bool>,
    #[sea_orm(column_name = "ultimo_login")]
    pub last_login_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
