//! Transaction database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Transaction;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub date: Date,
    pub name: String,
    pub category: String,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Transaction {
    fn from(model: Model) -> Self {
        Transaction {
            id: model.id,
            user_id: model.user_id,
            date: model.date,
            name: model.name,
            category: model.category,
            amount: model.amount,
        }
    }
}
