use sea_orm::entity::prelude::*;

/// Address registered to receive mailings. Blocked recipients keep their row
/// with `is_active = false`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "recipients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub note: Option<String>,
    pub is_active: bool,
    pub owner_id: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::mailing_job_recipients::Entity")]
    MailingJobRecipients,
}

impl Related<super::mailing_job_recipients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MailingJobRecipients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
