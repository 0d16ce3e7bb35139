use sea_orm::entity::prelude::*;

/// Many-to-many link between mailing jobs and recipients.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "mailing_job_recipients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub mailing_job_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub recipient_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::mailing_jobs::Entity",
        from = "Column::MailingJobId",
        to = "super::mailing_jobs::Column::Id",
        on_delete = "Cascade"
    )]
    MailingJob,
    #[sea_orm(
        belongs_to = "super::recipients::Entity",
        from = "Column::RecipientId",
        to = "super::recipients::Column::Id",
        on_delete = "Cascade"
    )]
    Recipient,
}

impl Related<super::mailing_jobs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MailingJob.def()
    }
}

impl Related<super::recipients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
