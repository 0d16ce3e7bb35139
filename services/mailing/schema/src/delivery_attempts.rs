use sea_orm::entity::prelude::*;

/// One delivery of a mailing to one recipient. Rows are append-only.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "delivery_attempts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub mailing_job_id: Uuid,
    pub recipient_id: Option<Uuid>,
    /// Address as it was when the attempt was made.
    pub recipient_email: String,
    pub attempted_at: chrono::DateTime<chrono::Utc>,
    /// `success` | `failure`
    pub outcome: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub response: Option<String>,
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
}

impl Related<super::mailing_jobs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MailingJob.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
