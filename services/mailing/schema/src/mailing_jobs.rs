use sea_orm::entity::prelude::*;

/// A scheduled mailing. `status` holds the lifecycle state name
/// (`created` | `launched` | `deactivated` | `completed`).
///
/// `claim_id`/`claimed_at` are set while a sweep is delivering the job; a claim
/// older than the configured lease is treated as abandoned.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "mailing_jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub window_start: chrono::DateTime<chrono::Utc>,
    pub window_end: chrono::DateTime<chrono::Utc>,
    pub periodicity: String,
    pub status: String,
    pub message_template_id: Uuid,
    pub owner_id: Option<Uuid>,
    pub claim_id: Option<Uuid>,
    pub claimed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::message_templates::Entity",
        from = "Column::MessageTemplateId",
        to = "super::message_templates::Column::Id",
        on_delete = "Cascade"
    )]
    MessageTemplate,
    #[sea_orm(has_many = "super::mailing_job_recipients::Entity")]
    MailingJobRecipients,
    #[sea_orm(has_many = "super::delivery_attempts::Entity")]
    DeliveryAttempts,
}

impl Related<super::message_templates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MessageTemplate.def()
    }
}

impl Related<super::mailing_job_recipients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MailingJobRecipients.def()
    }
}

impl Related<super::delivery_attempts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeliveryAttempts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
