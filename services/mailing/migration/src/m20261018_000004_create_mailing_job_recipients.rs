use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MailingJobRecipients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MailingJobRecipients::MailingJobId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MailingJobRecipients::RecipientId)
                            .uuid()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(MailingJobRecipients::MailingJobId)
                            .col(MailingJobRecipients::RecipientId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MailingJobRecipients::Table, MailingJobRecipients::MailingJobId)
                            .to(MailingJobs::Table, MailingJobs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MailingJobRecipients::Table, MailingJobRecipients::RecipientId)
                            .to(Recipients::Table, Recipients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MailingJobRecipients::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MailingJobRecipients {
    Table,
    MailingJobId,
    RecipientId,
}

#[derive(Iden)]
enum MailingJobs {
    Table,
    Id,
}

#[derive(Iden)]
enum Recipients {
    Table,
    Id,
}
