use sea_orm_migration::prelude::*;

mod m20261018_000001_create_recipients;
mod m20261018_000002_create_message_templates;
mod m20261018_000003_create_mailing_jobs;
mod m20261018_000004_create_mailing_job_recipients;
mod m20261018_000005_create_delivery_attempts;
mod m20261018_000006_add_sweep_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261018_000001_create_recipients::Migration),
            Box::new(m20261018_000002_create_message_templates::Migration),
            Box::new(m20261018_000003_create_mailing_jobs::Migration),
            Box::new(m20261018_000004_create_mailing_job_recipients::Migration),
            Box::new(m20261018_000005_create_delivery_attempts::Migration),
            Box::new(m20261018_000006_add_sweep_indexes::Migration),
        ]
    }
}
