use std::time::Duration;

use anyhow::{Context as _, ensure};
use lettre::message::Mailbox;
use serde::Deserialize;

use courier_core::config::Config;

use crate::infra::smtp::{SmtpSettings, SmtpTls};
use crate::usecase::sweep::SweepSettings;

/// Mailing service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct MailingConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3114). Env var: `MAILING_PORT`.
    #[serde(default = "default_mailing_port")]
    pub mailing_port: u16,
    /// Seconds between scheduled sweeps (default 600).
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    /// Maximum concurrent deliveries within one mailing (default 8).
    #[serde(default = "default_sweep_concurrency")]
    pub sweep_concurrency: usize,
    /// Per-message transport timeout (default 30).
    #[serde(default = "default_send_timeout_secs")]
    pub send_timeout_secs: u64,
    /// Age after which a sweep claim is considered abandoned (default 900). Must
    /// exceed twice `send_timeout_secs` so a running sweep renews it in time.
    #[serde(default = "default_claim_lease_secs")]
    pub claim_lease_secs: u64,
    /// Sender mailbox on every outgoing mailing, e.g. `Courier <noreply@example.com>`.
    pub default_from_email: String,
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: Option<String>,
    #[serde(default)]
    pub smtp_password: Option<String>,
    #[serde(default)]
    pub smtp_tls: SmtpTls,
}

impl Config for MailingConfig {}

fn default_mailing_port() -> u16 {
    3114
}

fn default_sweep_interval_secs() -> u64 {
    600
}

fn default_sweep_concurrency() -> usize {
    8
}

fn default_send_timeout_secs() -> u64 {
    30
}

fn default_claim_lease_secs() -> u64 {
    900
}

fn default_smtp_port() -> u16 {
    587
}

impl MailingConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }

    /// Fails on a sender that is not a valid mailbox, or a claim lease too short
    /// to be renewed between two timed-out sends.
    pub fn sweep_settings(&self) -> anyhow::Result<SweepSettings> {
        let sender: Mailbox = self
            .default_from_email
            .parse()
            .with_context(|| format!("invalid DEFAULT_FROM_EMAIL {:?}", self.default_from_email))?;
        ensure!(
            self.claim_lease_secs > self.send_timeout_secs.saturating_mul(2),
            "CLAIM_LEASE_SECS ({}) must exceed twice SEND_TIMEOUT_SECS ({})",
            self.claim_lease_secs,
            self.send_timeout_secs,
        );
        Ok(SweepSettings {
            from_email: sender.to_string(),
            concurrency: self.sweep_concurrency.max(1),
            send_timeout: Duration::from_secs(self.send_timeout_secs),
            claim_lease: Duration::from_secs(self.claim_lease_secs),
        })
    }

    pub fn smtp_settings(&self) -> SmtpSettings {
        SmtpSettings {
            host: self.smtp_host.clone(),
            port: self.smtp_port,
            username: self.smtp_username.clone(),
            password: self.smtp_password.clone(),
            tls: self.smtp_tls,
        }
    }
}
