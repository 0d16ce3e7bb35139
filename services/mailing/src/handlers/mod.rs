use serde::Deserialize;

use courier_auth_types::identity::IdentityHeaders;
use courier_domain::account::{AccountRole, Actor};
use courier_domain::pagination::PageRequest;

use crate::error::MailingServiceError;

pub mod attempt;
pub mod health;
pub mod mailing;
pub mod recipient;
pub mod report;
pub mod sweep;
pub mod template;

/// Resolve gateway identity headers into an [`Actor`]. Unknown roles are refused.
pub(crate) fn actor(identity: &IdentityHeaders) -> Result<Actor, MailingServiceError> {
    let role = AccountRole::from_u8(identity.user_role).ok_or(MailingServiceError::Forbidden)?;
    Ok(Actor::new(identity.user_id, role))
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct PageQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

impl PageQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.per_page, self.page)
    }
}
