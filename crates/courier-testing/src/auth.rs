//! Mock gateway identity for HTTP tests.
//!
//! Services behind the gateway receive `x-courier-user-id` + `x-courier-user-role`
//! headers. `MockAuth` produces them directly so no real gateway is needed.

use http::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

use courier_auth_types::{USER_ID_HEADER, USER_ROLE_HEADER};
use courier_domain::account::AccountRole;

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: Uuid,
    pub role: AccountRole,
}

impl MockAuth {
    pub fn new(user_id: Uuid, role: AccountRole) -> Self {
        Self { user_id, role }
    }

    pub fn client() -> Self {
        Self::new(Uuid::new_v4(), AccountRole::Client)
    }

    pub fn manager() -> Self {
        Self::new(Uuid::new_v4(), AccountRole::Manager)
    }

    pub fn admin() -> Self {
        Self::new(Uuid::new_v4(), AccountRole::Admin)
    }

    /// Header pairs as the gateway would inject them.
    pub fn header_pairs(&self) -> [(HeaderName, HeaderValue); 2] {
        [
            (
                HeaderName::from_static(USER_ID_HEADER),
                HeaderValue::from_str(&self.user_id.to_string()).unwrap(),
            ),
            (
                HeaderName::from_static(USER_ROLE_HEADER),
                HeaderValue::from(u16::from(self.role.as_u8())),
            ),
        ]
    }

    pub fn headers(&self) -> HeaderMap {
        self.header_pairs().into_iter().collect()
    }
}
