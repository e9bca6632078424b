use std::sync::Arc;

use crate::auth::Auth;

use super::effectfull_context::ServiceState;

#[derive(Clone)]
pub struct TestContext {
    pub state: Arc<ServiceState>,
    pub user_auth: Auth,
}
