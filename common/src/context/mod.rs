use std::sync::Arc;

use actix_web::{dev::Payload, web::Data, FromRequest, HttpRequest};

use crate::context::effectfull_context::{EffectfullContext, HandlerContext, ServiceState};
use crate::{
    auth::Auth,
    error::{self, AddCode, ServiceError},
    repository::RepositoryObject,
};

use self::test_context::TestContext;

pub mod effectfull_context;
pub mod test_context;

/// Per-request handle: who is calling and where the repositories live.
#[derive(Clone)]
pub enum GeneralContext {
    Test(TestContext),
    Effectfull(EffectfullContext),
}

impl FromRequest for GeneralContext {
    type Error = ServiceError;

    type Future = futures_util::future::LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        fn from_request_inner(
            req: &HttpRequest,
            _payload: &mut Payload,
        ) -> error::Result<GeneralContext> {
            let auth = req
                .headers()
                .get("Authorization")
                .and_then(|x| x.to_str().ok())
                .and_then(|x| x.strip_prefix("Bearer "))
                .map(Auth::from_token);

            let user_auth = match auth {
                Some(Ok(Some(res))) => {
                    log::debug!("Token parsed successfully");
                    res
                }
                Some(Ok(None)) => {
                    log::warn!("Token expired");
                    Auth::None
                }
                Some(Err(err)) => {
                    log::warn!("Error parsing token: {}", err);
                    Auth::None
                }
                None => Auth::None,
            };

            let Some(state) = req.app_data::<Data<Arc<ServiceState>>>() else {
                return Err(anyhow::anyhow!("No state provided").code(500));
            };

            Ok(GeneralContext::Effectfull(EffectfullContext(
                Arc::clone(state.get_ref()),
                HandlerContext { user_auth },
            )))
        }
        let result = from_request_inner(req, payload);

        Box::pin(async move { result })
    }
}

impl GeneralContext {
    pub fn test(state: Arc<ServiceState>, user_auth: Auth) -> Self {
        GeneralContext::Test(TestContext { state, user_auth })
    }

    pub fn try_get_repository<T: 'static>(&self) -> error::Result<RepositoryObject<T>> {
        match self {
            GeneralContext::Effectfull(context) => context.try_get_repository::<T>(),
            GeneralContext::Test(context) => context.state.try_get_repository::<T>(),
        }
    }

    pub fn auth(&self) -> &Auth {
        match self {
            GeneralContext::Effectfull(context) => context.auth(),
            GeneralContext::Test(context) => &context.user_auth,
        }
    }
}
