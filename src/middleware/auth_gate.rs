use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use tracing::debug;

use crate::auth::jwt::verify_token;
use crate::error::AppError;

/// 认证门卫中间件
/// Authorization gate middleware
///
/// 统一套在受保护的 scope 前：校验 Bearer 凭证并把身份写入请求扩展。
/// 角色随身份携带，但不在任何端点做角色判定。
pub struct AuthGate;

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthGateMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthGateMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        // 提取 `Authorization: Bearer <token>`
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|v| v.to_string());

        Box::pin(async move {
            let token = match token {
                Some(t) if !t.is_empty() => t,
                _ => {
                    debug!("拒绝请求 {}：缺少凭证", req.path());
                    return Err(AppError::unauthenticated("Access token required").into());
                }
            };

            let claims = match verify_token(&token) {
                Ok(c) => c,
                Err(e) => {
                    debug!("拒绝请求 {}：凭证无效", req.path());
                    return Err(e.into());
                }
            };

            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}
