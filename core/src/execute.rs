use crate::{authenticate, compose, sign, verify};
use crate::{ApiRequest, ApiResponse, Client, Context, Result};
use log::debug;
use serde::Serialize;

impl Client {
    /// Run a request through the full pipeline and return the verified
    /// response.
    ///
    /// Stages, in order: header composition, credential selection, request
    /// signing, transport, response verification. Each stage produces a new
    /// request value; nothing is retried here, and every failure propagates
    /// to the caller as-is.
    pub async fn execute(&self, ctx: &Context, req: ApiRequest) -> Result<ApiResponse> {
        let req = compose(req, self);
        let req = authenticate(req, self)?;
        let req = sign(req, self)?;

        let mut request = http::Request::builder()
            .method(req.method.clone())
            .uri(format!("{}{}", self.base_url(), req.path))
            .body(req.body.clone())?;
        for (name, value) in &req.headers {
            request.headers_mut().append(name.clone(), value.clone());
        }

        debug!("executing {} {}", req.method, req.path);
        let (parts, body) = ctx.http_send(request).await?.into_parts();

        verify(self, parts.status, &parts.headers, &body)?;

        Ok(ApiResponse::new(
            parts.status,
            parts.headers,
            body,
            self.clone(),
        ))
    }

    /// Execute a GET against an ordinary session operation.
    pub async fn get(&self, ctx: &Context, path: &str) -> Result<ApiResponse> {
        self.execute(ctx, ApiRequest::get(path)).await
    }

    /// Execute a POST with a JSON payload against an ordinary session
    /// operation.
    pub async fn post<T: Serialize>(
        &self,
        ctx: &Context,
        path: &str,
        payload: &T,
    ) -> Result<ApiResponse> {
        self.execute(ctx, ApiRequest::post(path).with_json(payload)?)
            .await
    }
}
