use config::{AppConfig, DB_BINDING};
use repositories::board_repository::D1Repository;
use response::ApiResponse;
use worker::*;

pub mod board;
pub mod card;
pub mod config;
pub mod error;
mod logging;
pub mod response;
pub mod routes;
pub mod validation;
pub mod repositories {
    pub mod board_repository;
    pub mod inmemory_repository;
}

pub use routes::handle_request;

fn to_worker_response(
    resp: ApiResponse,
    config: &AppConfig,
    path: &str,
) -> Result<Response> {
    let resp_status = resp.status;
    let mut result = if resp.has_body() {
        Response::from_json(&resp.body)?
    } else {
        Response::empty()?
    }
    .with_status(resp_status);

    if let Some(origin) = config.cors_origin.as_deref() {
        let headers = result.headers_mut();
        headers.set("Access-Control-Allow-Origin", origin)?;
        headers.set("Access-Control-Allow-Headers", "Content-Type")?;
        headers.set("Access-Control-Allow-Methods", &routes::allow_header(path))?;
    }
    Ok(result)
}

/// Reads the body of methods that carry one. A failed read is an error, never
/// an empty body.
async fn read_body<F, Fut>(method: &Method, read: F) -> Result<String>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<String>>,
{
    match method {
        Method::Post | Method::Patch => read().await,
        _ => Ok(String::new()),
    }
}

#[event(fetch)]
async fn main(mut req: Request, env: Env, _ctx: Context) -> Result<Response> {
    let config = AppConfig::from_env(&env);
    logging::init(config.log_level);

    let Ok(db) = env.d1(DB_BINDING) else {
        tracing::error!("D1 binding {DB_BINDING} is missing");
        return Response::error("internal server error: DB", 500);
    };
    let repo = D1Repository::new(&db);

    let method = req.method();
    let path = req.path();
    let body = read_body(&method, || req.text()).await?;
    tracing::debug!(method = %String::from(method.clone()), %path, "request");

    let resp = handle_request(&repo, &config, &method, &path, &body).await;
    to_worker_response(resp, &config, &path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_body_propagates_read_failure() {
        let result = read_body(&Method::Patch, || async {
            Err(Error::RustError("body stream closed".to_string()))
        })
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_read_body_skips_bodyless_methods() {
        let body = read_body(&Method::Get, || async {
            Err(Error::RustError("should not be read".to_string()))
        })
        .await
        .unwrap();
        assert_eq!(body, "");

        let body = read_body(&Method::Post, || async { Ok("{}".to_string()) })
            .await
            .unwrap();
        assert_eq!(body, "{}");
    }
}
