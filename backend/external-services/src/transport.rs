use std::{str::FromStr, time::Duration};

use common_utils::{
    consts,
    request::{Headers, Method, Request, RequestContent},
    CustomResult,
};
use domain_types::{errors::ApiClientError, router_response_types::Response, types::Proxy};
use error_stack::{report, ResultExt};
use interfaces::transport::ConnectorTransport;
use once_cell::sync::OnceCell;
use reqwest::Client;
use serde_json::json;

use crate::service::info_log;

/// [`ConnectorTransport`] over `reqwest`, with optional HTTP(S) proxies.
///
/// Clients are built lazily, one for proxied and one for direct traffic.
#[derive(Debug, Default)]
pub struct HttpTransport {
    proxy: Proxy,
    non_proxied_client: OnceCell<Client>,
    proxied_client: OnceCell<Client>,
}

impl HttpTransport {
    pub fn new(proxy: Proxy) -> Self {
        Self {
            proxy,
            non_proxied_client: OnceCell::new(),
            proxied_client: OnceCell::new(),
        }
    }

    fn get_base_client(&self, should_bypass_proxy: bool) -> CustomResult<Client, ApiClientError> {
        let use_direct_client = should_bypass_proxy || !self.proxy.is_proxy_configured();
        Ok(if use_direct_client {
            &self.non_proxied_client
        } else {
            &self.proxied_client
        }
        .get_or_try_init(|| {
            get_client_builder(&self.proxy, use_direct_client)?
                .build()
                .change_context(ApiClientError::ClientConstructionFailed)
                .inspect_err(|err| {
                    info_log(
                        "ERROR",
                        &json!(format!("Failed to construct base client. Error: {:?}", err)),
                    );
                })
        })?
        .clone())
    }
}

#[async_trait::async_trait]
impl ConnectorTransport for HttpTransport {
    async fn send(
        &self,
        request: Request,
    ) -> CustomResult<Result<Response, Response>, ApiClientError> {
        call_connector_api(self, request).await
    }
}

async fn call_connector_api(
    transport: &HttpTransport,
    request: Request,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let url =
        reqwest::Url::parse(&request.url).change_context(ApiClientError::UrlEncodingFailed)?;

    let should_bypass_proxy = transport.proxy.should_bypass(url.as_str());
    let client = transport.get_base_client(should_bypass_proxy)?;

    let content_type = request.body.as_ref().map(content_type_of);
    let mut headers = request.headers.construct_header_map()?;
    if let Some(content_type) = content_type {
        if !headers.contains_key(reqwest::header::CONTENT_TYPE) {
            headers.insert(
                reqwest::header::CONTENT_TYPE,
                reqwest::header::HeaderValue::from_static(content_type),
            );
        }
    }

    let builder = match request.method {
        Method::Get => client.get(url),
        Method::Delete => client.delete(url),
        Method::Post => client.post(url),
        Method::Put => client.put(url),
        Method::Patch => client.patch(url),
    };
    let builder = match request.body {
        Some(body) => builder.body(body.get_body_bytes()),
        None => builder,
    }
    .headers(headers);

    let response = builder.send().await.map_err(|error| {
        let api_error = match error {
            error if error.is_timeout() => ApiClientError::RequestTimeoutReceived,
            error
                if error
                    .to_string()
                    .contains("connection closed before message completed") =>
            {
                ApiClientError::ConnectionClosedIncompleteMessage
            }
            _ => ApiClientError::RequestNotSent(error.to_string()),
        };
        info_log(
            "REQUEST_FAILURE",
            &json!(format!("Unable to send request to connector.")),
        );
        report!(api_error)
    });

    handle_response(response).await
}

fn content_type_of(body: &RequestContent) -> &'static str {
    match body {
        RequestContent::Json(_) => "application/json",
        RequestContent::FormUrlEncoded(_) => "application/x-www-form-urlencoded",
        RequestContent::Xml(_) => "text/xml; charset=utf-8",
        RequestContent::RawBytes(_) => "application/octet-stream",
    }
}

fn get_client_builder(
    proxy_config: &Proxy,
    should_bypass_proxy: bool,
) -> CustomResult<reqwest::ClientBuilder, ApiClientError> {
    let mut client_builder = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .user_agent(consts::USER_AGENT)
        .timeout(Duration::from_secs(
            proxy_config
                .request_timeout
                .unwrap_or(consts::REQUEST_TIME_OUT),
        ))
        .pool_idle_timeout(Duration::from_secs(
            proxy_config
                .idle_pool_connection_timeout
                .unwrap_or_default(),
        ));

    if should_bypass_proxy {
        return Ok(client_builder.no_proxy());
    }

    // Proxy all HTTPS traffic through the configured HTTPS proxy
    if let Some(url) = proxy_config.https_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::https(url)
                .change_context(ApiClientError::InvalidProxyConfiguration)
                .inspect_err(|err| {
                    info_log(
                        "PROXY_ERROR",
                        &json!(format!("HTTPS proxy configuration error. Error: {:?}", err)),
                    );
                })?,
        );
    }

    // Proxy all HTTP traffic through the configured HTTP proxy
    if let Some(url) = proxy_config.http_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::http(url)
                .change_context(ApiClientError::InvalidProxyConfiguration)
                .inspect_err(|err| {
                    info_log(
                        "PROXY_ERROR",
                        &json!(format!("HTTP proxy configuration error. Error: {:?}", err)),
                    );
                })?,
        );
    }

    Ok(client_builder)
}

async fn handle_response(
    response: CustomResult<reqwest::Response, ApiClientError>,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let resp = response?;
    let status_code = resp.status().as_u16();
    let headers = Some(resp.headers().to_owned());
    let response = resp
        .bytes()
        .await
        .change_context(ApiClientError::ResponseDecodingFailed)?;
    let response = Response {
        headers,
        response,
        status_code,
    };
    match status_code {
        200..=299 => Ok(Ok(response)),
        _ => {
            info_log(
                "ERROR_RESPONSE",
                &json!(format!("Connector answered with status {status_code}")),
            );
            Ok(Err(response))
        }
    }
}

pub(crate) trait HeaderExt {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError>;
}

impl HeaderExt for Headers {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError> {
        use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

        self.into_iter().try_fold(
            HeaderMap::new(),
            |mut header_map, (header_name, header_value)| {
                let header_name = HeaderName::from_str(&header_name)
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                let header_value = header_value.into_inner();
                let header_value = HeaderValue::from_str(&header_value)
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                header_map.append(header_name, header_value);
                Ok(header_map)
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use common_utils::request::RequestBuilder;
    use hyperswitch_masking::Mask;
    use wiremock::{
        matchers::{body_string, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    fn post(url: String, body: &str) -> Request {
        RequestBuilder::new()
            .method(Method::Post)
            .url(&url)
            .attach_default_headers()
            .headers(vec![(
                "Authorization".to_string(),
                "Passcode c2VjcmV0".to_string().into_masked(),
            )])
            .set_body(RequestContent::Json(body.to_string()))
            .build()
    }

    #[test]
    fn headers_are_converted() {
        let mut headers = Headers::new();
        headers.insert(("X-Test".to_string(), "1".into()));
        headers.insert((
            "Authorization".to_string(),
            "secret".to_string().into_masked(),
        ));
        let map = headers.construct_header_map().unwrap();
        assert_eq!(map.get("x-test").unwrap(), "1");
        assert_eq!(map.get("authorization").unwrap(), "secret");

        let mut invalid = Headers::new();
        invalid.insert(("Bad Header".to_string(), "1".into()));
        assert!(invalid.construct_header_map().is_err());
    }

    #[tokio::test]
    async fn success_statuses_are_ok() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payments"))
            .and(header("Authorization", "Passcode c2VjcmV0"))
            .and(header("Content-Type", "application/json"))
            .and(body_string(r#"{"amount":"1.00"}"#))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"approved":"1"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::default();
        let response = transport
            .send(post(
                format!("{}/v1/payments", server.uri()),
                r#"{"amount":"1.00"}"#,
            ))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(response.status_code, 200);
        assert_eq!(
            response.response,
            bytes::Bytes::from_static(br#"{"approved":"1"}"#)
        );
    }

    #[tokio::test]
    async fn error_statuses_carry_their_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(402).set_body_string(r#"{"message":"DECLINE"}"#),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::default();
        let response = transport
            .send(post(format!("{}/v1/payments", server.uri()), "{}"))
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(response.status_code, 402);
        assert_eq!(response.body_as_text(), r#"{"message":"DECLINE"}"#);
    }

    #[tokio::test]
    async fn every_2xx_status_is_ok() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(203).set_body_string(r#"{"approved":"1"}"#))
            .mount(&server)
            .await;

        let response = HttpTransport::default()
            .send(post(format!("{}/v1/payments", server.uri()), "{}"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(response.status_code, 203);
        assert_eq!(response.body_as_text(), r#"{"approved":"1"}"#);
    }

    #[tokio::test]
    async fn redirects_are_not_followed_and_carry_their_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", "/elsewhere")
                    .set_body_string("moved"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = HttpTransport::default()
            .send(post(format!("{}/v1/payments", server.uri()), "{}"))
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(response.status_code, 302);
        assert_eq!(response.body_as_text(), "moved");
    }

    #[tokio::test]
    async fn invalid_url_is_rejected() {
        let error = HttpTransport::default()
            .send(post("not a url".to_string(), "{}"))
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &ApiClientError::UrlEncodingFailed);
    }
}
