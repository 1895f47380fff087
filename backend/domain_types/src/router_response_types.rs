/// Raw HTTP exchange result handed back by the transport.
#[derive(Clone, Debug)]
pub struct Response {
    pub headers: Option<http::HeaderMap>,
    pub response: bytes::Bytes,
    pub status_code: u16,
}

impl Response {
    pub fn new(status_code: u16, response: impl Into<bytes::Bytes>) -> Self {
        Self {
            headers: None,
            response: response.into(),
            status_code,
        }
    }

    pub fn body_as_text(&self) -> String {
        String::from_utf8_lossy(&self.response).into_owned()
    }
}
