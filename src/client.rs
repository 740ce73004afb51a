//! HTTP access to a camera's ISAPI configuration endpoints.
//!
//! The cameras answer every request with a digest challenge, so each fetch
//! or write is a two-step exchange: an unauthenticated request, then a retry
//! carrying the computed `Authorization` header. No session state is kept
//! between calls.
use err_derive::Error;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::blocking::{Client, ClientBuilder, Response};
use reqwest::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use reqwest::{Method, StatusCode};
use std::time::Duration;

use crate::detection::DetectionType;

/// All detection endpoints live below this path on the camera
const BASE_PATH: &str = "ISAPI";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors raised while talking to a camera's ISAPI endpoint
#[derive(Debug, Error)]
pub enum HttpError {
    /// A transport-level failure talking to the camera
    #[error(display = "HTTP transport error")]
    Transport(#[error(source)] reqwest::Error),

    /// The camera answered with a status other than 200
    #[error(display = "Camera answered with status {}", _0)]
    Status(StatusCode),

    /// The camera demanded an authentication scheme we do not speak
    #[error(display = "Camera sent an unusable authentication challenge")]
    BadChallenge,
}

/// The credentials of the location a camera belongs to
#[derive(Debug, Clone, Copy)]
pub(crate) struct Credentials<'a> {
    pub(crate) username: &'a str,
    pub(crate) password: &'a str,
}

/// Fetch and replace of a single detection-type's configuration document.
///
/// The trait seam exists so the controller can be driven against a recorded
/// transport in tests.
pub(crate) trait CameraTransport {
    fn fetch(
        &self,
        address: &str,
        detection: DetectionType,
        credentials: &Credentials,
    ) -> Result<Vec<u8>, HttpError>;

    fn write(
        &self,
        address: &str,
        detection: DetectionType,
        credentials: &Credentials,
        body: &[u8],
    ) -> Result<(), HttpError>;
}

pub(crate) struct IsapiClient {
    client: Client,
}

impl IsapiClient {
    pub(crate) fn new() -> Result<Self, HttpError> {
        let client = ClientBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(HttpError::Transport)?;
        Ok(IsapiClient { client })
    }

    fn send(
        &self,
        method: Method,
        address: &str,
        detection: DetectionType,
        credentials: &Credentials,
        body: Option<&[u8]>,
    ) -> Result<Response, HttpError> {
        let url = format!("http://{}/{}/{}", address, BASE_PATH, detection.path_suffix());
        let uri = format!("/{}/{}", BASE_PATH, detection.path_suffix());

        let first = self.execute(&method, &url, None, body)?;
        if first.status() != StatusCode::UNAUTHORIZED {
            return Ok(first);
        }

        let challenge = first
            .headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|header| header.to_str().ok())
            .and_then(DigestChallenge::parse)
            .ok_or(HttpError::BadChallenge)?;
        let cnonce = format!(
            "{:x}",
            md5::compute(format!("{}:{}", credentials.username, credentials.password))
        );
        let authorization = challenge.authorization(method.as_str(), &uri, credentials, &cnonce);

        self.execute(&method, &url, Some(authorization), body)
    }

    fn execute(
        &self,
        method: &Method,
        url: &str,
        authorization: Option<String>,
        body: Option<&[u8]>,
    ) -> Result<Response, HttpError> {
        let mut request = self.client.request(method.clone(), url);
        if let Some(authorization) = authorization {
            request = request.header(AUTHORIZATION, authorization);
        }
        if let Some(body) = body {
            request = request.body(body.to_vec());
        }
        request.send().map_err(HttpError::Transport)
    }
}

impl CameraTransport for IsapiClient {
    fn fetch(
        &self,
        address: &str,
        detection: DetectionType,
        credentials: &Credentials,
    ) -> Result<Vec<u8>, HttpError> {
        let response = self.send(Method::GET, address, detection, credentials, None)?;
        if response.status() != StatusCode::OK {
            return Err(HttpError::Status(response.status()));
        }
        Ok(response.bytes().map_err(HttpError::Transport)?.to_vec())
    }

    fn write(
        &self,
        address: &str,
        detection: DetectionType,
        credentials: &Credentials,
        body: &[u8],
    ) -> Result<(), HttpError> {
        let response = self.send(Method::PUT, address, detection, credentials, Some(body))?;
        if response.status() != StatusCode::OK {
            return Err(HttpError::Status(response.status()));
        }
        Ok(())
    }
}

lazy_static! {
    static ref RE_CHALLENGE_FIELD: Regex =
        Regex::new(r#"(?i)(realm|nonce|qop|opaque)=["']?([^,"'\s]+)["']?"#).unwrap();
}

#[derive(Debug, PartialEq, Eq)]
struct DigestChallenge {
    realm: String,
    nonce: String,
    qop: Option<String>,
    opaque: Option<String>,
}

impl DigestChallenge {
    fn parse(header: &str) -> Option<Self> {
        if !header.to_lowercase().contains("digest") {
            return None;
        }

        let mut realm = None;
        let mut nonce = None;
        let mut qop = None;
        let mut opaque = None;
        for capture in RE_CHALLENGE_FIELD.captures_iter(header) {
            let value = capture[2].to_string();
            match capture[1].to_lowercase().as_str() {
                "realm" => realm = Some(value),
                "nonce" => nonce = Some(value),
                "qop" => qop = Some(value),
                "opaque" => opaque = Some(value),
                _ => {}
            }
        }

        Some(DigestChallenge {
            realm: realm?,
            nonce: nonce?,
            qop,
            opaque,
        })
    }

    /// Computes the RFC 2617 `Authorization` header value for one request
    fn authorization(
        &self,
        method: &str,
        uri: &str,
        credentials: &Credentials,
        cnonce: &str,
    ) -> String {
        let ha1 = format!(
            "{:x}",
            md5::compute(format!(
                "{}:{}:{}",
                credentials.username, self.realm, credentials.password
            ))
        );
        let ha2 = format!("{:x}", md5::compute(format!("{}:{}", method, uri)));

        let nc = "00000001";
        let response = match &self.qop {
            Some(qop) => format!(
                "{:x}",
                md5::compute(format!(
                    "{}:{}:{}:{}:{}:{}",
                    ha1, self.nonce, nc, cnonce, qop, ha2
                ))
            ),
            None => format!("{:x}", md5::compute(format!("{}:{}:{}", ha1, self.nonce, ha2))),
        };

        let mut header = format!(
            r#"Digest username="{}", realm="{}", nonce="{}", uri="{}", response="{}""#,
            credentials.username, self.realm, self.nonce, uri, response
        );
        if let Some(qop) = &self.qop {
            header.push_str(&format!(r#", qop={}, nc={}, cnonce="{}""#, qop, nc, cnonce));
        }
        if let Some(opaque) = &self.opaque {
            header.push_str(&format!(r#", opaque="{}""#, opaque));
        }
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREDENTIALS: Credentials<'static> = Credentials {
        username: "Mufasa",
        password: "Circle Of Life",
    };

    #[test]
    fn test_parse_challenge() {
        let header = r#"Digest realm="testrealm@host.com", qop="auth", nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093", opaque="5ccc069c403ebaf9f0171e9517f40e41""#;
        let challenge = DigestChallenge::parse(header).unwrap();
        assert_eq!(
            challenge,
            DigestChallenge {
                realm: "testrealm@host.com".to_string(),
                nonce: "dcd98b7102dd2f0e8b11d0f600bfb0c093".to_string(),
                qop: Some("auth".to_string()),
                opaque: Some("5ccc069c403ebaf9f0171e9517f40e41".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_challenge_rejects_basic() {
        assert_eq!(DigestChallenge::parse(r#"Basic realm="camera""#), None);
    }

    #[test]
    fn test_parse_challenge_requires_nonce() {
        assert_eq!(DigestChallenge::parse(r#"Digest realm="camera""#), None);
    }

    // The worked example from RFC 2617 section 3.5
    #[test]
    fn test_digest_response() {
        let challenge = DigestChallenge {
            realm: "testrealm@host.com".to_string(),
            nonce: "dcd98b7102dd2f0e8b11d0f600bfb0c093".to_string(),
            qop: Some("auth".to_string()),
            opaque: Some("5ccc069c403ebaf9f0171e9517f40e41".to_string()),
        };
        let header = challenge.authorization("GET", "/dir/index.html", &CREDENTIALS, "0a4f113b");
        assert!(header.contains(r#"response="6629fae49393a05397450978507c4ef1""#));
        assert!(header.contains(r#"username="Mufasa""#));
        assert!(header.contains(r#"uri="/dir/index.html""#));
        assert!(header.contains("qop=auth"));
        assert!(header.contains(r#"opaque="5ccc069c403ebaf9f0171e9517f40e41""#));
    }

    #[test]
    fn test_digest_response_without_qop() {
        let challenge = DigestChallenge {
            realm: "testrealm@host.com".to_string(),
            nonce: "dcd98b7102dd2f0e8b11d0f600bfb0c093".to_string(),
            qop: None,
            opaque: None,
        };
        let header = challenge.authorization("GET", "/dir/index.html", &CREDENTIALS, "unused");
        assert!(!header.contains("cnonce"));
        assert!(!header.contains("opaque"));
    }
}
