//! Greeting name taken from the last path segment.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// Last path segment, percent-decoded. Bytes that are not valid UTF-8 become U+FFFD, so any
/// segment the router matched is accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GreetingName(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for GreetingName
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let segment = parts.uri.path().rsplit('/').next().unwrap_or_default();
        let bytes = urlencoding::decode_binary(segment.as_bytes());
        Ok(GreetingName(String::from_utf8_lossy(&bytes).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(uri: &str) -> String {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        let GreetingName(name) = GreetingName::from_request_parts(&mut parts, &()).await.unwrap();
        name
    }

    #[tokio::test]
    async fn decodes_percent_escapes() {
        assert_eq!(extract("/greetings/a%2Fb").await, "a/b");
        assert_eq!(extract("/greetings/Zo%C3%AB").await, "Zoë");
        assert_eq!(extract("/greetings/a+b").await, "a+b");
    }

    #[tokio::test]
    async fn invalid_utf8_is_replaced() {
        assert_eq!(extract("/greetings/%FF").await, "\u{FFFD}");
        assert_eq!(extract("/v1/greetings/Al%FFice").await, "Al\u{FFFD}ice");
    }

    #[tokio::test]
    async fn query_string_is_not_part_of_the_name() {
        assert_eq!(extract("/greetings/Alice?lang=en").await, "Alice");
    }
}
