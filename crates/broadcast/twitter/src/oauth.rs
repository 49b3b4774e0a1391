use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::Rng;
use rand::distr::Alphanumeric;
use sha1::Sha1;
use std::fmt::{Debug, Formatter};
use url::Url;

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters stay as they are, everything else is encoded.
const RFC3986: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";
const NONCE_LEN: usize = 32;

#[derive(Clone, Default, PartialEq, Eq)]
pub struct OAuth1Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl Debug for OAuth1Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth1Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &self.access_token)
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

/// Signs requests with OAuth 1.0a user context (HMAC-SHA1).
#[derive(Clone, Debug)]
pub struct OAuth1Signer {
    credentials: OAuth1Credentials,
}

impl OAuth1Signer {
    pub fn new(credentials: OAuth1Credentials) -> Self {
        Self { credentials }
    }

    /// `Authorization` header value with a fresh nonce and the current timestamp.
    ///
    /// JSON bodies are not part of the signature, only query parameters of `url` are.
    pub fn authorization_header(&self, method: &str, url: &Url) -> String {
        let nonce: String = rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.authorization_header_with(method, url, &[], &nonce, &timestamp)
    }

    /// Same as [`Self::authorization_header`] with explicit nonce and timestamp.
    /// `extra_params` are form-encoded body parameters that take part in the signature.
    pub fn authorization_header_with(&self, method: &str, url: &Url, extra_params: &[(&str, &str)], nonce: &str, timestamp: &str) -> String {
        let mut oauth_params = self.oauth_params(nonce, timestamp);
        let signature = self.signature(method, url, &oauth_params, extra_params);
        oauth_params.push(("oauth_signature", signature));
        oauth_params.sort();

        let fields: Vec<String> = oauth_params.iter().map(|(key, value)| format!("{}=\"{}\"", encode(key), encode(value))).collect();
        format!("OAuth {}", fields.join(", "))
    }

    fn oauth_params(&self, nonce: &str, timestamp: &str) -> Vec<(&'static str, String)> {
        vec![
            ("oauth_consumer_key", self.credentials.consumer_key.clone()),
            ("oauth_nonce", nonce.to_string()),
            ("oauth_signature_method", SIGNATURE_METHOD.to_string()),
            ("oauth_timestamp", timestamp.to_string()),
            ("oauth_token", self.credentials.access_token.clone()),
            ("oauth_version", OAUTH_VERSION.to_string()),
        ]
    }

    fn signature(&self, method: &str, url: &Url, oauth_params: &[(&'static str, String)], extra_params: &[(&str, &str)]) -> String {
        let mut params: Vec<(String, String)> = url.query_pairs().map(|(key, value)| (encode(&key), encode(&value))).collect();
        params.extend(oauth_params.iter().map(|(key, value)| (encode(key), encode(value))));
        params.extend(extra_params.iter().map(|(key, value)| (encode(key), encode(value))));
        params.sort();

        let parameter_string = params.iter().map(|(key, value)| format!("{key}={value}")).collect::<Vec<_>>().join("&");

        let mut base_url = url.clone();
        base_url.set_query(None);
        base_url.set_fragment(None);

        let base_string = format!("{}&{}&{}", method.to_uppercase(), encode(base_url.as_str()), encode(&parameter_string));
        let signing_key = format!("{}&{}", encode(&self.credentials.consumer_secret), encode(&self.credentials.access_token_secret));

        let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes()).expect("HMAC accepts keys of any length");
        mac.update(base_string.as_bytes());
        STANDARD.encode(mac.finalize().into_bytes())
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, RFC3986).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> OAuth1Signer {
        OAuth1Signer::new(OAuth1Credentials {
            consumer_key: "xvz1evFS4wEEPTGEFPHBog".to_string(),
            consumer_secret: "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw".to_string(),
            access_token: "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb".to_string(),
            access_token_secret: "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE".to_string(),
        })
    }

    #[test]
    fn test_encode_keeps_unreserved() {
        assert_eq!(encode("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
        assert_eq!(encode("a-b.c_d~e"), "a-b.c_d~e");
        assert_eq!(encode("☃"), "%E2%98%83");
    }

    #[test]
    fn test_known_signature() {
        let url = Url::parse("https://api.twitter.com/1.1/statuses/update.json?include_entities=true").unwrap();
        let header = signer().authorization_header_with(
            "POST",
            &url,
            &[("status", "Hello Ladies + Gentlemen, a signed OAuth request!")],
            "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg",
            "1318622958",
        );

        assert!(header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""), "{header}");
    }

    #[test]
    fn test_header_shape() {
        let url = Url::parse("https://api.twitter.com/2/tweets").unwrap();
        let header = signer().authorization_header("post", &url);

        assert!(header.starts_with("OAuth oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\", oauth_nonce=\""));
        assert!(header.contains("oauth_signature_method=\"HMAC-SHA1\""));
        assert!(header.contains("oauth_token=\"370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb\""));
        assert!(header.ends_with("oauth_version=\"1.0\""));
        assert_eq!(header.matches("=\"").count(), 7);
    }

    #[test]
    fn test_nonce_changes() {
        let url = Url::parse("https://api.twitter.com/2/tweets").unwrap();
        let signer = signer();
        assert_ne!(signer.authorization_header("POST", &url), signer.authorization_header("POST", &url));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let debug = format!("{:?}", signer());
        assert!(!debug.contains("kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw"));
        assert!(!debug.contains("LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE"));
    }
}
