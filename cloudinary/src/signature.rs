use std::collections::BTreeMap;

use serde::Deserialize;
use sha2::Digest;
use strum::{Display, EnumString};

/// Digest used for request signatures. Must match the algorithm configured
/// on the Cloudinary account, which is SHA-1 unless changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

/// Computes the request signature for a set of signed parameters.
///
/// Parameters are sorted by name, empty values are skipped, and the pairs are
/// joined as `key=value` with `&`. The API secret is appended and the result
/// hashed with `algorithm`, hex encoded.
pub fn sign_params(
    params: &BTreeMap<&str, String>,
    api_secret: &str,
    algorithm: SignatureAlgorithm,
) -> String {
    let mut to_sign = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    to_sign.push_str(api_secret);

    match algorithm {
        SignatureAlgorithm::Sha1 => format!("{:x}", sha1::Sha1::digest(to_sign.as_bytes())),
        SignatureAlgorithm::Sha256 => format!("{:x}", sha2::Sha256::digest(to_sign.as_bytes())),
    }
}
