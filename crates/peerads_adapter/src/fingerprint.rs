/// Short BLAKE3 fingerprint of a credential. Safe to log; the key itself never is.
pub fn key_fingerprint(key: &str) -> String {
    let hash = blake3::hash(key.as_bytes());
    let hex = hex::encode(hash.as_bytes());
    format!("b3:{}", &hex[..8])
}
