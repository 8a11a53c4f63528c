//! Canonicalizer & hasher
//!
//! Every category value in a fingerprint, whichever backend produced it, goes
//! through [`digest_bytes`]: MD5 over the bytes, standard padded base64 of the
//! 16-byte sum. Structured records are first turned into bytes by
//! [`canonical_bytes`], a fixed-schema bincode encoding (fields in declaration
//! order, little-endian fixed-width integers, length-prefixed strings).

use base64::{engine::general_purpose::STANDARD, Engine as _};
use md5::{Digest, Md5};
use serde::Serialize;

use hwp_error::{HwprintError, Result};

/// Length of the raw digest in bytes
pub const DIGEST_LEN: usize = 16;

/// Length of an encoded digest (16 bytes in padded base64)
pub const ENCODED_DIGEST_LEN: usize = 24;

/// Digest and encode raw bytes
pub fn digest_bytes(bytes: &[u8]) -> String {
    let sum = Md5::digest(bytes);
    STANDARD.encode(sum)
}

/// Deterministic encoding of a record
pub fn canonical_bytes<T: Serialize>(record: &T) -> Result<Vec<u8>> {
    bincode::serialize(record)
        .map_err(|e| HwprintError::encoding(std::any::type_name::<T>(), e.to_string()))
}

/// Canonicalize, digest and encode a record
pub fn digest_record<T: Serialize>(record: &T) -> Result<String> {
    Ok(digest_bytes(&canonical_bytes(record)?))
}

/// True if `value` has the shape of an encoded digest
pub fn is_encoded_digest(value: &str) -> bool {
    value.len() == ENCODED_DIGEST_LEN
        && STANDARD
            .decode(value)
            .map(|raw| raw.len() == DIGEST_LEN)
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Processor;

    #[test]
    fn test_known_md5_vector() {
        // md5("") = d41d8cd98f00b204e9800998ecf8427e
        assert_eq!(digest_bytes(b""), "1B2M2Y8AsgTpgAmY7PhCfg==");
    }

    #[test]
    fn test_encoded_digest_shape() {
        let encoded = digest_bytes(b"Intel64 Family 6 Model 85 Stepping 7");
        assert_eq!(encoded.len(), ENCODED_DIGEST_LEN);
        assert!(is_encoded_digest(&encoded));
        assert!(!is_encoded_digest("host1"));
        assert!(!is_encoded_digest(""));
    }

    #[test]
    fn test_canonical_bytes_follow_field_order() {
        #[derive(Serialize)]
        struct Pair {
            first: u16,
            second: String,
        }
        let bytes = canonical_bytes(&Pair {
            first: 0x0102,
            second: "ab".to_string(),
        })
        .unwrap();
        // u16 little-endian, then u64 length prefix, then the bytes
        assert_eq!(bytes, vec![0x02, 0x01, 2, 0, 0, 0, 0, 0, 0, 0, b'a', b'b']);
    }

    #[test]
    fn test_record_digest_is_stable() {
        let cpu = Processor {
            caption: "Intel64 Family 6 Model 85 Stepping 7".to_string(),
            device_id: "CPU0".to_string(),
            manufacturer: "GenuineIntel".to_string(),
            max_clock_speed: 2500,
            name: "Intel(R) Xeon(R) Platinum 8259CL CPU @ 2.50GHz".to_string(),
            socket_designation: "CPU 0".to_string(),
        };
        let first = digest_record(&cpu).unwrap();
        let second = digest_record(&cpu.clone()).unwrap();
        assert_eq!(first, second);

        let mut changed = cpu;
        changed.max_clock_speed = 2501;
        assert_ne!(first, digest_record(&changed).unwrap());
    }
}
