//! Common indicator family shared by every log type: network and hash indicators.

use std::net::IpAddr;

use crate::field::{FieldId, FieldMeta};
use crate::registry::RegistryBuilder;
use crate::writer::ValueWriter;

use super::COMMON_FIELD_BASE;

pub const FIELD_IP_ADDRESS: FieldId = COMMON_FIELD_BASE.offset(0);
pub const FIELD_DOMAIN_NAME: FieldId = COMMON_FIELD_BASE.offset(1);
pub const FIELD_MD5_HASH: FieldId = COMMON_FIELD_BASE.offset(2);
pub const FIELD_SHA1_HASH: FieldId = COMMON_FIELD_BASE.offset(3);
pub const FIELD_SHA256_HASH: FieldId = COMMON_FIELD_BASE.offset(4);

pub const SCANNER_IP_ADDRESS: &str = "ip_address";
pub const SCANNER_HOSTNAME: &str = "hostname";
pub const SCANNER_DOMAIN_NAME: &str = "domain_name";
pub const SCANNER_MD5: &str = "md5";
pub const SCANNER_SHA1: &str = "sha1";
pub const SCANNER_SHA256: &str = "sha256";

pub fn register(b: &mut RegistryBuilder) {
    b.register_field(
        FIELD_IP_ADDRESS,
        FieldMeta::new("p_any_ip_addresses", "AnyIPAddresses", "Collection of IP addresses associated with the row"),
    )
    .register_field(
        FIELD_DOMAIN_NAME,
        FieldMeta::new("p_any_domain_names", "AnyDomainNames", "Collection of domain names associated with the row"),
    )
    .register_field(
        FIELD_MD5_HASH,
        FieldMeta::new("p_any_md5_hashes", "AnyMD5Hashes", "Collection of MD5 hashes associated with the row"),
    )
    .register_field(
        FIELD_SHA1_HASH,
        FieldMeta::new("p_any_sha1_hashes", "AnySHA1Hashes", "Collection of SHA1 hashes associated with the row"),
    )
    .register_field(
        FIELD_SHA256_HASH,
        FieldMeta::new(
            "p_any_sha256_hashes",
            "AnySHA256Hashes",
            "Collection of SHA256 hashes associated with the row",
        ),
    );

    b.register_scanner(SCANNER_IP_ADDRESS, scan_ip_address, &[FIELD_IP_ADDRESS])
        .register_scanner(SCANNER_HOSTNAME, scan_hostname, &[FIELD_IP_ADDRESS, FIELD_DOMAIN_NAME])
        .register_passthrough(SCANNER_DOMAIN_NAME, FIELD_DOMAIN_NAME, &[FIELD_DOMAIN_NAME])
        .register_scanner(SCANNER_MD5, scan_md5, &[FIELD_MD5_HASH])
        .register_scanner(SCANNER_SHA1, scan_sha1, &[FIELD_SHA1_HASH])
        .register_scanner(SCANNER_SHA256, scan_sha256, &[FIELD_SHA256_HASH]);
}

pub fn scan_ip_address(w: &mut dyn ValueWriter, input: &str) {
    let input = input.trim();
    if input.parse::<IpAddr>().is_ok() {
        w.write_values(FIELD_IP_ADDRESS, &[input]);
    }
}

/// IP literals go to the address field, anything else to the domain field.
pub fn scan_hostname(w: &mut dyn ValueWriter, input: &str) {
    let input = input.trim();
    if input.is_empty() {
        return;
    }
    if input.parse::<IpAddr>().is_ok() {
        w.write_values(FIELD_IP_ADDRESS, &[input]);
    } else {
        w.write_values(FIELD_DOMAIN_NAME, &[input]);
    }
}

pub fn scan_md5(w: &mut dyn ValueWriter, input: &str) {
    scan_hex(w, FIELD_MD5_HASH, 32, input);
}

pub fn scan_sha1(w: &mut dyn ValueWriter, input: &str) {
    scan_hex(w, FIELD_SHA1_HASH, 40, input);
}

pub fn scan_sha256(w: &mut dyn ValueWriter, input: &str) {
    scan_hex(w, FIELD_SHA256_HASH, 64, input);
}

fn scan_hex(w: &mut dyn ValueWriter, field: FieldId, len: usize, input: &str) {
    if input.len() == len && input.bytes().all(|b| b.is_ascii_hexdigit()) {
        w.write_values(field, &[input]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(f: fn(&mut dyn ValueWriter, &str), input: &str) -> Vec<(FieldId, String)> {
        let mut out: Vec<(FieldId, String)> = Vec::new();
        f(&mut out, input);
        out
    }

    #[test]
    fn test_ip_address() {
        assert_eq!(scan(scan_ip_address, "10.0.0.1"), vec![(FIELD_IP_ADDRESS, "10.0.0.1".to_string())]);
        assert_eq!(scan(scan_ip_address, " ::1 "), vec![(FIELD_IP_ADDRESS, "::1".to_string())]);
        assert!(scan(scan_ip_address, "10.0.0.256").is_empty());
        assert!(scan(scan_ip_address, "example.com").is_empty());
    }

    #[test]
    fn test_hostname_splits_ip_and_domain() {
        assert_eq!(scan(scan_hostname, "192.168.1.1"), vec![(FIELD_IP_ADDRESS, "192.168.1.1".to_string())]);
        assert_eq!(scan(scan_hostname, "api.example.com"), vec![(FIELD_DOMAIN_NAME, "api.example.com".to_string())]);
        assert!(scan(scan_hostname, "   ").is_empty());
    }

    #[test]
    fn test_hashes_require_exact_hex_length() {
        let md5 = "d41d8cd98f00b204e9800998ecf8427e";
        assert_eq!(scan(scan_md5, md5), vec![(FIELD_MD5_HASH, md5.to_string())]);
        assert!(scan(scan_sha1, md5).is_empty());
        assert!(scan(scan_md5, "z41d8cd98f00b204e9800998ecf8427e").is_empty());

        let sha256 = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
        assert_eq!(scan(scan_sha256, sha256), vec![(FIELD_SHA256_HASH, sha256.to_string())]);
    }
}
