//! AWS indicator family: account ids, instance ids, ARNs and tags.

use thiserror::Error;

use crate::field::{FieldId, FieldMeta};
use crate::registry::RegistryBuilder;
use crate::writer::ValueWriter;

use super::AWS_FIELD_BASE;

pub const FIELD_ACCOUNT_ID: FieldId = AWS_FIELD_BASE.offset(0);
pub const FIELD_INSTANCE_ID: FieldId = AWS_FIELD_BASE.offset(1);
pub const FIELD_ARN: FieldId = AWS_FIELD_BASE.offset(2);
pub const FIELD_TAG: FieldId = AWS_FIELD_BASE.offset(3);

pub const SCANNER_ARN: &str = "aws_arn";
pub const SCANNER_ACCOUNT_ID: &str = "aws_account_id";
pub const SCANNER_INSTANCE_ID: &str = "aws_instance_id";
pub const SCANNER_TAG: &str = "aws_tag";

const ACCOUNT_ID_LEN: usize = 12;
const INSTANCE_ID_PREFIX: &str = "i-";
const INSTANCE_RESOURCE_PREFIX: &str = "instance/";

pub fn register(b: &mut RegistryBuilder) {
    b.register_field(
        FIELD_ACCOUNT_ID,
        FieldMeta::new(
            "p_any_aws_account_ids",
            "AnyAWSAccountIds",
            "Collection of AWS account ids associated with the row",
        ),
    )
    .register_field(
        FIELD_INSTANCE_ID,
        FieldMeta::new(
            "p_any_aws_instance_ids",
            "AnyAWSInstanceIds",
            "Collection of AWS instance ids associated with the row",
        ),
    )
    .register_field(
        FIELD_ARN,
        FieldMeta::new("p_any_aws_arns", "AnyAWSARNs", "Collection of AWS ARNs associated with the row"),
    )
    .register_field(
        FIELD_TAG,
        FieldMeta::new("p_any_aws_tags", "AnyAWSTags", "Collection of AWS tags associated with the row"),
    );

    b.register_scanner(SCANNER_ARN, scan_arn, &[FIELD_ARN, FIELD_ACCOUNT_ID, FIELD_INSTANCE_ID])
        .register_scanner(SCANNER_INSTANCE_ID, scan_instance_id, &[FIELD_INSTANCE_ID])
        .register_passthrough(SCANNER_TAG, FIELD_TAG, &[FIELD_TAG])
        .register_scanner(SCANNER_ACCOUNT_ID, scan_account_id, &[FIELD_ACCOUNT_ID]);
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArnError {
    #[error("arn: invalid prefix")]
    InvalidPrefix,
    #[error("arn: not enough sections")]
    NotEnoughSections,
}

/// A parsed `arn:partition:service:region:account-id:resource` name.
///
/// Sections may be empty; the resource keeps any further `:` separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arn<'a> {
    pub partition: &'a str,
    pub service: &'a str,
    pub region: &'a str,
    pub account_id: &'a str,
    pub resource: &'a str,
}

impl<'a> Arn<'a> {
    pub fn parse(input: &'a str) -> Result<Self, ArnError> {
        let rest = input.strip_prefix("arn:").ok_or(ArnError::InvalidPrefix)?;
        let mut sections = rest.splitn(5, ':');
        let mut next = || sections.next().ok_or(ArnError::NotEnoughSections);
        Ok(Self {
            partition: next()?,
            service: next()?,
            region: next()?,
            account_id: next()?,
            resource: next()?,
        })
    }
}

/// Emit the ARN, its account id and, for EC2 instances, the instance id.
pub fn scan_arn(w: &mut dyn ValueWriter, input: &str) {
    let Ok(arn) = Arn::parse(input) else {
        return;
    };
    w.write_values(FIELD_ARN, &[input]);
    scan_account_id(w, arn.account_id);
    scan_resource_instance_id(w, arn.resource);
}

// https://docs.aws.amazon.com/AWSEC2/latest/UserGuide/iam-policy-structure.html#EC2_ARN_Format
fn scan_resource_instance_id(w: &mut dyn ValueWriter, resource: &str) {
    if !resource.starts_with(INSTANCE_RESOURCE_PREFIX) {
        return;
    }
    let Some(slash) = resource.rfind('/') else {
        return;
    };
    // nothing after a trailing slash
    if slash + 1 < resource.len() {
        scan_instance_id(w, &resource[slash + 1..]);
    }
}

pub fn scan_account_id(w: &mut dyn ValueWriter, input: &str) {
    if input.len() == ACCOUNT_ID_LEN && input.bytes().all(|b| b.is_ascii_digit()) {
        w.write_values(FIELD_ACCOUNT_ID, &[input]);
    }
}

pub fn scan_instance_id(w: &mut dyn ValueWriter, input: &str) {
    if input.starts_with(INSTANCE_ID_PREFIX) {
        w.write_values(FIELD_INSTANCE_ID, &[input]);
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

    fn pairs(expected: &[(FieldId, &str)]) -> Vec<(FieldId, String)> {
        expected.iter().map(|(id, v)| (*id, v.to_string())).collect()
    }

    // ── ARN parsing ──────────────────────────────────────────────

    #[test]
    fn test_parse_arn_sections() {
        let arn = Arn::parse("arn:aws:iam::123456789012:role/admin:extra").unwrap();
        assert_eq!(arn.partition, "aws");
        assert_eq!(arn.service, "iam");
        assert_eq!(arn.region, "");
        assert_eq!(arn.account_id, "123456789012");
        assert_eq!(arn.resource, "role/admin:extra");
    }

    #[test]
    fn test_parse_arn_errors() {
        assert_eq!(Arn::parse("not-an-arn"), Err(ArnError::InvalidPrefix));
        assert_eq!(Arn::parse("arn:aws:s3"), Err(ArnError::NotEnoughSections));
    }

    // ── Account ids ──────────────────────────────────────────────

    #[test]
    fn test_account_id_exactly_twelve_digits() {
        assert_eq!(scan(scan_account_id, "123456789012"), pairs(&[(FIELD_ACCOUNT_ID, "123456789012")]));
        for bad in ["12345678901", "1234567890123", "12345678901a", "", "１２３４５６７８９０１２"] {
            assert!(scan(scan_account_id, bad).is_empty(), "{:?}", bad);
        }
    }

    // ── Instance ids ─────────────────────────────────────────────

    #[test]
    fn test_instance_id_prefix() {
        assert_eq!(scan(scan_instance_id, "i-0abcd1234"), pairs(&[(FIELD_INSTANCE_ID, "i-0abcd1234")]));
        assert!(scan(scan_instance_id, "ami-0abcd1234").is_empty());
        assert!(scan(scan_instance_id, "I-0abcd1234").is_empty());
    }

    // ── ARN scanner ──────────────────────────────────────────────

    #[test]
    fn test_scan_instance_arn() {
        let arn = "arn:aws:ec2:us-east-1:123456789012:instance/i-0abcd1234";
        assert_eq!(
            scan(scan_arn, arn),
            pairs(&[
                (FIELD_ARN, arn),
                (FIELD_ACCOUNT_ID, "123456789012"),
                (FIELD_INSTANCE_ID, "i-0abcd1234"),
            ])
        );
    }

    #[test]
    fn test_scan_not_an_arn() {
        assert!(scan(scan_arn, "not-an-arn").is_empty());
    }

    #[test]
    fn test_scan_arn_trailing_slash() {
        let arn = "arn:aws:ec2:us-east-1:123456789012:instance/";
        assert_eq!(
            scan(scan_arn, arn),
            pairs(&[(FIELD_ARN, arn), (FIELD_ACCOUNT_ID, "123456789012")])
        );
    }

    #[test]
    fn test_scan_arn_without_account() {
        let arn = "arn:aws:s3:::my-bucket/key";
        assert_eq!(scan(scan_arn, arn), pairs(&[(FIELD_ARN, arn)]));
    }

    #[test]
    fn test_scan_arn_non_instance_resource() {
        let arn = "arn:aws:ec2:us-east-1:123456789012:volume/vol-123";
        assert_eq!(
            scan(scan_arn, arn),
            pairs(&[(FIELD_ARN, arn), (FIELD_ACCOUNT_ID, "123456789012")])
        );
    }
}
