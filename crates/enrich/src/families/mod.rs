/// Indicator families: the fields and scanners each log-source family declares

pub mod common;
pub mod aws;

use crate::field::FieldId;
use crate::registry::RegistryBuilder;

/// First id of the common family
pub const COMMON_FIELD_BASE: FieldId = FieldId::new(1);
/// First id of the AWS family
pub const AWS_FIELD_BASE: FieldId = FieldId::new(1000);

/// Register every built-in family.
pub fn register_all(b: &mut RegistryBuilder) {
    common::register(b);
    aws::register(b);
}
