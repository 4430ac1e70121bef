#![allow(dead_code)]

use regex::Regex;

use uuidfn::plugin::{Context, NoopContext};

pub const TEST_NAMESPACE: &str = "1b671a64-40d5-491e-99b0-da01ff1f3341";
pub const TEST_NAME: &str = "test";

pub fn init_log() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn mock_context() -> Box<dyn Context> {
    Box::new(NoopContext)
}

/// Check the canonical layout, the version nibble and the RFC 4122 variant bits.
pub fn assert_uuid(result: &str, version: u32) {
    let re = Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap();
    assert!(re.is_match(result), "{} is not a canonical UUID", result);

    let parts: Vec<&str> = result.split('-').collect();
    assert_eq!(5, parts.len());

    let version_nibble = parts[2].chars().next().and_then(|c| c.to_digit(16)).unwrap();
    assert_eq!(version, version_nibble, "{}", result);

    let variant_nibble = parts[3].chars().next().and_then(|c| c.to_digit(16)).unwrap();
    assert_eq!(0b10, (variant_nibble & 0b1100) >> 2, "{}", result);
}
