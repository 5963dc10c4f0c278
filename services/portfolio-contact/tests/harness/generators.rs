// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for submission replay.

use serde_json::{json, Value};
use std::net::{IpAddr, Ipv4Addr};

/// Generate a pool of client addresses for testing.
pub fn generate_ips(count: usize) -> Vec<IpAddr> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c))
        })
        .collect()
}

/// A submission that passes validation.
pub fn valid_submission(i: usize) -> Value {
    const PROJECT_TYPES: &[&str] = &[
        "automation",
        "performance",
        "security",
        "consulting",
        "other",
    ];
    let company = if i % 2 == 0 {
        Value::from(format!("Company {}", i))
    } else {
        Value::Null
    };
    json!({
        "name": format!("Visitor {}", i),
        "email": format!("visitor{}@example.com", i),
        "company": company,
        "projectType": PROJECT_TYPES[i % PROJECT_TYPES.len()],
        "message": format!("Hello, I would like to discuss a QA engagement (#{}).", i),
    })
}

/// Submissions that each violate at least one field rule, paired with the
/// fields expected in the error list.
pub fn invalid_submissions() -> Vec<(Value, Vec<&'static str>)> {
    vec![
        (
            json!({"name": "J", "email": "j@example.com", "projectType": "other", "message": "Long enough message"}),
            vec!["name"],
        ),
        (
            json!({"name": "Jane", "email": "jane(at)example.com", "projectType": "other", "message": "Long enough message"}),
            vec!["email"],
        ),
        (
            json!({"name": "Jane", "email": "jane@example.com", "projectType": "", "message": "Long enough message"}),
            vec!["projectType"],
        ),
        (
            json!({"name": "Jane", "email": "jane@example.com", "projectType": "other", "message": "x".repeat(2001)}),
            vec!["message"],
        ),
        (
            json!({"name": "", "email": "", "projectType": "", "message": ""}),
            vec!["name", "email", "projectType", "message"],
        ),
        (json!({}), vec!["name", "email", "projectType", "message"]),
    ]
}

/// Request bodies that are not JSON at all.
pub fn malformed_bodies() -> Vec<&'static str> {
    vec!["", "{", "name=Jane&email=jane@example.com", "{\"name\": \"Jane\",}"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ips() {
        let ips = generate_ips(256);
        assert_eq!(ips.len(), 256);
        // All should be unique
        let unique: std::collections::HashSet<_> = ips.iter().collect();
        assert_eq!(unique.len(), 256);
    }
}
