use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Role claim carried by every user. Only the upper-case spelling is
/// accepted anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,

    #[serde(rename = "MANAGER")]
    Manager,
}

impl Role {
    pub const NAMES: &'static [&'static str] = &["ADMIN", "MANAGER"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
        }
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "MANAGER" => Ok(Role::Manager),
            _ => bail!("unknown role '{s}'"),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public view of a user account. Password hash and remember token never
/// leave the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub names: String,
    pub lastname: String,
    pub email: String,
    pub role: Role,
    pub create_time: u64,
    pub update_time: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("MANAGER".parse::<Role>().unwrap(), Role::Manager);
        assert!("admin".parse::<Role>().is_err());
        assert!("manager".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());

        for name in Role::NAMES {
            let role: Role = name.parse().unwrap();
            assert_eq!(role.as_str(), *name);
            assert_eq!(role.to_string(), *name);
        }
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        let role: Role = serde_json::from_str("\"MANAGER\"").unwrap();
        assert_eq!(role, Role::Manager);
        assert!(serde_json::from_str::<Role>("\"manager\"").is_err());
    }

    #[test]
    fn test_user_serialize_hides_secrets() {
        let user = User {
            id: 1,
            names: String::from("Ana"),
            lastname: String::from("Ruiz"),
            email: String::from("ana@x.com"),
            role: Role::Admin,
            create_time: 10,
            update_time: 10,
        };
        let value = serde_json::to_value(&user).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("password"));
        assert!(!obj.contains_key("remember_token"));
        assert_eq!(obj["role"], "ADMIN");
    }
}
