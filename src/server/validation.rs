use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::types::response::FieldErrors;

use super::db::types::Transaction;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .unwrap()
});

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Present, not null, and not an empty string or array.
    Required,
    String,
    Email,
    /// String equal to one of the listed values, case sensitive.
    In(&'static [&'static str]),
    /// No existing row in `table` has this value in `column`.
    Unique {
        table: &'static str,
        column: &'static str,
    },
}

/// Ordered field rules. Fields are checked in insertion order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    fields: Vec<(&'static str, Vec<Rule>)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, rules: Vec<Rule>) -> Self {
        self.fields.push((name, rules));
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }
}

/// Answers [`Rule::Unique`] checks.
pub trait UniqueLookup {
    fn exists(&self, table: &str, column: &str, value: &str) -> Result<bool>;
}

impl<T: Transaction + ?Sized> UniqueLookup for T {
    fn exists(&self, table: &str, column: &str, value: &str) -> Result<bool> {
        self.has_value(table, column, value)
    }
}

/// Checks `input` against `rules`. An empty map means the input is valid.
///
/// A field that is absent and not required is skipped. A failed
/// [`Rule::Required`] stops the remaining rules of that field; other
/// failures accumulate.
pub fn validate<L>(input: &Map<String, Value>, rules: &RuleSet, lookup: &L) -> Result<FieldErrors>
where
    L: UniqueLookup + ?Sized,
{
    let mut errors = FieldErrors::new();

    for (field, field_rules) in rules.fields.iter() {
        let value = input.get(*field);
        let required = field_rules.contains(&Rule::Required);
        if value.is_none() && !required {
            continue;
        }

        let mut messages = Vec::new();
        for rule in field_rules.iter() {
            if let Some(msg) = check_rule(field, value, rule, lookup)? {
                messages.push(msg);
                if *rule == Rule::Required {
                    break;
                }
            }
        }

        if !messages.is_empty() {
            errors.insert(field.to_string(), messages);
        }
    }

    Ok(errors)
}

fn check_rule<L>(field: &str, value: Option<&Value>, rule: &Rule, lookup: &L) -> Result<Option<String>>
where
    L: UniqueLookup + ?Sized,
{
    let msg = match rule {
        Rule::Required => {
            if is_present(value) {
                None
            } else {
                Some(format!("The {field} field is required."))
            }
        }
        // Blank strings count as null.
        Rule::String => match value {
            Some(Value::String(s)) if !s.trim().is_empty() => None,
            _ => Some(format!("The {field} must be a string.")),
        },
        Rule::Email => match value {
            Some(Value::String(s)) if EMAIL_REGEX.is_match(s) => None,
            _ => Some(format!("The {field} must be a valid email address.")),
        },
        Rule::In(allowed) => match value {
            Some(Value::String(s)) if allowed.contains(&s.as_str()) => None,
            _ => Some(format!("The selected {field} is invalid.")),
        },
        Rule::Unique { table, column } => match value {
            Some(Value::String(s)) if lookup.exists(table, column, s)? => {
                Some(format!("The {field} has already been taken."))
            }
            _ => None,
        },
    };
    Ok(msg)
}

fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;

    struct MockLookup {
        taken: HashSet<String>,
    }

    impl MockLookup {
        fn new(taken: &[&str]) -> Self {
            Self {
                taken: taken.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    impl UniqueLookup for MockLookup {
        fn exists(&self, table: &str, column: &str, value: &str) -> Result<bool> {
            assert_eq!(table, "users");
            assert_eq!(column, "email");
            Ok(self.taken.contains(value))
        }
    }

    fn to_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expect object"),
        }
    }

    fn create_rules() -> RuleSet {
        RuleSet::new()
            .field("names", vec![Rule::Required, Rule::String])
            .field(
                "email",
                vec![
                    Rule::Required,
                    Rule::Email,
                    Rule::Unique {
                        table: "users",
                        column: "email",
                    },
                ],
            )
            .field("role", vec![Rule::Required, Rule::In(&["ADMIN", "MANAGER"])])
    }

    #[test]
    fn test_valid() {
        let input = to_map(json!({
            "names": "Ana",
            "email": "ana@x.com",
            "role": "ADMIN",
            "ignored": 123,
        }));
        let errors = validate(&input, &create_rules(), &MockLookup::new(&[])).unwrap();
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_required() {
        let input = to_map(json!({
            "names": "  ",
            "email": null,
        }));
        let errors = validate(&input, &create_rules(), &MockLookup::new(&[])).unwrap();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors["names"], vec!["The names field is required."]);
        assert_eq!(errors["email"], vec!["The email field is required."]);
        assert_eq!(errors["role"], vec!["The role field is required."]);
    }

    #[test]
    fn test_messages() {
        let input = to_map(json!({
            "names": 12,
            "email": "not-an-email",
            "role": "admin",
        }));
        let errors = validate(&input, &create_rules(), &MockLookup::new(&[])).unwrap();
        assert_eq!(errors["names"], vec!["The names must be a string."]);
        assert_eq!(
            errors["email"],
            vec!["The email must be a valid email address."]
        );
        assert_eq!(errors["role"], vec!["The selected role is invalid."]);
    }

    #[test]
    fn test_unique() {
        let input = to_map(json!({
            "names": "Ana",
            "email": "ana@x.com",
            "role": "MANAGER",
        }));
        let errors = validate(&input, &create_rules(), &MockLookup::new(&["ana@x.com"])).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["email"], vec!["The email has already been taken."]);
    }

    #[test]
    fn test_optional_absent() {
        let rules = RuleSet::new()
            .field("names", vec![Rule::String])
            .field("role", vec![Rule::In(&["ADMIN", "MANAGER"])]);

        let errors = validate(&Map::new(), &rules, &MockLookup::new(&[])).unwrap();
        assert!(errors.is_empty());

        let input = to_map(json!({ "names": null, "role": "MANAGER" }));
        let errors = validate(&input, &rules, &MockLookup::new(&[])).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["names"], vec!["The names must be a string."]);

        let input = to_map(json!({ "names": " " }));
        let errors = validate(&input, &rules, &MockLookup::new(&[])).unwrap();
        assert_eq!(errors["names"], vec!["The names must be a string."]);
    }

    #[test]
    fn test_email_format() {
        for email in ["ana@x.com", "a.b+c@sub.example.org", "root@localhost"] {
            assert!(EMAIL_REGEX.is_match(email), "{email}");
        }
        for email in ["", "ana", "ana@", "@x.com", "ana @x.com", "ana@x..com"] {
            assert!(!EMAIL_REGEX.is_match(email), "{email}");
        }
    }

    #[test]
    fn test_rule_set_order() {
        let fields: Vec<_> = create_rules().fields().collect();
        assert_eq!(fields, vec!["names", "email", "role"]);
    }
}
