use crate::constants::LOGIN_ENV_VAR;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("login name is empty")]
    EmptyLogin,
    #[error("bucket name '{name}' must be between 3 and 63 characters long")]
    Length { name: String },
    #[error("bucket name '{name}' contains '{found}'; only lowercase letters, digits, '-' and '.' are allowed")]
    InvalidCharacter { name: String, found: char },
    #[error("bucket name '{name}' must start and end with a lowercase letter or digit")]
    Boundary { name: String },
    #[error("bucket name '{name}' must not contain '..'")]
    ConsecutiveDots { name: String },
}

/// Name of the per-user storage bucket.
///
/// Built from the login name and a fixed suffix, with everything up to and including the first
/// delimiter removed, so `workshop-alice` becomes `alice-sql-workshop`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceName(String);

impl ResourceName {
    pub fn derive(login: &str, suffix: &str, delimiter: char) -> Result<Self, NameError> {
        let login = login.trim();
        if login.is_empty() {
            return Err(NameError::EmptyLogin);
        }

        let combined = format!("{}{}", login, suffix);
        let name = strip_through_delimiter(&combined, delimiter);
        validate_bucket_name(name)?;
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name as a storage URI, e.g. `s3://sql-workshop`.
    pub fn uri(&self, scheme: &str) -> String {
        format!("{}://{}", scheme, self.0)
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Drops everything up to and including the first `delimiter`.
/// Input without the delimiter is returned whole.
pub fn strip_through_delimiter(input: &str, delimiter: char) -> &str {
    match input.split_once(delimiter) {
        Some((_, rest)) => rest,
        None => input,
    }
}

fn validate_bucket_name(name: &str) -> Result<(), NameError> {
    if !(3..=63).contains(&name.len()) {
        return Err(NameError::Length {
            name: name.to_string(),
        });
    }

    if let Some(found) = name
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '.'))
    {
        return Err(NameError::InvalidCharacter {
            name: name.to_string(),
            found,
        });
    }

    let alnum = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
    let starts = name.chars().next().is_some_and(alnum);
    let ends = name.chars().last().is_some_and(alnum);
    if !starts || !ends {
        return Err(NameError::Boundary {
            name: name.to_string(),
        });
    }

    if name.contains("..") {
        return Err(NameError::ConsecutiveDots {
            name: name.to_string(),
        });
    }

    Ok(())
}

/// Login name of the invoking user: `$USER` when set, otherwise what the OS reports.
pub fn current_login() -> String {
    match std::env::var(LOGIN_ENV_VAR) {
        Ok(user) if !user.trim().is_empty() => user,
        _ => {
            let user = whoami::username();
            tracing::debug!("{} is not set, using OS user name '{}'", LOGIN_ENV_VAR, user);
            user
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{BUCKET_NAME_DELIMITER, BUCKET_SUFFIX};
    use rstest::rstest;

    #[rstest]
    #[case("alice", "sql-workshop")]
    #[case("workshop-alice", "alice-sql-workshop")]
    #[case("jupyter-bob-smith", "bob-smith-sql-workshop")]
    #[case("  carol ", "sql-workshop")]
    fn derives_name_from_login(#[case] login: &str, #[case] expected: &str) {
        let name = ResourceName::derive(login, BUCKET_SUFFIX, BUCKET_NAME_DELIMITER).unwrap();
        assert_eq!(name.as_str(), expected);
    }

    #[rstest]
    #[case("alice-sql-workshop", '-', "sql-workshop")]
    #[case("no_delimiter", '-', "no_delimiter")]
    #[case("trailing-", '-', "")]
    #[case("a.b.c", '.', "b.c")]
    fn strips_through_first_delimiter(
        #[case] input: &str,
        #[case] delimiter: char,
        #[case] expected: &str,
    ) {
        assert_eq!(strip_through_delimiter(input, delimiter), expected);
    }

    #[test]
    fn uri_uses_scheme() {
        let name = ResourceName::derive("alice", "-sql-workshop", '-').unwrap();
        assert_eq!(name.uri("s3"), "s3://sql-workshop");
        assert_eq!(name.to_string(), "sql-workshop");
    }

    #[test]
    fn rejects_empty_login() {
        assert_eq!(
            ResourceName::derive("   ", BUCKET_SUFFIX, BUCKET_NAME_DELIMITER),
            Err(NameError::EmptyLogin)
        );
    }

    #[test]
    fn reports_invalid_names_instead_of_fixing_them() {
        let upper = ResourceName::derive("jupyter-Alice", BUCKET_SUFFIX, BUCKET_NAME_DELIMITER);
        assert_eq!(
            upper,
            Err(NameError::InvalidCharacter {
                name: "Alice-sql-workshop".to_string(),
                found: 'A'
            })
        );

        let short = ResourceName::derive("x", "-ab", '-');
        assert!(matches!(short, Err(NameError::Length { .. })));

        let boundary = ResourceName::derive("x", "--abc", '-');
        assert!(matches!(boundary, Err(NameError::Boundary { .. })));

        let dots = ResourceName::derive("x", "-a..b", '-');
        assert!(matches!(dots, Err(NameError::ConsecutiveDots { .. })));
    }
}
