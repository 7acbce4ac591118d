//! Password hashing and strength policy.

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "12345678",
    "123456789",
    "1234567890",
    "qwerty123",
    "qwertyuiop",
    "iloveyou",
    "sunshine",
    "princess",
    "football",
    "baseball",
    "welcome1",
    "admin123",
    "letmein1",
    "trustno1",
    "superman",
    "starwars",
    "dragon123",
    "passw0rd",
    "abc12345",
    "contraseña",
    "contrasena",
    "changeme",
];

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to verify password: {}", e)))
}

/// Checks `password` against the strength policy.
///
/// `attributes` are user attributes (username, email) the password must not
/// resemble. For emails only the local part is compared. Returns every
/// failed rule as a message.
pub fn validate_password_strength(password: &str, attributes: &[&str]) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        problems.push(format!(
            "This password is too short. It must contain at least {} characters.",
            MIN_PASSWORD_LENGTH
        ));
    }

    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        problems.push("This password is entirely numeric.".to_string());
    }

    let lowered = password.to_lowercase();
    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        problems.push("This password is too common.".to_string());
    }

    if let Some(attribute) = attributes
        .iter()
        .map(|a| a.split('@').next().unwrap_or_default().to_lowercase())
        .find(|a| is_too_similar(&lowered, a))
    {
        problems.push(format!("The password is too similar to \"{}\".", attribute));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

fn is_too_similar(password: &str, attribute: &str) -> bool {
    if attribute.chars().count() < 3 || password.is_empty() {
        return false;
    }
    password.contains(attribute) || attribute.contains(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("Str0ngPassw0rd!").unwrap();
        assert_ne!(hashed, "Str0ngPassw0rd!");
        assert!(verify_password("Str0ngPassw0rd!", &hashed).unwrap());
        assert!(!verify_password("wrong", &hashed).unwrap());
    }

    #[test]
    fn test_strong_password_passes() {
        assert!(
            validate_password_strength("Tr1cky-Garden-42", &["maria", "maria@example.com"]).is_ok()
        );
    }

    #[test]
    fn test_short_password_rejected() {
        let problems = validate_password_strength("ab1!", &[]).unwrap_err();
        assert!(problems[0].contains("too short"));
    }

    #[test]
    fn test_numeric_password_rejected() {
        let problems = validate_password_strength("90817263", &[]).unwrap_err();
        assert!(problems.iter().any(|p| p.contains("entirely numeric")));
    }

    #[test]
    fn test_common_password_rejected() {
        let problems = validate_password_strength("Password123", &[]).unwrap_err();
        assert!(problems.iter().any(|p| p.contains("too common")));
    }

    #[test]
    fn test_password_similar_to_username_rejected() {
        let problems =
            validate_password_strength("carlosgarcia", &["carlosgarcia", "cg@example.com"])
                .unwrap_err();
        assert!(problems.iter().any(|p| p.contains("too similar")));
    }

    #[test]
    fn test_email_domain_is_ignored() {
        assert!(validate_password_strength("example-river-77", &["ana@example.com"]).is_ok());
    }

    #[test]
    fn test_short_attributes_ignored() {
        assert!(validate_password_strength("Tr1cky-Garden-42", &["tr"]).is_ok());
    }
}
