use anyhow::Context;
use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHasher, Version};
use secrecy::{ExposeSecret, Secret};

/// Administrator password for a new list. Only its hash is ever stored.
#[derive(Clone, Debug)]
pub struct ListPassword(Secret<String>);

impl ListPassword {
    pub fn parse(password: Option<Secret<String>>) -> Result<ListPassword, String> {
        match password {
            Some(password) if !password.expose_secret().is_empty() => Ok(Self(password)),
            _ => Err(String::from("A list password is required.")),
        }
    }

    pub fn hash(&self) -> Result<String, anyhow::Error> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let params = Params::new(15000, 2, 1, None)
            .map_err(|e| anyhow::anyhow!(e))
            .context("Invalid Argon2 parameters.")?;
        let password_hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password(self.0.expose_secret().as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!(e))
            .context("Failed to hash the list password.")?
            .to_string();

        Ok(password_hash)
    }

    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}
