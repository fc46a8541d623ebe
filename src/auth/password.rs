use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::Error;

pub fn hash_password(password: &str) -> Result<String, Error> {
    Ok(hash(password, DEFAULT_COST)?)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, Error> {
    Ok(verify(password, password_hash)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hashed = hash_password("correct horse battery staple").unwrap();

        assert!(verify_password("correct horse battery staple", &hashed).unwrap());
        assert!(!verify_password("wrong password", &hashed).unwrap());
    }
}
