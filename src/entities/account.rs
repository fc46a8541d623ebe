use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// A registered identity on the platform. The bcrypt password hash lives in
/// its own column and never enters this document or any response body.
#[derive(Clone, Debug, Serialize, Deserialize, PolarClass)]
pub struct Account {
    #[polar(attribute)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub rating: Option<f64>,
    pub avatar: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Driver,
    Customer,
}

impl Role {
    pub fn name(&self) -> String {
        match self {
            Self::Admin => "admin".into(),
            Self::Driver => "driver".into(),
            Self::Customer => "customer".into(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub rating: Option<f64>,
    pub avatar: Option<String>,
    pub role: Option<Role>,
}

impl Account {
    pub fn new(name: String, email: String, role: Role) -> Result<Self, Error> {
        if name.trim().is_empty() {
            return Err(Error::validation("name is required"));
        }

        if email.trim().is_empty() || !email.contains('@') {
            return Err(Error::validation("a valid email is required"));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            email,
            role,
            rating: None,
            avatar: None,
        })
    }

    /// Role changes are stripped by the engine unless the caller is an
    /// admin; by the time a patch reaches here it is fully authorized.
    pub fn apply(&mut self, patch: AccountPatch) -> Result<(), Error> {
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(Error::validation("name is required"));
            }
            self.name = name;
        }

        if let Some(email) = patch.email {
            if email.trim().is_empty() || !email.contains('@') {
                return Err(Error::validation("a valid email is required"));
            }
            self.email = email;
        }

        if let Some(rating) = patch.rating {
            self.rating = Some(rating);
        }

        if let Some(avatar) = patch.avatar {
            self.avatar = Some(avatar);
        }

        if let Some(role) = patch.role {
            self.role = role;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_account_validates_fields() {
        assert!(Account::new("Anika".into(), "anika@example.com".into(), Role::Customer).is_ok());
        assert!(matches!(
            Account::new("".into(), "anika@example.com".into(), Role::Customer),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            Account::new("Anika".into(), "not-an-email".into(), Role::Customer),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn apply_patches_profile() {
        let mut account =
            Account::new("Anika".into(), "anika@example.com".into(), Role::Driver).unwrap();

        account
            .apply(AccountPatch {
                rating: Some(4.8),
                avatar: Some("https://example.com/a.png".into()),
                ..AccountPatch::default()
            })
            .unwrap();

        assert_eq!(account.rating, Some(4.8));
        assert_eq!(account.role, Role::Driver);
    }
}
