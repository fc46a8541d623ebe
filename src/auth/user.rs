use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Role;

/// The authenticated actor attached to a request, decoded from the bearer
/// token. Carries only what the policy needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub roles: Vec<String>,
}

impl User {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self {
            id,
            roles: vec![role.name()],
        }
    }

    pub fn from_role_name(id: Uuid, role: String) -> Self {
        Self {
            id,
            roles: vec![role],
        }
    }

    pub fn is_admin(&self) -> bool {
        self.has_role("admin".into())
    }

    pub fn is_driver(&self) -> bool {
        self.has_role("driver".into())
    }

    pub fn has_role(&self, role: String) -> bool {
        self.roles.iter().any(|x| x == &role)
    }

    fn id_equals_nullable_id(&self, optional_id: Option<Uuid>) -> bool {
        if let Some(id) = optional_id {
            if self.id == id {
                return true;
            }
        }

        false
    }
}

impl PolarClass for User {
    fn get_polar_class_builder() -> oso::ClassBuilder<User> {
        oso::Class::builder()
            .name("User")
            .add_attribute_getter("id", |recv: &User| recv.id.clone())
            .add_attribute_getter("roles", |recv: &User| recv.roles.clone())
            .add_method("id_equals_nullable_id", User::id_equals_nullable_id)
            .add_method("has_role", User::has_role)
    }

    fn get_polar_class() -> oso::Class {
        let builder = User::get_polar_class_builder();
        builder.build()
    }
}
