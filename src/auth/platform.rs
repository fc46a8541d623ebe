use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stand-in resource for operations that are not scoped to a single record,
/// such as creating a rental or listing the driver jobs feed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Platform {
    id: Uuid,
}

impl Platform {
    pub fn default() -> Self {
        Self { id: Uuid::nil() }
    }
}

impl PolarClass for Platform {
    fn get_polar_class_builder() -> oso::ClassBuilder<Platform> {
        oso::Class::builder()
            .name("Platform")
            .add_attribute_getter("id", |recv: &Platform| recv.id.clone())
            .add_class_method("default", Platform::default)
    }

    fn get_polar_class() -> oso::Class {
        let builder = Platform::get_polar_class_builder();
        builder.build()
    }
}
