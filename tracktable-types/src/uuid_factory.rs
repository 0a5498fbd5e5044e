//! Process-wide UUID generation for trajectories.
//!
//! Trajectories pick up a fresh UUID at construction. The generator behind
//! that is a process-wide service so embedders can swap in a deterministic
//! scheme (fixtures, replay) without threading a generator through every
//! call site.

use std::sync::{Arc, LazyLock, RwLock};
use uuid::Uuid;

/// Source of trajectory UUIDs.
pub trait UuidGenerator: Send + Sync {
    /// Produces the next identifier.
    fn generate(&self) -> Uuid;
}

/// The default generator: cryptographically strong random version-4 UUIDs.
#[derive(Debug, Default)]
pub struct RandomUuidGenerator;

impl UuidGenerator for RandomUuidGenerator {
    fn generate(&self) -> Uuid {
        Uuid::new_v4()
    }
}

static GENERATOR: LazyLock<RwLock<Arc<dyn UuidGenerator>>> =
    LazyLock::new(|| RwLock::new(Arc::new(RandomUuidGenerator)));

/// Installs `generator` as the process-wide UUID source.
pub fn set_uuid_generator(generator: Arc<dyn UuidGenerator>) {
    *GENERATOR.write().expect("uuid generator lock poisoned") = generator;
}

/// The currently installed UUID source.
pub fn uuid_generator() -> Arc<dyn UuidGenerator> {
    GENERATOR.read().expect("uuid generator lock poisoned").clone()
}

/// Produces a UUID from the installed generator.
pub fn new_uuid() -> Uuid {
    uuid_generator().generate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_generator_yields_distinct_v4() {
        let a = new_uuid();
        let b = new_uuid();
        assert_ne!(a, b);
        assert_eq!(a.get_version_num(), 4);
    }

    #[test]
    fn installed_generator_is_used() {
        struct Fixed;
        impl UuidGenerator for Fixed {
            fn generate(&self) -> Uuid {
                Uuid::from_u128(42)
            }
        }

        let previous = uuid_generator();
        set_uuid_generator(Arc::new(Fixed));
        assert_eq!(new_uuid(), Uuid::from_u128(42));
        set_uuid_generator(previous);
    }
}
