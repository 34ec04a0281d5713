use crate::gateway::domain::{DeviceEntry, PlatformEntry, Registration, ResourceEntry};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// One registration per live simulator process, keyed by device id. That
/// keying is what keeps the discovery endpoints at exactly one
/// device/platform/resource entry per process.
#[derive(Debug, Default)]
pub struct Registry {
    devices: HashMap<Uuid, Registration>,
}

impl Registry {
    pub fn new() -> Self {
        Registry { devices: HashMap::new() }
    }

    pub fn register(&mut self, registration: Registration) -> Result<(), RegistryError> {
        if self.devices.contains_key(&registration.di) {
            return Err(RegistryError::AlreadyRegistered { di: registration.di });
        }

        self.devices.insert(registration.di, registration);
        Ok(())
    }

    pub fn unregister(&mut self, di: &Uuid) -> Option<Registration> {
        self.devices.remove(di)
    }

    /// Resolves a resource path to its owning registration. Without a `di`
    /// the path must match exactly one registration; several processes may
    /// serve the same path under different device ids.
    pub fn find(&self, href: &str, di: Option<Uuid>) -> Result<&Registration, LookupError> {
        if let Some(di) = di {
            return self
                .devices
                .get(&di)
                .filter(|registration| registration.profile.resource.resource_path == href)
                .ok_or_else(|| LookupError::NotFound { href: href.to_string() });
        }

        let mut matches = self.devices.values().filter(|registration| registration.profile.resource.resource_path == href);
        match (matches.next(), matches.next()) {
            (Some(registration), None) => Ok(registration),
            (Some(_), Some(_)) => Err(LookupError::AmbiguousPath { href: href.to_string() }),
            (None, _) => Err(LookupError::NotFound { href: href.to_string() }),
        }
    }

    pub fn device_entries(&self) -> Vec<DeviceEntry> {
        self.devices.values().map(DeviceEntry::from).collect()
    }

    pub fn platform_entries(&self) -> Vec<PlatformEntry> {
        self.devices.values().map(PlatformEntry::from).collect()
    }

    pub fn resource_entries(&self) -> Vec<ResourceEntry> {
        self.devices.values().map(ResourceEntry::from).collect()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum RegistryError {
    #[error("device '{di}' is already registered")]
    AlreadyRegistered { di: Uuid },
}

#[derive(Error, Debug, PartialEq)]
pub enum LookupError {
    #[error("no registered resource matches '{href}'")]
    NotFound { href: String },
    #[error("several registered resources match '{href}', a device id is required")]
    AmbiguousPath { href: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registration(di: Uuid, href: &str) -> Registration {
        let mut registration: Registration = serde_json::from_str(include_str!("../../tests/resources/register_led.json")).unwrap();
        registration.di = di;
        registration.pi = Uuid::new_v4();
        registration.profile.resource.resource_path = href.to_string();
        registration
    }

    #[test]
    fn registering_twice_under_the_same_di_is_rejected() {
        let di = Uuid::new_v4();
        let mut registry = Registry::new();

        assert_eq!(registry.register(registration(di, "/a/led")), Ok(()));
        assert_eq!(registry.register(registration(di, "/a/led")), Err(RegistryError::AlreadyRegistered { di }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregistering_removes_the_single_entry() {
        let di = Uuid::new_v4();
        let mut registry = Registry::new();
        registry.register(registration(di, "/a/led")).unwrap();

        let removed = registry.unregister(&di);

        assert_eq!(removed.map(|r| r.di), Some(di));
        assert!(registry.is_empty());
        assert!(registry.unregister(&di).is_none());
    }

    #[test]
    fn one_entry_per_registration_in_every_view() {
        let mut registry = Registry::new();
        registry.register(registration(Uuid::new_v4(), "/a/led")).unwrap();
        registry.register(registration(Uuid::new_v4(), "/a/gas")).unwrap();

        assert_eq!(registry.device_entries().len(), 2);
        assert_eq!(registry.platform_entries().len(), 2);
        assert_eq!(registry.resource_entries().len(), 2);
    }

    #[test]
    fn find_resolves_an_unambiguous_path_without_a_di() {
        let di = Uuid::new_v4();
        let mut registry = Registry::new();
        registry.register(registration(di, "/a/led")).unwrap();

        assert_eq!(registry.find("/a/led", None).map(|r| r.di), Ok(di));
    }

    #[test]
    fn find_requires_a_di_when_the_path_is_ambiguous() {
        let mut registry = Registry::new();
        let first = Uuid::new_v4();
        registry.register(registration(first, "/a/led")).unwrap();
        registry.register(registration(Uuid::new_v4(), "/a/led")).unwrap();

        assert_eq!(
            registry.find("/a/led", None),
            Err(LookupError::AmbiguousPath { href: "/a/led".to_string() })
        );
        assert_eq!(registry.find("/a/led", Some(first)).map(|r| r.di), Ok(first));
    }

    #[test]
    fn find_rejects_a_di_registered_under_another_path() {
        let di = Uuid::new_v4();
        let mut registry = Registry::new();
        registry.register(registration(di, "/a/led")).unwrap();

        assert_eq!(
            registry.find("/a/gas", Some(di)),
            Err(LookupError::NotFound { href: "/a/gas".to_string() })
        );
    }
}
