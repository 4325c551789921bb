/// Domain layer: identifiers, capability entries, requests and settings
pub mod entities;
pub mod value_objects;
