/// Version control backend table
pub mod registry;

pub use registry::VcsRegistry;
