pub mod bootstrap_request;
pub mod settings;
pub mod vcs_info;
