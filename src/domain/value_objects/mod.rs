pub mod vcs_kind;
