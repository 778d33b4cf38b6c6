pub mod admin;
pub mod approve;
pub mod execute;
pub mod initialize_project;
pub mod propose;

pub use admin::*;
pub use approve::*;
pub use execute::*;
pub use initialize_project::*;
pub use propose::*;
