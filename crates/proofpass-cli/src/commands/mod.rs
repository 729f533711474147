pub mod credential;
pub mod proof;
pub mod status;
