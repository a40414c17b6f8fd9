pub mod errors;
pub mod db;
pub mod validators;
pub mod county;
pub mod district;
pub mod school;
pub mod profile;
