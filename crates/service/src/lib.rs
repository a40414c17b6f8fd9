//! Service layer providing business-oriented operations on top of models.
//! - Separates authorization and validation from data access.
//! - Reuses validators and entity definitions in the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod auth;
pub mod errors;
pub mod pagination;
pub mod profile_service;
pub mod query_service;
#[cfg(test)]
pub mod test_support;
