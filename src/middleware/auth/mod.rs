/*
 * Responsibility
 * - access: Bearer token → principal (AuthCtx)。拒否はしない
 * - authorize: principal + AccessPolicy → 通過 / 401 / 403
 */
pub mod access;
pub mod authorize;

pub use access::Authenticator;
