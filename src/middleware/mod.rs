/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth (principal 付与 / policy 評価), cors, http (request-id / trace / limit / timeout)
 */
pub mod auth;
pub mod cors;
pub mod http;
