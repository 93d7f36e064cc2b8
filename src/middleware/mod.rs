/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: handler 単位の認可 layer / http: 全ルート共通の layer
 */
pub mod auth;
pub mod http;
