pub mod guards;
pub mod lifecycle;
pub mod payload;
pub mod roles;
pub mod verify;

pub use payload::{
    AccessTokenPayload, ClientAccessTokenPayload, RefreshTokenPayload, ServiceAccessTokenPayload,
    TokenBearer, TokenType,
};
pub use roles::{ClientPermissions, Role, RoleError, ServicePermissions, client_role, service_role};
pub use verify::{NEGATIVE_VERDICT, verification_cache_key};
