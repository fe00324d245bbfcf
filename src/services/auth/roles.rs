/*
 * Responsibility
 * - Service and client role universes (name -> permissions)
 * - Registries are frozen at first use; lookup by name fails with RoleError
 * - Roles travel on the wire as their name
 */
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::services::auth::payload::TokenBearer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServicePermissions {
    pub users_auth: bool,
    pub user_reg: bool,
    pub media_access: bool,
    pub forum_access: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientPermissions {
    pub create_lib: bool,
    pub create_ban: bool,
    pub use_chat: bool,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("no such {universe} role: {name}")]
pub struct RoleError {
    pub universe: &'static str,
    pub name: String,
}

/// A permission set belonging to one role universe.
pub trait Permissions: Copy + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Bearer whose tokens carry roles of this universe.
    const BEARER: TokenBearer;

    fn registry() -> &'static HashMap<&'static str, Role<Self>>;
}

/// A named, immutable permission set.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Role<P> {
    name: &'static str,
    permissions: P,
}

impl<P> Role<P> {
    pub const fn new(name: &'static str, permissions: P) -> Self {
        Self { name, permissions }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn permissions(&self) -> &P {
        &self.permissions
    }
}

impl<P: Permissions> Role<P> {
    pub fn lookup(name: &str) -> Result<Self, RoleError> {
        P::registry().get(name).copied().ok_or_else(|| RoleError {
            universe: P::BEARER.universe(),
            name: name.to_string(),
        })
    }
}

impl<P> fmt::Debug for Role<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl<P> fmt::Display for Role<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl<P> Serialize for Role<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

impl<'de, P: Permissions> Deserialize<'de> for Role<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Role::lookup(&name).map_err(de::Error::custom)
    }
}

pub mod service_roles {
    use super::{Role, ServicePermissions};

    pub const TEST: Role<ServicePermissions> = Role::new(
        "_TEST",
        ServicePermissions {
            users_auth: true,
            user_reg: true,
            media_access: true,
            forum_access: true,
        },
    );
    pub const MINIMUM: Role<ServicePermissions> = Role::new(
        "MINIMUM",
        ServicePermissions {
            users_auth: false,
            user_reg: false,
            media_access: false,
            forum_access: false,
        },
    );
    pub const SERVES_USERS: Role<ServicePermissions> = Role::new(
        "SERVES_USERS",
        ServicePermissions {
            users_auth: true,
            user_reg: true,
            media_access: true,
            forum_access: false,
        },
    );
    pub const MEDIA_ACCESS: Role<ServicePermissions> = Role::new(
        "MEDIA_ACCESS",
        ServicePermissions {
            users_auth: false,
            user_reg: false,
            media_access: true,
            forum_access: false,
        },
    );
    pub const PROXY: Role<ServicePermissions> = Role::new(
        "PROXY",
        ServicePermissions {
            users_auth: false,
            user_reg: true,
            media_access: true,
            forum_access: true,
        },
    );

    pub const ALL: [Role<ServicePermissions>; 5] =
        [TEST, MINIMUM, SERVES_USERS, MEDIA_ACCESS, PROXY];
}

pub mod client_roles {
    use super::{ClientPermissions, Role};

    pub const TEST: Role<ClientPermissions> = Role::new(
        "_TEST",
        ClientPermissions {
            create_lib: true,
            create_ban: true,
            use_chat: true,
        },
    );
    pub const MEMBER: Role<ClientPermissions> = Role::new(
        "MEMBER",
        ClientPermissions {
            create_lib: true,
            create_ban: false,
            use_chat: true,
        },
    );
    pub const ADMIN: Role<ClientPermissions> = Role::new(
        "ADMIN",
        ClientPermissions {
            create_lib: true,
            create_ban: true,
            use_chat: true,
        },
    );
    pub const OWNER: Role<ClientPermissions> = Role::new(
        "OWNER",
        ClientPermissions {
            create_lib: true,
            create_ban: true,
            use_chat: true,
        },
    );

    pub const ALL: [Role<ClientPermissions>; 4] = [TEST, MEMBER, ADMIN, OWNER];
}

static SERVICE_ROLES: LazyLock<HashMap<&'static str, Role<ServicePermissions>>> =
    LazyLock::new(|| {
        service_roles::ALL
            .into_iter()
            .map(|role| (role.name(), role))
            .collect()
    });

static CLIENT_ROLES: LazyLock<HashMap<&'static str, Role<ClientPermissions>>> =
    LazyLock::new(|| {
        client_roles::ALL
            .into_iter()
            .map(|role| (role.name(), role))
            .collect()
    });

impl Permissions for ServicePermissions {
    const BEARER: TokenBearer = TokenBearer::Service;

    fn registry() -> &'static HashMap<&'static str, Role<Self>> {
        &SERVICE_ROLES
    }
}

impl Permissions for ClientPermissions {
    const BEARER: TokenBearer = TokenBearer::Client;

    fn registry() -> &'static HashMap<&'static str, Role<Self>> {
        &CLIENT_ROLES
    }
}

pub fn service_role(name: &str) -> Result<Role<ServicePermissions>, RoleError> {
    Role::lookup(name)
}

pub fn client_role(name: &str) -> Result<Role<ClientPermissions>, RoleError> {
    Role::lookup(name)
}
