//! Permission kinds, grant results, and the request contract.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;

/// Permissions that can be requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Contacts,
    Storage,
    Calendar,
    Camera,
}

impl Permission {
    /// Every permission, in the order they are requested.
    pub const ALL: [Permission; 4] = [
        Permission::Contacts,
        Permission::Storage,
        Permission::Calendar,
        Permission::Camera,
    ];

    /// Snapshot key holding this permission's grant state.
    pub fn fact_key(self) -> &'static str {
        match self {
            Permission::Contacts => "contacts_permission_granted",
            Permission::Storage => "storage_permission_granted",
            Permission::Calendar => "calendar_permission_granted",
            Permission::Camera => "camera_permission_granted",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Permission::Contacts => "Contacts",
            Permission::Storage => "Storage",
            Permission::Calendar => "Calendar",
            Permission::Camera => "Camera",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one permission request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionGrants {
    requested: Vec<Permission>,
    granted: BTreeMap<Permission, bool>,
}

impl PermissionGrants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the answer for one permission. Repeated answers overwrite.
    pub fn record(&mut self, permission: Permission, granted: bool) {
        if !self.requested.contains(&permission) {
            self.requested.push(permission);
        }
        self.granted.insert(permission, granted);
    }

    pub fn is_granted(&self, permission: Permission) -> bool {
        self.granted.get(&permission).copied().unwrap_or(false)
    }

    /// Answers in the order the permissions were recorded.
    pub fn iter(&self) -> impl Iterator<Item = (Permission, bool)> + '_ {
        self.requested.iter().map(|p| (*p, self.is_granted(*p)))
    }

    pub fn denied(&self) -> Vec<Permission> {
        self.iter()
            .filter(|(_, granted)| !granted)
            .map(|(p, _)| p)
            .collect()
    }

    /// One notice per denied permission, e.g. `Camera permission is required`.
    pub fn denial_notices(&self) -> Vec<String> {
        self.denied()
            .into_iter()
            .map(|p| format!("{} permission is required", p.label()))
            .collect()
    }
}

/// Host permission subsystem.
///
/// Requests complete asynchronously; the caller feeds the resulting grants to
/// [`FactProvider::apply_grants`](crate::FactProvider::apply_grants) so that
/// the next captured snapshot reflects them.
pub trait PermissionRequester: Send + Sync {
    fn request(
        &self,
        permissions: &[Permission],
    ) -> impl Future<Output = PermissionGrants> + Send;
}

/// Answers every request from a fixed set of granted permissions.
#[derive(Debug, Clone, Default)]
pub struct PresetRequester {
    granted: BTreeSet<Permission>,
}

impl PresetRequester {
    pub fn new(granted: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            granted: granted.into_iter().collect(),
        }
    }
}

impl PermissionRequester for PresetRequester {
    async fn request(&self, permissions: &[Permission]) -> PermissionGrants {
        let mut grants = PermissionGrants::new();
        for permission in permissions {
            grants.record(*permission, self.granted.contains(permission));
        }
        grants
    }
}
