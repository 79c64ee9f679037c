//! Snapshot capture across registered sources.

use crate::{FactSource, Permission, PermissionGrants, Snapshot, UserInput, keys};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, warn};

/// Produces snapshots from a list of fact sources plus permission grant state.
#[derive(Default)]
pub struct FactProvider {
    sources: Vec<Box<dyn FactSource>>,
    grants: RwLock<BTreeMap<Permission, bool>>,
}

impl FactProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source. Sources are read in registration order, so a later
    /// source with the same key overrides an earlier one.
    pub fn with_source(mut self, source: impl FactSource + 'static) -> Self {
        self.add_source(source);
        self
    }

    pub fn add_source(&mut self, source: impl FactSource + 'static) {
        self.sources.push(Box::new(source));
    }

    /// Record the outcome of a permission request for subsequent captures.
    pub fn apply_grants(&self, grants: &PermissionGrants) {
        let mut state = self.grants.write().unwrap_or_else(PoisonError::into_inner);
        for (permission, granted) in grants.iter() {
            debug!(%permission, granted, "permission grant recorded");
            state.insert(permission, granted);
        }
    }

    pub fn is_granted(&self, permission: Permission) -> bool {
        self.grants
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&permission)
            .copied()
            .unwrap_or(false)
    }

    /// Capture a snapshot of every source.
    ///
    /// Never fails: a source that cannot be read, or whose required
    /// permission is not granted, contributes its fallback value, or nothing
    /// if it has none. The user input is recorded first, so a source keyed
    /// `password_input` overrides it like any other fact.
    pub fn capture(&self, input: &UserInput) -> Snapshot {
        let mut builder = Snapshot::builder();

        for permission in Permission::ALL {
            builder.insert(permission.fact_key(), self.is_granted(permission));
        }
        builder.insert(keys::PASSWORD_INPUT, input.0.clone());

        for source in &self.sources {
            let denied = source
                .required_permission()
                .filter(|p| !self.is_granted(*p));
            if let Some(permission) = denied {
                debug!(key = source.key(), %permission, "permission not granted, using fallback");
                if let Some(value) = source.fallback() {
                    builder.insert(source.key(), value);
                }
                continue;
            }

            match source.read() {
                Ok(value) => {
                    debug!(key = source.key(), %value, "fact captured");
                    builder.insert(source.key(), value);
                }
                Err(e) => match source.fallback() {
                    Some(value) => {
                        warn!(
                            key = source.key(),
                            error = %e,
                            %value,
                            "source unavailable, using fallback"
                        );
                        builder.insert(source.key(), value);
                    }
                    None => {
                        warn!(key = source.key(), error = %e, "source unavailable, fact omitted");
                    }
                },
            }
        }

        builder.build()
    }
}
