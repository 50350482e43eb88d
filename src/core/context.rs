//! The run context shared by every component.

use std::collections::HashMap;

use tracing::info;

use crate::config::{BotIdentity, MigrationConfig};
use crate::core::identity::IdentityMap;
use crate::core::warning::{MigrationWarning, WarningLog};
use crate::error::Result;
use crate::models::{SourceUser, TargetUser};

/// Everything a run reads but never mutates: configuration, both user
/// directories and the resolved identity map.
///
/// Built once per invocation and passed by reference to each component.
#[derive(Debug, Clone)]
pub struct MigrationContext {
    config: MigrationConfig,
    source_users: HashMap<String, SourceUser>,
    target_users: Vec<TargetUser>,
    identities: IdentityMap,
}

impl MigrationContext {
    /// Validates the configuration and resolves identities.
    pub fn new(
        config: MigrationConfig,
        source_users: Vec<SourceUser>,
        target_users: Vec<TargetUser>,
    ) -> Result<Self> {
        config.validate()?;
        let identities = IdentityMap::resolve(&source_users, &target_users);
        info!(
            resolved = identities.len(),
            unresolved = identities.unresolved().len(),
            "resolved source users"
        );

        let source_users = source_users
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();

        Ok(Self {
            config,
            source_users,
            target_users,
            identities,
        })
    }

    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    pub fn bot(&self) -> &BotIdentity {
        &self.config.bot
    }

    pub fn identities(&self) -> &IdentityMap {
        &self.identities
    }

    pub fn source_user(&self, id: &str) -> Option<&SourceUser> {
        self.source_users.get(id)
    }

    pub fn target_users(&self) -> &[TargetUser] {
        &self.target_users
    }

    /// Records one warning per source user left without a target account.
    pub fn report_unresolved(&self, warnings: &mut WarningLog) {
        for id in self.identities.unresolved() {
            let nick = self
                .source_user(id)
                .map(|u| u.display_nick.clone())
                .unwrap_or_default();
            warnings.push(MigrationWarning::UnresolvedUser {
                source_id: id.clone(),
                nick,
            });
        }
    }
}
