//! Policy compilation and principal resolution
//!
//! A policy is compiled once from configuration. Every principal gets its
//! own shared [`AuthorizationResult`] (principal permissions first, then the
//! global ones), so resolving a client is a lookup, not a rebuild.

use crate::acl::{AuthorizationResult, TopicPermission};
use crate::config::{AuthzConfig, ClientIdentity, PermissionConfig, PrincipalConfig};
use crate::error::{ConfigError, Result};
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, warn};

/// Exact value and regex conditions on one identity field
///
/// Every condition that is set must hold.
#[derive(Debug)]
struct FieldCondition {
    exact: Option<String>,
    regex: Option<Regex>,
}

impl FieldCondition {
    fn compile(principal: &str, exact: Option<&str>, pattern: Option<&str>) -> Result<Self> {
        let regex = pattern
            .map(Regex::new)
            .transpose()
            .map_err(|source| ConfigError::InvalidRegex {
                principal: principal.to_string(),
                source,
            })?;

        Ok(Self {
            exact: exact.map(str::to_string),
            regex,
        })
    }

    fn is_unconditional(&self) -> bool {
        self.exact.is_none() && self.regex.is_none()
    }

    fn matches(&self, value: Option<&str>) -> bool {
        if self.is_unconditional() {
            return true;
        }

        let value = match value {
            Some(value) => value,
            None => return false,
        };

        if let Some(ref exact) = self.exact {
            if exact != value {
                return false;
            }
        }

        if let Some(ref regex) = self.regex {
            if !regex.is_match(value) {
                return false;
            }
        }

        true
    }
}

/// Compiled principal for efficient matching
#[derive(Debug)]
struct CompiledPrincipal {
    name: String,
    username: FieldCondition,
    client_id: FieldCondition,
    result: Arc<AuthorizationResult>,
}

impl CompiledPrincipal {
    fn from_config(principal: &PrincipalConfig, global: &AuthzConfig, shared: &[TopicPermission]) -> Result<Self> {
        let conditions = &principal.match_conditions;
        let username = FieldCondition::compile(
            &principal.name,
            conditions.username.as_deref(),
            conditions.username_regex.as_deref(),
        )?;
        let client_id = FieldCondition::compile(
            &principal.name,
            conditions.client_id.as_deref(),
            conditions.client_id_regex.as_deref(),
        )?;

        let mut permissions = compile_permissions(&principal.permissions)?;
        permissions.extend_from_slice(shared);

        let default_behaviour = principal
            .default_behaviour
            .unwrap_or(global.default_behaviour);
        let result = AuthorizationResult::new(permissions, default_behaviour);
        warn_shadowed(&principal.name, &result);

        Ok(Self {
            name: principal.name.clone(),
            username,
            client_id,
            result: Arc::new(result),
        })
    }

    /// Check if this principal matches the client identity
    fn matches(&self, identity: &ClientIdentity) -> bool {
        self.username.matches(identity.username.as_deref())
            && self.client_id.matches(Some(&identity.client_id))
    }
}

/// Compiled authorization policy
#[derive(Debug)]
pub struct Policy {
    principals: Vec<CompiledPrincipal>,
    global: Arc<AuthorizationResult>,
}

impl Policy {
    /// Compile a policy from configuration
    ///
    /// Fails on the first invalid topic pattern or regex.
    pub fn from_config(config: &AuthzConfig) -> Result<Self> {
        let shared = compile_permissions(&config.permissions)?;

        let mut principals = Vec::with_capacity(config.principals.len());
        for principal in &config.principals {
            match CompiledPrincipal::from_config(principal, config, &shared) {
                Ok(compiled) => principals.push(compiled),
                Err(e) => {
                    warn!(principal = %principal.name, error = %e, "Failed to compile principal");
                    return Err(e);
                }
            }
        }

        let global = AuthorizationResult::new(shared, config.default_behaviour);
        warn_shadowed("global", &global);

        debug!(
            principals = principals.len(),
            global_rules = global.permissions().len(),
            "Compiled authorization policy"
        );

        Ok(Self {
            principals,
            global: Arc::new(global),
        })
    }

    /// Authorization result for a client
    ///
    /// The first principal (in configuration order) whose conditions match
    /// wins; clients matching none get the global rule set.
    pub fn resolve(&self, identity: &ClientIdentity) -> Arc<AuthorizationResult> {
        match self.principal_for(identity) {
            Some(principal) => Arc::clone(&principal.result),
            None => Arc::clone(&self.global),
        }
    }

    /// Name of the principal a client resolves to, if any
    pub fn principal_name(&self, identity: &ClientIdentity) -> Option<&str> {
        self.principal_for(identity).map(|p| p.name.as_str())
    }

    pub fn principal_count(&self) -> usize {
        self.principals.len()
    }

    fn principal_for(&self, identity: &ClientIdentity) -> Option<&CompiledPrincipal> {
        self.principals.iter().find(|p| p.matches(identity))
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            principals: Vec::new(),
            global: Arc::new(AuthorizationResult::default()),
        }
    }
}

fn compile_permissions(configs: &[PermissionConfig]) -> Result<Vec<TopicPermission>> {
    configs.iter().map(TopicPermission::from_config).collect()
}

fn warn_shadowed(owner: &str, result: &AuthorizationResult) {
    for (rule, by) in result.shadowed() {
        warn!(
            owner = %owner,
            rule,
            shadowed_by = by,
            pattern = %result.permissions()[rule].filter(),
            "Topic permission can never decide, an earlier permission covers it"
        );
    }
}
