//! Policy service.

use crate::models::{AccessPolicy, CreateAccessPolicyRequest, UpdateAccessPolicyRequest};
use crate::rules::{AccessRule, CreateAccessRuleRequest, RulePlacement, UpdateAccessRuleRequest};
use crate::Result;
use fmc_core::ids::{PolicyId, RuleId};
use fmc_core::{FmcClient, ListParams};
use tracing::{debug, info};

const ACCESS_POLICIES: &str = "policy/accesspolicies";

/// Access to `policy/accesspolicies` under the selected domain.
#[derive(Debug, Clone)]
pub struct PolicyService {
    client: FmcClient,
}

impl PolicyService {
    /// Wrap an authenticated client.
    #[must_use]
    pub const fn new(client: FmcClient) -> Self {
        Self { client }
    }

    /// The underlying client.
    #[must_use]
    pub const fn client(&self) -> &FmcClient {
        &self.client
    }

    fn policy_path(&self, policy: &PolicyId) -> Result<String> {
        self.client
            .config_path(&format!("{ACCESS_POLICIES}/{policy}"))
    }

    fn rules_path(&self, policy: &PolicyId) -> Result<String> {
        self.client
            .config_path(&format!("{ACCESS_POLICIES}/{policy}/accessrules"))
    }

    /// List access policies. Set `params.name` to filter by exact name.
    pub async fn list_access_policies(&self, params: &ListParams) -> Result<Vec<AccessPolicy>> {
        let path = self.client.config_path(ACCESS_POLICIES)?;
        self.client.list_all(&path, params).await
    }

    /// The policy named `name`, if any.
    pub async fn find_access_policy(&self, name: &str) -> Result<Option<AccessPolicy>> {
        let policies = self
            .list_access_policies(&ListParams::default().with_name(name))
            .await?;
        Ok(policies.into_iter().find(|policy| policy.name == name))
    }

    /// Fetch one access policy.
    pub async fn get_access_policy(&self, policy: &PolicyId) -> Result<AccessPolicy> {
        let path = self.policy_path(policy)?;
        self.client.get(&path).await
    }

    /// Create an access policy.
    pub async fn create_access_policy(
        &self,
        request: &CreateAccessPolicyRequest,
    ) -> Result<AccessPolicy> {
        let path = self.client.config_path(ACCESS_POLICIES)?;
        let created: AccessPolicy = self.client.post(&path, request).await?;
        info!(policy = %created.id, name = %created.name, "created access policy");
        Ok(created)
    }

    /// Modify an access policy.
    pub async fn update_access_policy(
        &self,
        request: &UpdateAccessPolicyRequest,
    ) -> Result<AccessPolicy> {
        let path = self.policy_path(&request.id)?;
        self.client.put(&path, request).await
    }

    /// Delete an access policy. Returns the deleted record.
    pub async fn delete_access_policy(&self, policy: &PolicyId) -> Result<AccessPolicy> {
        let path = self.policy_path(policy)?;
        let deleted: AccessPolicy = self.client.delete(&path).await?;
        info!(policy = %policy, "deleted access policy");
        Ok(deleted)
    }

    /// List the rules of a policy, in evaluation order.
    pub async fn list_access_rules(
        &self,
        policy: &PolicyId,
        params: &ListParams,
    ) -> Result<Vec<AccessRule>> {
        let path = self.rules_path(policy)?;
        self.client.list_all(&path, params).await
    }

    /// Fetch one rule.
    pub async fn get_access_rule(&self, policy: &PolicyId, rule: &RuleId) -> Result<AccessRule> {
        let path = format!("{}/{rule}", self.rules_path(policy)?);
        self.client.get(&path).await
    }

    /// Create a rule at `placement`.
    pub async fn create_access_rule(
        &self,
        policy: &PolicyId,
        request: &CreateAccessRuleRequest,
        placement: &RulePlacement,
    ) -> Result<AccessRule> {
        let path = self.rules_path(policy)?;
        let created: AccessRule = self
            .client
            .post_with(&path, &placement.to_pairs(), request)
            .await?;
        debug!(policy = %policy, rule = %created.id, name = %created.name, "created access rule");
        Ok(created)
    }

    /// Modify a rule.
    pub async fn update_access_rule(
        &self,
        policy: &PolicyId,
        request: &UpdateAccessRuleRequest,
    ) -> Result<AccessRule> {
        let path = format!("{}/{}", self.rules_path(policy)?, request.id);
        self.client.put(&path, request).await
    }

    /// Delete a rule. Returns the deleted record.
    pub async fn delete_access_rule(&self, policy: &PolicyId, rule: &RuleId) -> Result<AccessRule> {
        let path = format!("{}/{rule}", self.rules_path(policy)?);
        self.client.delete(&path).await
    }
}
