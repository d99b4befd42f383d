//! User tools
//!
//! `KafkaUser` resources are reconciled by the User Operator, which writes
//! the generated credentials into a Secret named after the user.

use super::common::{
    age, cluster_of, conditions_json, metadata_json, not_found, required, DescribeTool,
    ListTool, Summarize, DESCRIBE_SCHEMA,
};
use super::ToolContext;
use crate::args::CallArguments;
use crate::registry::ToolFactory;
use crate::server::{McpServerError, McpServerResult, Tool};
use crate::types::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use kube::ResourceExt;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use strimzi_resources::{
    labels, HasConditions, KafkaUser, KafkaUserAuthentication, KafkaUserSpec, Repository, Secret,
};
use tracing::{info, instrument};

/// Authentication types the User Operator accepts.
const AUTHENTICATION_TYPES: &[&str] = &["tls", "tls-external", "scram-sha-512"];

impl Summarize for KafkaUser {
    fn summary_line(&self) -> String {
        format!(
            "{} (cluster: {}, authentication: {}, status: {}, age: {})",
            self.name_any(),
            cluster_of(self),
            self.authentication_type().unwrap_or("none"),
            self.readiness().label(),
            age(&self.metadata)
        )
    }

    fn details(&self) -> Value {
        let status = self.status.as_ref();
        json!({
            "metadata": metadata_json(self),
            "cluster": cluster_of(self),
            "authentication": self.authentication_type(),
            "authorization": self.spec.authorization,
            "quotas": self.spec.quotas,
            "status": {
                "ready": self.is_ready(),
                "username": status.and_then(|s| s.username.clone()),
                "secret": status.and_then(|s| s.secret.clone()),
                "conditions": conditions_json(self.conditions()),
            },
        })
    }
}

/// Tool creating a `KafkaUser`.
pub struct CreateUserTool {
    ctx: ToolContext,
}

#[async_trait]
impl Tool for CreateUserTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("create_user", "Create a KafkaUser with the given authentication type")
            .with_category("users")
            .with_schema(
                r#"{
                    "type": "object",
                    "properties": {
                        "name": {"type": "string", "description": "User name"},
                        "cluster": {"type": "string", "description": "Kafka cluster the user belongs to"},
                        "namespace": {"type": "string", "description": "Namespace; the server default when omitted"},
                        "authentication": {
                            "type": "string",
                            "enum": ["tls", "tls-external", "scram-sha-512"],
                            "default": "scram-sha-512"
                        },
                        "authorization": {"type": "object", "description": "Strimzi authorization block (ACLs)"}
                    },
                    "required": ["name", "cluster"]
                }"#,
            )
    }

    #[instrument(skip(self, args), fields(tool = "create_user"))]
    async fn execute(&self, args: &CallArguments) -> McpServerResult<ToolResult> {
        let name = required(args, "name")?;
        let cluster = required(args, "cluster")?;
        let namespace = self.ctx.namespace(args);
        let authentication = args
            .non_empty_string("authentication")
            .unwrap_or_else(|| "scram-sha-512".to_string());

        if !AUTHENTICATION_TYPES.contains(&authentication.as_str()) {
            return Err(McpServerError::InvalidParams(format!(
                "Unsupported authentication '{}'; expected one of {}",
                authentication,
                AUTHENTICATION_TYPES.join(", ")
            )));
        }

        let mut user = KafkaUser::new(
            &name,
            KafkaUserSpec {
                authentication: Some(KafkaUserAuthentication {
                    type_: authentication.clone(),
                }),
                authorization: args.map("authorization").cloned().map(Value::Object),
                quotas: None,
            },
        );
        user.metadata.labels = Some(labels::single(labels::CLUSTER, &cluster));

        self.ctx.repo::<KafkaUser>().create(&namespace, &user).await?;
        info!(user = %name, namespace = %namespace, "Created user");

        Ok(ToolResult::text(format!(
            "Created user '{}' ({}) in namespace '{}' for cluster '{}'",
            name, authentication, namespace, cluster
        )))
    }
}

/// Tool deleting a `KafkaUser`.
pub struct DeleteUserTool {
    ctx: ToolContext,
}

#[async_trait]
impl Tool for DeleteUserTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("delete_user", "Delete a KafkaUser and its credentials")
            .with_category("users")
            .with_schema(DESCRIBE_SCHEMA)
    }

    #[instrument(skip(self, args), fields(tool = "delete_user"))]
    async fn execute(&self, args: &CallArguments) -> McpServerResult<ToolResult> {
        let name = required(args, "name")?;
        let namespace = self.ctx.namespace(args);
        let users = self.ctx.repo::<KafkaUser>();

        if !users.exists(&namespace, &name).await? {
            return Ok(not_found("User", &name, &namespace));
        }
        users.delete(&namespace, &name).await?;
        info!(user = %name, namespace = %namespace, "Deleted user");

        Ok(ToolResult::text(format!(
            "Deleted user '{}' from namespace '{}'",
            name, namespace
        )))
    }
}

/// Tool reading the credentials Secret of a `KafkaUser`.
pub struct GetUserCredentialsTool {
    ctx: ToolContext,
}

#[async_trait]
impl Tool for GetUserCredentialsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_user_credentials",
            "Read the credentials the User Operator generated for a KafkaUser",
        )
        .with_category("users")
        .with_schema(DESCRIBE_SCHEMA)
    }

    #[instrument(skip(self, args), fields(tool = "get_user_credentials"))]
    async fn execute(&self, args: &CallArguments) -> McpServerResult<ToolResult> {
        let name = required(args, "name")?;
        let namespace = self.ctx.namespace(args);

        let Some(user) = self.ctx.repo::<KafkaUser>().get(&namespace, &name).await? else {
            return Ok(not_found("User", &name, &namespace));
        };
        let secret_name = user
            .status
            .as_ref()
            .and_then(|s| s.secret.clone())
            .unwrap_or_else(|| name.clone());

        let Some(secret) = self.ctx.repo::<Secret>().get(&namespace, &secret_name).await? else {
            return Ok(ToolResult::error(format!(
                "Secret '{}' for user '{}' not found in namespace '{}'; the user may not be ready yet",
                secret_name, name, namespace
            )));
        };

        let credentials: Map<String, Value> = secret
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|(key, bytes)| (key, Value::String(String::from_utf8_lossy(&bytes.0).into_owned())))
            .collect();

        Ok(ToolResult::json(json!({
            "user": name,
            "secret": secret_name,
            "authentication": user.authentication_type(),
            "credentials": credentials,
        })))
    }
}

/// User tools.
pub struct UserTools {
    ctx: ToolContext,
}

impl UserTools {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl ToolFactory for UserTools {
    fn group(&self) -> &'static str {
        "users"
    }

    fn tools(&self) -> Vec<Arc<dyn Tool>> {
        vec![
            Arc::new(
                ListTool::<KafkaUser>::new(
                    self.ctx.clone(),
                    "list_users",
                    "List KafkaUsers with authentication type and readiness",
                    "users",
                    "users",
                )
                .with_cluster_filter(),
            ),
            Arc::new(DescribeTool::<KafkaUser>::new(
                self.ctx.clone(),
                "describe_user",
                "Describe a KafkaUser: authentication, ACLs, quotas and conditions",
                "users",
                "User",
            )),
            Arc::new(CreateUserTool {
                ctx: self.ctx.clone(),
            }),
            Arc::new(DeleteUserTool {
                ctx: self.ctx.clone(),
            }),
            Arc::new(GetUserCredentialsTool {
                ctx: self.ctx.clone(),
            }),
        ]
    }
}
