//! Health aggregation across Strimzi resource kinds.
//!
//! A [`HealthCheckPipeline`] runs an ordered chain of [`HealthChecker`]s
//! against one shared [`HealthCheckContext`]. Every checker appends a titled
//! section to a single [`HealthCheckResult`] and bumps its issue or warning
//! counters; the report is rendered once the chain has finished.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use strimzi_mcp::health::{HealthCheckContext, HealthCheckPipeline};
//! use strimzi_resources::MemoryStore;
//!
//! async fn report() -> String {
//!     let ctx = HealthCheckContext::new(Arc::new(MemoryStore::new()))
//!         .with_namespace("kafka")
//!         .with_cluster("my-cluster");
//!
//!     HealthCheckPipeline::standard().run(&ctx).await.format()
//! }
//! ```

pub mod checkers;

use async_trait::async_trait;
use std::fmt::Write as _;
use std::sync::Arc;
use strimzi_resources::{
    labels, Repository, ResourceKind, ResourceList, ResourceRepository, ResourceStore,
    StoreResult,
};
use tracing::{info, instrument, warn};

pub use checkers::{
    ConnectChecker, ConnectorChecker, KafkaClusterChecker, ReadinessChecker, Severity,
};

/// Banner opening every report.
pub const REPORT_BANNER: &str = "=== Strimzi Kafka Health Check ===";

/// Inputs shared by every checker of one health-check run.
#[derive(Clone)]
pub struct HealthCheckContext {
    store: Arc<dyn ResourceStore>,
    namespace: Option<String>,
    cluster: Option<String>,
}

impl HealthCheckContext {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self {
            store,
            namespace: None,
            cluster: None,
        }
    }

    /// Restrict checks to one namespace. Empty means all namespaces.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into()).filter(|ns: &String| !ns.is_empty());
        self
    }

    /// Restrict checks to one Kafka cluster. Empty means all clusters.
    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = Some(cluster.into()).filter(|c: &String| !c.is_empty());
        self
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn cluster(&self) -> Option<&str> {
        self.cluster.as_deref()
    }

    /// Repository for kind `K` on the shared store.
    pub fn repo<K: ResourceKind>(&self) -> ResourceRepository<K> {
        ResourceRepository::new(Arc::clone(&self.store))
    }

    /// List `K` in the context namespace.
    pub async fn list<K: ResourceKind>(&self) -> StoreResult<ResourceList<K>> {
        self.repo::<K>().list(self.namespace(), None, None).await
    }

    /// List `K` in the context namespace, restricted to the context cluster
    /// through the `strimzi.io/cluster` label.
    pub async fn list_in_cluster<K: ResourceKind>(&self) -> StoreResult<ResourceList<K>> {
        self.repo::<K>()
            .list(self.namespace(), Some(labels::CLUSTER), self.cluster())
            .await
    }

    /// Human-readable scope of the run.
    pub fn scope(&self) -> String {
        format!(
            "Namespace: {} | Cluster: {}",
            self.namespace().unwrap_or("all"),
            self.cluster().unwrap_or("all")
        )
    }
}

impl std::fmt::Debug for HealthCheckContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthCheckContext")
            .field("namespace", &self.namespace)
            .field("cluster", &self.cluster)
            .finish()
    }
}

/// Accumulated findings of one health-check run.
#[derive(Debug, Clone, Default)]
pub struct HealthCheckResult {
    scope: Option<String>,
    sections: Vec<String>,
    buffer: String,
    issues: u32,
    warnings: u32,
}

impl HealthCheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope line rendered under the banner.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Append an underlined section header. Titles are not deduplicated.
    pub fn start_section(&mut self, title: &str) {
        self.sections.push(title.to_string());
        let _ = writeln!(self.buffer, "{}", title);
        let _ = writeln!(self.buffer, "{}", "-".repeat(title.chars().count()));
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        let _ = writeln!(self.buffer, "{}", text.as_ref());
    }

    pub fn blank_line(&mut self) {
        self.buffer.push('\n');
    }

    /// Record a hard failure.
    pub fn issue(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.issues += 1;
    }

    /// Record a soft degradation.
    pub fn warning(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.warnings += 1;
    }

    /// Record a finding of the given severity.
    pub fn record(&mut self, severity: Severity, text: impl AsRef<str>) {
        match severity {
            Severity::Issue => self.issue(text),
            Severity::Warning => self.warning(text),
        }
    }

    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    pub fn issues(&self) -> u32 {
        self.issues
    }

    pub fn warnings(&self) -> u32 {
        self.warnings
    }

    pub fn is_healthy(&self) -> bool {
        self.issues == 0 && self.warnings == 0
    }

    /// Render the report. Does not mutate, so repeated calls agree.
    pub fn format(&self) -> String {
        let mut out = String::with_capacity(self.buffer.len() + 256);
        let _ = writeln!(out, "{}", REPORT_BANNER);
        if let Some(scope) = &self.scope {
            let _ = writeln!(out, "{}", scope);
        }
        out.push('\n');
        out.push_str(&self.buffer);

        let _ = writeln!(out, "Summary");
        let _ = writeln!(out, "-------");
        if self.is_healthy() {
            let _ = writeln!(out, "✓ All resources healthy");
            return out;
        }
        if self.issues > 0 {
            let _ = writeln!(out, "✗ {} issue(s) found", self.issues);
        }
        if self.warnings > 0 {
            let _ = writeln!(out, "⚠ {} warning(s) found", self.warnings);
        }
        let _ = writeln!(
            out,
            "Use the describe_* tools to investigate the affected resources."
        );
        out
    }
}

/// One resource-kind family inspected by the pipeline.
#[async_trait]
pub trait HealthChecker: Send + Sync {
    /// Section title.
    fn title(&self) -> &str;

    /// Inspect resources and append findings. Store failures are returned.
    async fn inspect(
        &self,
        ctx: &HealthCheckContext,
        result: &mut HealthCheckResult,
    ) -> StoreResult<()>;

    /// Run [`HealthChecker::inspect`], reporting a store failure as an issue
    /// and closing the section with a blank line.
    async fn check(&self, ctx: &HealthCheckContext, result: &mut HealthCheckResult) {
        if let Err(e) = self.inspect(ctx, result).await {
            warn!(checker = self.title(), error = %e, "Health checker failed");
            result.issue(format!("✗ Failed to check {}: {}", self.title(), e));
        }
        result.blank_line();
    }
}

/// Ordered chain of checkers.
pub struct HealthCheckPipeline {
    checkers: Vec<Box<dyn HealthChecker>>,
}

impl HealthCheckPipeline {
    pub fn new(checkers: Vec<Box<dyn HealthChecker>>) -> Self {
        Self { checkers }
    }

    /// Every Strimzi kind family, clusters first.
    pub fn standard() -> Self {
        Self::new(checkers::standard())
    }

    pub fn titles(&self) -> Vec<&str> {
        self.checkers.iter().map(|c| c.title()).collect()
    }

    /// Run every checker in order against one result.
    #[instrument(skip(self), fields(checkers = self.checkers.len()))]
    pub async fn run(&self, ctx: &HealthCheckContext) -> HealthCheckResult {
        let mut result = HealthCheckResult::new().with_scope(ctx.scope());
        for checker in &self.checkers {
            result.start_section(checker.title());
            checker.check(ctx, &mut result).await;
        }
        info!(
            issues = result.issues(),
            warnings = result.warnings(),
            "Health check complete"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strimzi_resources::{MemoryStore, StoreError};

    struct Fixed {
        title: &'static str,
        issues: u32,
        warnings: u32,
        fail: bool,
    }

    #[async_trait]
    impl HealthChecker for Fixed {
        fn title(&self) -> &str {
            self.title
        }

        async fn inspect(
            &self,
            _ctx: &HealthCheckContext,
            result: &mut HealthCheckResult,
        ) -> StoreResult<()> {
            if self.fail {
                return Err(StoreError::Unavailable("connection refused".to_string()));
            }
            for _ in 0..self.issues {
                result.issue("  ✗ broken");
            }
            for _ in 0..self.warnings {
                result.warning("  ⚠ degraded");
            }
            Ok(())
        }
    }

    fn fixed(title: &'static str, issues: u32, warnings: u32) -> Box<dyn HealthChecker> {
        Box::new(Fixed {
            title,
            issues,
            warnings,
            fail: false,
        })
    }

    fn ctx() -> HealthCheckContext {
        HealthCheckContext::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_section_header_is_underlined() {
        let mut result = HealthCheckResult::new();
        result.start_section("Topics");
        assert!(result.format().contains("Topics\n------\n"));
        assert_eq!(result.sections(), ["Topics".to_string()]);
    }

    #[test]
    fn test_healthy_summary_only_when_counters_zero() {
        let mut result = HealthCheckResult::new();
        assert!(result.format().contains("✓ All resources healthy"));

        result.warning("  ⚠ slow");
        let report = result.format();
        assert!(!report.contains("All resources healthy"));
        assert!(report.contains("⚠ 1 warning(s) found"));
        assert!(!report.contains("issue(s)"));
        assert!(report.contains("describe_*"));
    }

    #[tokio::test]
    async fn test_sections_in_declaration_order() {
        let pipeline = HealthCheckPipeline::new(vec![
            fixed("First", 0, 0),
            fixed("Second", 1, 0),
            fixed("First", 0, 2),
        ]);
        let result = pipeline.run(&ctx()).await;

        assert_eq!(result.sections(), ["First", "Second", "First"]);
        assert_eq!(result.issues(), 1);
        assert_eq!(result.warnings(), 2);

        let report = result.format();
        let first = report.find("First\n").unwrap();
        let second = report.find("Second\n").unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn test_failing_checker_does_not_stop_chain() {
        let pipeline = HealthCheckPipeline::new(vec![
            Box::new(Fixed {
                title: "Topics",
                issues: 0,
                warnings: 0,
                fail: true,
            }),
            fixed("Users", 0, 1),
        ]);
        let result = pipeline.run(&ctx()).await;

        let report = result.format();
        assert!(report.contains("✗ Failed to check Topics: Store unavailable: connection refused"));
        assert!(report.contains("Users\n-----\n"));
        assert_eq!(result.issues(), 1);
        assert_eq!(result.warnings(), 1);
    }

    #[tokio::test]
    async fn test_format_is_idempotent() {
        let pipeline = HealthCheckPipeline::new(vec![fixed("A", 2, 1), fixed("B", 0, 0)]);
        let result = pipeline.run(&ctx().with_namespace("kafka")).await;

        let first = result.format();
        let second = result.format();
        assert_eq!(first, second);
        assert_eq!(result.issues(), 2);
        assert!(first.starts_with(REPORT_BANNER));
        assert!(first.contains("Namespace: kafka | Cluster: all"));
    }

    #[test]
    fn test_empty_filters_mean_all() {
        let ctx = ctx().with_namespace("").with_cluster("");
        assert_eq!(ctx.namespace(), None);
        assert_eq!(ctx.cluster(), None);
    }
}
