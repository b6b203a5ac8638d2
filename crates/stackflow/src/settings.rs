//! 実行設定の解決
//!
//! CLIフラグ > 設定ファイル > デフォルト の優先順位で一度だけ解決し、
//! 以降は参照で渡す。

use crate::Cli;
use colored::Colorize;
use stackflow_cloud::{BackoffPolicy, Operation, StatusFilter};
use stackflow_config::{ConfigError, FileConfig};
use std::path::PathBuf;
use std::time::Duration;

/// -d のデフォルト値（秒）
pub const DEFAULT_MAX_RETRY_SECONDS: u64 = 100;

/// -d の下限（秒）
pub const MIN_MAX_RETRY_SECONDS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Settings {
    pub operation: Operation,
    /// list 以外では必ず Some
    pub stack_name: Option<String>,
    pub name_generated: bool,
    pub template_path: Option<PathBuf>,
    pub template_body: Option<String>,
    pub backoff: BackoffPolicy,
    pub waiter_timeout: Duration,
    pub filter: StatusFilter,
    pub region: Option<String>,
    pub json: bool,
}

impl Settings {
    /// リモート呼び出しの前に設定エラーを検出する
    pub fn resolve(cli: &Cli, file: &FileConfig) -> anyhow::Result<Self> {
        let operation = cli.operation;

        let max_retry_seconds = cli
            .max_retry_seconds
            .or(file.max_retry_seconds)
            .unwrap_or(DEFAULT_MAX_RETRY_SECONDS)
            .max(MIN_MAX_RETRY_SECONDS);

        let template_path = cli.template.clone().or_else(|| file.template_file.clone());

        let template_body = if operation.creates() {
            let path = template_path
                .as_deref()
                .ok_or(ConfigError::TemplateNotSpecified)?;
            Some(stackflow_config::read_template(path)?)
        } else {
            None
        };

        let (stack_name, name_generated) = match &cli.name {
            Some(name) if !name.is_empty() => (Some(name.clone()), false),
            _ if operation == Operation::List => (None, false),
            _ => (Some(generate_stack_name()), true),
        };

        let backoff = BackoffPolicy::new(
            Duration::from_secs(cli.initial_delay),
            Duration::from_secs(max_retry_seconds),
        );

        Ok(Self {
            operation,
            stack_name,
            name_generated,
            template_path,
            template_body,
            backoff,
            waiter_timeout: Duration::from_secs(cli.wait_timeout),
            filter: StatusFilter::only(cli.status.iter().cloned()),
            region: cli.region.clone(),
            json: cli.json,
        })
    }

    /// create / delete / all の対象スタック名
    pub fn target_name(&self) -> anyhow::Result<&str> {
        self.stack_name
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("スタック名が決まっていません ({})", self.operation))
    }

    pub fn template_body(&self) -> anyhow::Result<&str> {
        self.template_body
            .as_deref()
            .ok_or_else(|| ConfigError::TemplateNotSpecified.into())
    }

    pub fn print_summary(&self) {
        if self.name_generated {
            if let Some(name) = &self.stack_name {
                println!("スタック名を生成しました: {}", name.cyan());
            }
        }
        tracing::debug!("Operation:       {}", self.operation);
        tracing::debug!("MaxRetrySeconds: {}", self.backoff.max_wait.as_secs());
        if let Some(path) = &self.template_path {
            tracing::debug!("TemplateFile:    {}", path.display());
        }
    }
}

/// `stack-<uuid>` 形式のランダムなスタック名
pub fn generate_stack_name() -> String {
    format!("stack-{}", uuid::Uuid::new_v4())
}
