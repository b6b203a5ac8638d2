mod commands;
mod settings;
mod utils;

use clap::Parser;
use colored::Colorize;
use settings::Settings;
use stackflow_cloud::{Operation, StackError, StackLifecycle, StackStatus};
use stackflow_cloud_aws::CloudFormationProvider;
use stackflow_config::ConfigError;
use std::path::PathBuf;
use std::process::ExitCode;

/// 終了コード
mod exit {
    pub const SERVICE_ERROR: u8 = 1;
    pub const CONFIG_ERROR: u8 = 2;
    pub const VISIBILITY_TIMEOUT: u8 = 3;
}

#[derive(Parser, Debug)]
#[command(name = "stack", version)]
#[command(about = "CloudFormation スタックを作成・一覧・削除する", long_about = None)]
pub struct Cli {
    /// スタック一覧に現れるまで待つ最大秒数（下限 10、デフォルト 100）
    #[arg(short = 'd', long, env = "STACKFLOW_MAX_RETRY_SECONDS")]
    pub max_retry_seconds: Option<u64>,

    /// 実行する操作 (create, list, delete, all)
    #[arg(short = 'o', long, default_value = "all")]
    pub operation: Operation,

    /// スタック名（省略時は stack-<uuid> を生成）
    #[arg(short = 'n', long, env = "STACKFLOW_STACK_NAME")]
    pub name: Option<String>,

    /// テンプレートファイル（create / all で必須）
    #[arg(short = 't', long)]
    pub template: Option<PathBuf>,

    /// 設定ファイル (JSON: MaxRetrySeconds, TemplateFile, Debug)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// AWSリージョン（省略時は AWS の設定に従う）
    #[arg(short = 'r', long)]
    pub region: Option<String>,

    /// 最初のポーリングまでの待機秒数（1 以上、以降は倍々に増える）
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub initial_delay: u64,

    /// 作成・削除の完了を待つ最大秒数
    #[arg(long, default_value_t = 1800)]
    pub wait_timeout: u64,

    /// 一覧に含めるステータス（複数指定可、省略時はすべて）
    #[arg(short = 's', long = "status")]
    pub status: Vec<StackStatus>,

    /// 一覧をJSONで出力
    #[arg(long)]
    pub json: bool,

    /// デバッグログを出力
    #[arg(long)]
    pub debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::from(exit_code(&e))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let (file_config, config_path) = stackflow_config::load(cli.config.as_deref())?;

    init_logging(cli.debug || file_config.debug.unwrap_or(false));
    if let Some(path) = &config_path {
        tracing::debug!("Using config file {}", path.display());
    }

    // ここまででリモート呼び出し前の設定エラーはすべて検出済み
    let settings = Settings::resolve(&cli, &file_config)?;
    settings.print_summary();

    let provider =
        CloudFormationProvider::from_env(settings.region.clone(), settings.waiter_timeout).await;
    let lifecycle = StackLifecycle::new(&provider, settings.backoff.clone())
        .with_filter(settings.filter.clone());

    commands::dispatch(&lifecycle, &settings).await
}

/// stderr へのログ出力を初期化（RUST_LOG で上書き可能）
fn init_logging(debug: bool) {
    let default_level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

/// エラーの種類ごとに終了コードを分ける
fn exit_code(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<ConfigError>().is_some() {
        return exit::CONFIG_ERROR;
    }
    match err.downcast_ref::<StackError>() {
        Some(e) if e.is_timeout() => exit::VISIBILITY_TIMEOUT,
        _ => exit::SERVICE_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::time::Duration;

    #[test]
    fn test_exit_code_config_error() {
        let err = anyhow::Error::from(ConfigError::TemplateNotSpecified);
        assert_eq!(exit_code(&err), exit::CONFIG_ERROR);
    }

    #[test]
    fn test_exit_code_timeout_through_context() {
        let result: Result<(), StackError> = Err(StackError::VisibilityTimeout {
            name: "web".to_string(),
            waited: Duration::from_secs(100),
        });
        let err = result.context("スタック web が見つかりません").unwrap_err();
        assert_eq!(exit_code(&err), exit::VISIBILITY_TIMEOUT);
    }

    #[test]
    fn test_exit_code_service_error() {
        let err = anyhow::Error::from(StackError::api("CreateStack", "ValidationError"));
        assert_eq!(exit_code(&err), exit::SERVICE_ERROR);
        assert_eq!(exit_code(&anyhow::anyhow!("other")), exit::SERVICE_ERROR);
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["stack"]);
        assert_eq!(cli.operation, Operation::All);
        assert_eq!(cli.max_retry_seconds, None);
        assert_eq!(cli.initial_delay, 1);
        assert!(cli.status.is_empty());
    }

    #[test]
    fn test_cli_rejects_zero_initial_delay() {
        assert!(Cli::try_parse_from(["stack", "--initial-delay", "0"]).is_err());
        let cli = Cli::parse_from(["stack", "--initial-delay", "3"]);
        assert_eq!(cli.initial_delay, 3);
    }

    #[test]
    fn test_cli_value_errors_exit_with_config_code() {
        for args in [
            ["stack", "-o", "update"],
            ["stack", "-s", "NOT_A_STATUS"],
            ["stack", "--initial-delay", "0"],
        ] {
            let err = Cli::try_parse_from(args).unwrap_err();
            assert_eq!(err.exit_code(), i32::from(exit::CONFIG_ERROR), "{args:?}");
        }
    }

    #[test]
    fn test_cli_rejects_unknown_operation() {
        let result = Cli::try_parse_from(["stack", "-o", "update"]);
        assert!(result.is_err());
    }
}
