use crate::utils;
use anyhow::Context;
use colored::Colorize;
use stackflow_cloud::{StackLifecycle, StackProvider};

pub async fn handle<P: StackProvider + ?Sized>(
    lifecycle: &StackLifecycle<'_, P>,
    name: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    if !json {
        println!("{}", "スタック一覧を取得中...".blue());
    }

    let snapshot = match name {
        // 名前指定時はそのスタックのみ表示
        Some(name) => lifecycle.list_named(name).await,
        None => lifecycle.list().await,
    }
    .context("スタック一覧を取得できませんでした")?;

    if !json {
        println!();
        println!("{}", format!("スタック一覧 ({} 件):", snapshot.len()).bold());
    }
    utils::print_snapshot(&snapshot, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackflow_cloud::testing::InMemoryProvider;
    use stackflow_cloud::{BackoffPolicy, StackError, StackStatus};

    #[tokio::test]
    async fn test_list_all_and_named() {
        let provider = InMemoryProvider::new()
            .with_stack("web", StackStatus::CreateComplete)
            .with_stack("db", StackStatus::UpdateComplete);
        let lifecycle = StackLifecycle::new(&provider, BackoffPolicy::default());

        handle(&lifecycle, None, false).await.unwrap();
        handle(&lifecycle, Some("web"), true).await.unwrap();
        handle(&lifecycle, Some("missing"), false).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_error_surfaces() {
        let provider = InMemoryProvider::new().fail_list_with("ExpiredToken");
        let lifecycle = StackLifecycle::new(&provider, BackoffPolicy::default());

        let err = handle(&lifecycle, None, false).await.unwrap_err();
        assert!(format!("{:#}", err).contains("ExpiredToken"));
        assert!(err.downcast_ref::<StackError>().is_some());
    }
}
