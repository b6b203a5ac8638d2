use crate::commands::create;
use crate::utils;
use anyhow::Context;
use colored::Colorize;
use stackflow_cloud::{StackLifecycle, StackProvider, StackSnapshot, StackStatus};

pub async fn handle<P: StackProvider + ?Sized>(
    lifecycle: &StackLifecycle<'_, P>,
    name: &str,
    json: bool,
) -> anyhow::Result<()> {
    // 一覧で確認できないスタックは削除しない
    create::confirm_visible(lifecycle, name).await?;

    delete_and_confirm(lifecycle, name, json).await
}

/// 削除して DELETE_COMPLETE になるまで待ち、残りの一覧を表示
pub async fn delete_and_confirm<P: StackProvider + ?Sized>(
    lifecycle: &StackLifecycle<'_, P>,
    name: &str,
    json: bool,
) -> anyhow::Result<()> {
    println!();
    println!("{}", format!("スタック {} を削除中...", name).yellow());

    lifecycle
        .delete(name)
        .await
        .with_context(|| format!("スタック {} を削除できませんでした", name))?;
    println!("  ✓ 削除完了");

    let deleted = lifecycle
        .confirm_deleted(name)
        .await
        .with_context(|| format!("スタック {} が DELETE_COMPLETE になりません", name))?;
    println!(
        "  ✓ {} は {} になりました",
        deleted.name.cyan(),
        deleted.status
    );

    let remaining: StackSnapshot = lifecycle
        .list()
        .await
        .context("スタック一覧を取得できませんでした")?
        .into_iter()
        .filter(|s| s.status != StackStatus::DeleteComplete)
        .collect();

    println!();
    println!(
        "{}",
        format!("{} は以下の一覧に含まれないはずです:", name).bold()
    );
    utils::print_snapshot(&remaining, json)?;

    if remaining.contains(name) {
        tracing::warn!("{} is still listed after deletion", name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackflow_cloud::testing::{Call, InMemoryProvider};
    use stackflow_cloud::{BackoffPolicy, StackError};
    use std::time::Duration;

    fn policy() -> BackoffPolicy {
        BackoffPolicy::new(Duration::from_secs(1), Duration::from_secs(100))
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_existing_stack() {
        let provider = InMemoryProvider::new()
            .with_stack("web", StackStatus::CreateComplete)
            .with_stack("db", StackStatus::CreateComplete);
        let lifecycle = StackLifecycle::new(&provider, policy());

        handle(&lifecycle, "web", false).await.unwrap();

        let stacks = provider.stacks();
        assert_eq!(stacks[0].status, StackStatus::DeleteComplete);
        assert_eq!(stacks[1].status, StackStatus::CreateComplete);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_absent_name_times_out_and_skips_delete() {
        let provider = InMemoryProvider::new().with_stack("db", StackStatus::CreateComplete);
        let lifecycle = StackLifecycle::new(&provider, policy());

        let err = handle(&lifecycle, "ghost", false).await.unwrap_err();

        assert!(
            err.downcast_ref::<StackError>()
                .is_some_and(|e| e.is_timeout())
        );
        assert_eq!(
            provider.count_calls(|c| matches!(c, Call::DeleteStack { .. })),
            0
        );
    }
}
