use anyhow::Context;
use colored::Colorize;
use stackflow_cloud::{StackLifecycle, StackProvider};

pub async fn handle<P: StackProvider + ?Sized>(
    lifecycle: &StackLifecycle<'_, P>,
    name: &str,
    template_body: &str,
) -> anyhow::Result<()> {
    println!("{}", format!("スタック {} を作成中...", name).yellow());

    lifecycle
        .create(name, template_body)
        .await
        .with_context(|| format!("スタック {} を作成できませんでした", name))?;
    println!("  ✓ 作成完了");

    confirm_visible(lifecycle, name).await
}

/// 一覧に現れることを確認（list API は結果整合なので待つ）
pub async fn confirm_visible<P: StackProvider + ?Sized>(
    lifecycle: &StackLifecycle<'_, P>,
    name: &str,
) -> anyhow::Result<()> {
    println!(
        "{}",
        format!(
            "スタック一覧に {} が現れるのを待機中（最大 {} 秒）...",
            name,
            lifecycle.policy().max_wait.as_secs()
        )
        .blue()
    );

    let found = lifecycle
        .confirm_visible(name)
        .await
        .with_context(|| format!("スタック一覧に {} が見つかりません", name))?;

    println!(
        "  ✓ {} がスタック一覧に見つかりました (Status: {})",
        found.name.cyan(),
        found.status
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackflow_cloud::testing::{Call, InMemoryProvider};
    use stackflow_cloud::{BackoffPolicy, StackError, StackStatus};
    use std::time::Duration;

    fn policy() -> BackoffPolicy {
        BackoffPolicy::new(Duration::from_secs(1), Duration::from_secs(100))
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_confirms_visibility() {
        let provider = InMemoryProvider::new().hide_new_stacks_for(1);
        let lifecycle = StackLifecycle::new(&provider, policy());

        handle(&lifecycle, "stack-1234", "Resources: {}").await.unwrap();

        let stacks = provider.stacks();
        assert_eq!(stacks[0].name, "stack-1234");
        assert_eq!(stacks[0].status, StackStatus::CreateComplete);
        assert_eq!(provider.count_calls(|c| matches!(c, Call::ListStacks)), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_duplicate_name_fails_without_polling() {
        let provider = InMemoryProvider::new().with_stack("web", StackStatus::CreateComplete);
        let lifecycle = StackLifecycle::new(&provider, policy());

        let err = handle(&lifecycle, "web", "Resources: {}").await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<StackError>(),
            Some(StackError::AlreadyExists(_))
        ));
        assert_eq!(provider.count_calls(|c| matches!(c, Call::ListStacks)), 0);
    }
}
