use crate::commands::{create, delete, list};
use colored::Colorize;
use stackflow_cloud::{StackError, StackLifecycle, StackProvider};

/// 作成 → 一覧 → 削除 を順に実行（途中で失敗したら以降はスキップ）
///
/// 一覧への反映だけがタイムアウトした場合は、作成済みのスタックを残さないよう
/// 削除まで進めてからタイムアウトを返す。
pub async fn handle<P: StackProvider + ?Sized>(
    lifecycle: &StackLifecycle<'_, P>,
    name: &str,
    template_body: &str,
    json: bool,
) -> anyhow::Result<()> {
    let created = create::handle(lifecycle, name, template_body).await;
    if let Err(err) = &created {
        if !is_visibility_timeout(err) {
            return created;
        }
        eprintln!("{} {}", "⚠".yellow(), format!("{:#}", err).yellow());
        println!("{}", "作成済みのスタックを削除します".yellow());
    }

    println!();
    list::handle(lifecycle, None, json).await?;

    delete::delete_and_confirm(lifecycle, name, json).await?;
    created?;

    println!();
    println!("{}", "✓ すべての操作が完了しました！".green().bold());
    Ok(())
}

fn is_visibility_timeout(err: &anyhow::Error) -> bool {
    err.downcast_ref::<StackError>()
        .is_some_and(StackError::is_timeout)
}
