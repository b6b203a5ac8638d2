pub mod all;
pub mod create;
pub mod delete;
pub mod list;

use crate::settings::Settings;
use stackflow_cloud::{Operation, StackLifecycle, StackProvider};

/// -o の値に応じてコマンドを実行
pub async fn dispatch<P: StackProvider + ?Sized>(
    lifecycle: &StackLifecycle<'_, P>,
    settings: &Settings,
) -> anyhow::Result<()> {
    match settings.operation {
        Operation::Create => {
            create::handle(lifecycle, settings.target_name()?, settings.template_body()?).await
        }
        Operation::List => {
            list::handle(lifecycle, settings.stack_name.as_deref(), settings.json).await
        }
        Operation::Delete => {
            delete::handle(lifecycle, settings.target_name()?, settings.json).await
        }
        Operation::All => {
            all::handle(
                lifecycle,
                settings.target_name()?,
                settings.template_body()?,
                settings.json,
            )
            .await
        }
    }
}
