use colored::Colorize;
use stackflow_cloud::{StackSnapshot, StackStatus, StackSummary};

/// ステータスに応じて色分け
pub fn colored_status(status: &StackStatus) -> colored::ColoredString {
    let text = status.as_str();
    if status.is_failure() {
        text.red()
    } else if *status == StackStatus::DeleteComplete {
        text.dimmed()
    } else if status.is_terminal() {
        text.green()
    } else {
        text.yellow()
    }
}

/// 1行分の表示: `<name>, Status: <status>`
pub fn format_stack_line(stack: &StackSummary) -> String {
    format!("{}, Status: {}", stack.name.cyan(), colored_status(&stack.status))
}

/// スタック一覧を表示（--json 指定時は JSON）
pub fn print_snapshot(snapshot: &StackSnapshot, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
        return Ok(());
    }

    if snapshot.is_empty() {
        println!("{}", "スタックはありません".dimmed());
        return Ok(());
    }

    for stack in snapshot.iter() {
        println!("  {}", format_stack_line(stack));
    }
    Ok(())
}
