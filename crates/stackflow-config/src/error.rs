use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("設定ファイルが見つかりません: {}", .0.display())]
    ConfigFileNotFound(PathBuf),

    #[error("設定ファイル {} を読み込めません: {source}", path.display())]
    InvalidConfigFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "テンプレートファイルを指定してください:\n  stack -t TEMPLATE-FILE\n\
        または設定ファイルの TemplateFile で指定できます"
    )]
    TemplateNotSpecified,

    #[error("テンプレートファイル {} を読み込めません: {source}", path.display())]
    TemplateNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("テンプレートファイル {} が UTF-8 ではありません", .0.display())]
    TemplateNotUtf8(PathBuf),

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
