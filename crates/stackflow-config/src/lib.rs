pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 設定ファイル名
pub const CONFIG_FILE_NAME: &str = "config.json";

/// 設定ファイルパスを直接指定する環境変数
pub const CONFIG_PATH_ENV: &str = "STACKFLOW_CONFIG";

/// config.json の内容
///
/// ```json
/// { "MaxRetrySeconds": 100, "TemplateFile": "template.yaml", "Debug": false }
/// ```
///
/// すべて省略可能。CLIフラグが指定された場合はそちらが優先される。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retry_seconds: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
}

/// 設定ファイルを探す
///
/// 以下の優先順位で検索:
/// 1. 環境変数 STACKFLOW_CONFIG (直接パス指定)
/// 2. カレントディレクトリ: config.json
/// 3. ./.stackflow/config.json
/// 4. ~/.config/stackflow/config.json (グローバル設定)
///
/// 見つからない場合は `None`（設定ファイルは任意）
pub fn find_config_file() -> Result<Option<PathBuf>> {
    // 1. 環境変数で直接指定（存在しなければエラー）
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(Some(path));
        }
        return Err(ConfigError::ConfigFileNotFound(path));
    }

    let current_dir = std::env::current_dir()?;

    // 2. カレントディレクトリ
    let path = current_dir.join(CONFIG_FILE_NAME);
    if path.is_file() {
        return Ok(Some(path));
    }

    // 3. ./.stackflow/ ディレクトリ
    let path = current_dir.join(".stackflow").join(CONFIG_FILE_NAME);
    if path.is_file() {
        return Ok(Some(path));
    }

    // 4. グローバル設定ファイル
    if let Some(config_dir) = dirs::config_dir() {
        let global_config = config_dir.join("stackflow").join(CONFIG_FILE_NAME);
        if global_config.is_file() {
            return Ok(Some(global_config));
        }
    }

    Ok(None)
}

/// 設定ファイルを読み込む
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ConfigError::ConfigFileNotFound(path.to_path_buf()),
        _ => ConfigError::Io(e),
    })?;

    let config: FileConfig =
        serde_json::from_str(&content).map_err(|source| ConfigError::InvalidConfigFile {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// 明示されたパス、なければ検索結果から設定を読み込む
///
/// 設定ファイルがどこにもなければデフォルト値を返す。
pub fn load(explicit: Option<&Path>) -> Result<(FileConfig, Option<PathBuf>)> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file()?,
    };

    match path {
        Some(path) => Ok((load_config(&path)?, Some(path))),
        None => Ok((FileConfig::default(), None)),
    }
}

/// テンプレートファイルを読み込む（内容は加工せずそのまま渡す）
pub fn read_template(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| ConfigError::TemplateNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let body = String::from_utf8(bytes)
        .map_err(|_| ConfigError::TemplateNotUtf8(path.to_path_buf()))?;

    tracing::debug!("Read template {} ({} bytes)", path.display(), body.len());
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn test_load_config_fields() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"MaxRetrySeconds": 120, "TemplateFile": "stack.yaml", "Debug": true}"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.max_retry_seconds, Some(120));
        assert_eq!(config.template_file, Some(PathBuf::from("stack.yaml")));
        assert_eq!(config.debug, Some(true));
    }

    #[test]
    fn test_load_config_partial() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"Debug": false}"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.max_retry_seconds, None);
        assert_eq!(config.template_file, None);
        assert_eq!(config.debug, Some(false));
    }

    #[test]
    fn test_load_config_invalid_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ MaxRetrySeconds: ").unwrap();

        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::InvalidConfigFile { .. })));
    }

    #[test]
    fn test_load_config_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.json");

        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::ConfigFileNotFound(p)) if p == path));
    }

    #[test]
    fn test_read_template_passes_bytes_through() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("template.yaml");
        let body = "Resources:\n  Bucket:\n    Type: AWS::S3::Bucket\n";
        fs::write(&path, body).unwrap();

        assert_eq!(read_template(&path).unwrap(), body);
    }

    #[test]
    fn test_read_template_missing() {
        let result = read_template(Path::new("/nonexistent/template.yaml"));
        assert!(matches!(result, Err(ConfigError::TemplateNotFound { .. })));
    }

    #[test]
    fn test_read_template_not_utf8() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("template.bin");
        fs::write(&path, b"\xff\xfe\x00").unwrap();

        assert!(matches!(
            read_template(&path),
            Err(ConfigError::TemplateNotUtf8(_))
        ));
    }

    #[test]
    #[serial]
    fn test_find_config_file_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join("config.json"), "{}").unwrap();
        fs::create_dir(temp_dir.path().join(".stackflow")).unwrap();
        fs::write(temp_dir.path().join(".stackflow/config.json"), "{}").unwrap();

        std::env::set_current_dir(&temp_dir).unwrap();

        let result = find_config_file().unwrap().unwrap();

        // カレントディレクトリが優先される
        assert!(result.ends_with("config.json"));
        assert!(!result.to_string_lossy().contains(".stackflow"));

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_find_config_file_in_stackflow_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        let dir = temp_dir.path().join(".stackflow");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("config.json"), "{}").unwrap();

        std::env::set_current_dir(&temp_dir).unwrap();

        let result = find_config_file().unwrap().unwrap();
        assert!(result.ends_with(".stackflow/config.json"));

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_find_config_file_env_var() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("custom.json");
        fs::write(&config_path, r#"{"MaxRetrySeconds": 30}"#).unwrap();

        unsafe {
            std::env::set_var(CONFIG_PATH_ENV, config_path.to_str().unwrap());
        }

        let result = find_config_file().unwrap();
        assert_eq!(result, Some(config_path.clone()));

        let (config, path) = load(None).unwrap();
        assert_eq!(config.max_retry_seconds, Some(30));
        assert_eq!(path, Some(config_path));

        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }
    }

    #[test]
    #[serial]
    fn test_find_config_file_env_var_missing() {
        unsafe {
            std::env::set_var(CONFIG_PATH_ENV, "/nonexistent/stackflow.json");
        }

        let result = find_config_file();
        assert!(matches!(result, Err(ConfigError::ConfigFileNotFound(_))));

        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }
    }

    #[test]
    #[serial]
    fn test_load_explicit_path_wins() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("explicit.json");
        fs::write(&path, r#"{"TemplateFile": "explicit.yaml"}"#).unwrap();

        let (config, found) = load(Some(&path)).unwrap();
        assert_eq!(config.template_file, Some(PathBuf::from("explicit.yaml")));
        assert_eq!(found, Some(path));
    }
}
