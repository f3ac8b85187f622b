/// 模組目錄預設值
pub const DEFAULT_MODULE_DIRECTORY: &str = ".";
/// 模組目錄下的設定檔名稱
pub const CONFIG_FILE_NAME: &str = "retakes.toml";
/// 訊息前綴
pub const MESSAGE_PREFIX: &str = "[Retakes] ";
