/// ClaimSnap runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for stored receipt images
    pub blob_dir: String,
    /// JSON seed file with registered employees
    pub users_path: String,
    /// OCR.space API key
    pub ocr_api_key: Option<String>,
    /// Telegram bot token
    pub telegram_bot_token: Option<String>,
    /// Chats notified when a reimbursement request is created
    pub admin_chat_ids: Vec<i64>,
    /// Log level
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self {
            blob_dir: std::env::var("CLAIMSNAP_BLOB_DIR")
                .unwrap_or_else(|_| "receipts".to_string()),
            users_path: std::env::var("CLAIMSNAP_USERS")
                .unwrap_or_else(|_| "users.json".to_string()),
            ocr_api_key: std::env::var("OCR_API_KEY").ok(),
            telegram_bot_token: std::env::var("TELEGRAM_BOT_TOKEN").ok(),
            admin_chat_ids: std::env::var("CLAIMSNAP_ADMIN_CHATS")
                .map(|raw| parse_chat_ids(&raw))
                .unwrap_or_default(),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

/// Comma-separated chat id list; malformed entries are skipped.
fn parse_chat_ids(raw: &str) -> Vec<i64> {
    raw.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chat_id_list() {
        assert_eq!(parse_chat_ids("123, -456,789"), vec![123, -456, 789]);
    }

    #[test]
    fn skips_malformed_chat_ids() {
        assert_eq!(parse_chat_ids("123,abc,"), vec![123]);
    }
}
