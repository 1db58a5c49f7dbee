//! 协议常量定义

use std::time::Duration;

/// 信封判别字段的键名
pub const JSON_ID_KEY: &str = "id";

/// 认证响应中历史消息列表的键名
pub const JSON_CHATS_KEY: &str = "chats";

/// 聊天帧的发送方键名
pub const JSON_CHAT_SRC_KEY: &str = "src";

/// 聊天帧的接收方键名（null 表示广播）
pub const JSON_CHAT_DST_KEY: &str = "dst";

/// 聊天帧的正文键名
pub const JSON_CHAT_MSG_KEY: &str = "msg";

/// 握手请求的用户名键名
pub const JSON_USERNAME_KEY: &str = "username";

/// 握手请求的密码键名
pub const JSON_PASSWORD_KEY: &str = "password";

/// 用户名最大长度
pub const MAX_USERNAME_LEN: usize = 20;

/// 单条消息正文最大长度
pub const MAX_MESSAGE_LEN: usize = 4096;

/// 单个信封编码后的最大大小
pub const MAX_FRAME_SIZE: usize = 8192;

/// 连接超时（秒）
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// 连接超时 Duration
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(CONNECT_TIMEOUT_SECS);
