//! 错误类型定义

use thiserror::Error;

use crate::message::MessageKind;

/// 协议错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// WebSocket 传输错误
    #[error("WebSocket error: {0}")]
    Ws(#[from] tokio_tungstenite::tungstenite::Error),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 连接超时
    #[error("Connection timeout")]
    ConnectionTimeout,

    /// 连接已关闭
    #[error("Connection closed")]
    ConnectionClosed,

    /// 对端拒绝：格式不正确（或无法解码的信封）
    #[error("Incorrect format")]
    IncorrectFormat,

    /// 对端拒绝：缺少必需的 JSON 字段
    #[error("Missing required JSON keys")]
    MissingJsonKeys,

    /// 对端拒绝：凭证无效
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// 对端返回了未知的判别值
    #[error("Unknown message: {0}")]
    UnknownMessage(String),

    /// 信封大小超限
    #[error("Frame too large: {size} bytes (max: {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// 用户名过长或为空
    #[error("Username too long: {len} chars (max: {max})")]
    UsernameTooLong { len: usize, max: usize },

    /// 消息过长
    #[error("Message too long: {len} bytes (max: {max})")]
    MessageTooLong { len: usize, max: usize },

    /// 会话的接收循环已被启动过
    #[error("Listen loop already started for this session")]
    AlreadyListening,
}

impl ProtocolError {
    /// 将握手响应中的判别值映射为对应的错误
    ///
    /// 仅用于显式的协议拒绝；稳态监听中分类不匹配不是错误。
    pub fn from_rejection(kind: &str) -> Self {
        match MessageKind::from_wire(kind) {
            Some(MessageKind::IncorrectFormat) => ProtocolError::IncorrectFormat,
            Some(MessageKind::MissingJsonKeys) => ProtocolError::MissingJsonKeys,
            Some(MessageKind::InvalidCredentials) => ProtocolError::InvalidCredentials,
            _ => ProtocolError::UnknownMessage(kind.to_string()),
        }
    }
}

/// 协议操作结果类型
pub type Result<T> = std::result::Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rejection_known_kinds() {
        assert!(matches!(
            ProtocolError::from_rejection("INCORRECT_FORMAT"),
            ProtocolError::IncorrectFormat
        ));
        assert!(matches!(
            ProtocolError::from_rejection("MISSING_JSON_KEYS"),
            ProtocolError::MissingJsonKeys
        ));
        assert!(matches!(
            ProtocolError::from_rejection("INVALID_CREDENTIALS"),
            ProtocolError::InvalidCredentials
        ));
    }

    #[test]
    fn test_from_rejection_unknown_kind_carries_literal() {
        match ProtocolError::from_rejection("SOMETHING_ELSE") {
            ProtocolError::UnknownMessage(kind) => assert_eq!(kind, "SOMETHING_ELSE"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_rejection_normal_kind_is_not_a_rejection() {
        // AUTHENTICATED/CHAT 不是拒绝判别值，落入未知分支
        match ProtocolError::from_rejection("AUTHENTICATED") {
            ProtocolError::UnknownMessage(kind) => assert_eq!(kind, "AUTHENTICATED"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
