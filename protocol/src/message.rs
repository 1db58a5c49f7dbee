//! 消息类型定义与信封分类
//!
//! 线上格式没有模式协商，每个入站信封都必须在边界上
//! 逐字段重新校验后才能信任。分类函数是谓词而非错误来源：
//! 不匹配返回 `None`，由调用方决定跳过还是报错。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProtocolError, Result};
use crate::{JSON_CHATS_KEY, JSON_ID_KEY, MAX_MESSAGE_LEN, MAX_USERNAME_LEN};

/// 信封判别值的封闭枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// 拒绝：格式不正确
    IncorrectFormat,
    /// 拒绝：缺少必需的 JSON 字段
    MissingJsonKeys,
    /// 拒绝：凭证无效
    InvalidCredentials,
    /// 握手成功，携带历史消息
    Authenticated,
    /// 一条实时聊天消息
    Chat,
}

impl MessageKind {
    /// 线上判别值
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::IncorrectFormat => "INCORRECT_FORMAT",
            MessageKind::MissingJsonKeys => "MISSING_JSON_KEYS",
            MessageKind::InvalidCredentials => "INVALID_CREDENTIALS",
            MessageKind::Authenticated => "AUTHENTICATED",
            MessageKind::Chat => "CHAT",
        }
    }

    /// 从线上判别值解析，未知值返回 `None`
    pub fn from_wire(kind: &str) -> Option<Self> {
        match kind {
            "INCORRECT_FORMAT" => Some(MessageKind::IncorrectFormat),
            "MISSING_JSON_KEYS" => Some(MessageKind::MissingJsonKeys),
            "INVALID_CREDENTIALS" => Some(MessageKind::InvalidCredentials),
            "AUTHENTICATED" => Some(MessageKind::Authenticated),
            "CHAT" => Some(MessageKind::Chat),
            _ => None,
        }
    }
}

/// 一条聊天消息
///
/// `destination` 为 `None` 表示广播给所有参与者。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// 发送方用户名
    #[serde(rename = "src")]
    pub source: String,
    /// 接收方用户名，缺失或 null 表示广播
    #[serde(rename = "dst", default)]
    pub destination: Option<String>,
    /// 消息正文
    #[serde(rename = "msg")]
    pub body: String,
}

impl ChatMessage {
    /// 校验出站消息是否符合约束
    pub fn validate(&self) -> Result<()> {
        if self.body.len() > MAX_MESSAGE_LEN {
            return Err(ProtocolError::MessageTooLong {
                len: self.body.len(),
                max: MAX_MESSAGE_LEN,
            });
        }
        Ok(())
    }

    /// 编码为带判别字段的线上信封
    ///
    /// 出站帧总是显式写出 `dst`（广播为 null）。
    pub fn to_frame(&self) -> Result<Value> {
        let mut frame = serde_json::to_value(self)?;
        if let Value::Object(obj) = &mut frame {
            obj.insert(
                JSON_ID_KEY.to_string(),
                Value::String(MessageKind::Chat.as_str().to_string()),
            );
        }
        Ok(frame)
    }
}

/// 握手请求帧
#[derive(Serialize, Debug)]
pub struct AuthRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// 握手成功响应：判别值 AUTHENTICATED 加历史消息快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedEnvelope {
    /// 此前的广播/私聊历史
    pub chats: Vec<ChatMessage>,
}

/// 读取信封的判别字段
///
/// 非对象、缺少判别键或判别值不是字符串时返回 `None`。
pub fn discriminator(value: &Value) -> Option<&str> {
    value.as_object()?.get(JSON_ID_KEY)?.as_str()
}

/// 将信封分类为聊天消息
///
/// 仅当判别值为 CHAT 且 `src`/`dst`/`msg` 的类型全部正确时匹配。
pub fn classify_chat(value: &Value) -> Option<ChatMessage> {
    if MessageKind::from_wire(discriminator(value)?) != Some(MessageKind::Chat) {
        return None;
    }
    chat_fields(value)
}

/// 将信封分类为握手成功响应
///
/// 历史列表中任一元素不符合聊天消息形状，整个信封不匹配。
pub fn classify_authenticated(value: &Value) -> Option<AuthenticatedEnvelope> {
    if MessageKind::from_wire(discriminator(value)?) != Some(MessageKind::Authenticated) {
        return None;
    }
    let chats = value.get(JSON_CHATS_KEY)?.as_array()?;
    let chats = chats
        .iter()
        .map(chat_fields)
        .collect::<Option<Vec<_>>>()?;
    Some(AuthenticatedEnvelope { chats })
}

/// 按字段规则校验聊天消息形状（不检查判别字段）
///
/// `src`/`msg` 必须是字符串，`dst` 必须是字符串、null 或缺失。
fn chat_fields(value: &Value) -> Option<ChatMessage> {
    serde_json::from_value(value.clone()).ok()
}

/// 校验用户名是否符合约束
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(ProtocolError::UsernameTooLong {
            len: 0,
            max: MAX_USERNAME_LEN,
        });
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(ProtocolError::UsernameTooLong {
            len: username.len(),
            max: MAX_USERNAME_LEN,
        });
    }
    Ok(())
}
