//! 聊天协议共享库
//!
//! 包含:
//! - 消息类型与信封分类 (MessageKind, ChatMessage, classify_*)
//! - 传输层抽象 (Transport trait, WsTransport)
//! - 信封编解码 (FrameReader, FrameWriter)
//! - 连接封装 (Connection)
//! - 错误类型与拒绝映射 (ProtocolError)

mod message;
mod constants;
mod transport;
mod codec;
mod connection;
mod error;

pub use message::{
    classify_authenticated, classify_chat, discriminator, validate_username, AuthRequest,
    AuthenticatedEnvelope, ChatMessage, MessageKind,
};
pub use constants::*;
pub use transport::{Transport, TransportConfig, WsStream, WsTransport};
pub use codec::{FrameReader, FrameWriter};
pub use connection::Connection;
pub use error::{ProtocolError, Result};
