//! 聊天客户端库
//!
//! 在一条持久的 WebSocket 连接上实现聊天协议的客户端侧：
//! 凭证握手、历史消息快照、稳态接收循环和广播/私聊发送。

mod session;

pub use protocol::{AuthenticatedEnvelope, ChatMessage, MessageKind, ProtocolError, Result};
pub use session::{authenticate, Session};
