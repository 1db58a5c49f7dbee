//! 信封编解码
//!
//! 每条 WebSocket 文本消息承载一个 JSON 信封。入站解码规则：
//! 必须是合法 JSON、顶层为对象、携带判别键，任一不满足即视为
//! `IncorrectFormat`（连接被认为已失步）。ping/pong 等控制帧不
//! 承载信封，直接跳过。

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use serde::Serialize;
use serde_json::Value;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::debug;

use crate::error::{ProtocolError, Result};
use crate::{JSON_ID_KEY, MAX_FRAME_SIZE};

/// 信封读取器
pub struct FrameReader<R> {
    reader: R,
}

impl<R> FrameReader<R>
where
    R: Stream<Item = std::result::Result<Message, WsError>> + Unpin,
{
    /// 创建新的信封读取器
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// 读取并解码下一个信封
    ///
    /// 连接正常关闭返回 `Ok(None)`；文本无法解码为带判别键的
    /// JSON 对象返回 `IncorrectFormat`。
    pub async fn read_frame(&mut self) -> Result<Option<Value>> {
        loop {
            match self.reader.next().await {
                None => return Ok(None),
                Some(Ok(Message::Text(text))) => return decode_envelope(text.as_str()).map(Some),
                Some(Ok(Message::Close(_))) => return Ok(None),
                // 本协议只承载文本，二进制数据说明对端已失步
                Some(Ok(Message::Binary(_))) => return Err(ProtocolError::IncorrectFormat),
                Some(Ok(other)) => {
                    debug!("skipping control frame: {:?}", other);
                    continue;
                }
                Some(Err(WsError::ConnectionClosed)) | Some(Err(WsError::AlreadyClosed)) => {
                    return Ok(None)
                }
                Some(Err(e)) => return Err(ProtocolError::Ws(e)),
            }
        }
    }

    /// 接收信封（read_frame 的别名）
    pub async fn recv(&mut self) -> Result<Option<Value>> {
        self.read_frame().await
    }
}

/// 信封写入器
pub struct FrameWriter<W> {
    writer: W,
}

impl<W> FrameWriter<W>
where
    W: Sink<Message, Error = WsError> + Unpin,
{
    /// 创建新的信封写入器
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// 编码并写入一个信封
    pub async fn write_frame<M: Serialize>(&mut self, msg: &M) -> Result<()> {
        let payload = serde_json::to_string(msg)?;

        // 检查大小
        if payload.len() > MAX_FRAME_SIZE {
            return Err(ProtocolError::FrameTooLarge {
                size: payload.len(),
                max: MAX_FRAME_SIZE,
            });
        }

        self.writer.send(Message::Text(payload.into())).await?;
        Ok(())
    }

    /// 发送信封（write_frame 的别名）
    pub async fn send<M: Serialize>(&mut self, msg: &M) -> Result<()> {
        self.write_frame(msg).await
    }
}

/// 入站信封的最低限度解码
fn decode_envelope(text: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(text).map_err(|_| ProtocolError::IncorrectFormat)?;
    match value.as_object() {
        Some(obj) if obj.contains_key(JSON_ID_KEY) => Ok(value),
        _ => Err(ProtocolError::IncorrectFormat),
    }
}
