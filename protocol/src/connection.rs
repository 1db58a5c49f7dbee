//! 连接封装
//!
//! 将传输层和信封编解码封装在一起，提供统一的收发接口。

use futures_util::{Sink, Stream};
use serde::Serialize;
use serde_json::Value;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use crate::codec::{FrameReader, FrameWriter};
use crate::error::Result;
use crate::transport::Transport;

/// 连接封装
///
/// # Type Parameters
/// * `R` - 读取端类型
/// * `W` - 写入端类型
pub struct Connection<R, W> {
    reader: FrameReader<R>,
    writer: FrameWriter<W>,
}

impl<R, W> Connection<R, W>
where
    R: Stream<Item = std::result::Result<Message, WsError>> + Unpin,
    W: Sink<Message, Error = WsError> + Unpin,
{
    /// 从传输层创建连接
    pub fn new<T: Transport<Reader = R, Writer = W>>(transport: T) -> Self {
        let (reader, writer) = transport.split();
        Self {
            reader: FrameReader::new(reader),
            writer: FrameWriter::new(writer),
        }
    }

    /// 从读写端直接创建连接
    pub fn from_parts(reader: R, writer: W) -> Self {
        Self {
            reader: FrameReader::new(reader),
            writer: FrameWriter::new(writer),
        }
    }

    /// 分离为读取端和写入端
    ///
    /// 用于需要并发读写的场景
    pub fn split(self) -> (FrameReader<R>, FrameWriter<W>) {
        (self.reader, self.writer)
    }

    /// 接收下一个信封，连接关闭返回 `Ok(None)`
    pub async fn recv(&mut self) -> Result<Option<Value>> {
        self.reader.read_frame().await
    }

    /// 发送一个信封
    pub async fn send<M: Serialize>(&mut self, msg: &M) -> Result<()> {
        self.writer.write_frame(msg).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{TransportConfig, WsTransport};
    use futures_util::StreamExt;
    use serde_json::json;

    #[tokio::test]
    async fn test_connection_send_recv() {
        // 启动服务端
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // 客户端连接
        let client_handle = tokio::spawn(async move {
            let config = TransportConfig::default();
            let transport = WsTransport::connect(&format!("ws://{addr}"), &config)
                .await
                .unwrap();
            let mut conn = Connection::new(transport);

            // 发送一条聊天信封
            conn.send(&json!({"id": "CHAT", "src": "test", "dst": null, "msg": "hello"}))
                .await
                .unwrap();

            // 接收响应
            let value = conn.recv().await.unwrap().unwrap();
            assert_eq!(value["id"], "AUTHENTICATED");
        });

        // 服务端接受连接
        let (stream, _) = listener.accept().await.unwrap();
        let ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        let (sink, stream) = StreamExt::split(ws);
        let mut conn = Connection::from_parts(stream, sink);

        // 接收聊天信封
        let value = conn.recv().await.unwrap().unwrap();
        assert_eq!(value["src"], "test");
        assert_eq!(value["msg"], "hello");

        // 发送响应
        conn.send(&json!({"id": "AUTHENTICATED", "chats": []}))
            .await
            .unwrap();

        client_handle.await.unwrap();
    }
}
