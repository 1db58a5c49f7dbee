//! 传输层抽象
//!
//! 提供 Transport trait 使上层协议与具体传输实现解耦。
//! 协议只关心消息分帧的文本通道，当前实现为 WebSocket。

use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{Sink, Stream, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use crate::error::{ProtocolError, Result};
use crate::CONNECT_TIMEOUT;

/// 传输层配置
#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// 连接超时时间
    pub connect_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: CONNECT_TIMEOUT,
        }
    }
}

/// 传输层抽象 trait
///
/// 定义了客户端连接和读写分离的基本操作。
/// 读写端以 WebSocket 消息为单位，上层编解码只处理其中的文本。
pub trait Transport: Send + Sized {
    /// 读取端类型
    type Reader: Stream<Item = std::result::Result<Message, WsError>> + Unpin + Send;
    /// 写入端类型
    type Writer: Sink<Message, Error = WsError> + Unpin + Send;

    /// 建立连接（客户端使用）
    ///
    /// # Arguments
    /// * `endpoint` - 服务器地址，格式为 "ws://host:port/path"
    /// * `config` - 传输配置
    fn connect(
        endpoint: &str,
        config: &TransportConfig,
    ) -> impl std::future::Future<Output = Result<Self>> + Send;

    /// 分离读写端
    ///
    /// 将连接分离为独立的读取端和写入端，便于并发读写。
    fn split(self) -> (Self::Reader, Self::Writer);
}

/// 客户端 WebSocket 流类型
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket 传输实现
#[derive(Debug)]
pub struct WsTransport {
    stream: WsStream,
}

impl Transport for WsTransport {
    type Reader = SplitStream<WsStream>;
    type Writer = SplitSink<WsStream, Message>;

    async fn connect(endpoint: &str, config: &TransportConfig) -> Result<Self> {
        // 带超时的连接
        let (stream, _response) = timeout(config.connect_timeout, connect_async(endpoint))
            .await
            .map_err(|_| ProtocolError::ConnectionTimeout)??;

        debug!("WebSocket connection established to {}", endpoint);
        Ok(Self { stream })
    }

    fn split(self) -> (Self::Reader, Self::Writer) {
        let (writer, reader) = StreamExt::split(self.stream);
        (reader, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ws_connect_and_split() {
        // 启动一个只接受一次握手的 WebSocket 服务端
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            tokio_tungstenite::accept_async(stream).await.unwrap()
        });

        let config = TransportConfig::default();
        let transport = WsTransport::connect(&format!("ws://{addr}"), &config)
            .await
            .unwrap();
        let _server_ws = server.await.unwrap();

        let (_reader, _writer) = transport.split();
    }

    #[tokio::test]
    async fn test_ws_connect_refused() {
        // 没有监听方，连接应立即失败
        let config = TransportConfig::default();
        let result = WsTransport::connect("ws://127.0.0.1:9", &config).await;
        assert!(result.is_err());
    }
}
