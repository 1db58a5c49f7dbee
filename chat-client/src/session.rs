//! 会话生命周期
//!
//! 单条长连接上的两个阶段：凭证握手，然后稳态接收循环。
//! 握手失败对 `authenticate` 的调用方同步可见；稳态失败通过
//! 接收任务的结果暴露。没有重连，任何致命失败都终结本会话。

use protocol::{
    classify_authenticated, classify_chat, discriminator, validate_username, AuthRequest,
    ChatMessage, Connection, FrameReader, FrameWriter, ProtocolError, Result, Transport,
    TransportConfig, WsTransport,
};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

type Reader = <WsTransport as Transport>::Reader;
type Writer = <WsTransport as Transport>::Writer;

/// 一个已认证的聊天会话
///
/// 只有握手成功后才会构造；历史消息快照在构造时填充一次，
/// 之后不变。发送走独立的写入端，与接收循环互不阻塞。
pub struct Session {
    username: String,
    endpoint: String,
    chats: Vec<ChatMessage>,
    reader: Option<FrameReader<Reader>>,
    writer: FrameWriter<Writer>,
}

/// 建立连接并完成凭证握手
///
/// 服务端的第一帧必须是 AUTHENTICATED 信封。显式拒绝按其
/// 判别值映射为对应错误；无法解码的响应视为 `IncorrectFormat`；
/// 未应答即关闭视为 `ConnectionClosed`。
pub async fn authenticate(username: &str, password: &str, endpoint: &str) -> Result<Session> {
    validate_username(username)?;

    let transport = WsTransport::connect(endpoint, &TransportConfig::default()).await?;
    info!("Connected to {}", endpoint);
    let mut conn = Connection::new(transport);

    conn.send(&AuthRequest { username, password }).await?;

    let value = conn.recv().await?.ok_or(ProtocolError::ConnectionClosed)?;

    match classify_authenticated(&value) {
        Some(envelope) => {
            info!(
                "Authenticated as {} ({} history messages)",
                username,
                envelope.chats.len()
            );
            let (reader, writer) = conn.split();
            Ok(Session {
                username: username.to_string(),
                endpoint: endpoint.to_string(),
                chats: envelope.chats,
                reader: Some(reader),
                writer,
            })
        }
        None => Err(match discriminator(&value) {
            Some(kind) => ProtocolError::from_rejection(kind),
            // 解码已保证判别键存在，但判别值可能不是字符串
            None => ProtocolError::IncorrectFormat,
        }),
    }
}

impl Session {
    /// 本会话的用户名
    pub fn username(&self) -> &str {
        &self.username
    }

    /// 连接目标
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 握手时收到的历史消息快照
    pub fn chats(&self) -> &[ChatMessage] {
        &self.chats
    }

    /// 广播一条消息给所有参与者
    pub async fn send_broadcast(&mut self, body: &str) -> Result<()> {
        self.send_chat(body, None).await
    }

    /// 发送一条私聊消息
    pub async fn send_direct(&mut self, body: &str, destination: &str) -> Result<()> {
        self.send_chat(body, Some(destination.to_string())).await
    }

    async fn send_chat(&mut self, body: &str, destination: Option<String>) -> Result<()> {
        let msg = ChatMessage {
            source: self.username.clone(),
            destination,
            body: body.to_string(),
        };
        msg.validate()?;
        self.writer.write_frame(&msg.to_frame()?).await
    }

    /// 启动稳态接收循环
    ///
    /// 每个成功分类的聊天消息按到达顺序同步回调；分类不匹配的
    /// 信封静默跳过。传输正常关闭时任务以 `Ok(())` 结束；解码
    /// 失败（连接被认为已失步）以 `Err` 结束。读取端会移入任务，
    /// 每个会话只能启动一次。
    pub fn listen<F>(&mut self, mut on_chat: F) -> Result<JoinHandle<Result<()>>>
    where
        F: FnMut(ChatMessage) + Send + 'static,
    {
        let mut reader = self.reader.take().ok_or(ProtocolError::AlreadyListening)?;

        Ok(tokio::spawn(async move {
            loop {
                let value = match reader.read_frame().await {
                    Ok(Some(value)) => value,
                    Ok(None) => {
                        info!("Server closed connection");
                        return Ok(());
                    }
                    Err(e) => {
                        warn!("Receive error: {}", e);
                        return Err(e);
                    }
                };

                match classify_chat(&value) {
                    Some(msg) => on_chat(msg),
                    None => debug!("Ignoring non-chat frame: {}", value),
                }
            }
        }))
    }
}
