// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 连接处理模块
//!
//! 负责单个连接的完整生命周期：读取请求 → 解析路径 → 构建并发送响应 → 关闭连接。
//! 每个连接最多产生一个响应；无论成功、失败还是超时，连接都会被关闭。

use crate::{
    exception::Exception,
    mime::Classifier,
    request::Request,
    resolver::{BaseDirectory, ResolvedPath},
    response::Response,
};

use bytes::Bytes;
use log::{debug, error, info, warn};
use tokio::{
    fs,
    io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader},
    time::timeout,
};

use std::{io, time::Duration};

/// 所有连接共享的只读上下文，启动时构建一次。
pub struct ServeContext {
    base: BaseDirectory,
    classifier: Classifier,
    io_timeout: Option<Duration>,
}

impl ServeContext {
    pub fn new(base: BaseDirectory, classifier: Classifier, io_timeout: Option<Duration>) -> Self {
        Self {
            base,
            classifier,
            io_timeout,
        }
    }

    pub fn base(&self) -> &BaseDirectory {
        &self.base
    }

    pub fn io_timeout(&self) -> Option<Duration> {
        self.io_timeout
    }
}

/// 连接任务入口。所有错误都在此记录，不会传播到其他连接；
/// 返回时 `stream` 已被消费并释放，连接随之关闭。
pub async fn handle_connection<S>(stream: S, id: u128, context: &ServeContext)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let result = match context.io_timeout {
        Some(limit) => match timeout(limit, serve(stream, id, context)).await {
            Ok(r) => r,
            Err(_) => {
                warn!("[ID{}]连接在{}ms内未完成，强制关闭", id, limit.as_millis());
                return;
            }
        },
        None => serve(stream, id, context).await,
    };

    match result {
        Ok(Some(code)) => debug!("[ID{}]响应{}已发送，连接关闭", id, code),
        Ok(None) => debug!("[ID{}]空请求，连接关闭", id),
        Err(e) => error!("[ID{}]连接传输失败，已中止：{}", id, e),
    }
}

/// 处理一个连接并返回已发送响应的状态码；空请求返回 `Ok(None)`。
///
/// 任何 I/O 错误都会中止剩余工作并原样返回。
pub async fn serve<S>(stream: S, id: u128, context: &ServeContext) -> io::Result<Option<u16>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut stream = BufReader::new(stream);

    let request = match Request::read_from(&mut stream, id).await? {
        Some(r) => r,
        None => return Ok(None),
    };
    info!("[ID{}] {} {}", id, request.method(), request.path());

    let response = respond(&request, id, context).await?;
    response.write_to(&mut stream).await?;
    stream.shutdown().await?;
    Ok(Some(response.status_code()))
}

/// 根据请求构建响应。只有读取文件失败会以 `Err` 返回。
async fn respond(request: &Request, id: u128, context: &ServeContext) -> io::Result<Response> {
    let resolved = match locate(request, context).await {
        Ok(r) => r,
        Err(e) => {
            match e {
                Exception::SecurityViolation => {
                    warn!("[ID{}]拦截越出根目录的请求：{}，返回403", id, request.path())
                }
                Exception::MethodNotAllowed => {
                    warn!("[ID{}]不支持的请求方法：{}，返回405", id, request.method())
                }
                _ => warn!("[ID{}]请求的路径：{} 不存在，返回404", id, request.path()),
            }
            let code = e.status_code().unwrap_or(404);
            return Ok(Response::from_status_code(code));
        }
    };

    let content = fs::read(resolved.canonical()).await?;
    let content_type = context.classifier.classify(resolved.resource());
    debug!(
        "[ID{}]读取文件{}完毕，{} bytes，Content-Type: {}",
        id,
        resolved.canonical().display(),
        content.len(),
        content_type
    );
    Ok(Response::ok(&content_type, Bytes::from(content)))
}

/// 检查方法并定位一个存在的普通文件。
async fn locate(request: &Request, context: &ServeContext) -> Result<ResolvedPath, Exception> {
    if !request.is_get() {
        return Err(Exception::MethodNotAllowed);
    }
    let resolved = context.base.resolve(request.path())?;
    match fs::metadata(resolved.canonical()).await {
        Ok(metadata) if !metadata.is_dir() => Ok(resolved),
        _ => Err(Exception::FileNotFound),
    }
}
