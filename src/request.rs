// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # HTTP 请求解析模块
//!
//! 只解析请求行（方法与原始路径），其余头部逐行读取后直接丢弃，不解释其语义。
//! 受支持的方法没有请求体，因此从不读取正文。

use crate::param::METHOD_GET;

use log::debug;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use std::io;

/// 一次连接中解析出的请求。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// 请求方法，区分大小写，原样保存
    method: String,
    /// 原始（仍为百分号编码的）请求路径
    path: String,
}

impl Request {
    /// 按单个空格切分请求行。不足两段时路径默认为 `/`，协议版本被忽略。
    pub fn parse_line(line: &str) -> Self {
        let mut parts = line.split(' ');
        let method = parts.next().unwrap_or("").to_string();
        let path = parts.next().unwrap_or("/").to_string();
        Self { method, path }
    }

    /// 从输入流中读取请求行并丢弃后续头部。
    ///
    /// 请求行缺失或为空时返回 `Ok(None)`，调用者应直接关闭连接。
    /// 头部在空行之前遇到流结束时按已读内容继续处理。
    pub async fn read_from<R: AsyncBufRead + Unpin>(
        reader: &mut R,
        id: u128,
    ) -> io::Result<Option<Self>> {
        let line = match read_line(reader).await? {
            Some(l) if !l.is_empty() => l,
            _ => {
                debug!("[ID{}]请求行为空", id);
                return Ok(None);
            }
        };
        let request = Self::parse_line(&line);
        let discarded = discard_headers(reader).await?;
        debug!("[ID{}]丢弃了{}行请求头", id, discarded);
        Ok(Some(request))
    }
}

impl Request {
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_get(&self) -> bool {
        self.method == METHOD_GET
    }
}

/// 读取并丢弃头部行，直到遇到空行或流结束，返回丢弃的行数。
pub async fn discard_headers<R: AsyncBufRead + Unpin>(reader: &mut R) -> io::Result<usize> {
    let mut count = 0;
    while let Some(line) = read_line(reader).await? {
        if line.is_empty() {
            break;
        }
        count += 1;
    }
    Ok(count)
}

/// 读取一行，去掉行尾的 `\n` 或 `\r\n`；非法 UTF-8 字节以替换字符代替。
/// 流已结束时返回 `None`。
async fn read_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> io::Result<Option<String>> {
    let mut buffer = Vec::new();
    if reader.read_until(b'\n', &mut buffer).await? == 0 {
        return Ok(None);
    }
    if buffer.last() == Some(&b'\n') {
        buffer.pop();
        if buffer.last() == Some(&b'\r') {
            buffer.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(&buffer).into_owned()))
}
