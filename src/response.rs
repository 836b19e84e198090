// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # HTTP 响应构建模块
//!
//! 响应只携带 `Content-Type`、`Content-Length` 与 `Connection: close` 三个头部。

use crate::param::*;

use bytes::Bytes;
use log::error;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use std::io;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status_code: u16,
    information: String,
    content_type: String,
    content: Bytes,
}

impl Response {
    /// 构建 `200 OK` 响应。
    pub fn ok(content_type: &str, content: Bytes) -> Self {
        Self {
            status_code: 200,
            information: reason_phrase(200).to_string(),
            content_type: content_type.to_string(),
            content,
        }
    }

    /// 构建错误响应，正文固定为 `<h1><code> <text></h1>`。
    pub fn from_status_code(code: u16) -> Self {
        let information = reason_phrase(code);
        let html = format!("<h1>{} {}</h1>", code, information);
        Self {
            status_code: code,
            information: information.to_string(),
            content_type: HTML_CONTENT_TYPE.to_string(),
            content: Bytes::from(html),
        }
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        let status_code: &str = &self.status_code.to_string();
        let information: &str = &self.information;
        let content_type: &str = &self.content_type;
        let content_length: &str = &self.content.len().to_string();

        let header = [
            "HTTP/1.1 ",
            status_code,
            " ",
            information,
            CRLF,
            "Content-Type: ",
            content_type,
            CRLF,
            "Content-Length: ",
            content_length,
            CRLF,
            "Connection: close",
            CRLF,
            CRLF,
        ]
        .concat();
        [header.as_bytes(), &self.content[..]].concat()
    }

    /// 将完整响应写入输出流并刷新。写入错误原样返回给调用者。
    pub async fn write_to<W: AsyncWrite + Unpin>(&self, stream: &mut W) -> io::Result<()> {
        stream.write_all(&self.as_bytes()).await?;
        stream.flush().await
    }
}

impl Response {
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn information(&self) -> &str {
        &self.information
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }
}

fn reason_phrase(code: u16) -> &'static str {
    match STATUS_CODES.get(&code) {
        Some(&phrase) => phrase,
        None => {
            error!("非法的状态码：{}。这条错误说明代码编写出现了错误。", code);
            "Unknown"
        }
    }
}
