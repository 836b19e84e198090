// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # Exception 模块
//!
//! 定义单个连接处理过程中可能出现的协议层结果。
//!
//! 传输层故障（读写 Socket、读取文件失败）不在此枚举中，
//! 它们以 `std::io::Error` 的形式向上传播，由连接任务统一记录并关闭连接。

use std::fmt;

/// 连接处理过程中的异常类型。
///
/// 除 `EmptyRequest` 外，每个变体都对应一个固定的 HTTP 状态码。
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Exception {
    /// 请求行缺失或为空。直接关闭连接，不发送任何响应。
    EmptyRequest,
    /// 客户端使用了 GET 以外的方法。对应 `405 Method Not Allowed`。
    MethodNotAllowed,
    /// 请求路径规范化后逃逸出根目录（包括经由符号链接逃逸）。对应 `403 Forbidden`。
    SecurityViolation,
    /// 文件不存在，或者路径指向一个目录。对应 `404 Not Found`。
    FileNotFound,
}

use Exception::*;

impl Exception {
    /// 该异常对应的 HTTP 状态码；`EmptyRequest` 没有响应，返回 `None`。
    pub fn status_code(&self) -> Option<u16> {
        match self {
            EmptyRequest => None,
            MethodNotAllowed => Some(405),
            SecurityViolation => Some(403),
            FileNotFound => Some(404),
        }
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyRequest => write!(f, "Empty or missing request line"),
            MethodNotAllowed => write!(f, "Method not allowed (405)"),
            SecurityViolation => write!(f, "Path escapes the base directory (403)"),
            FileNotFound => write!(f, "File not found (404)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(EmptyRequest.status_code(), None);
        assert_eq!(MethodNotAllowed.status_code(), Some(405));
        assert_eq!(SecurityViolation.status_code(), Some(403));
        assert_eq!(FileNotFound.status_code(), Some(404));
    }

    #[test]
    fn test_display() {
        assert_eq!(FileNotFound.to_string(), "File not found (404)");
        assert!(SecurityViolation.to_string().contains("403"));
    }
}
