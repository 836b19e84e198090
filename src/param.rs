// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 协议参数与常量模块
//!
//! 该模块定义了服务器遵循的 HTTP 协议相关常量：
//! - 本服务器会用到的状态码及其原因短语（Reason Phrase）。
//! - 探测失败时使用的后缀名到 MIME 类型的兜底映射表。

use lazy_static::lazy_static;
use std::collections::HashMap;

/// HTTP 协议规定的换行符（Carriage Return Line Feed）
pub const CRLF: &str = "\r\n";

/// 目录请求默认返回的首页文件名
pub const INDEX_FILE: &str = "index.html";

/// 唯一受支持的请求方法
pub const METHOD_GET: &str = "GET";

/// 错误页面以及 HTML 文件使用的 Content-Type
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=UTF-8";

/// 无法识别后缀名时的兜底类型
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

lazy_static! {
    /// HTTP 状态码与其对应的标准原因短语映射表。
    ///
    /// 参考标准：[RFC 9110: HTTP Semantics](https://www.rfc-editor.org/rfc/rfc9110.html)。
    pub static ref STATUS_CODES: HashMap<u16, &'static str> = {
        let mut map = HashMap::new();
        map.insert(200, "OK");
        map.insert(403, "Forbidden");
        map.insert(404, "Not Found");
        map.insert(405, "Method Not Allowed");
        map
    };
}

lazy_static! {
    /// 文件后缀名（小写）到 MIME 类型的兜底映射表。
    ///
    /// 仅当宿主环境的类型探测无法给出结果时才会查询。
    pub static ref FALLBACK_MIME_TYPES: HashMap<&'static str, &'static str> = {
        let mut map = HashMap::new();
        map.insert("html", HTML_CONTENT_TYPE);
        map.insert("htm", HTML_CONTENT_TYPE);
        map.insert("css", "text/css; charset=UTF-8");
        map.insert("js", "application/javascript; charset=UTF-8");
        map.insert("png", "image/png");
        map.insert("jpg", "image/jpeg");
        map.insert("jpeg", "image/jpeg");
        map.insert("gif", "image/gif");
        map
    };
}
