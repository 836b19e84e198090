// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # Content-Type 判定模块
//!
//! 两级策略：先询问宿主环境的类型探测（`ContentTypeProbe`），
//! 探测不到时再查询 `param::FALLBACK_MIME_TYPES` 兜底表。

use crate::param::{DEFAULT_CONTENT_TYPE, FALLBACK_MIME_TYPES};

use log::debug;

use std::{collections::HashMap, fs, io, path::Path};

/// 宿主环境的文件类型探测接口。无法判断时返回 `None`。
#[cfg_attr(test, mockall::automock)]
pub trait ContentTypeProbe: Send + Sync {
    fn probe(&self, name: &str) -> Option<String>;
}

/// 基于 `mime.types` 格式数据库（如 `/etc/mime.types`）的探测器。
///
/// 每行格式为 `type/subtype ext1 ext2 ...`，`#` 开头的行为注释。
#[derive(Debug, Default, Clone)]
pub struct MimeTypesProbe {
    types: HashMap<String, String>,
}

impl MimeTypesProbe {
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    pub fn parse(text: &str) -> Self {
        let mut types = HashMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            let mime = match fields.next() {
                Some(m) => m,
                None => continue,
            };
            for ext in fields {
                types.insert(ext.to_ascii_lowercase(), mime.to_string());
            }
        }
        Self { types }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl ContentTypeProbe for MimeTypesProbe {
    fn probe(&self, name: &str) -> Option<String> {
        extension_of(name).and_then(|ext| self.types.get(&ext).cloned())
    }
}

/// 把文件名映射为 MIME 类型字符串。
pub struct Classifier {
    probe: Option<Box<dyn ContentTypeProbe>>,
}

impl Classifier {
    pub fn new(probe: Box<dyn ContentTypeProbe>) -> Self {
        Self { probe: Some(probe) }
    }

    /// 不接入宿主探测，只使用兜底表。
    pub fn fallback_only() -> Self {
        Self { probe: None }
    }

    pub fn classify(&self, name: &str) -> String {
        if let Some(probe) = &self.probe {
            if let Some(mime) = probe.probe(name) {
                debug!("宿主探测得到{}的类型：{}", name, mime);
                return mime;
            }
        }
        fallback_content_type(name).to_string()
    }
}

/// 兜底表查询，后缀名大小写不敏感。
pub fn fallback_content_type(name: &str) -> &'static str {
    extension_of(name)
        .and_then(|ext| FALLBACK_MIME_TYPES.get(ext.as_str()).copied())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

// 只看最后一个路径分量
fn extension_of(name: &str) -> Option<String> {
    let file_name = name.rsplit('/').next().unwrap_or(name);
    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext.to_ascii_lowercase()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use proptest::prelude::*;

    #[test]
    fn test_fallback_table() {
        assert_eq!(fallback_content_type("index.html"), "text/html; charset=UTF-8");
        assert_eq!(fallback_content_type("old.htm"), "text/html; charset=UTF-8");
        assert_eq!(fallback_content_type("css/site.css"), "text/css; charset=UTF-8");
        assert_eq!(
            fallback_content_type("app.js"),
            "application/javascript; charset=UTF-8"
        );
        assert_eq!(fallback_content_type("logo.png"), "image/png");
        assert_eq!(fallback_content_type("a.jpg"), "image/jpeg");
        assert_eq!(fallback_content_type("a.jpeg"), "image/jpeg");
        assert_eq!(fallback_content_type("a.gif"), "image/gif");
    }

    #[test]
    fn test_fallback_default() {
        assert_eq!(fallback_content_type("archive.tar"), "application/octet-stream");
        assert_eq!(fallback_content_type("README"), "application/octet-stream");
        assert_eq!(fallback_content_type("trailing."), "application/octet-stream");
        assert_eq!(fallback_content_type("dir.css/file"), "application/octet-stream");
    }

    #[test]
    fn test_fallback_dotfile() {
        assert_eq!(fallback_content_type(".html"), "text/html; charset=UTF-8");
    }

    #[test]
    fn test_mime_types_parse() {
        let probe = MimeTypesProbe::parse(
            "# comment\n\ntext/html html htm\nimage/svg+xml svg SVGZ\napplication/x-empty\n",
        );
        assert_eq!(probe.len(), 4);
        assert_eq!(probe.probe("a.html"), Some("text/html".to_string()));
        assert_eq!(probe.probe("pic.SVG"), Some("image/svg+xml".to_string()));
        assert_eq!(probe.probe("pic.svgz"), Some("image/svg+xml".to_string()));
        assert_eq!(probe.probe("a.css"), None);
    }

    #[test]
    fn test_mime_types_load_missing_file() {
        assert!(MimeTypesProbe::load("/definitely/not/here/mime.types").is_err());
    }

    #[test]
    fn test_classifier_prefers_probe() {
        let mut probe = MockContentTypeProbe::new();
        probe
            .expect_probe()
            .with(eq("data.csv"))
            .times(1)
            .returning(|_| Some("text/csv".to_string()));
        let classifier = Classifier::new(Box::new(probe));
        assert_eq!(classifier.classify("data.csv"), "text/csv");
    }

    #[test]
    fn test_classifier_falls_back_when_probe_unsure() {
        let mut probe = MockContentTypeProbe::new();
        probe.expect_probe().returning(|_| None);
        let classifier = Classifier::new(Box::new(probe));
        assert_eq!(classifier.classify("site.CSS"), "text/css; charset=UTF-8");
        assert_eq!(classifier.classify("blob.bin"), "application/octet-stream");
    }

    #[test]
    fn test_classifier_fallback_only() {
        let classifier = Classifier::fallback_only();
        assert_eq!(classifier.classify("index.html"), "text/html; charset=UTF-8");
    }

    proptest! {
        #[test]
        fn prop_fallback_is_case_insensitive(stem in "[a-z0-9_]{1,12}", upper in any::<bool>()) {
            for ext in ["html", "htm", "css", "js", "png", "jpg", "jpeg", "gif"] {
                let ext_cased = if upper { ext.to_uppercase() } else { ext.to_string() };
                let name = format!("{}.{}", stem, ext_cased);
                prop_assert_eq!(
                    fallback_content_type(&name),
                    fallback_content_type(&format!("{}.{}", stem, ext))
                );
                prop_assert_ne!(fallback_content_type(&name), DEFAULT_CONTENT_TYPE);
            }
        }
    }
}
