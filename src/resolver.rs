// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 路径解析模块
//!
//! 将请求行中原始的、经过百分号编码的路径映射为根目录之内的规范化文件系统路径。
//!
//! ## 解析步骤
//! 1. 按表单风格进行 URL 解码（`+` 视为空格，非法 UTF-8 以替换字符代替）。
//! 2. 去掉一个前导 `/`。
//! 3. 空白路径替换为 `index.html`；以 `/` 结尾的路径追加 `index.html`。
//! 4. 与根目录拼接，按词法消除 `.` 与 `..`。
//! 5. 对已存在的最长前缀调用 `canonicalize` 以跟随符号链接。
//! 6. 在第 4 步和第 5 步之后都按路径分量检查结果是否仍位于根目录之内。
//!
//! `..` 在跟随符号链接之前按词法消除：
//! 若 `deep -> a/b`，`/deep/../../x.html` 会被视为越出根目录并返回 403，
//! 即使操作系统解析出的真实位置仍在根目录之内。
//! 悬空的符号链接按其链接目标判断，指向根目录之外时同样返回 403。

use crate::{exception::Exception, param::INDEX_FILE};

use log::debug;
use percent_encoding::percent_decode_str;

use std::{
    ffi::OsString,
    fs, io,
    path::{Component, Path, PathBuf},
};

/// 进程内唯一的静态资源根目录，启动时规范化一次，之后只读。
#[derive(Debug, Clone)]
pub struct BaseDirectory {
    root: PathBuf,
}

/// 解析成功的请求路径。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// 规范化后的绝对路径，保证等于根目录或位于其之下
    canonical: PathBuf,
    /// 解码、补全首页后的相对资源名，例如 `docs/index.html`
    resource: String,
}

impl BaseDirectory {
    /// 规范化给定目录并以其作为根目录。目录不存在或不是目录时返回错误。
    pub fn new<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let root = fs::canonicalize(path.as_ref())?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", root.display()),
            ));
        }
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// 将请求行中的原始路径解析为根目录之内的规范路径。
    ///
    /// 逃逸出根目录时返回 `Exception::SecurityViolation`，无论目标是否存在。
    /// 返回 `Ok` 并不代表文件存在，存在性由调用方检查。
    pub fn resolve(&self, raw_path: &str) -> Result<ResolvedPath, Exception> {
        let resource = normalize_resource(&decode_path(raw_path));
        let joined = lexical_join(&self.root, &resource);
        if !joined.starts_with(&self.root) {
            debug!("词法解析后的路径{}位于根目录之外", joined.display());
            return Err(Exception::SecurityViolation);
        }

        let canonical = match canonicalize_existing(&joined) {
            Ok(p) => p,
            Err(e) => {
                debug!("无法规范化路径{}：{}", joined.display(), e);
                return Err(Exception::FileNotFound);
            }
        };
        if !canonical.starts_with(&self.root) {
            debug!("路径{}经符号链接解析为{}", joined.display(), canonical.display());
            return Err(Exception::SecurityViolation);
        }

        Ok(ResolvedPath {
            canonical,
            resource,
        })
    }
}

impl ResolvedPath {
    pub fn canonical(&self) -> &Path {
        &self.canonical
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }
}

/// 表单风格的 URL 解码：`+` 解码为空格，`%XX` 解码为字节，
/// 再按 UTF-8 解释（非法序列替换为 U+FFFD）。不完整的 `%` 序列原样保留。
pub fn decode_path(raw_path: &str) -> String {
    let plus_decoded = raw_path.replace('+', " ");
    percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// 去掉一个前导 `/`，并把目录请求补全为首页文件。
pub fn normalize_resource(decoded: &str) -> String {
    let path = decoded.strip_prefix('/').unwrap_or(decoded);
    if path.trim().is_empty() {
        INDEX_FILE.to_string()
    } else if path.ends_with('/') {
        [path, INDEX_FILE].concat()
    } else {
        path.to_string()
    }
}

/// 按词法拼接并消除 `.`、`..`，不访问文件系统。
///
/// 绝对路径分量会替换掉当前结果，因此 `/etc/passwd` 这样的资源名会落在根目录之外。
fn lexical_join<P: AsRef<Path>>(root: &Path, resource: P) -> PathBuf {
    let mut joined = root.to_path_buf();
    for component in resource.as_ref().components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                joined = PathBuf::from(component.as_os_str());
            }
            Component::CurDir => {}
            Component::ParentDir => {
                joined.pop();
            }
            Component::Normal(segment) => joined.push(segment),
        }
    }
    joined
}

/// 符号链接的最大跟随次数，超过后视为链接环
const MAX_SYMLINK_HOPS: usize = 40;

/// 规范化路径中已存在的最长前缀，再把不存在的尾部原样接回。
///
/// 这样即使目标文件不存在，指向根目录之外的符号链接也会暴露出来。
/// 悬空的符号链接无法 `canonicalize`，改为读取链接内容并相对其所在目录继续解析。
fn canonicalize_existing(path: &Path) -> io::Result<PathBuf> {
    let mut existing = path.to_path_buf();
    let mut tail: Vec<OsString> = Vec::new();
    let mut hops = 0;
    loop {
        match fs::canonicalize(&existing) {
            Ok(mut canonical) => {
                for segment in tail.iter().rev() {
                    canonical.push(segment);
                }
                return Ok(canonical);
            }
            Err(e) if is_symlink(&existing) => {
                hops += 1;
                if hops > MAX_SYMLINK_HOPS {
                    return Err(e);
                }
                let target = fs::read_link(&existing)?;
                let parent = existing.parent().map(Path::to_path_buf).unwrap_or_default();
                existing = lexical_join(&parent, &target);
            }
            Err(e) => match existing.file_name() {
                Some(name) => {
                    tail.push(name.to_os_string());
                    existing.pop();
                }
                None => return Err(e),
            },
        }
    }
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}
