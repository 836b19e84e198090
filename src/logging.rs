// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! 日志初始化：优先读取 log4rs 的 YAML 配置，失败时退回到控制台输出。

use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};

/// 控制台兜底配置使用的格式
const FALLBACK_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l})} {t} - {m}{n}";

pub fn init_logging(path: &str) {
    match log4rs::init_file(path, Default::default()) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("无法从{}加载日志配置：{}，改用控制台输出", path, e);
            init_console();
        }
    }
}

fn init_console() {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(FALLBACK_PATTERN)))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info));
    let result = match config {
        Ok(c) => log4rs::init_config(c).map(|_| ()).map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };
    if let Err(e) = result {
        eprintln!("控制台日志初始化失败：{}", e);
    }
}
