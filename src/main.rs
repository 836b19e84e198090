// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 静态文件服务器
//!
//! 单机 HTTP/1.1 静态文件服务器：接收 TCP 连接，解析请求行，
//! 从受限的根目录中返回文件，随后关闭连接。
//! - 固定大小的工作线程池并行处理连接
//! - 基于规范化路径的目录穿越防护
//! - 每个连接只返回一个响应，不支持长连接

use static_file_server::{
    logging::init_logging, BaseDirectory, Classifier, Config, MimeTypesProbe, ServeContext,
    Server, WorkerPool,
};

use log::{error, info, warn};

use std::{env, io, net::SocketAddr, process, sync::Arc};

const DEFAULT_CONFIG: &str = "config/development.toml";
const LOG_CONFIG: &str = "config/log4rs.yaml";

fn main() {
    // 1. 初始化日志系统
    init_logging(LOG_CONFIG);

    // 2. 加载配置，第一个命令行参数可覆盖配置文件路径
    let config_path = env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = Config::from_toml(&config_path);
    info!("配置文件{}已载入", config_path);

    if let Err(e) = run(config) {
        error!("服务器启动失败：{}", e);
        process::exit(1);
    }
}

fn run(config: Config) -> io::Result<()> {
    // 3. 根目录只规范化一次，之后只读共享
    let base = match BaseDirectory::new(config.www_root()) {
        Ok(b) => b,
        Err(e) => {
            error!("无法使用根目录{}：{}", config.www_root(), e);
            return Err(e);
        }
    };
    info!("www root: {}", base.path().display());

    let classifier = match config.mime_types() {
        Some(path) => match MimeTypesProbe::load(path) {
            Ok(probe) => {
                info!("已从{}载入{}条MIME类型", path, probe.len());
                Classifier::new(Box::new(probe))
            }
            Err(e) => {
                warn!("无法读取MIME类型数据库{}：{}，只使用内置表", path, e);
                Classifier::fallback_only()
            }
        },
        None => Classifier::fallback_only(),
    };
    let context = Arc::new(ServeContext::new(base, classifier, config.io_timeout()));

    // 4. 线程池大小在启动时确定
    let pool = WorkerPool::new(config.worker_threads())?;
    info!("工作线程数：{}", pool.size());

    let address = SocketAddr::from((config.bind_address(), config.port()));
    info!("服务端将在{}上监听Socket连接", address);

    // 5. 接收循环运行在主线程上，连接交给线程池处理
    pool.block_on(async {
        let server = Server::bind(address, context).await?;
        info!("服务器已启动：http://{}", server.local_addr()?);
        server.run(pool.handle()).await;
        Ok::<(), io::Error>(())
    })
}
