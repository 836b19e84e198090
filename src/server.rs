// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 监听与分发模块
//!
//! `Server` 在单独的控制流上循环接受连接，只在等待新连接时阻塞；
//! 每个连接被提交到固定大小的 `WorkerPool` 上独立处理。
//! 线程池饱和时任务在运行时内部无界排队。

use crate::connection::{handle_connection, ServeContext};

use log::{debug, error, info};
use tokio::{
    net::TcpListener,
    runtime::{Builder, Handle, Runtime},
};

use std::{future::Future, io, net::SocketAddr, sync::Arc};

/// 线程池的最小工作线程数
pub const MIN_WORKERS: usize = 4;

/// 固定大小的工作线程池，进程生命周期内不会调整大小。
pub struct WorkerPool {
    runtime: Runtime,
    size: usize,
}

impl WorkerPool {
    /// 构建线程池。小于 `MIN_WORKERS` 的值会被提升到 `MIN_WORKERS`。
    pub fn new(size: usize) -> io::Result<Self> {
        let size = size.max(MIN_WORKERS);
        let runtime = Builder::new_multi_thread()
            .worker_threads(size)
            .thread_name("static-worker")
            .enable_all()
            .build()?;
        Ok(Self { runtime, size })
    }

    /// 根据硬件并行度推算的默认大小：`max(4, CPU 数 × 4)`。
    pub fn default_size() -> usize {
        (num_cpus::get() * 4).max(MIN_WORKERS)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn handle(&self) -> &Handle {
        self.runtime.handle()
    }

    /// 在当前线程上驱动 `future`，通常用于运行接收循环。
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

pub struct Server {
    listener: TcpListener,
    context: Arc<ServeContext>,
}

impl Server {
    /// 绑定监听端口。绑定失败直接返回错误，由调用者决定是否终止启动。
    pub async fn bind(address: SocketAddr, context: Arc<ServeContext>) -> io::Result<Self> {
        let listener = TcpListener::bind(address).await?;
        info!("端口{}绑定完成", listener.local_addr()?.port());
        Ok(Self { listener, context })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// 接收循环，永不返回。单个连接的接收错误只记录日志。
    pub async fn run(self, workers: &Handle) {
        let mut id: u128 = 0;
        loop {
            let (stream, addr) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("接收连接时遇到错误：{}", e);
                    continue;
                }
            };
            debug!("[ID{}]新的连接：{}", id, addr);

            let context = Arc::clone(&self.context);
            workers.spawn(async move {
                handle_connection(stream, id, &context).await;
            });
            id += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mime::Classifier, resolver::BaseDirectory};
    use tempfile::TempDir;

    fn test_context(root: &TempDir) -> Arc<ServeContext> {
        let base = BaseDirectory::new(root.path()).unwrap();
        Arc::new(ServeContext::new(base, Classifier::fallback_only(), None))
    }

    #[test]
    fn test_pool_minimum_size() {
        let pool = WorkerPool::new(1).unwrap();
        assert_eq!(pool.size(), MIN_WORKERS);
    }

    #[test]
    fn test_pool_keeps_larger_size() {
        let pool = WorkerPool::new(6).unwrap();
        assert_eq!(pool.size(), 6);
    }

    #[test]
    fn test_default_size_scales_with_cpus() {
        assert!(WorkerPool::default_size() >= MIN_WORKERS);
        assert!(WorkerPool::default_size() >= num_cpus::get());
    }

    #[test]
    fn test_block_on_runs_future() {
        let pool = WorkerPool::new(4).unwrap();
        let value = pool.block_on(async {
            let task = tokio::spawn(async { 21 * 2 });
            task.await.unwrap()
        });
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_bind_reports_local_addr() {
        let root = TempDir::new().unwrap();
        let server = Server::bind("127.0.0.1:0".parse().unwrap(), test_context(&root))
            .await
            .unwrap();
        assert_ne!(server.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_bind_address_in_use_fails() {
        let root = TempDir::new().unwrap();
        let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = occupied.local_addr().unwrap();

        let result = Server::bind(address, test_context(&root)).await;
        assert!(result.is_err());
    }
}
