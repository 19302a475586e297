// 该文件是 Wangyue （望岳） 项目的一部分。
// src/server.rs - HTTP 服务
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::{path::Path, sync::Arc};

use axum::{
  Router,
  extract::{DefaultBodyLimit, Multipart, State},
  http::{StatusCode, header},
  response::{IntoResponse, Redirect, Response},
  routing::post,
};
use tokio::sync::Mutex;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::{
  labels::LabelTable,
  model::{ClassifyResult, Model},
  respond,
  upload::{self, UploadAssembler},
};

const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// 进程级共享状态。模型上下文不允许并发推理，
/// 用互斥锁把所有 填充 → 推理 → 读取 序列串行化。
pub struct AppState<M> {
  model: Arc<Mutex<M>>,
  labels: Arc<LabelTable>,
}

impl<M> Clone for AppState<M> {
  fn clone(&self) -> Self {
    AppState {
      model: self.model.clone(),
      labels: self.labels.clone(),
    }
  }
}

impl<M> AppState<M> {
  pub fn new(model: M, labels: LabelTable) -> Self {
    AppState {
      model: Arc::new(Mutex::new(model)),
      labels: Arc::new(labels),
    }
  }
}

pub fn router<M>(state: AppState<M>, assets_dir: &Path) -> Router
where
  M: Model<Input = Vec<u8>, Output = ClassifyResult> + Send + 'static,
  M::Error: std::fmt::Display,
{
  Router::new()
    .route(
      "/upload",
      post(handle_upload::<M>).get(|| async { Redirect::to("/") }),
    )
    .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
    .fallback_service(ServeDir::new(assets_dir).append_index_html_on_directories(true))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

pub async fn serve(router: Router, port: u16) -> anyhow::Result<()> {
  let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
  info!("HTTP 服务已启动, 监听端口: {}", port);
  axum::serve(listener, router)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!("HTTP 服务已退出");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(err) = tokio::signal::ctrl_c().await {
    error!("无法监听中断信号: {}", err);
    return;
  }
  info!("收到中断信号，准备退出...");
}

/// `POST /upload`：驱动上传装配状态机消费 multipart 数据流，
/// 完成后在模型互斥区内执行完整推理流水线。
///
/// 任何请求级失败都折叠成空响应体的 500，不影响模型上下文
/// 与其他连接；客户端需要自行重传。
async fn handle_upload<M>(State(state): State<AppState<M>>, mut multipart: Multipart) -> Response
where
  M: Model<Input = Vec<u8>, Output = ClassifyResult> + Send + 'static,
  M::Error: std::fmt::Display,
{
  let mut assembler = UploadAssembler::new();
  let mut payload = None;

  loop {
    let mut field = match multipart.next_field().await {
      Ok(Some(field)) => field,
      Ok(None) => break,
      Err(err) => {
        warn!("multipart 解析失败: {}", err);
        return server_error();
      }
    };

    let name = field.name().unwrap_or_default().to_owned();
    if !assembler.part_begin(&name) {
      continue;
    }

    loop {
      match field.chunk().await {
        Ok(Some(chunk)) => {
          if let Err(err) = assembler.push_chunk(&chunk) {
            error!("上传缓冲失败: {}", err);
            return server_error();
          }
        }
        Ok(None) => break,
        Err(err) => {
          warn!("上传数据读取失败: {}", err);
          assembler.abort();
          return server_error();
        }
      }
    }

    payload = assembler.part_end();
    break;
  }

  let Some(image) = payload else {
    warn!("请求中没有名为 {} 的文件字段", upload::UPLOAD_FIELD);
    return server_error();
  };

  let inferred = {
    let mut model = state.model.lock().await;
    model.infer(&image)
  };

  let result = match inferred {
    Ok(result) => result,
    Err(err) => {
      error!("推理流水线失败: {}", err);
      return server_error();
    }
  };

  match respond::build_json(&result, &state.labels) {
    Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
    Err(err) => {
      error!("响应构建失败: {}", err);
      server_error()
    }
  }
}

fn server_error() -> Response {
  StatusCode::INTERNAL_SERVER_ERROR.into_response()
}
