// 该文件是 Wangyue （望岳） 项目的一部分。
// src/main.rs - 项目主程序
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

mod args;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use wangyue::{
  labels::LabelTable,
  model::ClassifierBuilder,
  server::{self, AppState},
};

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = args::Args::parse();

  info!("模型文件路径: {}", args.model.display());
  info!("标签文件路径: {}", args.labels.display());
  info!("静态资源目录: {}", args.assets.display());
  info!("概率下限: {}", args.probability_floor);
  info!("最大结果数: {}", args.max_results);

  let labels = LabelTable::load(&args.labels)
    .with_context(|| format!("无法加载标签文件 {}", args.labels.display()))?;
  info!("标签加载完成, 共 {} 条", labels.len());

  let classifier = ClassifierBuilder::new(&args.model)
    .probability_floor(args.probability_floor)
    .max_results(args.max_results)
    .build()?;

  let state = AppState::new(classifier, labels);
  let router = server::router(state, &args.assets);
  server::serve(router, args.port).await
}
