// 该文件是 Wangyue （望岳） 项目的一部分。
// src/bin/classify_file.rs - 单次推理测试代码
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use wangyue::{labels::LabelTable, model::ClassifierBuilder};

/// Wangyue 单次推理参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// ONNX 模型文件路径
  #[arg(long, value_name = "FILE")]
  pub model: PathBuf,

  /// 标签文件路径
  #[arg(long, value_name = "FILE")]
  pub labels: PathBuf,

  /// 待分类的图像文件
  #[arg(long, value_name = "FILE")]
  pub image: PathBuf,

  /// 概率下限 (0.0 - 1.0)
  #[arg(long, default_value = "0.1", value_name = "THRESHOLD")]
  pub probability_floor: f32,

  /// 返回结果的最大数量
  #[arg(long, default_value = "5", value_name = "COUNT")]
  pub max_results: usize,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  let labels = LabelTable::load(&args.labels)
    .with_context(|| format!("无法加载标签文件 {}", args.labels.display()))?;

  let mut classifier = ClassifierBuilder::new(&args.model)
    .probability_floor(args.probability_floor)
    .max_results(args.max_results)
    .build()?;

  let image = std::fs::read(&args.image)
    .with_context(|| format!("无法读取图像文件 {}", args.image.display()))?;

  info!("开始推理...");
  let now = std::time::Instant::now();
  let result = classifier.classify(&image)?;
  info!("推理完成，耗时: {:.2?}", now.elapsed());

  for item in result.items.iter() {
    println!(
      "{:.6}: {}",
      item.probability,
      labels.get(item.index).unwrap_or("")
    );
  }

  Ok(())
}
