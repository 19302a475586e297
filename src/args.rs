// 该文件是 Wangyue （望岳） 项目的一部分。
// src/args.rs - 项目参数配置
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::PathBuf;

use clap::Parser;

/// Wangyue 项目参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// ONNX 模型文件路径
  #[arg(long, value_name = "FILE")]
  pub model: PathBuf,

  /// 标签文件路径（每行一个标签，与模型输出位置一一对应）
  #[arg(long, value_name = "FILE")]
  pub labels: PathBuf,

  /// 静态资源目录
  #[arg(long, default_value = "assets", value_name = "DIR")]
  pub assets: PathBuf,

  /// HTTP 监听端口
  #[arg(long, default_value = "5000", value_name = "PORT")]
  pub port: u16,

  /// 概率下限 (0.0 - 1.0)，低于该值的结果会被过滤
  #[arg(long, default_value = "0.1", value_name = "THRESHOLD")]
  pub probability_floor: f32,

  /// 返回结果的最大数量
  #[arg(long, default_value = "5", value_name = "COUNT")]
  pub max_results: usize,
}
