// 该文件是 Wangyue （望岳） 项目的一部分。
// src/tensor.rs - 输入张量填充
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

use crate::codec::PixelGrid;

// 像素按行主序遍历，单个像素内按反向通道序（channels - 1 - c）写入。
// 反向通道序补偿解码器与模型家族之间的通道顺序差异，必须原样保留。

/// 浮点模式：每个通道字节 v 映射为 (v - 127.5) / 127.5，落在 [-1, 1]。
///
/// 前置条件：`dst.len() >= height * width * channels`。调用方在读取
/// 模型上下文的输入尺寸后负责保证，内部不做逐元素检查。
pub fn fill_float(dst: &mut [f32], grid: &PixelGrid) {
  debug_assert!(
    dst.len() >= grid.len(),
    "目标缓冲区容量不足: {} < {}",
    dst.len(),
    grid.len()
  );

  let channels = grid.channels();
  let mut n = 0;
  for y in 0..grid.height() {
    for x in 0..grid.width() {
      for c in 0..channels {
        let value = grid.value(y, x, channels - 1 - c);
        dst[n] = (value as f32 - 127.5) / 127.5;
        n += 1;
      }
    }
  }
}

/// 量化模式：每个通道字节原样写入 8 位无符号张量。
///
/// 前置条件与 [`fill_float`] 相同。
pub fn fill_quantized(dst: &mut [u8], grid: &PixelGrid) {
  debug_assert!(
    dst.len() >= grid.len(),
    "目标缓冲区容量不足: {} < {}",
    dst.len(),
    grid.len()
  );

  let channels = grid.channels();
  let mut n = 0;
  for y in 0..grid.height() {
    for x in 0..grid.width() {
      for c in 0..channels {
        dst[n] = grid.value(y, x, channels - 1 - c);
        n += 1;
      }
    }
  }
}
